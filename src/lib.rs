//! # xmlscribe
//!
//! A streaming XML writer. Elements are written as they are opened, with
//! balanced tags, escaped text and readable indentation, and without
//! building a document tree in memory.
//!
//! Each open element is a scoped handle. A handle closes its element when it
//! is finished or dropped, choosing between a self-closing tag, an inline
//! end tag, or an end tag on its own indented line. Because a child handle
//! borrows the output from its parent, elements always close in the reverse
//! order they were opened, even on early returns.
//!
//! ## Quick Start
//!
//! ```
//! use xmlscribe::Document;
//!
//! let mut out = Vec::new();
//! {
//!     let mut doc = Document::new(&mut out, "root")?;
//!     doc.tag("child")?.with_attr("attr", "v")?.text("text")?;
//!     let mut nested = doc.tree("nested")?;
//!     nested.tag("leaf")?.finish()?;
//! }
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>
//! <root>
//!   <child attr="v">text</child>
//!   <nested>
//!     <leaf />
//!   </nested>
//! </root>
//! "#
//! );
//! # Ok::<(), xmlscribe::Error>(())
//! ```

pub mod encoding;
pub mod error;
pub mod escape;
pub mod serial;
pub mod util;

// Re-export primary types at the crate root for convenience.
pub use error::{Error, Result};
pub use serial::{Attr, Config, Document, Done, ElementWriter, Flavor, Selector, Tag, Tree};
pub use util::indent::Indentation;
pub use util::name::NamePolicy;
