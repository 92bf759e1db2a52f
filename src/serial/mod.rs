//! Streaming XML serialization.
//!
//! A [`Document`] writes the prolog and opens the root element; every
//! nested element is an [`ElementWriter`] handle that writes its start tag
//! immediately and its end tag when it goes out of scope. Nothing is
//! buffered: each call writes straight to the sink before returning.

pub mod document;
pub mod element;
pub mod options;
mod sink;

pub use document::Document;
pub use element::{Attr, Done, ElementWriter, Flavor, Selector, Tag, Tree};
pub use options::Config;
