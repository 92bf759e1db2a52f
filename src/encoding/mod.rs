//! Output encoding resolution and transcoding.
//!
//! The writer produces UTF-8 internally. When a document declares a
//! different encoding and transcoding is enabled, every chunk is passed
//! through `encoding_rs` before it reaches the sink. Characters the target
//! encoding cannot represent are emitted as decimal character references
//! (`&#937;`), which is what `encoding_rs` does for legacy encoders and is
//! valid in both text and attribute values.
//!
//! Character references are not allowed in names, so names are checked
//! with [`OutputEncoding::can_encode`] before they are written.
//!
//! With transcoding the prolog declares the canonical name of the resolved
//! encoding (`latin1` resolves to `windows-1252`), so a parser decodes the
//! bytes with the table that produced them. Without transcoding the
//! declared encoding is only a label: it is written into the prolog
//! verbatim and the output stays UTF-8.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{Error, Result};

/// A resolved target encoding for transcoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEncoding {
    encoding: &'static Encoding,
}

impl OutputEncoding {
    /// Looks up `label` (case-insensitive WHATWG label, e.g. `"ISO-8859-15"`,
    /// `"windows-1252"`, `"Shift_JIS"`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEncoding`] if the label is unknown or
    /// names an encoding that `encoding_rs` can only decode (UTF-16,
    /// `replacement`).
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlscribe::encoding::OutputEncoding;
    ///
    /// let enc = OutputEncoding::for_label("latin1").unwrap();
    /// assert_eq!(enc.name(), "windows-1252");
    /// assert!(OutputEncoding::for_label("UTF-16LE").is_err());
    /// ```
    pub fn for_label(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::UnsupportedEncoding(label.to_string()))?;
        if encoding.output_encoding() != encoding {
            return Err(Error::UnsupportedEncoding(label.to_string()));
        }
        Ok(Self { encoding })
    }

    /// The canonical name of the resolved encoding.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Returns `true` if chunks pass through unchanged.
    #[must_use]
    pub fn is_utf8(&self) -> bool {
        self.encoding == UTF_8
    }

    /// Returns `true` if every character of `s` exists in this encoding,
    /// that is, encoding it needs no character references.
    #[must_use]
    pub fn can_encode(&self, s: &str) -> bool {
        if self.is_utf8() {
            return true;
        }
        let (_, _, had_unmappable) = self.encoding.encode(s);
        !had_unmappable
    }

    /// Encodes one chunk of output.
    #[must_use]
    pub fn encode<'a>(&self, chunk: &'a str) -> Cow<'a, [u8]> {
        if self.is_utf8() {
            return Cow::Borrowed(chunk.as_bytes());
        }
        let (bytes, _, _) = self.encoding.encode(chunk);
        bytes
    }
}
