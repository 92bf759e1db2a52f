//! Character escaping for attribute values and text content.
//!
//! Two encodings are provided:
//!
//! - **Attribute values** escape `&`, `"`, `<` and `>`.
//! - **Text content** escapes `&`, `<` and `>` only. The double quote is
//!   left alone because text never sits inside a quoted attribute.
//!
//! Each encoding is available as a pure string function returning a
//! [`Cow`] (borrowed when nothing needs escaping) and as a `Display`
//! adapter ([`Attribute`], [`Text`]) that escapes the formatted output of
//! any value on the fly, without an intermediate allocation.
//!
//! # Examples
//!
//! ```
//! use xmlscribe::escape::{escape_attribute, escape_text, Attribute};
//!
//! assert_eq!(escape_attribute(r#""a&b<c>d"#), "&quot;a&amp;b&lt;c&gt;d");
//! assert_eq!(escape_text(r#""a&b<c>d"#), "\"a&amp;b&lt;c&gt;d");
//! assert_eq!(Attribute(15.99).to_string(), "15.99");
//! ```

use std::borrow::Cow;
use std::fmt::{self, Write as _};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Attribute,
    Text,
}

impl Mode {
    fn replacement(self, ch: char) -> Option<&'static str> {
        match ch {
            '&' => Some("&amp;"),
            '<' => Some("&lt;"),
            '>' => Some("&gt;"),
            '"' if self == Mode::Attribute => Some("&quot;"),
            _ => None,
        }
    }
}

/// Escapes a string for use inside a double-quoted attribute value.
#[must_use]
pub fn escape_attribute(s: &str) -> Cow<'_, str> {
    escape_with(s, Mode::Attribute)
}

/// Escapes a string for use as element text content.
#[must_use]
pub fn escape_text(s: &str) -> Cow<'_, str> {
    escape_with(s, Mode::Text)
}

fn escape_with(s: &str, mode: Mode) -> Cow<'_, str> {
    let Some(first) = s.find(|c: char| mode.replacement(c).is_some()) else {
        return Cow::Borrowed(s);
    };
    let mut out = String::with_capacity(s.len() + 8);
    out.push_str(&s[..first]);
    for ch in s[first..].chars() {
        match mode.replacement(ch) {
            Some(rep) => out.push_str(rep),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Forwards formatted output to an inner writer, escaping reserved
/// characters in runs.
struct Escaper<'a, W: fmt::Write + ?Sized> {
    inner: &'a mut W,
    mode: Mode,
}

impl<W: fmt::Write + ?Sized> fmt::Write for Escaper<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut start = 0;
        for (i, ch) in s.char_indices() {
            if let Some(rep) = self.mode.replacement(ch) {
                self.inner.write_str(&s[start..i])?;
                self.inner.write_str(rep)?;
                start = i + ch.len_utf8();
            }
        }
        self.inner.write_str(&s[start..])
    }
}

/// `Display` adapter that renders a value with attribute-value escaping.
#[derive(Debug, Clone, Copy)]
pub struct Attribute<T>(pub T);

impl<T: fmt::Display> fmt::Display for Attribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            Escaper {
                inner: f,
                mode: Mode::Attribute,
            },
            "{}",
            self.0
        )
    }
}

/// `Display` adapter that renders a value with text-content escaping.
#[derive(Debug, Clone, Copy)]
pub struct Text<T>(pub T);

impl<T: fmt::Display> fmt::Display for Text<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            Escaper {
                inner: f,
                mode: Mode::Text,
            },
            "{}",
            self.0
        )
    }
}
