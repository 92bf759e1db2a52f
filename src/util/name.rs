//! Element and attribute name validation.
//!
//! Validation is pluggable through [`NamePolicy`]. The default policy is
//! permissive and only rejects empty names; [`NamePolicy::Xml`] enforces
//! the XML 1.0 `Name` production (§2.3 `[5]`), and [`NamePolicy::Custom`]
//! delegates to a caller-supplied predicate.

use std::fmt;

use crate::error::{Error, NameKind, Result};

/// How element and attribute names are validated before they are written.
#[derive(Clone, Copy, Default)]
pub enum NamePolicy {
    /// Accept any non-empty name.
    #[default]
    Permissive,
    /// Require a valid XML 1.0 `Name`.
    Xml,
    /// Accept a name when the predicate returns `true`.
    Custom(fn(&str) -> bool),
}

impl fmt::Debug for NamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permissive => f.write_str("Permissive"),
            Self::Xml => f.write_str("Xml"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl NamePolicy {
    /// Returns `true` if `name` is acceptable under this policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlscribe::NamePolicy;
    ///
    /// assert!(NamePolicy::Permissive.accepts("1 odd name"));
    /// assert!(NamePolicy::Xml.accepts("svg:rect"));
    /// assert!(!NamePolicy::Xml.accepts("1st"));
    /// ```
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            Self::Permissive => !name.is_empty(),
            Self::Xml => is_xml_name(name),
            Self::Custom(pred) => pred(name),
        }
    }

    /// Checks `name`, producing an [`Error::InvalidName`] when it is rejected.
    pub(crate) fn check(&self, kind: NameKind, name: &str) -> Result<()> {
        if self.accepts(name) {
            Ok(())
        } else {
            Err(Error::InvalidName {
                kind,
                name: name.to_string(),
            })
        }
    }
}

/// Returns `true` if `name` matches the XML 1.0 `Name` production.
#[must_use]
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start_char(c) => chars.all(is_name_char),
        _ => false,
    }
}

/// `NameStartChar` per XML 1.0 §2.3 `[4]`.
fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// `NameChar` per XML 1.0 §2.3 `[4a]`.
fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' |
            '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}
