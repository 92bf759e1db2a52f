//! Indentation prefixes derived from nesting depth.

use std::fmt::{self, Write as _};

/// Indentation settings: which character to repeat and how far each
/// nesting level moves right.
///
/// `depth` values are character counts, not levels: the root sits at
/// depth 0 and each child sits at its parent's depth plus `increment`.
///
/// # Examples
///
/// ```
/// use xmlscribe::Indentation;
///
/// let indent = Indentation::default();
/// assert_eq!(indent.child_depth(0), 2);
/// assert_eq!(indent.prefix(4), "    ");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indentation {
    /// The character repeated `depth` times. Defaults to a space.
    pub ch: char,
    /// Depth added per nesting level. Defaults to 2.
    pub increment: usize,
}

impl Default for Indentation {
    fn default() -> Self {
        Self {
            ch: ' ',
            increment: 2,
        }
    }
}

impl Indentation {
    /// Creates indentation settings from a character and an increment.
    #[must_use]
    pub fn new(ch: char, increment: usize) -> Self {
        Self { ch, increment }
    }

    /// Returns the prefix for `depth`: `depth` copies of the indent character.
    #[must_use]
    pub fn prefix(&self, depth: usize) -> String {
        std::iter::repeat(self.ch).take(depth).collect()
    }

    /// Depth of a child element opened at `depth`.
    #[must_use]
    pub fn child_depth(&self, depth: usize) -> usize {
        depth.saturating_add(self.increment)
    }

    /// Returns a `Display` value rendering the prefix for `depth` without
    /// allocating.
    #[must_use]
    pub fn display(&self, depth: usize) -> Prefix {
        Prefix { ch: self.ch, depth }
    }
}

/// The indentation prefix for one depth, rendered lazily.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    ch: char,
    depth: usize,
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            f.write_char(self.ch)?;
        }
        Ok(())
    }
}
