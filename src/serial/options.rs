//! Document configuration.

use crate::util::indent::Indentation;
use crate::util::name::NamePolicy;

/// Options applied once when a [`Document`](crate::Document) is created.
///
/// # Examples
///
/// ```
/// use xmlscribe::{Config, Document};
///
/// let mut out = Vec::new();
/// let config = Config::default().standalone(false).indent('\t', 1);
/// Document::with_config(&mut out, "root", config).unwrap().finish().unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\" ?>\n<root />\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Character repeated to indent nested elements. Defaults to a space.
    pub indent_char: char,
    /// Indentation added per nesting level. Defaults to 2.
    pub indent_increment: usize,
    /// Value of the prolog's `encoding` pseudo-attribute. Defaults to `"UTF-8"`.
    pub encoding: String,
    /// Value of the prolog's `standalone` pseudo-attribute. Defaults to `true`.
    pub standalone: bool,
    /// Validation applied to element and attribute names. Defaults to
    /// [`NamePolicy::Permissive`].
    pub names: NamePolicy,
    /// Whether to transcode the output into `encoding`. Defaults to `false`,
    /// in which case the output is UTF-8 and `encoding` is only a label.
    pub transcode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_char: ' ',
            indent_increment: 2,
            encoding: "UTF-8".to_string(),
            standalone: true,
            names: NamePolicy::Permissive,
            transcode: false,
        }
    }
}

impl Config {
    /// Sets the indentation character and the per-level increment.
    #[must_use]
    pub fn indent(mut self, ch: char, increment: usize) -> Self {
        self.indent_char = ch;
        self.indent_increment = increment;
        self
    }

    /// Sets the declared encoding.
    #[must_use]
    pub fn encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    /// Sets the declared `standalone` flag.
    #[must_use]
    pub fn standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Sets the name validation policy.
    #[must_use]
    pub fn names(mut self, names: NamePolicy) -> Self {
        self.names = names;
        self
    }

    /// Enables or disables transcoding into the declared encoding.
    #[must_use]
    pub fn transcode(mut self, transcode: bool) -> Self {
        self.transcode = transcode;
        self
    }

    /// The indentation settings described by this configuration.
    #[must_use]
    pub fn indentation(&self) -> Indentation {
        Indentation::new(self.indent_char, self.indent_increment)
    }
}
