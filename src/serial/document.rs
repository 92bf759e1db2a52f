//! The top-level document: prolog plus root element.

use std::fmt::{self, Display};
use std::io::Write;

use crate::encoding::OutputEncoding;
use crate::error::{NameKind, Result};
use crate::escape;

use super::element::{Attr, Done, ElementWriter, Flavor, Node, Selector, Tag, Tree};
use super::options::Config;
use super::sink::Sink;

/// A streaming XML document.
///
/// Creating a `Document` writes the prolog and the root start tag. The root
/// is a [`Flavor::Tree`] element at depth 0; `attr`, `tag`, `tree` and
/// `open` are forwarded to it. The root closes when the document is
/// finished or dropped.
///
/// The sink is any [`std::io::Write`]. Pass `&mut writer` to keep using the
/// writer afterwards.
///
/// # Examples
///
/// ```
/// use xmlscribe::Document;
///
/// let mut out = Vec::new();
/// Document::new(&mut out, "root")?.with_attr("lang", "en&fr")?.finish()?;
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\n\
///      <root lang=\"en&amp;fr\" />\n"
/// );
/// # Ok::<(), xmlscribe::Error>(())
/// ```
pub struct Document<W: Write> {
    sink: Sink<W>,
    root: Node,
}

impl<W: Write> Document<W> {
    /// Starts a document with the default [`Config`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidName`](crate::Error::InvalidName) for an empty root
    /// name, or a sink error.
    pub fn new(sink: W, root_name: &str) -> Result<Self> {
        Self::with_config(sink, root_name, Config::default())
    }

    /// Starts a document with the given configuration.
    ///
    /// The root name and the output encoding are checked before anything is
    /// written. When `config.transcode` is set, the prolog declares the
    /// canonical name of the resolved encoding rather than the label as
    /// given.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidName`](crate::Error::InvalidName) if the root name is
    /// rejected, [`Error::UnsupportedEncoding`](crate::Error::UnsupportedEncoding)
    /// if `config.transcode` is set for an encoding that cannot be produced,
    /// or a sink error.
    pub fn with_config(sink: W, root_name: &str, config: Config) -> Result<Self> {
        let encoding = if config.transcode {
            Some(OutputEncoding::for_label(&config.encoding)?)
        } else {
            None
        };
        let declared = encoding.map_or(config.encoding.as_str(), |enc| enc.name());
        let mut sink = Sink::new(sink, config.indentation(), config.names, encoding);
        sink.check_name(NameKind::Element, root_name)?;
        sink.emit(format_args!(
            "{}\n",
            Prolog {
                encoding: declared,
                standalone: config.standalone,
            }
        ))?;
        let root = Node::open(&mut sink, root_name, 0, Flavor::Tree)?;
        tracing::debug!(root = root_name, encoding = declared, "document started");
        Ok(Self { sink, root })
    }

    /// Adds an attribute to the root element.
    ///
    /// # Errors
    ///
    /// See [`ElementWriter::attr`].
    pub fn attr(&mut self, name: &str, value: impl Display) -> Result<&mut Self> {
        self.root.attr(&mut self.sink, name, value)?;
        Ok(self)
    }

    /// Consuming form of [`attr`](Self::attr).
    ///
    /// # Errors
    ///
    /// See [`ElementWriter::attr`].
    pub fn with_attr(mut self, name: &str, value: impl Display) -> Result<Self> {
        self.root.attr(&mut self.sink, name, value)?;
        Ok(self)
    }

    /// Adds a prebuilt [`Attr`] to the root element.
    ///
    /// # Errors
    ///
    /// See [`ElementWriter::attr`].
    pub fn add<V: Display>(&mut self, attr: Attr<'_, V>) -> Result<&mut Self> {
        self.attr(attr.name, attr.value)
    }

    /// Opens an inline-closing child of the root.
    ///
    /// # Errors
    ///
    /// See [`ElementWriter::tag`].
    pub fn tag(&mut self, name: &str) -> Result<ElementWriter<'_, W>> {
        self.open(Tag(name))
    }

    /// Opens a child of the root that closes on its own line.
    ///
    /// # Errors
    ///
    /// See [`ElementWriter::tree`].
    pub fn tree(&mut self, name: &str) -> Result<ElementWriter<'_, W>> {
        self.open(Tree(name))
    }

    /// Opens a child of the root chosen by a selector.
    ///
    /// # Errors
    ///
    /// See [`ElementWriter::open`].
    pub fn open<S: Selector>(&mut self, selector: S) -> Result<ElementWriter<'_, W>> {
        let node = self
            .root
            .child(&mut self.sink, selector.name(), selector.flavor())?;
        Ok(ElementWriter::from_parts(&mut self.sink, node))
    }

    /// Writes `<name>value</name>` as a child of the root.
    ///
    /// # Errors
    ///
    /// See [`ElementWriter::leaf`].
    pub fn leaf(&mut self, name: &str, value: impl Display) -> Result<()> {
        self.tag(name)?.text(value).map(|Done| ())
    }

    /// The root element's name.
    #[must_use]
    pub fn root_name(&self) -> &str {
        self.root.name()
    }

    /// Closes the root element and flushes the sink.
    ///
    /// # Errors
    ///
    /// The first sink error of the document, if any write failed, including
    /// failures recorded while dropping element handles.
    pub fn finish(mut self) -> Result<()> {
        self.root.close(&mut self.sink)?;
        self.sink.flush()?;
        tracing::debug!(root = self.root.name(), "document finished");
        Ok(())
    }
}

impl<W: Write> Drop for Document<W> {
    fn drop(&mut self) {
        self.root.close_quietly(&mut self.sink);
        if !self.sink.is_poisoned() {
            let _ = self.sink.flush();
        }
    }
}

impl<W: Write> fmt::Debug for Document<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root)
            .field("indent", &self.sink.indent)
            .finish_non_exhaustive()
    }
}

/// The `<?xml ... ?>` declaration line, without its newline.
struct Prolog<'a> {
    encoding: &'a str,
    standalone: bool,
}

impl Display for Prolog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<?xml version=\"1.0\" encoding=\"{}\" standalone=\"{}\" ?>",
            escape::Attribute(self.encoding),
            if self.standalone { "yes" } else { "no" }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::{Error, Operation};
    use crate::serial::sink::testing::FailingWriter;
    use crate::util::name::NamePolicy;

    const PROLOG: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\n";

    fn render(build: impl FnOnce(&mut Document<&mut Vec<u8>>) -> Result<()>) -> String {
        let mut out = Vec::new();
        {
            let mut doc = Document::new(&mut out, "root").unwrap();
            build(&mut doc).unwrap();
            doc.finish().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_prolog_display() {
        let prolog = Prolog {
            encoding: "latin-9",
            standalone: false,
        };
        assert_eq!(
            prolog.to_string(),
            "<?xml version=\"1.0\" encoding=\"latin-9\" standalone=\"no\" ?>"
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render(|_| Ok(())), format!("{PROLOG}<root />\n"));
    }

    #[test]
    fn test_root_attribute_escaped() {
        let xml = render(|doc| doc.attr("lang", "en&fr").map(|_| ()));
        assert_eq!(xml, format!("{PROLOG}<root lang=\"en&amp;fr\" />\n"));
    }

    #[test]
    fn test_one_child() {
        let xml = render(|doc| doc.tag("foo")?.finish());
        assert_eq!(xml, format!("{PROLOG}<root>\n  <foo />\n</root>\n"));
    }

    #[test]
    fn test_sibling_order() {
        let xml = render(|doc| {
            doc.tag("foo")?.finish()?;
            doc.tag("bar")?.finish()
        });
        assert_eq!(xml, format!("{PROLOG}<root>\n  <foo />\n  <bar />\n</root>\n"));
    }

    #[test]
    fn test_nested_tree_and_leaf() {
        let xml = render(|doc| {
            doc.tag("child")?.with_attr("attr", "v")?.text("text")?;
            let mut nested = doc.tree("nested")?;
            nested.tag("leaf")?.finish()?;
            nested.finish()
        });
        assert_eq!(
            xml,
            format!(
                "{PROLOG}<root>\n  <child attr=\"v\">text</child>\n  <nested>\n    <leaf />\n  </nested>\n</root>\n"
            )
        );
    }

    #[test]
    fn test_leaf_with_child_closes_inline() {
        let xml = render(|doc| {
            let mut outer = doc.tag("outer")?;
            outer.tag("inner")?.finish()?;
            outer.finish()
        });
        assert_eq!(
            xml,
            format!("{PROLOG}<root>\n  <outer>\n    <inner />\n</outer>\n</root>\n")
        );
    }

    #[test]
    fn test_select_with_open() {
        let xml = render(|doc| {
            let mut t = doc.open(Tree("t"))?;
            t.open(Tag("x"))?.text(1)?;
            Ok(())
        });
        assert_eq!(
            xml,
            format!("{PROLOG}<root>\n  <t>\n    <x>1</x>\n  </t>\n</root>\n")
        );
    }

    #[test]
    fn test_attribute_after_content_rejected_without_output() {
        let mut out = Vec::new();
        {
            let mut doc = Document::new(&mut out, "root").unwrap();
            doc.tag("a").unwrap().finish().unwrap();
            let err = doc.attr("late", 1).unwrap_err();
            assert!(matches!(
                err,
                Error::IllegalState {
                    operation: Operation::AttributeAfterContent,
                    ..
                }
            ));
            doc.finish().unwrap();
        }
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{PROLOG}<root>\n  <a />\n</root>\n")
        );
    }

    #[test]
    fn test_invalid_root_writes_nothing() {
        let mut out = Vec::new();
        let config = Config::default().names(NamePolicy::Xml);
        let err = Document::with_config(&mut out, "1root", config).unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_unsupported_transcoding_writes_nothing() {
        let mut out = Vec::new();
        let config = Config::default().encoding("latin-9").transcode(true);
        let err = Document::with_config(&mut out, "root", config).unwrap_err();
        assert!(matches!(err, Error::UnsupportedEncoding(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_drop_closes_root() {
        let mut out = Vec::new();
        {
            let mut doc = Document::new(&mut out, "root").unwrap();
            let _child = doc.tree("open").unwrap();
        }
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{PROLOG}<root>\n  <open />\n</root>\n")
        );
    }

    #[test]
    fn test_finish_reports_failure_from_drop() {
        let prolog_len = PROLOG.len();
        // Room for the prolog, "<root>\n" and "  <a" only.
        let mut sink = FailingWriter::new(prolog_len + 7 + 4);
        let mut doc = Document::new(&mut sink, "root").unwrap();
        {
            let _a = doc.tag("a").unwrap();
        }
        let err = doc.finish().unwrap_err();
        assert!(matches!(
            err,
            Error::Io(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe && e.to_string() == "sink closed"
        ));
    }

    #[test]
    fn test_transcoded_prolog_declares_resolved_encoding() {
        let mut out = Vec::new();
        let config = Config::default().encoding("ISO-8859-1").transcode(true);
        {
            let mut doc = Document::with_config(&mut out, "p", config).unwrap();
            doc.leaf("v", "\u{20ac}").unwrap();
            doc.finish().unwrap();
        }
        let expected: &[u8] = b"<?xml version=\"1.0\" encoding=\"windows-1252\" standalone=\"yes\" ?>\n\
            <p>\n  <v>\x80</v>\n</p>\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_unencodable_name_rejected_when_transcoding() {
        let mut out = Vec::new();
        let config = Config::default()
            .encoding("ISO-8859-15")
            .transcode(true)
            .names(NamePolicy::Xml);
        {
            let mut doc = Document::with_config(&mut out, "root", config).unwrap();
            let err = doc.tag("\u{3a9}").unwrap_err();
            assert!(matches!(err, Error::InvalidName { kind: NameKind::Element, .. }));
            doc.attr("\u{3a9}", 1).unwrap_err();
            doc.leaf("t", "\u{3a9}").unwrap();
            doc.finish().unwrap();
        }
        let xml = String::from_utf8(out).unwrap();
        assert!(!xml.contains("<&#"));
        assert!(xml.ends_with("<root>\n  <t>&#937;</t>\n</root>\n"));
    }

    #[test]
    fn test_unencodable_root_writes_nothing() {
        let mut out = Vec::new();
        let config = Config::default().encoding("ISO-8859-15").transcode(true);
        let err = Document::with_config(&mut out, "\u{3a9}", config).unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        assert!(out.is_empty());
    }
}
