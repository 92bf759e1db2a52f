//! Scoped element writers.
//!
//! An [`ElementWriter`] is a handle on one open element. Opening it writes
//! the indentation and `<name`; the closing `>` is deferred until the first
//! child or text arrives, so an element that never receives content can
//! still render self-closed. When the handle is finished (or dropped) it
//! writes exactly one of three closing forms:
//!
//! | state         | flavor | output              |
//! |---------------|--------|---------------------|
//! | no content    | any    | ` />`               |
//! | has content   | `Leaf` | `</name>`           |
//! | has content   | `Tree` | indent + `</name>`  |
//!
//! each followed by a newline.
//!
//! A child handle mutably borrows the sink from its parent, so the parent
//! cannot be written to, or finished, until the child is gone. This makes
//! the closing order the exact reverse of the opening order.

use std::fmt::{self, Display};
use std::io::Write;
use std::mem;

use crate::error::{Error, NameKind, Operation, Result};
use crate::escape;

use super::sink::Sink;

/// How an element closes once it has content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// Closes inline, right after its last write: `<title>Dune</title>`.
    Leaf,
    /// Closes on its own line at the element's indentation.
    Tree,
}

/// Whether an element has written anything past its start tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentState {
    Empty,
    HasContent,
    Closed,
}

/// An attribute to add to an element. Built at the call site and written
/// immediately.
#[derive(Debug, Clone, Copy)]
pub struct Attr<'n, V> {
    /// Attribute name.
    pub name: &'n str,
    /// Attribute value, rendered with its `Display` implementation.
    pub value: V,
}

impl<'n, V: Display> Attr<'n, V> {
    /// Creates an attribute.
    pub fn new(name: &'n str, value: V) -> Self {
        Self { name, value }
    }
}

/// Selects a child that closes inline ([`Flavor::Leaf`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'n>(pub &'n str);

/// Selects a child that closes on its own line ([`Flavor::Tree`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tree<'n>(pub &'n str);

/// A child selector accepted by [`ElementWriter::open`] and
/// [`Document::open`](crate::Document::open).
pub trait Selector {
    /// The child element's name.
    fn name(&self) -> &str;
    /// The child element's flavor.
    fn flavor(&self) -> Flavor;
}

impl Selector for Tag<'_> {
    fn name(&self) -> &str {
        self.0
    }

    fn flavor(&self) -> Flavor {
        Flavor::Leaf
    }
}

impl Selector for Tree<'_> {
    fn name(&self) -> &str {
        self.0
    }

    fn flavor(&self) -> Flavor {
        Flavor::Tree
    }
}

/// Returned by [`ElementWriter::text`]. The element it came from is already
/// closed, so nothing further can be written to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Done;

/// The state machine behind every open element, independent of how the
/// sink is reached. Shared by [`ElementWriter`] and the document root.
#[derive(Debug)]
pub(crate) struct Node {
    name: String,
    depth: usize,
    flavor: Flavor,
    state: ContentState,
}

impl Node {
    /// Writes the indentation and `<name` for a new element.
    pub(crate) fn open<W: Write>(
        sink: &mut Sink<W>,
        name: &str,
        depth: usize,
        flavor: Flavor,
    ) -> Result<Self> {
        sink.check_name(NameKind::Element, name)?;
        let prefix = sink.indent.display(depth);
        sink.emit(format_args!("{prefix}<{name}"))?;
        tracing::trace!(name, depth, ?flavor, "open element");
        Ok(Self {
            name: name.to_string(),
            depth,
            flavor,
            state: ContentState::Empty,
        })
    }

    pub(crate) fn attr<W: Write>(
        &mut self,
        sink: &mut Sink<W>,
        name: &str,
        value: impl Display,
    ) -> Result<()> {
        if self.state != ContentState::Empty {
            return Err(Error::illegal(&self.name, Operation::AttributeAfterContent));
        }
        sink.check_name(NameKind::Attribute, name)?;
        sink.emit(format_args!(" {name}=\"{}\"", escape::Attribute(value)))
    }

    pub(crate) fn child<W: Write>(
        &mut self,
        sink: &mut Sink<W>,
        name: &str,
        flavor: Flavor,
    ) -> Result<Self> {
        // Reject the name before the parent's start tag is terminated.
        sink.check_name(NameKind::Element, name)?;
        if self.state == ContentState::Empty {
            sink.emit(format_args!(">\n"))?;
            self.state = ContentState::HasContent;
        }
        let depth = sink.indent.child_depth(self.depth);
        Self::open(sink, name, depth, flavor)
    }

    /// Writes a text payload and closes the element.
    pub(crate) fn text<W: Write>(&mut self, sink: &mut Sink<W>, value: impl Display) -> Result<()> {
        if self.flavor == Flavor::Tree {
            return Err(Error::illegal(&self.name, Operation::TextInTree));
        }
        if self.state != ContentState::Empty {
            return Err(Error::illegal(&self.name, Operation::TextAfterContent));
        }
        sink.emit(format_args!(">{}", escape::Text(value)))?;
        self.state = ContentState::HasContent;
        self.close(sink)
    }

    /// Writes the closing form. Only the first call writes anything.
    pub(crate) fn close<W: Write>(&mut self, sink: &mut Sink<W>) -> Result<()> {
        let state = mem::replace(&mut self.state, ContentState::Closed);
        let name = &self.name;
        let result = match (state, self.flavor) {
            (ContentState::Closed, _) => return Ok(()),
            (ContentState::Empty, _) => sink.emit(format_args!(" />\n")),
            (ContentState::HasContent, Flavor::Leaf) => sink.emit(format_args!("</{name}>\n")),
            (ContentState::HasContent, Flavor::Tree) => {
                let prefix = sink.indent.display(self.depth);
                sink.emit(format_args!("{prefix}</{name}>\n"))
            }
        };
        tracing::trace!(name = %self.name, depth = self.depth, "close element");
        result
    }

    /// Closes from a destructor, where errors cannot be returned.
    pub(crate) fn close_quietly<W: Write>(&mut self, sink: &mut Sink<W>) {
        if self.state == ContentState::Closed {
            return;
        }
        let was_poisoned = sink.is_poisoned();
        if let Err(e) = self.close(sink) {
            // A poisoned sink already reported its failure.
            if !was_poisoned {
                tracing::warn!(element = %self.name, error = %e, "failed to close element on drop");
                sink.defer(e);
            }
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub(crate) fn has_content(&self) -> bool {
        self.state != ContentState::Empty
    }
}

/// A handle on one open element.
///
/// Obtained from [`Document::tag`](crate::Document::tag),
/// [`Document::tree`](crate::Document::tree) or the same methods on a
/// parent `ElementWriter`. The element is closed by [`finish`](Self::finish),
/// by [`text`](Self::text), or when the handle is dropped, whichever comes
/// first. Dropping is what keeps the output balanced on early returns and
/// panics; `finish` is the way to observe write errors from the close.
///
/// # Examples
///
/// ```
/// use xmlscribe::Document;
///
/// let mut out = Vec::new();
/// {
///     let mut doc = Document::new(&mut out, "bookstore")?;
///     let mut book = doc.tree("book")?.with_attr("category", "fiction")?;
///     book.tag("title")?.text("The Time Machine")?;
///     book.tag("price")?.with_attr("currency", "USD")?.text(15.99)?;
///     book.finish()?;
///     doc.finish()?;
/// }
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\n\
///      <bookstore>\n\
///      \x20 <book category=\"fiction\">\n\
///      \x20   <title>The Time Machine</title>\n\
///      \x20   <price currency=\"USD\">15.99</price>\n\
///      \x20 </book>\n\
///      </bookstore>\n"
/// );
/// # Ok::<(), xmlscribe::Error>(())
/// ```
pub struct ElementWriter<'a, W: Write> {
    sink: &'a mut Sink<W>,
    node: Node,
}

impl<'a, W: Write> ElementWriter<'a, W> {
    pub(crate) fn from_parts(sink: &'a mut Sink<W>, node: Node) -> Self {
        Self { sink, node }
    }

    /// Adds an attribute.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalState`] once the element has content,
    /// [`Error::InvalidName`] if the name policy rejects `name`, or a sink
    /// error. Nothing is written on a structural error.
    pub fn attr(&mut self, name: &str, value: impl Display) -> Result<&mut Self> {
        self.node.attr(self.sink, name, value)?;
        Ok(self)
    }

    /// Consuming form of [`attr`](Self::attr), for building a handle in one
    /// expression.
    ///
    /// # Errors
    ///
    /// Same as [`attr`](Self::attr).
    pub fn with_attr(mut self, name: &str, value: impl Display) -> Result<Self> {
        self.node.attr(self.sink, name, value)?;
        Ok(self)
    }

    /// Adds a prebuilt [`Attr`].
    ///
    /// # Errors
    ///
    /// Same as [`attr`](Self::attr).
    pub fn add<V: Display>(&mut self, attr: Attr<'_, V>) -> Result<&mut Self> {
        self.attr(attr.name, attr.value)
    }

    /// Opens a child that closes inline.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidName`] (nothing written) or a sink error.
    pub fn tag(&mut self, name: &str) -> Result<ElementWriter<'_, W>> {
        self.open(Tag(name))
    }

    /// Opens a child that closes on its own indented line.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidName`] (nothing written) or a sink error.
    pub fn tree(&mut self, name: &str) -> Result<ElementWriter<'_, W>> {
        self.open(Tree(name))
    }

    /// Opens a child chosen by a [`Tag`] or [`Tree`] selector.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidName`] (nothing written) or a sink error.
    pub fn open<S: Selector>(&mut self, selector: S) -> Result<ElementWriter<'_, W>> {
        let node = self.node.child(self.sink, selector.name(), selector.flavor())?;
        Ok(ElementWriter::from_parts(self.sink, node))
    }

    /// Writes `<name>value</name>` as a child.
    ///
    /// # Errors
    ///
    /// Same as [`tag`](Self::tag) and [`text`](Self::text).
    pub fn leaf(&mut self, name: &str, value: impl Display) -> Result<()> {
        self.tag(name)?.text(value).map(|Done| ())
    }

    /// Writes a text payload and closes the element.
    ///
    /// Only valid on a [`Flavor::Leaf`] element that has no content yet.
    /// The handle is consumed either way; on a structural error it is
    /// closed normally when dropped and nothing from this call is written.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalState`] on a tree element or after content, or a
    /// sink error.
    pub fn text(mut self, value: impl Display) -> Result<Done> {
        self.node.text(self.sink, value)?;
        Ok(Done)
    }

    /// Closes the element, reporting any write error.
    ///
    /// # Errors
    ///
    /// A sink error, if the closing tag could not be written.
    pub fn finish(mut self) -> Result<()> {
        self.node.close(self.sink)
    }

    /// The element's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.node.name()
    }

    /// The element's indentation depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.node.depth()
    }

    /// The element's flavor.
    #[must_use]
    pub fn flavor(&self) -> Flavor {
        self.node.flavor()
    }

    /// Returns `true` once a child or text has been written.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.node.has_content()
    }
}

impl<W: Write> Drop for ElementWriter<'_, W> {
    fn drop(&mut self) {
        self.node.close_quietly(self.sink);
    }
}

impl<W: Write> fmt::Debug for ElementWriter<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementWriter")
            .field("name", &self.node.name)
            .field("depth", &self.node.depth)
            .field("flavor", &self.node.flavor)
            .field("state", &self.node.state)
            .finish()
    }
}
