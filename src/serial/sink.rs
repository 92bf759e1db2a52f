//! The output sink shared by a document and all of its open elements.
//!
//! Every byte the writer produces goes through [`Sink::emit`]. Each chunk
//! is formatted into a reusable buffer before anything reaches the writer,
//! so a value whose `Display` implementation fails leaves no partial output.
//!
//! The first I/O failure poisons the sink: the error is returned once as
//! [`Error::Io`] and every later write is refused with
//! [`Error::Poisoned`] without touching the underlying writer. A failure
//! hit while dropping a handle has no caller to receive it, so it is kept
//! and handed to the next write, flush or `Document::finish` instead.

use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::io::{self, Write};

use crate::encoding::OutputEncoding;
use crate::error::{Error, NameKind, Result};
use crate::util::indent::Indentation;
use crate::util::name::NamePolicy;

pub(crate) struct Sink<W: Write> {
    inner: W,
    pub(crate) indent: Indentation,
    names: NamePolicy,
    encoding: Option<OutputEncoding>,
    buf: String,
    failed: Option<io::ErrorKind>,
    unreported: Option<io::Error>,
}

impl<W: Write> Sink<W> {
    pub(crate) fn new(
        inner: W,
        indent: Indentation,
        names: NamePolicy,
        encoding: Option<OutputEncoding>,
    ) -> Self {
        Self {
            inner,
            indent,
            names,
            // UTF-8 output needs no per-chunk work.
            encoding: encoding.filter(|enc| !enc.is_utf8()),
            buf: String::new(),
            failed: None,
            unreported: None,
        }
    }

    /// Validates an element or attribute name against the name policy and,
    /// when transcoding, against the output encoding. Character references
    /// are not allowed in names, so a name the encoding cannot represent is
    /// rejected here rather than escaped.
    pub(crate) fn check_name(&self, kind: NameKind, name: &str) -> Result<()> {
        self.names.check(kind, name)?;
        match self.encoding {
            Some(encoding) if !encoding.can_encode(name) => Err(Error::InvalidName {
                kind,
                name: name.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Writes formatted output, transcoding it when an output encoding is set.
    pub(crate) fn emit(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        self.ensure_usable()?;
        self.buf.clear();
        if self.buf.write_fmt(args).is_err() {
            return Err(Error::Format);
        }
        let result = {
            let bytes = match self.encoding {
                None => Cow::Borrowed(self.buf.as_bytes()),
                Some(encoding) => encoding.encode(&self.buf),
            };
            self.inner.write_all(&bytes)
        };
        result.map_err(|e| self.fail(e))
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        self.ensure_usable()?;
        self.inner.flush().map_err(|e| self.fail(e))
    }

    pub(crate) fn is_poisoned(&self) -> bool {
        self.failed.is_some()
    }

    /// Keeps an error raised where it could not be returned, so the next
    /// caller sees the original I/O error instead of [`Error::Poisoned`].
    pub(crate) fn defer(&mut self, err: Error) {
        if let Error::Io(err) = err {
            self.unreported.get_or_insert(err);
        }
    }

    fn ensure_usable(&mut self) -> Result<()> {
        match (self.failed, self.unreported.take()) {
            (None, _) => Ok(()),
            (Some(_), Some(err)) => Err(Error::Io(err)),
            (Some(kind), None) => Err(Error::Poisoned(kind)),
        }
    }

    fn fail(&mut self, err: io::Error) -> Error {
        tracing::debug!(kind = ?err.kind(), "output sink failed");
        self.failed = Some(err.kind());
        Error::Io(err)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{self, Write};

    /// A writer that accepts `budget` bytes and then fails every write.
    pub(crate) struct FailingWriter {
        pub(crate) written: Vec<u8>,
        pub(crate) budget: usize,
    }

    impl FailingWriter {
        pub(crate) fn new(budget: usize) -> Self {
            Self {
                written: Vec::new(),
                budget,
            }
        }
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() >= self.budget {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
            }
            let n = buf.len().min(self.budget - self.written.len());
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
