//! Command-line demo for xmlscribe.
//!
//! Streams a bookstore catalog to stdout or a file, exercising every
//! element shape the writer produces: tree elements with attributes, inline
//! text leaves, self-closed elements, and nested trees.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use xmlscribe::{Config, Document, NamePolicy};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// xmlscribe -- stream an indented XML catalog.
#[derive(Parser, Debug)]
#[command(name = "xmlscribe", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Character used for indentation.
    #[arg(long, value_name = "CHAR", default_value_t = ' ')]
    indent_char: char,

    /// Indentation added per nesting level.
    #[arg(long, value_name = "N", default_value_t = 2)]
    indent_width: usize,

    /// Indent with one tab per level (overrides --indent-char/--indent-width).
    #[arg(long)]
    tabs: bool,

    /// Encoding declared in the prolog.
    #[arg(long, value_name = "ENCODING", default_value = "UTF-8")]
    encoding: String,

    /// Transcode the output into the declared encoding.
    #[arg(long)]
    transcode: bool,

    /// Declare standalone="no".
    #[arg(long)]
    not_standalone: bool,

    /// Reject element and attribute names that are not XML 1.0 names.
    #[arg(long)]
    strict_names: bool,

    /// Number of generated books appended after the fixed catalog.
    #[arg(long, value_name = "N", default_value_t = 0)]
    records: usize,

    /// Write to a file instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    output: Option<String>,
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

const EXIT_SUCCESS: u8 = 0;
const EXIT_WRITE_ERROR: u8 = 1;
const EXIT_OUTPUT_ERROR: u8 = 2;

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = config_from(&cli);
    let result = match cli.output.as_deref() {
        Some(path) => match File::create(path) {
            Ok(file) => write_catalog(BufWriter::new(file), &config, cli.records),
            Err(e) => {
                eprintln!("{path}: failed to create: {e}");
                return ExitCode::from(EXIT_OUTPUT_ERROR);
            }
        },
        None => write_catalog(io::stdout().lock(), &config, cli.records),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("xmlscribe: {e}");
            ExitCode::from(EXIT_WRITE_ERROR)
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn config_from(cli: &Cli) -> Config {
    let (ch, width) = if cli.tabs {
        ('\t', 1)
    } else {
        (cli.indent_char, cli.indent_width)
    };
    Config::default()
        .indent(ch, width)
        .encoding(&cli.encoding)
        .standalone(!cli.not_standalone)
        .transcode(cli.transcode)
        .names(if cli.strict_names {
            NamePolicy::Xml
        } else {
            NamePolicy::Permissive
        })
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

struct Book<'a> {
    category: &'a str,
    lang: &'a str,
    title: &'a str,
    author: &'a str,
    currency: &'a str,
    price: f64,
}

const BOOKS: &[Book<'static>] = &[
    Book {
        category: "fiction",
        lang: "en",
        title: "The Time Machine",
        author: "H. G. Wells",
        currency: "USD",
        price: 15.99,
    },
    Book {
        category: "history",
        lang: "fr",
        title: "Les Misérables",
        author: "Victor Hugo",
        currency: "EUR",
        price: 12.5,
    },
];

fn write_book<W: Write>(doc: &mut Document<W>, book: &Book<'_>) -> xmlscribe::Result<()> {
    let mut el = doc
        .tree("book")?
        .with_attr("category", book.category)?
        .with_attr("lang", book.lang)?;
    el.leaf("title", book.title)?;
    el.leaf("author", book.author)?;
    el.tag("price")?
        .with_attr("currency", book.currency)?
        .text(book.price)?;
    el.finish()
}

fn write_catalog<W: Write>(sink: W, config: &Config, records: usize) -> xmlscribe::Result<()> {
    let mut doc = Document::with_config(sink, "bookstore", config.clone())?;

    for book in BOOKS {
        write_book(&mut doc, book)?;
    }

    doc.tree("magazine")?
        .with_attr("title", "Science Weekly")?
        .finish()?;

    let mut newspaper = doc.tree("newspaper")?.with_attr("date", "2025-07-14")?;
    newspaper.leaf("headline", "AI Advances in Compile-Time XML")?;
    newspaper.finish()?;

    for i in 0..records {
        let title = format!("Volume {}", i + 1);
        #[allow(clippy::cast_precision_loss)]
        let price = 5.0 + (i % 20) as f64;
        write_book(
            &mut doc,
            &Book {
                category: "generated",
                lang: "en",
                title: &title,
                author: "Anonymous",
                currency: "USD",
                price,
            },
        )?;
    }

    doc.finish()
}
