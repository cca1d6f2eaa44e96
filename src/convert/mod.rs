//! The converter contract and the built-in renderers.
//!
//! A converter reads one input file, renders it, and writes one output file.
//! The three built-ins (ASCII, Markdown, TOC-JSON) all parse DocBook XML via
//! [`Document::parse_file`](crate::dom::Document::parse_file) and differ only
//! in the traversal that produces the output string. Each exposes its pure
//! `render` function so the traversal can be tested on a constructed tree
//! without touching the filesystem.

use std::path::Path;

use crate::error::Result;

mod ascii;
mod markdown;
mod toc_json;

pub use ascii::AsciiConverter;
pub use markdown::MarkdownConverter;
pub use toc_json::TocJsonConverter;

/// The capability every renderer and every plugin must provide.
///
/// Implementations must be side-effect free beyond reading the input and
/// writing the output: no process termination, no shared mutable state
/// between invocations. Running the same conversion twice must produce
/// byte-identical output.
pub trait Converter {
    /// Convert the input file and write the result to the output file.
    fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}
