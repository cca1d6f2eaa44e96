//! # docshift
//!
//! A DocBook document converter with runtime-loadable renderer plugins.
//!
//! ## Features
//!
//! - Parse namespaced DocBook XML into an in-memory [`Document`] tree
//! - Render to plain text, Markdown, or a JSON table of contents
//! - Load converter implementations by name from shared libraries at run
//!   time, validated against a single [`Converter`] contract
//!
//! ## Quick Start
//!
//! ```no_run
//! use docshift::{Converter, MarkdownConverter};
//! use std::path::Path;
//!
//! let converter = MarkdownConverter::new();
//! converter
//!     .convert(Path::new("input.xml"), Path::new("output.md"))
//!     .unwrap();
//! ```
//!
//! ## Rendering without files
//!
//! ```
//! use docshift::{Document, AsciiConverter};
//!
//! let doc = Document::parse_str(
//!     r#"<article xmlns="http://docbook.org/ns/docbook">
//!          <info><title>Guide</title></info>
//!        </article>"#,
//! )
//! .unwrap();
//!
//! let text = AsciiConverter::new().render(&doc);
//! assert!(text.starts_with("Guide\n=====\n"));
//! ```
//!
//! ## Plugins
//!
//! The crate builds as both an rlib and a cdylib. The cdylib exports the
//! plugin declaration for the three built-in converters, registered as
//! `docshift::ascii`, `docshift::markdown`, and `docshift::toc_json`, so the
//! `docshift` driver can load it like any third-party plugin. External
//! plugins link against this crate and use [`declare_converters!`].

pub mod convert;
pub mod docbook;
pub mod dom;
pub mod error;
pub mod plugin;
pub(crate) mod util;

pub use convert::{AsciiConverter, Converter, MarkdownConverter, TocJsonConverter};
pub use dom::Document;
pub use error::{Error, Result};

fn ascii_ctor() -> std::result::Result<Box<dyn Converter>, String> {
    Ok(Box::new(AsciiConverter::new()))
}

fn markdown_ctor() -> std::result::Result<Box<dyn Converter>, String> {
    Ok(Box::new(MarkdownConverter::new()))
}

fn toc_json_ctor() -> std::result::Result<Box<dyn Converter>, String> {
    Ok(Box::new(TocJsonConverter::new()))
}

declare_converters! {
    "docshift::ascii" => ascii_ctor,
    "docshift::markdown" => markdown_ctor,
    "docshift::toc_json" => toc_json_ctor,
}
