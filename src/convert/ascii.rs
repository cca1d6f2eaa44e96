//! Plain-text rendering of DocBook documents.
//!
//! Sections become `-`-underlined headings, ordered lists become `1)` lines,
//! program listings are kept verbatim, and inline markup is flattened to
//! plain text (links keep their target in `<angle brackets>`).

use std::fs;
use std::path::Path;

use crate::convert::Converter;
use crate::docbook::{DOCBOOK_NS, XLINK_NS, first_child_text, info_title};
use crate::dom::{Document, Element, XmlNode};
use crate::error::Result;
use crate::util::{collapse_whitespace, is_blank};

/// Converter producing a plain-text rendering.
#[derive(Debug, Clone, Default)]
pub struct AsciiConverter;

impl AsciiConverter {
    pub fn new() -> Self {
        Self
    }

    /// Render a parsed document to the plain-text format.
    pub fn render(&self, doc: &Document) -> String {
        let mut out = String::new();

        if let Some(title) = info_title(doc)
            && !is_blank(&title)
        {
            out.push_str(&title);
            out.push('\n');
            out.push_str(&"=".repeat(title.chars().count().min(60)));
            out.push_str("\n\n");
        }

        traverse(&doc.root, &mut out, 0);
        out
    }
}

impl Converter for AsciiConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let doc = Document::parse_file(input)?;
        fs::write(output, self.render(&doc))?;
        Ok(())
    }
}

/// Visit element children in document order, dispatching on the DocBook
/// vocabulary. Unknown elements are transparent: their children are rendered
/// at the same depth.
fn traverse(parent: &Element, out: &mut String, depth: usize) {
    for child in parent.child_elements() {
        if child.is_named(DOCBOOK_NS, "section") {
            if let Some(title) = first_child_text(child, "title")
                && !is_blank(&title)
            {
                let title = collapse_whitespace(&title);
                out.push('\n');
                out.push_str(&title);
                out.push('\n');
                out.push_str(&"-".repeat(title.chars().count().min(50)));
                out.push_str("\n\n");
            }
            traverse(child, out, depth + 1);
        } else if child.is_named(DOCBOOK_NS, "para") {
            let text = plain_text_with_links(child);
            if !is_blank(&text) {
                out.push_str(text.trim());
                out.push_str("\n\n");
            }
        } else if child.is_named(DOCBOOK_NS, "orderedlist") {
            for (i, item) in child.descendants_ns(DOCBOOK_NS, "listitem").iter().enumerate() {
                let text = first_child_text(item, "para")
                    .unwrap_or_else(|| plain_text_with_links(item));
                out.push_str(&format!("{}) {}\n", i + 1, text.trim()));
            }
            out.push('\n');
        } else if child.is_named(DOCBOOK_NS, "programlisting") {
            // Verbatim block: direct text/CDATA children keep their internal
            // whitespace; only the edges of the whole block are trimmed.
            let mut code = String::new();
            for node in &child.children {
                match node {
                    XmlNode::Text(t) | XmlNode::CData(t) => code.push_str(t),
                    XmlNode::Element(e) => code.push_str(&plain_text_with_links(e)),
                    _ => {}
                }
            }
            let block = code.trim();
            if !block.is_empty() {
                out.push('\n');
                out.push_str(block);
                out.push_str("\n\n");
            }
        } else {
            traverse(child, out, depth);
        }
    }
}

/// Flatten inline content to plain text: links become `text <href>`, code
/// becomes backtick-quoted, nested titles get a `### ` marker, everything
/// else contributes its text. Whitespace runs collapse to single spaces.
fn plain_text_with_links(parent: &Element) -> String {
    let mut sb = String::new();

    for node in &parent.children {
        match node {
            XmlNode::Text(t) => sb.push_str(t),
            XmlNode::Element(e) => {
                if e.is_named(DOCBOOK_NS, "title") {
                    let txt = plain_text_with_links(e);
                    if !is_blank(&txt) {
                        sb.push_str("### ");
                        sb.push_str(txt.trim());
                        sb.push_str("\n\n");
                    }
                } else if e.is_named(DOCBOOK_NS, "link") {
                    let inner = plain_text_with_links(e);
                    let href = e.attr_ns(XLINK_NS, "href").unwrap_or("");
                    sb.push_str(inner.trim());
                    if !is_blank(href) {
                        sb.push_str(" <");
                        sb.push_str(href);
                        sb.push('>');
                    }
                } else if e.is_named(DOCBOOK_NS, "code") {
                    sb.push('`');
                    sb.push_str(plain_text_with_links(e).trim());
                    sb.push('`');
                } else {
                    sb.push_str(&plain_text_with_links(e));
                }
            }
            _ => {}
        }
    }

    collapse_whitespace(&sb)
}
