//! Markdown rendering of DocBook documents.
//!
//! Heading depth follows section nesting (`#` per level, starting at 1),
//! `emphasis` maps to `*`/`**`/`~~` by role, and links pick between
//! `<autolink>`, `[text](href)`, and `[text](href "title")` forms. Ordered
//! lists keep the `1)` numbering shared with the ASCII renderer rather than
//! native Markdown numbering, for output compatibility.

use std::fs;
use std::path::Path;

use crate::convert::Converter;
use crate::docbook::{DOCBOOK_NS, XLINK_NS, first_child_text, info_title};
use crate::dom::{Document, Element, XmlNode};
use crate::error::Result;
use crate::util::is_blank;

/// Converter producing a Markdown rendering.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter;

impl MarkdownConverter {
    pub fn new() -> Self {
        Self
    }

    /// Render a parsed document to Markdown.
    pub fn render(&self, doc: &Document) -> String {
        let mut out = String::new();

        // A document without a title is not an error; the H1 is just skipped.
        if let Some(title) = info_title(doc)
            && !is_blank(&title)
        {
            out.push_str("# ");
            out.push_str(title.trim());
            out.push_str("\n\n");
        }

        traverse(&doc.root, &mut out, 1);
        out
    }
}

impl Converter for MarkdownConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let doc = Document::parse_file(input)?;
        fs::write(output, self.render(&doc))?;
        Ok(())
    }
}

/// Visit element children in document order; `level` is the heading depth
/// for sections, starting at 1 for top-level sections.
fn traverse(parent: &Element, out: &mut String, level: usize) {
    for child in parent.child_elements() {
        if child.is_named(DOCBOOK_NS, "section") {
            if let Some(title) = first_child_text(child, "title")
                && !is_blank(&title)
            {
                out.push('\n');
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(title.trim());
                out.push_str("\n\n");
            }
            traverse(child, out, level + 1);
        } else if child.is_named(DOCBOOK_NS, "para") {
            let text = render_inline(child);
            if !is_blank(&text) {
                out.push_str(text.trim());
                out.push_str("\n\n");
            }
        } else if child.is_named(DOCBOOK_NS, "orderedlist") {
            render_ordered_list(child, out);
            out.push('\n');
        } else if child.is_named(DOCBOOK_NS, "programlisting") {
            let mut code = String::new();
            for node in &child.children {
                match node {
                    XmlNode::Text(t) | XmlNode::CData(t) => code.push_str(t),
                    XmlNode::Element(e) => code.push_str(&render_inline(e)),
                    _ => {}
                }
            }
            let block = code.trim();
            if !block.is_empty() {
                // The fence is opened but not closed; downstream tooling
                // expects the historical output format (see DESIGN.md).
                out.push_str("```");
                out.push('\n');
                out.push_str(block);
                out.push_str("\n\n");
            }
        } else {
            traverse(child, out, level);
        }
    }
}

/// Render inline content: emphasis by role, links by role/href/title, other
/// elements transparently. The result is not trimmed; callers decide.
fn render_inline(parent: &Element) -> String {
    let mut sb = String::new();

    for node in &parent.children {
        match node {
            XmlNode::Text(t) => sb.push_str(t),
            XmlNode::Element(e) => {
                if e.is_named(DOCBOOK_NS, "emphasis") {
                    let role = e.attr("role").unwrap_or("");
                    let inner = render_inline(e);
                    let inner = inner.trim();
                    if role.eq_ignore_ascii_case("strong") {
                        sb.push_str("**");
                        sb.push_str(inner);
                        sb.push_str("**");
                    } else if role.eq_ignore_ascii_case("strikethrough") {
                        sb.push_str("~~");
                        sb.push_str(inner);
                        sb.push_str("~~");
                    } else {
                        sb.push('*');
                        sb.push_str(inner);
                        sb.push('*');
                    }
                } else if e.is_named(DOCBOOK_NS, "link") {
                    render_link(e, &mut sb);
                } else {
                    sb.push_str(&render_inline(e));
                }
            }
            _ => {}
        }
    }

    sb
}

fn render_link(link: &Element, sb: &mut String) {
    let href = link.attr_ns(XLINK_NS, "href").unwrap_or("");
    let inner = render_inline(link);
    let mut text = inner.trim();
    if is_blank(text) {
        text = href;
    }

    if is_blank(href) {
        sb.push_str(text);
        return;
    }

    let role = link.attr("role").unwrap_or("");
    let angle_brackets = role.eq_ignore_ascii_case("uri") || href == text;

    if angle_brackets {
        sb.push('<');
        sb.push_str(href);
        sb.push('>');
    } else {
        let title = link.attr("title").unwrap_or("");
        if !is_blank(title) {
            sb.push_str(&format!("[{text}]({href} \"{title}\")"));
        } else {
            sb.push_str(&format!("[{text}]({href})"));
        }
    }
}

/// Render an `orderedlist` as `1)` numbered lines, 1-based, document order.
fn render_ordered_list(list: &Element, out: &mut String) {
    for (i, item) in list.descendants_ns(DOCBOOK_NS, "listitem").iter().enumerate() {
        let text = first_child_text(item, "para").unwrap_or_else(|| render_inline(item));
        out.push_str(&format!("{}) {}\n", i + 1, text.trim()));
    }
}
