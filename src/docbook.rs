//! DocBook vocabulary constants and shared tree lookups.
//!
//! Every renderer needs the same two lookups: the document title declared
//! under `<info>`, and the text of the first matching descendant of an
//! element (section titles, list-item paragraphs). They live here so the
//! renderers stay pure traversal code.

use crate::dom::{Document, Element};

/// The DocBook 5 namespace.
pub const DOCBOOK_NS: &str = "http://docbook.org/ns/docbook";

/// The XLink namespace, used for `xlink:href` on links.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// The document title: text of the first `title` inside the first `info`
/// element, both in the DocBook namespace. `None` when either is absent —
/// a missing title is never an error; callers decide what to do.
pub fn info_title(doc: &Document) -> Option<String> {
    let infos = doc.root.descendants_ns(DOCBOOK_NS, "info");
    let info = infos.first()?;

    let titles = info.descendants_ns(DOCBOOK_NS, "title");
    titles.first().map(|title| title.text_content())
}

/// Text content of the first DocBook-namespace descendant of `parent` with
/// the given local name, in document order. `None` when no such element
/// exists.
pub fn first_child_text(parent: &Element, local: &str) -> Option<String> {
    parent
        .descendants_ns(DOCBOOK_NS, local)
        .first()
        .map(|e| e.text_content())
}
