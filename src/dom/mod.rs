//! In-memory document tree.
//!
//! The tree is fully materialized before any renderer sees it: an ordered,
//! acyclic hierarchy of elements, text, CDATA sections, comments, and
//! processing instructions. Renderers only read it; nothing here mutates a
//! parsed document.

mod parser;

pub use parser::parse_document;

use std::path::Path;

use crate::error::Result;

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct Document {
    /// The document element.
    pub root: Element,
}

impl Document {
    /// Parse a document from a string slice.
    pub fn parse_str(xml: &str) -> Result<Document> {
        parse_document(xml)
    }

    /// Read and parse a document from a file. A UTF-8 BOM is tolerated.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8(parser::strip_bom(&bytes).to_vec())?;
        parse_document(&content)
    }
}

/// A single node in the document tree.
#[derive(Debug, Clone)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
}

/// An element node: local name, resolved namespace, attributes, and ordered
/// children.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub local_name: String,
    /// Resolved namespace URI, `None` when the element is unqualified.
    pub namespace: Option<String>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<XmlNode>,
}

/// An attribute with both its literal qualified name and its resolved
/// namespace binding.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Name as written in the source, e.g. `xlink:href` or `xml:id`.
    pub qualified_name: String,
    pub local_name: String,
    pub namespace: Option<String>,
    pub value: String,
}

impl Element {
    /// True when this element has the given namespace URI and local name.
    pub fn is_named(&self, namespace: &str, local: &str) -> bool {
        self.local_name == local && self.namespace.as_deref() == Some(namespace)
    }

    /// Attribute value by literal qualified name (`getAttribute` semantics).
    pub fn attr(&self, qualified_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.qualified_name == qualified_name)
            .map(|a| a.value.as_str())
    }

    /// Attribute value by namespace URI and local name (`getAttributeNS`
    /// semantics).
    pub fn attr_ns(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.local_name == local && a.namespace.as_deref() == Some(namespace))
            .map(|a| a.value.as_str())
    }

    /// Child element nodes in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Concatenated text of all descendant text and CDATA nodes, in document
    /// order (`getTextContent` semantics).
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
                XmlNode::Comment(_) | XmlNode::ProcessingInstruction(_) => {}
            }
        }
    }

    /// Descendant elements matching a namespace URI and local name, in
    /// document order. The element itself is not included
    /// (`getElementsByTagNameNS` semantics).
    pub fn descendants_ns<'a>(&'a self, namespace: &str, local: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(namespace, local, &mut found);
        found
    }

    fn collect_descendants<'a>(
        &'a self,
        namespace: &str,
        local: &str,
        found: &mut Vec<&'a Element>,
    ) {
        for child in self.child_elements() {
            if child.is_named(namespace, local) {
                found.push(child);
            }
            child.collect_descendants(namespace, local, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:example";

    fn sample() -> Document {
        Document::parse_str(
            r#"<root xmlns="urn:example" xmlns:x="urn:other">
  <a id="first"><b>one</b></a>
  <a x:ref="r2">two<b>three</b></a>
  <c><a>nested</a></c>
</root>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_attr_by_qualified_name() {
        let doc = sample();
        let a = doc.root.child_elements().next().unwrap();
        assert_eq!(a.attr("id"), Some("first"));
        assert_eq!(a.attr("missing"), None);
    }

    #[test]
    fn test_attr_by_namespace() {
        let doc = sample();
        let second = doc.root.child_elements().nth(1).unwrap();
        assert_eq!(second.attr_ns("urn:other", "ref"), Some("r2"));
        assert_eq!(second.attr_ns("urn:example", "ref"), None);
        // Qualified-name lookup still sees the prefixed form.
        assert_eq!(second.attr("x:ref"), Some("r2"));
    }

    #[test]
    fn test_text_content_spans_descendants() {
        let doc = sample();
        let second = doc.root.child_elements().nth(1).unwrap();
        assert_eq!(second.text_content(), "twothree");
    }

    #[test]
    fn test_descendants_ns_document_order() {
        let doc = sample();
        let all_a = doc.root.descendants_ns(NS, "a");
        assert_eq!(all_a.len(), 3);
        assert_eq!(all_a[2].text_content(), "nested");

        // Namespace must match, not just the local name.
        assert!(doc.root.descendants_ns("urn:other", "a").is_empty());
    }

    #[test]
    fn test_is_named() {
        let doc = sample();
        assert!(doc.root.is_named(NS, "root"));
        assert!(!doc.root.is_named("urn:other", "root"));
    }
}
