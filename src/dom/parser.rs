//! Namespace-aware XML parsing into the document tree.
//!
//! Built on `quick_xml::NsReader`. Text is not trimmed during parsing —
//! whitespace is significant inside verbatim blocks, so normalization is
//! left to the renderers. Entity references arrive as `GeneralRef` events
//! and are resolved into text nodes here.

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crate::dom::{Attribute, Document, Element, XmlNode};
use crate::error::{Error, Result};

/// Parse a complete XML document into a [`Document`] tree.
pub fn parse_document(xml: &str) -> Result<Document> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().check_end_names = true;

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let element = build_element(&reader, &e);
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = build_element(&reader, &e);
                close_element(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::MissingElement("unbalanced end tag".to_string()))?;
                close_element(&mut stack, &mut root, element);
            }
            Event::Text(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                attach(&mut stack, XmlNode::Text(text));
            }
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Some(resolved) = resolve_entity(&entity) {
                    attach(&mut stack, XmlNode::Text(resolved));
                }
            }
            Event::CData(e) => {
                let data = String::from_utf8_lossy(&e).into_owned();
                attach(&mut stack, XmlNode::CData(data));
            }
            Event::Comment(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                attach(&mut stack, XmlNode::Comment(text));
            }
            Event::PI(e) => {
                let content = String::from_utf8_lossy(&e).into_owned();
                attach(&mut stack, XmlNode::ProcessingInstruction(content));
            }
            Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if !stack.is_empty() {
        return Err(Error::MissingElement(
            "document ended with unclosed elements".to_string(),
        ));
    }

    root.map(|root| Document { root })
        .ok_or_else(|| Error::MissingElement("document has no root element".to_string()))
}

/// Build an element from a start tag, resolving its namespace and attributes
/// against the reader's in-scope bindings.
fn build_element(reader: &NsReader<&[u8]>, e: &BytesStart) -> Element {
    let (resolve, local) = reader.resolver().resolve_element(e.name());

    let mut attributes = Vec::new();
    for attr in e.attributes().flatten() {
        let qname = attr.key.as_ref();
        // Namespace declarations are bindings, not data attributes.
        if qname == b"xmlns" || qname.starts_with(b"xmlns:") {
            continue;
        }

        let (attr_resolve, attr_local) = reader.resolver().resolve_attribute(attr.key);
        let raw = String::from_utf8_lossy(&attr.value).into_owned();
        let value = match quick_xml::escape::unescape(&raw) {
            Ok(unescaped) => unescaped.into_owned(),
            Err(_) => raw,
        };

        attributes.push(Attribute {
            qualified_name: String::from_utf8_lossy(qname).into_owned(),
            local_name: String::from_utf8_lossy(attr_local.into_inner()).into_owned(),
            namespace: namespace_uri(attr_resolve),
            value,
        });
    }

    Element {
        local_name: String::from_utf8_lossy(local.into_inner()).into_owned(),
        namespace: namespace_uri(resolve),
        attributes,
        children: Vec::new(),
    }
}

fn namespace_uri(resolve: ResolveResult) -> Option<String> {
    match resolve {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.into_inner()).into_owned()),
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    }
}

/// Attach a finished element to its parent, or promote it to document root.
fn close_element(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Attach a non-element node to the current open element. Content outside the
/// document element (prolog whitespace, trailing comments) is discarded.
fn attach(stack: &mut [Element], node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

/// Strip UTF-8 BOM if present.
pub(crate) fn strip_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bom() {
        let with_bom = &[0xEF, 0xBB, 0xBF, b'h', b'i'];
        assert_eq!(strip_bom(with_bom), b"hi");
        assert_eq!(strip_bom(b"hello"), b"hello");
        assert_eq!(strip_bom(&[]), b"");
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("apos"), Some("'".to_string()));
        assert_eq!(resolve_entity("amp"), Some("&".to_string()));
        assert_eq!(resolve_entity("#65"), Some("A".to_string()));
        assert_eq!(resolve_entity("#x2019"), Some("\u{2019}".to_string()));
        assert_eq!(resolve_entity("nbsp"), None);
    }

    #[test]
    fn test_parse_default_namespace() {
        let doc = parse_document(
            r#"<article xmlns="http://docbook.org/ns/docbook"><para>hi</para></article>"#,
        )
        .unwrap();

        assert_eq!(doc.root.local_name, "article");
        assert_eq!(
            doc.root.namespace.as_deref(),
            Some("http://docbook.org/ns/docbook")
        );

        let para = doc.root.child_elements().next().unwrap();
        assert_eq!(
            para.namespace.as_deref(),
            Some("http://docbook.org/ns/docbook")
        );
        assert_eq!(para.text_content(), "hi");
    }

    #[test]
    fn test_parse_prefixed_attribute() {
        let doc = parse_document(
            r#"<a xmlns:xlink="http://www.w3.org/1999/xlink">
                 <link xlink:href="http://example.com">text</link>
               </a>"#,
        )
        .unwrap();

        let link = find_by_local_name(&doc.root, "link").expect("link element");
        assert_eq!(
            link.attr_ns("http://www.w3.org/1999/xlink", "href"),
            Some("http://example.com")
        );
        assert_eq!(link.attr("xlink:href"), Some("http://example.com"));
    }

    #[test]
    fn test_parse_entities_in_text() {
        let doc = parse_document("<a>fish &amp; chips &#x2019;</a>").unwrap();
        assert_eq!(doc.root.text_content(), "fish & chips \u{2019}");
    }

    #[test]
    fn test_parse_entities_in_attribute() {
        let doc = parse_document(r#"<a href="x?a=1&amp;b=2"/>"#).unwrap();
        assert_eq!(doc.root.attr("href"), Some("x?a=1&b=2"));
    }

    #[test]
    fn test_parse_cdata_preserved_verbatim() {
        let doc = parse_document("<a><![CDATA[  if (x < 1) { y(); }  ]]></a>").unwrap();
        assert_eq!(doc.root.text_content(), "  if (x < 1) { y(); }  ");
        assert!(matches!(doc.root.children[0], XmlNode::CData(_)));
    }

    #[test]
    fn test_parse_comment_and_pi_nodes() {
        let doc = parse_document("<a><!-- note --><?target data?>text</a>").unwrap();
        assert!(matches!(doc.root.children[0], XmlNode::Comment(_)));
        assert!(matches!(
            doc.root.children[1],
            XmlNode::ProcessingInstruction(_)
        ));
        // Comments and PIs do not contribute to text content.
        assert_eq!(doc.root.text_content(), "text");
    }

    #[test]
    fn test_parse_whitespace_not_trimmed() {
        let doc = parse_document("<a>  keep  \n  this  </a>").unwrap();
        assert_eq!(doc.root.text_content(), "  keep  \n  this  ");
    }

    #[test]
    fn test_parse_empty_element() {
        let doc = parse_document(r#"<a><b attr="v"/></a>"#).unwrap();
        let b = doc.root.child_elements().next().unwrap();
        assert_eq!(b.attr("attr"), Some("v"));
        assert!(b.children.is_empty());
    }

    #[test]
    fn test_parse_empty_input_is_error() {
        assert!(parse_document("").is_err());
    }

    #[test]
    fn test_parse_unclosed_element_is_error() {
        assert!(parse_document("<a><b>oops</b>").is_err());
    }

    #[test]
    fn test_parse_mismatched_tags_is_error() {
        assert!(parse_document("<a><b></a></b>").is_err());
    }

    /// First descendant with the given local name, any namespace.
    fn find_by_local_name<'a>(e: &'a Element, local: &str) -> Option<&'a Element> {
        for child in e.child_elements() {
            if child.local_name == local {
                return Some(child);
            }
            if let Some(found) = find_by_local_name(child, local) {
                return Some(found);
            }
        }
        None
    }
}
