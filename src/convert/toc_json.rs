//! Table-of-contents extraction as JSON.
//!
//! Emits a single object with the document title and one entry per direct
//! child `section` of the root element. Nested sections are deliberately not
//! enumerated: the TOC is flat by design.

use std::fs;
use std::path::Path;

use crate::convert::Converter;
use crate::docbook::{DOCBOOK_NS, first_child_text, info_title};
use crate::dom::Document;
use crate::error::Result;

/// Converter producing a JSON table of contents.
#[derive(Debug, Clone, Default)]
pub struct TocJsonConverter;

impl TocJsonConverter {
    pub fn new() -> Self {
        Self
    }

    /// Render the flat table of contents as a JSON string.
    pub fn render(&self, doc: &Document) -> String {
        let mut json = String::new();

        let title = info_title(doc).unwrap_or_default();
        json.push_str("{\n");
        json.push_str(&format!("  \"title\": {},\n", quote(&title)));
        json.push_str("  \"sections\": [\n");

        // Only direct children of the root count; nested sections stay out.
        let mut first = true;
        for section in doc.root.child_elements() {
            if !section.is_named(DOCBOOK_NS, "section") {
                continue;
            }
            if !first {
                json.push_str(",\n");
            }
            first = false;

            let id = section.attr("xml:id").unwrap_or("");
            let title = first_child_text(section, "title").unwrap_or_default();
            json.push_str(&format!(
                "    {{ \"id\": {}, \"title\": {} }}",
                quote(id),
                quote(&title)
            ));
        }

        json.push_str("\n  ]\n");
        json.push_str("}\n");
        json
    }
}

impl Converter for TocJsonConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let doc = Document::parse_file(input)?;
        fs::write(output, self.render(&doc))?;
        Ok(())
    }
}

/// Quote a JSON string value, escaping backslash and double quote.
///
/// Control characters are left as-is; the historical output format never
/// escaped them (see DESIGN.md).
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(xml: &str) -> String {
        let doc = Document::parse_str(xml).unwrap();
        TocJsonConverter::new().render(&doc)
    }

    const DB: &str = r#"xmlns="http://docbook.org/ns/docbook""#;

    #[test]
    fn test_quote_escapes_backslash_and_quote() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(quote(""), "\"\"");
    }

    #[test]
    fn test_flat_toc() {
        let out = render(&format!(
            r#"<article {DB}><info><title>Guide</title></info><section xml:id="s1"><title>One</title></section><section><title>Two</title></section></article>"#
        ));
        assert_eq!(
            out,
            "{\n  \"title\": \"Guide\",\n  \"sections\": [\n    { \"id\": \"s1\", \"title\": \"One\" },\n    { \"id\": \"\", \"title\": \"Two\" }\n  ]\n}\n"
        );
    }

    #[test]
    fn test_nested_sections_not_enumerated() {
        let out = render(&format!(
            r#"<article {DB}><section xml:id="top"><title>Top</title><section xml:id="inner"><title>Inner</title></section></section></article>"#
        ));

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let sections = value["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0]["id"], "top");
        assert_eq!(sections[0]["title"], "Top");
    }

    #[test]
    fn test_missing_title_and_id_become_empty_strings() {
        let out = render(&format!(r#"<article {DB}><section><para>x</para></section></article>"#));

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["title"], "");
        assert_eq!(value["sections"][0]["id"], "");
        assert_eq!(value["sections"][0]["title"], "");
    }

    #[test]
    fn test_no_sections_yields_empty_array() {
        let out = render(&format!(
            r#"<article {DB}><info><title>Empty</title></info></article>"#
        ));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["sections"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_output_is_valid_json_with_quotes_in_title() {
        let out = render(&format!(
            r#"<article {DB}><info><title>Say &quot;hi&quot;</title></info></article>"#
        ));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["title"], "Say \"hi\"");
    }
}
