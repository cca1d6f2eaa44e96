//! Debug utility: parse an XML file and print the document tree.
//!
//! For exploring what the parser produced — not part of the conversion
//! pipeline.

use std::process::ExitCode;

use clap::Parser;

use docshift::Document;
use docshift::dom::{Element, XmlNode};

#[derive(Parser, Debug)]
#[command(name = "dom-dump")]
#[command(about = "Parses an XML file and prints a human-readable dump of the document tree")]
struct Args {
    /// XML file to dump
    file: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match Document::parse_file(&args.file) {
        Ok(doc) => {
            println!("#document");
            print_element(&doc.root, 1);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to parse XML: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_element(element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);

    println!("{indent}Element: <{}>", element.local_name);
    for attr in &element.attributes {
        println!("{indent}  @{}=\"{}\"", attr.qualified_name, attr.value);
    }

    for child in &element.children {
        match child {
            XmlNode::Element(e) => print_element(e, depth + 1),
            XmlNode::Text(t) => {
                let trimmed = t.trim();
                if !trimmed.is_empty() {
                    println!("{}Text: {trimmed}", "  ".repeat(depth + 1));
                }
            }
            XmlNode::CData(data) => {
                println!("{}CDATA: {data}", "  ".repeat(depth + 1));
            }
            XmlNode::ProcessingInstruction(pi) => {
                println!("{}PI: {pi}", "  ".repeat(depth + 1));
            }
            XmlNode::Comment(_) => {
                println!("{}Comment", "  ".repeat(depth + 1));
            }
        }
    }
}
