//! HTML writer for presentation trees.
//!
//! Attributes are written in name order, void elements as `<tag />`, and
//! boolean attributes without a value.

use crate::application::render::{AttributeValue, Element, PresentationNode};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn to_html(nodes: &[PresentationNode]) -> String {
    let mut html = String::new();
    for node in nodes {
        write_node(node, &mut html);
    }
    html
}

fn write_node(node: &PresentationNode, html: &mut String) {
    match node {
        PresentationNode::Element(element) => write_element(element, html),
        PresentationNode::Text(text) => html.push_str(&escape_text(text)),
        PresentationNode::Fragment(children) => {
            for child in children {
                write_node(child, html);
            }
        }
        PresentationNode::Empty => {}
    }
}

fn write_element(element: &Element, html: &mut String) {
    html.push('<');
    html.push_str(&element.tag);
    for (name, value) in &element.attributes {
        html.push(' ');
        html.push_str(name);
        if let AttributeValue::Text(value) = value {
            html.push_str("=\"");
            html.push_str(&escape_attribute(value));
            html.push('"');
        }
    }

    if is_void(&element.tag) {
        html.push_str(" />");
        return;
    }

    html.push('>');
    for child in &element.children {
        write_node(child, html);
    }
    html.push_str("</");
    html.push_str(&element.tag);
    html.push('>');
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag))
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}
