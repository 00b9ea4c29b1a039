use crate::markup::{AttrValue, Element, Markup};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

pub(super) fn render_into(markup: &Markup, inner_blocks: &str, out: &mut String) {
    match markup {
        Markup::Element(element) => render_element(element, inner_blocks, out),
        Markup::Text(text) => {
            html_escape::encode_text_to_string(text, out);
        }
        Markup::RawHtml(html) => out.push_str(html),
        Markup::Fragment(children) => {
            for child in children {
                render_into(child, inner_blocks, out);
            }
        }
        Markup::InnerBlocks => out.push_str(inner_blocks),
        Markup::Empty => {}
    }
}

fn render_element(element: &Element, inner_blocks: &str, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);

    for (name, value) in &element.attributes {
        match value {
            AttrValue::Bool(false) => {}
            AttrValue::Bool(true) => {
                out.push(' ');
                out.push_str(name);
            }
            AttrValue::String(value) => {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                html_escape::encode_double_quoted_attribute_to_string(value, out);
                out.push('"');
            }
        }
    }

    if is_void_element(&element.tag) {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &element.children {
        render_into(child, inner_blocks, out);
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}
