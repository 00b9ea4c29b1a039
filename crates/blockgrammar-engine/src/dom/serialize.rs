use crate::dom::{Dom, NodeData, NodeId};
use crate::markup::is_void_element;

/// Elements whose text children are serialized without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

impl Dom {
    /// Serialized children of `id`, as `innerHTML` would report them.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw_text = self.tag(id).is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
        for &child in self.children(id) {
            self.write_node(child, raw_text, &mut out);
        }
        out
    }

    /// Serialized node including its own tags.
    pub fn outer_html(&self, id: NodeId) -> String {
        let parent_raw = self
            .parent(id)
            .and_then(|p| self.tag(p))
            .is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
        let mut out = String::new();
        self.write_node(id, parent_raw, &mut out);
        out
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        if let NodeData::Text(text) = &self.node(id).data {
            return text.clone();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| match &self.node(d).data {
                NodeData::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn write_node(&self, id: NodeId, raw_text: bool, out: &mut String) {
        match &self.node(id).data {
            NodeData::Fragment => {
                for &child in self.children(id) {
                    self.write_node(child, false, out);
                }
            }
            NodeData::Text(text) if raw_text => out.push_str(text),
            NodeData::Text(text) => escape_text(text, out),
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attribute(value, out);
                    out.push('"');
                }
                out.push('>');
                if is_void_element(tag) {
                    return;
                }
                let raw_children = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
                for &child in self.children(id) {
                    self.write_node(child, raw_children, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
