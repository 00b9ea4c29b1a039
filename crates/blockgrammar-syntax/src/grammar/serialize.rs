//! Writing delimiters and grammar nodes back to text.

use serde_json::{Map, Value};

use crate::grammar::node::GrammarNode;

/// Options for [`serialize_raw_block`].
#[derive(Debug, Clone, Copy)]
pub struct RawSerializeOptions {
    /// Wrap each block in its comment delimiters.
    pub comment_delimited: bool,
}

impl Default for RawSerializeOptions {
    fn default() -> Self {
        Self {
            comment_delimited: true,
        }
    }
}

/// JSON-encode delimiter attributes so the result can never close the
/// surrounding HTML comment or be mistaken for markup.
pub fn serialize_attributes(attributes: &Map<String, Value>) -> String {
    // `Map` serialization is infallible; it has string keys and JSON values.
    let json = serde_json::to_string(attributes).unwrap_or_else(|_| "{}".to_string());
    escape_delimiter_json(&json)
}

/// Escape `--`, `<`, `>`, `&` and escaped quotes in serialized JSON.
///
/// Escape sequences are consumed as pairs, so a string ending in an escaped
/// backslash keeps its closing quote.
fn escape_delimiter_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('"') => out.push_str("\\u0022"),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push('\\'),
            },
            '-' if chars.peek() == Some(&'-') => {
                chars.next();
                out.push_str("\\u002d\\u002d");
            }
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}

/// The name as written in a delimiter: `core/` is implied.
pub fn delimiter_name(name: &str) -> &str {
    name.strip_prefix("core/").unwrap_or(name)
}

/// Wrap `content` in the delimiters of `name`, or emit the void form when
/// there is no content.
pub fn comment_delimited_content(name: &str, attributes: &Map<String, Value>, content: &str) -> String {
    let attrs = if attributes.is_empty() {
        String::new()
    } else {
        format!("{} ", serialize_attributes(attributes))
    };
    let name = delimiter_name(name);

    if content.is_empty() {
        return format!("<!-- wp:{name} {attrs}/-->");
    }
    format!("<!-- wp:{name} {attrs}-->\n{content}\n<!-- /wp:{name} -->")
}

/// Re-emit a grammar node with canonical delimiters.
///
/// Inner block slots are filled with the recursively serialized children.
/// Chunks are joined by newlines, runs of newlines are collapsed and the
/// result is trimmed, so the output is canonical rather than byte-exact;
/// use [`GrammarNode::source`] for the exact text.
pub fn serialize_raw_block(node: &GrammarNode, options: RawSerializeOptions) -> String {
    let mut children = node.inner_blocks.iter();
    let parts: Vec<String> = node
        .inner_content
        .iter()
        .filter_map(|chunk| match chunk {
            Some(html) => Some(html.clone()),
            None => children.next().map(|child| serialize_raw_block(child, options)),
        })
        .collect();

    let content = collapse_newlines(&parts.join("\n"));
    let content = content.trim();

    match (&node.block_name, options.comment_delimited) {
        (Some(name), true) => comment_delimited_content(name, &node.attrs, content),
        _ => content.to_string(),
    }
}

fn collapse_newlines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_newline = false;
    for c in s.chars() {
        if c == '\n' {
            if !last_newline {
                out.push(c);
            }
            last_newline = true;
        } else {
            out.push(c);
            last_newline = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::builder::build;
    use crate::grammar::token::tokenize;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn attributes_escape_comment_and_markup_characters() {
        let attrs = map(json!({"a": "--><script>&", "q": "say \"hi\""}));
        assert_eq!(
            serialize_attributes(&attrs),
            r#"{"a":"\u002d\u002d\u003e\u003cscript\u003e\u0026","q":"say \u0022hi\u0022"}"#
        );
    }

    #[test]
    fn trailing_backslashes_keep_their_closing_quote() {
        let attrs = map(json!({"path": "C:\\dir\\", "mixed": "a\\\"b", "dashes": "a---b"}));
        let json = serialize_attributes(&attrs);
        assert_eq!(
            json,
            r#"{"path":"C:\\dir\\","mixed":"a\\\u0022b","dashes":"a\u002d\u002d-b"}"#
        );
        let parsed: Map<String, Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, attrs);
    }

    #[test]
    fn delimited_content_forms() {
        let attrs = map(json!({"align": "center"}));
        assert_eq!(
            comment_delimited_content("core/paragraph", &attrs, "<p>x</p>"),
            "<!-- wp:paragraph {\"align\":\"center\"} -->\n<p>x</p>\n<!-- /wp:paragraph -->"
        );
        assert_eq!(
            comment_delimited_content("core/separator", &Map::new(), ""),
            "<!-- wp:separator /-->"
        );
        assert_eq!(
            comment_delimited_content("my/block", &Map::new(), "x"),
            "<!-- wp:my/block -->\nx\n<!-- /wp:my/block -->"
        );
    }

    #[test]
    fn raw_block_substitutes_children() {
        let doc = "<!-- wp:my/group {\"a\":1} --><div>\n\n<!-- wp:my/item -->\n<i>x</i>\n<!-- /wp:my/item -->\n\n</div><!-- /wp:my/group -->";
        let nodes = build(tokenize(doc));

        assert_eq!(
            serialize_raw_block(&nodes[0], RawSerializeOptions::default()),
            "<!-- wp:my/group {\"a\":1} -->\n<div>\n<!-- wp:my/item -->\n<i>x</i>\n<!-- /wp:my/item -->\n</div>\n<!-- /wp:my/group -->"
        );
        assert_eq!(
            serialize_raw_block(&nodes[0], RawSerializeOptions { comment_delimited: false }),
            "<div>\n<i>x</i>\n</div>"
        );
    }

    #[test]
    fn freeform_nodes_emit_their_html() {
        let nodes = build(tokenize("  <p>loose</p>\n"));
        assert_eq!(
            serialize_raw_block(&nodes[0], RawSerializeOptions::default()),
            "<p>loose</p>"
        );
    }
}
