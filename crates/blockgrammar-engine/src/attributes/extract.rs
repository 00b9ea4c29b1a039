use std::cell::OnceCell;

use log::warn;
use serde_json::{Map, Value};

use crate::attributes::PostMeta;
use crate::block::{AttributeSource, AttributeType};
use crate::dom::selector::Selector;
use crate::dom::{Dom, NodeId};

/// A block's HTML with its DOM parsed on first use.
///
/// Blocks whose attributes all live in the comment payload never pay for
/// an HTML parse.
pub struct SourceHtml<'a> {
    html: &'a str,
    dom: OnceCell<Dom>,
}

impl<'a> SourceHtml<'a> {
    pub fn new(html: &'a str) -> Self {
        Self {
            html,
            dom: OnceCell::new(),
        }
    }

    pub fn html(&self) -> &'a str {
        self.html
    }

    pub fn dom(&self) -> &Dom {
        self.dom.get_or_init(|| Dom::parse(self.html))
    }
}

/// Extract a value from the block's HTML. `None` means no value was found.
pub fn extract(
    source: &AttributeSource,
    kind: Option<AttributeType>,
    html: &SourceHtml<'_>,
    meta: Option<&dyn PostMeta>,
) -> Option<Value> {
    match source {
        AttributeSource::Raw => Some(Value::String(html.html().to_string())),
        AttributeSource::Meta { key } => meta.and_then(|m| m.get(key)),
        _ => {
            let dom = html.dom();
            extract_in(source, kind, dom, dom.root(), meta)
        }
    }
}

/// Extract relative to `context`, which is the root fragment for top-level
/// sources and each match for nested query sources.
pub fn extract_in(
    source: &AttributeSource,
    kind: Option<AttributeType>,
    dom: &Dom,
    context: NodeId,
    meta: Option<&dyn PostMeta>,
) -> Option<Value> {
    match source {
        AttributeSource::Attribute {
            selector,
            attribute,
        } => {
            let value = target(dom, context, selector.as_deref())
                .and_then(|id| dom.attr(id, &attribute.to_ascii_lowercase()));
            if kind == Some(AttributeType::Boolean) {
                Some(Value::Bool(value.is_some()))
            } else {
                value.map(|v| Value::String(v.to_string()))
            }
        }
        AttributeSource::Html {
            selector,
            multiline,
        } => {
            let id = target(dom, context, selector.as_deref())?;
            let html = match multiline {
                Some(tag) => dom
                    .element_children(id)
                    .filter(|&child| dom.tag(child) == Some(tag.as_str()))
                    .map(|child| dom.outer_html(child))
                    .collect(),
                None => dom.inner_html(id),
            };
            Some(Value::String(html))
        }
        AttributeSource::Text { selector } => {
            target(dom, context, selector.as_deref()).map(|id| Value::String(dom.text_content(id)))
        }
        AttributeSource::Tag { selector } => target(dom, context, selector.as_deref())
            .and_then(|id| dom.tag(id))
            .map(|tag| Value::String(tag.to_ascii_lowercase())),
        AttributeSource::Query { selector, query } => {
            let selector = compile(selector)?;
            let items = dom
                .select_all(context, &selector)
                .into_iter()
                .map(|id| {
                    let mut item = Map::new();
                    for (key, schema) in query.iter() {
                        let value = schema
                            .source
                            .as_ref()
                            .and_then(|s| extract_in(s, schema.kind, dom, id, meta))
                            .filter(|v| schema.accepts(v))
                            .or_else(|| schema.default.clone());
                        if let Some(value) = value {
                            item.insert(key.to_string(), value);
                        }
                    }
                    Value::Object(item)
                })
                .collect();
            Some(Value::Array(items))
        }
        AttributeSource::Raw => {
            let html = if context == dom.root() {
                dom.inner_html(context)
            } else {
                dom.outer_html(context)
            };
            Some(Value::String(html))
        }
        AttributeSource::Meta { key } => meta.and_then(|m| m.get(key)),
    }
}

/// The first match below `context`, or `context` itself when it is an
/// element and there is no selector.
fn target(dom: &Dom, context: NodeId, selector: Option<&str>) -> Option<NodeId> {
    match selector {
        Some(selector) => dom.select_first(context, &compile(selector)?),
        None => dom.is_element(context).then_some(context),
    }
}

fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(err) => {
            warn!("{err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{AttributeSchema, AttributeSet};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    fn run(source: AttributeSource, kind: Option<AttributeType>, html: &str) -> Option<Value> {
        extract(&source, kind, &SourceHtml::new(html), None)
    }

    #[test]
    fn figure_image_attributes() {
        let html = r#"<figure><img src="x.png" alt="y"></figure>"#;
        assert_eq!(run(AttributeSource::attribute("img", "src"), None, html), Some(json!("x.png")));
        assert_eq!(run(AttributeSource::attribute("img", "alt"), None, html), Some(json!("y")));
        assert_eq!(run(AttributeSource::attribute("img", "title"), None, html), None);
        assert_eq!(run(AttributeSource::attribute("video", "src"), None, html), None);
    }

    #[test]
    fn boolean_attribute_is_presence() {
        let html = "<video controls></video>";
        let kind = Some(AttributeType::Boolean);
        assert_eq!(run(AttributeSource::attribute("video", "controls"), kind, html), Some(json!(true)));
        assert_eq!(run(AttributeSource::attribute("video", "loop"), kind, html), Some(json!(false)));
    }

    #[test]
    fn html_source() {
        let html = "<p>Hello <strong>world</strong></p>";
        assert_eq!(
            run(AttributeSource::html("p"), None, html),
            Some(json!("Hello <strong>world</strong>"))
        );
        assert_eq!(run(AttributeSource::html("h2"), None, html), None);
    }

    #[test]
    fn multiline_html_source() {
        let html = "<ul><li>one</li><li>two <em>2</em></li></ul>";
        assert_eq!(
            run(AttributeSource::multiline_html("ul", "li"), None, html),
            Some(json!("<li>one</li><li>two <em>2</em></li>"))
        );
    }

    #[test]
    fn text_and_tag_sources() {
        let html = "<blockquote><P>a &amp; <b>b</b></P><cite>c</cite></blockquote>";
        assert_eq!(run(AttributeSource::text("p"), None, html), Some(json!("a & b")));
        assert_eq!(run(AttributeSource::text("footer"), None, html), None);
        assert_eq!(run(AttributeSource::tag("blockquote > *"), None, html), Some(json!("p")));
    }

    #[test]
    fn raw_source_is_unmodified() {
        let html = "<p  class=x>Unclosed";
        assert_eq!(run(AttributeSource::Raw, None, html), Some(json!(html)));
    }

    #[test]
    fn query_source_builds_objects() {
        let html = r#"<ul><li><img src="a.png" alt="A" data-id="1"></li><li><img src="b.png"></li></ul>"#;
        let query = AttributeSet::new()
            .with("url", AttributeSchema::string().source(AttributeSource::attribute("img", "src")))
            .with(
                "alt",
                AttributeSchema::string()
                    .source(AttributeSource::attribute("img", "alt"))
                    .default_value(json!("")),
            )
            .with("id", AttributeSchema::any().source(AttributeSource::attribute("img", "data-id")));
        assert_eq!(
            run(AttributeSource::query("li", query), None, html),
            Some(json!([
                {"url": "a.png", "alt": "A", "id": "1"},
                {"url": "b.png", "alt": ""},
            ]))
        );
    }

    #[test]
    fn meta_source_reads_host_meta() {
        let mut meta = HashMap::new();
        meta.insert("subtitle".to_string(), json!("Hi"));
        let source = AttributeSource::meta("subtitle");
        assert_eq!(
            extract(&source, None, &SourceHtml::new(""), Some(&meta)),
            Some(json!("Hi"))
        );
        assert_eq!(extract(&source, None, &SourceHtml::new(""), None), None);
    }

    #[test]
    fn dom_is_not_parsed_for_raw_sources() {
        let html = SourceHtml::new("<p>x</p>");
        extract(&AttributeSource::Raw, None, &html, None);
        assert!(html.dom.get().is_none());
    }
}
