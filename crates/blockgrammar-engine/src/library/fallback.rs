//! Handlers for content the rest of the library cannot explain. None of
//! them decorate their markup, and none are validated.

use serde_json::json;

use crate::block::{AttributeSchema, AttributeSource, Attributes, BlockType, Supports};
use crate::library::string;
use crate::markup::Markup;

fn raw_content(name: &str, title: &str) -> BlockType {
    BlockType::new(name, |attributes: &Attributes| {
        Markup::raw(string(attributes, "content").unwrap_or_default())
    })
    .title(title)
    .supports(Supports::none())
    .attribute(
        "content",
        AttributeSchema::string().source(AttributeSource::Raw),
    )
}

/// Custom HTML, kept as written.
pub fn html() -> BlockType {
    raw_content("core/html", "Custom HTML")
}

/// Markup outside any block delimiter.
pub fn freeform() -> BlockType {
    raw_content("core/freeform", "Classic")
}

/// Stands in for a block whose type is not registered. Saves the exact
/// markup it was parsed from.
pub fn missing() -> BlockType {
    BlockType::new("core/missing", |attributes: &Attributes| {
        Markup::raw(string(attributes, "originalContent").unwrap_or_default())
    })
    .title("Unsupported")
    .supports(Supports::none())
    .attribute("originalName", AttributeSchema::string())
    .attribute(
        "originalUndelimitedContent",
        AttributeSchema::string().default_value(json!("")),
    )
    .attribute(
        "originalContent",
        AttributeSchema::string().source(AttributeSource::Raw),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::get_save_content;
    use pretty_assertions::assert_eq;
    use serde_json::{Map, Value};

    #[test]
    fn saves_content_untouched() {
        let mut attributes = Map::new();
        attributes.insert("content".into(), Value::String("<marquee class=\"x\">hi</marquee>".into()));
        assert_eq!(
            get_save_content(&html().current(), &attributes, ""),
            "<marquee class=\"x\">hi</marquee>"
        );
    }

    #[test]
    fn missing_saves_original_content() {
        let source = "<!-- wp:acme/thing {\"a\":1} -->\n<div>x</div>\n<!-- /wp:acme/thing -->";
        let mut attributes = Map::new();
        attributes.insert("originalContent".into(), Value::String(source.into()));
        assert_eq!(get_save_content(&missing().current(), &attributes, ""), source);
    }
}
