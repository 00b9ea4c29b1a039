use serde_json::{Map, Value, json};

use crate::block::{
    AttributeSchema, AttributeSource, AttributeType, Attributes, BlockTransform, BlockType,
    Deprecation, RawTransform, Supports, Transform,
};
use crate::factory::create_block;
use crate::library::{flag, rich_text, string};
use crate::markup::{Element, Markup};

const HEADINGS: &str = "h1,h2,h3,h4,h5,h6";

fn text_supports() -> Supports {
    Supports {
        class_name: false,
        custom_class_name: true,
    }
}

fn content_only(block: &crate::block::Block) -> Attributes {
    let mut attributes = Map::new();
    if let Some(content) = block.attribute("content") {
        attributes.insert("content".into(), content.clone());
    }
    attributes
}

pub fn paragraph() -> BlockType {
    BlockType::new("core/paragraph", save_paragraph)
        .title("Paragraph")
        .supports(text_supports())
        .attribute("align", AttributeSchema::string())
        .attribute(
            "content",
            AttributeSchema::of(AttributeType::RichText)
                .source(AttributeSource::html("p"))
                .default_value(json!("")),
        )
        .attribute("dropCap", AttributeSchema::boolean().default_value(json!(false)))
        .attribute(
            "direction",
            AttributeSchema::string().one_of([json!("ltr"), json!("rtl")]),
        )
        // Alignment used to be an inline style.
        .deprecation(Deprecation::new(save_paragraph_inline_align))
        .transform_from(Transform::Raw(RawTransform::selector("p").priority(20)))
        .transform_from(Transform::Block(BlockTransform::new(&["core/heading"], content_only)))
}

fn save_paragraph(attributes: &Attributes) -> Markup {
    let mut classes = Vec::new();
    if let Some(align) = string(attributes, "align") {
        classes.push(format!("has-text-align-{align}"));
    }
    if flag(attributes, "dropCap") {
        classes.push("has-drop-cap".to_string());
    }
    Element::new("p")
        .attr_opt("class", (!classes.is_empty()).then(|| classes.join(" ")))
        .attr_opt("dir", string(attributes, "direction"))
        .child(rich_text(attributes, "content"))
        .into()
}

fn save_paragraph_inline_align(attributes: &Attributes) -> Markup {
    Element::new("p")
        .attr_opt(
            "style",
            string(attributes, "align").map(|align| format!("text-align:{align};")),
        )
        .attr_opt("class", flag(attributes, "dropCap").then_some("has-drop-cap"))
        .child(rich_text(attributes, "content"))
        .into()
}

pub fn heading() -> BlockType {
    BlockType::new("core/heading", save_heading)
        .title("Heading")
        .supports(text_supports())
        .attribute("textAlign", AttributeSchema::string())
        .attribute(
            "content",
            AttributeSchema::of(AttributeType::RichText)
                .source(AttributeSource::html(HEADINGS))
                .default_value(json!("")),
        )
        .attribute("level", AttributeSchema::number().default_value(json!(2)))
        .transform_from(Transform::Raw(RawTransform::selector(HEADINGS).transform(
            |dom, id, registry| {
                let level = dom
                    .tag(id)
                    .and_then(|tag| tag.strip_prefix('h'))
                    .and_then(|n| n.parse::<u8>().ok())
                    .unwrap_or(2);
                let mut attributes = Map::new();
                attributes.insert("content".into(), Value::String(dom.inner_html(id)));
                attributes.insert("level".into(), json!(level));
                create_block(registry, "core/heading", attributes, Vec::new())
                    .into_iter()
                    .collect()
            },
        )))
        .transform_from(Transform::Block(BlockTransform::new(&["core/paragraph"], content_only)))
        .transform_to(Transform::Block(BlockTransform::new(&["core/paragraph"], content_only)))
}

fn heading_level(attributes: &Attributes) -> u64 {
    attributes
        .get("level")
        .and_then(Value::as_u64)
        .filter(|level| (1..=6).contains(level))
        .unwrap_or(2)
}

fn save_heading(attributes: &Attributes) -> Markup {
    Element::new(format!("h{}", heading_level(attributes)))
        .attr_opt(
            "class",
            string(attributes, "textAlign").map(|align| format!("has-text-align-{align}")),
        )
        .child(rich_text(attributes, "content"))
        .into()
}

pub fn list() -> BlockType {
    BlockType::new("core/list", save_list)
        .title("List")
        .supports(text_supports())
        .attribute("ordered", AttributeSchema::boolean().default_value(json!(false)))
        .attribute(
            "values",
            AttributeSchema::string()
                .source(AttributeSource::multiline_html("ol,ul", "li"))
                .default_value(json!("")),
        )
        .transform_from(Transform::Raw(RawTransform::selector("ol,ul").transform(
            |dom, id, registry| {
                let values: String = dom
                    .element_children(id)
                    .filter(|&child| dom.tag(child) == Some("li"))
                    .map(|child| dom.outer_html(child))
                    .collect();
                let mut attributes = Map::new();
                attributes.insert("ordered".into(), Value::Bool(dom.tag(id) == Some("ol")));
                attributes.insert("values".into(), Value::String(values));
                create_block(registry, "core/list", attributes, Vec::new())
                    .into_iter()
                    .collect()
            },
        )))
}

fn save_list(attributes: &Attributes) -> Markup {
    let tag = if flag(attributes, "ordered") { "ol" } else { "ul" };
    Element::new(tag)
        .child(rich_text(attributes, "values"))
        .into()
}
