use serde_json::{Value, json};

use crate::block::{
    AttributeSchema, AttributeSet, AttributeSource, AttributeType, Attributes, BlockType,
    RawTransform, Transform,
};
use crate::library::{rich_text, string};
use crate::markup::{Element, Markup};

pub fn image() -> BlockType {
    BlockType::new("core/image", save_image)
        .title("Image")
        .attribute(
            "url",
            AttributeSchema::string().source(AttributeSource::attribute("img", "src")),
        )
        .attribute(
            "alt",
            AttributeSchema::string()
                .source(AttributeSource::attribute("img", "alt"))
                .default_value(json!("")),
        )
        .attribute(
            "caption",
            AttributeSchema::of(AttributeType::RichText)
                .source(AttributeSource::html("figcaption"))
                .default_value(json!("")),
        )
        .attribute(
            "href",
            AttributeSchema::string().source(AttributeSource::attribute("figure > a", "href")),
        )
        .attribute("id", AttributeSchema::number())
        .attribute("align", AttributeSchema::string())
        .transform_from(Transform::Raw(RawTransform::matching(|dom, id| {
            dom.tag(id) == Some("figure")
                && dom
                    .descendants(id)
                    .into_iter()
                    .any(|d| dom.tag(d) == Some("img"))
        })))
}

fn save_image(attributes: &Attributes) -> Markup {
    let img = Element::new("img")
        .attr_opt("src", string(attributes, "url"))
        .attr("alt", string(attributes, "alt").unwrap_or_default())
        .attr_opt(
            "class",
            attributes
                .get("id")
                .and_then(Value::as_u64)
                .map(|id| format!("wp-image-{id}")),
        );
    let media: Markup = match string(attributes, "href") {
        Some(href) => Element::new("a").attr("href", href).child(img).into(),
        None => img.into(),
    };

    let mut figure = Element::new("figure")
        .attr_opt("class", string(attributes, "align").map(|align| format!("align{align}")))
        .child(media);
    if string(attributes, "caption").is_some_and(|caption| !caption.is_empty()) {
        figure = figure.child(Element::new("figcaption").child(rich_text(attributes, "caption")));
    }
    figure.into()
}

pub fn gallery() -> BlockType {
    let image_query = AttributeSet::new()
        .with(
            "url",
            AttributeSchema::string().source(AttributeSource::attribute("img", "src")),
        )
        .with(
            "alt",
            AttributeSchema::string()
                .source(AttributeSource::attribute("img", "alt"))
                .default_value(json!("")),
        )
        .with(
            "id",
            AttributeSchema::any().source(AttributeSource::attribute("img", "data-id")),
        );

    BlockType::new("core/gallery", save_gallery)
        .title("Gallery")
        .attribute(
            "images",
            AttributeSchema::array()
                .source(AttributeSource::query(".blocks-gallery-item", image_query))
                .default_value(json!([])),
        )
        .attribute("columns", AttributeSchema::number())
}

fn save_gallery(attributes: &Attributes) -> Markup {
    let images = attributes
        .get("images")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let items = images.iter().map(|image| {
        let field = |key: &str| image.get(key).and_then(Value::as_str);
        let img = Element::new("img")
            .attr_opt("src", field("url"))
            .attr("alt", field("alt").unwrap_or_default())
            .attr_opt("data-id", field("id"));
        Markup::from(
            Element::new("li")
                .attr("class", "blocks-gallery-item")
                .child(Element::new("figure").child(img)),
        )
    });

    Element::new("ul")
        .attr_opt(
            "class",
            attributes
                .get("columns")
                .and_then(Value::as_u64)
                .map(|columns| format!("columns-{columns}")),
        )
        .children(items)
        .into()
}
