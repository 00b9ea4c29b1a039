use serde_json::json;

use crate::block::{AttributeSchema, Attributes, BlockType, RawTransform, Transform};
use crate::library::string;
use crate::markup::{Element, Markup};

pub fn separator() -> BlockType {
    BlockType::new("core/separator", |_| Element::new("hr").into())
        .title("Separator")
        .transform_from(Transform::Raw(RawTransform::selector("hr")))
}

pub fn group() -> BlockType {
    BlockType::new("core/group", save_group)
        .title("Group")
        .attribute(
            "tagName",
            AttributeSchema::string()
                .one_of(["div", "section", "main", "article", "aside", "header", "footer"].map(|tag| json!(tag)))
                .default_value(json!("div")),
        )
}

fn save_group(attributes: &Attributes) -> Markup {
    Element::new(string(attributes, "tagName").unwrap_or("div"))
        .child(Markup::InnerBlocks)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockRegistry;
    use crate::serializer::get_save_content;
    use pretty_assertions::assert_eq;
    use serde_json::{Map, Value};

    #[test]
    fn group_wraps_inner_blocks() {
        let mut registry = BlockRegistry::new();
        registry.register_block_type(group()).unwrap();
        let block_type = registry.get_block_type("core/group").unwrap();

        let mut attributes = Map::new();
        attributes.insert("tagName".into(), Value::String("section".into()));
        assert_eq!(
            get_save_content(&block_type.current(), &attributes, "<p>in</p>"),
            r#"<section class="wp-block-group"><p>in</p></section>"#
        );
    }

    #[test]
    fn separator_is_a_void_rule() {
        let block_type = separator();
        assert_eq!(
            get_save_content(&block_type.current(), &Map::new(), ""),
            r#"<hr class="wp-block-separator"/>"#
        );
    }
}
