use serde_json::json;

use crate::block::{AttributeSchema, BlockType};
use crate::markup::Markup;

/// Rendered by the host at display time, so nothing is saved and the
/// block is stored as a void delimiter.
pub fn latest_posts() -> BlockType {
    BlockType::new("core/latest-posts", |_| Markup::Empty)
        .title("Latest Posts")
        .attribute("postsToShow", AttributeSchema::number().default_value(json!(5)))
        .attribute("displayPostDate", AttributeSchema::boolean().default_value(json!(false)))
        .attribute(
            "order",
            AttributeSchema::string()
                .one_of([json!("asc"), json!("desc")])
                .default_value(json!("desc")),
        )
}
