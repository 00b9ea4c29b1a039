//! # Parser
//!
//! Stored post content to block instances.
//!
//! ```text
//! content → blockgrammar_syntax::parse → GrammarNodes
//!         → normalize names (freeform handler, legacy names, unknown types)
//!         → hydrate attributes → validate / migrate → Blocks
//! ```
//!
//! Parsing never fails. Content the registry cannot explain ends up in a
//! freeform block, an unregistered-type block holding the exact original
//! markup, or an invalid block that serializes back unchanged.

use log::{debug, warn};
use serde_json::{Map, Value};

use blockgrammar_syntax::GrammarNode;
use blockgrammar_syntax::grammar::{RawSerializeOptions, serialize_raw_block};

use crate::attributes::{PostMeta, get_block_attributes};
use crate::block::{Attributes, Block, BlockRegistry};
use crate::validation::deprecation::validate_and_migrate;

/// Options for [`parse_with_options`].
#[derive(Default, Clone, Copy)]
pub struct ParseOptions<'a> {
    /// Host post meta for `meta` sourced attributes.
    pub post_meta: Option<&'a dyn PostMeta>,
}

pub fn parse(content: &str, registry: &BlockRegistry) -> Vec<Block> {
    parse_with_options(content, registry, ParseOptions::default())
}

pub fn parse_with_options(content: &str, registry: &BlockRegistry, options: ParseOptions<'_>) -> Vec<Block> {
    blockgrammar_syntax::parse(content)
        .iter()
        .filter_map(|node| parse_raw_block(node, content, registry, options))
        .collect()
}

/// Turn one grammar node of `document` into a block.
///
/// Returns `None` for empty freeform content, and for content no handler
/// can take.
pub fn parse_raw_block(
    node: &GrammarNode,
    document: &str,
    registry: &BlockRegistry,
    options: ParseOptions<'_>,
) -> Option<Block> {
    let freeform = registry.get_freeform_content_handler_name();
    let Some(mut name) = node.block_name.clone().or_else(|| freeform.map(str::to_string)) else {
        debug!("No freeform handler; dropping content at {:?}", node.span);
        return None;
    };
    let mut comment_attributes = node.attrs.clone();
    let mut inner_html = node.inner_html.trim().to_string();
    let mut inner_nodes = node.inner_blocks.as_slice();

    convert_legacy_block(&mut name, &mut comment_attributes);

    if registry.get_block_type(&name).is_none() {
        let Some(fallback) = registry.get_unregistered_type_handler_name().or(freeform) else {
            warn!("Block `{name}` is not registered and there is no fallback handler");
            return None;
        };
        debug!("Block `{name}` is not registered; using `{fallback}`");

        let source = node.source(document);
        comment_attributes = missing_block_attributes(&name, source, node);
        if node.block_name.is_some() {
            inner_html = source.to_string();
        }
        inner_nodes = &[];
        name = fallback.to_string();
    }

    let Some(block_type) = registry.get_block_type(&name) else {
        warn!("Fallback handler `{name}` is not registered");
        return None;
    };

    let is_fallback = registry.is_fallback(&name);
    if is_fallback && inner_html.is_empty() {
        return None;
    }

    let inner_blocks = inner_nodes
        .iter()
        .filter_map(|child| parse_raw_block(child, document, registry, options))
        .collect();
    let attributes = get_block_attributes(
        &block_type.attributes,
        &inner_html,
        &comment_attributes,
        options.post_meta,
    );

    let mut block = Block::new(&name, attributes, inner_blocks);
    block.original_content = Some(inner_html);
    if !is_fallback {
        validate_and_migrate(&mut block, block_type, &comment_attributes, options.post_meta);
    }
    if !block.is_valid {
        block.source = Some(node.source(document).to_string());
    }
    Some(block)
}

fn missing_block_attributes(name: &str, source: &str, node: &GrammarNode) -> Attributes {
    let undelimited = serialize_raw_block(
        node,
        RawSerializeOptions {
            comment_delimited: false,
        },
    );
    let mut attributes = Map::new();
    attributes.insert("originalName".into(), Value::String(name.to_string()));
    attributes.insert("originalContent".into(), Value::String(source.to_string()));
    attributes.insert(
        "originalUndelimitedContent".into(),
        Value::String(undelimited),
    );
    attributes
}

/// Rename blocks saved under names that have since changed.
pub fn convert_legacy_block(name: &mut String, attributes: &mut Attributes) {
    if matches!(name.as_str(), "core/text" | "core/cover-text") {
        *name = "core/paragraph".to_string();
    } else if name == "core/cover-image" {
        *name = "core/cover".to_string();
    } else if let Some(service) = name.strip_prefix("core/social-link-") {
        attributes.insert("service".into(), Value::String(service.to_string()));
        *name = "core/social-link".to_string();
    } else if let Some(provider) = name.strip_prefix("core-embed/") {
        let slug = match provider {
            "speaker" => "speaker-deck",
            "polldaddy" => "crowdsignal",
            other => other,
        };
        if !matches!(provider, "amazon-kindle" | "wordpress") {
            attributes.insert("responsive".into(), Value::Bool(true));
        }
        attributes.insert("providerNameSlug".into(), Value::String(slug.to_string()));
        *name = "core/embed".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("core/text", json!({}), "core/paragraph", json!({}))]
    #[case("core/cover-text", json!({}), "core/paragraph", json!({}))]
    #[case("core/cover-image", json!({"url": "a"}), "core/cover", json!({"url": "a"}))]
    #[case("core/social-link-wordpress", json!({}), "core/social-link", json!({"service": "wordpress"}))]
    #[case("core-embed/youtube", json!({}), "core/embed", json!({"responsive": true, "providerNameSlug": "youtube"}))]
    #[case("core-embed/speaker", json!({}), "core/embed", json!({"responsive": true, "providerNameSlug": "speaker-deck"}))]
    #[case("core-embed/wordpress", json!({}), "core/embed", json!({"providerNameSlug": "wordpress"}))]
    #[case("core/paragraph", json!({"a": 1}), "core/paragraph", json!({"a": 1}))]
    fn legacy_names(
        #[case] name: &str,
        #[case] attributes: Value,
        #[case] expected_name: &str,
        #[case] expected_attributes: Value,
    ) {
        let mut name = name.to_string();
        let Value::Object(mut attributes) = attributes else {
            unreachable!()
        };
        convert_legacy_block(&mut name, &mut attributes);
        assert_eq!(name, expected_name);
        assert_eq!(Value::Object(attributes), expected_attributes);
    }

    #[test]
    fn empty_registry_drops_everything() {
        let registry = BlockRegistry::new();
        assert!(parse("<p>x</p><!-- wp:paragraph --><p>y</p><!-- /wp:paragraph -->", &registry).is_empty());
    }
}
