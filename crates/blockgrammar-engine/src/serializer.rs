//! # Serializer
//!
//! Block instances back to stored post content.
//!
//! Valid blocks are re-rendered through their type's `save` function and
//! wrapped in comment delimiters. Invalid blocks that kept their source
//! markup are written back exactly as they were read, so an unmodified
//! document never loses content it could not understand.

use serde_json::Value;

use blockgrammar_syntax::grammar::comment_delimited_content;

use crate::block::{Attributes, Block, BlockRegistry, BlockType, SaveVariant, default_class_name};
use crate::markup::Markup;

/// Serialize a tree, one block per paragraph.
pub fn serialize(blocks: &[Block], registry: &BlockRegistry) -> String {
    serialize_list(blocks, registry, false)
}

fn serialize_list(blocks: &[Block], registry: &BlockRegistry, is_inner: bool) -> String {
    blocks
        .iter()
        .map(|block| serialize_block(block, registry, is_inner))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Serialize one block. `is_inner` is set for nested blocks, where
/// freeform content needs delimiters to be told apart from its parent's
/// markup.
pub fn serialize_block(block: &Block, registry: &BlockRegistry, is_inner: bool) -> String {
    if !block.is_valid
        && let Some(source) = &block.source
    {
        return source.clone();
    }

    let content = get_block_inner_html(block, registry);
    let name = block.name.as_str();
    if registry.get_unregistered_type_handler_name() == Some(name)
        || (!is_inner && registry.get_freeform_content_handler_name() == Some(name))
    {
        return content;
    }

    let Some(block_type) = registry.get_block_type(name) else {
        return content;
    };
    let attributes = get_comment_attributes(block_type, &block.attributes);
    comment_delimited_content(name, &attributes, &content)
}

/// The block's saved HTML, or its original content when it is invalid.
pub fn get_block_inner_html(block: &Block, registry: &BlockRegistry) -> String {
    let original = block.original_content.clone().unwrap_or_default();
    if !block.is_valid && block.inner_blocks.is_empty() {
        return original;
    }
    match registry.get_block_type(&block.name) {
        Some(block_type) => {
            let inner = serialize_list(&block.inner_blocks, registry, true);
            get_save_content(&block_type.current(), &block.attributes, &inner)
        }
        None => original,
    }
}

/// The `save` output with the generated and custom classes merged into its
/// root element.
pub fn get_save_element(variant: &SaveVariant<'_>, attributes: &Attributes) -> Markup {
    let mut markup = (variant.save)(attributes);
    if let Some(root) = markup.root_element_mut() {
        let generated = variant
            .supports
            .class_name
            .then(|| default_class_name(variant.name));
        let custom = variant
            .supports
            .custom_class_name
            .then(|| attributes.get("className").and_then(Value::as_str))
            .flatten();
        root.merge_classes(generated.as_deref().as_slice(), custom.as_slice());
    }
    markup
}

/// Rendered `save` output, with `inner_blocks` at the placeholder.
pub fn get_save_content(variant: &SaveVariant<'_>, attributes: &Attributes, inner_blocks: &str) -> String {
    get_save_element(variant, attributes).render(inner_blocks)
}

/// Attributes that belong in the delimiter payload: those without a
/// source, present, and different from their default.
pub fn get_comment_attributes(block_type: &BlockType, attributes: &Attributes) -> Attributes {
    block_type
        .attributes
        .iter()
        .filter_map(|(key, schema)| {
            let value = attributes.get(key)?;
            if schema.source.is_some() || schema.default.as_ref() == Some(value) {
                return None;
            }
            Some((key.to_string(), value.clone()))
        })
        .collect()
}
