//! Creating, cloning and converting block instances.

use serde_json::Map;
use uuid::Uuid;

use crate::attributes::{get_block_attributes, sanitize_block_attributes};
use crate::block::registry::is_valid_block_name;
use crate::block::{Attributes, Block, BlockRegistry, Transform};
use crate::error::BlockError;

/// Create a block of a registered type. Unknown attributes are dropped and
/// defaults filled in.
pub fn create_block(
    registry: &BlockRegistry,
    name: &str,
    attributes: Attributes,
    inner_blocks: Vec<Block>,
) -> Result<Block, BlockError> {
    if !is_valid_block_name(name) {
        return Err(BlockError::InvalidName(name.to_string()));
    }
    let block_type = registry
        .get_block_type(name)
        .ok_or_else(|| BlockError::NotRegistered(name.to_string()))?;
    Ok(Block::new(
        name,
        sanitize_block_attributes(&block_type.attributes, &attributes),
        inner_blocks,
    ))
}

/// Create a block whose attributes are hydrated from `html`.
pub fn create_block_from_html(
    registry: &BlockRegistry,
    name: &str,
    html: &str,
) -> Result<Block, BlockError> {
    let block_type = registry
        .get_block_type(name)
        .ok_or_else(|| BlockError::NotRegistered(name.to_string()))?;
    let attributes = get_block_attributes(&block_type.attributes, html, &Map::new(), None);
    create_block(registry, name, attributes, Vec::new())
}

/// Deep copy with fresh client ids.
pub fn clone_block(block: &Block) -> Block {
    Block {
        client_id: Uuid::new_v4(),
        inner_blocks: block.inner_blocks.iter().map(clone_block).collect(),
        ..block.clone()
    }
}

/// [`clone_block`], with `attributes` merged over the copy's and optionally
/// new inner blocks.
pub fn clone_block_with(block: &Block, attributes: Attributes, inner_blocks: Option<Vec<Block>>) -> Block {
    let mut copy = clone_block(block);
    copy.attributes.extend(attributes);
    if let Some(inner_blocks) = inner_blocks {
        copy.inner_blocks = inner_blocks;
    }
    copy
}

/// Convert `block` to `target` through a block transform, looking first at
/// the source type's `to` rules, then the target's `from` rules.
pub fn switch_to_block_type(
    registry: &BlockRegistry,
    block: &Block,
    target: &str,
) -> Result<Block, BlockError> {
    let source_type = registry
        .get_block_type(&block.name)
        .ok_or_else(|| BlockError::NotRegistered(block.name.clone()))?;
    let target_type = registry
        .get_block_type(target)
        .ok_or_else(|| BlockError::NotRegistered(target.to_string()))?;

    let to = source_type.transforms.to.iter().find_map(|t| match t {
        Transform::Block(rule) if rule.blocks.iter().any(|b| b == target) => Some(rule),
        _ => None,
    });
    let from = || {
        target_type.transforms.from.iter().find_map(|t| match t {
            Transform::Block(rule) if rule.blocks.iter().any(|b| *b == block.name || b == "*") => {
                Some(rule)
            }
            _ => None,
        })
    };
    let rule = to.or_else(from).ok_or_else(|| BlockError::NoTransform {
        name: block.name.clone(),
        target: target.to_string(),
    })?;

    let attributes = (rule.transform)(block);
    let inner_blocks = block.inner_blocks.iter().map(clone_block).collect();
    create_block(registry, target, attributes, inner_blocks)
}
