//! Validating a freshly hydrated block and upgrading it through deprecated
//! definitions.
//!
//! ```text
//! TryCurrent ──valid──────────────────────────────▶ Valid
//!     │ invalid (after the class name fix)
//!     ▼
//! TryDeprecated(0) ──match──▶ migrate ──▶ Valid
//!     │ no match
//!     ▼
//! TryDeprecated(1) … ──none left──▶ Invalid
//! ```
//!
//! The first deprecation that matches wins. A block that is already valid
//! only tries deprecations whose `is_eligible` accepts it.

use log::{debug, info};
use serde_json::Value;

use crate::attributes::{PostMeta, get_block_attributes};
use crate::block::{Attributes, Block, BlockType, SaveVariant};
use crate::dom::Dom;
use crate::serializer::get_save_content;
use crate::validation::{emit_issues, validate_block};

/// Validate `block` against its current definition, then deprecations.
///
/// Issues are logged only when the block ends up invalid.
pub fn validate_and_migrate(
    block: &mut Block,
    block_type: &BlockType,
    comment_attributes: &Attributes,
    meta: Option<&dyn PostMeta>,
) {
    apply_block_validation(block, block_type);
    let was_valid = block.is_valid;
    let migrated_from = apply_deprecated_versions(block, block_type, comment_attributes, meta);

    match (was_valid, migrated_from) {
        (_, Some(index)) => info!(
            "Block `{}` updated from deprecated definition {index}.",
            block.name
        ),
        (false, None) => emit_issues(&block.validation_issues),
        (true, None) => {}
    }
}

/// Validate against the current definition, retrying once with the custom
/// class name fix.
pub fn apply_block_validation(block: &mut Block, block_type: &BlockType) {
    let original = block.original_content.clone().unwrap_or_default();
    let current = block_type.current();

    let (mut is_valid, mut issues) = validate_block(&current, &block.attributes, &original);
    if !is_valid {
        let fixed = fix_custom_class_name(&current, &block.attributes, &original);
        if fixed != block.attributes {
            debug!("Retrying `{}` with custom class names from its markup", block.name);
            (is_valid, issues) = validate_block(&current, &fixed, &original);
            block.attributes = fixed;
        }
    }

    block.is_valid = is_valid;
    block.validation_issues = if is_valid { Vec::new() } else { issues };
}

/// Try each deprecation in order and apply the first that matches.
/// Returns its index.
pub fn apply_deprecated_versions(
    block: &mut Block,
    block_type: &BlockType,
    comment_attributes: &Attributes,
    meta: Option<&dyn PostMeta>,
) -> Option<usize> {
    let original = block.original_content.clone().unwrap_or_default();

    for (index, deprecation) in block_type.deprecated.iter().enumerate() {
        let eligible = deprecation
            .is_eligible
            .as_ref()
            .is_some_and(|is_eligible| is_eligible(comment_attributes, &block.inner_blocks));
        if block.is_valid && !eligible {
            continue;
        }
        let Some(variant) = block_type.deprecated_variant(index) else {
            continue;
        };

        let mut attributes =
            get_block_attributes(variant.attributes, &original, comment_attributes, meta);
        let (mut is_valid, _) = validate_block(&variant, &attributes, &original);
        if !is_valid {
            attributes = fix_custom_class_name(&variant, &attributes, &original);
            (is_valid, _) = validate_block(&variant, &attributes, &original);
        }
        if !is_valid {
            continue;
        }

        let (attributes, inner_blocks) = match &deprecation.migrate {
            Some(migrate) => migrate(&attributes, &block.inner_blocks),
            None => (attributes, block.inner_blocks.clone()),
        };
        block.attributes = attributes;
        block.inner_blocks = inner_blocks;
        block.is_valid = true;
        block.validation_issues.clear();
        return Some(index);
    }

    None
}

/// Move classes found on the stored root element, but not produced by
/// `save`, into the `className` attribute.
pub fn fix_custom_class_name(
    variant: &SaveVariant<'_>,
    attributes: &Attributes,
    original_content: &str,
) -> Attributes {
    if !variant.supports.custom_class_name {
        return attributes.clone();
    }

    let mut fixed = attributes.clone();
    fixed.remove("className");
    let serialized = get_save_content(variant, &fixed, "");
    let default_classes = root_classes(&serialized);
    let custom: Vec<String> = root_classes(original_content)
        .into_iter()
        .filter(|class| !default_classes.contains(class))
        .collect();

    if !custom.is_empty() {
        fixed.insert("className".to_string(), Value::String(custom.join(" ")));
    } else if serialized.is_empty() {
        return attributes.clone();
    }
    fixed
}

/// Classes of the first element in `html`.
fn root_classes(html: &str) -> Vec<String> {
    let dom = Dom::parse(html);
    dom.element_children(dom.root())
        .next()
        .and_then(|root| dom.attr(root, "class"))
        .map(|class| class.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}
