//! # Core block library
//!
//! Definitions of the core block types, enough to parse, validate and
//! re-save typical posts and to exercise every attribute source.
//!
//! ```
//! use blockgrammar_engine::block::BlockRegistry;
//! use blockgrammar_engine::library::register_core_blocks;
//!
//! let mut registry = BlockRegistry::new();
//! register_core_blocks(&mut registry).unwrap();
//! assert_eq!(registry.get_unknown_type_handler_name(), Some("core/freeform"));
//! ```
//!
//! ## Modules
//!
//! - `text` - paragraph, heading, list
//! - `media` - image, gallery
//! - `layout` - separator, group
//! - `fallback` - html, freeform, missing
//! - `dynamic` - latest posts, saved as a void delimiter

mod dynamic;
mod fallback;
mod layout;
mod media;
mod text;

use serde_json::Value;

use crate::block::{Attributes, BlockRegistry};
use crate::error::BlockError;
use crate::markup::Markup;

pub use dynamic::latest_posts;
pub use fallback::{freeform, html, missing};
pub use layout::{group, separator};
pub use media::{gallery, image};
pub use text::{heading, list, paragraph};

pub const FREEFORM: &str = "core/freeform";
pub const MISSING: &str = "core/missing";
pub const PARAGRAPH: &str = "core/paragraph";

/// Register every core block type and the core handler names.
pub fn register_core_blocks(registry: &mut BlockRegistry) -> Result<(), BlockError> {
    for block_type in [
        paragraph(),
        heading(),
        list(),
        image(),
        gallery(),
        separator(),
        group(),
        html(),
        freeform(),
        missing(),
        latest_posts(),
    ] {
        registry.register_block_type(block_type)?;
    }
    registry.set_freeform_content_handler_name(FREEFORM);
    registry.set_unregistered_type_handler_name(MISSING);
    registry.set_default_block_name(PARAGRAPH);
    Ok(())
}

/// A registry holding the core library.
pub fn core_registry() -> Result<BlockRegistry, BlockError> {
    let mut registry = BlockRegistry::new();
    register_core_blocks(&mut registry)?;
    Ok(registry)
}

fn string<'a>(attributes: &'a Attributes, key: &str) -> Option<&'a str> {
    attributes.get(key).and_then(Value::as_str)
}

fn flag(attributes: &Attributes, key: &str) -> bool {
    attributes.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Stored HTML of a rich text attribute.
fn rich_text(attributes: &Attributes, key: &str) -> Markup {
    Markup::raw(string(attributes, key).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_everything_once() {
        let registry = core_registry().unwrap();
        assert_eq!(registry.get_block_types().len(), 11);
        assert_eq!(registry.get_freeform_content_handler_name(), Some(FREEFORM));
        assert_eq!(registry.get_unregistered_type_handler_name(), Some(MISSING));
        assert_eq!(registry.get_default_block_name(), Some(PARAGRAPH));

        let mut again = registry.clone();
        assert_eq!(
            register_core_blocks(&mut again),
            Err(BlockError::AlreadyRegistered("core/paragraph".into()))
        );
    }
}
