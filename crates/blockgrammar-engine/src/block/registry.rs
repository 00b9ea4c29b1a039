use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::block::{AttributeSchema, AttributeSet, BlockType, RawTransform, Transform};
use crate::dom::selector::Selector;
use crate::error::BlockError;

static BLOCK_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*/[a-z][a-z0-9-]*$").expect("valid regex"));

pub fn is_valid_block_name(name: &str) -> bool {
    BLOCK_NAME.is_match(name)
}

/// Registered block types plus the names of the fallback handlers.
///
/// Passed explicitly to parsing, serialization and paste handling, so tests
/// can build isolated registries.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    types: Vec<BlockType>,
    freeform_handler: Option<String>,
    unregistered_handler: Option<String>,
    default_block: Option<String>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block type.
    ///
    /// Checks the name and every selector used by attribute sources and raw
    /// transforms. With `custom_class_name` support a string `className`
    /// attribute is added to the schema.
    pub fn register_block_type(&mut self, mut block_type: BlockType) -> Result<(), BlockError> {
        if !is_valid_block_name(&block_type.name) {
            return Err(BlockError::InvalidName(block_type.name));
        }
        if self.get_block_type(&block_type.name).is_some() {
            return Err(BlockError::AlreadyRegistered(block_type.name));
        }

        let mut selectors: Vec<&str> = Vec::new();
        for (_, schema) in block_type.attributes.iter() {
            if let Some(source) = &schema.source {
                selectors.extend(source.selectors());
            }
        }
        for deprecation in &block_type.deprecated {
            for (_, schema) in deprecation.attributes.iter().flat_map(|set| set.iter()) {
                if let Some(source) = &schema.source {
                    selectors.extend(source.selectors());
                }
            }
        }
        selectors.extend(block_type.raw_transforms().filter_map(|t| t.selector.as_deref()));
        for selector in selectors {
            Selector::parse(selector)?;
        }

        let supports = block_type.supports;
        add_class_name_attribute(&mut block_type.attributes, supports.custom_class_name);
        for deprecation in &mut block_type.deprecated {
            let custom = deprecation.supports.unwrap_or(supports).custom_class_name;
            if let Some(attributes) = &mut deprecation.attributes {
                add_class_name_attribute(attributes, custom);
            }
        }

        debug!("Registered block type {}", block_type.name);
        self.types.push(block_type);
        Ok(())
    }

    pub fn unregister_block_type(&mut self, name: &str) -> Result<BlockType, BlockError> {
        let index = self
            .types
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| BlockError::NotRegistered(name.to_string()))?;
        debug!("Unregistered block type {name}");
        Ok(self.types.remove(index))
    }

    pub fn get_block_type(&self, name: &str) -> Option<&BlockType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// All block types in registration order.
    pub fn get_block_types(&self) -> &[BlockType] {
        &self.types
    }

    /// Raw transforms of every type in registration order, then stably
    /// sorted by priority.
    pub fn raw_transforms(&self) -> Vec<(&BlockType, &RawTransform)> {
        let mut all: Vec<_> = self
            .types
            .iter()
            .flat_map(|t| t.transforms.from.iter().map(move |tr| (t, tr)))
            .filter_map(|(t, tr)| match tr {
                Transform::Raw(raw) => Some((t, raw)),
                Transform::Block(_) => None,
            })
            .collect();
        all.sort_by_key(|(_, raw)| raw.priority);
        all
    }

    pub fn set_freeform_content_handler_name(&mut self, name: &str) {
        self.freeform_handler = Some(name.to_string());
    }

    pub fn get_freeform_content_handler_name(&self) -> Option<&str> {
        self.freeform_handler.as_deref()
    }

    pub fn set_unregistered_type_handler_name(&mut self, name: &str) {
        self.unregistered_handler = Some(name.to_string());
    }

    pub fn get_unregistered_type_handler_name(&self) -> Option<&str> {
        self.unregistered_handler.as_deref()
    }

    pub fn set_default_block_name(&mut self, name: &str) {
        self.default_block = Some(name.to_string());
    }

    pub fn get_default_block_name(&self) -> Option<&str> {
        self.default_block.as_deref()
    }

    /// The block that receives content nothing else claims. This is the
    /// freeform handler.
    pub fn get_unknown_type_handler_name(&self) -> Option<&str> {
        self.get_freeform_content_handler_name()
    }

    /// Whether `name` is the freeform or unregistered handler.
    pub fn is_fallback(&self, name: &str) -> bool {
        self.get_freeform_content_handler_name() == Some(name)
            || self.get_unregistered_type_handler_name() == Some(name)
    }
}

fn add_class_name_attribute(attributes: &mut AttributeSet, custom_class_name: bool) {
    if custom_class_name && !attributes.contains("className") {
        attributes.insert("className", AttributeSchema::string());
    }
}
