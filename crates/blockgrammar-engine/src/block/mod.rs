//! # Blocks
//!
//! Block type definitions and the block instances built from them.
//!
//! A [`BlockType`] bundles an attribute schema, a pure `save` function, an
//! ordered list of [`Deprecation`]s (most recent first) and transform rules.
//! A [`Block`] is one hydrated instance in a parsed tree.
//!
//! ## Modules
//!
//! - [`schema`] - attribute types, sources and ordered schema sets
//! - [`registry`] - the injectable [`BlockRegistry`]

pub mod registry;
pub mod schema;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::dom::{Dom, NodeId};
use crate::markup::Markup;
use crate::validation::ValidationIssue;

pub use registry::BlockRegistry;
pub use schema::{AttributeSchema, AttributeSet, AttributeSource, AttributeType};

/// Attribute values keyed by name, in schema order.
pub type Attributes = Map<String, Value>;

pub type SaveFn = Arc<dyn Fn(&Attributes) -> Markup + Send + Sync>;
pub type MigrateFn = Arc<dyn Fn(&Attributes, &[Block]) -> (Attributes, Vec<Block>) + Send + Sync>;
pub type EligibleFn = Arc<dyn Fn(&Attributes, &[Block]) -> bool + Send + Sync>;
pub type RawMatchFn = Arc<dyn Fn(&Dom, NodeId) -> bool + Send + Sync>;
pub type RawTransformFn = Arc<dyn Fn(&Dom, NodeId, &BlockRegistry) -> Vec<Block> + Send + Sync>;
pub type BlockTransformFn = Arc<dyn Fn(&Block) -> Attributes + Send + Sync>;

/// Optional behaviours a block type opts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Supports {
    /// Add the generated `wp-block-…` class to the saved root element.
    pub class_name: bool,
    /// Accept a `className` attribute and merge it into the saved root.
    pub custom_class_name: bool,
}

impl Default for Supports {
    fn default() -> Self {
        Self {
            class_name: true,
            custom_class_name: true,
        }
    }
}

impl Supports {
    pub fn none() -> Self {
        Self {
            class_name: false,
            custom_class_name: false,
        }
    }
}

/// An earlier version of a block type's save output.
#[derive(Clone)]
pub struct Deprecation {
    /// Defaults to the current type's attributes.
    pub attributes: Option<AttributeSet>,
    /// Defaults to the current type's supports.
    pub supports: Option<Supports>,
    pub save: SaveFn,
    pub migrate: Option<MigrateFn>,
    pub is_eligible: Option<EligibleFn>,
}

impl Deprecation {
    pub fn new(save: impl Fn(&Attributes) -> Markup + Send + Sync + 'static) -> Self {
        Self {
            attributes: None,
            supports: None,
            save: Arc::new(save),
            migrate: None,
            is_eligible: None,
        }
    }

    pub fn attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn supports(mut self, supports: Supports) -> Self {
        self.supports = Some(supports);
        self
    }

    pub fn migrate(
        mut self,
        migrate: impl Fn(&Attributes, &[Block]) -> (Attributes, Vec<Block>) + Send + Sync + 'static,
    ) -> Self {
        self.migrate = Some(Arc::new(migrate));
        self
    }

    pub fn is_eligible(
        mut self,
        is_eligible: impl Fn(&Attributes, &[Block]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_eligible = Some(Arc::new(is_eligible));
        self
    }
}

impl fmt::Debug for Deprecation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deprecation")
            .field("attributes", &self.attributes)
            .field("supports", &self.supports)
            .field("migrate", &self.migrate.is_some())
            .field("is_eligible", &self.is_eligible.is_some())
            .finish_non_exhaustive()
    }
}

/// Converts pasted HTML nodes into blocks.
#[derive(Clone)]
pub struct RawTransform {
    pub selector: Option<String>,
    pub is_match: Option<RawMatchFn>,
    /// Without one, the block type hydrates from the node's outer HTML.
    pub transform: Option<RawTransformFn>,
    /// Lower runs first.
    pub priority: i32,
}

impl RawTransform {
    pub const DEFAULT_PRIORITY: i32 = 10;

    pub fn selector(selector: &str) -> Self {
        Self {
            selector: Some(selector.to_string()),
            is_match: None,
            transform: None,
            priority: Self::DEFAULT_PRIORITY,
        }
    }

    pub fn matching(is_match: impl Fn(&Dom, NodeId) -> bool + Send + Sync + 'static) -> Self {
        Self {
            selector: None,
            is_match: Some(Arc::new(is_match)),
            transform: None,
            priority: Self::DEFAULT_PRIORITY,
        }
    }

    pub fn transform(
        mut self,
        transform: impl Fn(&Dom, NodeId, &BlockRegistry) -> Vec<Block> + Send + Sync + 'static,
    ) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl fmt::Debug for RawTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawTransform")
            .field("selector", &self.selector)
            .field("is_match", &self.is_match.is_some())
            .field("transform", &self.transform.is_some())
            .field("priority", &self.priority)
            .finish()
    }
}

/// Converts between block types. In `from` lists `blocks` names the
/// sources, in `to` lists the targets.
#[derive(Clone)]
pub struct BlockTransform {
    pub blocks: Vec<String>,
    pub transform: BlockTransformFn,
}

impl BlockTransform {
    pub fn new(
        blocks: &[&str],
        transform: impl Fn(&Block) -> Attributes + Send + Sync + 'static,
    ) -> Self {
        Self {
            blocks: blocks.iter().map(|b| b.to_string()).collect(),
            transform: Arc::new(transform),
        }
    }
}

impl fmt::Debug for BlockTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockTransform")
            .field("blocks", &self.blocks)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Transform {
    Raw(RawTransform),
    Block(BlockTransform),
}

#[derive(Debug, Clone, Default)]
pub struct Transforms {
    pub from: Vec<Transform>,
    pub to: Vec<Transform>,
}

#[derive(Clone)]
pub struct BlockType {
    pub name: String,
    pub title: String,
    pub attributes: AttributeSet,
    pub supports: Supports,
    pub save: SaveFn,
    pub deprecated: Vec<Deprecation>,
    pub transforms: Transforms,
}

impl BlockType {
    pub fn new(name: &str, save: impl Fn(&Attributes) -> Markup + Send + Sync + 'static) -> Self {
        Self {
            name: name.to_string(),
            title: name.to_string(),
            attributes: AttributeSet::new(),
            supports: Supports::default(),
            save: Arc::new(save),
            deprecated: Vec::new(),
            transforms: Transforms::default(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn attribute(mut self, name: &str, schema: AttributeSchema) -> Self {
        self.attributes.insert(name, schema);
        self
    }

    pub fn supports(mut self, supports: Supports) -> Self {
        self.supports = supports;
        self
    }

    /// Append a deprecation. Add the most recent first.
    pub fn deprecation(mut self, deprecation: Deprecation) -> Self {
        self.deprecated.push(deprecation);
        self
    }

    pub fn transform_from(mut self, transform: Transform) -> Self {
        self.transforms.from.push(transform);
        self
    }

    pub fn transform_to(mut self, transform: Transform) -> Self {
        self.transforms.to.push(transform);
        self
    }

    /// The class added to saved root elements, e.g. `wp-block-my-plugin-widget`.
    pub fn default_class_name(&self) -> String {
        default_class_name(&self.name)
    }

    pub fn raw_transforms(&self) -> impl Iterator<Item = &RawTransform> {
        self.transforms.from.iter().filter_map(|t| match t {
            Transform::Raw(raw) => Some(raw),
            Transform::Block(_) => None,
        })
    }

    /// The current definition as a save variant.
    pub fn current(&self) -> SaveVariant<'_> {
        SaveVariant {
            name: &self.name,
            attributes: &self.attributes,
            supports: self.supports,
            save: &self.save,
        }
    }

    /// `deprecated[index]`, with the current attributes and supports filled
    /// in where the deprecation leaves them out.
    pub fn deprecated_variant(&self, index: usize) -> Option<SaveVariant<'_>> {
        let deprecation = self.deprecated.get(index)?;
        Some(SaveVariant {
            name: &self.name,
            attributes: deprecation.attributes.as_ref().unwrap_or(&self.attributes),
            supports: deprecation.supports.unwrap_or(self.supports),
            save: &deprecation.save,
        })
    }
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockType")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("attributes", &self.attributes)
            .field("supports", &self.supports)
            .field("deprecated", &self.deprecated)
            .field("transforms", &self.transforms)
            .finish_non_exhaustive()
    }
}

/// Everything needed to hydrate and save one version of a block type.
#[derive(Clone, Copy)]
pub struct SaveVariant<'a> {
    pub name: &'a str,
    pub attributes: &'a AttributeSet,
    pub supports: Supports,
    pub save: &'a SaveFn,
}

pub fn default_class_name(block_name: &str) -> String {
    let name = block_name.strip_prefix("core/").unwrap_or(block_name);
    format!("wp-block-{}", name.replace('/', "-"))
}

/// A hydrated block in a parsed tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub client_id: Uuid,
    pub name: String,
    pub is_valid: bool,
    pub attributes: Attributes,
    pub inner_blocks: Vec<Block>,
    /// Trimmed inner HTML as parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_issues: Vec<ValidationIssue>,
    /// Exact delimited source, kept for invalid blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Block {
    pub fn new(name: &str, attributes: Attributes, inner_blocks: Vec<Block>) -> Self {
        Self {
            client_id: Uuid::new_v4(),
            name: name.to_string(),
            is_valid: true,
            attributes,
            inner_blocks,
            original_content: None,
            validation_issues: Vec::new(),
            source: None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn str_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    /// Names, attributes and inner block order, ignoring client ids and
    /// parse bookkeeping.
    pub fn same_structure(&self, other: &Block) -> bool {
        self.name == other.name
            && self.attributes == other.attributes
            && self.inner_blocks.len() == other.inner_blocks.len()
            && self
                .inner_blocks
                .iter()
                .zip(&other.inner_blocks)
                .all(|(a, b)| a.same_structure(b))
    }
}
