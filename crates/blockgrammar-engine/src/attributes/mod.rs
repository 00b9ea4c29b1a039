//! # Attributes
//!
//! Hydration computes a block's attributes from two places: the JSON
//! payload of its opening delimiter, and values extracted from its HTML by
//! each schema entry's [`AttributeSource`]. Values that fail their type or
//! enum check are dropped and the schema default applies.
//!
//! ```
//! use blockgrammar_engine::attributes::get_block_attributes;
//! use blockgrammar_engine::block::{AttributeSchema, AttributeSet, AttributeSource};
//! use serde_json::{json, Map};
//!
//! let schema = AttributeSet::new()
//!     .with("content", AttributeSchema::string().source(AttributeSource::html("p")))
//!     .with("level", AttributeSchema::number().default_value(json!(2)));
//! let attributes = get_block_attributes(&schema, "<p>Hi</p>", &Map::new(), None);
//! assert_eq!(serde_json::Value::Object(attributes), json!({"content": "Hi", "level": 2}));
//! ```
//!
//! ## Modules
//!
//! - [`extract`] - source extractors over the arena DOM

pub mod extract;

use std::collections::HashMap;

use serde_json::Value;

use crate::block::{AttributeSchema, AttributeSet, AttributeSource, Attributes};

pub use extract::{SourceHtml, extract};

/// Host access to post meta, for `meta` sourced attributes.
pub trait PostMeta {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
}

impl PostMeta for HashMap<String, Value> {
    fn get(&self, key: &str) -> Option<Value> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.insert(key.to_string(), value);
    }
}

/// One attribute's value, or `None` when it has neither a valid value nor
/// a default.
pub fn get_block_attribute(
    key: &str,
    schema: &AttributeSchema,
    html: &SourceHtml<'_>,
    comment_attributes: &Attributes,
    meta: Option<&dyn PostMeta>,
) -> Option<Value> {
    let value = match &schema.source {
        None => comment_attributes.get(key).cloned(),
        Some(source) => extract(source, schema.kind, html, meta),
    };
    value
        .filter(|v| schema.accepts(v))
        .or_else(|| schema.default.clone())
}

/// Every attribute of `schema`, in schema order. Keys without a value are
/// left out.
pub fn get_block_attributes(
    schema: &AttributeSet,
    html: &str,
    comment_attributes: &Attributes,
    meta: Option<&dyn PostMeta>,
) -> Attributes {
    let html = SourceHtml::new(html);
    schema
        .iter()
        .filter_map(|(key, entry)| {
            get_block_attribute(key, entry, &html, comment_attributes, meta)
                .map(|value| (key.to_string(), value))
        })
        .collect()
}

/// Write every `meta` sourced attribute that has a value back to the host.
pub fn persist_meta_attributes(
    schema: &AttributeSet,
    attributes: &Attributes,
    meta: &mut dyn PostMeta,
) {
    for (key, entry) in schema.iter() {
        if let Some(AttributeSource::Meta { key: meta_key }) = &entry.source
            && let Some(value) = attributes.get(key)
        {
            meta.set(meta_key, value.clone());
        }
    }
}

/// Keep only schema attributes and fill in defaults, in schema order.
pub fn sanitize_block_attributes(schema: &AttributeSet, attributes: &Attributes) -> Attributes {
    schema
        .iter()
        .filter_map(|(key, entry)| {
            attributes
                .get(key)
                .cloned()
                .or_else(|| entry.default.clone())
                .map(|value| (key.to_string(), value))
        })
        .collect()
}
