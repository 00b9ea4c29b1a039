use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::span::Span;

/// A node of the block tree as produced by the grammar, before any block
/// type knowledge is applied.
///
/// `inner_content` interleaves the node's own HTML chunks with `None`
/// placeholders, one per entry of `inner_blocks`, in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarNode {
    /// `None` for freeform content outside any block.
    pub block_name: Option<String>,
    pub attrs: Map<String, Value>,
    pub inner_blocks: Vec<GrammarNode>,
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
    pub inner_content: Vec<Option<String>>,
    /// Byte range of the whole node (delimiters included) in the source.
    #[serde(skip)]
    pub span: Span,
}

impl GrammarNode {
    /// A freeform node holding literal document text.
    pub fn freeform(html: impl Into<String>, span: Span) -> Self {
        let html = html.into();
        Self {
            block_name: None,
            attrs: Map::new(),
            inner_blocks: Vec::new(),
            inner_content: vec![Some(html.clone())],
            inner_html: html,
            span,
        }
    }

    /// An empty block node; content is appended by the tree builder.
    pub fn block(name: impl Into<String>, attrs: Map<String, Value>, span: Span) -> Self {
        Self {
            block_name: Some(name.into()),
            attrs,
            span,
            ..Self::default()
        }
    }

    pub fn is_freeform(&self) -> bool {
        self.block_name.is_none()
    }

    /// The exact markup this node was parsed from.
    pub fn source<'d>(&self, document: &'d str) -> &'d str {
        self.span.slice(document)
    }

    /// Append an HTML chunk to this node's own content.
    pub fn push_html(&mut self, html: &str) {
        if html.is_empty() {
            return;
        }
        self.inner_html.push_str(html);
        self.inner_content.push(Some(html.to_string()));
    }

    /// Append a child block and its placeholder slot.
    pub fn push_child(&mut self, child: GrammarNode) {
        self.inner_blocks.push(child);
        self.inner_content.push(None);
    }
}

impl PartialEq for GrammarNode {
    fn eq(&self, other: &Self) -> bool {
        self.block_name == other.block_name
            && self.attrs == other.attrs
            && self.inner_blocks == other.inner_blocks
            && self.inner_html == other.inner_html
            && self.inner_content == other.inner_content
    }
}
