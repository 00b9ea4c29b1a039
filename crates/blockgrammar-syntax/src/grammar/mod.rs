//! # Block grammar
//!
//! Block-delimited post content is HTML in which blocks are marked out by
//! comments carrying a JSON payload:
//!
//! ```text
//! <!-- wp:paragraph {"align":"center"} -->
//! <p class="has-text-align-center">Hello</p>
//! <!-- /wp:paragraph -->
//! <!-- wp:separator /-->
//! ```
//!
//! Parsing runs in two stages:
//!
//! ```text
//! Document → tokenize → Tokens → TreeBuilder → GrammarNodes
//! ```
//!
//! ## Modules
//!
//! - [`token`] - token types and the linear tokenizer
//! - [`delimiter`] - recognising one comment delimiter
//! - [`builder`] - stack-based tree assembly
//! - [`node`] - the [`GrammarNode`] tree
//! - [`serialize`] - delimiter and node serialization

pub mod builder;
pub mod delimiter;
pub mod node;
pub mod serialize;
pub mod token;

pub use builder::{TreeBuilder, build};
pub use node::GrammarNode;
pub use serialize::{
    RawSerializeOptions, comment_delimited_content, delimiter_name, serialize_attributes,
    serialize_raw_block,
};
pub use token::{Delimiter, DelimiterKind, Token, tokenize};

/// Parse a document into grammar nodes. Never fails.
pub fn parse(document: &str) -> Vec<GrammarNode> {
    build(tokenize(document))
}
