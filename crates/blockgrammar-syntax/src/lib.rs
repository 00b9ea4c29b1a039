//! # blockgrammar-syntax
//!
//! The text layer of block-delimited post content: the block comment
//! grammar and a light HTML tokenizer. Nothing here knows about block types.
//!
//! ## Architecture Overview
//!
//! ```text
//! Document → grammar::tokenize → Tokens → grammar::TreeBuilder → GrammarNodes
//! HTML     → html::lexer (Logos) → html::tokenize_html → HtmlTokens
//! ```
//!
//! The grammar stage is lossless: every byte of the document lands in
//! exactly one token, and every [`GrammarNode`] records the byte [`Span`] it
//! was parsed from.
//!
//! ## Quick Start
//!
//! ```
//! use blockgrammar_syntax::parse;
//!
//! let nodes = parse("<p>A</p><!-- wp:separator /--><p>B</p>");
//! assert_eq!(nodes.len(), 3);
//! assert_eq!(nodes[1].block_name.as_deref(), Some("core/separator"));
//! assert!(nodes[0].is_freeform());
//! ```
//!
//! ## Modules
//!
//! - [`grammar`] - delimiter tokenizer, tree builder, node serialization
//! - [`html`] - HTML tokens for markup comparison
//! - [`span`] / [`cursor`] - byte ranges and the scanning cursor

pub mod cursor;
pub mod grammar;
pub mod html;
pub mod span;

pub use grammar::{GrammarNode, RawSerializeOptions, parse, serialize_raw_block};
pub use span::Span;
