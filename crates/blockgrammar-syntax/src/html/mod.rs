//! # HTML tokens
//!
//! A small, forgiving HTML tokenizer used to compare markup for
//! equivalence. It does not build a tree.
//!
//! ## Modules
//!
//! - [`lexer`] - Logos-based coarse lexer
//! - [`tokens`] - start/end tags with decoded attributes, text and comments

pub mod lexer;
pub mod tokens;

pub use tokens::{HtmlToken, MalformedHtml, tokenize_html};
