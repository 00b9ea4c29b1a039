//! # blockgrammar-engine
//!
//! Block types, and everything that turns stored post content into block
//! instances and back.
//!
//! ## Architecture Overview
//!
//! ```text
//! Content → blockgrammar_syntax::parse → parser (hydrate, validate, migrate) → Blocks
//! Blocks  → serializer (save, comment delimiters) → Content
//! HTML    → raw (sanitize, raw transforms) → Blocks
//! ```
//!
//! Block types live in a [`BlockRegistry`]. Each type names its attributes,
//! where in the saved markup they come from, and how it saves. Stored
//! markup that no longer matches what the type would save is either
//! upgraded through a deprecated definition or kept verbatim as an invalid
//! block.
//!
//! ## Quick Start
//!
//! ```
//! use blockgrammar_engine::{core_registry, parse, serialize};
//!
//! let registry = core_registry().unwrap();
//! let content = "<!-- wp:paragraph -->\n<p>Hello</p>\n<!-- /wp:paragraph -->";
//!
//! let blocks = parse(content, &registry);
//! assert_eq!(blocks[0].name, "core/paragraph");
//! assert_eq!(blocks[0].str_attribute("content"), Some("Hello"));
//! assert!(blocks[0].is_valid);
//!
//! assert_eq!(serialize(&blocks, &registry), content);
//! ```
//!
//! ## Modules
//!
//! - [`block`] - block types, the registry, block instances
//! - [`attributes`] - attribute sources and extraction from markup
//! - [`parser`] / [`serializer`] - content to blocks and back
//! - [`validation`] - markup equivalence and deprecation migration
//! - [`raw`] - pasted HTML to blocks
//! - [`factory`] - creating, cloning and switching blocks
//! - [`markup`] / [`dom`] - saved markup trees and parsed HTML documents
//! - [`library`] - the core block types

pub mod attributes;
pub mod block;
pub mod dom;
pub mod error;
pub mod factory;
pub mod library;
pub mod markup;
pub mod parser;
pub mod raw;
pub mod serializer;
pub mod validation;

pub use attributes::{PostMeta, persist_meta_attributes};
pub use block::{Block, BlockRegistry, BlockType};
pub use error::BlockError;
pub use factory::{create_block, switch_to_block_type};
pub use library::{core_registry, register_core_blocks};
pub use parser::{ParseOptions, parse, parse_with_options};
pub use raw::{PasteResult, RawHandlerOptions, RawMode, paste_handler, raw_handler};
pub use serializer::{serialize, serialize_block};
