//! # Raw and paste handling
//!
//! Arbitrary HTML, typically from the clipboard, to blocks:
//!
//! ```text
//! HTML → Dom::parse → sanitize → wrap inline runs in <p>
//!      → each top-level node: first matching raw transform, else the
//!        unknown type handler
//! ```
//!
//! HTML that already carries block delimiters goes straight to the
//! [`crate::parser`].
//!
//! ## Modules
//!
//! - [`sanitize`] - pure arena-to-arena cleanup passes
//! - [`classify`] - inline versus block-level content
//! - [`phrasing`] - the phrasing content allow-list

pub mod classify;
pub mod phrasing;
pub mod sanitize;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockRegistry, BlockType, RawTransform};
use crate::dom::selector::Selector;
use crate::dom::{Dom, NodeId};
use crate::factory::create_block_from_html;
use crate::parser::parse;

pub use classify::{is_inline_content, is_inline_node};
pub use sanitize::{SanitizeOptions, sanitize, strip_to_phrasing, wrap_inline_runs};

const DELIMITER_MARK: &str = "<!-- wp:";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawMode {
    /// Inline HTML when everything pasted is inline, blocks otherwise.
    #[default]
    Auto,
    Blocks,
    /// Phrasing content only.
    Inline,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RawHandlerOptions<'a> {
    pub html: &'a str,
    pub mode: RawMode,
    pub can_user_use_unfiltered_html: bool,
}

impl<'a> RawHandlerOptions<'a> {
    pub fn new(html: &'a str) -> Self {
        Self {
            html,
            ..Self::default()
        }
    }

    fn sanitize_options(&self) -> SanitizeOptions {
        SanitizeOptions {
            allow_unfiltered_html: self.can_user_use_unfiltered_html,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PasteResult {
    /// HTML to insert into the current block.
    Inline(String),
    Blocks(Vec<Block>),
}

/// Convert HTML to blocks.
///
/// In [`RawMode::Inline`] the content is reduced to phrasing content and
/// hydrated as a single default block.
pub fn raw_handler(options: &RawHandlerOptions<'_>, registry: &BlockRegistry) -> Vec<Block> {
    if options.html.contains(DELIMITER_MARK) {
        return parse(options.html, registry);
    }

    let clean = sanitize(&Dom::parse(options.html), options.sanitize_options());
    if options.mode == RawMode::Inline {
        return default_block(&clean, registry).into_iter().collect();
    }

    let wrapped = wrap_inline_runs(&clean);
    let matchers = raw_matchers(registry);
    wrapped
        .element_children(wrapped.root())
        .flat_map(|id| match_node(&wrapped, id, registry, &matchers))
        .collect()
}

/// Like [`raw_handler`], but inline content comes back as HTML.
pub fn paste_handler(options: &RawHandlerOptions<'_>, registry: &BlockRegistry) -> PasteResult {
    if options.html.contains(DELIMITER_MARK) {
        return PasteResult::Blocks(parse(options.html, registry));
    }

    let clean = sanitize(&Dom::parse(options.html), options.sanitize_options());
    let inline = match options.mode {
        RawMode::Inline => true,
        RawMode::Auto => is_inline_content(&clean),
        RawMode::Blocks => false,
    };
    if inline {
        return PasteResult::Inline(phrasing_html(&clean));
    }

    let blocks = RawHandlerOptions {
        mode: RawMode::Blocks,
        ..*options
    };
    PasteResult::Blocks(raw_handler(&blocks, registry))
}

/// Sanitized phrasing content of `html`.
pub fn filter_inline_html(html: &str, options: SanitizeOptions) -> String {
    phrasing_html(&sanitize(&Dom::parse(html), options))
}

fn phrasing_html(clean: &Dom) -> String {
    let inline = strip_to_phrasing(clean);
    inline.inner_html(inline.root()).trim().to_string()
}

fn default_block(clean: &Dom, registry: &BlockRegistry) -> Option<Block> {
    let inline = phrasing_html(clean);
    if inline.is_empty() {
        return None;
    }
    let Some(name) = registry.get_default_block_name() else {
        warn!("No default block type; dropping inline paste");
        return None;
    };
    create_block_from_html(registry, name, &format!("<p>{inline}</p>"))
        .inspect_err(|err| warn!("{err}"))
        .ok()
}

/// A raw transform with its selector parsed.
struct RawMatcher<'r> {
    block_type: &'r BlockType,
    raw: &'r RawTransform,
    selector: Option<Selector>,
}

impl RawMatcher<'_> {
    fn matches(&self, dom: &Dom, id: NodeId) -> bool {
        self.selector.as_ref().is_some_and(|s| s.matches(dom, id))
            || self.raw.is_match.as_ref().is_some_and(|f| f(dom, id))
    }
}

/// Priority-ordered raw transforms, selectors parsed once.
fn raw_matchers(registry: &BlockRegistry) -> Vec<RawMatcher<'_>> {
    registry
        .raw_transforms()
        .into_iter()
        .map(|(block_type, raw)| RawMatcher {
            block_type,
            raw,
            selector: raw.selector.as_deref().and_then(|s| {
                Selector::parse(s)
                    .inspect_err(|err| warn!("Raw transform of `{}`: {err}", block_type.name))
                    .ok()
            }),
        })
        .collect()
}

/// Blocks for one top-level node: the first raw transform whose selector
/// or predicate matches, else the unknown type handler.
pub fn node_to_blocks(dom: &Dom, id: NodeId, registry: &BlockRegistry) -> Vec<Block> {
    match_node(dom, id, registry, &raw_matchers(registry))
}

fn match_node(dom: &Dom, id: NodeId, registry: &BlockRegistry, matchers: &[RawMatcher<'_>]) -> Vec<Block> {
    if let Some(matcher) = matchers.iter().find(|m| m.matches(dom, id)) {
        let name = &matcher.block_type.name;
        debug!("<{}> matched a raw transform of `{name}`", dom.tag(id).unwrap_or("#text"));
        return match &matcher.raw.transform {
            Some(transform) => transform(dom, id, registry),
            None => hydrate(registry, name, &dom.outer_html(id)),
        };
    }

    match registry.get_unknown_type_handler_name() {
        Some(name) => hydrate(registry, name, &dom.outer_html(id)),
        None => {
            warn!("No raw transform or unknown type handler for <{}>", dom.tag(id).unwrap_or("#text"));
            Vec::new()
        }
    }
}

fn hydrate(registry: &BlockRegistry, name: &str, html: &str) -> Vec<Block> {
    create_block_from_html(registry, name, html)
        .inspect_err(|err| warn!("{err}"))
        .into_iter()
        .collect()
}
