//! Stack-based assembly of grammar tokens into a block tree.
//!
//! The builder never fails. Malformed grammar degrades to content:
//!
//! - a closer that does not match the innermost open block (or arrives with
//!   nothing open) is kept as literal text
//! - blocks still open at the end of the document close implicitly, nested
//!   ones attaching to their parents
//! - a payload that is not a JSON object becomes `{}` with a warning

use serde_json::{Map, Value};

use crate::grammar::node::GrammarNode;
use crate::grammar::token::{Delimiter, DelimiterKind, Token};
use crate::span::Span;

/// An open block awaiting its closer.
struct Frame {
    node: GrammarNode,
    /// Content seen since the last child or the opener.
    pending: String,
}

impl Frame {
    fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        self.node.push_html(&pending);
    }
}

/// Text outside any block, waiting to become a freeform node.
#[derive(Default)]
struct Freeform {
    text: String,
    span: Option<Span>,
}

#[derive(Default)]
pub struct TreeBuilder {
    stack: Vec<Frame>,
    freeform: Freeform,
    out: Vec<GrammarNode>,
    last_end: usize,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token<'_>) {
        self.last_end = self.last_end.max(token.span().end);
        match token {
            Token::Content { text, span } => self.push_text(text, span),
            Token::Delimiter(delimiter) => self.push_delimiter(delimiter),
        }
    }

    pub fn finish(mut self) -> Vec<GrammarNode> {
        while let Some(mut frame) = self.stack.pop() {
            log::warn!(
                "block {} is not closed; closing at end of document",
                frame.node.block_name.as_deref().unwrap_or_default()
            );
            frame.flush();
            frame.node.span.end = self.last_end;
            self.attach(frame.node);
        }
        self.flush_freeform();
        self.out
    }

    fn push_delimiter(&mut self, delimiter: Delimiter<'_>) {
        match delimiter.kind {
            DelimiterKind::Opener => {
                let attrs = parse_attrs(&delimiter);
                self.flush_freeform();
                self.stack.push(Frame {
                    node: GrammarNode::block(delimiter.name, attrs, delimiter.span),
                    pending: String::new(),
                });
            }
            DelimiterKind::Void => {
                let attrs = parse_attrs(&delimiter);
                let node = GrammarNode::block(delimiter.name, attrs, delimiter.span);
                self.attach(node);
            }
            DelimiterKind::Closer => {
                let matches_top = self
                    .stack
                    .last()
                    .is_some_and(|f| f.node.block_name.as_deref() == Some(delimiter.name.as_str()));
                if !matches_top {
                    log::warn!(
                        "closer for {} at byte {} has no matching opener; keeping it as content",
                        delimiter.name,
                        delimiter.span.start
                    );
                    self.push_text(delimiter.text, delimiter.span);
                    return;
                }
                if let Some(mut frame) = self.stack.pop() {
                    frame.flush();
                    frame.node.span.end = delimiter.span.end;
                    self.attach(frame.node);
                }
            }
        }
    }

    fn push_text(&mut self, text: &str, span: Span) {
        match self.stack.last_mut() {
            Some(frame) => frame.pending.push_str(text),
            None => {
                self.freeform.text.push_str(text);
                self.freeform.span = Some(match self.freeform.span {
                    Some(open) => open.cover(span),
                    None => span,
                });
            }
        }
    }

    fn attach(&mut self, node: GrammarNode) {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.flush();
                parent.node.push_child(node);
            }
            None => {
                self.flush_freeform();
                self.out.push(node);
            }
        }
    }

    fn flush_freeform(&mut self) {
        let Freeform { text, span } = std::mem::take(&mut self.freeform);
        if let Some(span) = span
            && !text.is_empty()
        {
            self.out.push(GrammarNode::freeform(text, span));
        }
    }
}

fn parse_attrs(delimiter: &Delimiter<'_>) -> Map<String, Value> {
    let Some(raw) = delimiter.attrs else {
        return Map::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            log::warn!(
                "attributes of {} are not a JSON object ({other}); using {{}}",
                delimiter.name
            );
            Map::new()
        }
        Err(err) => {
            log::warn!("invalid JSON attributes for {}: {err}; using {{}}", delimiter.name);
            Map::new()
        }
    }
}

/// Build a block tree from tokens.
pub fn build<'a>(tokens: impl IntoIterator<Item = Token<'a>>) -> Vec<GrammarNode> {
    let mut builder = TreeBuilder::new();
    for token in tokens {
        builder.push(token);
    }
    builder.finish()
}
