//! Token types and the single-pass grammar tokenizer.
//!
//! The tokenizer walks the document once, looking for `<!--`. Each candidate
//! is handed to [`parse_delimiter`]; when it does not form a block delimiter
//! the bytes stay part of the surrounding content run. Every byte of the
//! input ends up in exactly one token, so concatenating token texts gives the
//! document back.

use crate::cursor::Cursor;
use crate::grammar::delimiter::parse_delimiter;
use crate::span::Span;

/// Which of the three delimiter shapes a comment matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterKind {
    /// `<!-- wp:name {json} -->`
    Opener,
    /// `<!-- /wp:name -->`
    Closer,
    /// `<!-- wp:name {json} /-->`
    Void,
}

/// A recognised block comment delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter<'a> {
    pub kind: DelimiterKind,
    /// Fully qualified block name (bare names get the `core/` namespace).
    pub name: String,
    /// Raw JSON payload including braces. Not parsed here.
    pub attrs: Option<&'a str>,
    /// The whole delimiter text, `<!--` through `-->`.
    pub text: &'a str,
    pub span: Span,
}

/// A grammar token in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Delimiter(Delimiter<'a>),
    /// A run of text that is not a block delimiter.
    Content { text: &'a str, span: Span },
}

impl<'a> Token<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Token::Delimiter(d) => d.text,
            Token::Content { text, .. } => text,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Token::Delimiter(d) => d.span,
            Token::Content { span, .. } => *span,
        }
    }
}

/// Tokenize a document into delimiters and content runs.
///
/// Linear in the document length apart from the payload scan of a
/// candidate delimiter whose JSON never terminates.
pub fn tokenize(document: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut cur = Cursor::new(document);
    let mut content_start = 0;

    while !cur.eof() {
        let Some(offset) = cur.rest().find("<!--") else {
            break;
        };
        let candidate = cur.pos() + offset;
        cur.seek(candidate);

        match parse_delimiter(&mut cur) {
            Some(delimiter) => {
                if candidate > content_start {
                    push_content(&mut tokens, document, content_start, candidate);
                }
                content_start = delimiter.span.end;
                tokens.push(Token::Delimiter(delimiter));
            }
            None => {
                cur.seek(candidate + 1);
            }
        }
    }

    if document.len() > content_start {
        push_content(&mut tokens, document, content_start, document.len());
    }

    tokens
}

fn push_content<'a>(tokens: &mut Vec<Token<'a>>, document: &'a str, start: usize, end: usize) {
    let span = Span::new(start, end);
    tokens.push(Token::Content {
        text: span.slice(document),
        span,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(doc: &str) -> Vec<String> {
        tokenize(doc)
            .iter()
            .map(|t| match t {
                Token::Delimiter(d) => format!("{:?}({})", d.kind, d.name),
                Token::Content { text, .. } => format!("Content({text:?})"),
            })
            .collect()
    }

    #[test]
    fn tokens_cover_every_byte() {
        let doc = "a<!-- wp:p -->b<!-- /wp:p --><!-- x -->c<!-- wp:sep /-->";
        let joined: String = tokenize(doc).iter().map(Token::text).collect();
        assert_eq!(joined, doc);
    }

    #[test]
    fn recognises_all_delimiter_shapes() {
        assert_eq!(
            kinds("<!-- wp:paragraph -->x<!-- /wp:paragraph --><!-- wp:separator /-->"),
            vec![
                "Opener(core/paragraph)",
                "Content(\"x\")",
                "Closer(core/paragraph)",
                "Void(core/separator)",
            ]
        );
    }

    #[test]
    fn plain_comments_stay_content() {
        assert_eq!(
            kinds("<p>a</p><!-- more --><p>b</p>"),
            vec!["Content(\"<p>a</p><!-- more --><p>b</p>\")"]
        );
    }

    #[test]
    fn delimiters_need_not_sit_on_their_own_line() {
        let tokens = tokenize("<p>A</p><!-- wp:core/separator /--><p>B</p>");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].span(), Span::new(8, 35));
    }

    #[test]
    fn unterminated_payload_is_content() {
        assert_eq!(
            kinds("<!-- wp:p {\"a\":1 -->"),
            vec!["Content(\"<!-- wp:p {\\\"a\\\":1 -->\")"]
        );
    }

    #[test]
    fn empty_document_has_no_tokens() {
        assert!(tokenize("").is_empty());
    }
}
