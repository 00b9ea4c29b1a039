//! # HTML lexer
//!
//! A [Logos] lexer that splits an HTML fragment into coarse tokens: tags,
//! comments, declarations and text. It is deliberately shallow. It knows
//! where a tag starts and ends (honouring quoted attribute values) but leaves
//! reading names and attributes to [`crate::html::tokens`].
//!
//! [Logos]: https://docs.rs/logos
//!
//! Unterminated tags and comments are lexing errors, so callers can treat
//! such markup as malformed.

use logos::{Lexer, Logos};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlTokenKind {
    /// `<!-- … -->`
    #[token("<!--", lex_comment)]
    Comment,

    /// `<!DOCTYPE …>`, `<![CDATA[…]>`, `<?…>`
    #[regex(r"<![^-][^>]*>|<\?[^>]*>")]
    Declaration,

    /// `<name attr="…">` or `<name/>`
    #[regex(r"<[a-zA-Z]", lex_start_tag)]
    StartTag,

    /// `</name>`, whitespace allowed around the name
    #[regex(r"</[ \t\r\n\f]*[a-zA-Z]", lex_end_tag)]
    EndTag,

    /// Character data
    #[regex(r"[^<]+")]
    Text,

    /// A `<` that does not open any markup; it is text.
    #[token("<")]
    Lt,
}

fn lex_comment(lex: &mut Lexer<'_, HtmlTokenKind>) -> bool {
    match lex.remainder().find("-->") {
        Some(end) => {
            lex.bump(end + 3);
            true
        }
        None => false,
    }
}

/// Scan to the `>` closing a start tag. Quotes only delimit values when
/// they follow `=`, so a stray apostrophe in an attribute name does not
/// swallow the rest of the document.
fn lex_start_tag(lex: &mut Lexer<'_, HtmlTokenKind>) -> bool {
    let mut quote: Option<u8> = None;
    let mut after_eq = false;

    for (i, b) in lex.remainder().bytes().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'>' => {
                lex.bump(i + 1);
                return true;
            }
            b'=' => after_eq = true,
            b'"' | b'\'' if after_eq => {
                quote = Some(b);
                after_eq = false;
            }
            b if b.is_ascii_whitespace() => {}
            _ => after_eq = false,
        }
    }
    false
}

/// An end tag carries nothing but its name. `</p class="x">` is malformed.
fn lex_end_tag(lex: &mut Lexer<'_, HtmlTokenKind>) -> bool {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while rest
        .get(i)
        .is_some_and(|&b| !b.is_ascii_whitespace() && !matches!(b, b'>' | b'/'))
    {
        i += 1;
    }
    while rest.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    if rest.get(i) == Some(&b'>') {
        lex.bump(i + 1);
        true
    } else {
        false
    }
}

/// Lex `input` into `(kind, text, start offset)` triples.
///
/// Returns the byte offset of the first malformed construct on error.
pub fn lex(input: &str) -> Result<Vec<(HtmlTokenKind, &str, usize)>, usize> {
    let mut lexer = HtmlTokenKind::lexer(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let start = lexer.span().start;
        match result {
            Ok(kind) => tokens.push((kind, lexer.slice(), start)),
            Err(()) => return Err(start),
        }
    }

    Ok(tokens)
}
