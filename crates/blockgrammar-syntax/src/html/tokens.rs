use std::borrow::Cow;

use thiserror::Error;

use crate::cursor::Cursor;
use crate::html::lexer::{HtmlTokenKind, lex};

/// An HTML token with names lower-cased and entities decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlToken {
    StartTag {
        name: String,
        /// Attributes in source order. The first of duplicate names wins.
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Chars(String),
    Comment(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed HTML at byte {offset}")]
pub struct MalformedHtml {
    pub offset: usize,
}

/// Tokenize an HTML fragment.
///
/// Adjacent text is merged into one [`HtmlToken::Chars`]. Declarations are
/// dropped.
pub fn tokenize_html(html: &str) -> Result<Vec<HtmlToken>, MalformedHtml> {
    let raw = lex(html).map_err(|offset| MalformedHtml { offset })?;
    let mut tokens = Vec::with_capacity(raw.len());
    let mut text = String::new();

    for (kind, slice, _) in raw {
        match kind {
            HtmlTokenKind::Text | HtmlTokenKind::Lt => {
                text.push_str(slice);
                continue;
            }
            HtmlTokenKind::Declaration => continue,
            _ => {}
        }

        flush_text(&mut tokens, &mut text);
        tokens.push(match kind {
            HtmlTokenKind::Comment => HtmlToken::Comment(comment_body(slice).to_string()),
            HtmlTokenKind::EndTag => HtmlToken::EndTag {
                name: end_tag_name(slice),
            },
            _ => read_start_tag(slice),
        });
    }
    flush_text(&mut tokens, &mut text);

    Ok(tokens)
}

fn flush_text(tokens: &mut Vec<HtmlToken>, text: &mut String) {
    if text.is_empty() {
        return;
    }
    let decoded = decode(text).into_owned();
    text.clear();
    tokens.push(HtmlToken::Chars(decoded));
}

fn decode(s: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(s)
}

fn comment_body(slice: &str) -> &str {
    slice
        .strip_prefix("<!--")
        .and_then(|s| s.strip_suffix("-->"))
        .unwrap_or(slice)
}

fn end_tag_name(slice: &str) -> String {
    let mut cur = Cursor::new(slice);
    cur.bump_n(2);
    cur.skip_whitespace();
    cur.take_while(|b| !b.is_ascii_whitespace() && b != b'>' && b != b'/')
        .to_ascii_lowercase()
}

/// Read the name and attributes out of a lexed start tag.
fn read_start_tag(slice: &str) -> HtmlToken {
    let mut cur = Cursor::new(slice);
    cur.bump_n(1);
    let name = cur
        .take_while(|b| !b.is_ascii_whitespace() && b != b'>' && b != b'/')
        .to_ascii_lowercase();

    let mut attributes: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        cur.skip_whitespace();
        if cur.eat(b'/') {
            self_closing = true;
            continue;
        }
        if cur.eof() || cur.peek() == Some(b'>') {
            break;
        }
        self_closing = false;

        let attr = cur
            .take_while(|b| !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/'))
            .to_ascii_lowercase();
        if attr.is_empty() {
            cur.bump();
            continue;
        }

        cur.skip_whitespace();
        let value = if cur.eat(b'=') {
            cur.skip_whitespace();
            read_attribute_value(&mut cur)
        } else {
            String::new()
        };

        if !attributes.iter().any(|(existing, _)| *existing == attr) {
            attributes.push((attr, value));
        }
    }

    HtmlToken::StartTag {
        name,
        attributes,
        self_closing,
    }
}

fn read_attribute_value(cur: &mut Cursor<'_>) -> String {
    let raw = match cur.peek() {
        Some(q @ (b'"' | b'\'')) => {
            cur.bump();
            let value = cur.take_while(|b| b != q);
            cur.eat(q);
            value
        }
        _ => cur.take_while(|b| !b.is_ascii_whitespace() && b != b'>'),
    };
    decode(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn start(name: &str, attributes: &[(&str, &str)], self_closing: bool) -> HtmlToken {
        HtmlToken::StartTag {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            self_closing,
        }
    }

    #[test]
    fn reads_attributes_in_all_quoting_styles() {
        let tokens = tokenize_html(r#"<IMG Src="a.png" alt='x &amp; y' width=10 hidden>"#).unwrap();
        assert_eq!(
            tokens,
            vec![start(
                "img",
                &[("src", "a.png"), ("alt", "x & y"), ("width", "10"), ("hidden", "")],
                false
            )]
        );
    }

    #[test]
    fn self_closing_and_end_tags() {
        let tokens = tokenize_html("<br/><hr /></ P>").unwrap();
        assert_eq!(
            tokens,
            vec![
                start("br", &[], true),
                start("hr", &[], true),
                HtmlToken::EndTag { name: "p".into() },
            ]
        );
    }

    #[test]
    fn text_is_merged_and_decoded() {
        let tokens = tokenize_html("a &lt; b < c<!--x-->").unwrap();
        assert_eq!(
            tokens,
            vec![
                HtmlToken::Chars("a < b < c".into()),
                HtmlToken::Comment("x".into()),
            ]
        );
    }

    #[test]
    fn first_duplicate_attribute_wins() {
        let tokens = tokenize_html(r#"<p id="a" id="b">"#).unwrap();
        assert_eq!(tokens, vec![start("p", &[("id", "a")], false)]);
    }

    #[test]
    fn malformed_markup_is_an_error() {
        assert_eq!(tokenize_html("<p"), Err(MalformedHtml { offset: 0 }));
    }
}
