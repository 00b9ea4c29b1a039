//! Recognising a single block comment delimiter.
//!
//! ```text
//! <!--  ws+  /?  wp:  NAME  ws+  ({ … }  ws+)?  /?  -->
//! ```
//!
//! `NAME` is `[a-z][a-z0-9/_-]*`. When it contains a `/` followed by a
//! lowercase letter the part before the first `/` is the namespace,
//! otherwise the name lives in `core/`.

use crate::cursor::Cursor;
use crate::grammar::token::{Delimiter, DelimiterKind};
use crate::span::Span;

/// Try to parse a delimiter at the cursor, which must sit on `<!--`.
///
/// On success the cursor is left after `-->`. On failure it is restored.
pub fn parse_delimiter<'a>(cur: &mut Cursor<'a>) -> Option<Delimiter<'a>> {
    let start = cur.pos();
    let parsed = try_parse_delimiter(cur, start);
    if parsed.is_none() {
        cur.seek(start);
    }
    parsed
}

fn try_parse_delimiter<'a>(cur: &mut Cursor<'a>, start: usize) -> Option<Delimiter<'a>> {
    if !cur.eat_str(b"<!--") || cur.skip_whitespace() == 0 {
        return None;
    }

    let is_closer = cur.eat(b'/');
    if !cur.eat_str(b"wp:") {
        return None;
    }

    let raw_name = cur.take_while(is_name_byte);
    if !raw_name.as_bytes().first().is_some_and(u8::is_ascii_lowercase) {
        return None;
    }
    if cur.skip_whitespace() == 0 {
        return None;
    }

    let attrs = if cur.peek() == Some(b'{') {
        let payload_start = cur.pos();
        let payload_end = find_payload_end(cur.rest())? + payload_start;
        cur.seek(payload_end);
        cur.skip_whitespace();
        Some(Span::new(payload_start, payload_end).slice(cur.s))
    } else {
        None
    };

    let is_void = cur.eat(b'/');
    if !cur.eat_str(b"-->") {
        return None;
    }

    let kind = match (is_closer, is_void) {
        (_, true) => DelimiterKind::Void,
        (true, false) => DelimiterKind::Closer,
        (false, false) => DelimiterKind::Opener,
    };
    let span = Span::new(start, cur.pos());

    Some(Delimiter {
        kind,
        name: qualify_name(raw_name),
        attrs,
        text: span.slice(cur.s),
        span,
    })
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'/' | b'_' | b'-')
}

/// Byte length of the JSON payload, closing brace included.
///
/// The payload ends at the first `}` followed by whitespace, an optional
/// `/` and `-->`.
fn find_payload_end(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut search_from = 0;
    while let Some(offset) = rest.get(search_from..)?.find('}') {
        let brace = search_from + offset;
        let mut i = brace + 1;
        let ws_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        if i > ws_start {
            if bytes.get(i) == Some(&b'/') {
                i += 1;
            }
            if bytes.get(i..).is_some_and(|tail| tail.starts_with(b"-->")) {
                return Some(brace + 1);
            }
        }
        search_from = brace + 1;
    }
    None
}

/// Apply the default `core/` namespace to a bare name.
pub fn qualify_name(raw: &str) -> String {
    match raw.split_once('/') {
        Some((_, local)) if local.as_bytes().first().is_some_and(u8::is_ascii_lowercase) => {
            raw.to_string()
        }
        _ => format!("core/{raw}"),
    }
}
