use std::collections::{BTreeSet, VecDeque};

use blockgrammar_syntax::html::{HtmlToken, tokenize_html};

use crate::validation::IssueLog;
use crate::validation::style::is_equivalent_style;

/// Attributes whose presence is their value.
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen",
    "allowpaymentrequest",
    "allowusermedia",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "default",
    "defer",
    "disabled",
    "download",
    "formnovalidate",
    "hidden",
    "ismap",
    "itemscope",
    "loop",
    "multiple",
    "muted",
    "nomodule",
    "novalidate",
    "open",
    "playsinline",
    "readonly",
    "required",
    "reversed",
    "selected",
    "typemustmatch",
];

/// Attributes where an empty value is a meaningful state.
const ENUMERATED_ATTRIBUTES: &[&str] = &[
    "autocapitalize",
    "autocomplete",
    "charset",
    "contenteditable",
    "crossorigin",
    "decoding",
    "dir",
    "draggable",
    "enctype",
    "formenctype",
    "formmethod",
    "http-equiv",
    "inputmode",
    "kind",
    "method",
    "preload",
    "scope",
    "shape",
    "spellcheck",
    "translate",
    "type",
    "wrap",
];

fn is_boolean_attribute(name: &str) -> bool {
    BOOLEAN_ATTRIBUTES.contains(&name)
}

fn is_meaningful_attribute(name: &str, value: &str) -> bool {
    !value.is_empty()
        || name.starts_with("data-")
        || is_boolean_attribute(name)
        || ENUMERATED_ATTRIBUTES.contains(&name)
}

fn is_html_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{b}' | '\u{c}' | ' ')
}

/// Trim and collapse runs of HTML whitespace into one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split(is_html_whitespace)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_plain_number(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "0"));
    !whole.is_empty()
        && !fraction.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

fn is_equivalent_attribute(name: &str, actual: &str, expected: &str) -> bool {
    if actual == expected || is_boolean_attribute(name) {
        return true;
    }
    match name {
        "class" => {
            let a: BTreeSet<&str> = actual.split(is_html_whitespace).filter(|c| !c.is_empty()).collect();
            let b: BTreeSet<&str> = expected.split(is_html_whitespace).filter(|c| !c.is_empty()).collect();
            a == b
        }
        "style" => is_equivalent_style(actual, expected),
        _ if is_plain_number(actual) && is_plain_number(expected) => {
            matches!(
                (actual.parse::<f64>(), expected.parse::<f64>()),
                (Ok(a), Ok(b)) if a == b
            )
        }
        _ => false,
    }
}

fn meaningful_attributes(attributes: &[(String, String)]) -> Vec<(&str, &str)> {
    attributes
        .iter()
        .filter(|(name, value)| is_meaningful_attribute(name, value))
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect()
}

fn token_kind(token: &HtmlToken) -> &'static str {
    match token {
        HtmlToken::StartTag { .. } => "StartTag",
        HtmlToken::EndTag { .. } => "EndTag",
        HtmlToken::Chars(_) => "Chars",
        HtmlToken::Comment(_) => "Comment",
    }
}

fn next_significant(tokens: &mut VecDeque<HtmlToken>) -> Option<HtmlToken> {
    while let Some(token) = tokens.pop_front() {
        match &token {
            HtmlToken::Chars(text) if text.chars().all(is_html_whitespace) => continue,
            _ => return Some(token),
        }
    }
    None
}

/// A self-closing start tag followed directly by its own end tag, as in
/// `<br/>` against `<br></br>`.
fn is_closed_by(current: &HtmlToken, next: Option<&HtmlToken>) -> bool {
    match (current, next) {
        (
            HtmlToken::StartTag {
                name,
                self_closing: true,
                ..
            },
            Some(HtmlToken::EndTag { name: end }),
        ) => name == end,
        _ => false,
    }
}

fn is_equivalent_token(actual: &HtmlToken, expected: &HtmlToken, log: &mut IssueLog) -> bool {
    match (actual, expected) {
        (
            HtmlToken::StartTag {
                name: actual_name,
                attributes: actual_attributes,
                ..
            },
            HtmlToken::StartTag {
                name: expected_name,
                attributes: expected_attributes,
                ..
            },
        ) => {
            if actual_name != expected_name {
                log.warning(format!(
                    "Expected tag name `{expected_name}`, instead saw `{actual_name}`."
                ));
                return false;
            }

            let actual_pairs = meaningful_attributes(actual_attributes);
            let expected_pairs = meaningful_attributes(expected_attributes);
            if actual_pairs.len() != expected_pairs.len() {
                log.warning(format!(
                    "Expected attributes {expected_pairs:?}, instead saw {actual_pairs:?}."
                ));
                return false;
            }

            for (name, actual_value) in actual_pairs {
                let Some(&(_, expected_value)) = expected_pairs.iter().find(|(n, _)| *n == name)
                else {
                    log.warning(format!("Encountered unexpected attribute `{name}`."));
                    return false;
                };
                if !is_equivalent_attribute(name, actual_value, expected_value) {
                    log.warning(format!(
                        "Expected attribute `{name}` of value `{expected_value}`, saw `{actual_value}`."
                    ));
                    return false;
                }
            }
            true
        }
        (HtmlToken::EndTag { name: actual_name }, HtmlToken::EndTag { name: expected_name }) => {
            if actual_name != expected_name {
                log.warning(format!(
                    "Expected closing tag `{expected_name}`, instead saw `{actual_name}`."
                ));
                return false;
            }
            true
        }
        (HtmlToken::Chars(actual_text), HtmlToken::Chars(expected_text))
        | (HtmlToken::Comment(actual_text), HtmlToken::Comment(expected_text)) => {
            if actual_text == expected_text
                || collapse_whitespace(actual_text) == collapse_whitespace(expected_text)
            {
                return true;
            }
            log.warning(format!(
                "Expected text `{expected_text}`, saw `{actual_text}`."
            ));
            false
        }
        _ => {
            log.warning(format!(
                "Expected token of type `{}` ({expected:?}), instead saw `{}` ({actual:?}).",
                token_kind(expected),
                token_kind(actual),
            ));
            false
        }
    }
}

fn tokens_of(html: &str, log: &mut IssueLog) -> Option<VecDeque<HtmlToken>> {
    match tokenize_html(html) {
        Ok(tokens) => Some(tokens.into()),
        Err(err) => {
            log.warning(format!("Malformed HTML detected ({err}): {html}"));
            None
        }
    }
}

/// Whether two HTML strings are equivalent for validation.
///
/// `actual` is the markup read from the post, `expected` the markup the
/// block type saves now. Each difference found is queued on `log`.
pub fn is_equivalent_html(actual: &str, expected: &str, log: &mut IssueLog) -> bool {
    if actual == expected {
        return true;
    }

    let (Some(mut actual_tokens), Some(mut expected_tokens)) =
        (tokens_of(actual, log), tokens_of(expected, log))
    else {
        return false;
    };

    while let Some(actual_token) = next_significant(&mut actual_tokens) {
        let Some(expected_token) = next_significant(&mut expected_tokens) else {
            log.warning(format!(
                "Expected end of content, instead saw {actual_token:?}."
            ));
            return false;
        };

        if !is_equivalent_token(&actual_token, &expected_token, log) {
            return false;
        }

        if is_closed_by(&actual_token, expected_tokens.front()) {
            next_significant(&mut expected_tokens);
        } else if is_closed_by(&expected_token, actual_tokens.front()) {
            next_significant(&mut actual_tokens);
        }
    }

    if let Some(expected_token) = next_significant(&mut expected_tokens) {
        log.warning(format!(
            "Expected {expected_token:?}, instead saw end of content."
        ));
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn equivalent(actual: &str, expected: &str) -> bool {
        is_equivalent_html(actual, expected, &mut IssueLog::default())
    }

    #[test]
    fn effectively_equivalent_markup() {
        let actual = "<div>Hello <span   class=\"b a\" id=\"foo\" data-foo=\"here &mdash; there\">World! &#128517;</  SPAN>  </div>";
        let expected = "<div  >Hello\n<span id='foo' class='a b' data-foo='here — there'>World! 😅</span></div>";
        assert!(equivalent(actual, expected));
    }

    #[test]
    fn character_references_are_decoded() {
        assert!(equivalent(
            r#"<a href="/a?b=1&amp;c=2">A &amp; B</a>"#,
            r#"<a href="/a?b=1&c=2">A & B</a>"#
        ));
    }

    #[test]
    fn malformed_markup_is_never_equivalent() {
        let mut log = IssueLog::default();
        assert!(!is_equivalent_html("<p>x</pfd fd fd>", "<p>x</p>", &mut log));
        assert_eq!(log.len(), 1);
    }

    #[rstest]
    #[case("<path d=\"M1\"/>", "<path d=\"M1\"></path>")]
    #[case("<br/>", "<br></br>")]
    #[case("<p class=\"\">x</p>", "<p>x</p>")]
    #[case("<video controls=\"\"></video>", "<video controls></video>")]
    #[case("<p style=\"color: red; margin: 0px\">x</p>", "<p style=\"margin:0;color:red\">x</p>")]
    #[case("<img width=\"10.0\">", "<img width=\"10\">")]
    #[case("<p>a  b\n c</p>", "<p> a b c </p>")]
    #[case("<p><!--  note --></p>", "<p><!-- note --></p>")]
    #[case("\n<p>x</p>\n\n", "<p>x</p>")]
    fn tolerated_differences(#[case] actual: &str, #[case] expected: &str) {
        assert!(equivalent(actual, expected), "{actual} vs {expected}");
        assert!(equivalent(expected, actual), "{expected} vs {actual}");
    }

    #[rstest]
    #[case("<p>x</p>", "<div>x</div>")]
    #[case("<p>x</p>", "<p>y</p>")]
    #[case("<p>x</p>", "<p>x</p><p>y</p>")]
    #[case("<p>x</p>", "<p>x</div>")]
    #[case("<input disabled>", "<input>")]
    #[case("<div contenteditable=\"\"></div>", "<div></div>")]
    #[case("<div data-foo=\"\"></div>", "<div></div>")]
    #[case("<p class=\"a\">x</p>", "<p class=\"a b\">x</p>")]
    #[case("<p id=\"a\">x</p>", "<p title=\"a\">x</p>")]
    #[case("<p style=\"color: red\">x</p>", "<p style=\"color: blue\">x</p>")]
    #[case("<p>x</p>", "<p><!--x--></p>")]
    #[case("<img width=\"1e1\">", "<img width=\"10\">")]
    fn meaningful_differences(#[case] actual: &str, #[case] expected: &str) {
        assert!(!equivalent(actual, expected), "{actual} vs {expected}");
        assert!(!equivalent(expected, actual), "{expected} vs {actual}");
    }

    #[test]
    fn differences_are_logged() {
        let mut log = IssueLog::default();
        assert!(!is_equivalent_html("<p class=\"a\">x</p>", "<p class=\"b\">x</p>", &mut log));
        let issues = log.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Expected attribute `class` of value `b`, saw `a`.");
    }

    #[rstest]
    #[case("  a \t b\n", "a b")]
    #[case("", "")]
    #[case("\u{a0}x", "\u{a0}x")]
    fn collapses_whitespace(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(collapse_whitespace(input), expected);
    }
}
