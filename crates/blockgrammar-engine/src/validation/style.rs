use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^url\s*\(['"\s]*(.*?)['"\s]*\)$"#).expect("valid regex")
});

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid regex")
});

/// Normalize one length: anything that starts with a zero quantity is `0`,
/// and a leading `.` gains a `0`.
pub fn normalize_length(value: &str) -> String {
    let zero = LEADING_FLOAT
        .find(value)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .is_some_and(|n| n == 0.0);
    if zero {
        "0".to_string()
    } else if value.starts_with('.') {
        format!("0{value}")
    } else {
        value.to_string()
    }
}

/// Normalize a property value: lengths piece by piece, then `url()`
/// quoting.
pub fn normalize_style_value(value: &str) -> String {
    let joined = value
        .split_ascii_whitespace()
        .map(normalize_length)
        .collect::<Vec<_>>()
        .join(" ");
    URL.replace(&joined, "url($1)").into_owned()
}

/// Parse a `style` attribute into a property map. Later declarations of a
/// property win.
pub fn style_properties(style: &str) -> BTreeMap<String, String> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (key, value) = declaration.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((
                key.to_ascii_lowercase(),
                normalize_style_value(value.trim()),
            ))
        })
        .collect()
}

pub fn is_equivalent_style(actual: &str, expected: &str) -> bool {
    style_properties(actual) == style_properties(expected)
}
