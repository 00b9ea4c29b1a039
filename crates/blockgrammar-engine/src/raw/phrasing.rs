/// Phrasing content elements and the attributes each may keep when
/// pasted.
const PHRASING_CONTENT: &[(&str, &[&str])] = &[
    ("a", &["href", "target", "rel", "id"]),
    ("abbr", &["title"]),
    ("b", &[]),
    ("bdi", &["dir"]),
    ("bdo", &["dir"]),
    ("br", &[]),
    ("code", &[]),
    ("data", &["value"]),
    ("del", &[]),
    ("dfn", &["title"]),
    ("em", &[]),
    ("i", &[]),
    ("ins", &[]),
    ("kbd", &[]),
    ("mark", &[]),
    ("q", &["cite"]),
    ("rp", &[]),
    ("rt", &[]),
    ("ruby", &[]),
    ("s", &[]),
    ("samp", &[]),
    ("small", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("sup", &[]),
    ("time", &["datetime"]),
    ("u", &[]),
    ("var", &[]),
    ("wbr", &[]),
    // Embedded content.
    ("audio", &["src", "preload", "autoplay", "mediagroup", "loop", "muted"]),
    ("canvas", &["width", "height"]),
    ("embed", &["src", "type", "width", "height"]),
    ("iframe", &["src", "srcdoc", "name", "sandbox", "seamless", "width", "height"]),
    ("img", &["alt", "src", "srcset", "usemap", "ismap", "width", "height"]),
    ("object", &["data", "type", "name", "usemap", "form", "width", "height"]),
    (
        "video",
        &[
            "src", "poster", "preload", "playsinline", "autoplay", "mediagroup", "loop", "muted",
            "controls", "width", "height",
        ],
    ),
];

/// Allowed attributes of a phrasing element, `None` for other tags.
pub fn phrasing_attributes(tag: &str) -> Option<&'static [&'static str]> {
    PHRASING_CONTENT
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, attributes)| *attributes)
}

pub fn is_phrasing_element(tag: &str) -> bool {
    phrasing_attributes(tag).is_some()
}
