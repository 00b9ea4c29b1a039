//! Pure DOM-to-DOM passes run over pasted HTML. Each reads one arena and
//! builds a new one.

use crate::dom::{Dom, NodeData, NodeId};
use crate::raw::classify::is_inline_node;
use crate::raw::phrasing::{is_phrasing_element, phrasing_attributes};

/// Removed with their content unless the user may post unfiltered HTML.
const REMOVED_ELEMENTS: &[&str] = &[
    "base", "head", "iframe", "link", "meta", "noscript", "script", "style", "template", "title",
];

/// Formatting wrappers replaced by their children.
const UNWRAPPED_ELEMENTS: &[&str] = &["font", "nobr", "o:p", "span"];

/// DOM event names; `on` + one of these is an inline handler attribute.
const EVENT_NAMES: &[&str] = &[
    "abort", "afterprint", "animationend", "animationiteration", "animationstart",
    "auxclick", "beforeinput", "beforeprint", "beforeunload", "blur", "cancel", "canplay",
    "canplaythrough", "change", "click", "close", "contextmenu", "copy", "cuechange", "cut",
    "dblclick", "drag", "dragend", "dragenter", "dragleave", "dragover", "dragstart", "drop",
    "durationchange", "emptied", "ended", "error", "focus", "focusin", "focusout",
    "formdata", "hashchange", "input", "invalid", "keydown", "keypress", "keyup", "load",
    "loadeddata", "loadedmetadata", "loadstart", "message", "messageerror", "mousedown",
    "mouseenter", "mouseleave", "mousemove", "mouseout", "mouseover", "mouseup",
    "mousewheel", "offline", "online", "pagehide", "pageshow", "paste", "pause", "play",
    "playing", "pointercancel", "pointerdown", "pointerenter", "pointerleave",
    "pointermove", "pointerout", "pointerover", "pointerup", "popstate", "progress",
    "ratechange", "rejectionhandled", "reset", "resize", "scroll", "scrollend", "search",
    "securitypolicyviolation", "seeked", "seeking", "select", "selectionchange",
    "selectstart", "show", "stalled", "storage", "submit", "suspend", "timeupdate",
    "toggle", "touchcancel", "touchend", "touchmove", "touchstart", "transitionend",
    "unhandledrejection", "unload", "volumechange", "waiting", "wheel",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SanitizeOptions {
    pub allow_unfiltered_html: bool,
}

/// Drop comments and unsafe elements, unwrap formatting wrappers and strip
/// presentational attributes.
pub fn sanitize(source: &Dom, options: SanitizeOptions) -> Dom {
    let mut out = Dom::new();
    let root = out.root();
    sanitize_children(source, source.root(), &mut out, root, options);
    out
}

fn sanitize_children(source: &Dom, id: NodeId, out: &mut Dom, parent: NodeId, options: SanitizeOptions) {
    for &child in source.children(id) {
        sanitize_node(source, child, out, parent, options);
    }
}

fn sanitize_node(source: &Dom, id: NodeId, out: &mut Dom, parent: NodeId, options: SanitizeOptions) {
    match &source.node(id).data {
        NodeData::Comment(_) => {}
        NodeData::Text(text) => out.append_text(parent, text),
        NodeData::Fragment => sanitize_children(source, id, out, parent, options),
        NodeData::Element { tag, attrs } => {
            let tag = tag.as_str();
            if REMOVED_ELEMENTS.contains(&tag) && !options.allow_unfiltered_html {
                return;
            }
            if UNWRAPPED_ELEMENTS.contains(&tag) {
                sanitize_children(source, id, out, parent, options);
                return;
            }
            let copy = out.append(
                parent,
                NodeData::Element {
                    tag: tag.to_string(),
                    attrs: allowed_attributes(tag, attrs),
                },
            );
            sanitize_children(source, id, out, copy, options);
        }
    }
}

fn allowed_attributes(tag: &str, attrs: &[(String, String)]) -> Vec<(String, String)> {
    let keep = |name: &str| match phrasing_attributes(tag) {
        Some(allowed) => allowed.contains(&name),
        None => {
            !matches!(name, "class" | "id" | "style")
                && !name.starts_with("data-")
                && !is_event_handler(name)
        }
    };
    attrs
        .iter()
        .filter(|(name, _)| keep(name))
        .cloned()
        .collect()
}

fn is_event_handler(name: &str) -> bool {
    name.strip_prefix("on")
        .is_some_and(|event| EVENT_NAMES.contains(&event.to_ascii_lowercase().as_str()))
}

/// Keep only phrasing content; other elements are replaced by their
/// children.
pub fn strip_to_phrasing(source: &Dom) -> Dom {
    let mut out = Dom::new();
    let root = out.root();
    strip_children(source, source.root(), &mut out, root);
    out
}

fn strip_children(source: &Dom, id: NodeId, out: &mut Dom, parent: NodeId) {
    for &child in source.children(id) {
        match &source.node(child).data {
            NodeData::Text(text) => out.append_text(parent, text),
            NodeData::Element { tag, .. } if is_phrasing_element(tag) => {
                let copy = out.append(parent, source.node(child).data.clone());
                strip_children(source, child, out, copy);
            }
            NodeData::Element { .. } | NodeData::Fragment => {
                strip_children(source, child, out, parent)
            }
            NodeData::Comment(_) => {}
        }
    }
}

/// Wrap each run of consecutive inline top-level nodes in a `<p>`. Runs of
/// nothing but whitespace are dropped.
pub fn wrap_inline_runs(source: &Dom) -> Dom {
    let mut out = Dom::new();
    let root = out.root();
    let mut run: Vec<NodeId> = Vec::new();

    for &child in source.children(source.root()) {
        if is_inline_node(source, child) {
            run.push(child);
            continue;
        }
        flush_run(source, &mut run, &mut out);
        out.append_copy(root, source, child);
    }
    flush_run(source, &mut run, &mut out);
    out
}

fn flush_run(source: &Dom, run: &mut Vec<NodeId>, out: &mut Dom) {
    let blank = run.iter().all(|&id| match &source.node(id).data {
        NodeData::Text(text) => text.trim().is_empty(),
        NodeData::Comment(_) => true,
        _ => false,
    });
    if !blank {
        let root = out.root();
        let p = out.append(
            root,
            NodeData::Element {
                tag: "p".to_string(),
                attrs: Vec::new(),
            },
        );
        for &id in run.iter() {
            out.append_copy(p, source, id);
        }
    }
    run.clear();
}
