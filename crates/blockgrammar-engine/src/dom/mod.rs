//! # DOM
//!
//! An arena of HTML nodes addressed by [`NodeId`], with explicit parent and
//! child indices. Parsing goes through html5ever; the resulting `RcDom` is
//! copied into the arena once so every later pass (attribute extraction,
//! sanitizing, classification) works on plain indices.
//!
//! The arena root is always a [`NodeData::Fragment`] holding the parsed
//! content in document order.
//!
//! ## Modules
//!
//! - [`selector`] - CSS selector subset and matching
//! - `serialize` - `inner_html`, `outer_html` and `text_content`

pub mod selector;
mod serialize;

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Fragment,
    Element {
        /// Lower-case tag name.
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// An empty arena holding only the root fragment.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Fragment,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Parse an HTML fragment.
    ///
    /// html5ever parses a full document, so head content (`<meta>`,
    /// `<style>`, …) and body content are both collected into the root, head
    /// first.
    pub fn parse(html: &str) -> Self {
        let rc = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .one(html.as_bytes());

        let mut dom = Dom::new();
        let root = dom.root();
        for html_el in rc.document.children.borrow().iter() {
            if !is_rc_element(html_el, "html") {
                continue;
            }
            for section in html_el.children.borrow().iter() {
                for child in section.children.borrow().iter() {
                    dom.import(child, root);
                }
            }
        }
        dom
    }

    fn import(&mut self, handle: &Handle, parent: NodeId) {
        let data = match &handle.data {
            RcNodeData::Element { name, attrs, .. } => NodeData::Element {
                tag: name.local.to_string(),
                attrs: attrs
                    .borrow()
                    .iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect(),
            },
            RcNodeData::Text { contents } => NodeData::Text(contents.borrow().to_string()),
            RcNodeData::Comment { contents } => NodeData::Comment(contents.to_string()),
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => return,
        };
        let id = self.append(parent, data);

        let children: Vec<Handle> = match &handle.data {
            // Template content lives in a separate fragment in html5ever.
            RcNodeData::Element {
                template_contents, ..
            } => match template_contents.borrow().as_ref() {
                Some(contents) => contents.children.borrow().clone(),
                None => handle.children.borrow().clone(),
            },
            _ => handle.children.borrow().clone(),
        };
        for child in &children {
            self.import(child, id);
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node(self.root()).children.is_empty()
    }

    /// Append a new node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append text to `parent`, merging with a trailing text child.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0].children.last()
            && let NodeData::Text(existing) = &mut self.nodes[last.0].data
        {
            existing.push_str(text);
            return;
        }
        self.append(parent, NodeData::Text(text.to_string()));
    }

    /// Deep-copy `id` from `other` as the last child of `parent`.
    pub fn append_copy(&mut self, parent: NodeId, other: &Dom, id: NodeId) -> NodeId {
        let copy = self.append(parent, other.node(id).data.clone());
        for &child in other.children(id) {
            self.append_copy(copy, other, child);
        }
        copy
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match &self.node(id).data {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).data, NodeData::Element { .. })
    }

    /// Element children only.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).iter().copied().filter(|&c| self.is_element(c))
    }

    /// All descendants of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Whether `ancestor` is a proper ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }
}

fn is_rc_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, RcNodeData::Element { name, .. } if &*name.local == tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_fragment_into_root() {
        let dom = Dom::parse(r#"<p class="a">Hello <b>world</b></p><hr>"#);
        let root = dom.root();
        let tags: Vec<_> = dom.children(root).iter().map(|&c| dom.tag(c)).collect();
        assert_eq!(tags, vec![Some("p"), Some("hr")]);

        let p = dom.children(root)[0];
        assert_eq!(dom.attr(p, "class"), Some("a"));
        assert_eq!(dom.children(p).len(), 2);
    }

    #[test]
    fn head_content_comes_first() {
        let dom = Dom::parse("<style>p{}</style><p>x</p>");
        let tags: Vec<_> = dom
            .children(dom.root())
            .iter()
            .map(|&c| dom.tag(c))
            .collect();
        assert_eq!(tags, vec![Some("style"), Some("p")]);
    }

    #[test]
    fn comments_are_kept() {
        let dom = Dom::parse("<p>a<!-- note -->b</p>");
        let p = dom.children(dom.root())[0];
        let kinds: Vec<_> = dom
            .children(p)
            .iter()
            .map(|&c| dom.node(c).data.clone())
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeData::Text("a".into()),
                NodeData::Comment(" note ".into()),
                NodeData::Text("b".into()),
            ]
        );
    }

    #[test]
    fn descendants_in_document_order() {
        let dom = Dom::parse("<div><p>a</p><p>b</p></div>");
        let div = dom.children(dom.root())[0];
        let tags: Vec<_> = dom
            .descendants(div)
            .into_iter()
            .filter_map(|id| dom.tag(id).map(str::to_string))
            .collect();
        assert_eq!(tags, vec!["p", "p"]);
        assert_eq!(dom.descendants(div).len(), 4);
    }

    #[test]
    fn append_text_merges() {
        let mut dom = Dom::new();
        let root = dom.root();
        dom.append_text(root, "a");
        dom.append_text(root, "b");
        assert_eq!(dom.children(root).len(), 1);
        assert_eq!(dom.node(dom.children(root)[0]).data, NodeData::Text("ab".into()));
    }

    #[test]
    fn empty_input() {
        assert!(Dom::parse("").is_empty());
    }
}
