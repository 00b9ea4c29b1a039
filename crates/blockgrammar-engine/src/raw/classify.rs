use crate::dom::{Dom, NodeData, NodeId};
use crate::raw::phrasing::is_phrasing_element;

/// A node is inline when it and all of its descendants are phrasing
/// content.
pub fn is_inline_node(dom: &Dom, id: NodeId) -> bool {
    match &dom.node(id).data {
        NodeData::Text(_) | NodeData::Comment(_) => true,
        NodeData::Element { tag, .. } if !is_phrasing_element(tag) => false,
        NodeData::Element { .. } | NodeData::Fragment => {
            dom.children(id).iter().all(|&child| is_inline_node(dom, child))
        }
    }
}

/// Whether every top-level node of `dom` is inline.
pub fn is_inline_content(dom: &Dom) -> bool {
    is_inline_node(dom, dom.root())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<em>test</em>", true)]
    #[case("plain text", true)]
    #[case("<a href=\"x\"><strong>a</strong> b</a><br>c", true)]
    #[case("<div>test</div>", false)]
    #[case("<em><div>test</div></em>", false)]
    #[case("<em>a</em><p>b</p>", false)]
    #[case("<span>a</span>", false)]
    fn classifies_content(#[case] html: &str, #[case] inline: bool) {
        assert_eq!(is_inline_content(&Dom::parse(html)), inline);
    }

    #[test]
    fn block_descendant_disqualifies_an_inline_element() {
        let mut dom = Dom::new();
        let root = dom.root();
        let em = dom.append(
            root,
            NodeData::Element {
                tag: "em".into(),
                attrs: vec![],
            },
        );
        let div = dom.append(
            em,
            NodeData::Element {
                tag: "div".into(),
                attrs: vec![],
            },
        );
        dom.append_text(div, "test");

        assert!(!is_inline_node(&dom, em));
        assert!(is_inline_node(&dom, dom.children(div)[0]));
    }
}
