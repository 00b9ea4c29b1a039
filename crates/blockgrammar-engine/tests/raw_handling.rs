use blockgrammar_engine::raw::{SanitizeOptions, filter_inline_html};
use blockgrammar_engine::{
    Block, BlockRegistry, PasteResult, RawHandlerOptions, RawMode, core_registry, paste_handler,
    raw_handler, serialize,
};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn registry() -> BlockRegistry {
    core_registry().unwrap()
}

fn names(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(|block| block.name.as_str()).collect()
}

#[rstest]
#[case::emphasis("<em>test</em>", "<em>test</em>")]
#[case::mixed_text("Some <b>bold</b> text", "Some <b>bold</b> text")]
#[case::styled_span(r#"<span style="font-weight:bold">x</span>"#, "x")]
#[case::link(r#"<a href="/x" onclick="evil()">go</a>"#, r#"<a href="/x">go</a>"#)]
fn inline_content_pastes_as_html(registry: BlockRegistry, #[case] html: &str, #[case] expected: &str) {
    assert_eq!(
        paste_handler(&RawHandlerOptions::new(html), &registry),
        PasteResult::Inline(expected.to_string())
    );
}

#[rstest]
fn block_content_pastes_as_blocks(registry: BlockRegistry) {
    let PasteResult::Blocks(blocks) =
        paste_handler(&RawHandlerOptions::new("<h2>Title</h2><p>Body</p>"), &registry)
    else {
        panic!("expected blocks");
    };

    assert_eq!(names(&blocks), ["core/heading", "core/paragraph"]);
    assert_eq!(blocks[0].str_attribute("content"), Some("Title"));
    assert_eq!(blocks[1].str_attribute("content"), Some("Body"));
}

#[rstest]
fn inline_mode_keeps_only_phrasing_content(registry: BlockRegistry) {
    let html = "<div><p>a <em>b</em></p><ul><li>c</li></ul></div>";
    let options = RawHandlerOptions {
        mode: RawMode::Inline,
        ..RawHandlerOptions::new(html)
    };

    assert_eq!(
        paste_handler(&options, &registry),
        PasteResult::Inline("a <em>b</em>c".to_string())
    );

    let blocks = raw_handler(&options, &registry);
    assert_eq!(names(&blocks), ["core/paragraph"]);
    assert_eq!(blocks[0].str_attribute("content"), Some("a <em>b</em>c"));
}

#[rstest]
fn headings_keep_their_level(registry: BlockRegistry) {
    let blocks = raw_handler(&RawHandlerOptions::new("<h3>Deep</h3>"), &registry);

    assert_eq!(blocks[0].attribute("level"), Some(&json!(3)));
    assert_eq!(
        serialize(&blocks, &registry),
        "<!-- wp:heading {\"level\":3} -->\n<h3>Deep</h3>\n<!-- /wp:heading -->"
    );
}

#[rstest]
fn lists_become_list_blocks(registry: BlockRegistry) {
    let blocks = raw_handler(&RawHandlerOptions::new("<ol><li>one</li><li>two</li></ol>"), &registry);

    assert_eq!(names(&blocks), ["core/list"]);
    assert_eq!(blocks[0].attribute("ordered"), Some(&json!(true)));
    assert_eq!(blocks[0].str_attribute("values"), Some("<li>one</li><li>two</li>"));
    assert_eq!(
        serialize(&blocks, &registry),
        "<!-- wp:list {\"ordered\":true} -->\n<ol><li>one</li><li>two</li></ol>\n<!-- /wp:list -->"
    );
}

#[rstest]
fn figures_become_images(registry: BlockRegistry) {
    let html = r#"<figure class="x"><img src="a.png" alt="A"><figcaption>Cap</figcaption></figure>"#;
    let blocks = raw_handler(&RawHandlerOptions::new(html), &registry);

    assert_eq!(names(&blocks), ["core/image"]);
    assert_eq!(blocks[0].str_attribute("url"), Some("a.png"));
    assert_eq!(blocks[0].str_attribute("alt"), Some("A"));
    assert_eq!(blocks[0].str_attribute("caption"), Some("Cap"));
}

#[rstest]
fn loose_inline_runs_become_paragraphs(registry: BlockRegistry) {
    let blocks = raw_handler(
        &RawHandlerOptions::new("loose <b>text</b><hr><p>after</p>\n"),
        &registry,
    );

    assert_eq!(names(&blocks), ["core/paragraph", "core/separator", "core/paragraph"]);
    assert_eq!(blocks[0].str_attribute("content"), Some("loose <b>text</b>"));
    assert_eq!(blocks[2].str_attribute("content"), Some("after"));
}

#[rstest]
fn unmatched_elements_fall_back_to_freeform(registry: BlockRegistry) {
    let blocks = raw_handler(
        &RawHandlerOptions::new("<table><tr><td>x</td></tr></table>"),
        &registry,
    );

    assert_eq!(names(&blocks), ["core/freeform"]);
    assert!(blocks[0].str_attribute("content").unwrap().contains("<td>x</td>"));
}

#[rstest]
#[case::filtered(false, vec!["core/paragraph"])]
#[case::unfiltered(true, vec!["core/paragraph", "core/freeform"])]
fn scripts_need_unfiltered_html(registry: BlockRegistry, #[case] unfiltered: bool, #[case] expected: Vec<&str>) {
    let options = RawHandlerOptions {
        can_user_use_unfiltered_html: unfiltered,
        ..RawHandlerOptions::new("<p>safe</p><script>alert(1)</script>")
    };
    assert_eq!(names(&raw_handler(&options, &registry)), expected);
}

#[rstest]
fn delimited_content_is_parsed(registry: BlockRegistry) {
    let html = "<!-- wp:separator -->\n<hr class=\"wp-block-separator\"/>\n<!-- /wp:separator -->";

    let blocks = raw_handler(&RawHandlerOptions::new(html), &registry);
    assert_eq!(names(&blocks), ["core/separator"]);
    assert!(blocks[0].is_valid);

    let PasteResult::Blocks(pasted) = paste_handler(&RawHandlerOptions::new(html), &registry) else {
        panic!("expected blocks");
    };
    assert_eq!(names(&pasted), ["core/separator"]);
}

#[test]
fn filters_inline_html() {
    assert_eq!(
        filter_inline_html(
            "<p>Hi <strong class=\"x\">there</strong></p><!-- c --><script>x()</script>",
            SanitizeOptions::default()
        ),
        "Hi <strong>there</strong>"
    );
}
