use blockgrammar_engine::validation::IssueLevel;
use blockgrammar_engine::{BlockRegistry, core_registry, parse, serialize, switch_to_block_type};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn registry() -> BlockRegistry {
    core_registry().unwrap()
}

#[rstest]
fn inline_alignment_is_migrated(registry: BlockRegistry) {
    let source = "<!-- wp:paragraph {\"align\":\"center\"} -->\n<p style=\"text-align:center;\">Old</p>\n<!-- /wp:paragraph -->";
    let blocks = parse(source, &registry);

    assert!(blocks[0].is_valid);
    assert!(blocks[0].validation_issues.is_empty());
    assert_eq!(blocks[0].str_attribute("align"), Some("center"));
    assert_eq!(
        serialize(&blocks, &registry),
        "<!-- wp:paragraph {\"align\":\"center\"} -->\n<p class=\"has-text-align-center\">Old</p>\n<!-- /wp:paragraph -->"
    );
}

#[rstest]
#[case::class_order(r#"{"align":"left","dropCap":true}"#, r#"<p class="has-drop-cap has-text-align-left">x</p>"#)]
#[case::attribute_order(r#"{"dropCap":true,"direction":"rtl"}"#, r#"<p dir="rtl" class="has-drop-cap">x</p>"#)]
#[case::style_spacing(r#"{"align":"right"}"#, r#"<p style="text-align: right">x</p>"#)]
#[case::custom_class(r#"{"className":"rule"}"#, "<p class=\"rule\">x</p>")]
fn equivalent_markup_is_valid(registry: BlockRegistry, #[case] attrs: &str, #[case] html: &str) {
    let source = format!("<!-- wp:paragraph {attrs} -->\n{html}\n<!-- /wp:paragraph -->");
    let blocks = parse(&source, &registry);
    assert!(blocks[0].is_valid, "{:?}", blocks[0].validation_issues);
}

#[rstest]
fn custom_class_names_are_recovered_from_markup(registry: BlockRegistry) {
    let blocks = parse(
        "<!-- wp:heading -->\n<h2 class=\"lead big\">Hi</h2>\n<!-- /wp:heading -->",
        &registry,
    );

    assert!(blocks[0].is_valid);
    assert_eq!(blocks[0].str_attribute("className"), Some("lead big"));
    assert_eq!(
        serialize(&blocks, &registry),
        "<!-- wp:heading {\"className\":\"lead big\"} -->\n<h2 class=\"lead big\">Hi</h2>\n<!-- /wp:heading -->"
    );
}

#[rstest]
fn invalid_blocks_keep_their_markup(registry: BlockRegistry) {
    let source = "<!-- wp:paragraph {\"dropCap\":true} -->\n<p>No drop cap class</p>\n<!-- /wp:paragraph -->";
    let blocks = parse(source, &registry);
    let block = &blocks[0];

    assert!(!block.is_valid);
    assert_eq!(block.source.as_deref(), Some(source));
    assert_eq!(block.original_content.as_deref(), Some("<p>No drop cap class</p>"));
    assert!(
        block
            .validation_issues
            .iter()
            .any(|issue| issue.level == IssueLevel::Error && issue.message.contains("core/paragraph"))
    );
    assert_eq!(serialize(&blocks, &registry), source);
}

#[rstest]
fn invalid_blocks_inside_valid_ones_keep_their_markup(registry: BlockRegistry) {
    let source = "<!-- wp:group -->\n<div class=\"wp-block-group\"><!-- wp:separator -->\n<hr class=\"thick\"/>\n<!-- /wp:separator --></div>\n<!-- /wp:group -->";
    let blocks = parse(source, &registry);

    assert!(blocks[0].is_valid);
    let separator = &blocks[0].inner_blocks[0];
    assert_eq!(separator.name, "core/separator");
    assert!(!separator.is_valid);
    assert_eq!(serialize(&blocks, &registry), source);
}

#[rstest]
fn fallback_blocks_are_not_validated(registry: BlockRegistry) {
    let blocks = parse("<div><p>unclosed", &registry);

    assert_eq!(blocks[0].name, "core/freeform");
    assert!(blocks[0].is_valid);
    assert!(blocks[0].validation_issues.is_empty());
}

#[rstest]
fn paragraphs_switch_to_headings(registry: BlockRegistry) {
    let blocks = parse(
        "<!-- wp:paragraph -->\n<p>Promote <em>me</em></p>\n<!-- /wp:paragraph -->",
        &registry,
    );
    let heading = switch_to_block_type(&registry, &blocks[0], "core/heading").unwrap();

    assert_eq!(heading.name, "core/heading");
    assert_eq!(heading.str_attribute("content"), Some("Promote <em>me</em>"));
    assert_eq!(heading.attribute("level"), Some(&json!(2)));
    assert_ne!(heading.client_id, blocks[0].client_id);
    assert_eq!(
        serialize(&[heading], &registry),
        "<!-- wp:heading -->\n<h2>Promote <em>me</em></h2>\n<!-- /wp:heading -->"
    );
}

#[rstest]
fn switching_without_a_transform_fails(registry: BlockRegistry) {
    let blocks = parse("<!-- wp:latest-posts /-->", &registry);
    let err = switch_to_block_type(&registry, &blocks[0], "core/paragraph").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Block type `core/latest-posts` has no transform to `core/paragraph`"
    );
}
