use blockgrammar_engine::{RawHandlerOptions, core_registry, parse, raw_handler, serialize};
use criterion::{Criterion, criterion_group, criterion_main};

fn generate_post(size: usize) -> String {
    let base = "<!-- wp:heading -->\n<h2>Section</h2>\n<!-- /wp:heading -->\n\n\
        <!-- wp:paragraph {\"align\":\"center\"} -->\n<p class=\"has-text-align-center\">Paragraph with <em>some</em> content.</p>\n<!-- /wp:paragraph -->\n\n\
        <!-- wp:group -->\n<div class=\"wp-block-group\"><!-- wp:list -->\n<ul><li>One</li><li>Two</li></ul>\n<!-- /wp:list --></div>\n<!-- /wp:group -->\n\n\
        <!-- wp:latest-posts {\"postsToShow\":3} /-->\n\n";
    base.repeat(size)
}

fn bench_parse_and_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let registry = core_registry().unwrap();
    let content = generate_post(100);

    group.bench_function("parse", |b| {
        b.iter(|| {
            let blocks = parse(std::hint::black_box(&content), &registry);
            std::hint::black_box(blocks);
        });
    });

    let blocks = parse(&content, &registry);
    group.bench_function("serialize", |b| {
        b.iter(|| {
            let html = serialize(std::hint::black_box(&blocks), &registry);
            std::hint::black_box(html);
        });
    });

    let pasted = "<h2>Title</h2><p>Some <b>bold</b> text</p><ul><li>a</li></ul>".repeat(50);
    group.bench_function("raw_handler", |b| {
        b.iter(|| {
            let blocks = raw_handler(&RawHandlerOptions::new(std::hint::black_box(&pasted)), &registry);
            std::hint::black_box(blocks);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parse_and_serialize);
criterion_main!(benches);
