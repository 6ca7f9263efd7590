use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use seogeo_core::linking::extract_keywords;
use seogeo_core::{InternalLinkingAnalyzer, SiteContent, heuristic_research, validate_post};

const PARAGRAPH: &str = "Setting healthy boundaries protects your time and energy. \
    Healthy boundaries help relationships last, and clear communication makes \
    healthy boundaries easier to keep. Emotional regulation supports clear communication.";

fn draft(sections: usize) -> String {
    let mut out = String::from("# Healthy Boundaries Guide\n\n");
    for i in 0..sections {
        out.push_str(&format!("## Section {}\n\n{}\n\n", i, PARAGRAPH));
    }
    out
}

fn site(pages: usize) -> Vec<SiteContent> {
    (0..pages)
        .map(|i| SiteContent::from_content(&draft(3), &format!("page_{}", i), "https://example.com/blog"))
        .collect()
}

fn bench_extract_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_keywords");

    for sections in [4, 40] {
        let content = draft(sections);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &content, |b, content| {
            b.iter(|| extract_keywords(black_box(content)))
        });
    }

    group.finish();
}

fn bench_suggest_links(c: &mut Criterion) {
    let analyzer = InternalLinkingAnalyzer::default();
    let content = draft(8);
    let pages = site(25);

    c.bench_function("suggest_links", |b| {
        b.iter(|| analyzer.suggest_links(black_box(&content), black_box(&pages), 5))
    });
}

fn bench_validate(c: &mut Criterion) {
    let content = draft(8);

    c.bench_function("validate_post", |b| b.iter(|| validate_post(black_box(&content))));
}

fn bench_heuristic(c: &mut Criterion) {
    c.bench_function("heuristic_research", |b| b.iter(|| heuristic_research(black_box("healthy boundaries"), 10)));
}

criterion_group!(benches, bench_extract_keywords, bench_suggest_links, bench_validate, bench_heuristic);
criterion_main!(benches);
