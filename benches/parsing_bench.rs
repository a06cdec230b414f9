// benches/parsing_bench.rs
//! Benchmarks for the full clipboard-to-blocks pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use clip2notion::{detect, parse_content, ParseOptions};

fn markdown_document(paragraphs: usize) -> String {
    let mut doc = String::from("# Benchmark Document\n\n");
    for i in 0..paragraphs {
        doc.push_str(&format!(
            "## Section {i}\n\nSome **bold** prose with a [link](https://example.com/{i}) \
             and `inline code` in paragraph {i}.\n\n- item one\n- item two\n\n"
        ));
    }
    doc
}

fn code_document(lines: usize) -> String {
    let mut doc = String::from("```rust\n");
    for i in 0..lines {
        doc.push_str(&format!("fn generated_{i}(input: usize) -> usize {{ input + {i} }}\n"));
    }
    doc.push_str("```\n");
    doc
}

fn csv_document(rows: usize) -> String {
    let mut doc = String::from("name,role,location\n");
    for i in 0..rows {
        doc.push_str(&format!("person{i},engineer,city{i}\n"));
    }
    doc
}

fn latex_document(equations: usize) -> String {
    let mut doc = String::new();
    for i in 0..equations {
        doc.push_str(&format!("Equation number {i} follows.\n\n$$\nx_{i} = \\frac{{a}}{{b}} + {i}\n$$\n\n"));
    }
    doc
}

fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection");
    let inputs = vec![
        ("markdown", markdown_document(20)),
        ("code", code_document(50)),
        ("csv", csv_document(100)),
        ("latex", latex_document(20)),
    ];
    for (name, content) in &inputs {
        group.bench_with_input(BenchmarkId::new("detect", name), content, |b, content| {
            b.iter(|| detect(black_box(content)));
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let options = ParseOptions::default();

    let sizes = vec![(10, "small"), (50, "medium"), (200, "large")];
    for (paragraphs, name) in sizes {
        let content = markdown_document(paragraphs);
        group.bench_with_input(
            BenchmarkId::new("markdown", name),
            &content,
            |b, content| {
                b.iter(|| parse_content(black_box(content), black_box(&options)));
            },
        );
    }

    let code = code_document(200);
    group.bench_with_input(BenchmarkId::new("code", "large"), &code, |b, content| {
        b.iter(|| parse_content(black_box(content), black_box(&options)));
    });

    let csv = csv_document(90);
    group.bench_with_input(BenchmarkId::new("csv", "large"), &csv, |b, content| {
        b.iter(|| parse_content(black_box(content), black_box(&options)));
    });

    let latex = latex_document(40);
    group.bench_with_input(BenchmarkId::new("latex", "large"), &latex, |b, content| {
        b.iter(|| parse_content(black_box(content), black_box(&options)));
    });

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let options = ParseOptions::default();
    let result = parse_content(&markdown_document(50), &options)
        .expect("benchmark input must parse");

    c.bench_function("payload_serialization", |b| {
        b.iter(|| black_box(&result).to_api_payload());
    });
}

criterion_group!(benches, bench_detection, bench_pipeline, bench_serialization);
criterion_main!(benches);
