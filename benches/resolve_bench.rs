//! Benchmarks `analyze()` over a small synthetic multi-file Kotlin fixture,
//! in the spirit of the teacher's `kotlin_parser_bench`.

use codegraph_core::{analyze, AnalysisOptions, CancellationToken, SourceInput};
use criterion::{criterion_group, criterion_main, Criterion};

fn synthetic_fixture() -> Vec<SourceInput> {
    let mut inputs = Vec::new();
    for i in 0..20 {
        let source = format!(
            "package com.acme.service{i}\n\nclass Service{i} {{\n    fun handle(x: Int): Int {{\n        return helper(x)\n    }}\n\n    fun helper(x: Int): Int {{\n        return x + 1\n    }}\n}}\n\nfun entry{i}() {{\n    val s = Service{i}()\n    s.handle(1)\n}}\n"
        );
        inputs.push(SourceInput::new(format!("src/service{i}.kt"), source));
    }
    inputs
}

fn bench_analyze(c: &mut Criterion) {
    let inputs = synthetic_fixture();
    let options = AnalysisOptions::default();
    c.bench_function("analyze_20_kotlin_files", |b| {
        b.iter(|| {
            let token = CancellationToken::new();
            analyze(&inputs, &options, &token)
        })
    });
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
