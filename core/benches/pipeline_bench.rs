use criterion::{criterion_group, criterion_main, Criterion};
use sentrank_core::{AnswerOptions, DocId, Engine, EnglishAnalyzer, Language};
use std::collections::BTreeMap;

const TOPICS: &[&str] = &[
    "Python is a programming language created by Guido van Rossum. It emphasizes readability.",
    "The dog is a domesticated descendant of the wolf. Dogs were the first species to be domesticated.",
    "Machine learning studies algorithms that improve through experience. Neural networks are one family of models.",
    "The Moon is Earth's only natural satellite. Apollo 11 landed there in 1969.",
];

fn corpus() -> BTreeMap<DocId, String> {
    (0..200)
        .map(|i| {
            let text = (0..20).map(|j| TOPICS[(i + j) % TOPICS.len()]).collect::<Vec<_>>().join("\n");
            (DocId::new(format!("doc{i:03}.txt")), text)
        })
        .collect()
}

fn bench_answer(c: &mut Criterion) {
    let engine = Engine::new(EnglishAnalyzer, Language::English, corpus()).expect("non-empty corpus");
    c.bench_function("answer_query", |b| {
        b.iter(|| engine.answer("When did Apollo 11 land on the Moon?", AnswerOptions::default()))
    });
    c.bench_function("build_engine", |b| {
        b.iter(|| Engine::new(EnglishAnalyzer, Language::English, corpus()))
    });
}

criterion_group!(benches, bench_answer);
criterion_main!(benches);
