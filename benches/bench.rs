//! Benchmarks knowledge-base construction and program evaluation against a
//! small fixed input, basically copied from the [criterion quick
//! start](https://github.com/bheisler/criterion.rs#quickstart).

use criterion::{criterion_group, criterion_main, Criterion};
use kopl_engine::{Interpreter, KnowledgeBase, Program, RawKnowledgeBase};

const KB_JSON: &str = r#"{
    "entities": {
        "A": {
            "name": "Alice",
            "instanceOf": ["P"],
            "attributes": [
                {"key": "height", "value": {"type": "quantity", "value": 180, "unit": "cm"}, "qualifiers": {}}
            ],
            "relations": [
                {"relation": "spouse", "direction": "forward", "object": "B", "qualifiers": {}}
            ]
        },
        "B": {
            "name": "Bob",
            "instanceOf": ["P"],
            "attributes": [
                {"key": "height", "value": {"type": "quantity", "value": 175, "unit": "cm"}, "qualifiers": {}},
                {"key": "birth_date", "value": {"type": "date", "value": "1960-02-01"}, "qualifiers": {}}
            ],
            "relations": []
        }
    },
    "concepts": {
        "P": {"name": "person", "subclassOf": []}
    }
}"#;

fn build_kb() -> KnowledgeBase {
    let raw: RawKnowledgeBase = serde_json::from_str(KB_JSON).unwrap();
    KnowledgeBase::build(raw).unwrap()
}

fn run_program(kb: &KnowledgeBase) -> String {
    let program = Program::new(
        vec!["FindAll".to_string(), "FilterConcept".to_string(), "QueryName".to_string()],
        vec![vec![], vec!["person".to_string()], vec![]],
    );
    format!("{:?}", Interpreter::new(kb).run(&program).unwrap())
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("kb-build", |b| b.iter(build_kb));
    let kb = build_kb();
    c.bench_function("program-eval", |b| b.iter(|| run_program(&kb)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
