//! End-to-end scenarios over the §8 Alice/Bob knowledge base, driven through
//! the public API exactly as an external caller would use it.

use std::collections::HashMap;

use indexmap::IndexMap;
use kopl_engine::kb::raw::{Direction, RawAttribute, RawConcept, RawEntity, RawKnowledgeBase, RawRelation, RawValue};
use kopl_engine::{Answer, Interpreter, KnowledgeBase, Program};

fn alice_and_bob() -> KnowledgeBase {
    let mut concepts = IndexMap::new();
    concepts.insert(
        "P".to_string(),
        RawConcept {
            name: "person".to_string(),
            subclass_of: vec![],
        },
    );

    let mut entities = IndexMap::new();
    entities.insert(
        "A".to_string(),
        RawEntity {
            name: "Alice".to_string(),
            instance_of: vec!["P".to_string()],
            attributes: vec![RawAttribute {
                key: "height".to_string(),
                value: RawValue::Quantity {
                    value: serde_json::json!(180),
                    unit: "cm".to_string(),
                },
                qualifiers: HashMap::new(),
            }],
            relations: vec![
                RawRelation {
                    relation: "spouse".to_string(),
                    direction: Direction::Forward,
                    object: "B".to_string(),
                    qualifiers: HashMap::new(),
                },
                RawRelation {
                    relation: "species".to_string(),
                    direction: Direction::Forward,
                    object: "P".to_string(),
                    qualifiers: HashMap::new(),
                },
            ],
        },
    );
    entities.insert(
        "B".to_string(),
        RawEntity {
            name: "Bob".to_string(),
            instance_of: vec!["P".to_string()],
            attributes: vec![
                RawAttribute {
                    key: "height".to_string(),
                    value: RawValue::Quantity {
                        value: serde_json::json!(175),
                        unit: "cm".to_string(),
                    },
                    qualifiers: HashMap::new(),
                },
                RawAttribute {
                    key: "birth_date".to_string(),
                    value: RawValue::Date {
                        value: serde_json::json!("1960-02-01"),
                    },
                    qualifiers: HashMap::new(),
                },
            ],
            relations: vec![],
        },
    );

    KnowledgeBase::build(RawKnowledgeBase { entities, concepts }).unwrap()
}

fn run(kb: &KnowledgeBase, primitives: &[&str], args: &[&[&str]]) -> Answer {
    let program = Program::new(
        primitives.iter().map(|s| s.to_string()).collect(),
        args.iter().map(|a| a.iter().map(|s| s.to_string()).collect()).collect(),
    );
    Interpreter::new(kb).run(&program).unwrap()
}

#[test]
fn test_filter_concept_finds_both_people() {
    let kb = alice_and_bob();
    let answer = run(&kb, &["FindAll", "FilterConcept", "QueryName"], &[&[], &["person"], &[]]);
    let Answer::List(mut names) = answer else { panic!() };
    names.sort();
    assert_eq!(names, vec!["Alice".to_string(), "Bob".to_string()]);
}

#[test]
fn test_relate_spouse_forward() {
    let kb = alice_and_bob();
    let answer = run(&kb, &["Find", "Relate", "QueryName"], &[&["Alice"], &["spouse", "forward"], &[]]);
    assert_eq!(answer, Answer::List(vec!["Bob".to_string()]));
}

#[test]
fn test_count_taller_than_178cm() {
    let kb = alice_and_bob();
    let answer = run(&kb, &["FindAll", "FilterNum", "Count"], &[&[], &["height", "178 cm", ">"], &[]]);
    assert_eq!(answer, Answer::Scalar("1".to_string()));
}

#[test]
fn test_verify_birth_year_against_full_date() {
    let kb = alice_and_bob();
    let answer = run(
        &kb,
        &["Find", "QueryAttr", "VerifyYear"],
        &[&["Bob"], &["birth_date"], &["1960", "="]],
    );
    assert_eq!(answer, Answer::Scalar("yes".to_string()));
}

#[test]
fn test_select_between_tallest() {
    let kb = alice_and_bob();
    let answer = run(
        &kb,
        &["Find", "FindAll", "SelectBetween"],
        &[&["Alice"], &[], &["height", "greater"]],
    );
    assert_eq!(answer, Answer::Scalar("Alice".to_string()));
}

#[test]
fn test_query_relation_between_named_entities() {
    let kb = alice_and_bob();
    let answer = run(&kb, &["Find", "Find", "QueryRelation"], &[&["Alice"], &["Bob"], &[]]);
    assert_eq!(answer, Answer::List(vec!["spouse".to_string()]));
}

#[test]
fn test_concept_targeted_relation_is_mirrored_onto_the_concept() {
    let kb = alice_and_bob();
    // Alice's `species -> person` relation targets a concept, so ingestion
    // mirrors a `species` backward edge onto `person` pointing at Alice.
    // A plain entity-to-entity relation (like `spouse`, above) gets no such
    // mirror, since only concept-valued objects trigger it (§3).
    let answer = run(&kb, &["Find", "Relate", "QueryName"], &[&["person"], &["species", "backward"], &[]]);
    assert_eq!(answer, Answer::List(vec!["Alice".to_string()]));
}

#[test]
fn test_spouse_relation_has_no_automatic_reverse() {
    let kb = alice_and_bob();
    // `spouse` targets Bob, a non-concept entity, so no mirror is inserted;
    // querying it backward from Bob finds nothing.
    let answer = run(&kb, &["Find", "Relate", "QueryName"], &[&["Bob"], &["spouse", "backward"], &[]]);
    assert_eq!(answer, Answer::List(vec![]));
}

#[test]
fn test_and_is_idempotent_over_ids() {
    let kb = alice_and_bob();
    let answer_all = run(&kb, &["FindAll", "FindAll", "And", "Count"], &[&[], &[], &[], &[]]);
    let answer_direct = run(&kb, &["FindAll", "Count"], &[&[], &[]]);
    assert_eq!(answer_all, answer_direct);
}

#[test]
fn test_unknown_name_yields_empty_not_error() {
    let kb = alice_and_bob();
    let answer = run(&kb, &["Find", "QueryName"], &[&["Nobody"], &[]]);
    assert_eq!(answer, Answer::List(vec![]));
}

#[test]
fn test_malformed_program_is_a_wiring_error() {
    let kb = alice_and_bob();
    // `And` with no preceding `Find`/`FindAll` has no open branch to pop.
    let program = Program::new(vec!["And".to_string()], vec![vec![]]);
    assert!(Interpreter::new(&kb).run(&program).is_err());
    assert!(Interpreter::new(&kb).run_isolated(&program).is_none());
}

#[test]
fn test_qfilter_with_no_fact_channel_yields_empty() {
    let kb = alice_and_bob();
    // `FindAll` carries no facts (`⊥`), so a qualifier filter on top of it
    // is empty rather than an error.
    let answer = run(
        &kb,
        &["FindAll", "QFilterStr", "QueryName"],
        &[&[], &["point_in_time", "2020"], &[]],
    );
    assert_eq!(answer, Answer::List(vec![]));
}
