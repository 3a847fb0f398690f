//! `SelectBetween`/`SelectAmong` (§4.3 "Ranking").
//!
//! Both collect quantity candidates, reduce to the most frequent unit, then
//! sort by value. The most-frequent-unit tie-break is first-seen order
//! (SPEC_FULL.md §4.3 "Open question"), which is why unit counting uses an
//! [`indexmap::IndexMap`] rather than a `HashMap`.

use indexmap::IndexMap;
use itertools::Itertools;

use crate::error::{Error, Result};
use crate::kb::KnowledgeBase;
use crate::primitives::Slot;
use crate::value::Value;

struct Candidate {
    entity_id: String,
    value: f64,
    unit: String,
}

fn collect_candidates(kb: &KnowledgeBase, ids: &[String], key: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for id in ids {
        let Some(entity) = kb.entity(id) else { continue };
        for &pos in kb.attribute_positions(key, id) {
            if let Value::Quantity(q) = &entity.attributes[pos].value {
                candidates.push(Candidate {
                    entity_id: id.clone(),
                    value: q.value,
                    unit: q.unit.clone(),
                });
            }
        }
    }
    candidates
}

/// Reduce `candidates` to those sharing the most frequent unit, breaking
/// ties by first-seen order.
fn reduce_to_common_unit(candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
    let mut unit_counts: IndexMap<String, usize> = IndexMap::new();
    for c in &candidates {
        *unit_counts.entry(c.unit.clone()).or_insert(0) += 1;
    }
    // `Iterator::max_by_key` returns the *last* maximum on ties; the
    // first-seen unit must win instead, so fold manually in insertion order.
    let mut common_unit: Option<(String, usize)> = None;
    for (unit, count) in &unit_counts {
        if common_unit.as_ref().map_or(true, |(_, best)| count > best) {
            common_unit = Some((unit.clone(), *count));
        }
    }
    let common_unit = common_unit
        .map(|(unit, _)| unit)
        .ok_or_else(|| Error::domain("no candidate has the requested quantity attribute"))?;
    Ok(candidates.into_iter().filter(|c| c.unit == common_unit).collect())
}

pub fn select_between(kb: &KnowledgeBase, deps: &[&Slot], args: &[String]) -> Result<Slot> {
    let left = &deps[0].as_bundle()?.ids;
    let right = &deps[1].as_bundle()?.ids;
    let key = args.first().map(String::as_str).unwrap_or_default();
    let op = args.get(1).map(String::as_str).unwrap_or("greater");

    let mut candidates = collect_candidates(kb, left, key);
    candidates.extend(collect_candidates(kb, right, key));
    let candidates = reduce_to_common_unit(candidates)?;

    let extreme = if op == "less" {
        candidates
            .iter()
            .min_by(|a, b| a.value.partial_cmp(&b.value).unwrap())
    } else {
        candidates
            .iter()
            .max_by(|a, b| a.value.partial_cmp(&b.value).unwrap())
    }
    .ok_or_else(|| Error::domain("no candidate has the requested quantity attribute"))?;

    let name = kb.entity(&extreme.entity_id).map(|e| e.name.clone()).unwrap_or_default();
    Ok(Slot::Name(name))
}

pub fn select_among(kb: &KnowledgeBase, deps: &[&Slot], args: &[String]) -> Result<Slot> {
    let ids = &deps[0].as_bundle()?.ids;
    let key = args.first().map(String::as_str).unwrap_or_default();
    let op = args.get(1).map(String::as_str).unwrap_or("largest");

    let candidates = reduce_to_common_unit(collect_candidates(kb, ids, key))?;

    let extreme_value = if op == "smallest" {
        candidates
            .iter()
            .map(|c| c.value)
            .fold(f64::INFINITY, f64::min)
    } else {
        candidates
            .iter()
            .map(|c| c.value)
            .fold(f64::NEG_INFINITY, f64::max)
    };

    let names = candidates
        .iter()
        .filter(|c| c.value == extreme_value)
        .filter_map(|c| kb.entity(&c.entity_id).map(|e| e.name.clone()))
        .unique()
        .collect();
    Ok(Slot::Names(names))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kb::build::tests_support::alice_and_bob_kb;
    use crate::primitives::retrieval;

    #[test]
    fn test_select_between_greater_picks_alice() {
        let kb = alice_and_bob_kb();
        let alice = retrieval::find(&kb, &["Alice".to_string()]).unwrap();
        let all = retrieval::find_all(&kb).unwrap();
        let Slot::Name(name) = select_between(
            &kb,
            &[&alice, &all],
            &["height".to_string(), "greater".to_string()],
        )
        .unwrap() else {
            panic!()
        };
        assert_eq!(name, "Alice");
    }

    #[test]
    fn test_select_among_smallest_within_all() {
        let kb = alice_and_bob_kb();
        let all = retrieval::find_all(&kb).unwrap();
        let Slot::Names(names) = select_among(&kb, &[&all], &["height".to_string(), "smallest".to_string()])
            .unwrap()
        else {
            panic!()
        };
        assert_eq!(names, vec!["Bob".to_string()]);
    }
}
