//! `Relate` (§4.3 "Navigation") and `And`/`Or` (§4.3 "Set algebra").

use std::collections::HashSet;

use crate::error::Result;
use crate::kb::raw::Direction;
use crate::kb::KnowledgeBase;
use crate::primitives::{Bundle, Fact, Slot};

pub fn relate(kb: &KnowledgeBase, deps: &[&Slot], args: &[String]) -> Result<Slot> {
    let ids = &deps[0].as_bundle()?.ids;
    let relation = args.first().map(String::as_str).unwrap_or_default();
    let direction = match args.get(1).map(String::as_str) {
        Some("backward") => Direction::Backward,
        _ => Direction::Forward,
    };

    let candidates: HashSet<&String> = ids.iter().collect();
    let mut res_ids = Vec::new();
    let mut res_facts = Vec::new();
    for entity_id in candidates {
        let Some(entity) = kb.entity(entity_id) else { continue };
        for &pos in kb.relation_positions(relation, direction, entity_id) {
            let rel = &entity.relations[pos];
            res_ids.push(rel.object.clone());
            res_facts.push(Fact::Relation(rel.clone()));
        }
    }
    Ok(Slot::Bundle(Bundle::with_facts(res_ids, res_facts)))
}

/// Set intersection of the id channels; the fact channel is always dropped
/// (§4.3 "Set algebra").
pub fn and(deps: &[&Slot]) -> Result<Slot> {
    let left: HashSet<&String> = deps[0].as_bundle()?.ids.iter().collect();
    let right: HashSet<&String> = deps[1].as_bundle()?.ids.iter().collect();
    let ids: Vec<String> = left.intersection(&right).map(|s| (*s).clone()).collect();
    Ok(Slot::Bundle(Bundle::ids_only(ids)))
}

pub fn or(deps: &[&Slot]) -> Result<Slot> {
    let left: HashSet<&String> = deps[0].as_bundle()?.ids.iter().collect();
    let right: HashSet<&String> = deps[1].as_bundle()?.ids.iter().collect();
    let ids: Vec<String> = left.union(&right).map(|s| (*s).clone()).collect();
    Ok(Slot::Bundle(Bundle::ids_only(ids)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kb::build::tests_support::alice_and_bob_kb;
    use crate::primitives::retrieval;

    #[test]
    fn test_relate_forward_spouse() {
        let kb = alice_and_bob_kb();
        let alice = retrieval::find(&kb, &["Alice".to_string()]).unwrap();
        let result = relate(&kb, &[&alice], &["spouse".to_string(), "forward".to_string()]).unwrap();
        let Slot::Bundle(b) = result else { panic!() };
        assert_eq!(b.ids.len(), 1);
        assert_eq!(kb.entity(&b.ids[0]).unwrap().name, "Bob");
    }

    #[test]
    fn test_and_is_idempotent() {
        let kb = alice_and_bob_kb();
        let all = retrieval::find_all(&kb).unwrap();
        let result = and(&[&all, &all]).unwrap();
        let Slot::Bundle(a) = &all else { panic!() };
        let Slot::Bundle(b) = result else { panic!() };
        let mut left: Vec<_> = a.ids.clone();
        let mut right: Vec<_> = b.ids;
        left.sort();
        right.sort();
        assert_eq!(left, right);
    }
}
