//! The `Query*` primitives and `Count` (§4.3 "Queries").

use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::primitives::Slot;
use crate::value::Value;

pub fn query_name(kb: &KnowledgeBase, deps: &[&Slot]) -> Result<Slot> {
    let ids = &deps[0].as_bundle()?.ids;
    let names = ids
        .iter()
        .map(|id| kb.entity(id).map(|e| e.name.clone()).unwrap_or_default())
        .collect();
    Ok(Slot::Names(names))
}

pub fn count(deps: &[&Slot]) -> Result<Slot> {
    Ok(Slot::Count(deps[0].as_bundle()?.ids.len()))
}

pub fn query_attr(kb: &KnowledgeBase, deps: &[&Slot], args: &[String]) -> Result<Slot> {
    let ids = &deps[0].as_bundle()?.ids;
    let key = args.first().map(String::as_str).unwrap_or_default();

    let mut values = Vec::new();
    for id in ids {
        let Some(entity) = kb.entity(id) else { continue };
        for &pos in kb.attribute_positions(key, id) {
            values.push(entity.attributes[pos].value.clone());
        }
    }
    Ok(Slot::Values(values))
}

pub fn query_attr_under_condition(kb: &KnowledgeBase, deps: &[&Slot], args: &[String]) -> Result<Slot> {
    let ids = &deps[0].as_bundle()?.ids;
    let key = args.first().map(String::as_str).unwrap_or_default();
    let qkey = args.get(1).map(String::as_str).unwrap_or_default();
    let raw_qvalue = args.get(2).map(String::as_str).unwrap_or_default();

    let qkey_type = kb.key_type(qkey).unwrap_or("string");
    let target = Value::from_literal(raw_qvalue, qkey_type, None)?;

    let mut values = Vec::new();
    for id in ids {
        let Some(entity) = kb.entity(id) else { continue };
        for &pos in kb.attribute_positions(key, id) {
            let attr = &entity.attributes[pos];
            let matched = attr
                .qualifiers
                .get(qkey)
                .map(|qvs| qvs.iter().any(|qv| qv.is_comparable(&target) && qv.value_eq(&target)))
                .unwrap_or(false);
            if matched {
                values.push(attr.value.clone());
            }
        }
    }
    Ok(Slot::Values(values))
}

pub fn query_attr_qualifier(kb: &KnowledgeBase, deps: &[&Slot], args: &[String]) -> Result<Slot> {
    let ids = &deps[0].as_bundle()?.ids;
    let key = args.first().map(String::as_str).unwrap_or_default();
    let raw_value = args.get(1).map(String::as_str).unwrap_or_default();
    let qkey = args.get(2).map(String::as_str).unwrap_or_default();

    let key_type = kb.key_type(key).unwrap_or("string");
    let target = Value::from_literal(raw_value, key_type, None)?;

    let mut values = Vec::new();
    for id in ids {
        let Some(entity) = kb.entity(id) else { continue };
        for &pos in kb.attribute_positions(key, id) {
            let attr = &entity.attributes[pos];
            if attr.key == key && attr.value.is_comparable(&target) && attr.value.value_eq(&target) {
                if let Some(qvs) = attr.qualifiers.get(qkey) {
                    values.extend(qvs.iter().cloned());
                }
            }
        }
    }
    Ok(Slot::Values(values))
}

pub fn query_relation(kb: &KnowledgeBase, deps: &[&Slot]) -> Result<Slot> {
    let subjects = &deps[0].as_bundle()?.ids;
    let objects = &deps[1].as_bundle()?.ids;

    let mut labels = Vec::new();
    for s in subjects {
        let Some(entity) = kb.entity(s) else { continue };
        for o in objects {
            for &pos in kb.forward_relation_positions(s, o) {
                labels.push(entity.relations[pos].relation.clone());
            }
        }
    }
    Ok(Slot::Names(labels))
}

pub fn query_relation_qualifier(kb: &KnowledgeBase, deps: &[&Slot], args: &[String]) -> Result<Slot> {
    let subjects = &deps[0].as_bundle()?.ids;
    let objects = &deps[1].as_bundle()?.ids;
    let relation = args.first().map(String::as_str).unwrap_or_default();
    let qkey = args.get(1).map(String::as_str).unwrap_or_default();

    let mut values = Vec::new();
    for s in subjects {
        let Some(entity) = kb.entity(s) else { continue };
        for o in objects {
            for &pos in kb.forward_relation_positions(s, o) {
                let rel = &entity.relations[pos];
                if rel.relation == relation {
                    if let Some(qvs) = rel.qualifiers.get(qkey) {
                        values.extend(qvs.iter().cloned());
                    }
                }
            }
        }
    }
    Ok(Slot::Values(values))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kb::build::tests_support::alice_and_bob_kb;
    use crate::primitives::retrieval;

    #[test]
    fn test_query_name_is_positional_not_deduplicated() {
        let kb = alice_and_bob_kb();
        let all = retrieval::find_all(&kb).unwrap();
        let Slot::Names(names) = query_name(&kb, &[&all]).unwrap() else {
            panic!()
        };
        let mut sorted = names;
        sorted.sort();
        assert_eq!(sorted, vec!["Alice".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_count_matches_id_len() {
        let kb = alice_and_bob_kb();
        let all = retrieval::find_all(&kb).unwrap();
        let Slot::Count(n) = count(&[&all]).unwrap() else { panic!() };
        assert_eq!(n, 2);
    }

    #[test]
    fn test_query_relation_between_sets() {
        let kb = alice_and_bob_kb();
        let alice = retrieval::find(&kb, &["Alice".to_string()]).unwrap();
        let bob = retrieval::find(&kb, &["Bob".to_string()]).unwrap();
        let Slot::Names(labels) = query_relation(&kb, &[&alice, &bob]).unwrap() else {
            panic!()
        };
        assert_eq!(labels, vec!["spouse".to_string()]);
    }

    #[test]
    fn test_query_attr_returns_typed_values() {
        let kb = alice_and_bob_kb();
        let alice = retrieval::find(&kb, &["Alice".to_string()]).unwrap();
        let Slot::Values(values) = query_attr(&kb, &[&alice], &["height".to_string()]).unwrap() else {
            panic!()
        };
        assert_eq!(values, vec![Value::quantity(180.0, "cm")]);
    }
}
