//! `FilterConcept`, `Filter{Str,Num,Year,Date}`, `QFilter{Str,Num,Year,Date}`
//! (§4.3 "Concept filter", "Attribute filters", "Qualifier filters").

use std::collections::HashSet;

use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::primitives::{Bundle, Fact, Slot};
use crate::value::Value;

pub fn filter_concept(kb: &KnowledgeBase, deps: &[&Slot], args: &[String]) -> Result<Slot> {
    let ids = &deps[0].as_bundle()?.ids;
    let concept_name = args.first().map(String::as_str).unwrap_or_default();

    let mut targets = HashSet::new();
    for concept_id in kb.ids_with_name(concept_name) {
        targets.extend(kb.entities_under_concept(concept_id).iter().cloned());
    }

    let filtered: Vec<String> = ids.iter().filter(|id| targets.contains(*id)).cloned().collect();
    Ok(Slot::Bundle(Bundle::ids_only(filtered)))
}

/// Shared body of `FilterStr`/`FilterNum`/`FilterYear`/`FilterDate` (§4.3).
/// `FilterStr` is dispatched with a fixed `op = "="`; the others read `op`
/// from the final literal argument.
pub fn filter_attribute(kb: &KnowledgeBase, deps: &[&Slot], args: &[String], typ: &str) -> Result<Slot> {
    let ids = &deps[0].as_bundle()?.ids;
    let key = args.first().map(String::as_str).unwrap_or_default();
    let raw_value = args.get(1).map(String::as_str).unwrap_or_default();
    let op = if typ == "string" {
        "="
    } else {
        args.get(2).map(String::as_str).unwrap_or("=")
    };

    let key_type = kb.key_type(key).unwrap_or(typ);
    let target = Value::from_literal(raw_value, key_type, Some(typ))?;

    let candidates: HashSet<&String> = ids.iter().collect();
    let mut res_ids = Vec::new();
    let mut res_facts = Vec::new();
    for entity_id in candidates {
        let Some(entity) = kb.entity(entity_id) else { continue };
        for &pos in kb.attribute_positions(key, entity_id) {
            let attr = &entity.attributes[pos];
            if attr.key != key {
                continue;
            }
            if attr.value.is_comparable(&target) && attr.value.compare(&target, op)? {
                res_ids.push(entity_id.clone());
                res_facts.push(Fact::Attribute(attr.clone()));
            }
        }
    }
    Ok(Slot::Bundle(Bundle::with_facts(res_ids, res_facts)))
}

/// `⊥` facts yield an empty bundle rather than an error (§4.3 "Qualifier
/// filters").
pub fn filter_qualifier(deps: &[&Slot], args: &[String], typ: &str) -> Result<Slot> {
    let bundle = deps[0].as_bundle()?;
    let Some(facts) = &bundle.facts else {
        return Ok(Slot::Bundle(Bundle::default()));
    };

    let qkey = args.first().map(String::as_str).unwrap_or_default();
    let raw_value = args.get(1).map(String::as_str).unwrap_or_default();
    let op = if typ == "string" {
        "="
    } else {
        args.get(2).map(String::as_str).unwrap_or("=")
    };
    let target = Value::from_literal(raw_value, typ, Some(typ))?;

    let mut res_ids = Vec::new();
    let mut res_facts = Vec::new();
    for (id, fact) in bundle.ids.iter().zip(facts) {
        if let Some(qvs) = fact.qualifiers().get(qkey) {
            let matched = qvs
                .iter()
                .find(|qv| qv.is_comparable(&target))
                .map(|qv| qv.compare(&target, op))
                .transpose()?
                .unwrap_or(false);
            if matched {
                res_ids.push(id.clone());
                res_facts.push(fact.clone());
            }
        }
    }
    Ok(Slot::Bundle(Bundle::with_facts(res_ids, res_facts)))
}
