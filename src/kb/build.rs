//! `KnowledgeBase::build`: turns a [`RawKnowledgeBase`] into the indexed,
//! typed-value graph the interpreter queries.
//!
//! Grounded line-for-line on `original_source/src/kopl/data.py::KB.__init__`,
//! `get_direct_concepts` and `get_all_concepts`.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;

use crate::error::Result;
use crate::kb::entity::{Attribute, Entity, Relation};
use crate::kb::raw::{Direction, RawKnowledgeBase};
use crate::kb::KnowledgeBase;
use crate::value::{unify_key_type, Value};

impl KnowledgeBase {
    pub fn build(raw: RawKnowledgeBase) -> Result<KnowledgeBase> {
        // Recorded before the merge below folds concepts into `entities`, so
        // mirroring can still tell a concept id apart from a plain entity id
        // (§3: only relations whose object is a concept get mirrored).
        let concept_ids: HashSet<String> = raw.concepts.keys().cloned().collect();

        let mut entities: IndexMap<String, Entity> = IndexMap::new();

        for (id, concept) in &raw.concepts {
            entities.insert(
                id.clone(),
                Entity {
                    name: concept.name.clone(),
                    is_a: concept.subclass_of.clone(),
                    attributes: Vec::new(),
                    relations: Vec::new(),
                },
            );
        }

        for (id, entity) in &raw.entities {
            let mut attributes = Vec::with_capacity(entity.attributes.len());
            for raw_attr in &entity.attributes {
                let value = Value::from_raw(
                    raw_attr.value.type_tag(),
                    &raw_attr.value.payload_as_str(),
                    raw_attr.value.unit(),
                )?;
                let mut qualifiers = HashMap::new();
                for (k, vs) in &raw_attr.qualifiers {
                    let parsed = vs
                        .iter()
                        .map(|v| Value::from_raw(v.type_tag(), &v.payload_as_str(), v.unit()))
                        .collect::<Result<Vec<_>>>()?;
                    qualifiers.insert(k.clone(), parsed);
                }
                attributes.push(Attribute {
                    key: raw_attr.key.clone(),
                    value,
                    qualifiers,
                });
            }

            let mut relations = Vec::with_capacity(entity.relations.len());
            for raw_rel in &entity.relations {
                let mut qualifiers = HashMap::new();
                for (k, vs) in &raw_rel.qualifiers {
                    let parsed = vs
                        .iter()
                        .map(|v| Value::from_raw(v.type_tag(), &v.payload_as_str(), v.unit()))
                        .collect::<Result<Vec<_>>>()?;
                    qualifiers.insert(k.clone(), parsed);
                }
                relations.push(Relation {
                    relation: raw_rel.relation.clone(),
                    direction: raw_rel.direction,
                    object: raw_rel.object.clone(),
                    qualifiers,
                });
            }

            entities.insert(
                id.clone(),
                Entity {
                    name: entity.name.clone(),
                    is_a: entity.instance_of.clone(),
                    attributes,
                    relations,
                },
            );
        }

        // Mirror concept-targeted relations onto the concept itself, so that
        // `Relate` can walk a relation from either end (§3). Only relations
        // whose object is a *concept* id are mirrored — a plain entity-to-
        // entity relation (e.g. `spouse`) never gets an automatic reverse.
        let mirrors: Vec<(String, Relation)> = entities
            .iter()
            .flat_map(|(id, e)| {
                e.relations.iter().filter_map(move |r| {
                    concept_ids.contains(&r.object).then(|| {
                        (
                            r.object.clone(),
                            Relation {
                                relation: r.relation.clone(),
                                direction: r.direction.flipped(),
                                object: id.clone(),
                                qualifiers: r.qualifiers.clone(),
                            },
                        )
                    })
                })
            })
            .collect();

        for (target, mirrored) in mirrors {
            if let Some(entity) = entities.get_mut(&target) {
                if !entity.relations.iter().any(|r| r.structurally_eq(&mirrored)) {
                    entity.relations.push(mirrored);
                }
            }
        }

        let name_to_id = Self::build_name_index(&entities);
        let concept_to_entity = Self::build_ancestry_index(&entities);

        let mut attribute_keys = HashSet::new();
        let mut relation_labels = HashSet::new();
        let mut key_type: HashMap<String, String> = HashMap::new();
        let mut attribute_inv_index: HashMap<String, HashMap<String, Vec<usize>>> = HashMap::new();
        let mut relation_inv_index: HashMap<(String, Direction), HashMap<String, Vec<usize>>> = HashMap::new();
        let mut forward_relation_index: HashMap<(String, String), Vec<usize>> = HashMap::new();
        let mut entities_with_attribute = HashSet::new();
        let mut entities_with_quantity_attribute = HashSet::new();
        let mut entities_with_attribute_qualifier = HashSet::new();
        let mut entities_with_relation = HashSet::new();
        let mut entities_with_relation_qualifier = HashSet::new();
        let mut key_values: HashMap<String, Vec<Value>> = HashMap::new();
        let mut concept_key_values: HashMap<String, HashMap<String, Vec<Value>>> = HashMap::new();
        let mut concept_relations: HashMap<String, HashMap<(String, Direction), Vec<String>>> = HashMap::new();

        for (id, entity) in &entities {
            for (pos, attr) in entity.attributes.iter().enumerate() {
                attribute_keys.insert(attr.key.clone());
                entities_with_attribute.insert(id.clone());
                if attr.value.is_quantity() {
                    entities_with_quantity_attribute.insert(id.clone());
                }
                if !attr.qualifiers.is_empty() {
                    entities_with_attribute_qualifier.insert(id.clone());
                }
                key_type
                    .entry(attr.key.clone())
                    .and_modify(|t| *t = unify_key_type(observed_type(&attr.value)))
                    .or_insert_with(|| unify_key_type(observed_type(&attr.value)));
                attribute_inv_index
                    .entry(attr.key.clone())
                    .or_default()
                    .entry(id.clone())
                    .or_default()
                    .push(pos);
                key_values.entry(attr.key.clone()).or_default().push(attr.value.clone());
                for ancestor in concept_to_entity
                    .iter()
                    .filter(|(_, members)| members.contains(id))
                    .map(|(c, _)| c.clone())
                {
                    concept_key_values
                        .entry(ancestor)
                        .or_default()
                        .entry(attr.key.clone())
                        .or_default()
                        .push(attr.value.clone());
                }
            }

            for (pos, rel) in entity.relations.iter().enumerate() {
                relation_labels.insert(rel.relation.clone());
                entities_with_relation.insert(id.clone());
                if !rel.qualifiers.is_empty() {
                    entities_with_relation_qualifier.insert(id.clone());
                }
                relation_inv_index
                    .entry((rel.relation.clone(), rel.direction))
                    .or_default()
                    .entry(id.clone())
                    .or_default()
                    .push(pos);
                forward_relation_index
                    .entry((id.clone(), rel.object.clone()))
                    .or_default()
                    .push(pos);
                for ancestor in concept_to_entity
                    .iter()
                    .filter(|(_, members)| members.contains(id))
                    .map(|(c, _)| c.clone())
                {
                    concept_relations
                        .entry(ancestor)
                        .or_default()
                        .entry((rel.relation.clone(), rel.direction))
                        .or_default()
                        .push(rel.object.clone());
                }
            }
        }

        let entities_with_both_attribute_and_relation: HashSet<String> = entities_with_attribute
            .intersection(&entities_with_relation)
            .cloned()
            .collect();

        log::info!(
            "built knowledge base: {} entities, {} attribute keys, {} relation labels",
            entities.len(),
            attribute_keys.len(),
            relation_labels.len()
        );

        Ok(KnowledgeBase {
            entities,
            name_to_id,
            concept_to_entity,
            attribute_keys,
            relation_labels,
            key_type,
            attribute_inv_index,
            relation_inv_index,
            forward_relation_index,
            entities_with_attribute,
            entities_with_quantity_attribute,
            entities_with_attribute_qualifier,
            entities_with_relation,
            entities_with_relation_qualifier,
            entities_with_both_attribute_and_relation,
            key_values,
            concept_key_values,
            concept_relations,
        })
    }

    fn build_name_index(entities: &IndexMap<String, Entity>) -> HashMap<String, Vec<String>> {
        let mut index: HashMap<String, Vec<String>> = HashMap::new();
        for (id, entity) in entities {
            index.entry(entity.name.clone()).or_default().push(id.clone());
        }
        index
    }

    /// For every entity, BFS over `isA` edges to find its transitive ancestor
    /// set, then record the entity under each ancestor it found. Cycle-safe:
    /// a `visited` set per BFS keeps a malformed `isA` loop from looping
    /// forever.
    fn build_ancestry_index(entities: &IndexMap<String, Entity>) -> HashMap<String, HashSet<String>> {
        let mut concept_to_entity: HashMap<String, HashSet<String>> = HashMap::new();
        for (id, _) in entities {
            for ancestor in Self::ancestors_of(id, entities) {
                concept_to_entity.entry(ancestor).or_default().insert(id.clone());
            }
        }
        concept_to_entity
    }

    fn ancestors_of(start: &str, entities: &IndexMap<String, Entity>) -> HashSet<String> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        if let Some(entity) = entities.get(start) {
            for parent in &entity.is_a {
                queue.push_back(parent.clone());
            }
        }
        let mut ancestors = HashSet::new();
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            ancestors.insert(current.clone());
            if let Some(entity) = entities.get(&current) {
                for parent in &entity.is_a {
                    if !visited.contains(parent) {
                        queue.push_back(parent.clone());
                    }
                }
            }
        }
        ancestors
    }
}

fn observed_type(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Quantity(_) => "quantity",
        Value::Year(_) => "year",
        Value::Date(_) => "date",
    }
}
