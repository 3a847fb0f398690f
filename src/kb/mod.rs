//! The in-memory property graph and its secondary indices (§3, §4.2).

pub mod build;
pub mod entity;
pub mod raw;

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::kb::entity::Entity;
use crate::kb::raw::Direction;
use crate::value::Value;

/// The indexed knowledge base a [`crate::interpreter::Interpreter`] runs
/// primitives against.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entities: IndexMap<String, Entity>,
    name_to_id: HashMap<String, Vec<String>>,
    concept_to_entity: HashMap<String, HashSet<String>>,
    attribute_keys: HashSet<String>,
    relation_labels: HashSet<String>,
    key_type: HashMap<String, String>,
    attribute_inv_index: HashMap<String, HashMap<String, Vec<usize>>>,
    relation_inv_index: HashMap<(String, Direction), HashMap<String, Vec<usize>>>,
    forward_relation_index: HashMap<(String, String), Vec<usize>>,
    entities_with_attribute: HashSet<String>,
    entities_with_quantity_attribute: HashSet<String>,
    entities_with_attribute_qualifier: HashSet<String>,
    entities_with_relation: HashSet<String>,
    entities_with_relation_qualifier: HashSet<String>,
    entities_with_both_attribute_and_relation: HashSet<String>,
    key_values: HashMap<String, Vec<Value>>,
    concept_key_values: HashMap<String, HashMap<String, Vec<Value>>>,
    concept_relations: HashMap<String, HashMap<(String, Direction), Vec<String>>>,
}

/// Construction-time statistics, surfaced for logging and diagnostics.
/// Grounded on `KB.print_statistics`: these count individual fact
/// occurrences, not distinct keys/labels.
#[derive(Debug, Clone, Copy)]
pub struct Statistics {
    pub entity_count: usize,
    pub relation_fact_count: usize,
    pub attribute_fact_count: usize,
    pub qualifier_fact_count: usize,
}

impl KnowledgeBase {
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = (&String, &Entity)> {
        self.entities.iter()
    }

    pub fn all_ids(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    pub fn ids_with_name(&self, name: &str) -> &[String] {
        self.name_to_id.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entities_under_concept(&self, concept_id: &str) -> &HashSet<String> {
        static EMPTY: OnceLock<HashSet<String>> = OnceLock::new();
        self.concept_to_entity
            .get(concept_id)
            .unwrap_or_else(|| EMPTY.get_or_init(HashSet::new))
    }

    pub fn attribute_keys(&self) -> &HashSet<String> {
        &self.attribute_keys
    }

    pub fn relation_labels(&self) -> &HashSet<String> {
        &self.relation_labels
    }

    pub fn key_type(&self, key: &str) -> Option<&str> {
        self.key_type.get(key).map(String::as_str)
    }

    pub fn attribute_positions(&self, key: &str, entity_id: &str) -> &[usize] {
        self.attribute_inv_index
            .get(key)
            .and_then(|m| m.get(entity_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn relation_positions(&self, relation: &str, direction: Direction, entity_id: &str) -> &[usize] {
        self.relation_inv_index
            .get(&(relation.to_string(), direction))
            .and_then(|m| m.get(entity_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn forward_relation_positions(&self, subject: &str, object: &str) -> &[usize] {
        self.forward_relation_index
            .get(&(subject.to_string(), object.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn entities_with_attribute(&self) -> &HashSet<String> {
        &self.entities_with_attribute
    }

    pub fn entities_with_quantity_attribute(&self) -> &HashSet<String> {
        &self.entities_with_quantity_attribute
    }

    pub fn entities_with_attribute_qualifier(&self) -> &HashSet<String> {
        &self.entities_with_attribute_qualifier
    }

    pub fn entities_with_relation(&self) -> &HashSet<String> {
        &self.entities_with_relation
    }

    pub fn entities_with_relation_qualifier(&self) -> &HashSet<String> {
        &self.entities_with_relation_qualifier
    }

    pub fn entities_with_both_attribute_and_relation(&self) -> &HashSet<String> {
        &self.entities_with_both_attribute_and_relation
    }

    pub fn key_values(&self, key: &str) -> &[Value] {
        self.key_values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn concept_key_values(&self, concept_id: &str, key: &str) -> &[Value] {
        self.concept_key_values
            .get(concept_id)
            .and_then(|m| m.get(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn concept_relation_objects(&self, concept_id: &str, relation: &str, direction: Direction) -> &[String] {
        self.concept_relations
            .get(concept_id)
            .and_then(|m| m.get(&(relation.to_string(), direction)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Counts individual fact occurrences (not distinct keys/labels),
    /// matching `KB.print_statistics`'s `cnt_rel`/`cnt_attr`/`cnt_qual`.
    pub fn statistics(&self) -> Statistics {
        let mut relation_fact_count = 0;
        let mut attribute_fact_count = 0;
        let mut qualifier_fact_count = 0;
        for entity in self.entities.values() {
            attribute_fact_count += entity.attributes.len();
            for attr in &entity.attributes {
                qualifier_fact_count += attr.qualifiers.values().map(Vec::len).sum::<usize>();
            }
            relation_fact_count += entity.relations.len();
            for rel in &entity.relations {
                qualifier_fact_count += rel.qualifiers.values().map(Vec::len).sum::<usize>();
            }
        }
        Statistics {
            entity_count: self.entities.len(),
            relation_fact_count,
            attribute_fact_count,
            qualifier_fact_count,
        }
    }
}
