//! The resolved entity graph: `isA` already unified, values already typed.

use std::collections::HashMap;

use crate::kb::raw::Direction;
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub is_a: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub relations: Vec<Relation>,
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub key: String,
    pub value: Value,
    pub qualifiers: HashMap<String, Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub relation: String,
    pub direction: Direction,
    pub object: String,
    pub qualifiers: HashMap<String, Vec<Value>>,
}

impl Relation {
    /// Structural equality used to deduplicate mirrored relations (§3).
    pub fn structurally_eq(&self, other: &Relation) -> bool {
        if self.relation != other.relation
            || self.direction != other.direction
            || self.object != other.object
            || self.qualifiers.len() != other.qualifiers.len()
        {
            return false;
        }
        self.qualifiers.iter().all(|(k, vs)| {
            other
                .qualifiers
                .get(k)
                .map_or(false, |ovs| vs.len() == ovs.len() && vs.iter().zip(ovs).all(|(a, b)| a.value_eq(b)))
        })
    }
}
