//! The primitive library (§4.3): ~27 pure transforms over `(ids, facts)`
//! bundles, typed-value lists, names, counts, relation labels and ternary
//! verdicts.

pub mod filter;
pub mod navigate;
pub mod query;
pub mod rank;
pub mod retrieval;
pub mod verify;

use std::fmt::{self, Display, Formatter};

use strum_macros::EnumString;

use crate::error::{Error, Reason, Result};
use crate::kb::entity::{Attribute, Relation};
use crate::kb::KnowledgeBase;
use crate::value::Value;

/// An entity-id list with an optional parallel list of justifying facts.
/// `facts: None` is the bottom fact channel (`⊥`) of §4.3.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    pub ids: Vec<String>,
    pub facts: Option<Vec<Fact>>,
}

impl Bundle {
    pub fn ids_only(ids: Vec<String>) -> Self {
        Bundle { ids, facts: None }
    }

    pub fn with_facts(ids: Vec<String>, facts: Vec<Fact>) -> Self {
        debug_assert_eq!(ids.len(), facts.len());
        Bundle {
            ids,
            facts: Some(facts),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Fact {
    Attribute(Attribute),
    Relation(Relation),
}

impl Fact {
    pub fn qualifiers(&self) -> &std::collections::HashMap<String, Vec<Value>> {
        match self {
            Fact::Attribute(a) => &a.qualifiers,
            Fact::Relation(r) => &r.qualifiers,
        }
    }
}

/// The ternary verdict returned by `Verify*` primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Yes,
    No,
    NotSure,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Yes => "yes",
            Verdict::No => "no",
            Verdict::NotSure => "not sure",
        })
    }
}

/// One evaluated memory slot. The interpreter's memory vector is a
/// `Vec<Slot>`; primitives consume prior slots and produce new ones.
#[derive(Debug, Clone)]
pub enum Slot {
    Bundle(Bundle),
    Values(Vec<Value>),
    Names(Vec<String>),
    Name(String),
    Count(usize),
    RelationLabel(String),
    Verdict(Verdict),
    /// What `<START>`/`<PAD>` sentinels store; never consumed by a primitive.
    Placeholder,
}

impl Slot {
    pub fn as_bundle(&self) -> Result<&Bundle> {
        match self {
            Slot::Bundle(b) => Ok(b),
            other => Err(slot_type_error("an entity bundle", other)),
        }
    }

    pub fn as_values(&self) -> Result<&[Value]> {
        match self {
            Slot::Values(v) => Ok(v),
            other => Err(slot_type_error("a value list", other)),
        }
    }

    /// The answer's final string form (§4.4 "Final formatting"): lists
    /// render element-wise, scalars render as a single string.
    pub fn into_strings(self) -> Vec<String> {
        match self {
            Slot::Bundle(b) => b.ids,
            Slot::Values(vs) => vs.iter().map(Value::to_string).collect(),
            Slot::Names(ns) => ns,
            Slot::Name(n) => vec![n],
            Slot::Count(c) => vec![c.to_string()],
            Slot::RelationLabel(r) => vec![r],
            Slot::Verdict(v) => vec![v.to_string()],
            Slot::Placeholder => vec![],
        }
    }
}

fn slot_type_error(expected: &str, found: &Slot) -> crate::error::Error {
    let found_kind = match found {
        Slot::Bundle(_) => "an entity bundle",
        Slot::Values(_) => "a value list",
        Slot::Names(_) => "a name list",
        Slot::Name(_) => "a name",
        Slot::Count(_) => "a count",
        Slot::RelationLabel(_) => "a relation label",
        Slot::Verdict(_) => "a verdict",
        Slot::Placeholder => "a placeholder",
    };
    Error::new(Reason::Expected {
        who: Some("primitive argument".to_string()),
        expected: expected.to_string(),
        found: found_kind.to_string(),
    })
    .into()
}

/// The closed vocabulary of primitive names (§4.3). `What` is accepted as an
/// alias for `QueryName` (§4.4 "Aliases").
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::AsRefStr)]
pub enum Primitive {
    FindAll,
    Find,
    FilterConcept,
    FilterStr,
    FilterNum,
    FilterYear,
    FilterDate,
    QFilterStr,
    QFilterNum,
    QFilterYear,
    QFilterDate,
    Relate,
    And,
    Or,
    #[strum(serialize = "QueryName", serialize = "What")]
    QueryName,
    Count,
    QueryAttr,
    QueryAttrUnderCondition,
    QueryAttrQualifier,
    QueryRelation,
    QueryRelationQualifier,
    SelectBetween,
    SelectAmong,
    VerifyStr,
    VerifyNum,
    VerifyYear,
    VerifyDate,
}

impl Primitive {
    /// Whether this primitive is a leaf retrieval (`Find`/`FindAll`), which
    /// opens a new branch in the dependency stack (§4.4).
    pub fn is_leaf(self) -> bool {
        matches!(self, Primitive::FindAll | Primitive::Find)
    }

    /// Whether this primitive is a binary combinator, consuming two open
    /// branches (§4.4).
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Primitive::And
                | Primitive::Or
                | Primitive::SelectBetween
                | Primitive::QueryRelation
                | Primitive::QueryRelationQualifier
        )
    }
}

/// Dispatches one primitive call. `deps` holds the already-evaluated memory
/// slots this primitive depends on (one for unary, two for binary), in
/// dependency order; `args` is the primitive's literal-argument list.
pub fn apply(kb: &KnowledgeBase, primitive: Primitive, deps: &[&Slot], args: &[String]) -> Result<Slot> {
    use Primitive::*;
    match primitive {
        FindAll => retrieval::find_all(kb),
        Find => retrieval::find(kb, args),
        FilterConcept => filter::filter_concept(kb, deps, args),
        FilterStr => filter::filter_attribute(kb, deps, args, "string"),
        FilterNum => filter::filter_attribute(kb, deps, args, "quantity"),
        FilterYear | FilterDate => filter::filter_attribute(kb, deps, args, "date"),
        QFilterStr => filter::filter_qualifier(deps, args, "string"),
        QFilterNum => filter::filter_qualifier(deps, args, "quantity"),
        QFilterYear | QFilterDate => filter::filter_qualifier(deps, args, "date"),
        Relate => navigate::relate(kb, deps, args),
        And => navigate::and(deps),
        Or => navigate::or(deps),
        QueryName => query::query_name(kb, deps),
        Count => query::count(deps),
        QueryAttr => query::query_attr(kb, deps, args),
        QueryAttrUnderCondition => query::query_attr_under_condition(kb, deps, args),
        QueryAttrQualifier => query::query_attr_qualifier(kb, deps, args),
        QueryRelation => query::query_relation(kb, deps),
        QueryRelationQualifier => query::query_relation_qualifier(kb, deps, args),
        SelectBetween => rank::select_between(kb, deps, args),
        SelectAmong => rank::select_among(kb, deps, args),
        VerifyStr => verify::verify(deps, args, "string"),
        VerifyNum => verify::verify(deps, args, "quantity"),
        VerifyYear | VerifyDate => verify::verify(deps, args, "date"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_what_aliases_query_name() {
        use std::str::FromStr;
        assert_eq!(Primitive::from_str("What").unwrap(), Primitive::QueryName);
    }

    #[test]
    fn test_leaf_and_binary_classification() {
        assert!(Primitive::FindAll.is_leaf());
        assert!(Primitive::Find.is_leaf());
        assert!(Primitive::And.is_binary());
        assert!(!Primitive::Relate.is_binary());
    }
}
