//! `FindAll`/`Find` (§4.3 "Retrieval"): the two leaf primitives that open a
//! branch in the dependency stack.

use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::primitives::{Bundle, Slot};

pub fn find_all(kb: &KnowledgeBase) -> Result<Slot> {
    Ok(Slot::Bundle(Bundle::ids_only(kb.all_ids())))
}

/// Unknown names yield an empty bundle, never an error (§4.3 "Conventions").
pub fn find(kb: &KnowledgeBase, args: &[String]) -> Result<Slot> {
    let name = args.first().map(String::as_str).unwrap_or_default();
    Ok(Slot::Bundle(Bundle::ids_only(kb.ids_with_name(name).to_vec())))
}
