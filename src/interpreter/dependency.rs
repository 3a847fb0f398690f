//! Dependency inference (§4.4 "Dependency inference"): recovers the binary
//! DAG implied by a flat, `<START>`/`<END>`-bracketed primitive sequence
//! using a single left-to-right pass over a branch-start stack.
//!
//! Grounded line-for-line on `original_source/src/kopl/kopl.py::KoPLEngine.forward`.

use crate::error::{Error, Reason, Result};
use crate::primitives::Primitive;

/// One bracketed program token: either a sentinel or a resolved primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Start,
    End,
    Pad,
    Primitive(Primitive),
}

/// For each position in the bracketed sequence, the memory indices it
/// depends on (empty for sentinels and leaves).
pub fn infer(tokens: &[Token]) -> Result<Vec<Vec<usize>>> {
    let mut deps = Vec::with_capacity(tokens.len());
    let mut branch_stack: Vec<usize> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let dep = match token {
            Token::Start | Token::End | Token::Pad => vec![],
            Token::Primitive(p) if p.is_leaf() => {
                branch_stack.push(i.wrapping_sub(1));
                vec![]
            }
            Token::Primitive(p) if p.is_binary() => {
                let branch_start = branch_stack.pop().ok_or_else(|| {
                    Error::new(Reason::Wiring {
                        at: i,
                        primitive: p.as_ref().to_string(),
                    })
                })?;
                vec![branch_start, i - 1]
            }
            Token::Primitive(_) => vec![i - 1],
        };
        deps.push(dep);
    }
    Ok(deps)
}
