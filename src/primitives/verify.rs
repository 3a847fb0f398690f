//! `Verify{Str,Num,Year,Date}` (§4.3 "Verification"): a ternary verdict over
//! a list of typed values.

use crate::error::Result;
use crate::primitives::{Slot, Verdict};
use crate::value::Value;

pub fn verify(deps: &[&Slot], args: &[String], typ: &str) -> Result<Slot> {
    let values = deps[0].as_values()?;
    let raw_target = args.first().map(String::as_str).unwrap_or_default();
    let op = if typ == "string" {
        "="
    } else {
        args.get(1).map(String::as_str).unwrap_or("=")
    };
    let target = Value::from_literal(raw_target, typ, Some(typ))?;

    let mut matched = 0;
    for v in values {
        if v.is_comparable(&target) && v.compare(&target, op)? {
            matched += 1;
        }
    }

    let verdict = if values.is_empty() {
        Verdict::No
    } else if matched == values.len() {
        Verdict::Yes
    } else if matched == 0 {
        Verdict::No
    } else {
        Verdict::NotSure
    };
    Ok(Slot::Verdict(verdict))
}
