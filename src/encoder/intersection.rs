//! Intersections encode the same value with every member and merge.
//!
//! When every member produced an object, the outputs are shallow-merged in
//! member order, so later members win on shared keys. If any member produced
//! something else, only the last member's output is kept.
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Encoder, Hint};
use crate::schemable::{check_intersection_arity, SchemaError};

pub fn intersection(members: Vec<Encoder>) -> Result<Encoder, SchemaError> {
    check_intersection_arity(members.len())?;
    let hint = merge_hints(&members);
    Ok(Encoder::new(move |a: &Value| {
        let outs: Vec<Value> = members.iter().map(|m| m.encode(a)).collect();
        if outs.iter().all(Value::is_object) {
            let mut merged = Map::new();
            for out in outs {
                if let Value::Object(fields) = out {
                    merged.extend(fields);
                }
            }
            Value::Object(merged)
        } else {
            outs.into_iter().last().unwrap_or_default()
        }
    })
    .with_hint(hint))
}

// field hints survive only when every member declares an object
fn merge_hints(members: &[Encoder]) -> Hint {
    let mut merged = IndexMap::new();
    for m in members {
        match m.hint() {
            Hint::Fields(fields) => {
                merged.extend(fields.iter().map(|(k, h)| (k.clone(), h.clone())));
            }
            _ => return Hint::Opaque,
        }
    }
    Hint::Fields(Arc::new(merged))
}
