//! Tagged sums: dispatch on the value of one discriminant field.
use std::borrow::Cow;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Encoder, Encoders, Hint, ENCODERS};
use crate::schemable::{Schemable, SchemaError, Sum};

/// Two-step sum: fix the tag field now, supply branches with [`Sum::of`].
pub fn sum(tag: &str) -> Sum<'static, Encoders> {
    ENCODERS.sum(tag)
}

/// Builds the dispatching encoder after checking that every branch whose
/// shape is known declares its own key at `tag`.
pub fn tagged<K, I>(tag: &str, branches: I) -> Result<Encoder, SchemaError>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Encoder)>,
{
    let mut collected: IndexMap<String, Encoder> = IndexMap::new();
    for (key, branch) in branches {
        let key: String = key.into();
        if collected.contains_key(&key) {
            return Err(SchemaError::DuplicateBranch { tag: tag.to_owned(), branch: key });
        }
        collected.insert(key, branch);
    }
    let branches = collected;
    if branches.is_empty() {
        return Err(SchemaError::EmptySum { tag: tag.to_owned() });
    }
    for (key, branch) in &branches {
        check_branch(tag, key, branch.hint())?;
    }
    debug!(tag, branches = branches.len(), "built sum encoder");

    let tag = tag.to_owned();
    Ok(Encoder::new(move |a: &Value| {
        let key = tag_key(&a[tag.as_str()]);
        match branches.get(key.as_ref()) {
            Some(branch) => branch.encode(a),
            None => {
                warn!(tag = %tag, value = %key, "no branch for tag value, passing through");
                a.clone()
            }
        }
    }))
}

// non-string tags select the branch named by their JSON text
fn tag_key(v: &Value) -> Cow<'_, str> {
    match v {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

fn check_branch(tag: &str, key: &str, hint: &Hint) -> Result<(), SchemaError> {
    let Hint::Fields(fields) = hint else {
        return Ok(());
    };
    match fields.get(tag) {
        None => Err(SchemaError::MissingTag { tag: tag.to_owned(), branch: key.to_owned() }),
        Some(Hint::Literals(declared)) => {
            let selects_key =
                declared.first().to_value().is_some_and(|v| tag_key(&v) == key);
            if declared.len() == 1 && selects_key {
                Ok(())
            } else {
                Err(SchemaError::TagMismatch {
                    tag: tag.to_owned(),
                    branch: key.to_owned(),
                    declared: declared.to_string(),
                })
            }
        }
        Some(_) => Ok(()),
    }
}
