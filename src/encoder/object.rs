//! Object-shaped encoders: structs, partial structs and records.
use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Encoder, Hint};

fn collect_fields<K, I>(fields: I) -> IndexMap<String, Encoder>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Encoder)>,
{
    fields.into_iter().map(|(k, e)| (k.into(), e)).collect()
}

/// Writes exactly the declared keys; extra input keys are dropped and
/// missing ones are encoded from `null`.
pub fn struct_<K, I>(fields: I) -> Encoder
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Encoder)>,
{
    let fields = collect_fields(fields);
    let hint = Hint::fields(&fields);
    Encoder::new(move |a: &Value| {
        let mut out = Map::with_capacity(fields.len());
        for (k, e) in &fields {
            out.insert(k.clone(), e.encode(&a[k.as_str()]));
        }
        Value::Object(out)
    })
    .with_hint(hint)
}

/// Like [`struct_`], but absent fields are omitted from the output.
pub fn partial<K, I>(fields: I) -> Encoder
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Encoder)>,
{
    let fields = collect_fields(fields);
    let hint = Hint::fields(&fields);
    Encoder::new(move |a: &Value| {
        let mut out = Map::new();
        for (k, e) in &fields {
            if let Some(v) = a.get(k) {
                out.insert(k.clone(), e.encode(v));
            }
        }
        Value::Object(out)
    })
    .with_hint(hint)
}

/// Encodes every value of a map, keeping every key.
pub fn record(codomain: Encoder) -> Encoder {
    Encoder::new(move |a: &Value| {
        let out = match a.as_object() {
            Some(map) => map.iter().map(|(k, v)| (k.clone(), codomain.encode(v))).collect(),
            None => Map::new(),
        };
        Value::Object(out)
    })
}
