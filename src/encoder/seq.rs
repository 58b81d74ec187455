use serde_json::Value;

use super::Encoder;
use crate::schemable::{check_tuple_arity, SchemaError};

/// Encodes every element in order.
pub fn array(item: Encoder) -> Encoder {
    Encoder::new(move |a: &Value| match a.as_array() {
        Some(xs) => Value::Array(xs.iter().map(|x| item.encode(x)).collect()),
        None => Value::Array(Vec::new()),
    })
}

/// One encoder per position; the output always has the declared arity.
pub fn tuple(items: Vec<Encoder>) -> Result<Encoder, SchemaError> {
    check_tuple_arity(items.len())?;
    Ok(Encoder::new(move |a: &Value| {
        Value::Array(items.iter().enumerate().map(|(i, e)| e.encode(&a[i])).collect())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{boolean, number, string};
    use serde_json::json;

    fn negated() -> Encoder {
        Encoder::new(|a: &Value| match a.as_bool() {
            Some(b) => Value::Bool(!b),
            None => a.clone(),
        })
    }

    #[test]
    fn array_keeps_order_and_length() {
        let e = array(negated());
        assert_eq!(e.encode(&json!([true, false, false])), json!([false, true, true]));
        assert_eq!(e.encode(&json!([])), json!([]));
        assert_eq!(e.encode(&json!({"0": true})), json!([]));
    }

    #[test]
    fn tuple_encodes_by_position() {
        let e = tuple(vec![string(), negated(), number()]).unwrap();
        assert_eq!(e.encode(&json!(["a", true, 3])), json!(["a", false, 3]));
    }

    #[test]
    fn tuple_pads_short_input_with_null() {
        let e = tuple(vec![string(), boolean()]).unwrap();
        assert_eq!(e.encode(&json!(["a"])), json!(["a", null]));
    }

    #[test]
    fn tuple_arity_checked_at_construction() {
        assert_eq!(tuple(vec![]).unwrap_err(), SchemaError::TupleArity(0));
        let six = (0..6).map(|_| string()).collect();
        assert_eq!(tuple(six).unwrap_err(), SchemaError::TupleArity(6));
    }
}
