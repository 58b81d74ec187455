//! Literal values, non-empty literal sets and the refined integer scalar.
use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schemable::SchemaError;

// ————————————————————————————————————————————————————————————————————————————
// LITERAL
// ————————————————————————————————————————————————————————————————————————————

/// A single literal value. `Undefined` is the absence sentinel: it stands for
/// a missing value and never equals a present JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    String(String),
    Number(OrderedFloat<f64>),
    Bool(bool),
    Null,
    #[serde(skip)]
    Undefined,
}

impl Literal {
    /// Membership test against a possibly-absent value.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (Literal::Undefined, None) => true,
            (_, None) | (Literal::Undefined, Some(_)) => false,
            (Literal::Null, Some(Value::Null)) => true,
            (Literal::Bool(b), Some(Value::Bool(v))) => b == v,
            (Literal::String(s), Some(Value::String(v))) => s == v,
            (Literal::Number(n), Some(Value::Number(v))) => {
                v.as_f64().is_some_and(|v| OrderedFloat(v) == *n)
            }
            _ => false,
        }
    }

    /// JSON form of the literal; `None` for the absence sentinel.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Literal::String(s) => Some(Value::from(s.clone())),
            Literal::Number(n) => Some(number_value(n.0)),
            Literal::Bool(b) => Some(Value::Bool(*b)),
            Literal::Null => Some(Value::Null),
            Literal::Undefined => None,
        }
    }
}

// integral floats print as `1`, not `1.0`
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_value() {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("undefined"),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self { Literal::String(s.to_owned()) }
}

impl From<String> for Literal {
    fn from(s: String) -> Self { Literal::String(s) }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self { Literal::Number(OrderedFloat(n)) }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self { Literal::Number(OrderedFloat(n as f64)) }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self { Literal::Bool(b) }
}

// ————————————————————————————————————————————————————————————————————————————
// LITERALS
// ————————————————————————————————————————————————————————————————————————————

/// A non-empty, ordered set of literals describing a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Literals(Vec<Literal>);

impl Literals {
    pub fn new<I, L>(values: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        let values: Vec<Literal> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(SchemaError::EmptyLiterals);
        }
        Ok(Self(values))
    }

    /// Single-member set; cannot be empty.
    pub fn one(value: impl Into<Literal>) -> Self {
        Self(vec![value.into()])
    }

    pub fn contains(&self, value: Option<&Value>) -> bool {
        self.0.iter().any(|l| l.matches(value))
    }

    pub fn as_slice(&self) -> &[Literal] { &self.0 }

    pub fn first(&self) -> &Literal { &self.0[0] }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { false }
}

impl<'de> Deserialize<'de> for Literals {
    fn deserialize<D: serde::Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let values = Vec::<Literal>::deserialize(de)?;
        Literals::new(values).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Literals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Literal::to_string).collect();
        f.write_str(&parts.join(" | "))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INT
// ————————————————————————————————————————————————————————————————————————————

/// An integer checked once where it enters the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Int(i64);

impl Int {
    pub fn get(self) -> i64 { self.0 }
}

impl From<i64> for Int {
    fn from(n: i64) -> Self { Int(n) }
}

impl TryFrom<f64> for Int {
    type Error = SchemaError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
            Ok(Int(n as i64))
        } else {
            Err(SchemaError::NotAnInteger(Value::from(n).to_string()))
        }
    }
}

impl TryFrom<&Value> for Int {
    type Error = SchemaError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Int(i)),
                None => n
                    .as_f64()
                    .ok_or_else(|| SchemaError::NotAnInteger(v.to_string()))
                    .and_then(Int::try_from),
            },
            other => Err(SchemaError::NotAnInteger(other.to_string())),
        }
    }
}

impl From<Int> for Value {
    fn from(n: Int) -> Self { Value::from(n.0) }
}

impl<'de> Deserialize<'de> for Int {
    fn deserialize<D: serde::Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(de)?;
        Int::try_from(&v).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_matches_by_kind() {
        assert!(Literal::from("a").matches(Some(&json!("a"))));
        assert!(!Literal::from("1").matches(Some(&json!(1))));
        assert!(Literal::from(1i64).matches(Some(&json!(1))));
        assert!(Literal::from(1i64).matches(Some(&json!(1.0))));
        assert!(Literal::Null.matches(Some(&Value::Null)));
        assert!(!Literal::Null.matches(None));
        assert!(Literal::Undefined.matches(None));
        assert!(!Literal::Undefined.matches(Some(&Value::Null)));
    }

    #[test]
    fn empty_literals_rejected() {
        let err = Literals::new(Vec::<Literal>::new()).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyLiterals));
        let err = serde_json::from_str::<Literals>("[]").unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn literals_display() {
        let ls = Literals::new([Literal::from("a"), Literal::from(2i64), Literal::Null, Literal::Undefined]).unwrap();
        assert_eq!(ls.to_string(), r#""a" | 2 | null | undefined"#);
    }

    #[test]
    fn int_is_checked_at_the_boundary() {
        assert_eq!(Int::try_from(3.0).unwrap().get(), 3);
        assert!(Int::try_from(3.5).is_err());
        assert!(Int::try_from(f64::NAN).is_err());
        assert_eq!(Int::try_from(&json!(-7)).unwrap().get(), -7);
        assert!(Int::try_from(&json!("7")).is_err());
        assert_eq!(Value::from(Int::from(9)), json!(9));
        assert!(serde_json::from_str::<Int>("1.25").is_err());
    }
}
