//! Runtime membership tests for literal sets.
use serde_json::Value;

use crate::literal::Literals;

/// Tests whether a (possibly absent) value belongs to some set.
pub trait Guard {
    fn is(&self, value: Option<&Value>) -> bool;
}

/// Guard over a closed literal enumeration.
#[derive(Debug, Clone)]
pub struct LiteralGuard {
    values: Literals,
}

impl LiteralGuard {
    pub fn values(&self) -> &Literals { &self.values }
}

impl Guard for LiteralGuard {
    fn is(&self, value: Option<&Value>) -> bool {
        self.values.contains(value)
    }
}

pub fn literals(values: Literals) -> LiteralGuard {
    LiteralGuard { values }
}
