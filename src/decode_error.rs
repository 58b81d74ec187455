//! Hierarchical decode failures, as produced by decoders.
//!
//! Every variant carries the offending value plus an optional message and
//! schema id; the composite variants add their children.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(default)]
    pub actual: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_tag")]
pub enum DecodeError {
    /// Terminal failure at one position.
    Leaf {
        #[serde(flatten)]
        info: ErrorInfo,
    },
    /// Failures inside a sequence, keyed by position.
    Indexed {
        #[serde(flatten)]
        info: ErrorInfo,
        errors: Vec<(usize, DecodeError)>,
    },
    /// Failures inside an object, keyed by field name.
    Labeled {
        #[serde(flatten)]
        info: ErrorInfo,
        errors: Vec<(String, DecodeError)>,
    },
    /// Some of several required schemas failed.
    And {
        #[serde(flatten)]
        info: ErrorInfo,
        errors: Vec<DecodeError>,
    },
    /// None of several alternatives matched.
    Or {
        #[serde(flatten)]
        info: ErrorInfo,
        errors: Vec<DecodeError>,
    },
}

fn info(actual: Value) -> ErrorInfo {
    ErrorInfo { actual, ..ErrorInfo::default() }
}

impl DecodeError {
    pub fn leaf(actual: Value) -> Self {
        DecodeError::Leaf { info: info(actual) }
    }

    pub fn indexed(actual: Value, errors: Vec<(usize, DecodeError)>) -> Self {
        DecodeError::Indexed { info: info(actual), errors }
    }

    pub fn labeled<K: Into<String>>(actual: Value, errors: Vec<(K, DecodeError)>) -> Self {
        let errors = errors.into_iter().map(|(k, e)| (k.into(), e)).collect();
        DecodeError::Labeled { info: info(actual), errors }
    }

    pub fn and(actual: Value, errors: Vec<DecodeError>) -> Self {
        DecodeError::And { info: info(actual), errors }
    }

    pub fn or(actual: Value, errors: Vec<DecodeError>) -> Self {
        DecodeError::Or { info: info(actual), errors }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.info_mut().id = Some(id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.info_mut().message = Some(message.into());
        self
    }

    pub fn info(&self) -> &ErrorInfo {
        match self {
            DecodeError::Leaf { info }
            | DecodeError::Indexed { info, .. }
            | DecodeError::Labeled { info, .. }
            | DecodeError::And { info, .. }
            | DecodeError::Or { info, .. } => info,
        }
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        match self {
            DecodeError::Leaf { info }
            | DecodeError::Indexed { info, .. }
            | DecodeError::Labeled { info, .. }
            | DecodeError::And { info, .. }
            | DecodeError::Or { info, .. } => info,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::tree::draw(self))
    }
}

impl std::error::Error for DecodeError {}
