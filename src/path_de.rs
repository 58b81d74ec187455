use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        anyhow!("at JSON path {path} → {}", err.into_inner())
    })
}

/// Same as [`from_str_with_path`], starting from an already parsed value.
pub fn from_value_with_path<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| {
        let path = err.path().to_string();
        anyhow!("at JSON path {path} → {}", err.into_inner())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Document;

    #[test]
    fn reports_path_of_bad_node() {
        let src = r#"{"root": {"kind": "struct", "fields": {"a": {"kind": "strin"}}}}"#;
        let err = from_str_with_path::<Document>(src).unwrap_err().to_string();
        assert!(err.starts_with("at JSON path root"), "{err}");
        assert!(err.contains("strin"), "{err}");
    }

    #[test]
    fn value_input_reports_path() {
        let v = serde_json::json!({"root": {"kind": "tuple", "items": 3}});
        let err = from_value_with_path::<Document>(v).unwrap_err().to_string();
        assert!(err.contains("root"), "{err}");
    }
}
