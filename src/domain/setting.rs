//! Clinical settings domain model
//!
//! Settings are stored as strings with a declared type and coerced on read.
//! The coercion rules are part of the external contract:
//!
//! - `boolean` is true iff the stored value is exactly `"true"` or `"1"`
//! - `json` parses the stored value, failing on malformed payloads
//! - `number`/`integer` coerce non-numeric input to 0 instead of failing
//! - `string` passes through
//!
//! The zero default for non-numeric values is intentional legacy behavior;
//! changing it would alter observable behavior for existing deployments.

use crate::domain::errors::ScribeError;
use crate::domain::result::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared storage type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Boolean,
    Json,
    Number,
    Integer,
    String,
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::Boolean => "boolean",
            SettingType::Json => "json",
            SettingType::Number => "number",
            SettingType::Integer => "integer",
            SettingType::String => "string",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SettingType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(SettingType::Boolean),
            "json" => Ok(SettingType::Json),
            "number" => Ok(SettingType::Number),
            "integer" => Ok(SettingType::Integer),
            "string" => Ok(SettingType::String),
            other => Err(format!("unknown setting type '{other}'")),
        }
    }
}

/// A stored setting row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalSetting {
    pub key: String,
    /// Raw stored value, always a string
    pub value: String,
    pub value_type: SettingType,
    pub updated_at: Option<DateTime<Utc>>,
    /// Display name of the administrator who last changed the value
    pub updated_by: Option<String>,
}

impl ClinicalSetting {
    /// Coerces the stored string into its typed form
    ///
    /// # Errors
    ///
    /// Returns [`ScribeError::Config`] when a `json`-typed value does not
    /// parse. The other types never fail.
    pub fn typed_value(&self) -> Result<SettingValue> {
        match self.value_type {
            SettingType::Boolean => Ok(SettingValue::Bool(
                self.value == "true" || self.value == "1",
            )),
            SettingType::Json => {
                let parsed: serde_json::Value =
                    serde_json::from_str(&self.value).map_err(|e| {
                        ScribeError::Config(format!(
                            "setting '{}' holds malformed JSON: {e}",
                            self.key
                        ))
                    })?;
                Ok(SettingValue::Json(parsed))
            }
            SettingType::Number | SettingType::Integer => {
                Ok(SettingValue::Number(coerce_integer(&self.value)))
            }
            SettingType::String => Ok(SettingValue::Text(self.value.clone())),
        }
    }
}

/// Typed form of a setting value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(i64),
    Json(serde_json::Value),
    Text(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A setting with both its typed value and its storage metadata, for the
/// administrative listing
#[derive(Debug, Clone, Serialize)]
pub struct SettingDetail {
    pub key: String,
    pub value: SettingValue,
    #[serde(rename = "type")]
    pub value_type: SettingType,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

/// Integer coercion: whole-number strings parse directly, decimal strings
/// truncate, anything else is 0.
fn coerce_integer(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return n;
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return f.trunc() as i64;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn setting(value: &str, value_type: SettingType) -> ClinicalSetting {
        ClinicalSetting {
            key: "k".to_string(),
            value: value.to_string(),
            value_type,
            updated_at: None,
            updated_by: None,
        }
    }

    #[test_case("true", true; "literal true")]
    #[test_case("1", true; "literal one")]
    #[test_case("false", false; "literal false")]
    #[test_case("0", false; "literal zero")]
    #[test_case("TRUE", false; "uppercase is not true")]
    #[test_case("yes", false; "yes is not true")]
    fn boolean_coercion(raw: &str, expected: bool) {
        let value = setting(raw, SettingType::Boolean).typed_value().unwrap();
        assert_eq!(value, SettingValue::Bool(expected));
    }

    #[test_case("30", 30; "plain integer")]
    #[test_case(" 42 ", 42; "whitespace trimmed")]
    #[test_case("7.9", 7; "decimal truncates")]
    #[test_case("-5", -5; "negative")]
    #[test_case("not-a-number", 0; "non numeric is zero")]
    #[test_case("", 0; "empty is zero")]
    fn number_coercion(raw: &str, expected: i64) {
        let value = setting(raw, SettingType::Number).typed_value().unwrap();
        assert_eq!(value, SettingValue::Number(expected));
    }

    #[test]
    fn test_json_coercion() {
        let value = setting(r#"{"max": 3}"#, SettingType::Json)
            .typed_value()
            .unwrap();
        assert_eq!(
            value,
            SettingValue::Json(serde_json::json!({"max": 3}))
        );
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = setting("{not json", SettingType::Json)
            .typed_value()
            .unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn test_string_passthrough() {
        let value = setting("weekly", SettingType::String).typed_value().unwrap();
        assert_eq!(value.as_text(), Some("weekly"));
    }

    #[test]
    fn test_setting_type_round_trip() {
        for t in ["boolean", "json", "number", "integer", "string"] {
            assert_eq!(t.parse::<SettingType>().unwrap().as_str(), t);
        }
        assert!("float".parse::<SettingType>().is_err());
    }
}
