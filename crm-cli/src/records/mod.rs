//! Record files and type-aware value handling

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::metadata::{FieldMetadataItem, FieldMetadataType, is_composite_field_type};

/// One CRM record as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl Record {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read record file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse record file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize record")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write record file: {}", path.display()))?;
        log::info!("Saved record {} to {}", self.id, path.display());
        Ok(())
    }

    pub fn value(&self, field_name: &str) -> Option<&Value> {
        self.values.get(field_name)
    }

    /// Display text of a field, empty when unset
    pub fn display_value(&self, field: &FieldMetadataItem) -> String {
        self.value(&field.name)
            .map(|v| format_value(field.field_type, v))
            .unwrap_or_default()
    }

    /// Store edited text in a scalar field, coerced to the field type
    pub fn set_text_value(&mut self, field: &FieldMetadataItem, text: &str) -> Result<()> {
        if is_composite_field_type(field.field_type) {
            bail!("'{}' is a composite field and cannot be edited as text", field.label);
        }

        let value = parse_value(field.field_type, text)
            .with_context(|| format!("Invalid value for '{}'", field.label))?;
        log::debug!("Record {}: {} = {}", self.id, field.name, value);
        self.values.insert(field.name.clone(), value);
        Ok(())
    }
}

/// Format a stored value for a single terminal line
pub fn format_value(field_type: FieldMetadataType, value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => (if *b { "Yes" } else { "No" }).to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|v| format_value(FieldMetadataType::Text, v))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => format_composite(field_type, map),
    }
}

fn format_composite(field_type: FieldMetadataType, map: &Map<String, Value>) -> String {
    let part = |name: &str| {
        map.get(name)
            .map(|v| format_value(FieldMetadataType::Text, v))
            .unwrap_or_default()
    };

    match field_type {
        FieldMetadataType::FullName => {
            [part("firstName"), part("lastName")]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        }
        FieldMetadataType::Currency => {
            let amount = map
                .get("amountMicros")
                .and_then(|v| v.as_f64())
                .map(|micros| format!("{:.2}", micros / 1_000_000.0))
                .unwrap_or_default();
            [amount, part("currencyCode")]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        }
        _ => {
            let sub_fields = field_type.sub_fields();
            let parts: Vec<String> = if sub_fields.is_empty() {
                map.values()
                    .map(|v| format_value(FieldMetadataType::Text, v))
                    .collect()
            } else {
                sub_fields.iter().map(|s| part(s.name)).collect()
            };
            parts
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Parse edited text into a JSON value for the given scalar type
pub fn parse_value(field_type: FieldMetadataType, text: &str) -> Result<Value> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Value::Null);
    }

    match field_type {
        FieldMetadataType::Number | FieldMetadataType::Numeric | FieldMetadataType::Rating => {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Value::from(i));
            }
            match text.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::from(f)),
                _ => bail!("'{}' is not a number", text),
            }
        }
        FieldMetadataType::Boolean => match text.to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "n" | "0" => Ok(Value::Bool(false)),
            _ => bail!("'{}' is not a boolean (use yes/no)", text),
        },
        FieldMetadataType::RawJson => {
            serde_json::from_str(text).with_context(|| format!("'{}' is not valid JSON", text))
        }
        FieldMetadataType::MultiSelect | FieldMetadataType::Array => Ok(Value::Array(
            text.split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        )),
        _ => Ok(Value::String(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(name: &str, field_type: FieldMetadataType) -> FieldMetadataItem {
        FieldMetadataItem {
            name: name.into(),
            label: name.into(),
            field_type,
            icon: None,
            is_active: true,
            is_read_only: false,
            disable_tooltip: false,
        }
    }

    fn record() -> Record {
        serde_json::from_value(json!({
            "id": "rec-1",
            "values": {
                "name": {"firstName": "Ada", "lastName": "Lovelace"},
                "address": {"addressCity": "London", "addressCountry": "UK"},
                "salary": {"amountMicros": 125000000000i64, "currencyCode": "GBP"},
                "tags": ["vip", "", "lead"],
                "active": true
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_display_composite_values() {
        let record = record();
        assert_eq!(record.display_value(&field("name", FieldMetadataType::FullName)), "Ada Lovelace");
        assert_eq!(record.display_value(&field("address", FieldMetadataType::Address)), "London, UK");
        assert_eq!(record.display_value(&field("salary", FieldMetadataType::Currency)), "125000.00 GBP");
        assert_eq!(record.display_value(&field("tags", FieldMetadataType::MultiSelect)), "vip, lead");
        assert_eq!(record.display_value(&field("active", FieldMetadataType::Boolean)), "Yes");
        assert_eq!(record.display_value(&field("missing", FieldMetadataType::Text)), "");
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_value(FieldMetadataType::Number, "42").unwrap(), json!(42));
        assert_eq!(parse_value(FieldMetadataType::Number, "4.5").unwrap(), json!(4.5));
        assert!(parse_value(FieldMetadataType::Number, "four").is_err());
        assert_eq!(parse_value(FieldMetadataType::Boolean, "No").unwrap(), json!(false));
        assert!(parse_value(FieldMetadataType::Boolean, "maybe").is_err());
        assert_eq!(parse_value(FieldMetadataType::MultiSelect, "a, b,").unwrap(), json!(["a", "b"]));
        assert_eq!(parse_value(FieldMetadataType::Text, "  ").unwrap(), Value::Null);
    }

    #[test]
    fn test_set_text_value() {
        let mut record = record();
        record
            .set_text_value(&field("jobTitle", FieldMetadataType::Text), "Engineer")
            .unwrap();
        assert_eq!(record.value("jobTitle"), Some(&json!("Engineer")));

        assert!(record
            .set_text_value(&field("name", FieldMetadataType::FullName), "Ada")
            .is_err());
        assert!(record
            .set_text_value(&field("employees", FieldMetadataType::Number), "many")
            .is_err());
        assert_eq!(record.value("employees"), None);
    }
}
