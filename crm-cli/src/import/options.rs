//! Selectable mapping targets for spreadsheet columns

use serde::{Deserialize, Serialize};

use crate::metadata::{FieldMetadataItem, is_composite_field_type};

/// Sentinel option value meaning "skip this column"
pub const DO_NOT_IMPORT_OPTION_KEY: &str = "do-not-import";

/// One selectable mapping target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    pub fn is_do_not_import(&self) -> bool {
        self.value == DO_NOT_IMPORT_OPTION_KEY
    }
}

/// Option key for one sub-field of a composite field, e.g. "City (address)"
///
/// Unknown sub-field names fall back to the raw name as label so the key stays
/// deterministic.
pub fn get_sub_field_option_key(field: &FieldMetadataItem, sub_field_name: &str) -> String {
    let sub_field_label = field
        .field_type
        .sub_field(sub_field_name)
        .map(|s| s.label)
        .unwrap_or(sub_field_name);

    format!("{} ({})", sub_field_label, field.name)
}

pub fn do_not_import_option() -> SelectOption {
    SelectOption::new(DO_NOT_IMPORT_OPTION_KEY, "Do not import").with_icon(Some("⊘".to_string()))
}

/// Build the full option list for the given fields
///
/// Scalar fields yield one option keyed by field name, composite fields yield
/// one option per sub-field. The do-not-import sentinel is appended last.
pub fn build_options(fields: &[FieldMetadataItem]) -> Vec<SelectOption> {
    let mut options = Vec::new();

    for field in fields {
        if is_composite_field_type(field.field_type) {
            for sub_field in field.field_type.sub_fields() {
                options.push(
                    SelectOption::new(
                        get_sub_field_option_key(field, sub_field.name),
                        format!("{} / {}", field.label, sub_field.label),
                    )
                    .with_icon(field.icon.clone()),
                );
            }
        } else {
            options.push(
                SelectOption::new(field.name.clone(), field.label.clone())
                    .with_icon(field.icon.clone()),
            );
        }
    }

    options.push(do_not_import_option());
    options
}

/// Exact lookup on option value
pub fn find_option<'a>(options: &'a [SelectOption], value: &str) -> Option<&'a SelectOption> {
    options.iter().find(|option| option.value == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FieldMetadataType;

    fn field(name: &str, label: &str, field_type: FieldMetadataType) -> FieldMetadataItem {
        FieldMetadataItem {
            name: name.into(),
            label: label.into(),
            field_type,
            icon: None,
            is_active: true,
            is_read_only: false,
            disable_tooltip: false,
        }
    }

    #[test]
    fn test_sub_field_option_key() {
        let address = field("address", "Address", FieldMetadataType::Address);
        assert_eq!(
            get_sub_field_option_key(&address, "addressCity"),
            "City (address)"
        );
        assert_eq!(
            get_sub_field_option_key(&address, "unknownPart"),
            "unknownPart (address)"
        );
    }

    #[test]
    fn test_build_options() {
        let fields = vec![
            field("email", "Email", FieldMetadataType::Text),
            field("name", "Name", FieldMetadataType::FullName),
        ];

        let options = build_options(&fields);
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();

        assert_eq!(
            values,
            vec![
                "email",
                "First Name (name)",
                "Last Name (name)",
                DO_NOT_IMPORT_OPTION_KEY
            ]
        );
        assert_eq!(options[1].label, "Name / First Name");
        assert!(options.last().unwrap().is_do_not_import());
    }

    #[test]
    fn test_find_option_is_exact() {
        let options = vec![SelectOption::new("email", "Email")];
        assert!(find_option(&options, "email").is_some());
        assert!(find_option(&options, "Email").is_none());
        assert!(find_option(&options, "emails").is_none());
    }
}
