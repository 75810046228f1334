//! CRM field metadata models

use serde::{Deserialize, Serialize};

/// Metadata for one CRM object (e.g. "person", "company")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub object: String,
    #[serde(default)]
    pub fields: Vec<FieldMetadataItem>,
}

impl ObjectMetadata {
    /// Active fields in declaration order
    pub fn active_fields(&self) -> Vec<FieldMetadataItem> {
        self.fields.iter().filter(|f| f.is_active).cloned().collect()
    }

    /// Active fields that can receive spreadsheet data
    pub fn importable_fields(&self) -> Vec<FieldMetadataItem> {
        self.fields
            .iter()
            .filter(|f| f.is_active && f.field_type.is_importable())
            .cloned()
            .collect()
    }
}

/// Field metadata as described by the CRM schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadataItem {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldMetadataType,
    /// Glyph shown next to the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub disable_tooltip: bool,
}

fn default_true() -> bool {
    true
}

/// Field data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldMetadataType {
    Text,
    Number,
    Numeric,
    Boolean,
    Date,
    DateTime,
    Select,
    MultiSelect,
    Rating,
    Uuid,
    Relation,
    RawJson,
    Array,
    // Composite types
    FullName,
    Address,
    Currency,
    Emails,
    Links,
    Phones,
    RichTextV2,
    Actor,
    #[serde(other)]
    Unknown,
}

/// Named part of a composite field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubField {
    pub name: &'static str,
    pub label: &'static str,
}

const fn sub(name: &'static str, label: &'static str) -> SubField {
    SubField { name, label }
}

const FULL_NAME_SUB_FIELDS: &[SubField] =
    &[sub("firstName", "First Name"), sub("lastName", "Last Name")];

const ADDRESS_SUB_FIELDS: &[SubField] = &[
    sub("addressStreet1", "Address 1"),
    sub("addressStreet2", "Address 2"),
    sub("addressCity", "City"),
    sub("addressState", "State"),
    sub("addressPostcode", "Post Code"),
    sub("addressCountry", "Country"),
];

const CURRENCY_SUB_FIELDS: &[SubField] = &[
    sub("amountMicros", "Amount"),
    sub("currencyCode", "Currency"),
];

const EMAILS_SUB_FIELDS: &[SubField] = &[
    sub("primaryEmail", "Primary Email"),
    sub("additionalEmails", "Additional Emails"),
];

const LINKS_SUB_FIELDS: &[SubField] = &[
    sub("primaryLinkUrl", "Link URL"),
    sub("primaryLinkLabel", "Link Label"),
    sub("secondaryLinks", "Secondary Links"),
];

const PHONES_SUB_FIELDS: &[SubField] = &[
    sub("primaryPhoneNumber", "Primary Phone Number"),
    sub("primaryPhoneCountryCode", "Primary Phone Country Code"),
    sub("primaryPhoneCallingCode", "Primary Phone Calling Code"),
    sub("additionalPhones", "Additional Phones"),
];

const RICH_TEXT_SUB_FIELDS: &[SubField] =
    &[sub("blocknote", "BlockNote"), sub("markdown", "Markdown")];

const ACTOR_SUB_FIELDS: &[SubField] = &[
    sub("source", "Source"),
    sub("workspaceMemberId", "Workspace Member"),
    sub("name", "Name"),
];

impl FieldMetadataType {
    /// Sub-fields of a composite type, empty for scalar types
    pub fn sub_fields(&self) -> &'static [SubField] {
        match self {
            FieldMetadataType::FullName => FULL_NAME_SUB_FIELDS,
            FieldMetadataType::Address => ADDRESS_SUB_FIELDS,
            FieldMetadataType::Currency => CURRENCY_SUB_FIELDS,
            FieldMetadataType::Emails => EMAILS_SUB_FIELDS,
            FieldMetadataType::Links => LINKS_SUB_FIELDS,
            FieldMetadataType::Phones => PHONES_SUB_FIELDS,
            FieldMetadataType::RichTextV2 => RICH_TEXT_SUB_FIELDS,
            FieldMetadataType::Actor => ACTOR_SUB_FIELDS,
            _ => &[],
        }
    }

    pub fn sub_field(&self, name: &str) -> Option<SubField> {
        self.sub_fields().iter().find(|s| s.name == name).copied()
    }

    /// Actor is system-managed and relations are linked after import
    pub fn is_importable(&self) -> bool {
        !matches!(
            self,
            FieldMetadataType::Actor | FieldMetadataType::Relation | FieldMetadataType::Unknown
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FieldMetadataType::Text => "Text",
            FieldMetadataType::Number => "Number",
            FieldMetadataType::Numeric => "Numeric",
            FieldMetadataType::Boolean => "Boolean",
            FieldMetadataType::Date => "Date",
            FieldMetadataType::DateTime => "Date and Time",
            FieldMetadataType::Select => "Select",
            FieldMetadataType::MultiSelect => "Multi-select",
            FieldMetadataType::Rating => "Rating",
            FieldMetadataType::Uuid => "UUID",
            FieldMetadataType::Relation => "Relation",
            FieldMetadataType::RawJson => "JSON",
            FieldMetadataType::Array => "Array",
            FieldMetadataType::FullName => "Full Name",
            FieldMetadataType::Address => "Address",
            FieldMetadataType::Currency => "Currency",
            FieldMetadataType::Emails => "Emails",
            FieldMetadataType::Links => "Links",
            FieldMetadataType::Phones => "Phones",
            FieldMetadataType::RichTextV2 => "Rich Text",
            FieldMetadataType::Actor => "Actor",
            FieldMetadataType::Unknown => "Unknown",
        }
    }
}

/// Whether values of this type decompose into named sub-fields
pub fn is_composite_field_type(field_type: FieldMetadataType) -> bool {
    !field_type.sub_fields().is_empty()
}

/// Per-type metadata attached to a field definition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMetadata {
    pub field_name: String,
    pub placeholder: Option<String>,
}

/// The view of a field used when rendering it inside a record
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub label: String,
    pub icon_name: Option<String>,
    pub field_type: FieldMetadataType,
    pub metadata: FieldMetadata,
    pub disable_tooltip: bool,
}

impl FieldDefinition {
    pub fn from_metadata_item(item: &FieldMetadataItem) -> Self {
        Self {
            label: item.label.clone(),
            icon_name: item.icon.clone(),
            field_type: item.field_type,
            metadata: FieldMetadata {
                field_name: item.name.clone(),
                placeholder: None,
            },
            disable_tooltip: item.disable_tooltip,
        }
    }
}

pub fn is_field_text(definition: &FieldDefinition) -> bool {
    definition.field_type == FieldMetadataType::Text
}

/// Debug-only check that a definition's metadata matches the declared type
pub fn assert_field_metadata(
    expected: FieldMetadataType,
    guard: fn(&FieldDefinition) -> bool,
    definition: &FieldDefinition,
) {
    debug_assert!(
        definition.field_type == expected && guard(definition),
        "field '{}' declared as {:?} but metadata does not match",
        definition.metadata.field_name,
        expected
    );
    debug_assert!(
        !definition.metadata.field_name.is_empty(),
        "field definition for '{}' has no field name",
        definition.label
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_types_have_sub_fields() {
        assert!(is_composite_field_type(FieldMetadataType::Address));
        assert!(is_composite_field_type(FieldMetadataType::FullName));
        assert!(!is_composite_field_type(FieldMetadataType::Text));
        assert!(!is_composite_field_type(FieldMetadataType::Number));
        assert_eq!(FieldMetadataType::FullName.sub_fields().len(), 2);
    }

    #[test]
    fn test_sub_field_lookup() {
        let city = FieldMetadataType::Address.sub_field("addressCity").unwrap();
        assert_eq!(city.label, "City");
        assert!(FieldMetadataType::Address.sub_field("street").is_none());
        assert!(FieldMetadataType::Text.sub_field("addressCity").is_none());
    }

    #[test]
    fn test_parse_metadata_json() {
        let json = r#"{
            "object": "person",
            "fields": [
                {"name": "name", "label": "Name", "type": "FULL_NAME", "icon": "@"},
                {"name": "jobTitle", "label": "Job Title", "type": "TEXT", "disableTooltip": true},
                {"name": "legacy", "label": "Legacy", "type": "TS_VECTOR", "isActive": false}
            ]
        }"#;

        let metadata: ObjectMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.fields.len(), 3);
        assert_eq!(metadata.fields[0].field_type, FieldMetadataType::FullName);
        assert!(metadata.fields[0].is_active);
        assert!(metadata.fields[1].disable_tooltip);
        assert_eq!(metadata.fields[2].field_type, FieldMetadataType::Unknown);
        assert_eq!(metadata.active_fields().len(), 2);
        assert_eq!(metadata.importable_fields().len(), 2);
    }

    #[test]
    fn test_definition_from_item() {
        let item = FieldMetadataItem {
            name: "jobTitle".into(),
            label: "Job Title".into(),
            field_type: FieldMetadataType::Text,
            icon: None,
            is_active: true,
            is_read_only: false,
            disable_tooltip: false,
        };
        let definition = FieldDefinition::from_metadata_item(&item);
        assert_eq!(definition.metadata.field_name, "jobTitle");
        assert!(is_field_text(&definition));
        assert_field_metadata(FieldMetadataType::Text, is_field_text, &definition);
    }
}
