//! CRM object metadata: field definitions and composite sub-fields

pub mod models;

pub use models::{
    FieldDefinition, FieldMetadata, FieldMetadataItem, FieldMetadataType, ObjectMetadata,
    assert_field_metadata, is_composite_field_type, is_field_text,
};

use anyhow::{Context, Result};
use std::path::Path;

/// Load object metadata from a JSON file
pub fn load_object_metadata(path: &Path) -> Result<ObjectMetadata> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata file: {}", path.display()))?;

    let metadata: ObjectMetadata = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse metadata file: {}", path.display()))?;

    log::info!(
        "Loaded metadata for '{}' with {} fields",
        metadata.object,
        metadata.fields.len()
    );

    Ok(metadata)
}
