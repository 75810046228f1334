//! Column → target field assignments for one import

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::columns::ImportedColumn;
use super::options::SelectOption;

/// A spreadsheet column and the option it is currently mapped to
#[derive(Debug, Clone)]
pub struct ColumnMatch {
    pub column: ImportedColumn,
    pub value: Option<SelectOption>,
}

/// Assignments for every column of the spreadsheet
#[derive(Debug, Clone, Default)]
pub struct ColumnMatches {
    matches: Vec<ColumnMatch>,
}

impl ColumnMatches {
    pub fn new(columns: Vec<ImportedColumn>) -> Self {
        Self {
            matches: columns
                .into_iter()
                .map(|column| ColumnMatch {
                    column,
                    value: None,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&ColumnMatch> {
        self.matches.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnMatch> {
        self.matches.iter()
    }

    /// Assign (or clear) the target of a column
    ///
    /// A target can only be used by one column, assigning it here unassigns it
    /// elsewhere. The do-not-import sentinel may be used by any number of
    /// columns.
    pub fn set_value(&mut self, idx: usize, value: Option<SelectOption>) {
        if idx >= self.matches.len() {
            return;
        }

        if let Some(option) = &value {
            if !option.is_do_not_import() {
                for (other_idx, other) in self.matches.iter_mut().enumerate() {
                    if other_idx != idx
                        && other.value.as_ref().map(|v| &v.value) == Some(&option.value)
                    {
                        log::info!(
                            "Unassigning '{}' from column '{}'",
                            option.value,
                            other.column.header
                        );
                        other.value = None;
                    }
                }
            }
        }

        self.matches[idx].value = value;
    }

    /// Pre-assign columns whose header equals an option label or value
    /// (case-insensitive). Returns how many columns were matched.
    pub fn auto_match(&mut self, options: &[SelectOption]) -> usize {
        let mut matched = 0;

        for idx in 0..self.matches.len() {
            if self.matches[idx].value.is_some() {
                continue;
            }

            let header = self.matches[idx].column.header.to_lowercase();
            if header.is_empty() {
                continue;
            }

            let candidate = options.iter().find(|option| {
                !option.is_do_not_import()
                    && (option.label.to_lowercase() == header
                        || option.value.to_lowercase() == header)
            });

            if let Some(option) = candidate {
                let already_used = self
                    .matches
                    .iter()
                    .any(|m| m.value.as_ref().map(|v| &v.value) == Some(&option.value));
                if !already_used {
                    self.matches[idx].value = Some(option.clone());
                    matched += 1;
                }
            }
        }

        matched
    }

    /// Columns with no assignment at all
    pub fn unmatched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.value.is_none()).count()
    }

    pub fn to_mapping(&self, object: &str) -> ImportMapping {
        ImportMapping {
            object: object.to_string(),
            columns: self
                .matches
                .iter()
                .map(|m| MappedColumn {
                    index: m.column.index,
                    header: m.column.header.clone(),
                    target: m
                        .value
                        .as_ref()
                        .filter(|v| !v.is_do_not_import())
                        .map(|v| v.value.clone()),
                    skipped: m.value.as_ref().is_some_and(|v| v.is_do_not_import()),
                })
                .collect(),
        }
    }
}

/// Serialized result of column matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportMapping {
    pub object: String,
    pub columns: Vec<MappedColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedColumn {
    pub index: usize,
    pub header: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub skipped: bool,
}

impl ImportMapping {
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize mapping")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write mapping file: {}", path.display()))?;
        log::info!("Wrote mapping for '{}' to {}", self.object, path.display());
        Ok(())
    }
}
