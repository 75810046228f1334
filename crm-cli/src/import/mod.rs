//! Spreadsheet import: columns, mapping targets and column matches

pub mod columns;
pub mod matching;
pub mod options;
pub mod suggest;

pub use columns::{ImportedColumn, read_columns};
pub use matching::{ColumnMatch, ColumnMatches, ImportMapping, MappedColumn};
pub use options::{
    DO_NOT_IMPORT_OPTION_KEY, SelectOption, build_options, find_option, get_sub_field_option_key,
};
pub use suggest::suggest_options;
