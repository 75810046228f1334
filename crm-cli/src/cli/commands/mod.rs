pub mod config;
pub mod match_columns;
pub mod record;
