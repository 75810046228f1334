pub mod match_columns;
pub mod record;

pub use match_columns::MatchColumnsApp;
pub use record::RecordApp;
