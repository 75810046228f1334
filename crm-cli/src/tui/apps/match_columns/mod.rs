//! Spreadsheet column → field matching screen

mod app;
mod state;
mod view;

pub use app::MatchColumnsApp;
pub use state::{InitParams, Msg, State};
