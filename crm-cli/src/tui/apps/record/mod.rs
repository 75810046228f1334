//! Record editor built on inline cells

mod app;
mod state;
mod view;

pub use app::RecordApp;
pub use state::{InitParams, Msg, State, Status};
