pub mod app;
pub mod apps;
pub mod command;
pub mod dropdown;
pub mod interaction;
pub mod runtime;
pub mod state;
pub mod tooltip;
pub mod widgets;

pub use app::App;
pub use command::Command;
pub use dropdown::{DropdownHandle, DropdownRegistry};
pub use interaction::InteractionRegistry;
pub use runtime::AppRuntime;
pub use state::{RuntimeConfig, Theme, ThemeVariant};
