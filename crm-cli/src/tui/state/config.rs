use super::theme::Theme;
use crate::config::Config;

/// UI settings shared by every widget renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub theme: Theme,
    pub label_width: u16,
    pub show_labels: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RuntimeConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            theme: Theme::new(config.ui.theme),
            label_width: config.ui.label_width,
            show_labels: config.ui.show_labels,
        }
    }
}
