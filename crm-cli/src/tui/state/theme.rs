use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Palette selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Mocha,
    Latte,
}

/// Terminal color palette used by all widgets
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_tertiary: Color,
    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub accent_error: Color,
    pub accent_success: Color,
    pub accent_warning: Color,
    pub border_primary: Color,
    pub border_secondary: Color,
    pub bg_surface: Color,
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Mocha => Self {
                text_primary: Color::Rgb(205, 214, 244),
                text_secondary: Color::Rgb(186, 194, 222),
                text_tertiary: Color::Rgb(127, 132, 156),
                accent_primary: Color::Rgb(137, 180, 250),
                accent_secondary: Color::Rgb(203, 166, 247),
                accent_error: Color::Rgb(243, 139, 168),
                accent_success: Color::Rgb(166, 227, 161),
                accent_warning: Color::Rgb(249, 226, 175),
                border_primary: Color::Rgb(88, 91, 112),
                border_secondary: Color::Rgb(69, 71, 90),
                bg_surface: Color::Rgb(49, 50, 68),
            },
            ThemeVariant::Latte => Self {
                text_primary: Color::Rgb(76, 79, 105),
                text_secondary: Color::Rgb(92, 95, 119),
                text_tertiary: Color::Rgb(140, 143, 161),
                accent_primary: Color::Rgb(30, 102, 245),
                accent_secondary: Color::Rgb(136, 57, 239),
                accent_error: Color::Rgb(210, 15, 57),
                accent_success: Color::Rgb(64, 160, 43),
                accent_warning: Color::Rgb(223, 142, 29),
                border_primary: Color::Rgb(172, 176, 190),
                border_secondary: Color::Rgb(188, 192, 204),
                bg_surface: Color::Rgb(204, 208, 218),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}
