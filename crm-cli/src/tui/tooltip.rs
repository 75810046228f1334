//! Hover tooltips anchored to a rendered element

use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipDelay {
    ShortDelay,
}

impl TooltipDelay {
    pub fn duration(&self) -> Duration {
        match self {
            TooltipDelay::ShortDelay => Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPlace {
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionStrategy {
    /// Placed relative to the whole frame, never clipped by the container
    Fixed,
}

/// Tooltip description attached to an anchor element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub anchor_id: String,
    pub content: String,
    pub place: TooltipPlace,
    pub position_strategy: PositionStrategy,
    pub delay: TooltipDelay,
    /// Stays open while the pointer moves onto it. The host registers the
    /// area returned by [`render_tooltip`] under the anchor's hover key.
    pub clickable: bool,
}

impl Tooltip {
    /// Whether the anchor has been hovered long enough to show the tooltip
    pub fn is_visible(&self, hovered_since: Option<Instant>, now: Instant) -> bool {
        match hovered_since {
            Some(since) => now.saturating_duration_since(since) >= self.delay.duration(),
            None => false,
        }
    }

    /// Area occupied by the tooltip for an anchor, clamped to `bounds`
    pub fn area(&self, anchor: Rect, bounds: Rect) -> Rect {
        let width = (self.content.width() as u16 + 4).min(bounds.width);
        let height = 3u16.min(bounds.height);

        let y = match self.place {
            TooltipPlace::Bottom => anchor.bottom(),
        };
        let y = y.min(bounds.bottom().saturating_sub(height)).max(bounds.y);
        let x = anchor
            .x
            .min(bounds.right().saturating_sub(width))
            .max(bounds.x);

        Rect::new(x, y, width, height)
    }
}

/// Render a tooltip above everything else. Returns the area it covers.
pub fn render_tooltip(frame: &mut Frame, tooltip: &Tooltip, anchor: Rect) -> Rect {
    let theme = &crate::global_runtime_config().theme;

    let bounds = match tooltip.position_strategy {
        PositionStrategy::Fixed => frame.area(),
    };
    let area = tooltip.area(anchor, bounds);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_primary))
        .style(Style::default().bg(theme.bg_surface));

    let line = Line::from(vec![Span::styled(
        format!(" {}", tooltip.content),
        Style::default().fg(theme.text_primary),
    )]);

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(line).block(block), area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tooltip() -> Tooltip {
        Tooltip {
            anchor_id: "label-1-name".into(),
            content: "Name".into(),
            place: TooltipPlace::Bottom,
            position_strategy: PositionStrategy::Fixed,
            delay: TooltipDelay::ShortDelay,
            clickable: true,
        }
    }

    #[test]
    fn test_visibility_respects_delay() {
        let t = tooltip();
        let start = Instant::now();

        assert!(!t.is_visible(None, start));
        assert!(!t.is_visible(Some(start), start + Duration::from_millis(100)));
        assert!(t.is_visible(Some(start), start + Duration::from_millis(300)));
    }

    #[test]
    fn test_area_below_anchor() {
        let t = tooltip();
        let area = t.area(Rect::new(2, 4, 10, 1), Rect::new(0, 0, 80, 24));
        assert_eq!(area, Rect::new(2, 5, 8, 3));
    }

    #[test]
    fn test_area_clamped_to_bounds() {
        let t = tooltip();
        let area = t.area(Rect::new(78, 23, 2, 1), Rect::new(0, 0, 80, 24));
        assert_eq!(area, Rect::new(72, 21, 8, 3));
    }

    #[test]
    fn test_render_returns_drawn_area() {
        use ratatui::{Terminal, backend::TestBackend};

        let t = tooltip();
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        let mut drawn = Rect::default();
        terminal
            .draw(|frame| drawn = render_tooltip(frame, &t, Rect::new(1, 1, 4, 1)))
            .unwrap();

        assert_eq!(drawn, t.area(Rect::new(1, 1, 4, 1), Rect::new(0, 0, 20, 6)));
    }
}
