use ratatui::layout::{Position, Rect};

/// Hover region with its enter/leave messages
#[derive(Debug, Clone)]
pub struct HoverRegion<Msg> {
    pub key: String,
    pub rect: Rect,
    pub on_enter: Msg,
    pub on_leave: Msg,
}

/// Mouse targets collected while rendering a frame
///
/// Rebuilt on every draw. Later registrations sit on top of earlier ones.
#[derive(Debug)]
pub struct InteractionRegistry<Msg> {
    clicks: Vec<(Rect, Msg)>,
    hovers: Vec<HoverRegion<Msg>>,
    outside: Option<(Rect, Msg)>,
}

impl<Msg> Default for InteractionRegistry<Msg> {
    fn default() -> Self {
        Self {
            clicks: Vec::new(),
            hovers: Vec::new(),
            outside: None,
        }
    }
}

impl<Msg: Clone> InteractionRegistry<Msg> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.clicks.clear();
        self.hovers.clear();
        self.outside = None;
    }

    pub fn register_click(&mut self, rect: Rect, msg: Msg) {
        self.clicks.push((rect, msg));
    }

    pub fn register_hover(&mut self, key: impl Into<String>, rect: Rect, on_enter: Msg, on_leave: Msg) {
        self.hovers.push(HoverRegion {
            key: key.into(),
            rect,
            on_enter,
            on_leave,
        });
    }

    /// Register an overlay: clicks outside `rect` dispatch `msg` and are not
    /// delivered to anything underneath
    pub fn register_click_outside(&mut self, rect: Rect, msg: Msg) {
        self.outside = Some((rect, msg));
    }

    /// Message for a click at the given cell
    pub fn click_at(&self, column: u16, row: u16) -> Option<Msg> {
        let position = Position::new(column, row);

        if let Some((rect, msg)) = &self.outside {
            if !rect.contains(position) {
                return Some(msg.clone());
            }
        }

        self.clicks
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, msg)| msg.clone())
    }

    pub fn hover_at(&self, column: u16, row: u16) -> Option<&HoverRegion<Msg>> {
        let position = Position::new(column, row);
        self.hovers.iter().rev().find(|h| h.rect.contains(position))
    }
}
