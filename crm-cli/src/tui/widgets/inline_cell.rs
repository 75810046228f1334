//! Record field row that switches between display and edit in place

use std::time::Instant;

use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::metadata::{
    FieldDefinition, FieldMetadataType, assert_field_metadata, is_field_text,
};
use crate::tui::tooltip::{PositionStrategy, Tooltip, TooltipDelay, TooltipPlace};
use crate::tui::widgets::TextInputState;

/// Presentation options of one inline cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineCellProps {
    pub readonly: bool,
    pub icon_label: Option<String>,
    pub label: Option<String>,
    pub label_width: Option<u16>,
    pub show_label: bool,
    /// The cell only exists as an editor; clicking the row does nothing
    pub edit_mode_content_only: bool,
}

/// Identity of the field rendered by a cell
#[derive(Debug, Clone, PartialEq)]
pub struct FieldContext {
    pub record_id: String,
    pub field_definition: FieldDefinition,
}

/// Per-field hover focus, shared by the container and the value display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFocus {
    is_focused: bool,
}

impl FieldFocus {
    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    pub fn set_is_focused(&mut self, is_focused: bool) {
        self.is_focused = is_focused;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
enum InlineCellMode {
    #[default]
    Display,
    Edit {
        draft: String,
        input: TextInputState,
    },
}

/// Display/edit state of one cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineCell {
    mode: InlineCellMode,
}

impl InlineCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_edit_mode(&self) -> bool {
        matches!(self.mode, InlineCellMode::Edit { .. })
    }

    /// Switch to edit mode with the current value as draft
    pub fn open_inline_cell(&mut self, current_value: &str) {
        let mut input = TextInputState::new();
        input.set_cursor_to_end(current_value);
        self.mode = InlineCellMode::Edit {
            draft: current_value.to_string(),
            input,
        };
    }

    pub fn close_inline_cell(&mut self) {
        self.mode = InlineCellMode::Display;
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.mode {
            InlineCellMode::Edit { draft, .. } => Some(draft),
            InlineCellMode::Display => None,
        }
    }

    fn cursor(&self) -> usize {
        match &self.mode {
            InlineCellMode::Edit { input, .. } => input.cursor(),
            InlineCellMode::Display => 0,
        }
    }

    /// Route an editing key to the draft. Ignored outside edit mode.
    pub fn handle_input(&mut self, key: KeyCode) {
        if let InlineCellMode::Edit { draft, input } = &mut self.mode {
            if let Some(value) = input.handle_key(key, draft, None) {
                *draft = value;
            }
        }
    }

    /// Leave edit mode and hand back the draft
    pub fn take_draft(&mut self) -> Option<String> {
        match std::mem::take(&mut self.mode) {
            InlineCellMode::Edit { draft, .. } => Some(draft),
            InlineCellMode::Display => None,
        }
    }
}

/// Label/icon region of a cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellHeader {
    pub label_id: String,
    pub icon: Option<String>,
    /// Label text, present only when labels are shown
    pub label: Option<String>,
    /// Tooltip carrying the label when it is hidden
    pub tooltip: Option<Tooltip>,
}

/// Stable id of a field input inside a record
pub fn get_record_field_input_id(record_id: &str, field_name: &str) -> String {
    format!("{}-{}", record_id, field_name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineCellContainer {
    props: InlineCellProps,
    field: FieldContext,
}

impl InlineCellContainer {
    pub fn new(props: InlineCellProps, field: FieldContext) -> Self {
        if is_field_text(&field.field_definition) {
            assert_field_metadata(FieldMetadataType::Text, is_field_text, &field.field_definition);
        }
        Self { props, field }
    }

    pub fn props(&self) -> &InlineCellProps {
        &self.props
    }

    pub fn field(&self) -> &FieldContext {
        &self.field
    }

    pub fn is_clickable(&self, cell: &InlineCell) -> bool {
        !self.props.readonly && !self.props.edit_mode_content_only && !cell.is_in_edit_mode()
    }

    /// Open the editor if the row is clickable. Returns whether it opened.
    pub fn handle_click(&self, cell: &mut InlineCell, current_value: &str) -> bool {
        if !self.is_clickable(cell) {
            return false;
        }
        cell.open_inline_cell(current_value);
        true
    }

    pub fn handle_mouse_enter(&self, focus: &mut FieldFocus) {
        if !self.props.readonly {
            focus.set_is_focused(true);
        }
    }

    pub fn handle_mouse_leave(&self, focus: &mut FieldFocus) {
        if !self.props.readonly {
            focus.set_is_focused(false);
        }
    }

    pub fn label_id(&self) -> String {
        format!(
            "label-{}",
            get_record_field_input_id(
                &self.field.record_id,
                &self.field.field_definition.metadata.field_name
            )
        )
    }

    pub fn header(&self) -> Option<CellHeader> {
        if self.props.icon_label.is_none() && self.props.label.is_none() {
            return None;
        }

        let label_id = self.label_id();

        let label = if self.props.show_label {
            self.props.label.clone()
        } else {
            None
        };

        let tooltip = if !self.props.show_label && !self.field.field_definition.disable_tooltip {
            Some(Tooltip {
                anchor_id: label_id.clone(),
                content: self.props.label.clone().unwrap_or_default(),
                place: TooltipPlace::Bottom,
                position_strategy: PositionStrategy::Fixed,
                delay: TooltipDelay::ShortDelay,
                clickable: true,
            })
        } else {
            None
        };

        Some(CellHeader {
            label_id,
            icon: self.props.icon_label.clone(),
            label,
            tooltip,
        })
    }

    /// While editing, the cell closes itself when the command menu opens
    pub fn mounts_command_menu_close_effect(&self, cell: &InlineCell) -> bool {
        cell.is_in_edit_mode()
    }

    /// Returns whether the cell was closed
    pub fn on_command_menu_opened(&self, cell: &mut InlineCell) -> bool {
        if self.mounts_command_menu_close_effect(cell) {
            log::debug!("Closing inline cell {} for command menu", self.label_id());
            cell.close_inline_cell();
            true
        } else {
            false
        }
    }
}

/// Cut `text` to `width` columns, ending with an ellipsis when shortened
pub fn truncate_with_ellipsis(text: &str, width: usize) -> (String, bool) {
    if text.width() <= width {
        return (text.to_string(), false);
    }
    if width == 0 {
        return (String::new(), true);
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    (out, true)
}

/// Tooltip to draw after the rest of the frame
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTooltip {
    pub tooltip: Tooltip,
    pub anchor: Rect,
}

/// Everything needed to draw one cell
pub struct InlineCellView<'a> {
    pub container: &'a InlineCellContainer,
    pub cell: &'a InlineCell,
    pub focus: FieldFocus,
    pub value: &'a str,
    /// When the pointer (or keyboard cursor) entered the row
    pub hovered_since: Option<Instant>,
}

/// Render one cell on a single line
///
/// Returns the header area, and a tooltip when one is due.
pub fn render_inline_cell(
    frame: &mut Frame,
    area: Rect,
    view: &InlineCellView,
    now: Instant,
) -> Option<PendingTooltip> {
    let theme = &crate::global_runtime_config().theme;
    let props = view.container.props();
    let hovered = view.hovered_since.is_some();

    let label_color = if props.readonly && hovered {
        theme.text_secondary
    } else {
        theme.text_tertiary
    };

    let mut x = area.x;
    let mut pending = None;

    if let Some(header) = view.container.header() {
        let mut spans = Vec::new();
        if let Some(icon) = &header.icon {
            spans.push(Span::styled(format!("{} ", icon), Style::default().fg(label_color)));
        }

        let mut overflow_tooltip = None;
        if let Some(label) = &header.label {
            let width = props
                .label_width
                .map(|w| w as usize)
                .unwrap_or_else(|| label.width());
            let (text, truncated) = truncate_with_ellipsis(label, width);
            let padding = width.saturating_sub(text.width());
            spans.push(Span::styled(
                format!("{}{}", text, " ".repeat(padding)),
                Style::default().fg(label_color),
            ));
            if truncated {
                overflow_tooltip = Some(Tooltip {
                    anchor_id: header.label_id.clone(),
                    content: label.clone(),
                    place: TooltipPlace::Bottom,
                    position_strategy: PositionStrategy::Fixed,
                    delay: TooltipDelay::ShortDelay,
                    clickable: false,
                });
            }
        }

        let header_width: u16 = spans.iter().map(|s| s.width() as u16).sum();
        let header_area = Rect::new(x, area.y, header_width.min(area.width), 1);
        frame.render_widget(Paragraph::new(Line::from(spans)), header_area);
        x = x.saturating_add(header_area.width + 1);

        if let Some(tooltip) = header.tooltip.or(overflow_tooltip) {
            if tooltip.is_visible(view.hovered_since, now) {
                pending = Some(PendingTooltip {
                    tooltip,
                    anchor: header_area,
                });
            }
        }
    }

    let value_area = Rect::new(x, area.y, area.right().saturating_sub(x), 1);
    if value_area.width == 0 {
        return pending;
    }

    let line = match view.cell.draft() {
        Some(draft) => edit_line(draft, view.cell.cursor()),
        None => display_line(view, hovered),
    };
    frame.render_widget(Paragraph::new(line), value_area);

    pending
}

fn display_line<'a>(view: &InlineCellView, hovered: bool) -> Line<'a> {
    let theme = &crate::global_runtime_config().theme;
    let props = view.container.props();

    let mut spans = if view.value.is_empty() {
        let placeholder = view
            .container
            .field()
            .field_definition
            .metadata
            .placeholder
            .clone()
            .or_else(|| props.label.clone())
            .unwrap_or_else(|| "Empty".to_string());
        vec![Span::styled(
            placeholder,
            Style::default().fg(theme.text_tertiary).add_modifier(Modifier::ITALIC),
        )]
    } else {
        vec![Span::styled(view.value.to_string(), Style::default().fg(theme.text_primary))]
    };

    if props.readonly && hovered {
        // Outline stand-in for read-only hover
        spans = spans
            .into_iter()
            .map(|s| s.patch_style(Style::default().bg(theme.bg_surface).add_modifier(Modifier::UNDERLINED)))
            .collect();
    } else if view.focus.is_focused() {
        spans.push(Span::styled(" ✎", Style::default().fg(theme.accent_primary)));
    }

    Line::from(spans)
}

fn edit_line<'a>(draft: &str, cursor: usize) -> Line<'a> {
    let theme = &crate::global_runtime_config().theme;
    let chars: Vec<char> = draft.chars().collect();
    let cursor = cursor.min(chars.len());

    let before: String = chars[..cursor].iter().collect();
    let at: String = chars.get(cursor).map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
    let after: String = chars.get(cursor + 1..).map(|c| c.iter().collect()).unwrap_or_default();

    let text_style = Style::default().fg(theme.text_primary).bg(theme.bg_surface);
    let cursor_style = Style::default().fg(theme.bg_surface).bg(theme.accent_primary);

    Line::from(vec![
        Span::styled(before, text_style),
        Span::styled(at, cursor_style),
        Span::styled(after, text_style),
    ])
}
