//! Dropdown mapping one spreadsheet column to a target field
//!
//! Scalar fields map directly to an option. Composite fields (address, full
//! name, ...) open a second level where one of their sub-fields is picked.
//! Every handler returns `Some(option)` when the column's value changed.

use crossterm::event::KeyCode;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::import::{
    DO_NOT_IMPORT_OPTION_KEY, SelectOption, find_option, get_sub_field_option_key,
};
use crate::metadata::{FieldMetadataItem, is_composite_field_type};
use crate::tui::InteractionRegistry;
use crate::tui::dropdown::{DropdownHandle, DropdownRegistry};
use crate::tui::widgets::TextInputState;

/// Which list the dropdown currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectorView {
    #[default]
    FieldPick,
    /// A composite field was chosen, one of its sub-fields must be picked
    SubFieldPick(FieldMetadataItem),
}

/// Data the selector picks from, owned by the caller
#[derive(Debug, Clone, Copy)]
pub struct SelectContext<'a> {
    pub fields: &'a [FieldMetadataItem],
    pub options: &'a [SelectOption],
    pub suggested_options: &'a [SelectOption],
}

/// One activatable row of the open dropdown
#[derive(Debug, Clone, PartialEq)]
pub enum SelectRow {
    Suggested(SelectOption),
    Field(FieldMetadataItem),
    DoNotImport,
    Cancel,
    Back,
    SubField { name: &'static str, label: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSelectEvent {
    /// Open or close the dropdown
    Toggle,
    /// Up/Down/Enter/Esc while open
    Navigate(KeyCode),
    /// Editing keys for the field search
    Search(KeyCode),
    /// Row clicked
    Activate(usize),
    ClickOutside,
}

#[derive(Debug, Clone)]
pub struct ColumnFieldSelect {
    column_index: usize,
    dropdown: DropdownHandle,
    view: SelectorView,
    highlight: usize,
    search: String,
    search_state: TextInputState,
    notice: Option<String>,
}

/// Label of the dropdown for a column, used in logs
pub fn dropdown_id(column_index: usize) -> String {
    format!("match-column-select-v2-dropdown-{}", column_index)
}

impl ColumnFieldSelect {
    pub fn new(column_index: usize, dropdowns: &mut DropdownRegistry) -> Self {
        Self {
            column_index,
            dropdown: dropdowns.create(dropdown_id(column_index)),
            view: SelectorView::FieldPick,
            highlight: 0,
            search: String::new(),
            search_state: TextInputState::new(),
            notice: None,
        }
    }

    pub fn dropdown(&self) -> DropdownHandle {
        self.dropdown
    }

    pub fn view(&self) -> &SelectorView {
        &self.view
    }

    pub fn highlighted(&self) -> usize {
        self.highlight
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Warning from the last selection that had no matching option
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_open(&self, dropdowns: &DropdownRegistry) -> bool {
        dropdowns.is_open(self.dropdown)
    }

    pub fn open(&mut self, dropdowns: &mut DropdownRegistry) {
        self.reset();
        dropdowns.open(self.dropdown);
    }

    fn reset(&mut self) {
        self.view = SelectorView::FieldPick;
        self.highlight = 0;
        self.search.clear();
        self.search_state = TextInputState::new();
        self.notice = None;
    }

    fn close(&mut self, dropdowns: &mut DropdownRegistry) {
        dropdowns.close(self.dropdown);
    }

    fn report_miss(&mut self, key: &str) {
        log::warn!(
            "{}: no import option matches '{}', selection ignored",
            dropdown_id(self.column_index),
            key
        );
        self.notice = Some(format!("No import option for '{}'", key));
    }

    /// Pick a top-level field
    pub fn select_field(
        &mut self,
        field: &FieldMetadataItem,
        options: &[SelectOption],
        dropdowns: &mut DropdownRegistry,
    ) -> Option<SelectOption> {
        if is_composite_field_type(field.field_type) {
            self.view = SelectorView::SubFieldPick(field.clone());
            self.highlight = 0;
            self.notice = None;
            return None;
        }

        match find_option(options, &field.name) {
            Some(option) => {
                let option = option.clone();
                self.reset();
                self.close(dropdowns);
                Some(option)
            }
            None => {
                self.report_miss(&field.name);
                None
            }
        }
    }

    /// Pick a sub-field of the composite field chosen before
    pub fn select_sub_field(
        &mut self,
        sub_field_name: &str,
        options: &[SelectOption],
        dropdowns: &mut DropdownRegistry,
    ) -> Option<SelectOption> {
        let SelectorView::SubFieldPick(field) = &self.view else {
            return None;
        };

        let key = get_sub_field_option_key(field, sub_field_name);
        match find_option(options, &key) {
            Some(option) => {
                let option = option.clone();
                self.reset();
                self.close(dropdowns);
                Some(option)
            }
            None => {
                self.report_miss(&key);
                None
            }
        }
    }

    pub fn select_suggested_option(
        &mut self,
        option: &SelectOption,
        dropdowns: &mut DropdownRegistry,
    ) -> Option<SelectOption> {
        self.reset();
        self.close(dropdowns);
        Some(option.clone())
    }

    pub fn select_do_not_import(
        &mut self,
        options: &[SelectOption],
        dropdowns: &mut DropdownRegistry,
    ) -> Option<SelectOption> {
        match find_option(options, DO_NOT_IMPORT_OPTION_KEY) {
            Some(option) => {
                let option = option.clone();
                self.reset();
                self.close(dropdowns);
                Some(option)
            }
            None => {
                self.report_miss(DO_NOT_IMPORT_OPTION_KEY);
                None
            }
        }
    }

    /// Leave the sub-field list
    pub fn back(&mut self) {
        self.view = SelectorView::FieldPick;
        self.highlight = 0;
        self.notice = None;
    }

    pub fn click_outside(&mut self, dropdowns: &mut DropdownRegistry) {
        self.reset();
        self.close(dropdowns);
    }

    pub fn cancel(&mut self, dropdowns: &mut DropdownRegistry) {
        self.reset();
        self.close(dropdowns);
    }

    /// Rows of the current view, in display order
    pub fn rows(&self, ctx: &SelectContext) -> Vec<SelectRow> {
        match &self.view {
            SelectorView::SubFieldPick(field) => {
                let mut rows = vec![SelectRow::Back];
                rows.extend(field.field_type.sub_fields().iter().map(|s| SelectRow::SubField {
                    name: s.name,
                    label: s.label,
                }));
                rows
            }
            SelectorView::FieldPick => {
                let mut rows = Vec::new();

                if self.search.is_empty() {
                    rows.extend(ctx.suggested_options.iter().cloned().map(SelectRow::Suggested));
                }

                rows.extend(self.filtered_fields(ctx.fields).into_iter().map(SelectRow::Field));

                if find_option(ctx.options, DO_NOT_IMPORT_OPTION_KEY).is_some() {
                    rows.push(SelectRow::DoNotImport);
                }
                rows.push(SelectRow::Cancel);
                rows
            }
        }
    }

    fn filtered_fields(&self, fields: &[FieldMetadataItem]) -> Vec<FieldMetadataItem> {
        if self.search.is_empty() {
            return fields.to_vec();
        }

        let matcher = SkimMatcherV2::default().ignore_case();
        let mut scored: Vec<(&FieldMetadataItem, i64)> = fields
            .iter()
            .filter_map(|f| matcher.fuzzy_match(&f.label, &self.search).map(|score| (f, score)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(f, _)| f.clone()).collect()
    }

    /// Activate one row of the current view
    pub fn activate(
        &mut self,
        row: &SelectRow,
        ctx: &SelectContext,
        dropdowns: &mut DropdownRegistry,
    ) -> Option<SelectOption> {
        match row {
            SelectRow::Suggested(option) => self.select_suggested_option(option, dropdowns),
            SelectRow::Field(field) => self.select_field(field, ctx.options, dropdowns),
            SelectRow::DoNotImport => self.select_do_not_import(ctx.options, dropdowns),
            SelectRow::Cancel => {
                self.cancel(dropdowns);
                None
            }
            SelectRow::Back => {
                self.back();
                None
            }
            SelectRow::SubField { name, .. } => self.select_sub_field(name, ctx.options, dropdowns),
        }
    }

    pub fn handle_event(
        &mut self,
        event: ColumnSelectEvent,
        ctx: &SelectContext,
        dropdowns: &mut DropdownRegistry,
    ) -> Option<SelectOption> {
        match event {
            ColumnSelectEvent::Toggle => {
                if self.is_open(dropdowns) {
                    self.cancel(dropdowns);
                } else {
                    self.open(dropdowns);
                }
                None
            }
            ColumnSelectEvent::Navigate(key) => self.handle_navigate_key(key, ctx, dropdowns),
            ColumnSelectEvent::Search(key) => {
                if matches!(self.view, SelectorView::FieldPick) {
                    if let Some(value) = self.search_state.handle_key(key, &self.search, Some(64)) {
                        self.search = value;
                        self.highlight = 0;
                    }
                }
                None
            }
            ColumnSelectEvent::Activate(idx) => {
                let row = self.rows(ctx).get(idx).cloned()?;
                self.highlight = idx;
                self.activate(&row, ctx, dropdowns)
            }
            ColumnSelectEvent::ClickOutside => {
                self.click_outside(dropdowns);
                None
            }
        }
    }

    fn handle_navigate_key(
        &mut self,
        key: KeyCode,
        ctx: &SelectContext,
        dropdowns: &mut DropdownRegistry,
    ) -> Option<SelectOption> {
        if !self.is_open(dropdowns) {
            if matches!(key, KeyCode::Enter | KeyCode::Char(' ')) {
                self.open(dropdowns);
            }
            return None;
        }

        let row_count = self.rows(ctx).len();
        match key {
            KeyCode::Up => {
                self.highlight = self.highlight.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                if self.highlight + 1 < row_count {
                    self.highlight += 1;
                }
                None
            }
            KeyCode::Enter => {
                let row = self.rows(ctx).get(self.highlight).cloned()?;
                self.activate(&row, ctx, dropdowns)
            }
            KeyCode::Esc | KeyCode::Left => {
                match self.view {
                    SelectorView::SubFieldPick(_) => self.back(),
                    SelectorView::FieldPick if key == KeyCode::Esc => self.cancel(dropdowns),
                    SelectorView::FieldPick => {}
                }
                None
            }
            _ => None,
        }
    }
}

/// Render the closed trigger: value (or placeholder) with a chevron
pub fn render_trigger(
    frame: &mut Frame,
    area: Rect,
    value: Option<&SelectOption>,
    placeholder: Option<&str>,
    is_focused: bool,
    is_open: bool,
) {
    let theme = &crate::global_runtime_config().theme;

    let (icon, text, text_style) = match value {
        Some(option) => (
            option.icon.clone(),
            option.label.clone(),
            Style::default().fg(theme.text_primary),
        ),
        None => (
            None,
            placeholder.unwrap_or("").to_string(),
            Style::default().fg(theme.text_tertiary).add_modifier(Modifier::ITALIC),
        ),
    };

    let mut spans = vec![Span::raw(" ")];
    if let Some(icon) = icon {
        spans.push(Span::styled(format!("{} ", icon), Style::default().fg(theme.accent_secondary)));
    }
    spans.push(Span::styled(text, text_style));

    let chevron = if is_open { "▴" } else { "▾" };
    let used: usize = spans.iter().map(|s| s.width()).sum();
    let padding = (area.width as usize).saturating_sub(used + 2);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(chevron, Style::default().fg(theme.text_secondary)));

    let style = if is_focused {
        Style::default().bg(theme.bg_surface)
    } else {
        Style::default()
    };

    frame.render_widget(Paragraph::new(Line::from(spans)).style(style), area);
}

/// Render the open dropdown below `anchor` and register its mouse targets
pub fn render_dropdown<Msg: Clone>(
    frame: &mut Frame,
    select: &ColumnFieldSelect,
    anchor: Rect,
    ctx: &SelectContext,
    registry: &mut InteractionRegistry<Msg>,
    to_msg: impl Fn(ColumnSelectEvent) -> Msg,
) {
    let theme = &crate::global_runtime_config().theme;
    let bounds = frame.area();
    let rows = select.rows(ctx);

    let header = match select.view() {
        SelectorView::FieldPick => {
            if select.search().is_empty() {
                Line::from(Span::styled(" Search fields…", Style::default().fg(theme.text_tertiary)))
            } else {
                Line::from(Span::styled(
                    format!(" / {}", select.search()),
                    Style::default().fg(theme.text_primary),
                ))
            }
        }
        SelectorView::SubFieldPick(field) => Line::from(Span::styled(
            format!(" {}", field.label),
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        )),
    };

    // header + rows + optional notice, inside borders
    let notice_lines = usize::from(select.notice().is_some());
    let wanted = (rows.len() + 1 + notice_lines + 2) as u16;
    let space_below = bounds.bottom().saturating_sub(anchor.bottom());
    let height = wanted.min(space_below.max(4));
    let width = anchor.width.max(32).min(bounds.width);
    let x = anchor.x.min(bounds.right().saturating_sub(width));
    let area = Rect::new(x, anchor.bottom().min(bounds.bottom().saturating_sub(height)), width, height);

    let visible_rows = (height as usize).saturating_sub(3 + notice_lines);
    let offset = select
        .highlighted()
        .saturating_sub(visible_rows.saturating_sub(1));

    let mut lines = vec![header];
    let mut in_suggested = false;
    for (idx, row) in rows.iter().enumerate().skip(offset).take(visible_rows) {
        let highlighted = idx == select.highlighted();
        let base = if highlighted {
            Style::default().bg(theme.bg_surface).fg(theme.text_primary)
        } else {
            Style::default().fg(theme.text_secondary)
        };

        let text = match row {
            SelectRow::Suggested(option) => {
                in_suggested = true;
                format!(" ★ {}", option.label)
            }
            SelectRow::Field(field) => {
                let marker = if is_composite_field_type(field.field_type) { " ›" } else { "" };
                let icon = field.icon.as_deref().unwrap_or("·");
                format!(" {} {}{}", icon, field.label, marker)
            }
            SelectRow::DoNotImport => " ⊘ Do not import".to_string(),
            SelectRow::Cancel => " ✕ Cancel".to_string(),
            SelectRow::Back => " ‹ Back".to_string(),
            SelectRow::SubField { label, .. } => format!("   {}", label),
        };

        let style = match row {
            SelectRow::Suggested(_) => base.fg(theme.accent_success),
            SelectRow::DoNotImport | SelectRow::Cancel => base.fg(theme.text_tertiary),
            _ => base,
        };
        lines.push(Line::from(Span::styled(text, style)));

        let row_area = Rect::new(area.x + 1, area.y + 1 + (lines.len() as u16 - 1), area.width.saturating_sub(2), 1);
        registry.register_click(row_area, to_msg(ColumnSelectEvent::Activate(idx)));
    }

    if let Some(notice) = select.notice() {
        lines.push(Line::from(Span::styled(
            format!(" ! {}", notice),
            Style::default().fg(theme.accent_warning),
        )));
    }

    let title = if in_suggested { " Suggested first " } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(theme.accent_primary));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);

    registry.register_click_outside(area, to_msg(ColumnSelectEvent::ClickOutside));
}
