use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::state::{Msg, State};
use crate::tui::InteractionRegistry;
use crate::tui::widgets::ColumnSelectEvent;
use crate::tui::widgets::column_field_select::{render_dropdown, render_trigger};
use crate::tui::widgets::inline_cell::truncate_with_ellipsis;

const HEADER_WIDTH: usize = 24;
const SAMPLES_WIDTH: usize = 30;

pub fn render(state: &State, frame: &mut Frame, registry: &mut InteractionRegistry<Msg>) {
    let theme = &crate::global_runtime_config().theme;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(2)])
        .split(frame.area());

    let unmatched = state.matches.unmatched_count();
    let title = Line::from(vec![
        Span::styled(
            format!(" Match columns → {}", state.object),
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   {} of {} unmatched", unmatched, state.matches.len()),
            Style::default().fg(if unmatched == 0 {
                theme.accent_success
            } else {
                theme.text_tertiary
            }),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let list = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.border_secondary));
    let list_area = list.inner(chunks[1]);
    frame.render_widget(list, chunks[1]);

    let open = state.open_selector();
    let visible = list_area.height as usize;
    let offset = state.cursor.saturating_sub(visible.saturating_sub(1));
    let mut open_anchor = None;

    for (row, (idx, column_match)) in state.matches.iter().enumerate().skip(offset).take(visible).enumerate() {
        let area = Rect::new(list_area.x, list_area.y + row as u16, list_area.width, 1);
        let is_cursor = idx == state.cursor;

        let (header, _) = truncate_with_ellipsis(&column_match.column.header, HEADER_WIDTH);
        let (samples, _) = truncate_with_ellipsis(&column_match.column.samples.join(", "), SAMPLES_WIDTH);

        let marker = if is_cursor { "›" } else { " " };
        let header_style = if is_cursor {
            Style::default().fg(theme.text_primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_secondary)
        };
        let spans = vec![
            Span::styled(format!("{} ", marker), Style::default().fg(theme.accent_primary)),
            Span::styled(format!("{:<width$} ", header, width = HEADER_WIDTH), header_style),
            Span::styled(
                format!("{:<width$} ", samples, width = SAMPLES_WIDTH),
                Style::default().fg(theme.text_tertiary),
            ),
        ];
        let label_width: u16 = spans.iter().map(|s| s.width() as u16).sum();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        registry.register_click(area, Msg::FocusColumn(idx));

        let trigger = Rect::new(
            area.x + label_width.min(area.width),
            area.y,
            area.width.saturating_sub(label_width),
            1,
        );
        let is_open = open == Some(idx);
        render_trigger(
            frame,
            trigger,
            column_match.value.as_ref(),
            Some("Select column..."),
            is_cursor,
            is_open,
        );
        registry.register_click(trigger, Msg::Select(idx, ColumnSelectEvent::Toggle));

        if is_open {
            open_anchor = Some(trigger);
        }
    }

    render_footer(state, frame, chunks[2]);

    // Overlay last so it sits above the rows, mouse targets included
    if let (Some(idx), Some(anchor)) = (open, open_anchor) {
        let ctx = state.context(idx);
        render_dropdown(frame, &state.selectors[idx], anchor, &ctx, registry, move |event| {
            Msg::Select(idx, event)
        });
    }
}

fn render_footer(state: &State, frame: &mut Frame, area: Rect) {
    let theme = &crate::global_runtime_config().theme;

    let help = if state.open_selector().is_some() {
        " ↑↓ move  enter select  type to search  ←/esc back"
    } else {
        " ↑↓ move  enter choose field  x clear  c confirm  q quit"
    };

    let status = match &state.status {
        Some(status) => Line::from(Span::styled(
            format!(" {}", status),
            Style::default().fg(theme.accent_success),
        )),
        None => Line::default(),
    };

    let lines = vec![
        status,
        Line::from(Span::styled(help, Style::default().fg(theme.text_tertiary))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportConfig;
    use crate::import::ImportedColumn;
    use crate::metadata::{FieldMetadataItem, FieldMetadataType};
    use crate::tui::apps::match_columns::InitParams;
    use ratatui::{Terminal, backend::TestBackend};

    fn state() -> State {
        State::new(InitParams {
            object: "company".into(),
            fields: vec![FieldMetadataItem {
                name: "domainName".into(),
                label: "Domain".into(),
                field_type: FieldMetadataType::Links,
                icon: None,
                is_active: true,
                is_read_only: false,
                disable_tooltip: false,
            }],
            columns: vec![ImportedColumn {
                index: 0,
                header: "Website".into(),
                samples: vec!["acme.com".into()],
            }],
            import_config: ImportConfig::default(),
        })
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_registers_row_and_trigger_clicks() {
        let state = state();
        let mut registry = InteractionRegistry::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();

        terminal.draw(|frame| render(&state, frame, &mut registry)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Website"));
        assert!(text.contains("acme.com"));
        assert!(text.contains("Select column..."));

        // Row 0 of the list sits below the title and the border
        assert_eq!(registry.click_at(2, 2), Some(Msg::FocusColumn(0)));
        assert_eq!(
            registry.click_at(90, 2),
            Some(Msg::Select(0, ColumnSelectEvent::Toggle))
        );
    }

    #[test]
    fn test_open_dropdown_captures_outside_clicks() {
        let mut state = state();
        let State { selectors, dropdowns, .. } = &mut state;
        selectors[0].open(dropdowns);

        let mut registry = InteractionRegistry::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 16)).unwrap();
        terminal.draw(|frame| render(&state, frame, &mut registry)).unwrap();

        assert!(buffer_text(&terminal).contains("Domain"));
        assert_eq!(
            registry.click_at(0, 0),
            Some(Msg::Select(0, ColumnSelectEvent::ClickOutside))
        );
    }
}
