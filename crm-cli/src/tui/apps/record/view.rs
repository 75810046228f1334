use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::state::{MenuItem, Msg, State, Status};
use crate::tui::InteractionRegistry;
use crate::tui::tooltip::render_tooltip;
use crate::tui::widgets::inline_cell::render_inline_cell;
use crate::tui::widgets::InlineCellView;

const MENU_WIDTH: u16 = 28;

pub fn render(state: &State, frame: &mut Frame, registry: &mut InteractionRegistry<Msg>) {
    let theme = &crate::global_runtime_config().theme;
    let now = Instant::now();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(2)])
        .split(frame.area());

    let mut title = vec![
        Span::styled(
            format!(" {}", state.object),
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" · {}", state.record.id), Style::default().fg(theme.text_secondary)),
    ];
    if state.dirty {
        title.push(Span::styled("  ● modified", Style::default().fg(theme.accent_warning)));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), chunks[0]);

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.border_secondary));
    let list_area = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    let visible = list_area.height as usize;
    let anchor = state.editing.or(state.hovered).unwrap_or(0);
    let offset = anchor.saturating_sub(visible.saturating_sub(1));

    let mut tooltips = Vec::new();
    for (line, (idx, row)) in state.rows.iter().enumerate().skip(offset).take(visible).enumerate() {
        let area = Rect::new(list_area.x + 1, list_area.y + line as u16, list_area.width.saturating_sub(1), 1);
        let value = state.row_value(idx);

        let view = InlineCellView {
            container: &row.container,
            cell: &row.cell,
            focus: row.focus,
            value: &value,
            hovered_since: row.hovered_since,
        };
        if let Some(pending) = render_inline_cell(frame, area, &view, now) {
            tooltips.push((idx, pending));
        }

        registry.register_hover(
            row.container.label_id(),
            area,
            Msg::HoverEnter(idx),
            Msg::HoverLeave(idx),
        );
        registry.register_click(area, Msg::Click(idx));
    }

    render_footer(state, frame, chunks[2]);

    if state.menu.is_some() {
        render_menu(state, frame, registry);
    }

    for (idx, pending) in tooltips {
        let area = render_tooltip(frame, &pending.tooltip, pending.anchor);
        // Same key as the row, so moving onto the tooltip is not a leave
        if pending.tooltip.clickable {
            registry.register_hover(
                state.rows[idx].container.label_id(),
                area,
                Msg::HoverEnter(idx),
                Msg::HoverLeave(idx),
            );
        }
    }
}

fn render_footer(state: &State, frame: &mut Frame, area: Rect) {
    let theme = &crate::global_runtime_config().theme;

    let status = match &state.status {
        Some(Status::Info(text)) => Line::from(Span::styled(
            format!(" {}", text),
            Style::default().fg(theme.accent_success),
        )),
        Some(Status::Error(text)) => Line::from(Span::styled(
            format!(" ✗ {}", text),
            Style::default().fg(theme.accent_error),
        )),
        None => Line::default(),
    };

    let help = if state.editing.is_some() {
        " enter save field  esc cancel  ctrl+k menu"
    } else {
        " ↑↓ move  enter edit  s save  : menu  q quit"
    };

    frame.render_widget(
        Paragraph::new(vec![
            status,
            Line::from(Span::styled(help, Style::default().fg(theme.text_tertiary))),
        ]),
        area,
    );
}

fn render_menu(state: &State, frame: &mut Frame, registry: &mut InteractionRegistry<Msg>) {
    let theme = &crate::global_runtime_config().theme;
    let bounds = frame.area();
    let highlight = state.menu.map(|m| m.highlight).unwrap_or(0);

    let width = MENU_WIDTH.min(bounds.width);
    let height = (MenuItem::ALL.len() as u16 + 2).min(bounds.height);
    let area = Rect::new(
        bounds.x + (bounds.width.saturating_sub(width)) / 2,
        bounds.y + (bounds.height.saturating_sub(height)) / 3,
        width,
        height,
    );

    let lines: Vec<Line> = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let style = if idx == highlight {
                Style::default().bg(theme.bg_surface).fg(theme.text_primary)
            } else {
                Style::default().fg(theme.text_secondary)
            };
            Line::from(vec![
                Span::styled(format!(" {:<width$}", item.label(), width = (width as usize).saturating_sub(6)), style),
                Span::styled(format!("{} ", item.shortcut()), style.fg(theme.text_tertiary)),
            ])
        })
        .collect();

    for idx in 0..MenuItem::ALL.len() {
        let row = Rect::new(area.x + 1, area.y + 1 + idx as u16, area.width.saturating_sub(2), 1);
        registry.register_click(row, Msg::MenuActivate(idx));
    }
    registry.register_click_outside(area, Msg::CloseMenu);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Commands ")
        .border_style(Style::default().fg(theme.accent_primary));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
