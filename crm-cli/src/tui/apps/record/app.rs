use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;

use super::state::{InitParams, MenuItem, MoveHover, Msg, State, Status};
use super::view;
use crate::tui::{App, Command, InteractionRegistry};

pub struct RecordApp;

impl App for RecordApp {
    type State = State;
    type Msg = Msg;
    type InitParams = InitParams;

    fn init(params: InitParams) -> (State, Command<Msg>) {
        let state = State::new(params);
        log::info!(
            "Editing {} record {} ({} fields)",
            state.object,
            state.record.id,
            state.rows.len()
        );
        (state, Command::None)
    }

    fn update(state: &mut State, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::HoverEnter(idx) => {
                if idx >= state.rows.len() {
                    return Command::None;
                }
                // Mouse and keyboard both move the hover; only one row holds it
                if let Some(prev) = state.hovered.filter(|&prev| prev != idx) {
                    leave_row(state, prev);
                }
                let row = &mut state.rows[idx];
                row.container.handle_mouse_enter(&mut row.focus);
                row.hovered_since = Some(Instant::now());
                state.hovered = Some(idx);
                Command::None
            }

            Msg::HoverLeave(idx) => {
                leave_row(state, idx);
                Command::None
            }

            Msg::MoveHover(direction) => {
                if state.rows.is_empty() {
                    return Command::None;
                }
                let last = state.rows.len() - 1;
                let next = match (state.hovered, direction) {
                    (None, MoveHover::Up) => last,
                    (None, MoveHover::Down) => 0,
                    (Some(idx), MoveHover::Up) => idx.saturating_sub(1),
                    (Some(idx), MoveHover::Down) => (idx + 1).min(last),
                };
                match state.hovered {
                    Some(prev) if prev == next => Command::None,
                    Some(prev) => Command::batch(vec![
                        Command::Dispatch(Msg::HoverLeave(prev)),
                        Command::Dispatch(Msg::HoverEnter(next)),
                    ]),
                    None => Command::Dispatch(Msg::HoverEnter(next)),
                }
            }

            Msg::Click(idx) => {
                if idx >= state.rows.len() || state.editing == Some(idx) {
                    return Command::None;
                }
                if let Some(open) = state.editing {
                    if !commit_edit(state, open) {
                        return Command::None;
                    }
                }

                let value = state.row_value(idx);
                let row = &mut state.rows[idx];
                if row.container.handle_click(&mut row.cell, &value) {
                    state.editing = Some(idx);
                    state.status = None;
                } else if row.container.props().readonly {
                    state.status = Some(Status::Info(format!(
                        "{} ({}) is read-only",
                        row.field.label,
                        row.field.field_type.display_name()
                    )));
                }
                Command::None
            }

            Msg::EditKey(key) => {
                if let Some(row) = state.editing.and_then(|idx| state.rows.get_mut(idx)) {
                    row.cell.handle_input(key);
                }
                Command::None
            }

            Msg::Commit => {
                if let Some(idx) = state.editing {
                    commit_edit(state, idx);
                }
                Command::None
            }

            Msg::CancelEdit => {
                if let Some(row) = state.editing.take().and_then(|idx| state.rows.get_mut(idx)) {
                    row.cell.close_inline_cell();
                }
                Command::None
            }

            Msg::OpenMenu => {
                for row in &mut state.rows {
                    row.container.on_command_menu_opened(&mut row.cell);
                }
                state.editing = None;
                state.menu = Some(Default::default());
                Command::None
            }

            Msg::CloseMenu => {
                state.menu = None;
                Command::None
            }

            Msg::MenuMove(direction) => {
                if let Some(menu) = &mut state.menu {
                    menu.highlight = match direction {
                        MoveHover::Up => menu.highlight.saturating_sub(1),
                        MoveHover::Down => (menu.highlight + 1).min(MenuItem::ALL.len() - 1),
                    };
                }
                Command::None
            }

            Msg::MenuActivate(idx) => {
                state.menu = None;
                match MenuItem::ALL.get(idx) {
                    Some(MenuItem::Save) => Command::Dispatch(Msg::Save),
                    Some(MenuItem::Quit) => Command::Dispatch(Msg::Quit),
                    None => Command::None,
                }
            }

            Msg::Save => {
                match state.record.save(&state.record_path) {
                    Ok(()) => {
                        state.dirty = false;
                        state.saved = true;
                        state.status = Some(Status::Info(format!(
                            "Saved to {}",
                            state.record_path.display()
                        )));
                    }
                    Err(e) => {
                        log::error!("Failed to save record {}: {:#}", state.record.id, e);
                        state.status = Some(Status::Error(format!("{:#}", e)));
                    }
                }
                Command::None
            }

            Msg::Quit => Command::Quit,
        }
    }

    fn view(state: &State, frame: &mut Frame, registry: &mut InteractionRegistry<Msg>) {
        view::render(state, frame, registry);
    }

    fn on_key(state: &State, key: KeyEvent) -> Option<Msg> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('k') {
            return Some(Msg::OpenMenu);
        }

        if let Some(menu) = &state.menu {
            return match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Msg::MenuMove(MoveHover::Up)),
                KeyCode::Down | KeyCode::Char('j') => Some(Msg::MenuMove(MoveHover::Down)),
                KeyCode::Enter => Some(Msg::MenuActivate(menu.highlight)),
                KeyCode::Esc => Some(Msg::CloseMenu),
                KeyCode::Char(c) => MenuItem::ALL
                    .iter()
                    .position(|item| item.shortcut() == c)
                    .map(Msg::MenuActivate),
                _ => None,
            };
        }

        if state.editing.is_some() {
            return match key.code {
                KeyCode::Enter => Some(Msg::Commit),
                KeyCode::Esc => Some(Msg::CancelEdit),
                code => Some(Msg::EditKey(code)),
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Msg::MoveHover(MoveHover::Up)),
            KeyCode::Down | KeyCode::Char('j') => Some(Msg::MoveHover(MoveHover::Down)),
            KeyCode::Enter => state.hovered.map(Msg::Click),
            KeyCode::Char(':') => Some(Msg::OpenMenu),
            KeyCode::Char('s') => Some(Msg::Save),
            KeyCode::Char('q') | KeyCode::Esc => Some(Msg::Quit),
            _ => None,
        }
    }
}

fn leave_row(state: &mut State, idx: usize) {
    if let Some(row) = state.rows.get_mut(idx) {
        row.container.handle_mouse_leave(&mut row.focus);
        row.hovered_since = None;
    }
    if state.hovered == Some(idx) {
        state.hovered = None;
    }
}

/// Write the open cell's draft into the record. On a coercion error the cell
/// stays open and the error goes to the status line.
fn commit_edit(state: &mut State, idx: usize) -> bool {
    let Some(row) = state.rows.get_mut(idx) else {
        return false;
    };
    let Some(draft) = row.cell.take_draft() else {
        state.editing = None;
        return true;
    };

    match state.record.set_text_value(&row.field, &draft) {
        Ok(()) => {
            state.editing = None;
            state.dirty = true;
            state.status = Some(Status::Info(format!("Updated {}", row.field.label)));
            true
        }
        Err(e) => {
            log::warn!("Rejected edit of {}: {:#}", row.field.name, e);
            row.cell.open_inline_cell(&draft);
            state.status = Some(Status::Error(format!("{:#}", e)));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{FieldMetadataItem, FieldMetadataType};
    use crate::records::Record;
    use serde_json::json;
    use std::path::PathBuf;

    fn field(name: &str, label: &str, field_type: FieldMetadataType, read_only: bool) -> FieldMetadataItem {
        FieldMetadataItem {
            name: name.into(),
            label: label.into(),
            field_type,
            icon: None,
            is_active: true,
            is_read_only: read_only,
            disable_tooltip: false,
        }
    }

    fn init_with_path(record_path: PathBuf) -> State {
        let record: Record = serde_json::from_value(json!({
            "id": "rec-1",
            "values": {
                "jobTitle": "Engineer",
                "name": {"firstName": "Ada", "lastName": "Lovelace"}
            }
        }))
        .unwrap();

        let (state, _) = RecordApp::init(InitParams {
            object: "person".into(),
            fields: vec![
                field("jobTitle", "Job Title", FieldMetadataType::Text, false),
                field("employees", "Employees", FieldMetadataType::Number, false),
                field("name", "Name", FieldMetadataType::FullName, false),
                field("createdAt", "Created", FieldMetadataType::DateTime, true),
            ],
            record,
            record_path,
            label_width: 12,
            show_labels: true,
        });
        state
    }

    fn init() -> State {
        init_with_path(std::env::temp_dir().join("crm-cli-record-app-test.json"))
    }

    /// Run a message and every message its commands dispatch
    fn send(state: &mut State, msg: Msg) -> bool {
        let mut queue = vec![RecordApp::update(state, msg)];
        let mut quit = false;
        while let Some(command) = queue.pop() {
            match command {
                Command::None => {}
                Command::Dispatch(msg) => queue.push(RecordApp::update(state, msg)),
                Command::Batch(commands) => queue.extend(commands.into_iter().rev()),
                Command::Quit => quit = true,
            }
        }
        quit
    }

    fn press(state: &mut State, code: KeyCode) -> bool {
        match RecordApp::on_key(state, KeyEvent::new(code, KeyModifiers::NONE)) {
            Some(msg) => send(state, msg),
            None => false,
        }
    }

    #[test]
    fn test_hover_focuses_editable_rows_only() {
        let mut state = init();

        send(&mut state, Msg::HoverEnter(0));
        assert!(state.rows[0].focus.is_focused());
        assert!(state.rows[0].hovered_since.is_some());

        send(&mut state, Msg::HoverLeave(0));
        send(&mut state, Msg::HoverEnter(2));
        assert!(!state.rows[0].focus.is_focused());
        assert!(!state.rows[2].focus.is_focused());
        assert_eq!(state.hovered, Some(2));
    }

    #[test]
    fn test_keyboard_hover_moves_between_rows() {
        let mut state = init();

        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Down);
        assert_eq!(state.hovered, Some(1));
        assert!(!state.rows[0].focus.is_focused());
        assert!(state.rows[1].focus.is_focused());

        press(&mut state, KeyCode::Up);
        press(&mut state, KeyCode::Up);
        assert_eq!(state.hovered, Some(0));
    }

    #[test]
    fn test_mouse_after_keyboard_hover_leaves_one_row_hovered() {
        let mut state = init();

        send(&mut state, Msg::HoverEnter(0));
        press(&mut state, KeyCode::Down);
        assert_eq!(state.hovered, Some(1));

        // The pointer still thinks it is over row 0 and now moves to row 2
        send(&mut state, Msg::HoverLeave(0));
        send(&mut state, Msg::HoverEnter(2));

        let hovered: Vec<usize> = state
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.focus.is_focused() || row.hovered_since.is_some())
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(hovered, vec![2]);
        assert_eq!(state.hovered, Some(2));
    }

    #[test]
    fn test_keyboard_after_mouse_hover_moves_from_mouse_row() {
        let mut state = init();

        send(&mut state, Msg::HoverEnter(1));
        press(&mut state, KeyCode::Up);

        assert_eq!(state.hovered, Some(0));
        assert!(state.rows[0].focus.is_focused());
        assert!(!state.rows[1].focus.is_focused());
        assert!(state.rows[1].hovered_since.is_none());
    }

    #[test]
    fn test_click_edit_and_commit() {
        let mut state = init();

        send(&mut state, Msg::Click(0));
        assert_eq!(state.editing, Some(0));
        assert_eq!(state.rows[0].cell.draft(), Some("Engineer"));

        press(&mut state, KeyCode::Char('!'));
        press(&mut state, KeyCode::Enter);

        assert_eq!(state.editing, None);
        assert!(state.dirty);
        assert_eq!(state.record.value("jobTitle"), Some(&json!("Engineer!")));
    }

    #[test]
    fn test_invalid_number_keeps_cell_open() {
        let mut state = init();

        send(&mut state, Msg::Click(1));
        press(&mut state, KeyCode::Char('x'));
        press(&mut state, KeyCode::Enter);

        assert_eq!(state.editing, Some(1));
        assert_eq!(state.rows[1].cell.draft(), Some("x"));
        assert!(matches!(state.status, Some(Status::Error(_))));
        assert_eq!(state.record.value("employees"), None);

        press(&mut state, KeyCode::Esc);
        assert_eq!(state.editing, None);
        assert!(!state.rows[1].cell.is_in_edit_mode());
    }

    #[test]
    fn test_composite_and_read_only_rows_do_not_open() {
        let mut state = init();

        send(&mut state, Msg::Click(2));
        send(&mut state, Msg::Click(3));

        assert_eq!(state.editing, None);
        assert!(!state.rows[2].cell.is_in_edit_mode());
        assert_eq!(state.status, Some(Status::Info("Created (Date and Time) is read-only".into())));
    }

    #[test]
    fn test_clicking_another_row_commits_the_open_one() {
        let mut state = init();

        send(&mut state, Msg::Click(0));
        press(&mut state, KeyCode::Backspace);
        send(&mut state, Msg::Click(1));

        assert_eq!(state.editing, Some(1));
        assert_eq!(state.record.value("jobTitle"), Some(&json!("Enginee")));
    }

    #[test]
    fn test_command_menu_closes_open_cell() {
        let mut state = init();

        send(&mut state, Msg::Click(0));
        press(&mut state, KeyCode::Char('z'));
        let msg = RecordApp::on_key(&state, KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL));
        assert_eq!(msg, Some(Msg::OpenMenu));
        send(&mut state, Msg::OpenMenu);

        assert!(state.menu.is_some());
        assert_eq!(state.editing, None);
        assert!(!state.rows[0].cell.is_in_edit_mode());
        // Draft discarded
        assert_eq!(state.record.value("jobTitle"), Some(&json!("Engineer")));

        press(&mut state, KeyCode::Esc);
        assert!(state.menu.is_none());
    }

    #[test]
    fn test_menu_quit() {
        let mut state = init();
        press(&mut state, KeyCode::Char(':'));
        press(&mut state, KeyCode::Down);
        assert!(press(&mut state, KeyCode::Enter));
        assert!(state.menu.is_none());
    }

    #[test]
    fn test_save_writes_record() {
        let path = std::env::temp_dir().join(format!("crm-cli-record-save-{}.json", std::process::id()));
        let mut state = init_with_path(path.clone());

        send(&mut state, Msg::Click(1));
        press(&mut state, KeyCode::Char('7'));
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Char('s'));

        assert!(state.saved);
        assert!(!state.dirty);
        let saved = Record::load(&path).unwrap();
        assert_eq!(saved.value("employees"), Some(&json!(7)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_failure_reported() {
        let mut state = init_with_path(PathBuf::from("/nonexistent-dir/crm-cli/record.json"));
        send(&mut state, Msg::Save);

        assert!(!state.saved);
        assert!(matches!(state.status, Some(Status::Error(_))));
    }
}
