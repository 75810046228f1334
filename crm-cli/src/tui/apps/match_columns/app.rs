use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;

use super::state::{InitParams, MoveCursor, Msg, State};
use super::view;
use crate::tui::widgets::{ColumnSelectEvent, SelectContext};
use crate::tui::{App, Command, InteractionRegistry};

pub struct MatchColumnsApp;

impl App for MatchColumnsApp {
    type State = State;
    type Msg = Msg;
    type InitParams = InitParams;

    fn init(params: InitParams) -> (State, Command<Msg>) {
        let state = State::new(params);
        log::info!(
            "Matching {} columns against {} options for '{}'",
            state.matches.len(),
            state.options.len(),
            state.object
        );
        (state, Command::None)
    }

    fn update(state: &mut State, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::MoveCursor(movement) => {
                let len = state.matches.len();
                if len == 0 {
                    return Command::None;
                }
                state.cursor = match movement {
                    MoveCursor::Up => state.cursor.saturating_sub(1),
                    MoveCursor::Down => (state.cursor + 1).min(len - 1),
                    MoveCursor::First => 0,
                    MoveCursor::Last => len - 1,
                };
                Command::None
            }

            Msg::FocusColumn(idx) => {
                if idx < state.matches.len() {
                    state.cursor = idx;
                }
                Command::None
            }

            Msg::Select(idx, event) => {
                if idx >= state.selectors.len() {
                    return Command::None;
                }
                if event == ColumnSelectEvent::Toggle {
                    state.cursor = idx;
                }

                let State {
                    fields,
                    options,
                    suggestions,
                    selectors,
                    dropdowns,
                    matches,
                    status,
                    ..
                } = state;

                let ctx = SelectContext {
                    fields,
                    options,
                    suggested_options: suggestions.get(idx).map(|s| s.as_slice()).unwrap_or(&[]),
                };

                if let Some(option) = selectors[idx].handle_event(event, &ctx, dropdowns) {
                    let header = matches
                        .get(idx)
                        .map(|m| m.column.header.clone())
                        .unwrap_or_default();
                    log::info!("Column '{}' -> '{}'", header, option.value);
                    *status = Some(format!("'{}' mapped to {}", header, option.label));
                    matches.set_value(idx, Some(option));
                }
                Command::None
            }

            Msg::ClearColumn => {
                if let Some(column) = state.matches.get(state.cursor) {
                    state.status = Some(format!("Cleared '{}'", column.column.header));
                    state.matches.set_value(state.cursor, None);
                }
                Command::None
            }

            Msg::Confirm => {
                state.dropdowns.close_all();
                state.confirmed = true;
                Command::Quit
            }

            Msg::Quit => Command::Quit,
        }
    }

    fn view(state: &State, frame: &mut Frame, registry: &mut InteractionRegistry<Msg>) {
        view::render(state, frame, registry);
    }

    fn on_key(state: &State, key: KeyEvent) -> Option<Msg> {
        if let Some(idx) = state.open_selector() {
            let event = match key.code {
                KeyCode::Up | KeyCode::Down | KeyCode::Enter | KeyCode::Esc | KeyCode::Left => {
                    ColumnSelectEvent::Navigate(key.code)
                }
                KeyCode::Char(_)
                | KeyCode::Backspace
                | KeyCode::Delete
                | KeyCode::Home
                | KeyCode::End
                | KeyCode::Right => ColumnSelectEvent::Search(key.code),
                _ => return None,
            };
            return Some(Msg::Select(idx, event));
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Msg::MoveCursor(MoveCursor::Up)),
            KeyCode::Down | KeyCode::Char('j') => Some(Msg::MoveCursor(MoveCursor::Down)),
            KeyCode::Home | KeyCode::Char('g') => Some(Msg::MoveCursor(MoveCursor::First)),
            KeyCode::End | KeyCode::Char('G') => Some(Msg::MoveCursor(MoveCursor::Last)),
            KeyCode::Enter | KeyCode::Char(' ') => {
                Some(Msg::Select(state.cursor, ColumnSelectEvent::Toggle))
            }
            KeyCode::Char('x') | KeyCode::Delete => Some(Msg::ClearColumn),
            KeyCode::Char('c') => Some(Msg::Confirm),
            KeyCode::Char('q') | KeyCode::Esc => Some(Msg::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportConfig;
    use crate::import::{DO_NOT_IMPORT_OPTION_KEY, ImportedColumn};
    use crate::metadata::{FieldMetadataItem, FieldMetadataType};
    use crate::tui::widgets::SelectorView;
    use crossterm::event::KeyModifiers;

    fn field(name: &str, label: &str, field_type: FieldMetadataType) -> FieldMetadataItem {
        FieldMetadataItem {
            name: name.into(),
            label: label.into(),
            field_type,
            icon: None,
            is_active: true,
            is_read_only: false,
            disable_tooltip: false,
        }
    }

    fn column(index: usize, header: &str) -> ImportedColumn {
        ImportedColumn {
            index,
            header: header.into(),
            samples: vec![],
        }
    }

    fn init() -> State {
        let (state, _) = MatchColumnsApp::init(InitParams {
            object: "person".into(),
            fields: vec![
                field("email", "Email", FieldMetadataType::Text),
                field("address", "Address", FieldMetadataType::Address),
            ],
            columns: vec![column(0, "Email"), column(1, "Town")],
            import_config: ImportConfig {
                max_suggestions: 0,
                ..ImportConfig::default()
            },
        });
        state
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(state: &mut State, code: KeyCode) -> Command<Msg> {
        match MatchColumnsApp::on_key(state, key(code)) {
            Some(msg) => MatchColumnsApp::update(state, msg),
            None => Command::None,
        }
    }

    #[test]
    fn test_init_auto_matches_headers() {
        let state = init();
        assert_eq!(state.matches.get(0).unwrap().value.as_ref().unwrap().value, "email");
        assert!(state.matches.get(1).unwrap().value.is_none());
        assert!(state.status.is_some());
    }

    #[test]
    fn test_map_column_to_sub_field_with_keys() {
        let mut state = init();

        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.open_selector(), Some(1));

        // Rows: Email, Address, Do not import, Cancel
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);
        assert!(matches!(state.selectors[1].view(), SelectorView::SubFieldPick(_)));
        assert!(state.matches.get(1).unwrap().value.is_none());

        // Rows: Back, Address 1, Address 2, City
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);

        assert_eq!(state.open_selector(), None);
        assert_eq!(
            state.matches.get(1).unwrap().value.as_ref().unwrap().value,
            "City (address)"
        );
    }

    #[test]
    fn test_click_outside_resets_without_change() {
        let mut state = init();

        MatchColumnsApp::update(&mut state, Msg::Select(1, ColumnSelectEvent::Toggle));
        MatchColumnsApp::update(&mut state, Msg::Select(1, ColumnSelectEvent::Activate(1)));
        assert!(matches!(state.selectors[1].view(), SelectorView::SubFieldPick(_)));

        MatchColumnsApp::update(&mut state, Msg::Select(1, ColumnSelectEvent::ClickOutside));
        assert_eq!(state.selectors[1].view(), &SelectorView::FieldPick);
        assert_eq!(state.open_selector(), None);
        assert!(state.matches.get(1).unwrap().value.is_none());
    }

    #[test]
    fn test_do_not_import_and_clear() {
        let mut state = init();

        MatchColumnsApp::update(&mut state, Msg::Select(0, ColumnSelectEvent::Toggle));
        MatchColumnsApp::update(&mut state, Msg::Select(0, ColumnSelectEvent::Activate(2)));
        assert_eq!(
            state.matches.get(0).unwrap().value.as_ref().unwrap().value,
            DO_NOT_IMPORT_OPTION_KEY
        );

        press(&mut state, KeyCode::Char('x'));
        assert!(state.matches.get(0).unwrap().value.is_none());
    }

    #[test]
    fn test_confirm_and_quit() {
        let mut state = init();
        assert_eq!(press(&mut state, KeyCode::Char('c')), Command::Quit);
        assert!(state.confirmed);

        let mut state = init();
        assert_eq!(press(&mut state, KeyCode::Char('q')), Command::Quit);
        assert!(!state.confirmed);
    }

    #[test]
    fn test_typing_searches_while_open() {
        let mut state = init();
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Char('q'));

        // 'q' went to the search box instead of quitting
        assert_eq!(state.selectors[0].search(), "q");
        assert_eq!(state.open_selector(), Some(0));
    }
}
