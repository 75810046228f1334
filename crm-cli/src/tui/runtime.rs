use std::io::{Stdout, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::interaction::HoverRegion;
use super::{App, Command, InteractionRegistry};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Drives one [`App`]: event dispatch, hover tracking and command handling
pub struct AppRuntime<A: App> {
    state: A::State,
    registry: InteractionRegistry<A::Msg>,
    hovered: Option<HoverRegion<A::Msg>>,
    quit: bool,
}

impl<A: App> AppRuntime<A> {
    pub fn new(params: A::InitParams) -> Self {
        let (state, command) = A::init(params);
        let mut runtime = Self {
            state,
            registry: InteractionRegistry::new(),
            hovered: None,
            quit: false,
        };
        runtime.execute(command);
        runtime
    }

    pub fn state(&self) -> &A::State {
        &self.state
    }

    pub fn into_state(self) -> A::State {
        self.state
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    #[cfg(test)]
    pub fn registry_mut(&mut self) -> &mut InteractionRegistry<A::Msg> {
        &mut self.registry
    }

    pub fn dispatch(&mut self, msg: A::Msg) {
        let command = A::update(&mut self.state, msg);
        self.execute(command);
    }

    fn execute(&mut self, command: Command<A::Msg>) {
        match command {
            Command::None => {}
            Command::Dispatch(msg) => self.dispatch(msg),
            Command::Batch(commands) => {
                for command in commands {
                    self.execute(command);
                }
            }
            Command::Quit => self.quit = true,
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(msg) = A::on_key(&self.state, key) {
                    self.dispatch(msg);
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(msg) = self.registry.click_at(mouse.column, mouse.row) {
                    self.dispatch(msg);
                }
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.update_hover(mouse.column, mouse.row);
            }
            _ => {}
        }
    }

    /// Emit leave/enter messages when the pointer crosses hover regions
    fn update_hover(&mut self, column: u16, row: u16) {
        let current = self.registry.hover_at(column, row).cloned();

        let previous_key = self.hovered.as_ref().map(|h| h.key.clone());
        let current_key = current.as_ref().map(|h| h.key.clone());
        if previous_key == current_key {
            return;
        }

        if let Some(previous) = self.hovered.take() {
            self.dispatch(previous.on_leave);
        }
        if let Some(current) = current {
            self.dispatch(current.on_enter.clone());
            self.hovered = Some(current);
        }
    }

    /// Take over the terminal and run until the app quits
    pub fn run(mut self) -> Result<A::State> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result.map(|_| self.state)
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while !self.quit {
            self.registry.clear();
            let state = &self.state;
            let registry = &mut self.registry;
            terminal
                .draw(|frame| A::view(state, frame, registry))
                .context("Failed to draw frame")?;

            if event::poll(TICK_RATE).context("Failed to poll terminal events")? {
                let event = event::read().context("Failed to read terminal event")?;
                self.handle_event(event);
            }
        }
        Ok(())
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(out)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Frame, layout::Rect};

    struct CounterApp;

    #[derive(Debug, Clone, PartialEq)]
    enum Msg {
        Enter(u8),
        Leave(u8),
        Click,
        Twice,
        Quit,
    }

    impl App for CounterApp {
        type State = Vec<Msg>;
        type Msg = Msg;
        type InitParams = ();

        fn init(_params: ()) -> (Vec<Msg>, Command<Msg>) {
            (Vec::new(), Command::None)
        }

        fn update(state: &mut Vec<Msg>, msg: Msg) -> Command<Msg> {
            state.push(msg.clone());
            match msg {
                Msg::Twice => Command::batch(vec![Command::Dispatch(Msg::Click), Command::Dispatch(Msg::Click)]),
                Msg::Quit => Command::Quit,
                _ => Command::None,
            }
        }

        fn view(_state: &Vec<Msg>, _frame: &mut Frame, _registry: &mut InteractionRegistry<Msg>) {}

        fn on_key(_state: &Vec<Msg>, key: KeyEvent) -> Option<Msg> {
            match key.code {
                KeyCode::Char('q') => Some(Msg::Quit),
                KeyCode::Char('t') => Some(Msg::Twice),
                _ => None,
            }
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn runtime_with_regions() -> AppRuntime<CounterApp> {
        let mut runtime = AppRuntime::<CounterApp>::new(());
        let registry = runtime.registry_mut();
        registry.register_hover("a", Rect::new(0, 0, 10, 1), Msg::Enter(0), Msg::Leave(0));
        registry.register_hover("b", Rect::new(0, 1, 10, 1), Msg::Enter(1), Msg::Leave(1));
        registry.register_click(Rect::new(0, 0, 10, 2), Msg::Click);
        runtime
    }

    #[test]
    fn test_hover_enter_and_leave() {
        let mut runtime = runtime_with_regions();

        runtime.handle_event(mouse(MouseEventKind::Moved, 1, 0));
        runtime.handle_event(mouse(MouseEventKind::Moved, 2, 0));
        runtime.handle_event(mouse(MouseEventKind::Moved, 1, 1));
        runtime.handle_event(mouse(MouseEventKind::Moved, 1, 5));

        assert_eq!(
            runtime.state(),
            &vec![Msg::Enter(0), Msg::Leave(0), Msg::Enter(1), Msg::Leave(1)]
        );
    }

    #[test]
    fn test_click_and_commands() {
        let mut runtime = runtime_with_regions();

        runtime.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 3, 1));
        runtime.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE)));
        assert!(!runtime.should_quit());

        runtime.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(runtime.should_quit());
        assert_eq!(
            runtime.into_state(),
            vec![Msg::Click, Msg::Twice, Msg::Click, Msg::Click, Msg::Quit]
        );
    }
}
