use crossterm::event::KeyEvent;
use ratatui::Frame;

use super::{Command, InteractionRegistry};

/// Elm-style terminal application
///
/// State lives in `State`; all mutation happens in `update`. `view` draws the
/// state and registers mouse targets for the next event.
pub trait App {
    type State;
    type Msg: Clone;
    type InitParams;

    fn init(params: Self::InitParams) -> (Self::State, Command<Self::Msg>);

    fn update(state: &mut Self::State, msg: Self::Msg) -> Command<Self::Msg>;

    fn view(state: &Self::State, frame: &mut Frame, registry: &mut InteractionRegistry<Self::Msg>);

    /// Map a key press to a message
    fn on_key(state: &Self::State, key: KeyEvent) -> Option<Self::Msg>;
}
