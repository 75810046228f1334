/// Side effects requested by an app's update function
#[derive(Debug, Clone, PartialEq)]
pub enum Command<Msg> {
    None,
    /// Feed another message through update before the next draw
    Dispatch(Msg),
    Batch(Vec<Command<Msg>>),
    Quit,
}

impl<Msg> Command<Msg> {
    pub fn batch(commands: Vec<Command<Msg>>) -> Self {
        Command::Batch(commands)
    }
}
