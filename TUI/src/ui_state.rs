#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    /// Keyboard focus on a button of a message's action strip
    Actions { message: usize, button: usize },
}

#[derive(Default)]
pub struct UIState {
    pub input: String,
    // Messages scrolled up from the bottom
    pub scroll_offset: usize,
    pub status_message: Option<String>,
    pub focus: Focus,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }
}
