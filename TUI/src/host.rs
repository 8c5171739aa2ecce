//! Capabilities a host can hand to an action strip.
//!
//! They are independent: a host may implement any subset. The strip keeps
//! listeners and override providers as `Weak` handles and never extends
//! their lifetime.

use ratatui::style::Color;

use crate::action::MessageAction;

/// Handle to a rendered button.
///
/// Buttons have no identity beyond their position, so a handle is only
/// meaningful until the strip reloads its action list. Check it with
/// [`crate::strip::ActionStrip::is_live`] before relying on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonRef {
    pub(crate) generation: u64,
    pub(crate) index: usize,
}

impl ButtonRef {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Notified synchronously on every committed tap.
pub trait ActionListener {
    fn on_action_selected(&self, action: MessageAction, button: ButtonRef);
}

/// Supplies everything a strip needs to show one message's actions.
pub trait StripHost {
    fn actions(&self) -> Vec<MessageAction>;

    fn actions_visible(&self) -> bool;

    /// Shared background for every button, `None` for the theme default.
    fn action_tint(&self) -> Option<Color> {
        None
    }
}
