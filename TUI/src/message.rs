use chrono::{DateTime, Utc};

use crate::action::MessageAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Reply is still arriving
    pub streaming: bool,
    /// Reply is being read aloud
    pub speaking: bool,
}

impl Message {
    pub fn new(id: u64, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            timestamp: Utc::now(),
            streaming: false,
            speaking: false,
        }
    }

    /// Actions offered for this message in its current state.
    pub fn actions(&self) -> Vec<MessageAction> {
        match self.role {
            Role::User => vec![MessageAction::Copy, MessageAction::Reask],
            Role::Assistant if self.streaming => vec![MessageAction::StopStream],
            Role::Assistant => {
                let speak = if self.speaking {
                    MessageAction::SpeakOff
                } else {
                    MessageAction::SpeakOn
                };
                vec![
                    MessageAction::Copy,
                    MessageAction::Share,
                    MessageAction::Regenerate,
                    speak,
                    MessageAction::Visualize,
                ]
            }
            Role::System => Vec::new(),
        }
    }

    pub fn show_actions(&self) -> bool {
        self.role != Role::System
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_streaming_reply_only_offers_stop() {
        let mut msg = Message::new(1, Role::Assistant, "partial");
        msg.streaming = true;
        assert_eq!(msg.actions(), vec![MessageAction::StopStream]);
    }

    #[test]
    fn test_speak_toggles() {
        let mut msg = Message::new(1, Role::Assistant, "done");
        assert!(msg.actions().contains(&MessageAction::SpeakOn));
        msg.speaking = true;
        assert!(msg.actions().contains(&MessageAction::SpeakOff));
        assert!(!msg.actions().contains(&MessageAction::SpeakOn));
    }

    #[test]
    fn test_system_messages_hide_actions() {
        let msg = Message::new(1, Role::System, "note");
        assert!(msg.actions().is_empty());
        assert!(!msg.show_actions());
    }
}
