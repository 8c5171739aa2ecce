use serde::{Deserialize, Serialize};

/// Actions that can be offered under a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageAction {
    /// Copy the message text
    Copy,
    /// Share the message
    Share,
    /// Put the user's text back into the input
    #[serde(rename = "re-ask")]
    Reask,
    /// Drop the last reply and ask again
    Regenerate,
    /// Render the message as a picture
    Visualize,
    /// Stop a reply that is still streaming
    StopStream,
    /// Read the message aloud
    SpeakOn,
    /// Stop reading aloud
    SpeakOff,
}

impl MessageAction {
    pub const ALL: [MessageAction; 8] = [
        MessageAction::Copy,
        MessageAction::Share,
        MessageAction::Reask,
        MessageAction::Regenerate,
        MessageAction::Visualize,
        MessageAction::StopStream,
        MessageAction::SpeakOn,
        MessageAction::SpeakOff,
    ];

    /// Label shown when no override supplies one.
    pub fn default_label(self) -> &'static str {
        match self {
            MessageAction::Copy => "Copy",
            MessageAction::Share => "Share",
            MessageAction::Reask => "Re-Ask",
            MessageAction::Regenerate => "Regenerate",
            MessageAction::Visualize => "Visualize",
            MessageAction::StopStream => "Stop",
            MessageAction::SpeakOn => "Speak",
            MessageAction::SpeakOff => "Stop",
        }
    }

    /// Symbolic icon id shown when no override supplies one.
    pub fn default_icon(self) -> &'static str {
        match self {
            MessageAction::Copy => "doc.on.doc",
            MessageAction::Share => "square.and.arrow.up",
            MessageAction::Reask => "arrow.clockwise",
            MessageAction::Regenerate => "arrow.clockwise",
            MessageAction::Visualize => "photo.artframe",
            MessageAction::StopStream => "stop",
            MessageAction::SpeakOn => "speaker.wave.2",
            MessageAction::SpeakOff => "speaker.slash",
        }
    }
}
