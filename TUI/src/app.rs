use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use arboard::Clipboard;
use ratatui::layout::Position;
use ratatui::style::Color;
use tracing::{debug, info, warn};

use crate::action::MessageAction;
use crate::cell::{CellError, CellSelection, MessageCell, MessageDisplay, MessageList, MessagesDataSource, SelectionQueue};
use crate::clock::Clock;
use crate::config::Config;
use crate::message::{Message, Role};
use crate::resolver::{ActionOverrides, TableOverrides};
use crate::strip::{ActionStrip, StripState};
use crate::ui_state::{Focus, UIState};

/// Button tint for the user's own messages
pub const USER_TINT: Color = Color::Rgb(84, 112, 156);

const OFFLINE_REPLY: &str = "Backend not connected, so here is a canned reply. \
Use the buttons under this message to copy it, share it, read it aloud, or ask for it again.";

struct ThemeDisplay;

impl MessageDisplay for ThemeDisplay {
    fn action_tint(&self, message: &Message) -> Option<Color> {
        match message.role {
            Role::User => Some(USER_TINT),
            Role::Assistant | Role::System => None,
        }
    }
}

struct ChatDataSource {
    overrides: Option<Rc<dyn ActionOverrides>>,
}

impl MessagesDataSource for ChatDataSource {
    fn is_from_current_sender(&self, message: &Message) -> bool {
        message.role == Role::User
    }

    fn action_overrides(&self) -> Option<Rc<dyn ActionOverrides>> {
        self.overrides.clone()
    }
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "assistant",
        Role::System => "system",
    }
}

pub struct App {
    pub config: Config,
    pub messages: Vec<Message>,
    /// One cell per message, same order
    pub cells: Vec<MessageCell>,
    pub ui: UIState,
    pub animation_tick: u64,
    list: MessageList,
    selections: Rc<SelectionQueue>,
    clock: Rc<dyn Clock>,
    // Characters still to arrive, per streaming message
    streams: HashMap<u64, VecDeque<char>>,
    next_id: u64,
}

impl App {
    pub fn new(config: Config, overrides: Option<TableOverrides>, clock: Rc<dyn Clock>) -> Self {
        let overrides = overrides.map(|o| Rc::new(o) as Rc<dyn ActionOverrides>);
        let list = MessageList::new(Rc::new(ThemeDisplay), Rc::new(ChatDataSource { overrides }));
        Self::with_list(config, list, clock)
    }

    pub fn with_list(config: Config, list: MessageList, clock: Rc<dyn Clock>) -> Self {
        Self {
            config,
            messages: Vec::new(),
            cells: Vec::new(),
            ui: UIState::new(),
            animation_tick: 0,
            list,
            selections: Rc::new(SelectionQueue::new()),
            clock,
            streams: HashMap::new(),
            next_id: 1,
        }
    }

    fn new_cell(&self) -> MessageCell {
        let strip = ActionStrip::with_style(self.config.button, self.config.strip, self.config.feedback)
            .with_clock(self.clock.clone());
        MessageCell::new(strip, &self.selections)
    }

    pub fn push_message(&mut self, role: Role, content: impl Into<String>) -> Result<u64, CellError> {
        let id = self.next_id;
        self.next_id += 1;
        let message = Message::new(id, role, content);
        let mut cell = self.new_cell();
        cell.configure(&message, &self.list)?;
        self.messages.push(message);
        self.cells.push(cell);
        Ok(id)
    }

    fn index_of(&self, id: u64) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }

    /// Reload a message's strip after its action set changed.
    fn reconfigure(&mut self, index: usize) -> Result<(), CellError> {
        let cell = &mut self.cells[index];
        cell.prepare_for_reuse();
        cell.configure(&self.messages[index], &self.list)?;
        self.clamp_focus();
        Ok(())
    }

    fn start_stream(&mut self, id: u64) {
        self.streams.insert(id, OFFLINE_REPLY.chars().collect());
    }

    pub fn tick(&mut self) -> Result<(), CellError> {
        self.animation_tick += 1;
        if self.animation_tick % self.config.status_timeout_ticks == 0 {
            self.ui.status_message = None;
        }

        let step = self.config.stream_chars_per_tick;
        let mut finished = Vec::new();
        for (id, remaining) in self.streams.iter_mut() {
            let chunk: String = remaining.drain(..step.min(remaining.len())).collect();
            if let Some(message) = self.messages.iter_mut().find(|m| m.id == *id) {
                message.content.push_str(&chunk);
            }
            if remaining.is_empty() {
                finished.push(*id);
            }
        }
        for id in finished {
            self.streams.remove(&id);
            if let Some(index) = self.index_of(id) {
                self.messages[index].streaming = false;
                debug!(message = id, "reply finished streaming");
                self.reconfigure(index)?;
            }
        }

        for cell in &mut self.cells {
            cell.strip_mut().tick();
        }
        Ok(())
    }

    pub fn submit_message(&mut self) -> Result<(), CellError> {
        if self.ui.input.trim().is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.ui.input);
        self.push_message(Role::User, text)?;

        let reply = self.push_message(Role::Assistant, "")?;
        if let Some(index) = self.index_of(reply) {
            self.messages[index].streaming = true;
            self.reconfigure(index)?;
        }
        self.start_stream(reply);
        self.ui.scroll_offset = 0;
        Ok(())
    }

    // ── Pointer input ──────────────────────────────────────────────────

    /// Route a click to the strip under `point`. Returns whether a strip took it.
    pub fn click(&mut self, point: Position) -> Result<bool, CellError> {
        let Some(cell) = self.cells.iter_mut().find(|c| c.can_handle(point)) else {
            return Ok(false);
        };
        cell.strip_mut().tap(point);
        self.process_selections()?;
        Ok(true)
    }

    pub fn scroll_strip_at(&mut self, point: Position, delta: i32) -> bool {
        match self.cells.iter_mut().find(|c| c.can_handle(point)) {
            Some(cell) => {
                cell.strip_mut().scroll_by(delta);
                true
            }
            None => false,
        }
    }

    // ── Selections ─────────────────────────────────────────────────────

    pub fn process_selections(&mut self) -> Result<(), CellError> {
        for selection in self.selections.drain() {
            self.perform(selection)?;
        }
        Ok(())
    }

    fn perform(&mut self, selection: CellSelection) -> Result<(), CellError> {
        let Some(index) = self.index_of(selection.message_id) else {
            warn!(message = selection.message_id, "selection for a message that no longer exists");
            return Ok(());
        };
        info!(action = ?selection.action, message = selection.message_id, "performing action");

        match selection.action {
            MessageAction::Copy => {
                let text = self.messages[index].content.clone();
                self.copy_to_clipboard(text, "Copied to clipboard");
            }
            MessageAction::Share => {
                let message = &self.messages[index];
                let text = format!(
                    "{} · {}\n\n{}",
                    role_label(message.role),
                    message.timestamp.format("%Y-%m-%d %H:%M"),
                    message.content
                );
                self.copy_to_clipboard(text, "Shared to clipboard");
            }
            MessageAction::Reask => {
                self.ui.input = self.messages[index].content.clone();
                self.ui.focus = Focus::Input;
                self.ui.set_status("Edit and press Enter to ask again");
            }
            MessageAction::Regenerate => {
                let message = &mut self.messages[index];
                message.content.clear();
                message.streaming = true;
                message.speaking = false;
                let id = message.id;
                self.start_stream(id);
                self.reconfigure(index)?;
                self.ui.set_status("Regenerating...");
            }
            MessageAction::Visualize => {
                self.ui.set_status("Visualization needs a connected backend");
            }
            MessageAction::StopStream => {
                self.streams.remove(&selection.message_id);
                self.messages[index].streaming = false;
                self.reconfigure(index)?;
                self.ui.set_status("Stopped");
            }
            MessageAction::SpeakOn => {
                self.messages[index].speaking = true;
                self.reconfigure(index)?;
                self.ui.set_status("Speaking...");
            }
            MessageAction::SpeakOff => {
                self.messages[index].speaking = false;
                self.reconfigure(index)?;
                self.ui.set_status("Stopped speaking");
            }
        }
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: String, done: &str) {
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.ui.set_status(done),
            Err(e) => {
                warn!(error = %e, "clipboard unavailable");
                self.ui.set_status(format!("Clipboard unavailable: {}", e));
            }
        }
    }

    // ── Keyboard focus ─────────────────────────────────────────────────

    /// Messages whose strip has something to focus, top to bottom.
    fn focusable_messages(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.strip().is_visible() && c.strip().state() == StripState::Loaded)
            .map(|(i, _)| i)
            .collect()
    }

    /// Move focus to the next strip up the chat, wrapping back to the input.
    pub fn focus_next_strip(&mut self) {
        let targets = self.focusable_messages();
        let next = match self.ui.focus {
            Focus::Input => targets.last().copied(),
            Focus::Actions { message, .. } => targets.iter().rev().find(|&&i| i < message).copied(),
        };
        self.ui.focus = match next {
            Some(message) => Focus::Actions { message, button: 0 },
            None => Focus::Input,
        };
        self.scroll_focused_into_view();
    }

    pub fn move_focus(&mut self, delta: i32) {
        let Focus::Actions { message, button } = self.ui.focus else {
            return;
        };
        let count = self.cells[message].strip().buttons().len();
        if count == 0 {
            return;
        }
        let max = i32::try_from(count - 1).unwrap_or(i32::MAX);
        let moved = (i32::try_from(button).unwrap_or(0) + delta).clamp(0, max);
        self.ui.focus = Focus::Actions {
            message,
            button: usize::try_from(moved).unwrap_or(0),
        };
        self.scroll_focused_into_view();
    }

    pub fn activate_focused(&mut self) -> Result<(), CellError> {
        let Focus::Actions { message, button } = self.ui.focus else {
            return Ok(());
        };
        let strip = self.cells[message].strip_mut();
        if let Some(target) = strip.button_ref(button) {
            strip.activate(target);
        }
        self.process_selections()
    }

    pub fn leave_focus(&mut self) {
        self.ui.focus = Focus::Input;
    }

    fn scroll_focused_into_view(&mut self) {
        if let Focus::Actions { message, button } = self.ui.focus {
            self.cells[message].strip_mut().scroll_to_button(button);
        }
    }

    fn clamp_focus(&mut self) {
        let Focus::Actions { message, button } = self.ui.focus else {
            return;
        };
        match self.cells.get(message).map(|c| c.strip()) {
            Some(strip) if strip.is_visible() && !strip.buttons().is_empty() => {
                let button = button.min(strip.buttons().len() - 1);
                self.ui.focus = Focus::Actions { message, button };
            }
            _ => self.ui.focus = Focus::Input,
        }
    }

    // ── Chat scrolling ─────────────────────────────────────────────────

    pub fn scroll_up(&mut self) {
        let limit = self.messages.len().saturating_sub(1);
        self.ui.scroll_offset = (self.ui.scroll_offset + self.config.scroll_step).min(limit);
    }

    pub fn scroll_down(&mut self) {
        self.ui.scroll_offset = self.ui.scroll_offset.saturating_sub(self.config.scroll_step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        App::new(Config::default(), None, Rc::new(ManualClock::new()))
    }

    fn finish_streams(app: &mut App) {
        for _ in 0..OFFLINE_REPLY.len() {
            app.tick().unwrap();
        }
    }

    fn select(app: &mut App, message: usize, action: MessageAction) {
        let strip = app.cells[message].strip_mut();
        let index = strip.actions().iter().position(|a| *a == action).unwrap();
        let target = strip.button_ref(index).unwrap();
        assert!(strip.activate(target));
        app.process_selections().unwrap();
    }

    #[test]
    fn test_submit_streams_reply() {
        let mut app = app();
        app.ui.input = "hello".to_string();
        app.submit_message().unwrap();

        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.cells.len(), 2);
        assert!(app.ui.input.is_empty());
        assert_eq!(app.cells[0].strip().rendered_actions(), vec![MessageAction::Copy, MessageAction::Reask]);
        assert_eq!(app.cells[1].strip().rendered_actions(), vec![MessageAction::StopStream]);

        finish_streams(&mut app);
        assert_eq!(app.messages[1].content, OFFLINE_REPLY);
        assert!(!app.messages[1].streaming);
        assert_eq!(app.cells[1].strip().rendered_actions()[0], MessageAction::Copy);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut app = app();
        app.ui.input = "   ".to_string();
        app.submit_message().unwrap();
        assert!(app.messages.is_empty());
    }

    #[test]
    fn test_stop_stream_keeps_partial_reply() {
        let mut app = app();
        app.ui.input = "hello".to_string();
        app.submit_message().unwrap();
        app.tick().unwrap();

        select(&mut app, 1, MessageAction::StopStream);
        assert!(!app.messages[1].streaming);
        let partial = app.messages[1].content.clone();
        app.tick().unwrap();
        assert_eq!(app.messages[1].content, partial);
        assert_eq!(app.ui.status_message.as_deref(), Some("Stopped"));
    }

    #[test]
    fn test_regenerate_restarts_reply() {
        let mut app = app();
        app.ui.input = "hello".to_string();
        app.submit_message().unwrap();
        finish_streams(&mut app);

        select(&mut app, 1, MessageAction::Regenerate);
        assert!(app.messages[1].streaming);
        assert!(app.messages[1].content.is_empty());
        assert_eq!(app.cells[1].strip().rendered_actions(), vec![MessageAction::StopStream]);
    }

    #[test]
    fn test_speak_toggle_swaps_button() {
        let mut app = app();
        app.push_message(Role::Assistant, "answer").unwrap();

        select(&mut app, 0, MessageAction::SpeakOn);
        assert!(app.messages[0].speaking);
        assert!(app.cells[0].strip().actions().contains(&MessageAction::SpeakOff));

        select(&mut app, 0, MessageAction::SpeakOff);
        assert!(!app.messages[0].speaking);
        assert!(app.cells[0].strip().actions().contains(&MessageAction::SpeakOn));
    }

    #[test]
    fn test_reask_fills_input() {
        let mut app = app();
        app.push_message(Role::User, "what is rust?").unwrap();
        select(&mut app, 0, MessageAction::Reask);
        assert_eq!(app.ui.input, "what is rust?");
        assert_eq!(app.ui.focus, Focus::Input);
    }

    #[test]
    fn test_overrides_reach_strips() {
        let overrides = TableOverrides::new().with_label(MessageAction::Reask, "Ask again");
        let mut app = App::new(Config::default(), Some(overrides), Rc::new(ManualClock::new()));
        app.push_message(Role::User, "hi").unwrap();
        assert_eq!(app.cells[0].strip().buttons()[1].appearance.label, "Ask again");
    }

    #[test]
    fn test_missing_display_is_fatal() {
        let mut list = MessageList::default();
        list.set_data_source(Some(Rc::new(ChatDataSource { overrides: None })));
        let mut app = App::with_list(Config::default(), list, Rc::new(ManualClock::new()));
        assert_eq!(app.push_message(Role::User, "hi"), Err(CellError::MissingDisplay));
    }

    #[test]
    fn test_focus_cycles_through_strips() {
        let mut app = app();
        app.push_message(Role::User, "q").unwrap();
        app.push_message(Role::System, "note").unwrap();
        app.push_message(Role::Assistant, "a").unwrap();

        app.focus_next_strip();
        assert_eq!(app.ui.focus, Focus::Actions { message: 2, button: 0 });
        app.move_focus(10);
        assert_eq!(app.ui.focus, Focus::Actions { message: 2, button: 4 });
        app.move_focus(-1);
        assert_eq!(app.ui.focus, Focus::Actions { message: 2, button: 3 });

        // The system message has no strip and is skipped
        app.focus_next_strip();
        assert_eq!(app.ui.focus, Focus::Actions { message: 0, button: 0 });
        app.focus_next_strip();
        assert_eq!(app.ui.focus, Focus::Input);
    }

    #[test]
    fn test_focus_clamped_after_reload() {
        let mut app = app();
        app.ui.input = "hello".to_string();
        app.submit_message().unwrap();
        finish_streams(&mut app);

        app.ui.focus = Focus::Actions { message: 1, button: 2 };
        app.activate_focused().unwrap();
        // Regenerate leaves a single Stop button
        assert_eq!(app.ui.focus, Focus::Actions { message: 1, button: 0 });
    }
}
