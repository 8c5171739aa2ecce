//! Message cell: the host that wires one message to its action strip.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use ratatui::layout::Position;
use ratatui::style::Color;
use thiserror::Error;

use crate::action::MessageAction;
use crate::host::{ActionListener, ButtonRef, StripHost};
use crate::message::Message;
use crate::resolver::ActionOverrides;
use crate::strip::ActionStrip;

/// Leading inset for messages the local user sent.
pub const OUTGOING_INSET: u16 = 1;
/// Leading inset for everybody else's messages.
pub const INCOMING_INSET: u16 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellError {
    #[error("message list has no display context")]
    MissingDisplay,
    #[error("message list has no data source")]
    MissingDataSource,
}

/// Presentation decisions the list makes per message.
pub trait MessageDisplay {
    fn action_tint(&self, message: &Message) -> Option<Color>;
}

/// Content decisions the list makes per message.
pub trait MessagesDataSource {
    fn is_from_current_sender(&self, message: &Message) -> bool;

    fn action_overrides(&self) -> Option<Rc<dyn ActionOverrides>> {
        None
    }
}

/// The collaborators every cell in a list is configured against.
#[derive(Default)]
pub struct MessageList {
    display: Option<Rc<dyn MessageDisplay>>,
    data_source: Option<Rc<dyn MessagesDataSource>>,
}

impl MessageList {
    pub fn new(display: Rc<dyn MessageDisplay>, data_source: Rc<dyn MessagesDataSource>) -> Self {
        Self {
            display: Some(display),
            data_source: Some(data_source),
        }
    }

    pub fn set_display(&mut self, display: Option<Rc<dyn MessageDisplay>>) {
        self.display = display;
    }

    pub fn set_data_source(&mut self, data_source: Option<Rc<dyn MessagesDataSource>>) {
        self.data_source = data_source;
    }
}

/// A selection tagged with the message it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSelection {
    pub message_id: u64,
    pub action: MessageAction,
    pub button: ButtonRef,
}

/// Selections waiting for the app to act on them.
#[derive(Debug, Default)]
pub struct SelectionQueue {
    items: RefCell<VecDeque<CellSelection>>,
}

impl SelectionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, selection: CellSelection) {
        self.items.borrow_mut().push_back(selection);
    }

    pub fn drain(&self) -> Vec<CellSelection> {
        self.items.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

struct CellListener {
    message_id: Cell<Option<u64>>,
    queue: Weak<SelectionQueue>,
}

impl ActionListener for CellListener {
    fn on_action_selected(&self, action: MessageAction, button: ButtonRef) {
        let (Some(message_id), Some(queue)) = (self.message_id.get(), self.queue.upgrade()) else {
            return;
        };
        queue.push(CellSelection {
            message_id,
            action,
            button,
        });
    }
}

struct CellHost<'a> {
    message: &'a Message,
    tint: Option<Color>,
}

impl StripHost for CellHost<'_> {
    fn actions(&self) -> Vec<MessageAction> {
        self.message.actions()
    }

    fn actions_visible(&self) -> bool {
        self.message.show_actions()
    }

    fn action_tint(&self) -> Option<Color> {
        self.tint
    }
}

pub struct MessageCell {
    strip: ActionStrip,
    listener: Rc<CellListener>,
    overrides: Option<Rc<dyn ActionOverrides>>,
    message_id: Option<u64>,
}

impl MessageCell {
    pub fn new(mut strip: ActionStrip, queue: &Rc<SelectionQueue>) -> Self {
        let listener = Rc::new(CellListener {
            message_id: Cell::new(None),
            queue: Rc::downgrade(queue),
        });
        let handle: Rc<dyn ActionListener> = listener.clone();
        strip.set_listener(Some(&handle));
        Self {
            strip,
            listener,
            overrides: None,
            message_id: None,
        }
    }

    /// Show `message` in this cell.
    ///
    /// Fails when the list is missing a collaborator; continuing would show
    /// an unlabeled or untinted strip.
    pub fn configure(&mut self, message: &Message, list: &MessageList) -> Result<(), CellError> {
        let display = list.display.as_ref().ok_or(CellError::MissingDisplay)?;
        let data_source = list.data_source.as_ref().ok_or(CellError::MissingDataSource)?;

        self.overrides = data_source.action_overrides();
        self.strip.set_override_provider(self.overrides.as_ref());
        self.strip.configure(&CellHost {
            message,
            tint: display.action_tint(message),
        });
        let inset = if data_source.is_from_current_sender(message) {
            OUTGOING_INSET
        } else {
            INCOMING_INSET
        };
        self.strip.set_leading_inset(inset);

        self.listener.message_id.set(Some(message.id));
        self.message_id = Some(message.id);
        Ok(())
    }

    /// Clear everything before the cell shows a different message.
    pub fn prepare_for_reuse(&mut self) {
        self.strip.reset();
        self.strip.set_override_provider(None);
        self.overrides = None;
        self.listener.message_id.set(None);
        self.message_id = None;
    }

    pub fn message_id(&self) -> Option<u64> {
        self.message_id
    }

    /// Whether a tap at `point` belongs to this cell's strip.
    pub fn can_handle(&self, point: Position) -> bool {
        self.strip.hit_test(point)
    }

    pub fn strip(&self) -> &ActionStrip {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut ActionStrip {
        &mut self.strip
    }
}
