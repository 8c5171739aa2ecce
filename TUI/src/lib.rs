//! Contextual action strips for chat messages, rendered with ratatui.
//!
//! The core is [`strip::ActionStrip`]: an ordered row of buttons whose labels
//! and icons come from [`action::MessageAction`]'s catalog or a host supplied
//! [`resolver::ActionOverrides`], sized by [`sizing::SizeEstimator`] and
//! pulsed by [`feedback::SelectionFeedback`] after a tap. Everything runs on
//! the single UI thread; time comes from an injected [`clock::Clock`].

pub mod action;
pub mod app;
pub mod cell;
pub mod clock;
pub mod config;
pub mod feedback;
pub mod host;
pub mod icons;
pub mod message;
pub mod resolver;
pub mod sizing;
pub mod strip;
pub mod ui;
pub mod ui_state;
