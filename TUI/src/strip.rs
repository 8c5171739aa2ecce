//! Horizontal strip of action buttons attached to a chat message.
//!
//! The strip owns the ordered action list and the rendered buttons, which are
//! kept 1:1 by position. Replacing the action list always rebuilds every
//! button and bumps a generation counter, so any [`ButtonRef`] handed out
//! before the reload stops being live.

use std::rc::{Rc, Weak};

use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use tracing::{debug, trace};

use crate::action::MessageAction;
use crate::clock::{Clock, SystemClock};
use crate::feedback::{FeedbackTimings, SelectionFeedback};
use crate::host::{ActionListener, ButtonRef, StripHost};
use crate::icons;
use crate::resolver::{resolve, ActionOverrides, ResolvedAppearance};
use crate::sizing::{label_width, ButtonSize, ButtonStyle, SizeEstimator};

/// Spacing around and between buttons, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripStyle {
    /// Inset before the first and after the last button
    pub side_padding: u16,
    /// Gap between neighbouring buttons
    pub spacing: u16,
    /// Empty rows kept under the buttons
    pub bottom_padding: u16,
}

impl Default for StripStyle {
    fn default() -> Self {
        Self {
            side_padding: 1,
            spacing: 1,
            bottom_padding: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripState {
    Empty,
    Loaded,
}

/// One rendered button.
#[derive(Debug, Clone, PartialEq)]
pub struct StripButton {
    pub action: MessageAction,
    pub appearance: ResolvedAppearance,
    pub size: ButtonSize,
    /// Distance from the start of the strip content to the button
    pub offset: u16,
}

pub struct ActionStrip {
    actions: Vec<MessageAction>,
    buttons: Vec<StripButton>,
    base_color: Option<Color>,
    visible: bool,
    generation: u64,
    bounds: Rect,
    scroll: u16,
    leading_inset: u16,
    style: StripStyle,
    estimator: SizeEstimator,
    overrides: Option<Weak<dyn ActionOverrides>>,
    listener: Option<Weak<dyn ActionListener>>,
    feedback: SelectionFeedback,
    clock: Rc<dyn Clock>,
}

impl ActionStrip {
    pub fn new() -> Self {
        Self::with_style(ButtonStyle::default(), StripStyle::default(), FeedbackTimings::default())
    }

    pub fn with_style(button: ButtonStyle, style: StripStyle, timings: FeedbackTimings) -> Self {
        Self {
            actions: Vec::new(),
            buttons: Vec::new(),
            base_color: None,
            visible: true,
            generation: 0,
            bounds: Rect::default(),
            scroll: 0,
            leading_inset: style.side_padding,
            style,
            estimator: SizeEstimator::new(button),
            overrides: None,
            listener: None,
            feedback: SelectionFeedback::new(timings),
            clock: Rc::new(SystemClock),
        }
    }

    /// Use `clock` for scheduling feedback.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // ── Configuration ──────────────────────────────────────────────────

    /// Replace the whole action list and rebuild every button.
    pub fn set_actions(&mut self, actions: Vec<MessageAction>) {
        self.actions = actions;
        self.generation = self.generation.wrapping_add(1);
        self.rebuild_buttons();
        debug!(count = self.actions.len(), generation = self.generation, "action strip reloaded");
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_base_color(&mut self, color: Option<Color>) {
        self.base_color = color;
    }

    pub fn set_leading_inset(&mut self, inset: u16) {
        self.leading_inset = inset;
        self.rebuild_buttons();
    }

    pub fn set_override_provider(&mut self, provider: Option<&Rc<dyn ActionOverrides>>) {
        self.overrides = provider.map(Rc::downgrade);
        self.rebuild_buttons();
    }

    pub fn set_listener(&mut self, listener: Option<&Rc<dyn ActionListener>>) {
        self.listener = listener.map(Rc::downgrade);
    }

    /// Reset and apply everything `host` supplies.
    pub fn configure(&mut self, host: &dyn StripHost) {
        self.reset();
        self.set_base_color(host.action_tint());
        self.set_actions(host.actions());
        self.set_visible(host.actions_visible());
    }

    /// Return to Empty + Hidden before the strip is reused for another message.
    pub fn reset(&mut self) {
        self.actions.clear();
        self.buttons.clear();
        self.generation = self.generation.wrapping_add(1);
        self.visible = false;
        self.base_color = None;
        self.scroll = 0;
        self.leading_inset = self.style.side_padding;
        self.bounds = Rect::default();
        self.feedback.clear();
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn state(&self) -> StripState {
        if self.actions.is_empty() {
            StripState::Empty
        } else {
            StripState::Loaded
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn actions(&self) -> &[MessageAction] {
        &self.actions
    }

    pub fn buttons(&self) -> &[StripButton] {
        &self.buttons
    }

    pub fn rendered_actions(&self) -> Vec<MessageAction> {
        self.buttons.iter().map(|b| b.action).collect()
    }

    pub fn base_color(&self) -> Option<Color> {
        self.base_color
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll
    }

    pub fn feedback(&self) -> &SelectionFeedback {
        &self.feedback
    }

    /// Width of all buttons plus padding; zero when empty.
    pub fn content_width(&self) -> u16 {
        match self.buttons.last() {
            Some(last) => last
                .offset
                .saturating_add(last.size.width)
                .saturating_add(self.style.side_padding),
            None => 0,
        }
    }

    /// Rows the strip needs when shown.
    pub fn desired_height(&self) -> u16 {
        self.estimator.style().height + self.style.bottom_padding
    }

    pub fn button_ref(&self, index: usize) -> Option<ButtonRef> {
        (index < self.buttons.len()).then_some(ButtonRef {
            generation: self.generation,
            index,
        })
    }

    /// Whether `button` still points at a button of the current action list.
    pub fn is_live(&self, button: ButtonRef) -> bool {
        button.generation == self.generation && button.index < self.buttons.len()
    }

    /// Whether `point` should be routed to the strip rather than the message body.
    pub fn hit_test(&self, point: Position) -> bool {
        self.visible && !self.actions.is_empty() && self.bounds.contains(point)
    }

    /// Index of the button under `point`, if any.
    pub fn button_at(&self, point: Position) -> Option<usize> {
        if !self.hit_test(point) {
            return None;
        }
        if point.y - self.bounds.y >= self.estimator.style().height {
            return None;
        }
        let x = (point.x - self.bounds.x).saturating_add(self.scroll);
        self.buttons
            .iter()
            .position(|b| x >= b.offset && x < b.offset.saturating_add(b.size.width))
    }

    /// On-screen area of button `index` after scrolling, clipped to the strip.
    pub fn button_area(&self, index: usize) -> Option<Rect> {
        let button = self.buttons.get(index)?;
        let start = i32::from(button.offset) - i32::from(self.scroll);
        let end = start + i32::from(button.size.width);
        let left = start.max(0);
        let right = end.min(i32::from(self.bounds.width));
        if right <= left {
            return None;
        }
        let height = button.size.height.min(self.bounds.height);
        Some(Rect::new(
            self.bounds.x + u16::try_from(left).ok()?,
            self.bounds.y,
            u16::try_from(right - left).ok()?,
            height,
        ))
    }

    // ── Selection ──────────────────────────────────────────────────────

    /// Handle a tap at `point`. Returns whether a button was selected.
    pub fn tap(&mut self, point: Position) -> bool {
        match self.button_at(point).and_then(|i| self.button_ref(i)) {
            Some(button) => self.activate(button),
            None => false,
        }
    }

    /// Select `button`. Stale handles are ignored.
    ///
    /// The listener is notified before the feedback pulse is scheduled.
    /// Repeated selections of the same button are all delivered.
    pub fn activate(&mut self, button: ButtonRef) -> bool {
        if !self.visible || !self.is_live(button) {
            debug!(index = button.index, "ignoring selection of a button that is gone");
            return false;
        }
        let action = self.actions[button.index];
        debug!(?action, index = button.index, "action selected");

        if let Some(listener) = self.listener.as_ref().and_then(Weak::upgrade) {
            listener.on_action_selected(action, button);
        }
        self.feedback.play(button, self.clock.now());
        true
    }

    // ── Scrolling ──────────────────────────────────────────────────────

    pub fn max_scroll(&self) -> u16 {
        self.content_width().saturating_sub(self.bounds.width)
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.max_scroll()));
        self.scroll = u16::try_from(next).unwrap_or(0);
    }

    /// Scroll the least amount needed to bring button `index` into view.
    pub fn scroll_to_button(&mut self, index: usize) {
        let Some(button) = self.buttons.get(index) else {
            return;
        };
        // Nothing to scroll within until the strip has been rendered
        if self.bounds.width == 0 {
            return;
        }
        let start = button.offset;
        let end = button.offset.saturating_add(button.size.width);
        let viewport = self.bounds.width;
        if start < self.scroll {
            self.scroll = start;
        } else if end > self.scroll.saturating_add(viewport) {
            self.scroll = end.saturating_sub(viewport).min(start);
        }
        self.scroll = self.scroll.min(self.max_scroll());
    }

    // ── Rendering ──────────────────────────────────────────────────────

    /// Forget the rendered bounds, e.g. when the strip scrolls out of view.
    pub fn clear_bounds(&mut self) {
        self.bounds = Rect::default();
    }

    /// Fire due feedback and retire finished pulses.
    pub fn tick(&mut self) {
        let generation = self.generation;
        let len = self.buttons.len();
        self.feedback
            .advance(self.clock.now(), move |b| b.generation == generation && b.index < len);
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.bounds = area;
        // Overrides may have changed since the last pass
        self.rebuild_buttons();
        self.tick();
        self.scroll = self.scroll.min(self.max_scroll());

        if !self.visible || self.buttons.is_empty() || area.is_empty() {
            return;
        }
        trace!(buttons = self.buttons.len(), width = area.width, scroll = self.scroll, "render action strip");

        let height = self.estimator.style().height.min(area.height);
        let content = Rect::new(0, 0, self.content_width(), height);
        let mut scratch = Buffer::empty(content);
        let now = self.clock.now();
        for (index, button) in self.buttons.iter().enumerate() {
            let target = ButtonRef {
                generation: self.generation,
                index,
            };
            self.draw_button(button, self.feedback.scale(target, now), &mut scratch);
        }

        let blank = Cell::default();
        for dy in 0..height {
            for dx in 0..area.width {
                let src_x = dx.saturating_add(self.scroll);
                if src_x >= content.width {
                    break;
                }
                let src = &scratch[(src_x, dy)];
                if *src == blank {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((area.x + dx, area.y + dy)) {
                    *cell = src.clone();
                }
            }
        }
    }

    fn draw_button(&self, button: &StripButton, scale: f32, buf: &mut Buffer) {
        let style = self.estimator.style();
        let tint = self.base_color.unwrap_or(style.default_tint);
        let cell_style = Style::default().fg(style.foreground).bg(tint);
        let height = buf.area.height;
        let rect = Rect::new(button.offset, 0, button.size.width, height).intersection(buf.area);
        buf.set_style(rect, cell_style);

        let row = height.saturating_sub(1) / 2;
        let icon_x = button.offset.saturating_add(style.leading_inset);
        if style.icon_width > 0 {
            buf.set_stringn(
                icon_x,
                row,
                icons::glyph(&button.appearance.icon_id),
                usize::from(style.icon_width),
                cell_style,
            );
        }
        let label_x = icon_x
            .saturating_add(style.icon_width)
            .saturating_add(style.icon_padding);
        buf.set_stringn(
            label_x,
            row,
            &button.appearance.label,
            usize::from(label_width(&button.appearance.label)),
            cell_style,
        );

        let width = button.size.width;
        if scale < 1.0 && width > 0 {
            let shown = ((f32::from(width) * scale).round() as u16).clamp(1, width);
            let cut = width - shown;
            let left = cut / 2;
            let right = cut - left;
            for y in 0..height {
                for x in (0..left).chain(width - right..width) {
                    if let Some(cell) = buf.cell_mut((button.offset + x, y)) {
                        cell.reset();
                    }
                }
            }
        }
    }

    fn rebuild_buttons(&mut self) {
        let overrides = self.overrides.as_ref().and_then(Weak::upgrade);
        let mut offset = self.leading_inset;
        let mut buttons = Vec::with_capacity(self.actions.len());
        for &action in &self.actions {
            let appearance = resolve(action, overrides.as_deref());
            let size = self.estimator.measure(&appearance);
            buttons.push(StripButton {
                action,
                appearance,
                size,
                offset,
            });
            offset = offset
                .saturating_add(size.width)
                .saturating_add(self.style.spacing);
        }
        self.buttons = buttons;
    }
}

impl Default for ActionStrip {
    fn default() -> Self {
        Self::new()
    }
}
