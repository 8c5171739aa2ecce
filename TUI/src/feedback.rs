//! Press pulse played on a button after a selection has been delivered.
//!
//! The pulse is cosmetic. It is scheduled a few milliseconds after the tap so
//! a reload triggered by the listener can settle first; if the target button
//! is gone by then the pulse is dropped without a trace beyond a debug log.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::host::ButtonRef;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackTimings {
    /// Wait before the pulse starts
    pub delay: Duration,
    /// Time to shrink to `min_scale`
    pub shrink: Duration,
    /// Time to spring back to full size
    pub spring: Duration,
    pub min_scale: f32,
}

impl Default for FeedbackTimings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(10),
            shrink: Duration::from_millis(100),
            spring: Duration::from_millis(300),
            min_scale: 0.85,
        }
    }
}

impl FeedbackTimings {
    pub fn total(&self) -> Duration {
        self.shrink + self.spring
    }
}

fn smoothstep(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    p * p * (3.0 - 2.0 * p)
}

fn progress(elapsed: Duration, span: Duration) -> f32 {
    if span.is_zero() {
        1.0
    } else {
        elapsed.as_secs_f32() / span.as_secs_f32()
    }
}

/// Scale of a pulsing button `elapsed` after the pulse started.
pub fn pulse_scale(timings: &FeedbackTimings, elapsed: Duration) -> f32 {
    let depth = 1.0 - timings.min_scale;
    if elapsed < timings.shrink {
        1.0 - depth * smoothstep(progress(elapsed, timings.shrink))
    } else if elapsed < timings.total() {
        let back = smoothstep(progress(elapsed - timings.shrink, timings.spring));
        timings.min_scale + depth * back
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    target: ButtonRef,
    fire_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct Active {
    target: ButtonRef,
    started_at: Instant,
}

#[derive(Debug, Default)]
pub struct SelectionFeedback {
    timings: FeedbackTimings,
    pending: Vec<Pending>,
    active: Vec<Active>,
}

impl SelectionFeedback {
    pub fn new(timings: FeedbackTimings) -> Self {
        Self {
            timings,
            pending: Vec::new(),
            active: Vec::new(),
        }
    }

    pub fn timings(&self) -> &FeedbackTimings {
        &self.timings
    }

    /// Schedule a pulse on `target`, starting `delay` after `now`.
    pub fn play(&mut self, target: ButtonRef, now: Instant) {
        self.pending.push(Pending {
            target,
            fire_at: now + self.timings.delay,
        });
    }

    /// Fire due pulses whose target is still live and retire finished ones.
    pub fn advance(&mut self, now: Instant, is_live: impl Fn(ButtonRef) -> bool) {
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for pending in self.pending.drain(..) {
            if pending.fire_at > now {
                still_pending.push(pending);
            } else if is_live(pending.target) {
                self.active.push(Active {
                    target: pending.target,
                    started_at: pending.fire_at,
                });
            } else {
                debug!(index = pending.target.index, "feedback target gone, skipping pulse");
            }
        }
        self.pending = still_pending;

        let total = self.timings.total();
        self.active
            .retain(|a| is_live(a.target) && now.saturating_duration_since(a.started_at) < total);
    }

    /// Current scale of `target`; 1.0 when it is not pulsing.
    pub fn scale(&self, target: ButtonRef, now: Instant) -> f32 {
        self.active
            .iter()
            .filter(|a| a.target == target)
            .map(|a| pulse_scale(&self.timings, now.saturating_duration_since(a.started_at)))
            .fold(1.0, f32::min)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.active.clear();
    }
}
