// SPDX-License-Identifier: MIT
//! Short-lived press highlight.
//!
//! A press marks its button for [`FEEDBACK_TTL`]. Nothing runs a timer:
//! the marker carries the instant it was made, and readers compare that
//! against the `now` they are given. The event loop's tick calls
//! [`Feedback::expire`] to learn when a repaint is due.

use std::time::{Duration, Instant};

use crate::grid::GridPos;

/// How long a press stays highlighted.
pub const FEEDBACK_TTL: Duration = Duration::from_millis(300);

/// How a button got pressed; the renderer highlights the two differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activation {
    /// Enter or Space on the cursor cell, or a mouse click.
    Navigation,
    /// The button's own shortcut key.
    DirectKeyboard,
}

/// One highlighted press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressMarker {
    pub pos: GridPos,
    pub kind: Activation,
    pub at: Instant,
}

impl PressMarker {
    #[must_use]
    pub fn is_live(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.at) < ttl
    }
}

/// At most one press marker, newest wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    marker: Option<PressMarker>,
    ttl: Duration,
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new()
    }
}

impl Feedback {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_ttl(FEEDBACK_TTL)
    }

    #[must_use]
    pub const fn with_ttl(ttl: Duration) -> Self {
        Self { marker: None, ttl }
    }

    /// Highlight `pos`, replacing any earlier marker.
    pub fn mark(&mut self, pos: GridPos, kind: Activation, now: Instant) {
        self.marker = Some(PressMarker { pos, kind, at: now });
    }

    /// Drop the marker once its time is up. Returns `true` if one was
    /// dropped, meaning the screen is stale.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.marker {
            Some(m) if !m.is_live(now, self.ttl) => {
                self.marker = None;
                true
            }
            _ => false,
        }
    }

    /// The marker, if it is still live at `now`.
    ///
    /// A marker past its time is never reported, even if `expire` hasn't
    /// run yet.
    #[must_use]
    pub fn active(&self, now: Instant) -> Option<PressMarker> {
        self.marker.filter(|m| m.is_live(now, self.ttl))
    }

    pub fn clear(&mut self) {
        self.marker = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
