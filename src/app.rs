// SPDX-License-Identifier: MIT
//
// The calculator as an event-loop application.
//
//   on_event → Session::handle → chime for the pressed button
//   on_tick  → Session::tick (press highlight expiry)
//   paint    → view::paint, whose grid geometry goes back to the session
//              for the next mouse click

use std::time::Instant;

use goose_core::Session;
use goose_term::buffer::FrameBuffer;
use goose_term::event_loop::{Action, App};
use goose_term::input::Event;
use goose_theme::Theme;
use tracing::debug;

use crate::sound::Chime;
use crate::view;

pub struct Calc {
    session: Session,
    theme: Theme,
    chime: Box<dyn Chime>,
}

impl Calc {
    #[must_use]
    pub fn new(theme: Theme, chime: Box<dyn Chime>) -> Self {
        Self {
            session: Session::new(),
            theme,
            chime,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    fn event_at(&mut self, event: &Event, now: Instant) -> Action {
        let response = self.session.handle(event, now);
        if let Some(button) = response.pressed {
            self.chime.play(button.kind());
        }
        if response.quit {
            debug!(display = self.session.calculator().display(), "leaving");
            Action::Quit
        } else {
            Action::Continue
        }
    }

    fn paint_at(&mut self, frame: &mut FrameBuffer, now: Instant) {
        let geometry = view::paint(frame, &self.session, &self.theme, now);
        self.session.set_geometry(geometry);
    }
}

impl App for Calc {
    fn on_event(&mut self, event: &Event) -> Action {
        self.event_at(event, Instant::now())
    }

    fn on_tick(&mut self, now: Instant) -> bool {
        self.session.tick(now)
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        self.paint_at(frame, Instant::now());
    }
}
