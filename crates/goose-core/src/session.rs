// SPDX-License-Identifier: MIT
//! One calculator session: state machine, grid cursor, press feedback and
//! help toggle, driven by terminal events.
//!
//! The session knows nothing about drawing. The renderer reads it, paints,
//! and hands back the [`GridGeometry`] it used so that mouse clicks land on
//! what is actually on screen.

use std::time::Instant;

use goose_term::input::{Event, MouseButton, MouseEvent, MouseEventKind};
use tracing::debug;

use crate::button::Button;
use crate::calculator::Calculator;
use crate::feedback::{Activation, Feedback, PressMarker};
use crate::grid::{ButtonGrid, GridGeometry, GridPos};
use crate::keymap::{Intent, map_key};

/// What handling one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    /// The user asked to leave.
    pub quit: bool,
    /// A button reached the calculator.
    pub pressed: Option<Button>,
    /// Something visible changed; repaint.
    pub changed: bool,
}

impl Response {
    const IGNORED: Self = Self { quit: false, pressed: None, changed: false };
    const REDRAW: Self = Self { quit: false, pressed: None, changed: true };
    const QUIT: Self = Self { quit: true, pressed: None, changed: false };

    const fn pressed(button: Button) -> Self {
        Self { quit: false, pressed: Some(button), changed: true }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    calculator: Calculator,
    grid: ButtonGrid,
    cursor: GridPos,
    feedback: Feedback,
    show_help: bool,
    geometry: Option<GridGeometry>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session on the standard grid, cursor on the top-left button.
    #[must_use]
    pub fn new() -> Self {
        Self::with_grid(ButtonGrid::standard())
    }

    #[must_use]
    pub fn with_grid(grid: ButtonGrid) -> Self {
        Self {
            calculator: Calculator::new(),
            grid,
            cursor: GridPos::default(),
            feedback: Feedback::new(),
            show_help: false,
            geometry: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    #[must_use]
    pub const fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    #[must_use]
    pub const fn grid(&self) -> &ButtonGrid {
        &self.grid
    }

    #[must_use]
    pub const fn cursor(&self) -> GridPos {
        self.cursor
    }

    #[must_use]
    pub const fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// The press highlight to draw at `now`, if any.
    #[must_use]
    pub fn active_press(&self, now: Instant) -> Option<PressMarker> {
        self.feedback.active(now)
    }

    #[must_use]
    pub const fn show_help(&self) -> bool {
        self.show_help
    }

    /// Where the grid was drawn last frame. `None` when it wasn't drawn.
    #[must_use]
    pub const fn geometry(&self) -> Option<&GridGeometry> {
        self.geometry.as_ref()
    }

    /// Record where the grid was drawn, or that it wasn't.
    pub fn set_geometry(&mut self, geometry: Option<GridGeometry>) {
        self.geometry = geometry;
    }

    // ── Events ───────────────────────────────────────────────────

    /// Apply one terminal event.
    pub fn handle(&mut self, event: &Event, now: Instant) -> Response {
        match event {
            Event::Key(key) => map_key(key).map_or(Response::IGNORED, |i| self.apply(i, now)),
            Event::Mouse(mouse) => self.click(mouse, now),
        }
    }

    /// Apply one intent, bypassing the key map.
    pub fn apply(&mut self, intent: Intent, now: Instant) -> Response {
        match intent {
            Intent::Press(button) => {
                if let Some(pos) = self.grid.position_of(button) {
                    self.feedback.mark(pos, Activation::DirectKeyboard, now);
                }
                self.press(button)
            }
            Intent::Activate => self.press_cell(self.cursor, now),
            Intent::Move(dir) => {
                let next = self.grid.step(self.cursor, dir);
                if next == self.cursor {
                    return Response::IGNORED;
                }
                self.cursor = next;
                Response::REDRAW
            }
            Intent::ToggleHelp => {
                self.show_help = !self.show_help;
                Response::REDRAW
            }
            Intent::Quit => {
                debug!("quit requested");
                Response::QUIT
            }
        }
    }

    /// Drop an expired press highlight. Returns `true` if the screen is
    /// now stale.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.feedback.expire(now)
    }

    fn click(&mut self, mouse: &MouseEvent, now: Instant) -> Response {
        if mouse.kind != MouseEventKind::Press(MouseButton::Left) {
            return Response::IGNORED;
        }
        let Some(pos) = self.geometry.as_ref().and_then(|g| g.hit_test(mouse.x, mouse.y)) else {
            return Response::IGNORED;
        };
        self.press_cell(pos, now)
    }

    fn press_cell(&mut self, pos: GridPos, now: Instant) -> Response {
        let Some(button) = self.grid.get(pos) else {
            return Response::IGNORED;
        };
        self.feedback.mark(pos, Activation::Navigation, now);
        self.press(button)
    }

    fn press(&mut self, button: Button) -> Response {
        self.calculator.press(button);
        Response::pressed(button)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use goose_term::input::{KeyCode, KeyEvent, Modifiers};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::button::Operator;
    use crate::feedback::FEEDBACK_TTL;
    use crate::grid::Direction;

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c)))
    }

    fn code(k: KeyCode) -> Event {
        Event::Key(KeyEvent::new(k))
    }

    fn click(x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Press(MouseButton::Left),
            x,
            y,
            modifiers: Modifiers::empty(),
        })
    }

    fn type_keys(s: &mut Session, keys: &str, now: Instant) {
        for c in keys.chars() {
            s.handle(&key(c), now);
        }
    }

    /// Standard grid at the origin, 5×1 buttons, one column of gap.
    fn laid_out() -> Session {
        let mut s = Session::new();
        let geo = GridGeometry::new(s.grid(), (0, 0), (5, 1), (1, 0));
        s.set_geometry(Some(geo));
        s
    }

    #[test]
    fn starts_cleared() {
        let s = Session::new();
        assert_eq!(s.calculator().display(), "0");
        assert_eq!(s.cursor(), GridPos::new(0, 0));
        assert!(!s.show_help());
        assert!(s.geometry().is_none());
    }

    #[test]
    fn typed_expression_evaluates() {
        let now = Instant::now();
        let mut s = Session::new();
        type_keys(&mut s, "12+30=", now);
        assert_eq!(s.calculator().display(), "42");
        assert_eq!(s.calculator().previous_display(), "12 + 30 = 42");
    }

    #[test]
    fn direct_press_marks_its_button() {
        let now = Instant::now();
        let mut s = Session::new();
        let r = s.handle(&key('5'), now);
        assert_eq!(r, Response { quit: false, pressed: Some(Button::Digit(5)), changed: true });

        let m = s.active_press(now).unwrap();
        assert_eq!(m.pos, GridPos::new(2, 1));
        assert_eq!(m.kind, Activation::DirectKeyboard);
    }

    #[test]
    fn honk_key_marks_honk_cell() {
        let now = Instant::now();
        let mut s = Session::new();
        s.handle(&key('H'), now);
        assert_eq!(s.active_press(now).map(|m| m.pos), Some(GridPos::new(4, 2)));
        assert!(s.calculator().is_finished());
    }

    #[test]
    fn activate_presses_cursor_cell() {
        let now = Instant::now();
        let mut s = Session::new();
        s.handle(&code(KeyCode::Down), now);
        s.handle(&code(KeyCode::Right), now);
        assert_eq!(s.cursor(), GridPos::new(1, 1));

        let r = s.handle(&code(KeyCode::Enter), now);
        assert_eq!(r.pressed, Some(Button::Digit(8)));
        assert_eq!(s.calculator().display(), "8");
        let m = s.active_press(now).unwrap();
        assert_eq!((m.pos, m.kind), (GridPos::new(1, 1), Activation::Navigation));

        s.handle(&key(' '), now);
        assert_eq!(s.calculator().display(), "88");
    }

    #[test]
    fn move_against_an_edge_changes_nothing() {
        let now = Instant::now();
        let mut s = Session::new();
        assert_eq!(s.handle(&code(KeyCode::Up), now), Response::default());
        assert_eq!(s.handle(&key('h'), now), Response::default());
        let r = s.handle(&key('l'), now);
        assert!(r.changed);
        assert_eq!(r.pressed, None);
    }

    #[test]
    fn quit_keys() {
        let now = Instant::now();
        for event in [key('q'), code(KeyCode::Escape), Event::Key(KeyEvent::ctrl('c'))] {
            let mut s = Session::new();
            let r = s.handle(&event, now);
            assert!(r.quit, "{event:?}");
            assert_eq!(r.pressed, None);
        }
    }

    #[test]
    fn help_toggles() {
        let now = Instant::now();
        let mut s = Session::new();
        assert!(s.handle(&key('?'), now).changed);
        assert!(s.show_help());
        s.handle(&key('?'), now);
        assert!(!s.show_help());
    }

    #[test]
    fn unmapped_key_is_ignored() {
        let now = Instant::now();
        let mut s = Session::new();
        type_keys(&mut s, "7", now);
        let before = s.calculator().clone();
        assert_eq!(s.handle(&key('z'), now), Response::default());
        assert_eq!(s.calculator(), &before);
    }

    // ── Mouse ────────────────────────────────────────────────────

    #[test]
    fn click_presses_the_cell_under_the_pointer() {
        let now = Instant::now();
        let mut s = laid_out();
        // Row 1, col 2 is "9": x in 12..17, y = 1.
        let r = s.handle(&click(14, 1), now);
        assert_eq!(r.pressed, Some(Button::Digit(9)));
        let m = s.active_press(now).unwrap();
        assert_eq!((m.pos, m.kind), (GridPos::new(1, 2), Activation::Navigation));
        assert_eq!(s.cursor(), GridPos::new(0, 0), "clicks leave the cursor alone");
    }

    #[test]
    fn click_on_gap_or_outside_is_ignored() {
        let now = Instant::now();
        let mut s = laid_out();
        assert_eq!(s.handle(&click(5, 0), now), Response::default());
        assert_eq!(s.handle(&click(0, 9), now), Response::default());
        assert_eq!(s.calculator().display(), "0");
    }

    #[test]
    fn click_without_geometry_is_ignored() {
        let now = Instant::now();
        let mut s = Session::new();
        assert_eq!(s.handle(&click(0, 0), now), Response::default());
    }

    #[test]
    fn only_left_presses_count() {
        let now = Instant::now();
        let mut s = laid_out();
        let release = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Release(MouseButton::Left),
            x: 0,
            y: 1,
            modifiers: Modifiers::empty(),
        });
        let right = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Press(MouseButton::Right),
            x: 0,
            y: 1,
            modifiers: Modifiers::empty(),
        });
        assert_eq!(s.handle(&release, now), Response::default());
        assert_eq!(s.handle(&right, now), Response::default());
    }

    #[test]
    fn clicked_operator_reaches_calculator() {
        let now = Instant::now();
        let mut s = laid_out();
        type_keys(&mut s, "6", now);
        // Row 0, col 3 is "÷".
        s.handle(&click(18, 0), now);
        assert_eq!(s.calculator().operator(), Some(Operator::Divide));
    }

    // ── Tick ─────────────────────────────────────────────────────

    #[test]
    fn tick_expires_feedback() {
        let t0 = Instant::now();
        let mut s = Session::new();
        s.handle(&key('1'), t0);
        assert!(!s.tick(t0 + Duration::from_millis(100)));
        assert!(s.active_press(t0 + Duration::from_millis(100)).is_some());
        assert!(s.tick(t0 + FEEDBACK_TTL));
        assert!(!s.tick(t0 + FEEDBACK_TTL));
        assert!(s.feedback().active(t0).is_none());
    }

    #[test]
    fn apply_bypasses_keymap() {
        let now = Instant::now();
        let mut s = Session::new();
        s.apply(Intent::Move(Direction::Down), now);
        assert_eq!(s.cursor(), GridPos::new(1, 0));
    }
}
