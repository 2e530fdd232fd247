// SPDX-License-Identifier: MIT
//! # goose-core: the calculator without a terminal
//!
//! Everything here is a pure function of its inputs and an `Instant` passed
//! in by the caller. No I/O, no clocks, no threads.
//!
//! ```text
//! Event ──► keymap::map_key ──► Intent
//!                                  │
//!                                  ▼
//!                   session::Session::handle
//!                   ├── grid:       cursor moves, mouse hit-test
//!                   ├── feedback:   300ms press highlight
//!                   └── calculator: Button → Command → next state
//!                                        │
//!                                        └── number: parse / format
//! ```

pub mod button;
pub mod calculator;
pub mod error;
pub mod feedback;
pub mod grid;
pub mod keymap;
pub mod number;
pub mod session;

pub use button::{Button, ButtonKind, Command, Operator};
pub use calculator::{Calculator, ERROR_MARKER, Mode};
pub use error::EvaluationError;
pub use feedback::{Activation, FEEDBACK_TTL, Feedback, PressMarker};
pub use grid::{ButtonGrid, Direction, GridGeometry, GridPos};
pub use keymap::{BINDINGS, Intent, map_key};
pub use session::{Response, Session};
