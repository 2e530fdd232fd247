// SPDX-License-Identifier: MIT
//! # goose-theme: how the calculator looks
//!
//! A [`Theme`] is one immutable bag of resolved [`Style`]s, one per visual
//! element of the calculator: the body panel, the expression and result
//! lines, each button family, and the cursor and press highlights. The
//! renderer reads fields and copies styles into cells; no color math runs
//! while painting.
//!
//! ```text
//! Palette (a dozen hex colors)
//!     │
//!     ▼
//! contrast.rs: pick readable text for each button face
//!     │
//!     ▼
//! theme.rs:    assemble Theme, derive monochrome for NO_COLOR
//!     │
//!     ▼
//! builtin.rs:  goose, pond, paper, terminal
//! ```
//!
//! [`Style`]: goose_term::cell::Style

pub mod builtin;
pub mod contrast;
pub mod theme;

pub use builtin::{DEFAULT_THEME, builtin_names, builtin_theme};
pub use theme::{Palette, Theme};
