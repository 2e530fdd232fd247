// SPDX-License-Identifier: MIT
//! Calculator buttons and what they mean.
//!
//! A [`Button`] is what the user sees and presses. Two views are derived
//! from it, each by a pure function:
//!
//! - [`Button::kind`]: the sound family ([`ButtonKind`]), used by audio
//!   feedback and nothing else.
//! - [`Button::command`]: the canonical [`Command`] the state machine runs.
//!   `=` and HONK are different buttons but the same command.

use std::fmt;

use crate::error::EvaluationError;

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// A binary arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// The glyph shown on the button and in the expression line.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "−",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }

    /// Apply the operation to two finite operands.
    ///
    /// # Errors
    ///
    /// [`EvaluationError::DivisionByZero`] for a zero divisor (either sign),
    /// [`EvaluationError::Overflow`] when the result is not finite.
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, EvaluationError> {
        let result = match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide if rhs == 0.0 => return Err(EvaluationError::DivisionByZero),
            Self::Divide => lhs / rhs,
        };
        if result.is_finite() {
            Ok(result)
        } else {
            Err(EvaluationError::Overflow)
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// ButtonKind
// ---------------------------------------------------------------------------

/// Sound family of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    Digit,
    /// Arithmetic operators, `+/-` and `%`.
    Operator,
    /// `AC`, `=` and HONK.
    SpecialAction,
    Decimal,
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// What the state machine does for a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Digit(u8),
    Decimal,
    Operator(Operator),
    AllClear,
    ToggleSign,
    Percent,
    Evaluate,
}

impl Command {
    /// Whether the command means anything while the display shows an error.
    ///
    /// Only starting over does: a digit, a decimal point, or `AC`.
    #[must_use]
    pub const fn recovers_from_error(self) -> bool {
        matches!(self, Self::Digit(_) | Self::Decimal | Self::AllClear)
    }
}

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// One calculator button.
///
/// `Digit` holds `0..=9`; use [`Button::digit`] to build one from untrusted
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Digit(u8),
    Decimal,
    Operator(Operator),
    AllClear,
    ToggleSign,
    Percent,
    Equals,
    Honk,
}

const DIGIT_LABELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

impl Button {
    /// The digit button for `n`, or `None` if `n > 9`.
    #[must_use]
    pub const fn digit(n: u8) -> Option<Self> {
        if n <= 9 { Some(Self::Digit(n)) } else { None }
    }

    /// Text printed on the button face.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Digit(n) => {
                let idx = if n > 9 { 9 } else { n as usize };
                DIGIT_LABELS[idx]
            }
            Self::Decimal => ".",
            Self::Operator(op) => op.symbol(),
            Self::AllClear => "AC",
            Self::ToggleSign => "+/-",
            Self::Percent => "%",
            Self::Equals => "=",
            Self::Honk => "HONK",
        }
    }

    #[must_use]
    pub const fn kind(self) -> ButtonKind {
        match self {
            Self::Digit(_) => ButtonKind::Digit,
            Self::Decimal => ButtonKind::Decimal,
            Self::Operator(_) | Self::ToggleSign | Self::Percent => ButtonKind::Operator,
            Self::AllClear | Self::Equals | Self::Honk => ButtonKind::SpecialAction,
        }
    }

    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            Self::Digit(n) => Command::Digit(n),
            Self::Decimal => Command::Decimal,
            Self::Operator(op) => Command::Operator(op),
            Self::AllClear => Command::AllClear,
            Self::ToggleSign => Command::ToggleSign,
            Self::Percent => Command::Percent,
            Self::Equals | Self::Honk => Command::Evaluate,
        }
    }

    /// `=` or HONK: the buttons after which the result is marked finished.
    #[inline]
    #[must_use]
    pub const fn is_evaluate(self) -> bool {
        matches!(self, Self::Equals | Self::Honk)
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
