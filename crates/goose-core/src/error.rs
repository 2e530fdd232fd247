// SPDX-License-Identifier: MIT
//! Why an evaluation can fail.
//!
//! These never escape the calculator: [`Calculator`](crate::calculator::Calculator)
//! turns every one of them into the `Error` display.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// An operand is not a decimal numeral.
    #[error("invalid operand {0:?}")]
    InvalidOperand(String),

    #[error("division by zero")]
    DivisionByZero,

    /// The result is not a finite number.
    #[error("result out of range")]
    Overflow,
}
