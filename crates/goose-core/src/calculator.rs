// SPDX-License-Identifier: MIT
//! The calculator state machine.
//!
//! [`Calculator::press`] takes one [`Button`] and moves the machine to its
//! next state. It never fails: every evaluation problem ends up as the
//! `Error` display, recoverable with a digit, a decimal point, or `AC`.
//!
//! The machine is always in exactly one [`Mode`]:
//!
//! | Mode              | Display shows                | Next digit          |
//! |-------------------|------------------------------|---------------------|
//! | `Idle`            | the number being typed       | appends             |
//! | `AwaitingOperand` | a captured operand or result | starts a new number |
//! | `Error`           | `Error`                      | starts a new number |

use std::fmt;

use tracing::debug;

use crate::button::{Button, Command, Operator};
use crate::error::EvaluationError;
use crate::number::{format_number, parse_operand};

/// What the display shows after a failed evaluation.
pub const ERROR_MARKER: &str = "Error";

/// Longest number that can be typed in; further digits are dropped.
///
/// Anything shorter parses to a finite `f64`.
pub const MAX_ENTRY_LEN: usize = 100;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Coarse state of the machine. `Error` wins over `AwaitingOperand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Idle,
    AwaitingOperand,
    Error,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::AwaitingOperand => "awaiting operand",
            Self::Error => "error",
        })
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Left operand and operator captured by an operator press.
///
/// Kept together so one can never be set without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    operand: String,
    operator: Operator,
}

/// Display and pending-operation state for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculator {
    display: String,
    previous_display: String,
    pending: Option<Pending>,
    awaiting_operand2: bool,
    is_error: bool,
    last_button: Option<Button>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    /// A cleared calculator showing `0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            previous_display: String::new(),
            pending: None,
            awaiting_operand2: false,
            is_error: false,
            last_button: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    /// Number being typed, last result, or [`ERROR_MARKER`].
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Expression trace: `"2 +"` while an operation is pending,
    /// `"2 + 3 = 5"` after it was evaluated.
    #[must_use]
    pub fn previous_display(&self) -> &str {
        &self.previous_display
    }

    #[must_use]
    pub fn operand1(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.operand.as_str())
    }

    #[must_use]
    pub fn operator(&self) -> Option<Operator> {
        self.pending.as_ref().map(|p| p.operator)
    }

    #[must_use]
    pub const fn awaiting_operand2(&self) -> bool {
        self.awaiting_operand2
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.is_error
    }

    #[must_use]
    pub const fn last_button(&self) -> Option<Button> {
        self.last_button
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.is_error {
            Mode::Error
        } else if self.awaiting_operand2 {
            Mode::AwaitingOperand
        } else {
            Mode::Idle
        }
    }

    /// Whether the last press was `=` or HONK, successful or not.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.last_button.is_some_and(Button::is_evaluate)
    }

    // ── Transitions ──────────────────────────────────────────────

    /// Apply one button press.
    pub fn press(&mut self, button: Button) {
        let command = button.command();
        if self.is_error && !command.recovers_from_error() {
            debug!(%button, "ignored while in error");
            return;
        }

        self.last_button = Some(button);
        self.is_error = false;

        match command {
            Command::Digit(_) => self.push_digit(button.label()),
            Command::Decimal => self.push_decimal(),
            Command::Operator(op) => self.capture_operator(op),
            Command::AllClear => self.clear(),
            Command::ToggleSign => self.toggle_sign(),
            Command::Percent => self.percent(),
            Command::Evaluate => self.evaluate(),
        }

        debug!(
            %button,
            display = %self.display,
            trace = %self.previous_display,
            mode = %self.mode(),
            "press"
        );
    }

    /// Apply a sequence of presses.
    pub fn press_all(&mut self, buttons: impl IntoIterator<Item = Button>) {
        for button in buttons {
            self.press(button);
        }
    }

    /// Replace the display with a fresh number, leaving the awaiting state.
    ///
    /// A new number typed after a finished evaluation (no operator pending)
    /// starts a new computation, so the old trace goes.
    fn start_operand(&mut self, text: &str) {
        if self.pending.is_none() {
            self.previous_display.clear();
        }
        self.display.clear();
        self.display.push_str(text);
        self.awaiting_operand2 = false;
    }

    /// Whether typing extends the display rather than replacing it.
    ///
    /// Captured operands, the error marker and exponent-form results are
    /// not extended.
    fn is_editable(&self) -> bool {
        !self.awaiting_operand2 && self.display != ERROR_MARKER && !self.display.contains('e')
    }

    fn push_digit(&mut self, label: &str) {
        if !self.is_editable() {
            self.start_operand(label);
        } else if self.display == "0" {
            self.display.clear();
            self.display.push_str(label);
        } else if self.display.len() < MAX_ENTRY_LEN {
            self.display.push_str(label);
        }
    }

    /// A point goes on whatever the display shows, captured operands
    /// included; the next digit still starts a new number. Only text that
    /// can't take a point starts over at `0.`.
    fn push_decimal(&mut self) {
        if self.display == ERROR_MARKER || self.display.contains('e') {
            self.start_operand("0.");
        } else if !self.display.contains('.') && self.display.len() < MAX_ENTRY_LEN {
            self.display.push('.');
        }
    }

    fn capture_operator(&mut self, operator: Operator) {
        self.previous_display = format!("{} {}", self.display, operator.symbol());
        self.pending = Some(Pending {
            operand: self.display.clone(),
            operator,
        });
        self.awaiting_operand2 = true;
    }

    fn clear(&mut self) {
        *self = Self {
            last_button: self.last_button,
            ..Self::new()
        };
    }

    fn toggle_sign(&mut self) {
        if self.display == "0" {
            return;
        }
        if let Some(positive) = self.display.strip_prefix('-') {
            self.display = positive.to_string();
        } else {
            self.display.insert(0, '-');
        }
    }

    fn percent(&mut self) {
        let result = parse_operand(&self.display).and_then(|v| format_number(v / 100.0));
        match result {
            Ok(text) => self.display = text,
            Err(e) => self.fail(&e),
        }
    }

    fn evaluate(&mut self) {
        let Some(Pending { operand, operator }) = self.pending.take() else {
            return;
        };
        let operand2 = self.display.clone();
        self.awaiting_operand2 = true;

        match compute(&operand, operator, &operand2) {
            Ok(result) => {
                self.previous_display =
                    format!("{operand} {} {operand2} = {result}", operator.symbol());
                self.display = result;
            }
            Err(e) => self.fail(&e),
        }
    }

    fn fail(&mut self, error: &EvaluationError) {
        debug!(%error, display = %self.display, "evaluation failed");
        self.display = ERROR_MARKER.to_string();
        self.is_error = true;
    }
}

fn compute(lhs: &str, operator: Operator, rhs: &str) -> Result<String, EvaluationError> {
    let result = operator.apply(parse_operand(lhs)?, parse_operand(rhs)?)?;
    format_number(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ADD: Button = Button::Operator(Operator::Add);
    const SUB: Button = Button::Operator(Operator::Subtract);
    const MUL: Button = Button::Operator(Operator::Multiply);
    const DIV: Button = Button::Operator(Operator::Divide);

    fn d(n: u8) -> Button {
        Button::Digit(n)
    }

    fn run(buttons: &[Button]) -> Calculator {
        let mut calc = Calculator::new();
        calc.press_all(buttons.iter().copied());
        calc
    }

    // ── Entry ───────────────────────────────────────────────────

    #[test]
    fn starts_at_zero() {
        let calc = Calculator::new();
        assert_eq!(calc.display(), "0");
        assert_eq!(calc.previous_display(), "");
        assert_eq!(calc.mode(), Mode::Idle);
        assert_eq!(calc.last_button(), None);
    }

    #[test]
    fn digits_concatenate() {
        assert_eq!(run(&[d(1), d(2), d(3)]).display(), "123");
    }

    #[test]
    fn leading_zero_collapses() {
        assert_eq!(run(&[d(0), d(0), d(7)]).display(), "7");
        assert_eq!(run(&[d(0), d(0)]).display(), "0");
    }

    #[test]
    fn decimal_point_only_once() {
        let calc = run(&[d(1), Button::Decimal, d(5), Button::Decimal, Button::Decimal, d(2)]);
        assert_eq!(calc.display(), "1.52");
    }

    #[test]
    fn decimal_on_zero_keeps_zero() {
        assert_eq!(run(&[Button::Decimal, d(5)]).display(), "0.5");
    }

    // ── Operators and evaluation ────────────────────────────────

    #[test]
    fn simple_addition() {
        let calc = run(&[d(2), ADD, d(3), Button::Equals]);
        assert_eq!(calc.display(), "5");
        assert_eq!(calc.previous_display(), "2 + 3 = 5");
        assert_eq!(calc.mode(), Mode::AwaitingOperand);
        assert!(calc.is_finished());
        assert_eq!(calc.operator(), None);
        assert_eq!(calc.operand1(), None);
    }

    #[test]
    fn operator_captures_operand() {
        let calc = run(&[d(1), d(2), MUL]);
        assert_eq!(calc.operand1(), Some("12"));
        assert_eq!(calc.operator(), Some(Operator::Multiply));
        assert_eq!(calc.previous_display(), "12 ×");
        assert!(calc.awaiting_operand2());
        assert_eq!(calc.display(), "12");
    }

    #[test]
    fn operator_repress_overwrites() {
        let calc = run(&[d(8), ADD, SUB, DIV]);
        assert_eq!(calc.operator(), Some(Operator::Divide));
        assert_eq!(calc.operand1(), Some("8"));
        assert_eq!(calc.previous_display(), "8 ÷");
    }

    #[test]
    fn honk_evaluates() {
        let calc = run(&[d(6), MUL, d(7), Button::Honk]);
        assert_eq!(calc.display(), "42");
        assert!(calc.is_finished());
    }

    #[test]
    fn subtraction_and_division() {
        assert_eq!(run(&[d(3), SUB, d(5), Button::Equals]).display(), "-2");
        assert_eq!(run(&[d(1), DIV, d(4), Button::Equals]).display(), "0.25");
        assert_eq!(run(&[d(1), DIV, d(3), Button::Equals]).display(), "0.3333333333333333");
    }

    #[test]
    fn chained_evaluation() {
        let calc = run(&[d(2), ADD, d(3), Button::Equals, ADD, d(5), Button::Equals]);
        assert_eq!(calc.display(), "10");
        assert_eq!(calc.previous_display(), "5 + 5 = 10");
    }

    #[test]
    fn equals_without_operator_is_noop() {
        let calc = run(&[d(9), Button::Equals]);
        assert_eq!(calc.display(), "9");
        assert_eq!(calc.previous_display(), "");
        assert_eq!(calc.mode(), Mode::Idle);
        assert!(calc.is_finished());
    }

    #[test]
    fn digit_after_result_starts_fresh() {
        let calc = run(&[d(2), ADD, d(3), Button::Equals, d(7)]);
        assert_eq!(calc.display(), "7");
        assert_eq!(calc.previous_display(), "");
        assert_eq!(calc.mode(), Mode::Idle);
    }

    #[test]
    fn digit_after_operator_keeps_trace() {
        let calc = run(&[d(2), ADD, d(3)]);
        assert_eq!(calc.display(), "3");
        assert_eq!(calc.previous_display(), "2 +");
    }

    #[test]
    fn decimal_while_awaiting_marks_captured_operand() {
        let mut calc = run(&[d(2), ADD, Button::Decimal]);
        assert_eq!(calc.display(), "2.");
        assert!(calc.awaiting_operand2());
        assert_eq!(calc.previous_display(), "2 +");

        calc.press_all([d(5), Button::Equals]);
        assert_eq!(calc.display(), "7");
        assert_eq!(calc.previous_display(), "2 + 5 = 7");
    }

    #[test]
    fn decimal_after_result_appends() {
        let mut calc = run(&[d(2), ADD, d(3), Button::Equals, Button::Decimal]);
        assert_eq!(calc.display(), "5.");
        calc.press(d(1));
        assert_eq!(calc.display(), "1");
        assert_eq!(calc.previous_display(), "");
    }

    #[test]
    fn decimal_after_fractional_result_is_noop() {
        let calc = run(&[d(1), DIV, d(4), Button::Equals, Button::Decimal]);
        assert_eq!(calc.display(), "0.25");
        assert!(calc.awaiting_operand2());
    }

    #[test]
    fn equals_with_same_operand() {
        // The captured operand is still on the display.
        let calc = run(&[d(4), MUL, Button::Equals]);
        assert_eq!(calc.display(), "16");
    }

    // ── Errors ──────────────────────────────────────────────────

    #[test]
    fn divide_by_zero() {
        let calc = run(&[d(5), DIV, d(0), Button::Equals]);
        assert_eq!(calc.display(), ERROR_MARKER);
        assert!(calc.is_error());
        assert_eq!(calc.mode(), Mode::Error);
        assert!(calc.is_finished());
        assert_eq!(calc.operator(), None);
    }

    #[test]
    fn overflow_is_error() {
        // 1e100 cubed is fine, to the fourth power it is not.
        let big = [d(9); MAX_ENTRY_LEN];
        let mut calc = Calculator::new();
        calc.press_all(big);
        for _ in 0..3 {
            calc.press(MUL);
            calc.press_all(big);
            calc.press(Button::Equals);
        }
        assert_eq!(calc.display(), ERROR_MARKER);
    }

    #[test]
    fn all_clear_recovers() {
        let calc = run(&[d(5), DIV, d(0), Button::Equals, Button::AllClear]);
        assert_eq!(calc.display(), "0");
        assert!(!calc.is_error());
        assert_eq!(calc.previous_display(), "");
        assert_eq!(calc.mode(), Mode::Idle);
    }

    #[test]
    fn digit_recovers() {
        let calc = run(&[d(5), DIV, d(0), Button::Equals, d(4)]);
        assert_eq!(calc.display(), "4");
        assert_eq!(calc.mode(), Mode::Idle);
    }

    #[test]
    fn decimal_recovers() {
        let calc = run(&[d(5), DIV, d(0), Button::Equals, Button::Decimal]);
        assert_eq!(calc.display(), "0.");
        assert!(!calc.is_error());
    }

    #[test]
    fn error_ignores_other_commands() {
        let errored = run(&[d(5), DIV, d(0), Button::Equals]);
        for b in [ADD, Button::ToggleSign, Button::Percent, Button::Equals, Button::Honk] {
            let mut calc = errored.clone();
            calc.press(b);
            assert_eq!(calc, errored, "{b}");
        }
    }

    // ── Functions ───────────────────────────────────────────────

    #[test]
    fn percent_divides_by_hundred() {
        let mut calc = run(&[d(5), d(0), Button::Percent]);
        assert_eq!(calc.display(), "0.5");
        calc.press(Button::Percent);
        assert_eq!(calc.display(), "0.005");
    }

    #[test]
    fn percent_of_zero() {
        assert_eq!(run(&[Button::Percent]).display(), "0");
    }

    #[test]
    fn toggle_sign_is_involutive() {
        let mut calc = run(&[d(4), d(2)]);
        calc.press(Button::ToggleSign);
        assert_eq!(calc.display(), "-42");
        calc.press(Button::ToggleSign);
        assert_eq!(calc.display(), "42");
    }

    #[test]
    fn toggle_sign_ignores_zero() {
        assert_eq!(run(&[Button::ToggleSign]).display(), "0");
    }

    #[test]
    fn negative_operand() {
        let calc = run(&[d(3), Button::ToggleSign, MUL, d(2), Button::Equals]);
        assert_eq!(calc.display(), "-6");
        assert_eq!(calc.previous_display(), "-3 × 2 = -6");
    }

    #[test]
    fn large_results_use_exponent_form() {
        let thousand = [d(1), d(0), d(0), d(0)];
        let mut calc = Calculator::new();
        calc.press_all(thousand);
        calc.press(MUL);
        calc.press_all(thousand);
        calc.press(Button::Equals);
        assert_eq!(calc.display(), "1e+06");
        assert_eq!(calc.previous_display(), "1000 × 1000 = 1e+06");
    }

    #[test]
    fn results_cross_into_exponent_form_at_a_million() {
        let nines = [d(9); 6];
        let mut calc = Calculator::new();
        calc.press_all(nines);
        calc.press_all([ADD, d(0), Button::Equals]);
        assert_eq!(calc.display(), "999999");
        calc.press_all([ADD, d(1), Button::Equals]);
        assert_eq!(calc.display(), "1e+06");
    }

    #[test]
    fn exponent_results_feed_the_next_operation() {
        let mut calc = run(&[d(2), d(0), d(0), d(0), MUL, d(1), d(0), d(0), d(0)]);
        calc.press(Button::Equals);
        assert_eq!(calc.display(), "2e+06");
        calc.press_all([DIV, d(4), Button::Equals]);
        assert_eq!(calc.display(), "500000");
        assert_eq!(calc.previous_display(), "2e+06 ÷ 4 = 500000");
    }

    #[test]
    fn exponent_results_take_no_point() {
        let mut calc = run(&[d(1), Button::Percent, Button::Percent, Button::Percent]);
        assert!(calc.display().contains('e'), "{}", calc.display());
        assert_eq!(calc.mode(), Mode::Idle);
        calc.press(Button::Decimal);
        assert_eq!(calc.display(), "0.");
        calc.press(d(3));
        assert_eq!(calc.display(), "0.3");
    }

    #[test]
    fn entry_length_is_capped() {
        let mut calc = Calculator::new();
        calc.press_all([d(7); MAX_ENTRY_LEN + 20]);
        assert_eq!(calc.display().len(), MAX_ENTRY_LEN);
        calc.press(Button::Decimal);
        assert!(!calc.display().contains('.'));
    }

    #[test]
    fn all_clear_remembers_last_button() {
        let calc = run(&[d(1), Button::AllClear]);
        assert_eq!(calc.last_button(), Some(Button::AllClear));
        assert!(!calc.is_finished());
    }
}
