// SPDX-License-Identifier: MIT
//! Conversions between display text and `f64`.
//!
//! Results are printed with the fewest digits that read back to the same
//! `f64`, so `0.1 + 0.2` shows as `0.30000000000000004` but `1 ÷ 4` shows as
//! `0.25`. Magnitudes from `1e-4` up to (not including) `1e6` are written
//! out in full; everything else uses an exponent with at least two digits,
//! the way C's `%g` prints:
//!
//! | value           | text                  |
//! |-----------------|-----------------------|
//! | `5.0`           | `5`                   |
//! | `-0.0`          | `0`                   |
//! | `0.0001`        | `0.0001`              |
//! | `0.00001`       | `1e-05`               |
//! | `999999.0`      | `999999`              |
//! | `1e6`           | `1e+06`               |
//! | `123456789.0`   | `1.23456789e+08`      |
//! | `6.02214076e23` | `6.02214076e+23`      |

use crate::error::EvaluationError;

/// Smallest decimal exponent written in fixed notation.
const FIXED_MIN_EXP: i32 = -4;
/// First decimal exponent written with an exponent.
const FIXED_MAX_EXP: i32 = 6;

/// Parse display text as an operand.
///
/// Accepts what the calculator can produce: an optional `-`, digits, at
/// most one `.` (possibly trailing, as in `"3."`), and exponent forms such
/// as `1e+21`. Spellings of infinity and NaN are rejected.
///
/// # Errors
///
/// [`EvaluationError::InvalidOperand`] for anything else, including the
/// error marker itself.
pub fn parse_operand(text: &str) -> Result<f64, EvaluationError> {
    let invalid = || EvaluationError::InvalidOperand(text.to_string());
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }
    let value: f64 = text.parse().map_err(|_| invalid())?;
    if value.is_finite() { Ok(value) } else { Err(invalid()) }
}

/// Shortest round-trip text for `value`.
///
/// # Errors
///
/// [`EvaluationError::Overflow`] for infinities and NaN.
pub fn format_number(value: f64) -> Result<String, EvaluationError> {
    if !value.is_finite() {
        return Err(EvaluationError::Overflow);
    }
    if value == 0.0 {
        return Ok("0".to_string());
    }

    // `{:e}` already yields the shortest round-trip digits: "-1.2345e-7".
    let scientific = format!("{value:e}");
    let Some((negative, digits, exp)) = split_scientific(&scientific) else {
        return Ok(scientific);
    };

    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }
    if (FIXED_MIN_EXP..FIXED_MAX_EXP).contains(&exp) {
        write_fixed(&mut out, &digits, exp);
    } else {
        write_exponent(&mut out, &digits, exp);
    }
    Ok(out)
}

/// Sign, significant digits without the point, and decimal exponent.
fn split_scientific(s: &str) -> Option<(bool, String, i32)> {
    let (mantissa, exp) = s.split_once('e')?;
    let exp: i32 = exp.parse().ok()?;
    let negative = mantissa.starts_with('-');
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some((negative, digits, exp))
}

fn write_fixed(out: &mut String, digits: &str, exp: i32) {
    let Ok(int_len) = usize::try_from(exp + 1) else {
        // 0.000ddd
        let zeros = usize::try_from(-exp - 1).unwrap_or(0);
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', zeros));
        out.push_str(digits);
        return;
    };
    if digits.len() <= int_len {
        out.push_str(digits);
        out.extend(std::iter::repeat_n('0', int_len - digits.len()));
    } else {
        let (int, frac) = digits.split_at(int_len);
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    }
}

fn write_exponent(out: &mut String, digits: &str, exp: i32) {
    let (first, rest) = digits.split_at(1);
    out.push_str(first);
    if !rest.is_empty() {
        out.push('.');
        out.push_str(rest);
    }
    let sign = if exp < 0 { '-' } else { '+' };
    out.push_str(&format!("e{sign}{:02}", exp.unsigned_abs()));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
