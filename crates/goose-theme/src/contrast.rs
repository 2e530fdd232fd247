// SPDX-License-Identifier: MIT
//! WCAG contrast between cell colors.
//!
//! Button faces come in every hue from pale gold to deep blue, so the label
//! color is chosen per face: black or white, whichever reads better.

use goose_term::color::CellColor;

const BLACK: CellColor = CellColor::Rgb(0, 0, 0);
const WHITE: CellColor = CellColor::Rgb(255, 255, 255);

/// WCAG 2.1 contrast ratio in `[1, 21]`, independent of argument order.
///
/// `None` when either side is the terminal default, whose real color is
/// unknown.
#[must_use]
pub fn contrast_ratio(a: CellColor, b: CellColor) -> Option<f32> {
    let la = a.luminance()?;
    let lb = b.luminance()?;
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    Some((lighter + 0.05) / (darker + 0.05))
}

/// Black or white, whichever contrasts more with `bg`.
///
/// For the terminal default background the default foreground is already
/// the readable choice.
///
/// ```
/// use goose_term::color::CellColor;
/// use goose_theme::contrast::readable_on;
///
/// assert_eq!(readable_on(CellColor::Rgb(255, 215, 0)), CellColor::Rgb(0, 0, 0));
/// assert_eq!(readable_on(CellColor::Rgb(28, 28, 28)), CellColor::Rgb(255, 255, 255));
/// ```
#[must_use]
pub fn readable_on(bg: CellColor) -> CellColor {
    match (contrast_ratio(BLACK, bg), contrast_ratio(WHITE, bg)) {
        (Some(black), Some(white)) if black >= white => BLACK,
        (Some(_), Some(_)) => WHITE,
        _ => CellColor::Default,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
