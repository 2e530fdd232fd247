// SPDX-License-Identifier: MIT
//! The [`Theme`] struct and the [`Palette`] it is usually built from.

use goose_term::cell::{Attr, Style};
use goose_term::color::CellColor;

use crate::contrast::readable_on;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// The raw colors behind a theme.
///
/// [`Theme::from_palette`] turns these into styles, choosing label colors
/// for the button faces so every face stays legible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Body panel background.
    pub background: CellColor,
    /// Body outline.
    pub frame: CellColor,
    pub title: CellColor,
    /// Expression line and help text.
    pub muted: CellColor,
    pub result: CellColor,
    /// Rule between expression and result.
    pub rule: CellColor,
    pub error: CellColor,
    pub digit: CellColor,
    /// `÷ × − +`.
    pub operator: CellColor,
    /// `+/-` and `%`.
    pub function: CellColor,
    /// `AC`.
    pub clear: CellColor,
    pub equals: CellColor,
    pub honk: CellColor,
    /// Outline of buttons that don't have the cursor.
    pub button_frame: CellColor,
    /// Outline of the button under the cursor.
    pub cursor: CellColor,
    /// Face of a button activated with Enter, Space, or a click.
    pub pressed: CellColor,
    /// Face of a button activated by its own shortcut key.
    pub pressed_direct: CellColor,
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Resolved styles for every element of the calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Preset name, e.g. `"goose"`.
    pub name: String,

    // ── Body ──────────────────────────────────────────────────
    /// Panel fill; its background shows through everything painted on it.
    pub body: Style,
    pub border: Style,
    pub title: Style,

    // ── Display ───────────────────────────────────────────────
    /// `Expr:` line.
    pub expression: Style,
    pub separator: Style,
    /// `Result:` line.
    pub result: Style,
    /// Result line while the calculator shows an error.
    pub error: Style,
    pub help: Style,

    // ── Buttons ───────────────────────────────────────────────
    pub digit: Style,
    pub operator: Style,
    pub function: Style,
    pub clear: Style,
    pub equals: Style,
    pub honk: Style,
    /// Outline of an idle button (bordered layout only).
    pub button_border: Style,
    /// Outline of the button under the cursor; in the compact layout it
    /// is applied to the face instead.
    pub cursor: Style,
    /// Face of a button just activated from the cursor or the mouse.
    pub pressed: Style,
    /// Face of a button just activated by its shortcut key.
    pub pressed_direct: Style,
}

impl Theme {
    /// Build a theme from raw colors.
    #[must_use]
    pub fn from_palette(name: &str, p: &Palette) -> Self {
        let on_body = |fg: CellColor| Style::new(fg, p.background);
        let face = |bg: CellColor| Style::new(readable_on(bg), bg).with_attrs(Attr::BOLD);

        Self {
            name: name.to_string(),

            body: on_body(p.title),
            border: on_body(p.frame),
            title: on_body(p.title).with_attrs(Attr::BOLD),

            expression: on_body(p.muted),
            separator: on_body(p.rule),
            result: on_body(p.result).with_attrs(Attr::BOLD),
            error: on_body(p.error).with_attrs(Attr::BOLD),
            help: on_body(p.muted).with_attrs(Attr::DIM),

            digit: face(p.digit),
            operator: face(p.operator),
            function: face(p.function),
            clear: face(p.clear),
            equals: face(p.equals),
            honk: face(p.honk),
            button_border: on_body(p.button_frame),
            cursor: on_body(p.cursor).with_attrs(Attr::BOLD),
            pressed: face(p.pressed),
            pressed_direct: face(p.pressed_direct),
        }
    }

    /// The same layout with no colors at all, for `NO_COLOR` and dumb
    /// terminals.
    ///
    /// Every distinction the colors carried is re-expressed with
    /// attributes: the cursor is bold, a press is reverse video, errors are
    /// bold and underlined.
    #[must_use]
    pub fn monochrome(&self) -> Self {
        let plain = Style::PLAIN;
        let bold = plain.with_attrs(Attr::BOLD);
        let dim = plain.with_attrs(Attr::DIM);

        Self {
            name: format!("{}-mono", self.name),

            body: plain,
            border: plain,
            title: bold,

            expression: dim,
            separator: dim,
            result: bold,
            error: plain.with_attrs(Attr::BOLD | Attr::UNDERLINE),
            help: dim,

            digit: plain,
            operator: plain,
            function: plain,
            clear: bold,
            equals: bold,
            honk: bold,
            button_border: dim,
            cursor: bold,
            pressed: plain.with_attrs(Attr::INVERSE),
            pressed_direct: plain.with_attrs(Attr::INVERSE | Attr::BOLD),
        }
    }

    /// Whether any style in the theme sets a color.
    #[must_use]
    pub fn has_color(&self) -> bool {
        self.styles()
            .iter()
            .any(|s| !s.fg.is_default() || !s.bg.is_default())
    }

    fn styles(&self) -> [Style; 18] {
        [
            self.body,
            self.border,
            self.title,
            self.expression,
            self.separator,
            self.result,
            self.error,
            self.help,
            self.digit,
            self.operator,
            self.function,
            self.clear,
            self.equals,
            self.honk,
            self.button_border,
            self.cursor,
            self.pressed,
            self.pressed_direct,
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn palette() -> Palette {
        let c = |s: &str| CellColor::hex(s).unwrap();
        Palette {
            background: c("#1c1c1c"),
            frame: c("#8a2be2"),
            title: c("#ffd700"),
            muted: c("#708090"),
            result: c("#32cd32"),
            rule: c("#2e8b57"),
            error: c("#ff4500"),
            digit: c("#6495ed"),
            operator: c("#ffa500"),
            function: c("#b0c4de"),
            clear: c("#ff4500"),
            equals: c("#ffd700"),
            honk: c("#ff69b4"),
            button_frame: c("#444444"),
            cursor: c("#ffffff"),
            pressed: c("#ffffff"),
            pressed_direct: c("#ff00ff"),
        }
    }

    #[test]
    fn body_elements_share_background() {
        let t = Theme::from_palette("t", &palette());
        let bg = palette().background;
        for s in [t.body, t.border, t.title, t.expression, t.result, t.error, t.help] {
            assert_eq!(s.bg, bg);
        }
    }

    #[test]
    fn faces_get_readable_labels() {
        let t = Theme::from_palette("t", &palette());
        assert_eq!(t.equals.fg, CellColor::Rgb(0, 0, 0), "black on gold");
        assert_eq!(t.pressed.fg, CellColor::Rgb(0, 0, 0), "black on white");
        assert_eq!(t.honk.bg, CellColor::Rgb(0xff, 0x69, 0xb4));
        assert!(t.digit.attrs.contains(Attr::BOLD));
    }

    #[test]
    fn name_is_kept() {
        assert_eq!(Theme::from_palette("goose", &palette()).name, "goose");
    }

    #[test]
    fn monochrome_strips_every_color() {
        let mono = Theme::from_palette("goose", &palette()).monochrome();
        assert!(!mono.has_color());
        assert_eq!(mono.name, "goose-mono");
    }

    #[test]
    fn monochrome_keeps_distinctions() {
        let mono = Theme::from_palette("t", &palette()).monochrome();
        assert_ne!(mono.pressed, mono.pressed_direct);
        assert_ne!(mono.pressed, mono.digit);
        assert_ne!(mono.cursor, mono.button_border);
        assert_ne!(mono.error, mono.result);
    }

    #[test]
    fn palette_theme_has_color() {
        assert!(Theme::from_palette("t", &palette()).has_color());
    }
}
