// SPDX-License-Identifier: MIT
//! Named preset themes.

use goose_term::cell::{Attr, Style};
use goose_term::color::CellColor::{self, Ansi256, Rgb};

use crate::theme::{Palette, Theme};

/// Theme used when none is asked for.
pub const DEFAULT_THEME: &str = "goose";

/// Look up a builtin theme by name. `None` if the name is not recognized.
#[must_use]
pub fn builtin_theme(name: &str) -> Option<Theme> {
    Some(match name {
        "goose" | "default" => Theme::from_palette("goose", &GOOSE),
        "pond" => Theme::from_palette("pond", &POND),
        "paper" => Theme::from_palette("paper", &PAPER),
        "terminal" => terminal(),
        _ => return None,
    })
}

/// Every name [`builtin_theme`] accepts, aliases excluded.
#[must_use]
pub const fn builtin_names() -> &'static [&'static str] {
    &["goose", "pond", "paper", "terminal"]
}

/// Blaze orange, cornflower and gold on charcoal, with a purple frame.
const GOOSE: Palette = Palette {
    background: Rgb(0x1c, 0x1c, 0x1c),
    frame: Rgb(0x8a, 0x2b, 0xe2),
    title: Rgb(0xff, 0xd7, 0x00),
    muted: Rgb(0x70, 0x80, 0x90),
    result: Rgb(0x32, 0xcd, 0x32),
    rule: Rgb(0x2e, 0x8b, 0x57),
    error: Rgb(0xff, 0x45, 0x00),
    digit: Rgb(0x64, 0x95, 0xed),
    operator: Rgb(0xff, 0xa5, 0x00),
    function: Rgb(0xb0, 0xc4, 0xde),
    clear: Rgb(0xff, 0x45, 0x00),
    equals: Rgb(0xff, 0xd7, 0x00),
    honk: Rgb(0xff, 0x69, 0xb4),
    button_frame: Rgb(0x44, 0x44, 0x44),
    cursor: Rgb(0xff, 0xff, 0xff),
    pressed: Rgb(0xff, 0xff, 0xff),
    pressed_direct: Rgb(0xff, 0x00, 0xff),
};

/// Teal and sand on deep water.
const POND: Palette = Palette {
    background: Rgb(0x0f, 0x1e, 0x26),
    frame: Rgb(0x2a, 0x9d, 0x8f),
    title: Rgb(0xe9, 0xc4, 0x6a),
    muted: Rgb(0x8a, 0xb0, 0xab),
    result: Rgb(0xa8, 0xda, 0xdc),
    rule: Rgb(0x26, 0x46, 0x53),
    error: Rgb(0xe7, 0x6f, 0x51),
    digit: Rgb(0x45, 0x7b, 0x9d),
    operator: Rgb(0x2a, 0x9d, 0x8f),
    function: Rgb(0xa8, 0xda, 0xdc),
    clear: Rgb(0xe7, 0x6f, 0x51),
    equals: Rgb(0xe9, 0xc4, 0x6a),
    honk: Rgb(0xf4, 0xa2, 0x61),
    button_frame: Rgb(0x2f, 0x3e, 0x46),
    cursor: Rgb(0xf1, 0xfa, 0xee),
    pressed: Rgb(0xf1, 0xfa, 0xee),
    pressed_direct: Rgb(0xff, 0xb4, 0xa2),
};

/// Pastel faces on cream, for light terminals.
const PAPER: Palette = Palette {
    background: Rgb(0xf7, 0xf3, 0xe9),
    frame: Rgb(0x6b, 0x4f, 0x3a),
    title: Rgb(0x8a, 0x5a, 0x00),
    muted: Rgb(0x6e, 0x6a, 0x64),
    result: Rgb(0x1b, 0x5e, 0x20),
    rule: Rgb(0xc8, 0xbf, 0xae),
    error: Rgb(0xb7, 0x1c, 0x1c),
    digit: Rgb(0xd7, 0xe3, 0xfc),
    operator: Rgb(0xff, 0xd6, 0xa5),
    function: Rgb(0xe2, 0xe2, 0xe2),
    clear: Rgb(0xff, 0xad, 0xad),
    equals: Rgb(0xfd, 0xff, 0xb6),
    honk: Rgb(0xff, 0xc6, 0xff),
    button_frame: Rgb(0xbd, 0xb2, 0xa3),
    cursor: Rgb(0x3a, 0x2e, 0x22),
    pressed: Rgb(0x3a, 0x2e, 0x22),
    pressed_direct: Rgb(0x6a, 0x4c, 0x93),
};

/// Terminal-native theme: only the 16 ANSI colors and the default
/// foreground/background, so it follows the user's own color scheme.
fn terminal() -> Theme {
    let ansi = |fg: u8, bg: u8| Style::new(Ansi256(fg), Ansi256(bg)).with_attrs(Attr::BOLD);
    let fg = |c: u8| Style::fg(Ansi256(c));

    Theme {
        name: "terminal".to_string(),

        body: Style::PLAIN,
        border: fg(5),
        title: fg(3).with_attrs(Attr::BOLD),

        expression: fg(8),
        separator: fg(2),
        result: fg(2).with_attrs(Attr::BOLD),
        error: fg(1).with_attrs(Attr::BOLD),
        help: Style::PLAIN.with_attrs(Attr::DIM),

        digit: ansi(15, 4),
        operator: ansi(0, 3),
        function: ansi(0, 7),
        clear: ansi(15, 1),
        equals: ansi(0, 11),
        honk: ansi(0, 13),
        button_border: fg(8),
        cursor: Style::fg(CellColor::Default).with_attrs(Attr::BOLD),
        pressed: Style::PLAIN.with_attrs(Attr::INVERSE | Attr::BOLD),
        pressed_direct: ansi(15, 5),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
