// SPDX-License-Identifier: MIT
//
// ANSI escape sequence encoding.
//
// Stateless writers for every control sequence goose-calc sends to the
// terminal. Deciding *when* to send them belongs to `CellWriter` and
// `Terminal`; this module only knows the bytes.
//
// Coordinates are 0-indexed at the API and converted to the 1-indexed form
// the terminal expects.

use std::io::{self, Write};

use crate::cell::Attr;
use crate::color::CellColor;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to column `x`, row `y` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the whole screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset every SGR attribute (SGR 0).
///
/// Anything tracking the terminal's current style must forget it after this.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Ring the terminal bell (BEL).
#[inline]
pub fn bell(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x07")
}

/// Set the window title (OSC 2).
pub fn set_title(w: &mut impl Write, title: &str) -> io::Result<()> {
    write!(w, "\x1b]2;{title}\x07")
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// SGR parameter bases for one color plane.
struct Plane {
    normal: u16,
    bright: u16,
    extended: u8,
    default: &'static [u8],
}

const FOREGROUND: Plane = Plane {
    normal: 30,
    bright: 90,
    extended: 38,
    default: b"\x1b[39m",
};

const BACKGROUND: Plane = Plane {
    normal: 40,
    bright: 100,
    extended: 48,
    default: b"\x1b[49m",
};

fn color(w: &mut impl Write, plane: &Plane, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(plane.default),
        CellColor::Ansi256(idx @ 0..=7) => write!(w, "\x1b[{}m", plane.normal + u16::from(idx)),
        CellColor::Ansi256(idx @ 8..=15) => {
            write!(w, "\x1b[{}m", plane.bright + u16::from(idx - 8))
        }
        CellColor::Ansi256(idx) => write!(w, "\x1b[{};5;{idx}m", plane.extended),
        CellColor::Rgb(r, g, b) => write!(w, "\x1b[{};2;{r};{g};{b}m", plane.extended),
    }
}

/// Set the foreground color.
///
/// Palette indices below 16 use the compact 30–37 / 90–97 codes, the rest
/// of the palette uses `38;5;N`, and RGB uses `38;2;R;G;B`.
pub fn fg(w: &mut impl Write, c: CellColor) -> io::Result<()> {
    color(w, &FOREGROUND, c)
}

/// Set the background color. Same encoding as [`fg`] on the 40/100/48 bases.
pub fn bg(w: &mut impl Write, c: CellColor) -> io::Result<()> {
    color(w, &BACKGROUND, c)
}

// ─── Text Attributes ─────────────────────────────────────────────────────────

/// Emit every set attribute as one CSI sequence, e.g. `\x1b[1;4m`.
///
/// Writes nothing for an empty set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    const CODES: [(Attr, &[u8]); 6] = [
        (Attr::BOLD, b"1"),
        (Attr::DIM, b"2"),
        (Attr::ITALIC, b"3"),
        (Attr::UNDERLINE, b"4"),
        (Attr::BLINK, b"5"),
        (Attr::INVERSE, b"7"),
    ];

    if attr.is_empty() {
        return Ok(());
    }

    w.write_all(b"\x1b[")?;
    let mut first = true;
    for (flag, code) in CODES {
        if attr.contains(flag) {
            if !first {
                w.write_all(b";")?;
            }
            w.write_all(code)?;
            first = false;
        }
    }
    w.write_all(b"m")
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// Begin synchronized output (DEC 2026); the terminal holds the frame.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

/// End synchronized output; the terminal presents the buffered frame.
#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Switch to the alternate screen (DEC 1049), preserving the shell contents.
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Return to the main screen.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Mouse ──────────────────────────────────────────────────────────────────

/// Report button presses and releases in SGR encoding (DEC 1000 + 1006).
///
/// The calculator only cares about clicks, so no drag or motion tracking.
pub fn enable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1000h\x1b[?1006h")
}

/// Stop all mouse reporting, including modes some other program left on.
pub fn disable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1006l\x1b[?1003l\x1b[?1002l\x1b[?1000l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
