// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key and mouse events. It understands what a
// raw-mode terminal sends once `Terminal::enter` has switched on SGR mouse
// reporting:
//
// - printable ASCII and UTF-8 characters
// - control bytes (Ctrl+letter, Enter, Tab, Backspace)
// - CSI and SS3 cursor keys, with xterm modifier parameters
// - CSI `~` editing keys (Home, End, Delete, Page Up/Down)
// - SGR mouse reports (`ESC [ < b ; x ; y M` / `m`)
// - Alt+key as ESC followed by the key
//
// Sequences may be split across reads, so the parser keeps unconsumed bytes
// between `advance` calls. A lone ESC is ambiguous until more bytes arrive;
// the caller waits a few milliseconds and calls `flush` to turn it into an
// Escape key press.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    #[must_use]
    pub const fn with_modifiers(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Ctrl + `ch`.
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::with_modifiers(KeyCode::Char(ch), Modifiers::CTRL)
    }
}

/// Which key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    Enter,
    Tab,
    BackTab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Modifier keys, in xterm's encoding (`param = 1 + bits`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const ALT   = 0b010;
        const CTRL  = 0b100;
    }
}

/// A mouse action at a 0-indexed cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press(MouseButton),
    Release(MouseButton),
    Drag(MouseButton),
    Move,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental byte-to-event decoder.
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(32),
        }
    }

    /// Feed bytes and return every complete event they finish.
    ///
    /// Incomplete trailing sequences stay buffered for the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match parse_one(&self.buf[pos..]) {
                Step::Event(event, used) => {
                    events.push(event);
                    pos += used;
                }
                Step::Skip(used) => pos += used,
                Step::Incomplete => break,
            }
        }

        self.buf.drain(..pos);
        events
    }

    /// Whether bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Give up waiting: emit buffered bytes as plain key presses.
    ///
    /// A lone ESC becomes [`KeyCode::Escape`]; half a sequence such as
    /// `ESC [` becomes Escape followed by the literal characters.
    pub fn flush(&mut self) -> Vec<Event> {
        let events = self
            .buf
            .iter()
            .filter_map(|&b| match b {
                0x1B => Some(KeyEvent::new(KeyCode::Escape)),
                0x20..=0x7E => Some(KeyEvent::new(KeyCode::Char(b as char))),
                _ => None,
            })
            .map(Event::Key)
            .collect();
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Decoding ───────────────────────────────────────────────────────────────

/// Outcome of decoding from the front of a byte slice.
enum Step {
    Event(Event, usize),
    Skip(usize),
    Incomplete,
}

const fn key(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent::with_modifiers(code, modifiers))
}

const fn plain(code: KeyCode) -> Event {
    key(code, Modifiers::empty())
}

/// Control byte 0x01..=0x1A as Ctrl + letter.
const fn ctrl_letter(b: u8) -> char {
    (b + b'a' - 1) as char
}

fn parse_one(buf: &[u8]) -> Step {
    match buf[0] {
        0x1B => parse_escape(buf),
        0x0D | 0x0A => Step::Event(plain(KeyCode::Enter), 1),
        0x09 => Step::Event(plain(KeyCode::Tab), 1),
        0x08 | 0x7F => Step::Event(plain(KeyCode::Backspace), 1),
        b @ 0x01..=0x1A => Step::Event(key(KeyCode::Char(ctrl_letter(b)), Modifiers::CTRL), 1),
        b @ 0x20..=0x7E => Step::Event(plain(KeyCode::Char(b as char)), 1),
        0xC0..=0xFF => parse_utf8(buf),
        _ => Step::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Step {
    let Some(&next) = buf.get(1) else {
        return Step::Incomplete;
    };
    match next {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        b @ 0x20..=0x7E => Step::Event(key(KeyCode::Char(b as char), Modifiers::ALT), 2),
        _ => Step::Event(plain(KeyCode::Escape), 1),
    }
}

fn parse_ss3(buf: &[u8]) -> Step {
    let Some(&fin) = buf.get(2) else {
        return Step::Incomplete;
    };
    cursor_key(fin, Modifiers::empty()).map_or(Step::Skip(3), |ev| Step::Event(ev, 3))
}

/// Final bytes shared by CSI and SS3 cursor keys.
const fn cursor_key(fin: u8, modifiers: Modifiers) -> Option<Event> {
    let code = match fin {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return None,
    };
    Some(key(code, modifiers))
}

fn parse_csi(buf: &[u8]) -> Step {
    if buf.get(2) == Some(&b'<') {
        return parse_sgr_mouse(buf);
    }

    // Parameter and intermediate bytes run until a final byte in 0x40..=0x7E.
    let mut end = 2;
    loop {
        match buf.get(end) {
            None => return Step::Incomplete,
            Some(0x40..=0x7E) => break,
            Some(0x20..=0x3F) => end += 1,
            Some(_) => return Step::Skip(end + 1),
        }
    }

    let fin = buf[end];
    let used = end + 1;
    let params = parse_params(&buf[2..end]);
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let event = match fin {
        b'~' => tilde_key(params.first().copied().unwrap_or(0), modifiers),
        b'Z' => Some(key(KeyCode::BackTab, Modifiers::SHIFT)),
        _ => cursor_key(fin, modifiers),
    };
    event.map_or(Step::Skip(used), |ev| Step::Event(ev, used))
}

fn tilde_key(code: u16, modifiers: Modifiers) -> Option<Event> {
    let code = match code {
        1 | 7 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 | 8 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        15 => KeyCode::F(5),
        17..=21 => KeyCode::F(u8::try_from(code - 11).ok()?),
        23 | 24 => KeyCode::F(u8::try_from(code - 12).ok()?),
        _ => return None,
    };
    Some(key(code, modifiers))
}

/// `ESC [ < b ; x ; y M` for presses and motion, `m` for releases.
fn parse_sgr_mouse(buf: &[u8]) -> Step {
    let mut end = 3;
    loop {
        match buf.get(end) {
            None => return Step::Incomplete,
            Some(b'M' | b'm') => break,
            Some(b) if b.is_ascii_digit() || *b == b';' => end += 1,
            Some(_) => return Step::Skip(end + 1),
        }
    }

    let used = end + 1;
    let params = parse_params(&buf[3..end]);
    let [cb, col, row] = params[..] else {
        return Step::Skip(used);
    };

    let mut modifiers = Modifiers::empty();
    if cb & 4 != 0 {
        modifiers |= Modifiers::SHIFT;
    }
    if cb & 8 != 0 {
        modifiers |= Modifiers::ALT;
    }
    if cb & 16 != 0 {
        modifiers |= Modifiers::CTRL;
    }

    let button = match cb & 3 {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    };

    let kind = if cb & 64 != 0 {
        if cb & 1 == 0 {
            MouseEventKind::ScrollUp
        } else {
            MouseEventKind::ScrollDown
        }
    } else if cb & 32 != 0 {
        button.map_or(MouseEventKind::Move, MouseEventKind::Drag)
    } else {
        let Some(button) = button else {
            return Step::Skip(used);
        };
        if buf[end] == b'm' {
            MouseEventKind::Release(button)
        } else {
            MouseEventKind::Press(button)
        }
    };

    Step::Event(
        Event::Mouse(MouseEvent {
            kind,
            x: col.saturating_sub(1),
            y: row.saturating_sub(1),
            modifiers,
        }),
        used,
    )
}

fn parse_utf8(buf: &[u8]) -> Step {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Step::Skip(1),
    };
    if buf.len() < len {
        return Step::Incomplete;
    }
    match std::str::from_utf8(&buf[..len]).ok().and_then(|s| s.chars().next()) {
        Some(ch) => Step::Event(plain(KeyCode::Char(ch)), len),
        None => Step::Skip(1),
    }
}

/// Semicolon-separated decimal parameters; empty fields read as 0 and
/// sub-parameters after `:` are ignored.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// xterm modifier parameter: `1 + (shift | alt << 1 | ctrl << 2)`.
fn decode_modifiers(param: u16) -> Modifiers {
    let bits = u8::try_from(param.saturating_sub(1)).unwrap_or(0);
    Modifiers::from_bits_truncate(bits)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
