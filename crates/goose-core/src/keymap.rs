// SPDX-License-Identifier: MIT
//! Keys to intents.
//!
//! [`map_key`] is the whole input vocabulary of the calculator. It is a
//! pure function of the key: no state is read, so the same key always means
//! the same thing.

use goose_term::input::{KeyCode, KeyEvent, Modifiers};

use crate::button::{Button, Operator};
use crate::grid::Direction;

/// What a key asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Press this button directly.
    Press(Button),
    /// Move the cursor.
    Move(Direction),
    /// Press the button under the cursor.
    Activate,
    ToggleHelp,
    Quit,
}

/// Key bindings as shown in the help panel: keys, then what they do.
pub const BINDINGS: &[(&str, &str)] = &[
    ("0-9 .", "digits, point"),
    ("+ - * x /", "arithmetic"),
    ("= H", "evaluate, HONK"),
    ("c", "all clear"),
    ("~ %", "sign, percent"),
    ("←↓↑→ hjkl", "move cursor"),
    ("enter space", "press highlighted"),
    ("mouse", "click a button"),
    ("?", "toggle help"),
    ("q esc ^C", "quit"),
];

/// The intent for `key`, or `None` if the key means nothing here.
#[must_use]
pub fn map_key(key: &KeyEvent) -> Option<Intent> {
    let mods = key.modifiers;
    if mods.contains(Modifiers::CTRL) {
        return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(Intent::Quit);
    }
    if mods.contains(Modifiers::ALT) {
        return None;
    }

    let intent = match key.code {
        KeyCode::Char(ch) => return map_char(ch),
        KeyCode::Up => Intent::Move(Direction::Up),
        KeyCode::Down => Intent::Move(Direction::Down),
        KeyCode::Left => Intent::Move(Direction::Left),
        KeyCode::Right => Intent::Move(Direction::Right),
        KeyCode::Enter => Intent::Activate,
        KeyCode::Escape => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}

fn map_char(ch: char) -> Option<Intent> {
    use Intent::{Activate, Move, Press, Quit, ToggleHelp};

    if let Some(n) = ch.to_digit(10) {
        // to_digit(10) is at most 9
        #[allow(clippy::cast_possible_truncation)]
        return Button::digit(n as u8).map(Press);
    }

    let op = |o| Press(Button::Operator(o));
    Some(match ch {
        '+' => op(Operator::Add),
        '-' => op(Operator::Subtract),
        '*' | 'x' => op(Operator::Multiply),
        '/' => op(Operator::Divide),
        '.' => Press(Button::Decimal),
        '=' => Press(Button::Equals),
        'H' => Press(Button::Honk),
        'c' | 'C' => Press(Button::AllClear),
        '~' => Press(Button::ToggleSign),
        '%' => Press(Button::Percent),
        'k' => Move(Direction::Up),
        'j' => Move(Direction::Down),
        'h' => Move(Direction::Left),
        'l' => Move(Direction::Right),
        ' ' => Activate,
        '?' => ToggleHelp,
        'q' => Quit,
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(c: char) -> Option<Intent> {
        map_key(&KeyEvent::new(KeyCode::Char(c)))
    }

    fn code(k: KeyCode) -> Option<Intent> {
        map_key(&KeyEvent::new(k))
    }

    #[test]
    fn digits() {
        for n in 0..=9u8 {
            let c = char::from(b'0' + n);
            assert_eq!(ch(c), Some(Intent::Press(Button::Digit(n))));
        }
    }

    #[test]
    fn operators() {
        let op = |o| Some(Intent::Press(Button::Operator(o)));
        assert_eq!(ch('+'), op(Operator::Add));
        assert_eq!(ch('-'), op(Operator::Subtract));
        assert_eq!(ch('*'), op(Operator::Multiply));
        assert_eq!(ch('x'), op(Operator::Multiply));
        assert_eq!(ch('/'), op(Operator::Divide));
    }

    #[test]
    fn function_keys() {
        assert_eq!(ch('.'), Some(Intent::Press(Button::Decimal)));
        assert_eq!(ch('='), Some(Intent::Press(Button::Equals)));
        assert_eq!(ch('c'), Some(Intent::Press(Button::AllClear)));
        assert_eq!(ch('C'), Some(Intent::Press(Button::AllClear)));
        assert_eq!(ch('~'), Some(Intent::Press(Button::ToggleSign)));
        assert_eq!(ch('%'), Some(Intent::Press(Button::Percent)));
    }

    #[test]
    fn shift_h_honks_plain_h_moves() {
        assert_eq!(ch('H'), Some(Intent::Press(Button::Honk)));
        assert_eq!(ch('h'), Some(Intent::Move(Direction::Left)));
    }

    #[test]
    fn navigation() {
        assert_eq!(code(KeyCode::Up), Some(Intent::Move(Direction::Up)));
        assert_eq!(code(KeyCode::Down), Some(Intent::Move(Direction::Down)));
        assert_eq!(code(KeyCode::Left), Some(Intent::Move(Direction::Left)));
        assert_eq!(code(KeyCode::Right), Some(Intent::Move(Direction::Right)));
        assert_eq!(ch('k'), Some(Intent::Move(Direction::Up)));
        assert_eq!(ch('j'), Some(Intent::Move(Direction::Down)));
        assert_eq!(ch('l'), Some(Intent::Move(Direction::Right)));
    }

    #[test]
    fn shifted_arrows_still_move() {
        let key = KeyEvent::with_modifiers(KeyCode::Up, Modifiers::SHIFT);
        assert_eq!(map_key(&key), Some(Intent::Move(Direction::Up)));
    }

    #[test]
    fn activation_help_and_quit() {
        assert_eq!(code(KeyCode::Enter), Some(Intent::Activate));
        assert_eq!(ch(' '), Some(Intent::Activate));
        assert_eq!(ch('?'), Some(Intent::ToggleHelp));
        assert_eq!(ch('q'), Some(Intent::Quit));
        assert_eq!(code(KeyCode::Escape), Some(Intent::Quit));
        assert_eq!(map_key(&KeyEvent::ctrl('c')), Some(Intent::Quit));
    }

    #[test]
    fn unmapped_keys() {
        for c in ['a', 'z', 'Q', '!', 'é', '\u{1F9A2}'] {
            assert_eq!(ch(c), None, "{c:?}");
        }
        assert_eq!(code(KeyCode::Tab), None);
        assert_eq!(code(KeyCode::F(1)), None);
        assert_eq!(code(KeyCode::Backspace), None);
    }

    #[test]
    fn modified_chars_are_ignored() {
        assert_eq!(map_key(&KeyEvent::ctrl('x')), None);
        let alt_five = KeyEvent::with_modifiers(KeyCode::Char('5'), Modifiers::ALT);
        assert_eq!(map_key(&alt_five), None);
    }

    #[test]
    fn non_ascii_digits_are_rejected() {
        // Arabic-Indic five.
        assert_eq!(ch('\u{0665}'), None);
    }

    #[test]
    fn every_bound_char_is_listed_in_help() {
        let help: String = BINDINGS.iter().map(|(k, _)| *k).collect();
        for c in ['+', '-', '*', 'x', '/', '.', '=', 'H', 'c', '~', '%', 'h', 'j', 'k', 'l', '?', 'q'] {
            assert!(help.contains(c), "{c:?} missing from help");
        }
    }
}
