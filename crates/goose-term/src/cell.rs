// SPDX-License-Identifier: MIT
//
// Cells and styles: what one screen position looks like.
//
// A `Cell` is a codepoint plus a resolved `Style`. Wide characters (the
// goose emoji in the title, for one) take two columns: the first cell holds
// the codepoint, the second is a continuation cell with `ch == 0` that only
// carries colors so the background still fills.

use crate::color::CellColor;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// SGR text attributes as a bitfield.
    ///
    /// ```
    /// use goose_term::cell::Attr;
    ///
    /// let heavy = Attr::BOLD | Attr::UNDERLINE;
    /// assert!(heavy.contains(Attr::BOLD));
    /// assert!(!heavy.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1.
        const BOLD      = 1 << 0;
        /// SGR 2.
        const DIM       = 1 << 1;
        /// SGR 3.
        const ITALIC    = 1 << 2;
        /// SGR 4.
        const UNDERLINE = 1 << 3;
        /// SGR 5.
        const BLINK     = 1 << 4;
        /// SGR 7, swaps foreground and background.
        const INVERSE   = 1 << 5;
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Foreground, background and attributes, fully resolved.
///
/// This is the unit themes hand to the renderer: no lookups or color math
/// happen while painting, only copies of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Style {
    /// Terminal defaults, no attributes.
    pub const PLAIN: Self = Self {
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    #[inline]
    #[must_use]
    pub const fn new(fg: CellColor, bg: CellColor) -> Self {
        Self {
            fg,
            bg,
            attrs: Attr::empty(),
        }
    }

    /// Foreground only; the background shows whatever is underneath.
    #[inline]
    #[must_use]
    pub const fn fg(fg: CellColor) -> Self {
        Self::new(fg, CellColor::Default)
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: CellColor) -> Self {
        Self { bg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// Continuation marker for the second column of a wide character.
const CONTINUATION: u32 = 0;

const SPACE: u32 = b' ' as u32;

/// One character position on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Codepoint; `0` marks a continuation cell.
    pub ch: u32,
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Cell {
    /// A space with default colors.
    pub const EMPTY: Self = Self {
        ch: SPACE,
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self::styled(ch, Style::PLAIN)
    }

    #[inline]
    #[must_use]
    pub const fn styled(ch: char, style: Style) -> Self {
        Self {
            ch: ch as u32,
            fg: style.fg,
            bg: style.bg,
            attrs: style.attrs,
        }
    }

    /// The trailing half of a wide character, carrying its style.
    #[inline]
    #[must_use]
    pub const fn continuation(style: Style) -> Self {
        Self {
            ch: CONTINUATION,
            fg: style.fg,
            bg: style.bg,
            attrs: style.attrs,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == CONTINUATION
    }

    /// The codepoint, or `None` for continuation cells.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        if self.ch == CONTINUATION {
            return None;
        }
        char::from_u32(self.ch)
    }

    /// This cell's colors and attributes.
    #[inline]
    #[must_use]
    pub const fn style(self) -> Style {
        Style {
            fg: self.fg,
            bg: self.bg,
            attrs: self.attrs,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
