// SPDX-License-Identifier: MIT
//
// FrameBuffer: the cell grid every frame is painted into.
//
// The view paints a whole frame here, then `DiffRenderer` compares it with
// the previous one and writes only what changed. Cells live in a flat
// row-major `Vec` so the renderer's left-to-right scan is linear.
//
// Painting never fails: anything outside the buffer is clipped silently.
// Wide characters take two columns (owner + continuation cell); paint
// operations clean up half-overwritten wide characters so the terminal
// never receives a dangling half.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::cell::{Cell, Style};

// ─── Rect ────────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last column.
    #[inline]
    #[must_use]
    pub const fn right(self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// One past the last row.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two rectangles, `None` when they don't touch.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y).then(|| Self::new(x, y, right - x, bottom - y))
    }

    /// A `width`×`height` rectangle centered inside `self`.
    ///
    /// Odd leftovers go to the right and bottom. Sizes larger than `self`
    /// are clamped.
    #[must_use]
    pub fn centered(self, width: u16, height: u16) -> Self {
        let width = width.min(self.width);
        let height = height.min(self.height);
        Self::new(
            self.x + (self.width - width) / 2,
            self.y + (self.height - height) / 2,
            width,
            height,
        )
    }

    /// Shrink by `n` cells on every side.
    #[must_use]
    pub const fn inset(self, n: u16) -> Self {
        Self::new(
            self.x.saturating_add(n),
            self.y.saturating_add(n),
            self.width.saturating_sub(n.saturating_mul(2)),
            self.height.saturating_sub(n.saturating_mul(2)),
        )
    }
}

// ─── Borders ─────────────────────────────────────────────────────────────────

/// The six glyphs needed to draw a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSet {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BorderSet {
    pub const ROUNDED: Self = Self {
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
        horizontal: '─',
        vertical: '│',
    };

    pub const DOUBLE: Self = Self {
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
        horizontal: '═',
        vertical: '║',
    };

    pub const HEAVY: Self = Self {
        top_left: '┏',
        top_right: '┓',
        bottom_left: '┗',
        bottom_right: '┛',
        horizontal: '━',
        vertical: '┃',
    };
}

// ─── FrameBuffer ─────────────────────────────────────────────────────────────

/// A `width`×`height` grid of cells.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// A buffer of empty cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a rectangle at the origin.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.in_bounds(x, y).then(|| &self.cells[self.index(x, y)])
    }

    /// One row of cells.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = self.index(0, y);
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    /// Overwrite a cell. Returns `false` when out of bounds.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.break_wide_char_at(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Reset every cell to [`Cell::EMPTY`].
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Change dimensions; all content is discarded.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    /// If `(x, y)` is half of a wide character, blank the other half.
    fn break_wide_char_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);
        if self.cells[idx].is_continuation() && x > 0 {
            let owner = self.index(x - 1, y);
            self.cells[owner].ch = u32::from(b' ');
        }
        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next] = Cell {
                    ch: u32::from(b' '),
                    ..self.cells[next]
                };
            }
        }
    }

    // ─── Painting ────────────────────────────────────────────────────────

    /// Fill `rect` with spaces in `style`.
    pub fn fill_rect(&mut self, rect: Rect, style: Style) {
        let Some(r) = rect.intersect(self.area()) else {
            return;
        };
        for y in r.y..r.bottom() {
            if r.x > 0 {
                self.break_wide_char_at(r.x, y);
            }
            if r.right() < self.width {
                self.break_wide_char_at(r.right() - 1, y);
            }
            let start = self.index(r.x, y);
            let end = self.index(r.right() - 1, y) + 1;
            self.cells[start..end].fill(Cell::styled(' ', style));
        }
    }

    /// Paint `text` starting at `(x, y)`; returns the columns consumed.
    ///
    /// Zero-width characters are dropped. A wide character that would be
    /// cut by the right edge becomes a space.
    pub fn paint_text(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        if y >= self.height {
            return 0;
        }

        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if w == 2 && col + 1 >= self.width {
                self.set(col, y, Cell::styled(' ', style));
                col += 1;
                break;
            }
            self.set(col, y, Cell::styled(ch, style));
            if w == 2 {
                self.set(col + 1, y, Cell::continuation(style));
            }
            #[allow(clippy::cast_possible_truncation)]
            let w = w as u16;
            col = col.saturating_add(w);
        }
        col.saturating_sub(x)
    }

    /// Paint `text` horizontally centered within `[x, x + width)`.
    pub fn paint_centered(&mut self, x: u16, y: u16, width: u16, text: &str, style: Style) -> u16 {
        let text_w = u16::try_from(string_width(text)).unwrap_or(u16::MAX);
        let offset = width.saturating_sub(text_w) / 2;
        self.paint_text(x.saturating_add(offset), y, text, style)
    }

    /// Draw the outline of `rect` with `border`; the inside is untouched.
    ///
    /// Rectangles smaller than 2×2 have no room for corners and are skipped.
    pub fn draw_box(&mut self, rect: Rect, border: BorderSet, style: Style) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);

        for x in left + 1..right {
            self.set(x, top, Cell::styled(border.horizontal, style));
            self.set(x, bottom, Cell::styled(border.horizontal, style));
        }
        for y in top + 1..bottom {
            self.set(left, y, Cell::styled(border.vertical, style));
            self.set(right, y, Cell::styled(border.vertical, style));
        }
        self.set(left, top, Cell::styled(border.top_left, style));
        self.set(right, top, Cell::styled(border.top_right, style));
        self.set(left, bottom, Cell::styled(border.bottom_left, style));
        self.set(right, bottom, Cell::styled(border.bottom_right, style));
    }

    /// The characters of row `y` as a string, continuation cells skipped.
    ///
    /// Trailing spaces are kept so column positions line up.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().filter_map(|c| c.character()).collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width ──────────────────────────────────────────────────────────────

/// Columns occupied by `ch`: 0 for control and combining marks, 2 for wide.
///
/// ```
/// use goose_term::buffer::char_width;
///
/// assert_eq!(char_width('7'), 1);
/// assert_eq!(char_width('🦢'), 2);
/// assert_eq!(char_width('\n'), 0);
/// ```
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Columns occupied by `s`.
#[inline]
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.width()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
