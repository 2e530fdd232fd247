// SPDX-License-Identifier: MIT
//! The button grid: layout, cursor navigation and mouse hit-testing.
//!
//! [`ButtonGrid`] is the logical layout, rows of buttons that may differ in
//! length. [`GridGeometry`] is where the renderer put those buttons on
//! screen last frame. The renderer asks the geometry for every cell
//! rectangle it paints, and mouse clicks are resolved against the same
//! geometry, so what you click is what was drawn.

use std::fmt;

use goose_term::buffer::Rect;

use crate::button::{Button, Operator};

// ---------------------------------------------------------------------------
// GridPos / Direction
// ---------------------------------------------------------------------------

/// A cell in the grid, 0-indexed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Debug for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({}:{})", self.row, self.col)
    }
}

/// One step of cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// ButtonGrid
// ---------------------------------------------------------------------------

/// Rows of buttons. Never empty, and no row is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonGrid {
    rows: Vec<Vec<Button>>,
}

impl Default for ButtonGrid {
    fn default() -> Self {
        Self::standard()
    }
}

impl ButtonGrid {
    /// A grid from explicit rows; `None` if there are no rows or any row
    /// is empty.
    #[must_use]
    pub fn new(rows: Vec<Vec<Button>>) -> Option<Self> {
        (!rows.is_empty() && rows.iter().all(|r| !r.is_empty())).then_some(Self { rows })
    }

    /// The calculator layout:
    ///
    /// ```text
    /// AC   +/-  %    ÷
    /// 7    8    9    ×
    /// 4    5    6    −
    /// 1    2    3    +
    /// 0    .    HONK =
    /// ```
    #[must_use]
    pub fn standard() -> Self {
        use Button::{AllClear, Decimal, Digit, Equals, Honk, Percent, ToggleSign};
        let op = Button::Operator;

        Self {
            rows: vec![
                vec![AllClear, ToggleSign, Percent, op(Operator::Divide)],
                vec![Digit(7), Digit(8), Digit(9), op(Operator::Multiply)],
                vec![Digit(4), Digit(5), Digit(6), op(Operator::Subtract)],
                vec![Digit(1), Digit(2), Digit(3), op(Operator::Add)],
                vec![Digit(0), Decimal, Honk, Equals],
            ],
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Button>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.col < self.row_len(pos.row)
    }

    #[must_use]
    pub fn get(&self, pos: GridPos) -> Option<Button> {
        self.rows.get(pos.row)?.get(pos.col).copied()
    }

    /// First cell holding `button`, scanning rows top to bottom.
    #[must_use]
    pub fn position_of(&self, button: Button) -> Option<GridPos> {
        self.iter().find_map(|(pos, b)| (b == button).then_some(pos))
    }

    /// Every cell with its button, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, Button)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, buttons)| {
            buttons
                .iter()
                .enumerate()
                .map(move |(col, &b)| (GridPos::new(row, col), b))
        })
    }

    /// Move one cell from `pos`, stopping at the edges.
    ///
    /// Moving vertically into a shorter row clamps the column to that
    /// row's last cell. `pos` itself is clamped first, so any input yields
    /// a cell inside the grid.
    #[must_use]
    pub fn step(&self, pos: GridPos, dir: Direction) -> GridPos {
        let pos = self.clamp(pos);
        let moved = match dir {
            Direction::Up => GridPos::new(pos.row.saturating_sub(1), pos.col),
            Direction::Down => GridPos::new((pos.row + 1).min(self.height() - 1), pos.col),
            Direction::Left => GridPos::new(pos.row, pos.col.saturating_sub(1)),
            Direction::Right => {
                GridPos::new(pos.row, (pos.col + 1).min(self.row_len(pos.row) - 1))
            }
        };
        self.clamp(moved)
    }

    /// The nearest cell inside the grid.
    #[must_use]
    pub fn clamp(&self, pos: GridPos) -> GridPos {
        let row = pos.row.min(self.height() - 1);
        let col = pos.col.min(self.row_len(row) - 1);
        GridPos::new(row, col)
    }
}

// ---------------------------------------------------------------------------
// GridGeometry
// ---------------------------------------------------------------------------

/// Screen placement of the grid as last painted.
///
/// Cell `(row, col)` occupies
/// `x + col * (button_width + col_gap)`, `y + row * (button_height + row_gap)`
/// with size `button_width` × `button_height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridGeometry {
    pub x: u16,
    pub y: u16,
    pub button_width: u16,
    pub button_height: u16,
    pub col_gap: u16,
    pub row_gap: u16,
    row_lens: Vec<usize>,
}

impl GridGeometry {
    /// Geometry for `grid` with its top-left button at `(x, y)`.
    #[must_use]
    pub fn new(
        grid: &ButtonGrid,
        (x, y): (u16, u16),
        (button_width, button_height): (u16, u16),
        (col_gap, row_gap): (u16, u16),
    ) -> Self {
        Self {
            x,
            y,
            button_width,
            button_height,
            col_gap,
            row_gap,
            row_lens: grid.rows().iter().map(Vec::len).collect(),
        }
    }

    /// Columns spanned by the widest row.
    #[must_use]
    pub fn total_width(&self) -> u16 {
        let cols = self.row_lens.iter().copied().max().unwrap_or(0);
        span(cols, self.button_width, self.col_gap)
    }

    /// Rows spanned by the whole grid.
    #[must_use]
    pub fn total_height(&self) -> u16 {
        span(self.row_lens.len(), self.button_height, self.row_gap)
    }

    /// Screen rectangle of `pos`, or `None` if the cell doesn't exist.
    #[must_use]
    pub fn cell_rect(&self, pos: GridPos) -> Option<Rect> {
        if pos.col >= *self.row_lens.get(pos.row)? {
            return None;
        }
        let col = u16::try_from(pos.col).ok()?;
        let row = u16::try_from(pos.row).ok()?;
        let pitch_x = self.button_width.saturating_add(self.col_gap);
        let pitch_y = self.button_height.saturating_add(self.row_gap);
        let x = self.x.checked_add(col.checked_mul(pitch_x)?)?;
        let y = self.y.checked_add(row.checked_mul(pitch_y)?)?;
        Some(Rect::new(x, y, self.button_width, self.button_height))
    }

    /// The cell under screen position `(x, y)`.
    ///
    /// Gaps between buttons, cells past the end of a short row, and
    /// anything outside the grid resolve to `None`.
    #[must_use]
    pub fn hit_test(&self, x: u16, y: u16) -> Option<GridPos> {
        if self.button_width == 0 || self.button_height == 0 {
            return None;
        }
        let dx = x.checked_sub(self.x)?;
        let dy = y.checked_sub(self.y)?;

        let pitch_x = self.button_width.saturating_add(self.col_gap);
        let pitch_y = self.button_height.saturating_add(self.row_gap);
        if dx % pitch_x >= self.button_width || dy % pitch_y >= self.button_height {
            return None;
        }

        let pos = GridPos::new(usize::from(dy / pitch_y), usize::from(dx / pitch_x));
        (pos.col < *self.row_lens.get(pos.row)?).then_some(pos)
    }
}

/// Length of `n` cells of `size` separated by `gap`.
fn span(n: usize, size: u16, gap: u16) -> u16 {
    let n = u16::try_from(n).unwrap_or(u16::MAX);
    if n == 0 {
        return 0;
    }
    n.saturating_mul(size)
        .saturating_add((n - 1).saturating_mul(gap))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ragged() -> ButtonGrid {
        ButtonGrid::new(vec![
            vec![Button::Digit(1), Button::Digit(2), Button::Digit(3)],
            vec![Button::Digit(4)],
            vec![Button::Digit(5), Button::Digit(6)],
        ])
        .unwrap()
    }

    // ── ButtonGrid ──────────────────────────────────────────────

    #[test]
    fn standard_layout() {
        let g = ButtonGrid::standard();
        assert_eq!(g.height(), 5);
        assert_eq!(g.width(), 4);
        let labels: Vec<Vec<&str>> = g
            .rows()
            .iter()
            .map(|r| r.iter().map(|b| b.label()).collect())
            .collect();
        assert_eq!(
            labels,
            vec![
                vec!["AC", "+/-", "%", "÷"],
                vec!["7", "8", "9", "×"],
                vec!["4", "5", "6", "−"],
                vec!["1", "2", "3", "+"],
                vec!["0", ".", "HONK", "="],
            ]
        );
    }

    #[test]
    fn rejects_empty_layouts() {
        assert!(ButtonGrid::new(vec![]).is_none());
        assert!(ButtonGrid::new(vec![vec![Button::Decimal], vec![]]).is_none());
    }

    #[test]
    fn get_and_position_of() {
        let g = ButtonGrid::standard();
        assert_eq!(g.get(GridPos::new(4, 2)), Some(Button::Honk));
        assert_eq!(g.get(GridPos::new(5, 0)), None);
        assert_eq!(g.get(GridPos::new(0, 4)), None);
        assert_eq!(g.position_of(Button::Equals), Some(GridPos::new(4, 3)));
        assert_eq!(g.position_of(Button::Digit(5)), Some(GridPos::new(2, 1)));
    }

    #[test]
    fn iter_is_row_major() {
        let cells: Vec<_> = ragged().iter().map(|(p, _)| (p.row, p.col)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2), (1, 0), (2, 0), (2, 1)]);
    }

    // ── Navigation ──────────────────────────────────────────────

    #[test]
    fn step_moves_one_cell() {
        let g = ButtonGrid::standard();
        let p = GridPos::new(2, 1);
        assert_eq!(g.step(p, Direction::Up), GridPos::new(1, 1));
        assert_eq!(g.step(p, Direction::Down), GridPos::new(3, 1));
        assert_eq!(g.step(p, Direction::Left), GridPos::new(2, 0));
        assert_eq!(g.step(p, Direction::Right), GridPos::new(2, 2));
    }

    #[test]
    fn step_stops_at_edges() {
        let g = ButtonGrid::standard();
        assert_eq!(g.step(GridPos::new(0, 0), Direction::Up), GridPos::new(0, 0));
        assert_eq!(g.step(GridPos::new(0, 0), Direction::Left), GridPos::new(0, 0));
        assert_eq!(g.step(GridPos::new(4, 3), Direction::Down), GridPos::new(4, 3));
        assert_eq!(g.step(GridPos::new(4, 3), Direction::Right), GridPos::new(4, 3));
    }

    #[test]
    fn vertical_move_into_short_row_clamps() {
        let g = ragged();
        assert_eq!(g.step(GridPos::new(0, 2), Direction::Down), GridPos::new(1, 0));
        assert_eq!(g.step(GridPos::new(2, 1), Direction::Up), GridPos::new(1, 0));
        assert_eq!(g.step(GridPos::new(1, 0), Direction::Right), GridPos::new(1, 0));
    }

    #[test]
    fn out_of_grid_input_is_clamped() {
        let g = ragged();
        assert_eq!(g.clamp(GridPos::new(9, 9)), GridPos::new(2, 1));
        assert!(g.contains(g.step(GridPos::new(9, 9), Direction::Left)));
    }

    // ── Geometry ────────────────────────────────────────────────

    fn geometry() -> GridGeometry {
        // 7-wide, 3-tall buttons, one column of gap, no row gap.
        GridGeometry::new(&ButtonGrid::standard(), (10, 5), (7, 3), (1, 0))
    }

    #[test]
    fn totals() {
        let geo = geometry();
        assert_eq!(geo.total_width(), 4 * 7 + 3);
        assert_eq!(geo.total_height(), 15);
    }

    #[test]
    fn cell_rects() {
        let geo = geometry();
        assert_eq!(geo.cell_rect(GridPos::new(0, 0)), Some(Rect::new(10, 5, 7, 3)));
        assert_eq!(geo.cell_rect(GridPos::new(2, 3)), Some(Rect::new(34, 11, 7, 3)));
        assert_eq!(geo.cell_rect(GridPos::new(0, 4)), None);
        assert_eq!(geo.cell_rect(GridPos::new(5, 0)), None);
    }

    #[test]
    fn hit_test_agrees_with_cell_rects() {
        let geo = geometry();
        for (pos, _) in ButtonGrid::standard().iter() {
            let r = geo.cell_rect(pos).unwrap();
            for y in r.y..r.bottom() {
                for x in r.x..r.right() {
                    assert_eq!(geo.hit_test(x, y), Some(pos), "({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn hit_test_rejects_gaps_and_outside() {
        let geo = geometry();
        assert_eq!(geo.hit_test(17, 5), None, "column gap");
        assert_eq!(geo.hit_test(9, 5), None, "left of grid");
        assert_eq!(geo.hit_test(10, 4), None, "above grid");
        assert_eq!(geo.hit_test(10, 20), None, "below grid");
        assert_eq!(geo.hit_test(41, 5), None, "right of grid");
    }

    #[test]
    fn hit_test_respects_row_gaps_and_short_rows() {
        let geo = GridGeometry::new(&ragged(), (0, 0), (2, 1), (1, 1));
        assert_eq!(geo.hit_test(0, 0), Some(GridPos::new(0, 0)));
        assert_eq!(geo.hit_test(0, 1), None, "row gap");
        assert_eq!(geo.hit_test(0, 2), Some(GridPos::new(1, 0)));
        assert_eq!(geo.hit_test(3, 2), None, "past the short row");
        assert_eq!(geo.hit_test(3, 4), Some(GridPos::new(2, 1)));
    }

    #[test]
    fn zero_sized_buttons_hit_nothing() {
        let geo = GridGeometry::new(&ragged(), (0, 0), (0, 0), (0, 0));
        assert_eq!(geo.hit_test(0, 0), None);
    }
}
