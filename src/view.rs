// SPDX-License-Identifier: MIT
//
// Renderer: session state → frame buffer.
//
// Layout, bordered (3-row buttons) when the terminal is tall enough:
//
//   ╔═════════════════════════════════╗
//   ║        🦢  GOOSE CALC  🦢       ║
//   ║ Expr: 2 +                       ║
//   ║ ─────────────────────────────── ║
//   ║ Result:                         ║
//   ║                                 ║
//   ║ ╭─────╮ ╭─────╮ ╭─────╮ ╭─────╮ ║
//   ║ │ AC  │ │ +/- │ │  %  │ │  ÷  │ ║   × 5 rows
//   ║ ╰─────╯ ╰─────╯ ╰─────╯ ╰─────╯ ║
//   ║                                 ║
//   ║      (? help · q/esc quit)      ║
//   ╚═════════════════════════════════╝
//
// and compact (1-row buttons) otherwise. If not even the compact body fits,
// a notice is painted instead and no geometry is returned, so clicks hit
// nothing.

use std::time::Instant;

use goose_core::{
    Activation, BINDINGS, Button, ButtonGrid, Calculator, GridGeometry, GridPos, Session,
};
use goose_term::buffer::{BorderSet, FrameBuffer, Rect, char_width, string_width};
use goose_term::cell::{Cell, Style};
use goose_theme::Theme;

pub const TITLE: &str = "🦢  GOOSE CALC  🦢";
pub const FINISHED_MARKER: &str = "✅";

const HELP_HINT: &str = "(? help · q/esc quit)";
const HELP_BACK: &str = "(? back · q/esc quit)";

const BUTTON_WIDTH: u16 = 7;
const COL_GAP: u16 = 1;
/// Blank columns between the body border and its contents.
const PAD: u16 = 1;
/// Body rows that aren't the grid: two borders, title, expression,
/// separator, result, two blank lines and the help hint.
const CHROME_ROWS: u16 = 9;

// ─── Layout ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Bordered,
    Compact,
}

impl Layout {
    const fn button_height(self) -> u16 {
        match self {
            Self::Bordered => 3,
            Self::Compact => 1,
        }
    }

    /// Screen placement of `grid` in this layout with its corner at `origin`.
    fn geometry(self, grid: &ButtonGrid, origin: (u16, u16)) -> GridGeometry {
        GridGeometry::new(grid, origin, (BUTTON_WIDTH, self.button_height()), (COL_GAP, 0))
    }

    /// Outer size of the body panel.
    fn body_size(self, grid: &ButtonGrid) -> (u16, u16) {
        let geo = self.geometry(grid, (0, 0));
        (
            geo.total_width().saturating_add(2 + 2 * PAD),
            geo.total_height().saturating_add(CHROME_ROWS),
        )
    }

    /// The roomiest layout that fits `area`, with the centered body rect.
    #[must_use]
    pub fn choose(grid: &ButtonGrid, area: Rect) -> Option<(Self, Rect)> {
        [Self::Bordered, Self::Compact].into_iter().find_map(|layout| {
            let (w, h) = layout.body_size(grid);
            (w <= area.width && h <= area.height).then(|| (layout, area.centered(w, h)))
        })
    }
}

/// How one button cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellState {
    Idle,
    Cursor,
    Pressed(Activation),
}

// ─── Paint ──────────────────────────────────────────────────────────────────

/// Paint the whole calculator. Returns where the grid went, or `None` when
/// no grid was drawn (terminal too small, or the help panel is up).
pub fn paint(
    frame: &mut FrameBuffer,
    session: &Session,
    theme: &Theme,
    now: Instant,
) -> Option<GridGeometry> {
    let grid = session.grid();
    let Some((layout, body)) = Layout::choose(grid, frame.area()) else {
        paint_too_small(frame, grid, theme);
        return None;
    };

    frame.fill_rect(body, theme.body);
    frame.draw_box(body, BorderSet::DOUBLE, theme.border);

    let inner = Rect::new(
        body.x + 1 + PAD,
        body.y + 1,
        body.width - 2 - 2 * PAD,
        body.height - 2,
    );
    let mut y = inner.y;
    frame.paint_centered(inner.x, y, inner.width, TITLE, theme.title);
    y += 1;
    paint_display(frame, session.calculator(), theme, Rect::new(inner.x, y, inner.width, 3));
    y += 4;

    let grid_height = layout.geometry(grid, (0, 0)).total_height();
    let grid_area = Rect::new(inner.x, y, inner.width, grid_height);
    let hint_y = inner.bottom() - 1;

    if session.show_help() {
        paint_help(frame, theme, grid_area);
        frame.paint_centered(inner.x, hint_y, inner.width, HELP_BACK, theme.help);
        return None;
    }

    let grid_width = layout.geometry(grid, (0, 0)).total_width();
    let origin = (grid_area.x + grid_area.width.saturating_sub(grid_width) / 2, grid_area.y);
    let geometry = layout.geometry(grid, origin);
    paint_grid(frame, session, theme, layout, &geometry, now);
    frame.paint_centered(inner.x, hint_y, inner.width, HELP_HINT, theme.help);
    Some(geometry)
}

/// `Expr:`, separator, `Result:`, one row each.
fn paint_display(frame: &mut FrameBuffer, calc: &Calculator, theme: &Theme, area: Rect) {
    let (x, width) = (area.x, area.width);
    let expr = calc.previous_display();
    paint_labeled(frame, x, area.y, width, "Expr: ", expr, theme.expression, theme.expression);

    let rule: String = "─".repeat(usize::from(area.width));
    frame.paint_text(x, area.y + 1, &rule, theme.separator);

    let value_style = if calc.is_error() { theme.error } else { theme.result };
    let result = result_text(calc);
    paint_labeled(frame, x, area.y + 2, width, "Result: ", &result, theme.result, value_style);
}

#[allow(clippy::too_many_arguments)]
fn paint_labeled(
    frame: &mut FrameBuffer,
    x: u16,
    y: u16,
    width: u16,
    label: &str,
    value: &str,
    label_style: Style,
    value_style: Style,
) {
    let used = frame.paint_text(x, y, label, label_style);
    let room = usize::from(width.saturating_sub(used));
    frame.paint_text(x + used, y, &clip_left(value, room), value_style);
}

/// What follows `Result:`.
///
/// The display with the finished marker right after `=` or HONK, even
/// when that evaluation failed; the error marker while in error; nothing
/// while the second operand is awaited; otherwise the number being typed.
#[must_use]
pub fn result_text(calc: &Calculator) -> String {
    if calc.is_finished() {
        format!("{} {FINISHED_MARKER}", calc.display())
    } else if calc.is_error() {
        calc.display().to_string()
    } else if calc.awaiting_operand2() {
        String::new()
    } else {
        calc.display().to_string()
    }
}

/// The tail of `text` that fits in `width` columns, with a leading `…`
/// when something was cut.
fn clip_left(text: &str, width: usize) -> String {
    if string_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut kept = Vec::new();
    let mut used = 1;
    for ch in text.chars().rev() {
        let w = char_width(ch);
        if used + w > width {
            break;
        }
        used += w;
        kept.push(ch);
    }
    std::iter::once('…').chain(kept.into_iter().rev()).collect()
}

fn paint_grid(
    frame: &mut FrameBuffer,
    session: &Session,
    theme: &Theme,
    layout: Layout,
    geometry: &GridGeometry,
    now: Instant,
) {
    let pressed = session.active_press(now);
    for (pos, button) in session.grid().iter() {
        let Some(rect) = geometry.cell_rect(pos) else {
            continue;
        };
        let state = match pressed {
            Some(m) if m.pos == pos => CellState::Pressed(m.kind),
            _ if pos == session.cursor() => CellState::Cursor,
            _ => CellState::Idle,
        };
        paint_button(frame, rect, button, state, theme, layout);
    }
}

/// Face style of an idle button.
#[must_use]
pub const fn button_style(button: Button, theme: &Theme) -> Style {
    match button {
        Button::Digit(_) => theme.digit,
        Button::Operator(_) => theme.operator,
        Button::Decimal | Button::ToggleSign | Button::Percent => theme.function,
        Button::AllClear => theme.clear,
        Button::Equals => theme.equals,
        Button::Honk => theme.honk,
    }
}

fn paint_button(
    frame: &mut FrameBuffer,
    rect: Rect,
    button: Button,
    state: CellState,
    theme: &Theme,
    layout: Layout,
) {
    let face = match state {
        CellState::Pressed(Activation::Navigation) => theme.pressed,
        CellState::Pressed(Activation::DirectKeyboard) => theme.pressed_direct,
        CellState::Idle | CellState::Cursor => button_style(button, theme),
    };
    let label = button.label();

    match layout {
        Layout::Bordered => {
            let (border, set) = if state == CellState::Cursor {
                (theme.cursor, BorderSet::HEAVY)
            } else {
                (theme.button_border, BorderSet::ROUNDED)
            };
            frame.draw_box(rect, set, border);
            let inside = rect.inset(1);
            frame.fill_rect(inside, face);
            frame.paint_centered(inside.x, inside.y + inside.height / 2, inside.width, label, face);
        }
        Layout::Compact => {
            frame.fill_rect(rect, face);
            frame.paint_centered(rect.x, rect.y, rect.width, label, face);
            if state == CellState::Cursor {
                let mark = theme.cursor.with_bg(face.bg);
                frame.set(rect.x, rect.y, Cell::styled('▸', mark));
                frame.set(rect.right() - 1, rect.y, Cell::styled('◂', mark));
            }
        }
    }
}

/// Key bindings in place of the grid, as many as fit.
fn paint_help(frame: &mut FrameBuffer, theme: &Theme, area: Rect) {
    let key_width = BINDINGS.iter().map(|(k, _)| string_width(k)).max().unwrap_or(0);
    let key_width = u16::try_from(key_width).unwrap_or(u16::MAX);
    for ((keys, what), y) in BINDINGS.iter().zip(area.y..area.bottom()) {
        frame.paint_text(area.x + 1, y, keys, theme.title);
        let desc_x = area.x + 1 + key_width + 2;
        let room = usize::from(area.right().saturating_sub(desc_x));
        frame.paint_text(desc_x, y, &clip_left(what, room), theme.expression);
    }
}

fn paint_too_small(frame: &mut FrameBuffer, grid: &ButtonGrid, theme: &Theme) {
    let (w, h) = Layout::Compact.body_size(grid);
    let area = frame.area();
    if area.height == 0 {
        return;
    }
    let y = area.height / 2;
    frame.paint_centered(0, y.saturating_sub(1), area.width, "Terminal too small", theme.error);
    frame.paint_centered(0, y, area.width, &format!("need {w}×{h}"), theme.help);
}

// ─── Tests ──────────────────────────────────────────────────────────────────
