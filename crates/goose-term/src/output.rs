// SPDX-License-Identifier: MIT
//
// Frame output: one buffer per frame, and a writer that only emits the
// escape sequences a cell actually needs.
//
//   OutputBuffer: collects a whole frame in memory so it reaches the
//   terminal in a single write.
//
//   CellWriter: remembers the cursor position and current SGR state, so
//   consecutive cells in the same style cost one byte each. Colors pass
//   through the active `ColorProfile` here, which is the only place the
//   pipeline knows what the terminal can display.

use std::io::{self, Write};

use crate::ansi;
use crate::cell::{Attr, Cell};
use crate::color::{CellColor, ColorProfile};

// ─── OutputBuffer ────────────────────────────────────────────────────────────

const DEFAULT_CAPACITY: usize = 8_192;

/// In-memory sink for one frame of ANSI output.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append a codepoint as UTF-8; invalid codepoints become `?`.
    pub fn write_codepoint(&mut self, cp: u32) {
        match char::from_u32(cp).filter(|&c| c != '\0') {
            Some(ch) => {
                let mut enc = [0u8; 4];
                self.buf
                    .extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
            }
            None => self.buf.push(b'?'),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write everything to stdout and empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns the error from writing to stdout.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.flush_to(&mut lock)
    }

    /// Write everything to `w` and empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns the error from writing to `w`.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Emits cells while tracking terminal state to skip redundant escapes.
///
/// - Cursor moves are skipped when the next cell is directly to the right
///   of the last one written.
/// - Attribute changes reset SGR (which also forgets colors) and re-emit.
/// - Colors are emitted only when they differ from the tracked ones.
#[allow(clippy::struct_field_names)]
pub struct CellWriter {
    profile: ColorProfile,
    last_x: i32,
    last_y: i32,
    last_fg: Option<CellColor>,
    last_bg: Option<CellColor>,
    last_attrs: Attr,
}

impl CellWriter {
    /// A writer for a truecolor terminal.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_profile(ColorProfile::TrueColor)
    }

    #[must_use]
    pub const fn with_profile(profile: ColorProfile) -> Self {
        Self {
            profile,
            last_x: -1,
            last_y: -1,
            last_fg: None,
            last_bg: None,
            last_attrs: Attr::empty(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn profile(&self) -> ColorProfile {
        self.profile
    }

    /// Forget tracked state; call after anything that resets the terminal.
    #[allow(clippy::missing_const_for_fn)]
    pub fn reset_state(&mut self) {
        *self = Self::with_profile(self.profile);
    }

    /// Write one cell at `(x, y)`.
    pub fn render_cell(&mut self, out: &mut OutputBuffer, x: u16, y: u16, cell: &Cell) {
        let (xi, yi) = (i32::from(x), i32::from(y));

        if cell.is_continuation() {
            // The wide owner just written already covered this column.
            if xi > 0 && self.last_x == xi - 1 && self.last_y == yi {
                self.last_x = xi;
                return;
            }
            self.move_to(out, xi, yi);
            self.apply_style(out, cell);
            out.buf.push(b' ');
        } else {
            self.move_to(out, xi, yi);
            self.apply_style(out, cell);
            out.write_codepoint(cell.ch);
        }

        self.last_x = xi;
        self.last_y = yi;
    }

    fn move_to(&self, out: &mut OutputBuffer, x: i32, y: i32) {
        if y != self.last_y || x != self.last_x + 1 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            ansi::cursor_to(out, x as u16, y as u16).ok();
        }
    }

    fn apply_style(&mut self, out: &mut OutputBuffer, cell: &Cell) {
        if cell.attrs != self.last_attrs {
            if !self.last_attrs.is_empty() {
                ansi::reset(out).ok();
                self.last_fg = None;
                self.last_bg = None;
            }
            self.last_attrs = cell.attrs;
            ansi::attrs(out, cell.attrs).ok();
        }

        let fg = self.profile.apply(cell.fg);
        if self.last_fg != Some(fg) {
            ansi::fg(out, fg).ok();
            self.last_fg = Some(fg);
        }

        let bg = self.profile.apply(cell.bg);
        if self.last_bg != Some(bg) {
            ansi::bg(out, bg).ok();
            self.last_bg = Some(bg);
        }
    }
}

impl Default for CellWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
