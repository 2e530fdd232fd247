// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Each frame is compared with the one before it and only changed cells are
// written. Pressing a calculator button typically touches the display line
// and one or two buttons, so most rows are skipped with a single slice
// comparison. The frame is wrapped in synchronized output so terminals that
// support it present it atomically.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::color::ColorProfile;
use crate::output::{CellWriter, OutputBuffer};

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub cells_rendered: usize,
    pub cells_skipped: usize,
    pub bytes_written: usize,
}

/// Turns successive frames into minimal ANSI output.
///
/// ```no_run
/// use goose_term::buffer::FrameBuffer;
/// use goose_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let frame = FrameBuffer::new(80, 24);
/// renderer.render(&frame);
/// renderer.flush()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct DiffRenderer {
    output: OutputBuffer,
    writer: CellWriter,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_profile(ColorProfile::TrueColor)
    }

    /// A renderer that downgrades colors for `profile` terminals.
    #[must_use]
    pub fn with_profile(profile: ColorProfile) -> Self {
        Self {
            output: OutputBuffer::new(),
            writer: CellWriter::with_profile(profile),
            previous: None,
        }
    }

    #[must_use]
    pub const fn profile(&self) -> ColorProfile {
        self.writer.profile()
    }

    /// Diff `current` against the previous frame into the output buffer.
    ///
    /// The first frame, and any frame whose size differs from the previous
    /// one, clears the screen and is drawn in full.
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        self.writer.reset_state();

        let (width, height) = (current.width(), current.height());
        let mut stats = RenderStats::default();

        if width == 0 || height == 0 {
            self.store_frame(current);
            return stats;
        }

        ansi::begin_sync(&mut self.output).ok();

        let previous = self
            .previous
            .as_ref()
            .filter(|p| p.width() == width && p.height() == height);

        if previous.is_none() {
            ansi::reset(&mut self.output).ok();
            ansi::clear_screen(&mut self.output).ok();
        }

        for y in 0..height {
            let Some(row) = current.row(y) else { break };
            let old_row = previous.and_then(|p| p.row(y));

            if old_row == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }

            for (x, cell) in (0..width).zip(row) {
                if old_row.is_some_and(|old| old[usize::from(x)] == *cell) {
                    stats.cells_skipped += 1;
                } else {
                    self.writer.render_cell(&mut self.output, x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        ansi::reset(&mut self.output).ok();
        ansi::end_sync(&mut self.output).ok();
        stats.bytes_written = self.output.len();

        self.store_frame(current);
        stats
    }

    /// ANSI bytes produced by the last [`render`](Self::render).
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Write the pending frame to stdout.
    ///
    /// # Errors
    ///
    /// Returns the error from writing to stdout.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush_stdout()
    }

    /// Write the pending frame to `w`.
    ///
    /// # Errors
    ///
    /// Returns the error from writing to `w`.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }

    /// Make the next render a full redraw.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn store_frame(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev) => prev.clone_from(current),
            None => self.previous = Some(current.clone()),
        }
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell, Style};
    use crate::color::CellColor;

    fn render(renderer: &mut DiffRenderer, frame: &FrameBuffer) -> (RenderStats, String) {
        let stats = renderer.render(frame);
        (stats, String::from_utf8(renderer.output_bytes().to_vec()).unwrap())
    }

    #[test]
    fn first_render_draws_everything() {
        let mut r = DiffRenderer::new();
        let frame = FrameBuffer::new(6, 3);
        let (stats, out) = render(&mut r, &frame);
        assert_eq!(stats.cells_rendered, 18);
        assert_eq!(stats.cells_skipped, 0);
        assert!(out.contains("\x1b[2J"));
        assert!(out.starts_with("\x1b[?2026h"));
        assert!(out.ends_with("\x1b[?2026l"));
    }

    #[test]
    fn identical_frame_renders_nothing() {
        let mut r = DiffRenderer::new();
        let frame = FrameBuffer::new(6, 3);
        r.render(&frame);
        let (stats, out) = render(&mut r, &frame);
        assert_eq!(stats.cells_rendered, 0);
        assert_eq!(stats.cells_skipped, 18);
        assert!(!out.contains("\x1b[2J"));
    }

    #[test]
    fn only_changed_cells_are_written() {
        let mut r = DiffRenderer::new();
        let mut frame = FrameBuffer::new(10, 2);
        r.render(&frame);

        frame.paint_text(3, 1, "42", Style::fg(CellColor::Rgb(50, 205, 50)));
        let (stats, out) = render(&mut r, &frame);
        assert_eq!(stats.cells_rendered, 2);
        assert!(out.contains("\x1b[2;4H"));
        assert!(out.contains("42"));
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut r = DiffRenderer::new();
        r.render(&FrameBuffer::new(4, 2));
        let (stats, out) = render(&mut r, &FrameBuffer::new(5, 2));
        assert_eq!(stats.cells_rendered, 10);
        assert!(out.contains("\x1b[2J"));
    }

    #[test]
    fn force_redraw_repaints() {
        let mut r = DiffRenderer::new();
        let frame = FrameBuffer::new(3, 3);
        r.render(&frame);
        r.force_redraw();
        let (stats, _) = render(&mut r, &frame);
        assert_eq!(stats.cells_rendered, 9);
    }

    #[test]
    fn zero_size_frame_is_silent() {
        let mut r = DiffRenderer::new();
        let (stats, out) = render(&mut r, &FrameBuffer::new(0, 0));
        assert_eq!(stats, RenderStats::default());
        assert!(out.is_empty());
    }

    #[test]
    fn profile_applies_to_output() {
        let mut r = DiffRenderer::with_profile(ColorProfile::NoColor);
        assert_eq!(r.profile(), ColorProfile::NoColor);
        let mut frame = FrameBuffer::new(1, 1);
        frame.set(0, 0, Cell::styled('x', Style::new(CellColor::Rgb(1, 2, 3), CellColor::Rgb(4, 5, 6))));
        let (_, out) = render(&mut r, &frame);
        assert!(!out.contains("38;2"));
        assert!(!out.contains("48;2"));
    }

    #[test]
    fn flush_to_writes_and_drains() {
        let mut r = DiffRenderer::new();
        r.render(&FrameBuffer::new(2, 1));
        let mut sink = Vec::new();
        r.flush_to(&mut sink).unwrap();
        assert!(!sink.is_empty());
        assert!(r.output_bytes().is_empty());
    }
}
