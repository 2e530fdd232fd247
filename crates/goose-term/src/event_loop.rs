// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: stdin bytes in, frames out.
//
// Bytes from the background reader are parsed into events and handed to
// the application, which paints into a frame buffer that the diff renderer
// turns into ANSI output. A frame is only rendered when something changed.
//
// The loop blocks on the reader channel with a timeout. While the parser
// holds a lone ESC the timeout is short, so the Escape key is reported
// quickly; otherwise it is the tick interval, which drives time-based
// state such as the press highlight fading out. An idle calculator costs
// one wake-up per tick.
//
// Terminal resize arrives as SIGWINCH. The handler only sets an atomic
// flag; the loop notices it on its next iteration and redraws in full.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::buffer::FrameBuffer;
use crate::color::ColorProfile;
use crate::diff::DiffRenderer;
use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Route SIGWINCH to [`SIGWINCH_RECEIVED`]. Storing to an atomic is
/// async-signal-safe.
#[cfg(unix)]
fn install_sigwinch_handler() {
    // SAFETY: sigaction is plain old data; the handler only touches an atomic.
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the loop does after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// An application driven by [`EventLoop`].
///
/// Per iteration the loop calls [`on_event`](App::on_event) for each parsed
/// event, [`on_resize`](App::on_resize) if the terminal changed size,
/// [`on_tick`](App::on_tick) once, and finally [`paint`](App::paint) when
/// any of those reported a change.
pub trait App {
    /// Return [`Action::Quit`] to leave the loop.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The frame buffer has already been resized when this runs.
    fn on_resize(&mut self, _size: Size) {}

    /// Called on every wake-up, input or not. Return `true` when
    /// time-based state changed and the frame needs repainting.
    fn on_tick(&mut self, _now: Instant) -> bool {
        false
    }

    /// Paint the whole UI. `buf` is cleared beforehand.
    fn paint(&mut self, buf: &mut FrameBuffer);
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Timing and output settings for [`EventLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Wait between ticks when no input is pending.
    pub tick_interval: Duration,
    /// Wait before a lone ESC is reported as the Escape key.
    pub escape_timeout: Duration,
    /// Color depth frames are rendered at.
    pub profile: ColorProfile,
    /// Window title set on entry.
    pub title: Option<&'static str>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(300),
            escape_timeout: Duration::from_millis(10),
            profile: ColorProfile::TrueColor,
            title: None,
        }
    }
}

impl LoopConfig {
    /// How long the next channel wait may block.
    #[must_use]
    pub const fn wait_for(&self, escape_pending: bool) -> Duration {
        if escape_pending {
            self.escape_timeout
        } else {
            self.tick_interval
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal, parser and renderer; [`run`](Self::run) drives an
/// [`App`] until it quits.
///
/// ```no_run
/// use goose_term::buffer::FrameBuffer;
/// use goose_term::event_loop::{Action, App, EventLoop};
/// use goose_term::input::{Event, KeyCode, KeyEvent};
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_event(&mut self, event: &Event) -> Action {
///         match event {
///             Event::Key(KeyEvent { code: KeyCode::Char('q'), .. }) => Action::Quit,
///             _ => Action::Continue,
///         }
///     }
///
///     fn paint(&mut self, buf: &mut FrameBuffer) {
///         buf.paint_text(0, 0, "press q", Default::default());
///     }
/// }
///
/// EventLoop::new().run(&mut Quitter)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            renderer: DiffRenderer::with_profile(config.profile),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Enter the terminal, run `app` until it quits or stdin closes, then
    /// restore the terminal. Restoration happens even when the loop fails.
    ///
    /// # Errors
    ///
    /// Returns an error if entering, rendering, or leaving the terminal
    /// fails, or if the stdin reader can't be started.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        if let Some(title) = self.config.title {
            self.terminal.set_title(title)?;
        }
        install_sigwinch_handler();

        let result = match StdinReader::spawn() {
            Ok((mut reader, rx)) => {
                let result = self.run_inner(app, &rx);
                reader.stop();
                result
            }
            Err(e) => Err(e),
        };

        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let size = self.terminal.refresh_size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        app.on_resize(size);
        let mut dirty = true;

        loop {
            let wait = self.config.wait_for(self.parser.has_pending());
            let events = match rx.recv_timeout(wait) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) => {
                    if self.parser.has_pending() {
                        self.parser.flush()
                    } else {
                        Vec::new()
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            };

            for event in &events {
                if app.on_event(event) == Action::Quit {
                    return Ok(());
                }
            }
            dirty |= !events.is_empty();

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                frame.resize(size.cols, size.rows);
                self.renderer.force_redraw();
                app.on_resize(size);
                dirty = true;
            }

            dirty |= app.on_tick(Instant::now());

            if dirty {
                frame.clear();
                app.paint(&mut frame);
                self.renderer.render(&frame);
                self.renderer.flush()?;
                dirty = false;
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
