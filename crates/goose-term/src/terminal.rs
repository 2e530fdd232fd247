// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, alternate screen, mouse, and guaranteed
// restore.
//
// Safety: termios (tcgetattr / tcsetattr), ioctl(TIOCGWINSZ), isatty and the
// raw fd write in the panic hook are plain POSIX calls with no safe std
// equivalent. Each unsafe block is a single call.
#![allow(unsafe_code)]
//
// `Terminal::enter` saves the current termios, switches to raw mode and the
// alternate screen, hides the cursor and turns on click reporting. `leave`
// (or `Drop`) undoes all of it. A panic hook writes a fixed restore
// sequence straight to fd 1 and puts termios back, so a crash prints its
// message to a usable shell instead of a raw-mode screen.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when the real size can't be queried (pipes, CI).
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

// ─── Queries ────────────────────────────────────────────────────────────────

/// Current size of the terminal on stdout, if it is one.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    // SAFETY: winsize is plain old data; zeroed is a valid value.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    // SAFETY: TIOCGWINSZ writes one winsize into the pointer we pass.
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    // SAFETY: isatty only inspects the descriptor.
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic Restore ──────────────────────────────────────────────────────────

/// termios saved at `enter`, reachable from the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Everything `leave` would send, as one pre-built write.
///
/// Alternate screen exit is last so the shell reappears clean.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[?1006l\x1b[?1003l\x1b[?1002l\x1b[?1000l\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            previous(info);
        }));
    });
}

/// Restore the screen and termios without touching Rust's stdout lock,
/// which the panicking thread may be holding mid-frame.
fn emergency_restore() {
    #[cfg(unix)]
    {
        // SAFETY: writes a static byte slice to fd 1.
        unsafe {
            let _ = libc::write(
                libc::STDOUT_FILENO,
                EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
                EMERGENCY_RESTORE.len(),
            );
        }
        if let Ok(saved) = SAVED_TERMIOS.lock() {
            if let Some(ref original) = *saved {
                // SAFETY: `original` came from tcgetattr on the same fd.
                unsafe {
                    let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
                }
            }
        }
    }
    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(EMERGENCY_RESTORE);
        let _ = out.flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Owns the terminal's raw-mode state; restores it on drop.
///
/// ```no_run
/// use goose_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // draw frames, read input...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    #[cfg(unix)]
    original: Option<libc::termios>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// A handle sized to the current terminal (80×24 when unknown).
    ///
    /// Nothing about the terminal changes until [`enter`](Self::enter).
    #[must_use]
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            original: None,
            size: get_size().unwrap_or(Size::FALLBACK),
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Query the size again, e.g. after SIGWINCH.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = get_size() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Switch to raw mode and the alternate screen, hide the cursor and
    /// enable click reporting. No-op when already active.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or the terminal write fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.enable_raw_mode()?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::enable_mouse(&mut out)?;
        out.flush()?;

        self.active = true;
        Ok(())
    }

    /// Undo everything [`enter`](Self::enter) did. No-op when inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal write or termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            ansi::end_sync(&mut out)?;
            ansi::disable_mouse(&mut out)?;
            ansi::reset(&mut out)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush()?;
        }
        self.disable_raw_mode()?;
        self.active = false;
        Ok(())
    }

    /// Write a title for the window (OSC 2).
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn set_title(&self, title: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        ansi::set_title(&mut out, title)?;
        out.flush()
    }

    // ── termios ──────────────────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        if !is_tty() {
            return Ok(());
        }
        let fd = libc::STDIN_FILENO;

        // SAFETY: termios is plain old data, filled in by tcgetattr.
        let mut raw: libc::termios = unsafe { std::mem::zeroed() };
        // SAFETY: valid fd and pointer.
        if unsafe { libc::tcgetattr(fd, &raw mut raw) } != 0 {
            return Err(io::Error::last_os_error());
        }

        self.original = Some(raw);
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = Some(raw);
        }

        // Same flags as cfmakeraw, but ISIG stays off too so Ctrl-C reaches
        // the app as a key press instead of killing it.
        raw.c_iflag &= !(libc::IGNBRK
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP
            | libc::INLCR
            | libc::IGNCR
            | libc::ICRNL
            | libc::IXON);
        raw.c_oflag &= !libc::OPOST;
        raw.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
        raw.c_cflag &= !(libc::CSIZE | libc::PARENB);
        raw.c_cflag |= libc::CS8;
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;

        // SAFETY: valid fd and a fully initialized termios.
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const raw) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };
        // SAFETY: `original` came from tcgetattr on this fd.
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) } != 0
        {
            return Err(io::Error::last_os_error());
        }
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = None;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
