// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader.
//
// `read()` on a raw-mode stdin blocks, while the event loop needs to wake
// up for ticks and escape timeouts. A dedicated thread does the reading and
// forwards byte chunks over a channel; the loop waits on that channel with
// `recv_timeout`.
//
// The thread polls stdin with a short timeout and checks a stop flag in
// between, so shutdown never leaves it stuck inside `read()`.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Terminal input arrives a few bytes at a time; 1 KB is plenty.
const READ_BUF_SIZE: usize = 1024;

/// Upper bound on how long `stop` waits for the thread (milliseconds).
const POLL_TIMEOUT_MS: i32 = 50;

/// Handle to the stdin reader thread; stops the thread when dropped.
pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Start reading stdin on a background thread.
    ///
    /// Every message on the returned channel is a non-empty chunk of raw
    /// bytes. The channel closes on EOF, on a read error, or after
    /// [`stop`](Self::stop).
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn() -> io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || read_loop(&tx, &flag))?;

        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Ask the thread to exit and wait for it. Safe to call twice.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(unix)]
fn read_loop(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    use std::os::unix::io::AsRawFd;

    let fd = io::stdin().as_raw_fd();
    let mut buf = [0u8; READ_BUF_SIZE];

    while !stop.load(Ordering::Relaxed) {
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: `pfd` is a valid pollfd for the duration of the call.
        let ready = unsafe { libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS) };
        if ready <= 0 {
            continue;
        }

        // SAFETY: `buf` is a live stack buffer of `buf.len()` bytes.
        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        let Ok(n) = usize::try_from(n) else { break };
        if n == 0 || tx.send(buf[..n].to_vec()).is_err() {
            break;
        }
    }
}

/// Without poll the thread can only notice `stop` between reads.
#[cfg(not(unix))]
fn read_loop(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    use std::io::Read;

    let mut stdin = std::io::stdin();
    let mut buf = [0u8; READ_BUF_SIZE];
    while !stop.load(Ordering::Relaxed) {
        match stdin.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
