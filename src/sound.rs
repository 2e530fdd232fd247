// SPDX-License-Identifier: MIT
//
// Audio feedback: a short tone per button press, pitched by button kind.
//
// The UI thread never waits on audio. `Speaker` hands each tone to a worker
// thread, which synthesizes 16-bit PCM and pipes it into an external
// raw-PCM player found on PATH at startup. Any failure silences the speaker
// for the rest of the session after one log line; the user never sees it.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use goose_core::ButtonKind;
use goose_term::ansi;
use tracing::{debug, warn};

use crate::config::SoundMode;

/// Output sample rate, mono.
pub const SAMPLE_RATE: u32 = 48_000;

/// Peak amplitude as a fraction of full scale.
const VOLUME: f32 = 0.25;

/// Length of the linear ramp at each end of a tone.
const FADE: Duration = Duration::from_millis(5);

// ─── Chime ──────────────────────────────────────────────────────────────────

/// Something that reacts audibly to a button press.
///
/// `play` returns immediately and never fails.
pub trait Chime {
    fn play(&self, kind: ButtonKind);
}

/// No sound at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Chime for Silent {
    fn play(&self, _kind: ButtonKind) {}
}

/// The terminal bell, whatever the button.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bell;

impl Chime for Bell {
    fn play(&self, _kind: ButtonKind) {
        let mut out = io::stdout().lock();
        let _ = ansi::bell(&mut out).and_then(|()| out.flush());
    }
}

/// The chime selected by `--sound`.
#[must_use]
pub fn chime_for(mode: SoundMode) -> Box<dyn Chime> {
    match mode {
        SoundMode::Auto => {
            let speaker = Speaker::new();
            debug!(silent = speaker.is_silent(), "sound: speaker");
            Box::new(speaker)
        }
        SoundMode::Bell => Box::new(Bell),
        SoundMode::Off => Box::new(Silent),
    }
}

// ─── Tones ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: Duration,
}

impl Tone {
    /// Digits are mid, operators and the point high, AC / `=` / HONK low
    /// and a little longer.
    #[must_use]
    pub const fn for_kind(kind: ButtonKind) -> Self {
        let (hz, ms) = match kind {
            ButtonKind::Digit => (600.0, 50),
            ButtonKind::Operator | ButtonKind::Decimal => (800.0, 50),
            ButtonKind::SpecialAction => (400.0, 80),
        };
        Self {
            frequency: hz,
            duration: Duration::from_millis(ms),
        }
    }

    /// Number of samples at [`SAMPLE_RATE`].
    #[must_use]
    pub fn samples(&self) -> usize {
        duration_samples(self.duration)
    }

    /// Signed 16-bit little-endian mono PCM, faded in and out.
    #[must_use]
    pub fn synthesize(&self) -> Vec<u8> {
        let n = self.samples();
        let fade = duration_samples(FADE).min(n / 2).max(1);
        #[allow(clippy::cast_precision_loss)]
        let rate = SAMPLE_RATE as f32;

        let mut pcm = Vec::with_capacity(n * 2);
        for i in 0..n {
            #[allow(clippy::cast_precision_loss)]
            let (t, edge) = (i as f32 / rate, i.min(n - 1 - i) as f32);
            #[allow(clippy::cast_precision_loss)]
            let envelope = (edge / fade as f32).min(1.0);
            let sample = (std::f32::consts::TAU * self.frequency * t).sin() * VOLUME * envelope;
            #[allow(clippy::cast_possible_truncation)]
            let value = (sample * f32::from(i16::MAX)) as i16;
            pcm.extend_from_slice(&value.to_le_bytes());
        }
        pcm
    }
}

fn duration_samples(d: Duration) -> usize {
    let n = u128::from(SAMPLE_RATE) * d.as_micros() / 1_000_000;
    usize::try_from(n).unwrap_or(usize::MAX)
}

// ─── Players ────────────────────────────────────────────────────────────────

/// External programs that play raw PCM from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    /// ALSA.
    Aplay,
    /// PulseAudio / PipeWire.
    Paplay,
}

impl Player {
    pub const ALL: [Self; 2] = [Self::Aplay, Self::Paplay];

    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Aplay => "aplay",
            Self::Paplay => "paplay",
        }
    }

    /// Arguments for 48 kHz mono S16LE on stdin.
    #[must_use]
    pub const fn args(self) -> &'static [&'static str] {
        match self {
            Self::Aplay => &["-q", "-t", "raw", "-f", "S16_LE", "-r", "48000", "-c", "1"],
            Self::Paplay => &["--raw", "--format=s16le", "--rate=48000", "--channels=1"],
        }
    }

    /// The first player found on `path` (a `PATH`-style list).
    #[must_use]
    pub fn discover(path: Option<&OsStr>) -> Option<(Self, PathBuf)> {
        let path = path?;
        Self::ALL
            .into_iter()
            .find_map(|p| find_in_path(p.program(), path).map(|exe| (p, exe)))
    }

    /// Play one tone to completion.
    fn play(self, exe: &Path, tone: &Tone) -> io::Result<()> {
        let mut child = Command::new(exe)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&tone.synthesize())?;
        }
        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {status}", self.program())))
        }
    }
}

fn find_in_path(program: &str, path: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

// ─── Speaker ────────────────────────────────────────────────────────────────

/// Tones through an external player on a worker thread.
#[derive(Debug)]
pub struct Speaker {
    tx: Option<Sender<Tone>>,
}

impl Speaker {
    /// Look for a player on `PATH` and start the worker. Falls back to
    /// silence, with one warning in the log, if either step fails.
    #[must_use]
    pub fn new() -> Self {
        let path = std::env::var_os("PATH");
        let Some((player, exe)) = Player::discover(path.as_deref()) else {
            warn!("no raw PCM player (aplay, paplay) on PATH; sound disabled");
            return Self::silent();
        };
        Self::with_player(player, exe)
    }

    /// A speaker that drops every tone.
    #[must_use]
    pub const fn silent() -> Self {
        Self { tx: None }
    }

    #[must_use]
    pub fn with_player(player: Player, exe: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("goose-speaker".into())
            .spawn(move || speaker_loop(player, &exe, &rx));
        match spawned {
            Ok(_) => {
                debug!(player = player.program(), "speaker ready");
                Self { tx: Some(tx) }
            }
            Err(e) => {
                warn!(error = %e, "could not start audio thread; sound disabled");
                Self::silent()
            }
        }
    }

    #[must_use]
    pub const fn is_silent(&self) -> bool {
        self.tx.is_none()
    }
}

impl Default for Speaker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chime for Speaker {
    fn play(&self, kind: ButtonKind) {
        if let Some(tx) = &self.tx {
            // A dead worker already logged why.
            let _ = tx.send(Tone::for_kind(kind));
        }
    }
}

/// Play tones until the sender goes away or playback fails once.
///
/// Tones that queued up while one was playing collapse to the newest, so
/// fast typing doesn't leave a backlog sounding after the keys stop.
fn speaker_loop(player: Player, exe: &Path, rx: &Receiver<Tone>) {
    while let Ok(mut tone) = rx.recv() {
        while let Ok(newer) = rx.try_recv() {
            tone = newer;
        }
        if let Err(e) = player.play(exe, &tone) {
            warn!(player = player.program(), error = %e, "audio playback failed; sound disabled");
            return;
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::fs;

    use super::*;

    fn samples_at(pcm: &[u8]) -> Vec<i16> {
        pcm.chunks_exact(2).map(|b| i16::from_le_bytes([b[0], b[1]])).collect()
    }

    #[test]
    fn tone_per_kind() {
        let tone = Tone::for_kind;
        assert_eq!(tone(ButtonKind::Digit).frequency, 600.0);
        assert_eq!(tone(ButtonKind::Operator).frequency, 800.0);
        assert_eq!(tone(ButtonKind::Decimal).frequency, 800.0);
        assert_eq!(tone(ButtonKind::SpecialAction).frequency, 400.0);
        assert_eq!(tone(ButtonKind::Digit).duration, Duration::from_millis(50));
        assert_eq!(tone(ButtonKind::SpecialAction).duration, Duration::from_millis(80));
    }

    #[test]
    fn pcm_length_matches_duration() {
        let tone = Tone::for_kind(ButtonKind::Digit);
        assert_eq!(tone.samples(), 2400);
        assert_eq!(tone.synthesize().len(), 4800);
        assert_eq!(Tone::for_kind(ButtonKind::SpecialAction).synthesize().len(), 7680);
    }

    #[test]
    fn pcm_fades_at_both_ends() {
        let samples = samples_at(&Tone::for_kind(ButtonKind::Operator).synthesize());
        assert_eq!(samples[0], 0);
        assert!(samples.last().unwrap().unsigned_abs() < 200);
        let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
        let limit = (f32::from(i16::MAX) * VOLUME) as u16 + 1;
        assert!(peak > limit / 2, "peak {peak}");
        assert!(peak <= limit, "peak {peak}");
    }

    #[test]
    fn zero_length_tone_is_empty() {
        let tone = Tone { frequency: 440.0, duration: Duration::ZERO };
        assert!(tone.synthesize().is_empty());
    }

    #[test]
    fn player_args_describe_the_pcm() {
        for player in Player::ALL {
            let args = player.args().join(" ");
            assert!(args.contains("48000"), "{args}");
            assert!(args.to_lowercase().contains("s16"), "{args}");
        }
    }

    #[test]
    fn discover_walks_path_in_order() {
        let root = std::env::temp_dir().join(format!("goose-calc-path-{}", std::process::id()));
        let (first, second) = (root.join("a"), root.join("b"));
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(second.join("aplay"), b"").unwrap();
        fs::write(first.join("paplay"), b"").unwrap();

        let path: OsString = std::env::join_paths([&first, &second]).unwrap();
        let found = Player::discover(Some(path.as_os_str()));
        assert_eq!(found, Some((Player::Aplay, second.join("aplay"))));

        let only_first: OsString = std::env::join_paths([&first]).unwrap();
        assert_eq!(
            Player::discover(Some(only_first.as_os_str())),
            Some((Player::Paplay, first.join("paplay")))
        );

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn discover_without_path() {
        assert_eq!(Player::discover(None), None);
        assert_eq!(Player::discover(Some(OsStr::new(""))), None);
    }

    #[test]
    fn silent_speaker_accepts_tones() {
        let speaker = Speaker::silent();
        assert!(speaker.is_silent());
        speaker.play(ButtonKind::Digit);
    }

    #[test]
    fn failing_player_silences_worker() {
        // Spawning a directory fails; the worker logs and exits, and later
        // sends are dropped without panicking.
        let speaker = Speaker::with_player(Player::Aplay, std::env::temp_dir());
        assert!(!speaker.is_silent());
        speaker.play(ButtonKind::Digit);
        thread::sleep(Duration::from_millis(50));
        speaker.play(ButtonKind::SpecialAction);
    }
}
