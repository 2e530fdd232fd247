// SPDX-License-Identifier: MIT
//
// Errors that end the program. Everything inside the calculator is
// absorbed into its display; only these reach `main`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Raw mode, rendering or the input thread failed.
    #[error("terminal: {0}")]
    Terminal(#[from] io::Error),

    #[error("cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown theme {0:?} (see --list-themes)")]
    UnknownTheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = Error::UnknownTheme("swan".into());
        assert_eq!(e.to_string(), "unknown theme \"swan\" (see --list-themes)");

        let e = Error::LogFile {
            path: PathBuf::from("/nope/calc.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        };
        assert_eq!(e.to_string(), "cannot open log file /nope/calc.log: no such directory");

        let e = Error::from(io::Error::other("not a tty"));
        assert_eq!(e.to_string(), "terminal: not a tty");
    }

    #[test]
    fn log_file_keeps_its_source() {
        use std::error::Error as _;
        let e = Error::LogFile {
            path: PathBuf::from("x"),
            source: io::Error::other("denied"),
        };
        assert_eq!(e.source().map(ToString::to_string), Some("denied".to_string()));
    }
}
