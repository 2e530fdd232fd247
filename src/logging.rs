// SPDX-License-Identifier: MIT
//
// Log setup. The terminal belongs to the UI, so logs only ever go to a
// file; without one, no subscriber is installed and every `tracing` macro
// is a no-op.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::Error;

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

/// Open `path` for appending.
///
/// # Errors
///
/// [`Error::LogFile`] if the file can't be created or opened.
pub fn open_log(path: &Path) -> Result<File, Error> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing plain lines to `path`. Does
/// nothing when `path` is `None`.
///
/// # Errors
///
/// [`Error::LogFile`] if the log file can't be opened.
pub fn init(path: Option<&Path>) -> Result<(), Error> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = open_log(path)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
    if let Err(error) = installed {
        // The first subscriber stays.
        debug!(%error, path = %path.display(), "log subscriber already installed");
    }
    Ok(())
}
