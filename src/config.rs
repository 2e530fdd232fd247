// SPDX-License-Identifier: MIT
//
// Command line and environment → resolved settings.
//
// `Cli` is what clap parses. `Config::resolve` turns it into things the
// rest of the program can use directly: a built theme, a concrete color
// profile, a sound mode and an optional log path. Environment lookups go
// through a closure so tests don't touch the real environment.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use goose_term::color::ColorProfile;
use goose_theme::{DEFAULT_THEME, Theme, builtin_theme};

use crate::error::Error;

/// Names a log file when `--log-file` isn't given.
pub const LOG_ENV: &str = "GOOSE_CALC_LOG";

/// A calculator in your terminal. It honks.
#[derive(Debug, Clone, Parser)]
#[command(name = "goose-calc", version, about)]
pub struct Cli {
    /// Color theme
    #[arg(long, value_name = "NAME", default_value = DEFAULT_THEME)]
    pub theme: String,

    /// Print the builtin theme names and exit
    #[arg(long)]
    pub list_themes: bool,

    /// Color depth; `auto` asks the environment
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Button sounds
    #[arg(long, value_enum, default_value_t = SoundMode::Auto)]
    pub sound: SoundMode,

    /// Write logs here (filtered by RUST_LOG, default `info`)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Truecolor,
    Ansi256,
    Ansi16,
    None,
}

impl ColorChoice {
    /// The profile to render with. `Auto` reads `NO_COLOR`, `COLORTERM`,
    /// `TERM`, `TERM_PROGRAM` and `VHS` through `lookup`.
    pub fn resolve<F>(self, lookup: F) -> ColorProfile
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            Self::Auto => ColorProfile::detect(lookup),
            Self::Truecolor => ColorProfile::TrueColor,
            Self::Ansi256 => ColorProfile::Ansi256,
            Self::Ansi16 => ColorProfile::Ansi16,
            Self::None => ColorProfile::NoColor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SoundMode {
    /// Tones through aplay or paplay, silent if neither exists
    Auto,
    /// Terminal bell
    Bell,
    Off,
}

/// Everything `main` needs to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub profile: ColorProfile,
    pub sound: SoundMode,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// # Errors
    ///
    /// [`Error::UnknownTheme`] if `--theme` names no builtin.
    pub fn resolve<F>(cli: &Cli, lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let theme =
            builtin_theme(&cli.theme).ok_or_else(|| Error::UnknownTheme(cli.theme.clone()))?;
        let profile = cli.color.resolve(&lookup);
        // NoColor drops every color, so attributes take over.
        let theme = if profile == ColorProfile::NoColor {
            theme.monochrome()
        } else {
            theme
        };
        let log_file = cli
            .log_file
            .clone()
            .or_else(|| lookup(LOG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));

        Ok(Self {
            theme,
            profile,
            sound: cli.sound,
            log_file,
        })
    }
}
