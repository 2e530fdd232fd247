// SPDX-License-Identifier: MIT
//
// goose-calc: a button-grid calculator for the terminal.
//
// This binary wires the crates together:
//
//   goose-term  → raw mode, input parsing, frame diffing, event loop
//   goose-theme → the styles every element is painted with
//   goose-core  → key map, button grid, calculator state machine
//
// Each key or click flows through:
//
//   stdin → parser → Calc::on_event → Session::handle → Calculator::press
//   paint → view::paint → framebuffer → diff renderer → terminal
//                 └──── grid geometry ──→ session (for the next click)

mod app;
mod config;
mod error;
mod logging;
mod sound;
mod view;

use std::env;
use std::process;

use clap::Parser;
use goose_term::event_loop::{EventLoop, LoopConfig};
use goose_theme::builtin_names;
use tracing::info;

use crate::app::Calc;
use crate::config::{Cli, Config};
use crate::error::Error;

const WINDOW_TITLE: &str = "Goose Calc";
const FAREWELL: &str = "Thanks for using the Goose Calculator!";

fn run(cli: &Cli) -> Result<(), Error> {
    let config = Config::resolve(cli, |name| env::var(name).ok())?;
    logging::init(config.log_file.as_deref())?;
    info!(
        theme = %config.theme.name,
        profile = ?config.profile,
        sound = ?config.sound,
        "starting"
    );

    let mut calc = Calc::new(config.theme, sound::chime_for(config.sound));
    let mut event_loop = EventLoop::with_config(LoopConfig {
        profile: config.profile,
        title: Some(WINDOW_TITLE),
        ..LoopConfig::default()
    });
    event_loop.run(&mut calc)?;

    info!(result = calc.session().calculator().display(), "exiting");
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in builtin_names() {
            println!("{name}");
        }
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("goose-calc: {e}");
        process::exit(1);
    }
    println!("{FAREWELL}");
}
