// SPDX-License-Identifier: MIT
//
// goose-term: the terminal engine under goose-calc.
//
// Raw termios, ANSI escape output and SGR mouse input, with no TUI
// framework in between. The application paints a `FrameBuffer`; the
// `DiffRenderer` compares it with the previous frame and writes only the
// cells that changed, downgrading colors to whatever the terminal supports.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
