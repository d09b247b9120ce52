//! CLI module for the timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output sinks and formatting

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, RunArgs};
pub use display::{Display, DisplaySink, JsonDisplay, RecordingDisplay, TerminalDisplay};
