//! Line-based command input.
//!
//! Commands arrive one per line on stdin. Parsing is separated from the
//! reader so it can be tested without a terminal.

use std::io::BufRead;
use std::thread;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::session::Action;
use crate::types::parse_minutes;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Forwarded to the session controller
    Action(Action),
    /// Set the work threshold in minutes
    SetWork(u32),
    /// Set the rest threshold in minutes
    SetRest(u32),
    /// Toggle alarm tones
    ToggleSound,
    /// Toggle desktop notifications
    ToggleNotify,
    /// Show key help
    Help,
    /// End the session
    Quit,
    /// Anything unrecognized
    Unknown(String),
}

/// Parses one input line.
///
/// An empty line is the primary action, so pressing Enter starts, pauses
/// and resumes. Minute arguments are coerced with [`parse_minutes`].
pub fn parse_command(line: &str) -> InputCommand {
    let trimmed = line.trim();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" | "p" | "play" | "pause" | "space" => InputCommand::Action(Action::Primary),
        "s" | "swap" => InputCommand::Action(Action::Swap),
        "r" | "reset" => InputCommand::Action(Action::Reset),
        "w" | "work" => InputCommand::SetWork(parse_minutes(rest)),
        "b" | "rest" => InputCommand::SetRest(parse_minutes(rest)),
        "sound" => InputCommand::ToggleSound,
        "notify" => InputCommand::ToggleNotify,
        "?" | "h" | "help" => InputCommand::Help,
        "q" | "quit" | "exit" => InputCommand::Quit,
        _ => InputCommand::Unknown(trimmed.to_string()),
    }
}

/// Reads stdin on a dedicated thread and forwards parsed commands.
///
/// End of input is delivered as [`InputCommand::Quit`]. The thread stops
/// after a quit or once the receiver is gone.
pub fn spawn_stdin_reader(tx: UnboundedSender<InputCommand>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let command = parse_command(&line);
            let quit = command == InputCommand::Quit;
            if tx.send(command).is_err() || quit {
                return;
            }
        }
        debug!("stdin closed");
        let _ = tx.send(InputCommand::Quit);
    })
}
