//! Work/rest Interval Timer Library
//!
//! This library provides the core functionality for the worktimer CLI.
//! It includes:
//! - Stopwatch timers with per-iteration and lifetime totals
//! - The work/rest session state machine with threshold alerts
//! - A tokio tick loop that dispatches alerts to sound and notifications
//! - CLI command parsing and display sinks
//! - Type definitions for configuration and snapshots

pub mod cli;
pub mod engine;
pub mod notification;
pub mod session;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    format_hms, parse_minutes, AlertDirection, ControlState, Mode, SessionConfig, Snapshot,
};

pub use session::{
    Action, AlertSignal, Clock, ManualClock, SessionController, SessionEffect, SystemClock, Timer,
};

pub use engine::{InputCommand, SessionEngine};

// Re-export sound types
pub use sound::{
    create_player, MockSoundPlayer, RodioSoundPlayer, SilentSoundPlayer, SoundError, SoundPlayer,
    ToneSequence,
};

// Re-export notification types
pub use notification::{
    DesktopNotifier, MockNotificationSender, NotificationError, NotificationSender,
};
