//! Core data types for the work/rest timer.
//!
//! This module defines the data structures used for:
//! - Session mode and primary control state
//! - Session configuration with validation and input coercion
//! - Per-tick snapshots handed to the display layer
//! - Duration formatting

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Every Nth rest iteration gets the long-break threshold.
pub const LONG_BREAK_INTERVAL: u32 = 4;

/// Long-break threshold multiplier applied to the rest limit.
pub const LONG_BREAK_MULTIPLIER: u32 = 3;

// ============================================================================
// Mode
// ============================================================================

/// Which timer, if any, is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// No timer active (initial state, or after reset)
    #[default]
    Idle,
    /// Work timer is active
    Working,
    /// Rest timer is active
    Resting,
}

impl Mode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Working => "working",
            Mode::Resting => "resting",
        }
    }

    /// Short uppercase label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Idle => "IDLE",
            Mode::Working => "WORK",
            Mode::Resting => "REST",
        }
    }

    /// Returns true if a timer is receiving elapsed-time queries.
    pub fn is_active(&self) -> bool {
        matches!(self, Mode::Working | Mode::Resting)
    }
}

// ============================================================================
// ControlState
// ============================================================================

/// Semantic state of the combined start/pause/resume control.
///
/// The control is updated alongside each transition and never derived from
/// what the display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    /// Pressing starts the session from idle
    #[default]
    Start,
    /// Pressing pauses the running work timer
    Pause,
    /// Pressing resumes the paused work timer
    Resume,
}

impl ControlState {
    /// Returns the string representation of the control state.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlState::Start => "start",
            ControlState::Pause => "pause",
            ControlState::Resume => "resume",
        }
    }

    /// Glyph shown next to the status line.
    pub fn glyph(&self) -> &'static str {
        match self {
            ControlState::Start => "*",
            ControlState::Pause => "||",
            ControlState::Resume => ">",
        }
    }
}

// ============================================================================
// AlertDirection
// ============================================================================

/// Direction of the transition an alert is announcing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertDirection {
    /// The work threshold was reached; time to rest
    WorkToRest,
    /// The rest threshold was reached; time to work
    RestToWork,
}

impl AlertDirection {
    /// Notification text naming the next mode.
    pub fn notification_text(&self) -> &'static str {
        match self {
            AlertDirection::WorkToRest => "Time to rest!",
            AlertDirection::RestToWork => "Time to work!",
        }
    }

    /// Returns the alert direction for the given active mode.
    ///
    /// `None` for `Mode::Idle`, which never alerts.
    pub fn from_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Working => Some(AlertDirection::WorkToRest),
            Mode::Resting => Some(AlertDirection::RestToWork),
            Mode::Idle => None,
        }
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Live-editable session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Work threshold in minutes
    pub work_minutes: u32,
    /// Rest threshold in minutes (tripled on every 4th iteration)
    pub rest_minutes: u32,
    /// Whether reaching a threshold plays the alarm
    pub sound_enabled: bool,
    /// Whether reaching a threshold sends a desktop notification
    pub notifications_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            rest_minutes: 5,
            sound_enabled: true,
            notifications_enabled: true,
        }
    }
}

impl SessionConfig {
    /// Creates a new configuration with the specified work threshold.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified rest threshold.
    pub fn with_rest_minutes(mut self, minutes: u32) -> Self {
        self.rest_minutes = minutes;
        self
    }

    /// Creates a new configuration with sound alerts toggled.
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Creates a new configuration with desktop notifications toggled.
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    /// Returns true if any alert channel is enabled.
    pub fn alerts_enabled(&self) -> bool {
        self.sound_enabled || self.notifications_enabled
    }

    /// Rest threshold for the given iteration, applying the long-break rule.
    pub fn rest_limit_for(&self, iteration: u32) -> u32 {
        if iteration % LONG_BREAK_INTERVAL != 0 {
            self.rest_minutes
        } else {
            self.rest_minutes.saturating_mul(LONG_BREAK_MULTIPLIER)
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.work_minutes < 1 || self.work_minutes > 600 {
            return Err("作業時間は1-600分の範囲で指定してください".to_string());
        }
        if self.rest_minutes < 1 || self.rest_minutes > 600 {
            return Err("休憩時間は1-600分の範囲で指定してください".to_string());
        }
        Ok(())
    }
}

/// Coerces a minutes input to a non-negative integer.
///
/// Non-numeric input becomes zero instead of an error. Fractions are
/// truncated and negative values clamp to zero.
pub fn parse_minutes(input: &str) -> u32 {
    let trimmed = input.trim();
    if let Ok(value) = trimmed.parse::<u32>() {
        return value;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

/// Formats a duration as `HH:MM:SS`.
///
/// Hours wrap at 24, the same as a wall-clock reading of a zero-based duration.
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

// ============================================================================
// Snapshot
// ============================================================================

/// Everything the display layer needs for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Active mode
    pub mode: Mode,
    /// Primary control state
    pub control: ControlState,
    /// Whether the swap action is currently available
    #[serde(rename = "swapEnabled")]
    pub swap_enabled: bool,
    /// Current iteration (starts at 1)
    pub iteration: u32,
    /// Live partial time of the active timer, in milliseconds
    #[serde(rename = "activeElapsedMs")]
    pub active_elapsed_ms: u64,
    /// Threshold of the active timer in minutes (`None` while idle)
    #[serde(rename = "limitMinutes", skip_serializing_if = "Option::is_none")]
    pub limit_minutes: Option<u32>,
    /// Work lifetime total, in milliseconds
    #[serde(rename = "workTotalMs")]
    pub work_total_ms: u64,
    /// Rest lifetime total, in milliseconds
    #[serde(rename = "restTotalMs")]
    pub rest_total_ms: u64,
}

impl Snapshot {
    /// Formatted active-elapsed time.
    pub fn active_elapsed_text(&self) -> String {
        format_hms(Duration::from_millis(self.active_elapsed_ms))
    }

    /// Formatted active-elapsed time with its limit, e.g. `00:03:10 / 25`.
    pub fn active_with_limit_text(&self) -> String {
        match self.limit_minutes {
            Some(limit) => format!("{} / {}", self.active_elapsed_text(), limit),
            None => self.active_elapsed_text(),
        }
    }

    /// Formatted work lifetime total.
    pub fn work_total_text(&self) -> String {
        format_hms(Duration::from_millis(self.work_total_ms))
    }

    /// Formatted rest lifetime total.
    pub fn rest_total_text(&self) -> String {
        format_hms(Duration::from_millis(self.rest_total_ms))
    }

    /// Iteration label, e.g. `#3`.
    pub fn iteration_label(&self) -> String {
        format!("#{}", self.iteration)
    }
}

// ============================================================================
// Tests
// ============================================================================
