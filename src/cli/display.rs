//! Display utilities for the timer CLI.
//!
//! This module provides:
//! - `DisplaySink`: the per-tick output interface used by the engine
//! - `TerminalDisplay`: a single, rewritten status line
//! - `JsonDisplay`: one JSON object per change, for scripting
//! - `RecordingDisplay`: captures output for tests
//! - `Display`: formatting helpers and one-off messages

use std::io::{self, Write};

use serde_json::json;

use crate::types::{Mode, Snapshot};

/// Key help shown at session start and on `?`.
pub const KEY_HELP: &str = "Enter/p: 開始・一時停止・再開 | s: 作業/休憩の切替 | r: リセット | \
                            w <分>: 作業時間 | b <分>: 休憩時間 | sound / notify: 切替 | q: 終了";

// ============================================================================
// DisplaySink
// ============================================================================

/// Receives session output.
pub trait DisplaySink {
    /// Called on every tick and after every action.
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()>;

    /// One-off message (alerts, config changes, errors in input).
    fn notice(&mut self, message: &str) -> io::Result<()>;

    /// Called once when the session ends.
    fn finish(&mut self, snapshot: &Snapshot) -> io::Result<()>;
}

// ============================================================================
// TerminalDisplay
// ============================================================================

/// Rewrites one status line in place.
///
/// The line is only written when its text changes, so a 100 ms tick
/// produces at most one write per second of elapsed time.
pub struct TerminalDisplay<W: Write> {
    out: W,
    last_line: Option<String>,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_line: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let line = Display::status_line(snapshot);
        if self.last_line.as_deref() == Some(line.as_str()) {
            return Ok(());
        }
        write!(self.out, "\r\x1b[2K{}", line)?;
        self.out.flush()?;
        self.last_line = Some(line);
        Ok(())
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "\r\x1b[2K{}", message)?;
        self.out.flush()?;
        // Force the status line to be redrawn below the message.
        self.last_line = None;
        Ok(())
    }

    fn finish(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        writeln!(self.out)?;
        for line in Display::summary_lines(snapshot) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()
    }
}

// ============================================================================
// JsonDisplay
// ============================================================================

/// Writes one JSON line per visible change.
pub struct JsonDisplay<W: Write> {
    out: W,
    last: Option<Snapshot>,
}

impl JsonDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_value(&mut self, value: &serde_json::Value) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Snapshot truncated to whole seconds, for change detection.
fn coarse(snapshot: &Snapshot) -> Snapshot {
    Snapshot {
        active_elapsed_ms: snapshot.active_elapsed_ms / 1000 * 1000,
        work_total_ms: snapshot.work_total_ms / 1000 * 1000,
        rest_total_ms: snapshot.rest_total_ms / 1000 * 1000,
        ..snapshot.clone()
    }
}

impl<W: Write> DisplaySink for JsonDisplay<W> {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let current = coarse(snapshot);
        if self.last.as_ref() == Some(&current) {
            return Ok(());
        }
        let value = serde_json::to_value(snapshot)?;
        self.write_value(&value)?;
        self.last = Some(current);
        Ok(())
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        self.write_value(&json!({ "notice": message }))
    }

    fn finish(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        self.write_value(&json!({ "summary": snapshot }))
    }
}

// ============================================================================
// RecordingDisplay
// ============================================================================

/// Display that records everything it is given.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub snapshots: Vec<Snapshot>,
    pub notices: Vec<String>,
    pub finished: Option<Snapshot>,
}

impl RecordingDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }
}

impl DisplaySink for RecordingDisplay {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        self.notices.push(message.to_string());
        Ok(())
    }

    fn finish(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        self.finished = Some(snapshot.clone());
        Ok(())
    }
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Formats the status line, e.g.
    /// `|| [WORK #1] 00:12:03 / 25 | work 00:12:03 | rest 00:00:00`.
    pub fn status_line(snapshot: &Snapshot) -> String {
        let glyph = if snapshot.mode == Mode::Resting {
            "~"
        } else {
            snapshot.control.glyph()
        };
        let mut line = format!(
            "{} [{} {}] {} | work {} | rest {}",
            glyph,
            snapshot.mode.label(),
            snapshot.iteration_label(),
            snapshot.active_with_limit_text(),
            snapshot.work_total_text(),
            snapshot.rest_total_text(),
        );
        if snapshot.mode.is_active() && !snapshot.swap_enabled {
            line.push_str(" (一時停止中)");
        }
        line
    }

    /// Lines printed when the session ends.
    pub fn summary_lines(snapshot: &Snapshot) -> Vec<String> {
        vec![
            "セッション終了".to_string(),
            "─────────────────────────────".to_string(),
            format!("作業合計: {}", snapshot.work_total_text()),
            format!("休憩合計: {}", snapshot.rest_total_text()),
            format!("イテレーション: {}", snapshot.iteration_label()),
        ]
    }

    /// Shows the key help on stderr.
    pub fn show_key_help() {
        eprintln!("{}", KEY_HELP);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
