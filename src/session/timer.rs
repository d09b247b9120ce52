//! Stopwatch primitive with per-iteration and lifetime accumulators.
//!
//! A [`Timer`] keeps two accumulators:
//! - `partial`: time since the last commit (the current iteration)
//! - `total`: every partial ever committed (the lifetime total for a mode)
//!
//! Reads (`partial_time`, `total_time`) are pure, so the display can poll
//! them at tick frequency without disturbing the accounting.

use std::time::{Duration, Instant};

use super::clock::abs_diff;

/// A pausable stopwatch.
///
/// Every operation takes the current instant explicitly; the owner decides
/// where time comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timer {
    /// Start of the live fragment (meaningful only while running)
    start: Option<Instant>,
    /// Accumulated partial time, excluding the live fragment
    partial: Duration,
    /// Committed lifetime total
    total: Duration,
    running: bool,
}

impl Timer {
    /// Creates a stopped timer with empty accumulators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the clock.
    ///
    /// Running an already-running timer first stops it, folding the
    /// accumulated partial into the total before the clock restarts.
    pub fn run(&mut self, now: Instant) {
        if self.running {
            self.stop(now);
        }
        self.start = Some(now);
        self.running = true;
    }

    /// Adds the live fragment to the partial and stops the clock.
    ///
    /// Pausing a paused timer adds nothing.
    pub fn pause(&mut self, now: Instant) {
        self.partial += self.current_fragment(now);
        self.running = false;
    }

    /// Commits the partial (including any live fragment) into the total.
    ///
    /// The start is re-anchored at `now`, so a running timer keeps counting
    /// without a gap.
    pub fn reset_partial(&mut self, now: Instant) {
        self.total += self.partial_time(now);
        self.partial = Duration::ZERO;
        self.start = Some(now);
    }

    /// Ends the current run and commits all of its time.
    pub fn stop(&mut self, now: Instant) {
        self.pause(now);
        self.reset_partial(now);
    }

    /// Discards every accumulator and stops the clock.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Time since the last start while running, zero otherwise.
    pub fn current_fragment(&self, now: Instant) -> Duration {
        match (self.running, self.start) {
            (true, Some(start)) => abs_diff(now, start),
            _ => Duration::ZERO,
        }
    }

    /// Live partial time.
    pub fn partial_time(&self, now: Instant) -> Duration {
        self.partial + self.current_fragment(now)
    }

    /// Lifetime total including the live partial.
    pub fn total_time(&self, now: Instant) -> Duration {
        self.total + self.partial_time(now)
    }

    /// Committed lifetime total, excluding the live partial.
    pub fn committed_total(&self) -> Duration {
        self.total
    }

    /// Returns true if the clock is running.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

// ============================================================================
// Tests
// ============================================================================
