//! Work/rest cycle state machine.
//!
//! The controller owns both timers and every piece of mutable session
//! state. Transitions are plain methods that return the side effects they
//! want performed, so the whole cycle can be exercised without a runtime,
//! a display or an audio device.
//!
//! ```text
//!            Primary                Swap
//!   Idle ───────────▶ Working ◀──────────▶ Resting
//!                      │   ▲
//!               Primary│   │Primary
//!                      ▼   │
//!                 Working (paused)
//! ```

use std::time::Duration;

use tracing::debug;

use super::clock::Clock;
use super::timer::Timer;
use crate::types::{AlertDirection, ControlState, Mode, SessionConfig, Snapshot};

// ============================================================================
// Action / SessionEffect
// ============================================================================

/// User actions delivered to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Combined start / pause / resume control
    Primary,
    /// Switch between work and rest
    Swap,
    /// Return to idle and discard the session
    Reset,
}

/// Alert decision produced by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertSignal {
    /// Which transition the alert announces
    pub direction: AlertDirection,
    /// Play the alarm tones
    pub sound: bool,
    /// Send a desktop notification
    pub notify: bool,
}

/// Side effects requested by a transition or tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    /// Ask for desktop notification permission
    RequestPermission,
    /// The active mode changed
    ModeChanged(Mode),
    /// The iteration label changed (also emitted on start)
    IterationChanged(u32),
}

// ============================================================================
// SessionController
// ============================================================================

/// Owns the work and rest timers and drives the cycle between them.
#[derive(Debug)]
pub struct SessionController<C: Clock> {
    clock: C,
    config: SessionConfig,
    work: Timer,
    rest: Timer,
    mode: Mode,
    control: ControlState,
    swap_enabled: bool,
    iteration: u32,
    alerted: bool,
}

impl<C: Clock> SessionController<C> {
    /// Creates an idle controller.
    pub fn new(config: SessionConfig, clock: C) -> Self {
        Self {
            clock,
            config,
            work: Timer::new(),
            rest: Timer::new(),
            mode: Mode::Idle,
            control: ControlState::Start,
            swap_enabled: true,
            iteration: 1,
            alerted: false,
        }
    }

    /// Dispatches an action; disallowed actions are no-ops.
    pub fn handle(&mut self, action: Action) -> Vec<SessionEffect> {
        match action {
            Action::Primary => self.primary(),
            Action::Swap => self.swap(),
            Action::Reset => self.reset(),
        }
    }

    /// Start, pause or resume depending on the control state.
    ///
    /// Not available while resting.
    pub fn primary(&mut self) -> Vec<SessionEffect> {
        match (self.mode, self.control) {
            (Mode::Idle, _) => self.start(),
            (Mode::Working, ControlState::Pause) => self.pause(),
            (Mode::Working, ControlState::Resume) => self.resume(),
            _ => {
                debug!(
                    mode = self.mode.as_str(),
                    control = self.control.as_str(),
                    "primary action ignored"
                );
                Vec::new()
            }
        }
    }

    fn start(&mut self) -> Vec<SessionEffect> {
        let now = self.clock.now();
        let mut effects = Vec::new();

        if self.config.notifications_enabled {
            effects.push(SessionEffect::RequestPermission);
        }

        self.mode = Mode::Working;
        self.work.run(now);
        self.control = ControlState::Pause;
        self.swap_enabled = true;
        self.alerted = false;

        debug!(iteration = self.iteration, "session started");
        effects.push(SessionEffect::ModeChanged(Mode::Working));
        effects.push(SessionEffect::IterationChanged(self.iteration));
        effects
    }

    // Pausing work starts the rest clock: downtime counts as rest even
    // before an explicit swap. Resume commits it to the rest total.
    fn pause(&mut self) -> Vec<SessionEffect> {
        let now = self.clock.now();
        self.work.pause(now);
        self.rest.run(now);
        self.control = ControlState::Resume;
        self.swap_enabled = false;

        debug!("work paused, rest clock running");
        Vec::new()
    }

    fn resume(&mut self) -> Vec<SessionEffect> {
        let now = self.clock.now();
        self.work.run(now);
        self.rest.stop(now);
        self.control = ControlState::Pause;
        self.swap_enabled = true;

        debug!("work resumed");
        Vec::new()
    }

    /// Commits the active timer and switches to the other one.
    ///
    /// Only permitted while a timer is active and the swap is enabled.
    pub fn swap(&mut self) -> Vec<SessionEffect> {
        if !self.mode.is_active() || !self.swap_enabled {
            debug!(
                mode = self.mode.as_str(),
                swap_enabled = self.swap_enabled,
                "swap ignored"
            );
            return Vec::new();
        }

        let now = self.clock.now();
        let mut effects = Vec::new();

        match self.mode {
            Mode::Working => {
                self.work.stop(now);
                self.mode = Mode::Resting;
                self.rest.run(now);
            }
            Mode::Resting => {
                self.rest.stop(now);
                self.mode = Mode::Working;
                self.work.run(now);
                self.control = ControlState::Pause;
                self.iteration += 1;
            }
            Mode::Idle => unreachable!("guarded by is_active"),
        }

        self.alerted = false;
        effects.push(SessionEffect::ModeChanged(self.mode));
        if self.mode == Mode::Working {
            effects.push(SessionEffect::IterationChanged(self.iteration));
        }

        debug!(
            mode = self.mode.as_str(),
            iteration = self.iteration,
            "swapped"
        );
        effects
    }

    /// Returns to idle, discarding both totals and the iteration count.
    ///
    /// Works the same whether or not the work timer is paused.
    pub fn reset(&mut self) -> Vec<SessionEffect> {
        if self.mode == Mode::Idle {
            return Vec::new();
        }

        self.work.clear();
        self.rest.clear();
        self.mode = Mode::Idle;
        self.control = ControlState::Start;
        self.swap_enabled = true;
        self.iteration = 1;
        self.alerted = false;

        debug!("session reset");
        vec![
            SessionEffect::ModeChanged(Mode::Idle),
            SessionEffect::IterationChanged(1),
        ]
    }

    /// Runs the threshold check for the active timer.
    ///
    /// Returns the alert to fire, at most once per mode and iteration.
    /// Must be called more often than once a minute: the check matches the
    /// exact elapsed minute, not a range.
    pub fn tick(&mut self) -> Option<AlertSignal> {
        let direction = AlertDirection::from_mode(self.mode)?;
        let limit = self.current_limit()?;

        if self.alerted || !self.config.alerts_enabled() {
            return None;
        }

        let elapsed_minutes = self.active_partial().as_secs() / 60;
        if elapsed_minutes != u64::from(limit) {
            return None;
        }

        self.alerted = true;
        debug!(
            direction = ?direction,
            limit,
            iteration = self.iteration,
            "threshold reached"
        );
        Some(AlertSignal {
            direction,
            sound: self.config.sound_enabled,
            notify: self.config.notifications_enabled,
        })
    }

    /// Threshold in minutes for the active timer, `None` while idle.
    pub fn current_limit(&self) -> Option<u32> {
        match self.mode {
            Mode::Idle => None,
            Mode::Working => Some(self.config.work_minutes),
            Mode::Resting => Some(self.config.rest_limit_for(self.iteration)),
        }
    }

    /// Live partial time of the active timer (zero while idle).
    pub fn active_partial(&self) -> Duration {
        let now = self.clock.now();
        match self.mode {
            Mode::Idle => Duration::ZERO,
            Mode::Working => self.work.partial_time(now),
            Mode::Resting => self.rest.partial_time(now),
        }
    }

    /// Builds the display snapshot for the current instant.
    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock.now();
        Snapshot {
            mode: self.mode,
            control: self.control,
            swap_enabled: self.swap_enabled,
            iteration: self.iteration,
            active_elapsed_ms: duration_millis(self.active_partial()),
            limit_minutes: self.current_limit(),
            work_total_ms: duration_millis(self.work.total_time(now)),
            rest_total_ms: duration_millis(self.rest.total_time(now)),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn control(&self) -> ControlState {
        self.control
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn is_swap_enabled(&self) -> bool {
        self.swap_enabled
    }

    /// Returns true if the primary control does anything right now.
    pub fn is_primary_enabled(&self) -> bool {
        self.mode != Mode::Resting
    }

    pub fn is_alerted(&self) -> bool {
        self.alerted
    }

    pub fn work_timer(&self) -> &Timer {
        &self.work
    }

    pub fn rest_timer(&self) -> &Timer {
        &self.rest
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Mutable configuration; read again on the next tick.
    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Tests
// ============================================================================
