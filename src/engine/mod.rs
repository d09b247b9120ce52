//! Session engine: the tick loop around the session controller.
//!
//! This module provides:
//! - A fixed-cadence tick with `tokio::time::interval`
//! - Input commands merged into the same loop with `tokio::select!`
//! - Dispatch of controller effects to sound, notification and display
//!
//! Controller state is only mutated on the loop task, between ticks.
//! Notification sends run as detached tasks so a slow notification server
//! never holds up a tick or a key press.

pub mod input;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cli::display::{DisplaySink, KEY_HELP};
use crate::notification::NotificationSender;
use crate::session::{Action, AlertSignal, Clock, SessionController, SessionEffect};
use crate::sound::{SoundPlayer, ToneSequence};
use crate::types::{AlertDirection, Mode, Snapshot};

pub use input::{parse_command, spawn_stdin_reader, InputCommand};

/// Default tick cadence.
pub const DEFAULT_TICK_MS: u64 = 100;

/// Whether the loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Drives a [`SessionController`] and performs the effects it asks for.
pub struct SessionEngine<C, S, N, D>
where
    C: Clock,
    S: SoundPlayer,
    N: NotificationSender,
    D: DisplaySink,
{
    controller: SessionController<C>,
    sound: S,
    notifier: Arc<N>,
    display: D,
    alarm: ToneSequence,
    tick_interval: Duration,
    pending: JoinSet<()>,
}

impl<C, S, N, D> SessionEngine<C, S, N, D>
where
    C: Clock,
    S: SoundPlayer,
    N: NotificationSender,
    D: DisplaySink,
{
    pub fn new(controller: SessionController<C>, sound: S, notifier: N, display: D) -> Self {
        Self {
            controller,
            sound,
            notifier: Arc::new(notifier),
            display,
            alarm: ToneSequence::default_alarm(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            pending: JoinSet::new(),
        }
    }

    /// Sets the tick cadence; must stay below one minute.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Runs until a quit command, a closed input channel or Ctrl+C.
    ///
    /// Notifications still in flight are awaited before the summary is
    /// written. Returns the final snapshot.
    pub async fn run(&mut self, mut input: mpsc::UnboundedReceiver<InputCommand>) -> Result<Snapshot> {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        info!(tick_ms = self.tick_interval.as_millis() as u64, "session loop started");
        self.render()?;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.on_tick().await?;
                }
                command = input.recv() => {
                    let Some(command) = command else { break };
                    if self.handle_command(command).await? == Flow::Quit {
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    info!("interrupted");
                    break;
                }
            }
        }

        if self.pending_notifications() > 0 {
            debug!(pending = self.pending_notifications(), "waiting for notifications");
            self.drain_notifications().await;
        }

        let summary = self.controller.snapshot();
        self.display
            .finish(&summary)
            .context("Failed to write session summary")?;
        info!(
            iteration = summary.iteration,
            work_total_ms = summary.work_total_ms,
            rest_total_ms = summary.rest_total_ms,
            "session finished"
        );
        Ok(summary)
    }

    /// One tick: threshold check, then display refresh.
    pub async fn on_tick(&mut self) -> Result<()> {
        self.reap_notifications();
        if let Some(alert) = self.controller.tick() {
            self.fire_alert(alert)?;
        }
        self.render()
    }

    /// Applies one input command.
    pub async fn handle_command(&mut self, command: InputCommand) -> Result<Flow> {
        match command {
            InputCommand::Action(action) => {
                self.handle_action(action).await?;
            }
            InputCommand::SetWork(minutes) => {
                self.controller.config_mut().work_minutes = minutes;
                self.notice(&format!("作業時間を{}分に設定しました", minutes))?;
            }
            InputCommand::SetRest(minutes) => {
                self.controller.config_mut().rest_minutes = minutes;
                self.notice(&format!("休憩時間を{}分に設定しました", minutes))?;
            }
            InputCommand::ToggleSound => {
                let enabled = !self.controller.config().sound_enabled;
                self.controller.config_mut().sound_enabled = enabled;
                if enabled {
                    self.sound.enable();
                } else {
                    self.sound.disable();
                }
                if enabled && !self.sound.is_available() {
                    warn!("オーディオデバイスが利用できないため、アラーム音は鳴りません");
                }
                self.notice(if enabled { "アラーム音: オン" } else { "アラーム音: オフ" })?;
            }
            InputCommand::ToggleNotify => {
                let enabled = !self.controller.config().notifications_enabled;
                self.controller.config_mut().notifications_enabled = enabled;
                if enabled && self.controller.mode().is_active() {
                    self.request_permission().await;
                }
                self.notice(if enabled { "通知: オン" } else { "通知: オフ" })?;
            }
            InputCommand::Help => {
                self.notice(KEY_HELP)?;
            }
            InputCommand::Quit => return Ok(Flow::Quit),
            InputCommand::Unknown(text) => {
                self.notice(&format!("不明なコマンドです: {}（? でヘルプ）", text))?;
            }
        }
        self.render()?;
        Ok(Flow::Continue)
    }

    /// Forwards an action to the controller and performs its effects.
    pub async fn handle_action(&mut self, action: Action) -> Result<()> {
        if action == Action::Primary && !self.controller.is_primary_enabled() {
            return self.notice("休憩中は一時停止できません（s で作業に戻ります）");
        }
        let effects = self.controller.handle(action);
        if effects.is_empty() {
            debug!(?action, "action produced no effects");
        }
        self.apply_effects(effects).await
    }

    /// Waits for every notification still being sent.
    pub async fn drain_notifications(&mut self) {
        while let Some(result) = self.pending.join_next().await {
            if let Err(e) = result {
                warn!("通知タスクが異常終了しました: {}", e);
            }
        }
    }

    fn reap_notifications(&mut self) {
        while let Some(result) = self.pending.try_join_next() {
            if let Err(e) = result {
                warn!("通知タスクが異常終了しました: {}", e);
            }
        }
    }

    async fn apply_effects(&mut self, effects: Vec<SessionEffect>) -> Result<()> {
        for effect in effects {
            match effect {
                SessionEffect::RequestPermission => self.request_permission().await,
                SessionEffect::ModeChanged(mode) => {
                    info!(mode = mode.as_str(), "mode changed");
                    if mode == Mode::Idle {
                        self.notice("リセットしました")?;
                    }
                }
                SessionEffect::IterationChanged(iteration) => {
                    debug!(iteration, "iteration label updated");
                }
            }
        }
        Ok(())
    }

    async fn request_permission(&self) {
        if self.notifier.is_authorized() {
            return;
        }
        if !self.notifier.is_available() {
            info!("このプラットフォームでは通知を利用できません");
            return;
        }
        match self.notifier.request_permission().await {
            Ok(true) => debug!("notification permission granted"),
            Ok(false) => info!("通知は許可されませんでした"),
            Err(e) if e.is_permission_error() => info!("通知は利用できません: {}", e),
            Err(e) => warn!("通知の許可を取得できません: {} ({})", e, e.suggestion()),
        }
    }

    fn fire_alert(&mut self, alert: AlertSignal) -> Result<()> {
        info!(direction = ?alert.direction, "alert");
        self.notice(alert.direction.notification_text())?;

        if alert.sound {
            if let Err(e) = self.sound.play(&self.alarm) {
                warn!("アラーム音の再生に失敗しました: {} ({})", e, e.suggestion());
            }
        }

        if alert.notify {
            if self.notifier.is_authorized() {
                self.spawn_notification(alert.direction);
            } else {
                debug!("notifications not authorized, skipping");
            }
        }
        Ok(())
    }

    fn spawn_notification(&mut self, direction: AlertDirection) {
        let notifier = Arc::clone(&self.notifier);
        self.pending.spawn(async move {
            if let Err(e) = notifier.send_alert(direction).await {
                warn!("通知の送信に失敗しました: {} ({})", e, e.suggestion());
            }
        });
    }

    fn render(&mut self) -> Result<()> {
        let snapshot = self.controller.snapshot();
        self.display
            .render(&snapshot)
            .context("Failed to render status")
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        self.display
            .notice(message)
            .context("Failed to write notice")
    }

    pub fn controller(&self) -> &SessionController<C> {
        &self.controller
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Number of notification sends still in flight.
    pub fn pending_notifications(&self) -> usize {
        self.pending.len()
    }
}
