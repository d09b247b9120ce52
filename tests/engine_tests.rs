//! Engine tests with mock side effects.
//!
//! These drive the session engine through its public command and tick
//! entry points with a manual clock, and check which sounds,
//! notifications and display output each step produces.

use std::time::Duration;

use tokio::sync::mpsc;

use worktimer::cli::display::RecordingDisplay;
use worktimer::engine::{Flow, InputCommand, SessionEngine};
use worktimer::notification::MockNotificationSender;
use worktimer::session::{Action, ManualClock, SessionController};
use worktimer::sound::MockSoundPlayer;
use worktimer::types::{AlertDirection, Mode, SessionConfig};

type TestEngine =
    SessionEngine<ManualClock, MockSoundPlayer, MockNotificationSender, RecordingDisplay>;

// ============================================================================
// Test Helpers
// ============================================================================

fn create_engine(config: SessionConfig) -> (TestEngine, ManualClock) {
    create_engine_with_notifier(config, MockNotificationSender::new())
}

fn create_engine_with_notifier(
    config: SessionConfig,
    notifier: MockNotificationSender,
) -> (TestEngine, ManualClock) {
    let clock = ManualClock::new();
    let controller = SessionController::new(config, clock.clone());
    let engine = SessionEngine::new(
        controller,
        MockSoundPlayer::new(),
        notifier,
        RecordingDisplay::new(),
    );
    (engine, clock)
}

fn fast_config() -> SessionConfig {
    SessionConfig::default()
        .with_work_minutes(1)
        .with_rest_minutes(1)
}

async fn press(engine: &mut TestEngine, action: Action) {
    engine
        .handle_command(InputCommand::Action(action))
        .await
        .unwrap();
}

// ============================================================================
// Start and permission
// ============================================================================

#[tokio::test]
async fn start_requests_notification_permission_once() {
    let (mut engine, _clock) = create_engine(fast_config());

    press(&mut engine, Action::Primary).await;
    press(&mut engine, Action::Primary).await;
    press(&mut engine, Action::Primary).await;

    assert_eq!(engine.notifier().permission_request_count(), 1);
    assert_eq!(engine.controller().mode(), Mode::Working);
}

#[tokio::test]
async fn start_without_notifications_skips_permission() {
    let (mut engine, _clock) = create_engine(fast_config().with_notifications(false));

    press(&mut engine, Action::Primary).await;

    assert_eq!(engine.notifier().permission_request_count(), 0);
}

// ============================================================================
// Alerts
// ============================================================================

#[tokio::test]
async fn work_alert_plays_sound_and_notifies_once() {
    let (mut engine, clock) = create_engine(fast_config());
    press(&mut engine, Action::Primary).await;

    for _ in 0..700 {
        clock.advance(Duration::from_millis(100));
        engine.on_tick().await.unwrap();
    }
    engine.drain_notifications().await;

    assert_eq!(engine.sound().play_count(), 1);
    assert_eq!(engine.sound().get_play_calls()[0].len(), 10);
    assert_eq!(
        engine.notifier().get_alerts(),
        vec![AlertDirection::WorkToRest]
    );
    assert!(engine
        .display()
        .notices
        .iter()
        .any(|n| n == "Time to rest!"));
}

#[tokio::test]
async fn rest_alert_after_swap_announces_work() {
    let (mut engine, clock) = create_engine(fast_config());
    press(&mut engine, Action::Primary).await;
    clock.advance_secs(60);
    engine.on_tick().await.unwrap();

    press(&mut engine, Action::Swap).await;
    clock.advance_secs(60);
    engine.on_tick().await.unwrap();
    engine.drain_notifications().await;

    assert_eq!(
        engine.notifier().get_alerts(),
        vec![AlertDirection::WorkToRest, AlertDirection::RestToWork]
    );
    assert_eq!(engine.sound().play_count(), 2);
}

#[tokio::test]
async fn denied_permission_still_plays_sound() {
    let notifier = MockNotificationSender::new();
    notifier.set_grant_on_request(false);
    let (mut engine, clock) = create_engine_with_notifier(fast_config(), notifier);

    press(&mut engine, Action::Primary).await;
    clock.advance_secs(60);
    engine.on_tick().await.unwrap();

    assert_eq!(engine.pending_notifications(), 0);
    assert_eq!(engine.sound().play_count(), 1);
    assert_eq!(engine.notifier().alert_count(), 0);
}

#[tokio::test]
async fn unavailable_notifier_is_never_asked_for_permission() {
    let notifier = MockNotificationSender::new();
    notifier.set_available(false);
    let (mut engine, clock) = create_engine_with_notifier(fast_config(), notifier);

    press(&mut engine, Action::Primary).await;
    clock.advance_secs(60);
    engine.on_tick().await.unwrap();

    assert_eq!(engine.notifier().permission_request_count(), 0);
    assert_eq!(engine.pending_notifications(), 0);
    assert_eq!(engine.sound().play_count(), 1);
}

#[tokio::test]
async fn alert_notification_is_sent_in_the_background() {
    let (mut engine, clock) = create_engine(fast_config());
    press(&mut engine, Action::Primary).await;
    clock.advance_secs(60);

    engine.on_tick().await.unwrap();

    // The tick returns with the send still queued.
    assert_eq!(engine.pending_notifications(), 1);
    assert!(engine
        .display()
        .notices
        .iter()
        .any(|n| n == "Time to rest!"));

    engine.drain_notifications().await;
    assert_eq!(engine.pending_notifications(), 0);
    assert_eq!(
        engine.notifier().get_alerts(),
        vec![AlertDirection::WorkToRest]
    );
}

#[tokio::test]
async fn side_effect_failures_do_not_stop_the_session() {
    let notifier = MockNotificationSender::new();
    notifier.set_should_fail(true);
    let (mut engine, clock) = create_engine_with_notifier(fast_config(), notifier);
    engine.sound().set_should_fail(true);

    press(&mut engine, Action::Primary).await;
    clock.advance_secs(60);

    assert!(engine.on_tick().await.is_ok());
    engine.drain_notifications().await;
    assert!(engine.controller().is_alerted());
    assert_eq!(engine.notifier().alert_count(), 0);
}

#[tokio::test]
async fn sound_toggle_disables_alarm() {
    let (mut engine, clock) = create_engine(fast_config().with_notifications(false));
    engine
        .handle_command(InputCommand::ToggleSound)
        .await
        .unwrap();
    assert!(!engine.controller().config().sound_enabled);

    press(&mut engine, Action::Primary).await;
    clock.advance_secs(60);
    engine.on_tick().await.unwrap();

    assert_eq!(engine.sound().play_count(), 0);
    assert!(!engine.controller().is_alerted());
}

// ============================================================================
// Commands
// ============================================================================

#[tokio::test]
async fn live_config_edits_change_the_limit() {
    let (mut engine, clock) = create_engine(SessionConfig::default());
    press(&mut engine, Action::Primary).await;

    engine
        .handle_command(InputCommand::SetWork(2))
        .await
        .unwrap();
    clock.advance_secs(120);
    engine.on_tick().await.unwrap();

    assert_eq!(engine.controller().current_limit(), Some(2));
    assert_eq!(engine.sound().play_count(), 1);
    let last = engine.display().last_snapshot().unwrap();
    assert_eq!(last.limit_minutes, Some(2));
}

#[tokio::test]
async fn unknown_and_help_commands_write_notices() {
    let (mut engine, _clock) = create_engine(SessionConfig::default());

    let flow = engine
        .handle_command(InputCommand::Unknown("xyz".to_string()))
        .await
        .unwrap();
    engine.handle_command(InputCommand::Help).await.unwrap();

    assert_eq!(flow, Flow::Continue);
    let notices = &engine.display().notices;
    assert!(notices[0].contains("xyz"));
    assert!(notices[1].contains("q: 終了"));
}

#[tokio::test]
async fn primary_while_resting_explains_how_to_continue() {
    let (mut engine, _clock) = create_engine(SessionConfig::default());
    press(&mut engine, Action::Primary).await;
    press(&mut engine, Action::Swap).await;

    press(&mut engine, Action::Primary).await;

    assert_eq!(engine.controller().mode(), Mode::Resting);
    assert!(engine
        .display()
        .notices
        .last()
        .is_some_and(|n| n.contains("s で作業に戻ります")));
}

#[tokio::test]
async fn quit_command_ends_flow() {
    let (mut engine, _clock) = create_engine(SessionConfig::default());
    let flow = engine.handle_command(InputCommand::Quit).await.unwrap();
    assert_eq!(flow, Flow::Quit);
}

#[tokio::test]
async fn reset_notice_and_idle_snapshot() {
    let (mut engine, clock) = create_engine(SessionConfig::default());
    press(&mut engine, Action::Primary).await;
    clock.advance_secs(300);
    press(&mut engine, Action::Reset).await;

    let last = engine.display().last_snapshot().unwrap();
    assert_eq!(last.mode, Mode::Idle);
    assert_eq!(last.work_total_ms, 0);
    assert!(engine
        .display()
        .notices
        .iter()
        .any(|n| n.contains("リセット")));
}

// ============================================================================
// Run loop
// ============================================================================

#[tokio::test]
async fn run_processes_commands_until_quit() {
    let (engine, clock) = create_engine(SessionConfig::default());
    let mut engine = engine.with_tick_interval(Duration::from_millis(10));
    let (tx, rx) = mpsc::unbounded_channel();

    tx.send(InputCommand::Action(Action::Primary)).unwrap();
    tx.send(InputCommand::Quit).unwrap();
    clock.advance_secs(3);

    let summary = engine.run(rx).await.unwrap();

    assert_eq!(summary.mode, Mode::Working);
    assert_eq!(engine.pending_notifications(), 0);
    assert_eq!(engine.display().finished.as_ref(), Some(&summary));
}

#[tokio::test]
async fn run_ends_when_input_closes() {
    let (engine, _clock) = create_engine(SessionConfig::default());
    let mut engine = engine.with_tick_interval(Duration::from_millis(10));
    let (tx, rx) = mpsc::unbounded_channel::<InputCommand>();
    drop(tx);

    let summary = tokio::time::timeout(Duration::from_secs(5), engine.run(rx))
        .await
        .expect("run should finish")
        .unwrap();

    assert_eq!(summary.mode, Mode::Idle);
    assert_eq!(summary.iteration, 1);
}
