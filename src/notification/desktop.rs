//! Desktop notifications through notify-rust.
//!
//! On Linux and the BSDs this talks to the freedesktop notification server
//! over D-Bus; on macOS and Windows notify-rust uses the native center.
//! Every call into notify-rust is blocking, so it runs in a blocking task
//! under a timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use notify_rust::Notification;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::error::NotificationError;
use super::NotificationSender;
use crate::types::AlertDirection;

/// Application name shown by the notification server.
pub const APP_NAME: &str = "worktimer";

/// Default timeout for a notification round trip in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

/// Builds the notification for an alert.
///
/// Critical urgency with no expiry keeps it on screen until dismissed.
pub fn build_notification(direction: AlertDirection) -> Notification {
    let mut notification = Notification::new();
    notification
        .summary(direction.notification_text())
        .appname(APP_NAME);

    #[cfg(all(unix, not(target_os = "macos")))]
    notification
        .urgency(notify_rust::Urgency::Critical)
        .timeout(notify_rust::Timeout::Never);

    notification
}

/// Name of the notification server, if one answers.
#[cfg(all(unix, not(target_os = "macos")))]
fn query_server() -> Result<String, NotificationError> {
    notify_rust::get_server_information()
        .map(|info| format!("{} {}", info.name, info.version))
        .map_err(|e| NotificationError::ServerUnavailable(e.to_string()))
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn query_server() -> Result<String, NotificationError> {
    Ok("system notification center".to_string())
}

/// Sends alerts as desktop notifications.
#[derive(Debug)]
pub struct DesktopNotifier {
    timeout_seconds: u64,
    authorized: AtomicBool,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_SECONDS)
    }

    #[must_use]
    pub fn with_timeout(timeout_seconds: u64) -> Self {
        Self {
            timeout_seconds,
            authorized: AtomicBool::new(false),
        }
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T, NotificationError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, NotificationError> + Send + 'static,
    {
        let task = tokio::task::spawn_blocking(job);
        timeout(Duration::from_secs(self.timeout_seconds), task)
            .await
            .map_err(|_| NotificationError::ExecutionTimeout(self.timeout_seconds))?
            .map_err(|e| NotificationError::SendFailed(format!("タスク実行エラー: {}", e)))?
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSender for DesktopNotifier {
    async fn request_permission(&self) -> Result<bool, NotificationError> {
        if self.is_authorized() {
            return Ok(true);
        }

        // There is no prompt to show; a reachable server is the grant.
        match self.run_blocking(query_server).await {
            Ok(server) => {
                info!("通知を有効化しました: {}", server);
                self.authorized.store(true, Ordering::SeqCst);
                Ok(true)
            }
            Err(e) => {
                warn!("通知サーバーに接続できません。通知をスキップします: {}", e);
                Err(e)
            }
        }
    }

    async fn send_alert(&self, direction: AlertDirection) -> Result<(), NotificationError> {
        if !self.is_authorized() {
            return Err(NotificationError::PermissionDenied);
        }
        debug!(?direction, "sending notification");
        self.run_blocking(move || {
            build_notification(direction)
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::SendFailed(e.to_string()))
        })
        .await
    }

    fn is_available(&self) -> bool {
        cfg!(any(unix, windows))
    }

    fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }
}
