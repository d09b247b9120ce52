//! Desktop notification system.
//!
//! This module provides:
//!
//! - `NotificationSender`: the alert/permission sink used by the engine
//! - `DesktopNotifier`: notify-rust backend
//! - `MockNotificationSender`: records calls for tests
//!
//! # Example
//!
//! ```rust,ignore
//! use worktimer::notification::{DesktopNotifier, NotificationSender};
//! use worktimer::types::AlertDirection;
//!
//! let notifier = DesktopNotifier::new();
//! if notifier.request_permission().await? {
//!     notifier.send_alert(AlertDirection::WorkToRest).await?;
//! }
//! ```

mod desktop;
pub mod error;

pub use self::desktop::{build_notification, DesktopNotifier, APP_NAME, DEFAULT_TIMEOUT_SECONDS};
pub use self::error::NotificationError;

use std::future::Future;

use crate::types::AlertDirection;

/// Alert and permission sink.
///
/// The futures are `Send` so the engine can run a send as a detached task.
pub trait NotificationSender: Send + Sync + 'static {
    /// Asks for permission if not already granted; returns the grant.
    fn request_permission(&self) -> impl Future<Output = Result<bool, NotificationError>> + Send;
    /// Shows a notification announcing the next mode.
    fn send_alert(
        &self,
        direction: AlertDirection,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;
    /// Returns true if this platform can show notifications at all.
    fn is_available(&self) -> bool;
    fn is_authorized(&self) -> bool;
}

#[derive(Debug)]
pub struct MockNotificationSender {
    alerts: std::sync::Mutex<Vec<AlertDirection>>,
    permission_requests: std::sync::atomic::AtomicUsize,
    grant_on_request: std::sync::atomic::AtomicBool,
    authorized: std::sync::atomic::AtomicBool,
    available: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockNotificationSender {
    /// Creates a mock that grants permission when asked.
    #[must_use]
    pub fn new() -> Self {
        Self {
            alerts: std::sync::Mutex::new(Vec::new()),
            permission_requests: std::sync::atomic::AtomicUsize::new(0),
            grant_on_request: std::sync::atomic::AtomicBool::new(true),
            authorized: std::sync::atomic::AtomicBool::new(false),
            available: std::sync::atomic::AtomicBool::new(true),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn set_grant_on_request(&self, grant: bool) {
        self.grant_on_request
            .store(grant, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_authorized(&self, authorized: bool) {
        self.authorized
            .store(authorized, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_available(&self, available: bool) {
        self.available
            .store(available, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn get_alerts(&self) -> Vec<AlertDirection> {
        self.alerts.lock().unwrap().clone()
    }

    #[must_use]
    pub fn alert_count(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }

    #[must_use]
    pub fn permission_request_count(&self) -> usize {
        self.permission_requests
            .load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn clear_recorded(&self) {
        self.alerts.lock().unwrap().clear();
    }
}

impl Default for MockNotificationSender {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSender for MockNotificationSender {
    async fn request_permission(&self) -> Result<bool, NotificationError> {
        self.permission_requests
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.is_authorized() {
            return Ok(true);
        }
        let granted = self
            .grant_on_request
            .load(std::sync::atomic::Ordering::SeqCst);
        self.set_authorized(granted);
        Ok(granted)
    }

    async fn send_alert(&self, direction: AlertDirection) -> Result<(), NotificationError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        if !self.is_authorized() {
            return Err(NotificationError::PermissionDenied);
        }
        self.alerts.lock().unwrap().push(direction);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn is_authorized(&self) -> bool {
        self.authorized.load(std::sync::atomic::Ordering::SeqCst)
    }
}
