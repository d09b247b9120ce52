//! Notification system error types.
//!
//! Notifications are best-effort: the engine logs these and carries on.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// No notification server answered.
    #[error("通知サーバーが見つかりません: {0}")]
    ServerUnavailable(String),

    /// Notification permission was not granted.
    #[error("通知許可が拒否されています")]
    PermissionDenied,

    /// The notification server did not answer in time.
    #[error("通知がタイムアウトしました（{0}秒）")]
    ExecutionTimeout(u64),

    /// Failed to send a notification.
    #[error("通知の送信に失敗しました: {0}")]
    SendFailed(String),
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::ServerUnavailable(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::ServerUnavailable(_) => {
                "デスクトップの通知デーモンが動作しているか確認してください"
            }
            Self::PermissionDenied => "システム設定で通知を許可してください",
            Self::ExecutionTimeout(_) => "通知サーバーが応答しません。--no-notify で通知を無効にできます",
            Self::SendFailed(_) => "--no-notify で通知を無効にできます",
        }
    }
}
