//! Sound system error types.
//!
//! Alert tones are best-effort: every error here is logged by the caller
//! and the session keeps running.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create the audio output stream or sink.
    #[error("オーディオストリームの作成に失敗しました: {0}")]
    StreamError(String),

    /// The tone sequence cannot be synthesized.
    #[error("無効なトーン設定: {0}")]
    InvalidTone(String),

    /// Generic sound playback error.
    #[error("サウンド再生エラー: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "オーディオデバイスを接続するか --no-sound を指定してください",
            Self::StreamError(_) => "オーディオ設定を確認してください",
            Self::InvalidTone(_) => "周波数と長さは正の値にしてください",
            Self::PlaybackError(_) => "アプリケーションを再起動してください",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));
        assert!(err.to_string().contains("オーディオデバイスが利用できません"));

        let err = SoundError::InvalidTone("0 Hz".to_string());
        assert!(err.to_string().contains("0 Hz"));
    }

    #[test]
    fn test_suggestion() {
        assert!(SoundError::DeviceNotAvailable("x".into())
            .suggestion()
            .contains("--no-sound"));
        assert!(SoundError::StreamError("x".into())
            .suggestion()
            .contains("オーディオ設定"));
        assert!(SoundError::PlaybackError("x".into())
            .suggestion()
            .contains("再起動"));
    }
}
