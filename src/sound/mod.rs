//! Alert tone playback.
//!
//! This module provides audio alerts for threshold crossings:
//!
//! - `ToneSequence`: the alternating two-pitch alarm as plain data
//! - `RodioSoundPlayer`: sine synthesis through rodio
//! - `SilentSoundPlayer`: used when sound is off or no device exists
//! - `MockSoundPlayer`: records calls for tests
//!
//! # Usage
//!
//! ```rust,no_run
//! use worktimer::sound::{RodioSoundPlayer, ToneSequence};
//!
//! let player = RodioSoundPlayer::new(false).expect("audio init");
//! player.play(&ToneSequence::default_alarm()).expect("playback failed");
//! ```

mod error;
mod player;
mod tone;

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use tone::{
    Tone, ToneSequence, ALARM_BEEP_MS, ALARM_FREQUENCY_HZ, ALARM_REPETITIONS, ALARM_STEP_HZ,
};

/// Trait for sound playback implementations.
pub trait SoundPlayer {
    /// Plays a tone sequence in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, sequence: &ToneSequence) -> Result<(), SoundError>;

    /// Returns true if the audio system is available.
    fn is_available(&self) -> bool;

    /// Returns true if sound playback is disabled.
    fn is_disabled(&self) -> bool;

    /// Enables sound playback.
    fn enable(&self);

    /// Disables sound playback.
    fn disable(&self);
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, sequence: &ToneSequence) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, sequence)
    }

    fn is_available(&self) -> bool {
        RodioSoundPlayer::is_available(self)
    }

    fn is_disabled(&self) -> bool {
        RodioSoundPlayer::is_disabled(self)
    }

    fn enable(&self) {
        RodioSoundPlayer::enable(self)
    }

    fn disable(&self) {
        RodioSoundPlayer::disable(self)
    }
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for Box<P> {
    fn play(&self, sequence: &ToneSequence) -> Result<(), SoundError> {
        (**self).play(sequence)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn is_disabled(&self) -> bool {
        (**self).is_disabled()
    }

    fn enable(&self) {
        (**self).enable()
    }

    fn disable(&self) {
        (**self).disable()
    }
}

/// Player that never touches an audio device.
#[derive(Debug, Default)]
pub struct SilentSoundPlayer;

impl SoundPlayer for SilentSoundPlayer {
    fn play(&self, _sequence: &ToneSequence) -> Result<(), SoundError> {
        tracing::debug!("No audio device, alarm skipped");
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }

    fn is_disabled(&self) -> bool {
        true
    }

    fn enable(&self) {}

    fn disable(&self) {}
}

/// Opens the audio device when sound is wanted, falling back to silence.
#[must_use]
pub fn create_player(sound_enabled: bool) -> Box<dyn SoundPlayer> {
    if !sound_enabled {
        return Box::new(SilentSoundPlayer);
    }
    match try_create_player(false) {
        Some(player) => Box::new(player),
        None => Box::new(SilentSoundPlayer),
    }
}

/// Mock sound player for testing.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_calls: std::sync::Mutex<Vec<ToneSequence>>,
    available: std::sync::atomic::AtomicBool,
    disabled: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: std::sync::Mutex::new(Vec::new()),
            available: std::sync::atomic::AtomicBool::new(true),
            disabled: std::sync::atomic::AtomicBool::new(false),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
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
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<ToneSequence> {
        self.play_calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
    }
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, sequence: &ToneSequence) -> Result<(), SoundError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if self.disabled.load(std::sync::atomic::Ordering::SeqCst) {
            return Ok(());
        }
        self.play_calls.lock().unwrap().push(sequence.clone());
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn enable(&self) {
        self.disabled
            .store(false, std::sync::atomic::Ordering::SeqCst);
    }

    fn disable(&self) {
        self.disabled
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_default_matches_new() {
        let mock = MockSoundPlayer::default();
        assert!(mock.is_available());
        assert!(!mock.is_disabled());
        assert!(mock.play(&ToneSequence::default_alarm()).is_ok());
        assert_eq!(mock.play_count(), 1);
    }

    #[test]
    fn test_mock_records_sequences() {
        let mock = MockSoundPlayer::new();
        mock.play(&ToneSequence::default_alarm()).unwrap();

        assert_eq!(mock.play_count(), 1);
        assert_eq!(mock.get_play_calls()[0].len(), 10);

        mock.clear_calls();
        assert_eq!(mock.play_count(), 0);
    }

    #[test]
    fn test_mock_disabled_skips_recording() {
        let mock = MockSoundPlayer::new();
        mock.disable();

        mock.play(&ToneSequence::default_alarm()).unwrap();

        assert!(mock.is_disabled());
        assert_eq!(mock.play_count(), 0);
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockSoundPlayer::new();
        mock.set_should_fail(true);
        assert!(mock.play(&ToneSequence::default_alarm()).is_err());
    }

    #[test]
    fn test_silent_player() {
        let player = SilentSoundPlayer;
        assert!(player.play(&ToneSequence::default_alarm()).is_ok());
        assert!(!player.is_available());
    }

    #[test]
    fn test_create_player_without_sound_is_silent() {
        let player = create_player(false);
        assert!(!player.is_available());
    }

    #[test]
    fn test_boxed_player_delegates() {
        let boxed: Box<MockSoundPlayer> = Box::new(MockSoundPlayer::new());
        boxed.play(&ToneSequence::default_alarm()).unwrap();
        assert_eq!(boxed.play_count(), 1);
    }
}
