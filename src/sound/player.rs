//! Sound player implementation using rodio.
//!
//! Tones are synthesized with rodio's sine generator; no sound files are
//! involved.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use rodio::source::{SineWave, Source, Zero};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::tone::ToneSequence;

/// Sample rate used for the silent gaps between beeps.
const GAP_SAMPLE_RATE: u32 = 48_000;

/// Output gain for synthesized beeps.
const BEEP_AMPLITUDE: f32 = 0.25;

/// Playback that can be cut off before it finishes.
trait Playback {
    fn halt(&self);
    fn finished(&self) -> bool;
}

impl Playback for Sink {
    fn halt(&self) {
        self.stop();
    }

    fn finished(&self) -> bool {
        self.empty()
    }
}

/// Slot for the single alarm allowed to sound at a time.
struct ActiveAlarm<P: Playback> {
    current: Mutex<Option<P>>,
}

impl<P: Playback> ActiveAlarm<P> {
    fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// Installs `next`, stopping the previous alarm.
    ///
    /// Returns true if the previous alarm was still sounding.
    fn replace(&self, next: P) -> bool {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let interrupted = match current.take() {
            Some(previous) => {
                let sounding = !previous.finished();
                previous.halt();
                sounding
            }
            None => false,
        };
        *current = Some(next);
        interrupted
    }

    fn silence(&self) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(playback) = current.take() {
            playback.halt();
        }
    }
}

/// A sound player that uses rodio for audio playback.
///
/// At most one alarm plays at a time: starting a new alarm stops the one
/// still sounding.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Whether sound playback is disabled.
    disabled: AtomicBool,
    /// Sink of the alarm currently playing.
    active: ActiveAlarm<Sink>,
}

impl RodioSoundPlayer {
    /// Creates a new sound player.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(disabled: bool) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            disabled: AtomicBool::new(disabled),
            active: ActiveAlarm::new(),
        })
    }

    /// Plays a tone sequence without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is invalid or no sink can be created.
    pub fn play(&self, sequence: &ToneSequence) -> Result<(), SoundError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!("Sound playback disabled, skipping");
            return Ok(());
        }
        sequence.validate()?;

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        // Overlapping tones are played back to back.
        let mut cursor = Duration::ZERO;
        for tone in sequence.tones() {
            if tone.offset > cursor {
                sink.append(Zero::<f32>::new(1, GAP_SAMPLE_RATE).take_duration(tone.offset - cursor));
            }
            sink.append(
                SineWave::new(tone.frequency)
                    .take_duration(tone.duration)
                    .amplify(BEEP_AMPLITUDE),
            );
            cursor = cursor.max(tone.end());
        }

        if self.active.replace(sink) {
            debug!("Stopped previous alarm");
        }

        debug!(
            tones = sequence.len(),
            duration_ms = sequence.total_duration().as_millis() as u64,
            "Alarm playback started"
        );
        Ok(())
    }

    /// Stops the alarm currently playing, if any.
    pub fn silence(&self) {
        self.active.silence();
    }

    /// Returns true if sound playback is currently disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Enables sound playback.
    pub fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
        debug!("Sound playback enabled");
    }

    /// Disables sound playback and silences the current alarm.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
        self.silence();
        debug!("Sound playback disabled");
    }

    /// Always true once construction succeeded.
    #[must_use]
    pub fn is_available(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player(disabled: bool) -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new(disabled) {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct FakePlayback {
        halted: Arc<AtomicBool>,
        done: bool,
    }

    impl Playback for FakePlayback {
        fn halt(&self) {
            self.halted.store(true, Ordering::SeqCst);
        }

        fn finished(&self) -> bool {
            self.done
        }
    }

    mod active_alarm_tests {
        use super::*;

        #[test]
        fn test_new_alarm_stops_the_sounding_one() {
            let slot = ActiveAlarm::new();
            let first = FakePlayback::default();
            let second = FakePlayback::default();

            assert!(!slot.replace(first.clone()));
            assert!(slot.replace(second.clone()));

            assert!(first.halted.load(Ordering::SeqCst));
            assert!(!second.halted.load(Ordering::SeqCst));
        }

        #[test]
        fn test_finished_alarm_is_not_reported_as_interrupted() {
            let slot = ActiveAlarm::new();
            let first = FakePlayback {
                done: true,
                ..FakePlayback::default()
            };

            slot.replace(first.clone());
            assert!(!slot.replace(FakePlayback::default()));
            assert!(first.halted.load(Ordering::SeqCst));
        }

        #[test]
        fn test_silence_stops_current_and_empties_slot() {
            let slot = ActiveAlarm::new();
            let current = FakePlayback::default();
            slot.replace(current.clone());

            slot.silence();

            assert!(current.halted.load(Ordering::SeqCst));
            assert!(!slot.replace(FakePlayback::default()));
        }
    }

    #[test]
    fn test_second_alarm_replaces_first_on_device() {
        let player = match RodioSoundPlayer::new(false) {
            Ok(p) => p,
            Err(_) => return,
        };
        let alarm = ToneSequence::default_alarm();

        player.play(&alarm).unwrap();
        player.play(&alarm).unwrap();

        let current = player.active.current.lock().unwrap();
        assert!(current.as_ref().is_some_and(|sink| !sink.empty()));
    }

    // These tests skip themselves when no audio device is present
    // (e.g., CI containers).

    #[test]
    fn test_disabled_player_skips_playback() {
        let player = match RodioSoundPlayer::new(true) {
            Ok(p) => p,
            Err(_) => return,
        };

        assert!(player.is_disabled());
        assert!(player.play(&ToneSequence::default_alarm()).is_ok());
    }

    #[test]
    fn test_enable_disable() {
        let player = match RodioSoundPlayer::new(true) {
            Ok(p) => p,
            Err(_) => return,
        };

        player.enable();
        assert!(!player.is_disabled());

        player.disable();
        assert!(player.is_disabled());
    }

    #[test]
    fn test_invalid_sequence_is_rejected() {
        let player = match RodioSoundPlayer::new(false) {
            Ok(p) => p,
            Err(_) => return,
        };

        let sequence = ToneSequence::alarm(-1.0, Duration::from_millis(10), 1);
        assert!(matches!(
            player.play(&sequence),
            Err(SoundError::InvalidTone(_))
        ));
    }

    #[test]
    fn test_try_create_player_does_not_panic() {
        let _ = try_create_player(true);
    }

    #[test]
    fn test_debug_impl() {
        let player = match RodioSoundPlayer::new(true) {
            Ok(p) => p,
            Err(_) => return,
        };

        assert!(format!("{:?}", player).contains("RodioSoundPlayer"));
    }
}
