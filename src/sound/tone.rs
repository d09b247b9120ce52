//! Alarm tone model.
//!
//! An alarm is a list of sine beeps, each with its own offset from the
//! moment the alarm fires. The player turns this into audio; keeping the
//! schedule as plain data lets it be tested without a sound card.

use std::time::Duration;

use super::error::SoundError;

/// Base alarm frequency in Hz.
pub const ALARM_FREQUENCY_HZ: f32 = 300.0;

/// Pitch step between the two beeps of a repetition.
pub const ALARM_STEP_HZ: f32 = 100.0;

/// Length of a single beep.
pub const ALARM_BEEP_MS: u64 = 200;

/// Number of low/high beep pairs.
pub const ALARM_REPETITIONS: u32 = 5;

/// A single sine beep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in Hz
    pub frequency: f32,
    /// Offset from alarm start
    pub offset: Duration,
    /// Beep length
    pub duration: Duration,
}

impl Tone {
    /// End of the beep relative to alarm start.
    pub fn end(&self) -> Duration {
        self.offset + self.duration
    }
}

/// An ordered schedule of beeps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToneSequence {
    tones: Vec<Tone>,
}

impl ToneSequence {
    /// Builds the alternating two-pitch alarm.
    ///
    /// Repetition `i` plays `frequency` at `duration * 2i` and
    /// `frequency + step` at `duration * (2i + 1)`.
    pub fn alarm(frequency: f32, duration: Duration, repetitions: u32) -> Self {
        let mut tones = Vec::with_capacity(repetitions as usize * 2);
        for i in 0..repetitions {
            tones.push(Tone {
                frequency,
                offset: duration * (i * 2),
                duration,
            });
            tones.push(Tone {
                frequency: frequency + ALARM_STEP_HZ,
                offset: duration * (i * 2 + 1),
                duration,
            });
        }
        Self { tones }
    }

    /// The alarm used for threshold alerts.
    pub fn default_alarm() -> Self {
        Self::alarm(
            ALARM_FREQUENCY_HZ,
            Duration::from_millis(ALARM_BEEP_MS),
            ALARM_REPETITIONS,
        )
    }

    /// Tones sorted by offset.
    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    /// Time from alarm start until the last beep ends.
    pub fn total_duration(&self) -> Duration {
        self.tones
            .iter()
            .map(Tone::end)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Checks that every tone can be synthesized.
    pub fn validate(&self) -> Result<(), SoundError> {
        for tone in &self.tones {
            if !tone.frequency.is_finite() || tone.frequency <= 0.0 {
                return Err(SoundError::InvalidTone(format!(
                    "{} Hz",
                    tone.frequency
                )));
            }
            if tone.duration.is_zero() {
                return Err(SoundError::InvalidTone("長さが0です".to_string()));
            }
        }
        Ok(())
    }
}
