//! Fire-and-forget audio boundary.

use thiserror::Error;

use crate::entities::Pickup;

/// Sink for sound effect triggers.
///
/// Triggers never report failure: implementations swallow playback errors so
/// the tick loop cannot be interrupted by audio.
pub trait AudioSink {
    /// Brings the audio device up. Called once, from a user-initiated action.
    fn start(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    /// Plays the chime associated with a pickup.
    fn play_pickup(&mut self, pickup: Pickup);

    /// Plays the dash whoosh.
    fn play_dash(&mut self);
}

/// Failures reported by [`AudioSink::start`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AudioError {
    /// No output device could be opened.
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),
}

/// Sink that discards every trigger.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_pickup(&mut self, _pickup: Pickup) {}

    fn play_dash(&mut self) {}
}
