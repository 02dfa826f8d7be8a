//! Audio playback facade
//!
//! Scripts never talk to an audio library directly. They go through an
//! [`AudioDevice`] owned by the script context, which the embedding engine
//! implements on top of its mixer. [`NullAudioDevice`] keeps playback state
//! without producing sound and backs headless runs and tests.

use serde::{Deserialize, Serialize};

mod device;
mod sound;

pub use device::{AudioDevice, NullAudioDevice, VoiceState};
pub use sound::{Sound2D, Sound3D};

/// Handle of a voice started on an [`AudioDevice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle {
    /// Unique identifier for the sound
    pub id: u32,
    /// Generation counter for handle validation
    pub generation: u32,
}

impl SoundHandle {
    /// Create a new sound handle
    pub fn new(id: u32, generation: u32) -> Self {
        Self { id, generation }
    }
}

/// Per-voice playback settings
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundSettings {
    /// Volume multiplier
    pub volume: f32,
    /// Stereo pan in [-1, 1]
    pub pan: f32,
    /// Times to repeat; negative repeats forever
    pub loop_count: i32,
    /// Loop playback
    pub is_looping: bool,
    /// Stream from disk
    pub is_streaming: bool,
    /// Muted voices keep playing silently
    pub is_muted: bool,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            pan: 0.0,
            loop_count: -1,
            is_looping: false,
            is_streaming: false,
            is_muted: false,
        }
    }
}

/// Distance attenuation curve of 3D sounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum RollOffModel {
    /// Linear falloff between min and max distance
    Linear = 0,
    /// Inverse distance, the physically realistic curve
    #[default]
    Inverse = 1,
    /// Squared linear falloff
    LinearSquare = 2,
    /// Inverse distance that still reaches zero at max distance
    InverseTapered = 3,
}

/// Reverb environment presets
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ReverbPreset {
    #[default]
    Generic = 0,
    PaddedCell,
    Room,
    Bathroom,
    LivingRoom,
    StoneRoom,
    Auditorium,
    ConcertHall,
    Cave,
    Arena,
    Hangar,
    CarpettedHallway,
    Hallway,
    StoneCorridor,
    Alley,
    Forest,
    City,
    Mountains,
    Quarry,
    Plain,
    ParkingLot,
    SewerPipe,
    UnderWater,
}

/// Errors reported by an [`AudioDevice`]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    /// The handle does not name a live voice
    #[error("Sound handle {0:?} is not playing")]
    UnknownHandle(SoundHandle),

    /// The device could not start the sound
    #[error("Failed to play '{path}': {reason}")]
    PlaybackFailed {
        /// Sound asset path
        path: String,
        /// Device-specific reason
        reason: String,
    },
}
