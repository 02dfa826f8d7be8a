//! Audio source and reverb zone components

use crate::audio::{ReverbPreset, RollOffModel, SoundHandle, SoundSettings};
use crate::foundation::guid::Guid;
use crate::foundation::math::Transform;

/// Positional sound source
///
/// Playback itself goes through the context's audio device; the component
/// only keeps the settings and the handle of the sound it started.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Audio asset to play, null when none is assigned
    pub sound: Guid,
    volume: f32,
    /// Times to repeat; negative repeats forever
    pub loop_count: i32,
    /// Loop playback
    pub looping: bool,
    min_distance: f32,
    max_distance: f32,
    /// Distance attenuation curve
    pub roll_off: RollOffModel,
    doppler_level: f32,
    /// Muted sources keep playing silently
    pub muted: bool,
    /// Stream from disk instead of decoding up front
    pub streaming: bool,
    /// Start playing when the scene begins
    pub autoplay: bool,
    pub(crate) playing: Option<SoundHandle>,
}

impl Default for AudioComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            sound: Guid::NULL,
            volume: 1.0,
            loop_count: -1,
            looping: false,
            min_distance: 1.0,
            max_distance: 10_000.0,
            roll_off: RollOffModel::default(),
            doppler_level: 1.0,
            muted: false,
            streaming: false,
            autoplay: true,
            playing: None,
        }
    }
}

impl AudioComponent {
    /// Create a source for an audio asset
    pub fn new(sound: Guid) -> Self {
        Self {
            sound,
            ..Self::default()
        }
    }

    /// Playback volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set volume (negative values clamp to zero)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.max(0.0);
    }

    /// Distance at which attenuation starts
    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Distance beyond which volume stays constant
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Set both attenuation distances; `max` is raised to at least `min`
    pub fn set_min_max_distance(&mut self, min: f32, max: f32) {
        self.min_distance = min.max(0.0);
        self.max_distance = max.max(self.min_distance);
    }

    /// Set the attenuation start distance
    pub fn set_min_distance(&mut self, min: f32) {
        self.set_min_max_distance(min, self.max_distance);
    }

    /// Set the attenuation end distance
    pub fn set_max_distance(&mut self, max: f32) {
        self.set_min_max_distance(self.min_distance, max);
    }

    /// Doppler effect scale
    pub fn doppler_level(&self) -> f32 {
        self.doppler_level
    }

    /// Set the doppler scale (negative values clamp to zero)
    pub fn set_doppler_level(&mut self, level: f32) {
        self.doppler_level = level.max(0.0);
    }

    /// Playback settings handed to the audio device
    pub fn sound_settings(&self) -> SoundSettings {
        SoundSettings {
            volume: self.volume,
            loop_count: self.loop_count,
            is_looping: self.looping,
            is_muted: self.muted,
            is_streaming: self.streaming,
            ..SoundSettings::default()
        }
    }

    /// Handle of the sound started by this component, if any
    pub fn playing_handle(&self) -> Option<SoundHandle> {
        self.playing
    }
}

/// Reverb zone applying a preset to sounds heard inside it
#[derive(Debug, Clone, PartialEq)]
pub struct ReverbComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Reverb character
    pub preset: ReverbPreset,
    min_distance: f32,
    max_distance: f32,
    /// Whether the zone is applied
    pub active: bool,
}

impl Default for ReverbComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            preset: ReverbPreset::Generic,
            min_distance: 1.0,
            max_distance: 100.0,
            active: true,
        }
    }
}

impl ReverbComponent {
    /// Full-strength radius
    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Radius where the effect fades out
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Set both radii; `max` is raised to at least `min`
    pub fn set_min_max_distance(&mut self, min: f32, max: f32) {
        self.min_distance = min.max(0.0);
        self.max_distance = max.max(self.min_distance);
    }
}
