//! Audio device abstraction and the silent implementation

use std::collections::HashMap;

use super::{AudioError, RollOffModel, SoundHandle, SoundSettings};
use crate::foundation::math::Vector3;

/// Playback backend used by the script context
///
/// Not `Send`: scripts run on a single thread.
pub trait AudioDevice {
    /// Start a non-positional sound
    fn play_2d(&mut self, path: &str, settings: SoundSettings) -> Result<SoundHandle, AudioError>;

    /// Start a positional sound
    fn play_3d(
        &mut self,
        path: &str,
        position: Vector3,
        settings: SoundSettings,
        min_distance: f32,
        max_distance: f32,
        roll_off: RollOffModel,
    ) -> Result<SoundHandle, AudioError>;

    /// Stop a voice
    fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError>;

    /// Pause or resume a voice
    fn set_paused(&mut self, handle: SoundHandle, paused: bool) -> Result<(), AudioError>;

    /// Move a positional voice
    fn set_position(&mut self, handle: SoundHandle, position: Vector3) -> Result<(), AudioError>;

    /// Whether a voice is playing (not stopped and not paused)
    fn is_playing(&self, handle: SoundHandle) -> bool;

    /// Place the listener
    fn set_listener(&mut self, position: Vector3, forward: Vector3, up: Vector3);

    /// Stop every voice
    fn stop_all(&mut self);
}

/// Tracked state of a voice on the [`NullAudioDevice`]
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceState {
    /// Sound asset path
    pub path: String,
    /// Playback settings
    pub settings: SoundSettings,
    /// Position of positional voices
    pub position: Option<Vector3>,
    /// Paused voices are not playing
    pub paused: bool,
}

/// Device that tracks voices without producing sound
#[derive(Debug, Default)]
pub struct NullAudioDevice {
    voices: HashMap<u32, (u32, VoiceState)>,
    next_id: u32,
    generation: u32,
    listener: (Vector3, Vector3, Vector3),
}

impl NullAudioDevice {
    /// Create a new silent device
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a live voice
    pub fn voice(&self, handle: SoundHandle) -> Option<&VoiceState> {
        self.voices
            .get(&handle.id)
            .filter(|(generation, _)| *generation == handle.generation)
            .map(|(_, state)| state)
    }

    /// Number of live voices, paused ones included
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Listener position, forward and up vectors
    pub fn listener(&self) -> (Vector3, Vector3, Vector3) {
        self.listener
    }

    fn start(&mut self, state: VoiceState) -> SoundHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        if self.next_id == 0 {
            self.generation = self.generation.wrapping_add(1);
        }
        log::debug!("Playing '{}' (voice {})", state.path, id);
        self.voices.insert(id, (self.generation, state));
        SoundHandle::new(id, self.generation)
    }

    fn voice_mut(&mut self, handle: SoundHandle) -> Result<&mut VoiceState, AudioError> {
        self.voices
            .get_mut(&handle.id)
            .filter(|(generation, _)| *generation == handle.generation)
            .map(|(_, state)| state)
            .ok_or(AudioError::UnknownHandle(handle))
    }
}

impl AudioDevice for NullAudioDevice {
    fn play_2d(&mut self, path: &str, settings: SoundSettings) -> Result<SoundHandle, AudioError> {
        Ok(self.start(VoiceState {
            path: path.to_string(),
            settings,
            position: None,
            paused: false,
        }))
    }

    fn play_3d(
        &mut self,
        path: &str,
        position: Vector3,
        settings: SoundSettings,
        _min_distance: f32,
        _max_distance: f32,
        _roll_off: RollOffModel,
    ) -> Result<SoundHandle, AudioError> {
        Ok(self.start(VoiceState {
            path: path.to_string(),
            settings,
            position: Some(position),
            paused: false,
        }))
    }

    fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError> {
        self.voice_mut(handle)?;
        self.voices.remove(&handle.id);
        log::debug!("Stopped voice {}", handle.id);
        Ok(())
    }

    fn set_paused(&mut self, handle: SoundHandle, paused: bool) -> Result<(), AudioError> {
        self.voice_mut(handle)?.paused = paused;
        Ok(())
    }

    fn set_position(&mut self, handle: SoundHandle, position: Vector3) -> Result<(), AudioError> {
        self.voice_mut(handle)?.position = Some(position);
        Ok(())
    }

    fn is_playing(&self, handle: SoundHandle) -> bool {
        self.voice(handle).is_some_and(|voice| !voice.paused)
    }

    fn set_listener(&mut self, position: Vector3, forward: Vector3, up: Vector3) {
        self.listener = (position, forward, up);
    }

    fn stop_all(&mut self) {
        if !self.voices.is_empty() {
            log::debug!("Stopping {} voices", self.voices.len());
        }
        self.voices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_pause_stop() {
        let mut device = NullAudioDevice::new();
        let handle = device.play_2d("Content/Sounds/click.wav", SoundSettings::default()).unwrap();
        assert!(device.is_playing(handle));

        device.set_paused(handle, true).unwrap();
        assert!(!device.is_playing(handle));
        assert_eq!(device.voice_count(), 1);

        device.stop(handle).unwrap();
        assert!(!device.is_playing(handle));
        assert_eq!(device.stop(handle), Err(AudioError::UnknownHandle(handle)));
    }

    #[test]
    fn test_positional_voice_tracks_position() {
        let mut device = NullAudioDevice::new();
        let handle = device
            .play_3d(
                "Content/Sounds/engine.wav",
                Vector3::ZERO,
                SoundSettings::default(),
                1.0,
                100.0,
                RollOffModel::Linear,
            )
            .unwrap();

        device.set_position(handle, Vector3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(device.voice(handle).unwrap().position, Some(Vector3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_stop_all() {
        let mut device = NullAudioDevice::new();
        device.play_2d("a.wav", SoundSettings::default()).unwrap();
        device.play_2d("b.wav", SoundSettings::default()).unwrap();

        device.stop_all();
        assert_eq!(device.voice_count(), 0);
    }
}
