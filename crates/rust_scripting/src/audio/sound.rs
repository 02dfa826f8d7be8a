//! Fire-and-forget sounds started from scripts

use super::{RollOffModel, SoundHandle, SoundSettings};
use crate::foundation::math::Vector3;
use crate::script::{ScriptContext, ScriptResult};

/// Scale `volume` by the registered asset volume, if the path is a known
/// audio asset
fn asset_volume(ctx: &ScriptContext, path: &str, volume: f32) -> ScriptResult<f32> {
    match ctx.assets().get(path) {
        Some(_) => Ok(volume * ctx.assets().audio(path)?.volume()),
        None => Ok(volume),
    }
}

fn settings(volume: f32, loop_count: i32) -> SoundSettings {
    SoundSettings {
        volume: volume.max(0.0),
        loop_count,
        is_looping: loop_count != 0,
        ..SoundSettings::default()
    }
}

/// A non-positional sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sound2D {
    handle: SoundHandle,
}

impl Sound2D {
    /// Play `path` at `volume`; `loop_count` < 0 loops forever
    pub fn play(ctx: &mut ScriptContext, path: &str, volume: f32, loop_count: i32) -> ScriptResult<Self> {
        let volume = asset_volume(ctx, path, volume)?;
        let handle = ctx.audio_mut().play_2d(path, settings(volume, loop_count))?;
        Ok(Self { handle })
    }

    /// Device handle of the voice
    pub fn handle(&self) -> SoundHandle {
        self.handle
    }

    /// Stop the sound
    pub fn stop(&self, ctx: &mut ScriptContext) -> ScriptResult {
        ctx.audio_mut().stop(self.handle)?;
        Ok(())
    }

    /// Pause or resume the sound
    pub fn set_paused(&self, ctx: &mut ScriptContext, paused: bool) -> ScriptResult {
        ctx.audio_mut().set_paused(self.handle, paused)?;
        Ok(())
    }

    /// Whether the sound is audible
    pub fn is_playing(&self, ctx: &ScriptContext) -> bool {
        ctx.audio().is_playing(self.handle)
    }
}

/// A positional sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sound3D {
    handle: SoundHandle,
}

impl Sound3D {
    /// Default distance where attenuation starts
    pub const MIN_DISTANCE: f32 = 1.0;
    /// Default distance where attenuation ends
    pub const MAX_DISTANCE: f32 = 10_000.0;

    /// Play `path` at `position`; `loop_count` < 0 loops forever
    pub fn play(ctx: &mut ScriptContext, path: &str, position: Vector3, volume: f32, loop_count: i32) -> ScriptResult<Self> {
        let volume = asset_volume(ctx, path, volume)?;
        let handle = ctx.audio_mut().play_3d(
            path,
            position,
            settings(volume, loop_count),
            Self::MIN_DISTANCE,
            Self::MAX_DISTANCE,
            RollOffModel::default(),
        )?;
        Ok(Self { handle })
    }

    /// Device handle of the voice
    pub fn handle(&self) -> SoundHandle {
        self.handle
    }

    /// Move the sound
    pub fn set_position(&self, ctx: &mut ScriptContext, position: Vector3) -> ScriptResult {
        ctx.audio_mut().set_position(self.handle, position)?;
        Ok(())
    }

    /// Stop the sound
    pub fn stop(&self, ctx: &mut ScriptContext) -> ScriptResult {
        ctx.audio_mut().stop(self.handle)?;
        Ok(())
    }

    /// Pause or resume the sound
    pub fn set_paused(&self, ctx: &mut ScriptContext, paused: bool) -> ScriptResult {
        ctx.audio_mut().set_paused(self.handle, paused)?;
        Ok(())
    }

    /// Whether the sound is audible
    pub fn is_playing(&self, ctx: &ScriptContext) -> bool {
        ctx.audio().is_playing(self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetData, AssetError, Texture2D};
    use crate::script::ScriptError;

    #[test]
    fn test_sound_2d_lifecycle() {
        let mut ctx = ScriptContext::default();
        let sound = Sound2D::play(&mut ctx, "Content/Sounds/click.wav", 1.0, 0).unwrap();
        assert!(sound.is_playing(&ctx));

        sound.set_paused(&mut ctx, true).unwrap();
        assert!(!sound.is_playing(&ctx));

        sound.stop(&mut ctx).unwrap();
        assert!(sound.stop(&mut ctx).is_err());
    }

    #[test]
    fn test_sound_3d_moves() {
        let mut ctx = ScriptContext::default();
        let sound = Sound3D::play(&mut ctx, "Content/Sounds/engine.wav", Vector3::ZERO, 1.0, -1).unwrap();

        sound.set_position(&mut ctx, Vector3::new(0.0, 0.0, 5.0)).unwrap();
        assert!(sound.is_playing(&ctx));
    }

    #[test]
    fn test_registered_non_audio_path_is_rejected() {
        let mut ctx = ScriptContext::default();
        ctx.assets_mut()
            .register("Content/Textures/rock.png", AssetData::Texture2D(Texture2D::default()))
            .unwrap();

        assert!(matches!(
            Sound2D::play(&mut ctx, "Content/Textures/rock.png", 1.0, 0),
            Err(ScriptError::Asset(AssetError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn test_loop_settings() {
        assert!(settings(1.0, -1).is_looping);
        assert!(!settings(1.0, 0).is_looping);
        assert_eq!(settings(-2.0, 3).volume, 0.0);
    }
}
