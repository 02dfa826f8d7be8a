//! Errors surfaced to scripts

use crate::assets::AssetError;
use crate::audio::AudioError;
use crate::config::ConfigError;
use crate::ecs::SceneError;

/// Anything a script call can fail with
#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    /// Scene store failure, e.g. a stale entity
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Asset lookup failure
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Audio device failure
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Raised by script code itself
    #[error("{0}")]
    Failed(String),

    /// A script panicked and the host caught it
    #[error("Script panicked: {0}")]
    Panicked(String),
}

impl ScriptError {
    /// Script-level failure with a message
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Result of a script call
pub type ScriptResult<T = ()> = Result<T, ScriptError>;
