//! Asset registry
//!
//! Assets are known by project-relative path and by GUID. Scripts look them
//! up by path and read or tweak their settings; importing and decoding the
//! underlying files is the engine's job.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::guid::Guid;
use crate::renderer::Material;

/// Asset kind; values match the engine's
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum AssetType {
    /// Unknown
    #[default]
    None = 0,
    /// 2D texture
    Texture2D = 1,
    /// Cubemap
    TextureCube = 2,
    /// Mesh
    Mesh = 3,
    /// Sound file
    Audio = 4,
    /// Group of sounds sharing volume
    SoundGroup = 5,
    /// Font
    Font = 6,
    /// Surface material
    Material = 7,
    /// Physics surface response
    PhysicsMaterial = 8,
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum FilterMode {
    /// Nearest texel
    Point = 0,
    /// Linear within a mip
    #[default]
    Bilinear = 1,
    /// Linear across mips
    Trilinear = 2,
    /// Anisotropic filtering
    Anisotropic = 3,
}

/// Texture addressing outside [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum AddressMode {
    /// Repeat
    #[default]
    Wrap = 0,
    /// Repeat mirrored
    Mirror = 1,
    /// Clamp to the edge texel
    Clamp = 2,
    /// Clamp to opaque black
    ClampToOpaqueBlack = 3,
    /// Clamp to opaque white
    ClampToOpaqueWhite = 4,
}

/// Sampling settings of a 2D texture asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Texture2D {
    anisotropy: f32,
    /// Sampling filter
    pub filter_mode: FilterMode,
    /// Addressing mode
    pub address_mode: AddressMode,
    mips_count: u32,
}

impl Default for Texture2D {
    fn default() -> Self {
        Self {
            anisotropy: 1.0,
            filter_mode: FilterMode::Bilinear,
            address_mode: AddressMode::Wrap,
            mips_count: 1,
        }
    }
}

impl Texture2D {
    /// Maximum anisotropy
    pub fn anisotropy(&self) -> f32 {
        self.anisotropy
    }

    /// Set maximum anisotropy (at least 1)
    pub fn set_anisotropy(&mut self, anisotropy: f32) {
        self.anisotropy = anisotropy.max(1.0);
    }

    /// Number of mip levels
    pub fn mips_count(&self) -> u32 {
        self.mips_count
    }

    /// Set the number of mip levels (at least 1)
    pub fn set_mips_count(&mut self, mips: u32) {
        self.mips_count = mips.max(1);
    }
}

/// Settings of an audio asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioAsset {
    volume: f32,
}

impl Default for AudioAsset {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

impl AudioAsset {
    /// Volume multiplier applied to every playback
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the volume multiplier (negative values clamp to zero)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.max(0.0);
    }
}

/// Surface response shared by colliders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction at rest
    pub static_friction: f32,
    /// Friction while sliding
    pub dynamic_friction: f32,
    /// Restitution
    pub bounciness: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            static_friction: 0.6,
            dynamic_friction: 0.6,
            bounciness: 0.0,
        }
    }
}

/// Per-kind payload of a registered asset
#[derive(Debug, Clone, PartialEq)]
pub enum AssetData {
    /// 2D texture
    Texture2D(Texture2D),
    /// Cubemap
    TextureCube,
    /// Mesh
    Mesh,
    /// Sound file
    Audio(AudioAsset),
    /// Sound group
    SoundGroup,
    /// Font
    Font,
    /// Surface material
    Material(Material),
    /// Physics surface response
    PhysicsMaterial(PhysicsMaterial),
}

impl AssetData {
    /// Kind of the payload
    pub fn asset_type(&self) -> AssetType {
        match self {
            Self::Texture2D(_) => AssetType::Texture2D,
            Self::TextureCube => AssetType::TextureCube,
            Self::Mesh => AssetType::Mesh,
            Self::Audio(_) => AssetType::Audio,
            Self::SoundGroup => AssetType::SoundGroup,
            Self::Font => AssetType::Font,
            Self::Material(_) => AssetType::Material,
            Self::PhysicsMaterial(_) => AssetType::PhysicsMaterial,
        }
    }
}

/// A registered asset
#[derive(Debug, Clone, PartialEq)]
pub struct AssetEntry {
    /// Asset GUID
    pub guid: Guid,
    /// Kind-specific settings
    pub data: AssetData,
}

impl AssetEntry {
    /// Asset kind
    pub fn asset_type(&self) -> AssetType {
        self.data.asset_type()
    }
}

/// Asset lookup failures
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    /// No asset is registered under the path
    #[error("Asset '{0}' not found")]
    NotFound(String),

    /// The asset exists but has a different kind
    #[error("Asset '{path}' is a {actual}, expected a {expected}")]
    TypeMismatch {
        /// Asset path
        path: String,
        /// Kind requested
        expected: AssetType,
        /// Kind registered
        actual: AssetType,
    },

    /// Another asset already uses the path
    #[error("Asset '{0}' is already registered")]
    AlreadyRegistered(String),

    /// Another asset already uses the GUID
    #[error("GUID {guid} of '{path}' is already used by '{existing}'")]
    GuidInUse {
        /// Conflicting GUID
        guid: Guid,
        /// Path being registered
        path: String,
        /// Path already registered under the GUID
        existing: String,
    },

    /// The null GUID means "no asset" and cannot be registered
    #[error("Asset '{0}' cannot be registered under the null GUID")]
    NullGuid(String),
}

macro_rules! typed_accessors {
    ($($get:ident / $get_mut:ident => $variant:ident($ty:ty)),+ $(,)?) => {
        $(
            #[doc = concat!("Settings of the ", stringify!($variant), " asset at `path`")]
            pub fn $get(&self, path: &str) -> Result<&$ty, AssetError> {
                match &self.entry(path)?.data {
                    AssetData::$variant(data) => Ok(data),
                    other => Err(AssetError::TypeMismatch {
                        path: path.to_string(),
                        expected: AssetType::$variant,
                        actual: other.asset_type(),
                    }),
                }
            }

            #[doc = concat!("Mutable settings of the ", stringify!($variant), " asset at `path`")]
            pub fn $get_mut(&mut self, path: &str) -> Result<&mut $ty, AssetError> {
                let entry = self
                    .by_path
                    .get_mut(path)
                    .ok_or_else(|| AssetError::NotFound(path.to_string()))?;
                match &mut entry.data {
                    AssetData::$variant(data) => Ok(data),
                    other => Err(AssetError::TypeMismatch {
                        path: path.to_string(),
                        expected: AssetType::$variant,
                        actual: other.asset_type(),
                    }),
                }
            }
        )+
    };
}

/// Assets known to the running project, keyed by path
#[derive(Debug, Default)]
pub struct AssetRegistry {
    by_path: HashMap<String, AssetEntry>,
    path_by_guid: HashMap<Guid, String>,
}

impl AssetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset under a fresh GUID
    pub fn register(&mut self, path: impl Into<String>, data: AssetData) -> Result<Guid, AssetError> {
        let guid = loop {
            let candidate = Guid::generate();
            if !self.path_by_guid.contains_key(&candidate) {
                break candidate;
            }
        };
        self.register_with_guid(path, guid, data)
    }

    /// Register an asset under a known GUID
    pub fn register_with_guid(&mut self, path: impl Into<String>, guid: Guid, data: AssetData) -> Result<Guid, AssetError> {
        let path = path.into();
        if guid.is_null() {
            return Err(AssetError::NullGuid(path));
        }
        if self.by_path.contains_key(&path) {
            return Err(AssetError::AlreadyRegistered(path));
        }
        if let Some(existing) = self.path_by_guid.get(&guid) {
            return Err(AssetError::GuidInUse {
                guid,
                path,
                existing: existing.clone(),
            });
        }
        log::debug!("Registered {} asset '{}' ({})", data.asset_type(), path, guid);
        self.path_by_guid.insert(guid, path.clone());
        self.by_path.insert(path, AssetEntry { guid, data });
        Ok(guid)
    }

    /// Asset at `path`, `None` when unknown
    pub fn get(&self, path: &str) -> Option<&AssetEntry> {
        self.by_path.get(path)
    }

    /// Path of the asset with `guid`
    pub fn path_of(&self, guid: Guid) -> Option<&str> {
        self.path_by_guid.get(&guid).map(String::as_str)
    }

    /// Number of registered assets
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Whether no asset is registered
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// GUID of the asset at `path`, checking its kind
    pub fn guid_of(&self, path: &str, expected: AssetType) -> Result<Guid, AssetError> {
        let entry = self.entry(path)?;
        if entry.asset_type() == expected {
            Ok(entry.guid)
        } else {
            Err(AssetError::TypeMismatch {
                path: path.to_string(),
                expected,
                actual: entry.asset_type(),
            })
        }
    }

    fn entry(&self, path: &str) -> Result<&AssetEntry, AssetError> {
        self.by_path
            .get(path)
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }

    typed_accessors! {
        texture_2d / texture_2d_mut => Texture2D(Texture2D),
        audio / audio_mut => Audio(AudioAsset),
        material / material_mut => Material(Material),
        physics_material / physics_material_mut => PhysicsMaterial(PhysicsMaterial),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unknown_path_is_none() {
        let registry = AssetRegistry::new();
        assert!(registry.get("Content/missing.png").is_none());
    }

    #[test]
    fn test_typed_access_checks_kind() {
        let mut registry = AssetRegistry::new();
        registry
            .register("Content/Textures/rock.png", AssetData::Texture2D(Texture2D::default()))
            .unwrap();

        registry.texture_2d_mut("Content/Textures/rock.png").unwrap().set_mips_count(0);
        assert_eq!(registry.texture_2d("Content/Textures/rock.png").unwrap().mips_count(), 1);

        assert_eq!(
            registry.audio("Content/Textures/rock.png"),
            Err(AssetError::TypeMismatch {
                path: "Content/Textures/rock.png".to_string(),
                expected: AssetType::Audio,
                actual: AssetType::Texture2D,
            })
        );
        assert_eq!(
            registry.material("Content/none.mat"),
            Err(AssetError::NotFound("Content/none.mat".to_string()))
        );
    }

    #[test]
    fn test_guid_and_path_lookups_agree() {
        let mut registry = AssetRegistry::new();
        let guid = registry.register("Content/Meshes/ship.fbx", AssetData::Mesh).unwrap();

        assert_eq!(registry.path_of(guid), Some("Content/Meshes/ship.fbx"));
        assert_eq!(registry.guid_of("Content/Meshes/ship.fbx", AssetType::Mesh), Ok(guid));
        assert!(registry.register("Content/Meshes/ship.fbx", AssetData::Mesh).is_err());
    }

    #[test]
    fn test_register_with_guid_conflicts() {
        let mut registry = AssetRegistry::new();
        let guid = Guid::new(0xA, 0xB);
        registry
            .register_with_guid("Content/Fonts/mono.ttf", guid, AssetData::Font)
            .unwrap();

        assert_eq!(
            registry.register_with_guid("Content/Fonts/sans.ttf", guid, AssetData::Font),
            Err(AssetError::GuidInUse {
                guid,
                path: "Content/Fonts/sans.ttf".to_string(),
                existing: "Content/Fonts/mono.ttf".to_string(),
            })
        );
        assert_eq!(
            registry.register_with_guid("Content/Fonts/mono.ttf", Guid::new(0, 1), AssetData::Font),
            Err(AssetError::AlreadyRegistered("Content/Fonts/mono.ttf".to_string()))
        );
        assert_eq!(
            registry.register_with_guid("Content/Fonts/serif.ttf", Guid::NULL, AssetData::Font),
            Err(AssetError::NullGuid("Content/Fonts/serif.ttf".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }
}
