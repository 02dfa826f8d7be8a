//! Project directory layout

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Project name and root directory, as stored in the host config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Display name
    pub name: String,
    /// Root directory of the project
    pub base_path: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Sandbox".to_string(),
            base_path: PathBuf::from("."),
        }
    }
}

/// Well-known directories under the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    project: PathBuf,
    content: PathBuf,
    cache: PathBuf,
    renderer_cache: PathBuf,
    saved: PathBuf,
}

impl ProjectPaths {
    /// Derive the layout from the project root
    pub fn new(root: impl AsRef<Path>) -> Self {
        let project = root.as_ref().to_path_buf();
        let cache = project.join("Cache");
        Self {
            content: project.join("Content"),
            renderer_cache: cache.join("Renderer"),
            saved: project.join("Saved"),
            cache,
            project,
        }
    }

    /// Project root
    pub fn project(&self) -> &Path {
        &self.project
    }

    /// Imported assets
    pub fn content(&self) -> &Path {
        &self.content
    }

    /// Derived data that can be rebuilt
    pub fn cache(&self) -> &Path {
        &self.cache
    }

    /// Compiled shaders and other renderer data
    pub fn renderer_cache(&self) -> &Path {
        &self.renderer_cache
    }

    /// Save games and user settings
    pub fn saved(&self) -> &Path {
        &self.saved
    }
}

impl From<&ProjectConfig> for ProjectPaths {
    fn from(config: &ProjectConfig) -> Self {
        Self::new(&config.base_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = ProjectPaths::new("/games/sandbox");

        assert_eq!(paths.project(), Path::new("/games/sandbox"));
        assert_eq!(paths.content(), Path::new("/games/sandbox/Content"));
        assert_eq!(paths.renderer_cache(), Path::new("/games/sandbox/Cache/Renderer"));
        assert_eq!(paths.saved(), Path::new("/games/sandbox/Saved"));
    }
}
