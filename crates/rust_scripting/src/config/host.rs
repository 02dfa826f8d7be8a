//! Script host configuration

use serde::{Deserialize, Serialize};

use super::Config;
use crate::ecs::DuplicateComponentPolicy;
use crate::physics::PhysicsSettings;
use crate::project::ProjectConfig;

/// Settings for a [`ScriptHost`](crate::script::ScriptHost)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Default log level (`RUST_LOG` overrides it)
    pub log_level: String,
    /// Fixed-step physics settings
    pub physics: PhysicsSettings,
    /// Catch panics raised by scripts and log them instead of unwinding
    pub catch_panics: bool,
    /// What `add_component` does when the component already exists
    pub duplicate_component_policy: DuplicateComponentPolicy,
    /// Project layout
    pub project: ProjectConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            physics: PhysicsSettings::default(),
            catch_panics: true,
            duplicate_component_policy: DuplicateComponentPolicy::default(),
            project: ProjectConfig::default(),
        }
    }
}

impl Config for HostConfig {}

impl HostConfig {
    /// Builder: set the duplicate component policy
    pub fn with_duplicate_component_policy(mut self, policy: DuplicateComponentPolicy) -> Self {
        self.duplicate_component_policy = policy;
        self
    }

    /// Builder: set physics settings
    pub fn with_physics(mut self, physics: PhysicsSettings) -> Self {
        self.physics = physics;
        self
    }

    /// Builder: set the project layout
    pub fn with_project(mut self, project: ProjectConfig) -> Self {
        self.project = project;
        self
    }

    /// Log level as a filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        crate::foundation::logging::parse_level(&self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ConfigFormat};
    use crate::foundation::math::Vector3;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = HostConfig::default();

        assert_relative_eq!(config.physics.fixed_time_step, 1.0 / 120.0);
        assert_eq!(config.physics.gravity, Vector3::new(0.0, -9.81, 0.0));
        assert_eq!(config.duplicate_component_policy, DuplicateComponentPolicy::Error);
        assert!(config.catch_panics);
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let text = r#"
            log_level = "debug"
            duplicate_component_policy = "Replace"

            [physics]
            fixed_time_step = 0.02
        "#;
        let config = HostConfig::from_str_with_format(text, ConfigFormat::Toml).unwrap();

        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
        assert_eq!(config.duplicate_component_policy, DuplicateComponentPolicy::Replace);
        assert_relative_eq!(config.physics.fixed_time_step, 0.02);
        assert_eq!(config.physics.max_steps_per_frame, PhysicsSettings::default().max_steps_per_frame);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = std::env::temp_dir().join(format!("host_config_{}.ron", std::process::id()));
        let config = HostConfig::default()
            .with_duplicate_component_policy(DuplicateComponentPolicy::KeepExisting);

        config.save_to_file(&path).unwrap();
        let loaded = HostConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = HostConfig::default().save_to_file("settings.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
