//! Verification run configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::hash::NameHasher;
use crate::layout::{BrickId, Subvolume};

/// Default configuration constants
///
/// This module centralizes all default values used by verification runs.
/// By collecting these constants in one place, we ensure consistency
/// and make it easier to adjust defaults for different clusters.
pub mod defaults {
    /// Deadline for background I/O to settle before assertions: 120s
    pub const POLL_TIMEOUT_SECS: u64 = 120;

    /// Interval between condition probes: 500ms
    pub const POLL_INTERVAL_MS: u64 = 500;

    /// Attempt bound for alternate-name discovery
    pub const RENAME_ATTEMPTS: u32 = crate::constants::DEFAULT_RENAME_ATTEMPTS;

    /// Hash names the way the filesystem does by default (rsync munge on)
    pub const RSYNC_MUNGE: bool = true;

    /// Default log level
    pub const fn default_log_level() -> &'static str {
        "info"
    }
}

/// Verification run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Volume under verification
    pub volume: VolumeConfig,

    /// Check behavior knobs
    #[serde(default)]
    pub checks: CheckConfig,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Volume description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Volume name
    pub name: String,

    /// Subvolumes in layout order
    pub subvols: Vec<SubvolConfig>,
}

/// One subvolume entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubvolConfig {
    /// Subvolume name (e.g. `vol-replicate-0`)
    pub name: String,

    /// Member bricks as `host:/brick/path`
    pub bricks: Vec<String>,
}

/// Check behavior knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Deadline for background I/O to settle before assertions
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Interval between condition probes
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Attempt bound for alternate-name discovery
    #[serde(default = "default_rename_attempts")]
    pub rename_attempts: u32,

    /// Apply the rsync-temporary name munge before hashing
    #[serde(default = "default_rsync_munge")]
    pub rsync_munge: bool,
}

fn default_log_level() -> String {
    defaults::default_log_level().to_string()
}

fn default_poll_timeout() -> u64 {
    defaults::POLL_TIMEOUT_SECS
}

fn default_poll_interval() -> u64 {
    defaults::POLL_INTERVAL_MS
}

fn default_rename_attempts() -> u32 {
    defaults::RENAME_ATTEMPTS
}

fn default_rsync_munge() -> bool {
    defaults::RSYNC_MUNGE
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: default_poll_timeout(),
            poll_interval_ms: default_poll_interval(),
            rename_attempts: default_rename_attempts(),
            rsync_munge: default_rsync_munge(),
        }
    }
}

impl VerifyConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("Failed to read config file: {}", e)))?;

        let config: VerifyConfig = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializeError(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, contents)
            .map_err(|e| ConfigError::WriteError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.volume.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "Volume name cannot be empty".to_string(),
            ));
        }

        if self.volume.subvols.is_empty() {
            return Err(ConfigError::ValidationError(
                "Volume must have at least one subvolume".to_string(),
            ));
        }

        for subvol in &self.volume.subvols {
            if subvol.bricks.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Subvolume {} has no bricks",
                    subvol.name
                )));
            }
            for brick in &subvol.bricks {
                if BrickId::parse(brick).is_none() {
                    return Err(ConfigError::ValidationError(format!(
                        "Invalid brick {} (expected host:/brick/path)",
                        brick
                    )));
                }
            }
        }

        if self.checks.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Poll interval must be at least 1ms".to_string(),
            ));
        }

        if self.checks.rename_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "Rename attempt bound must be at least 1".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {}",
                    self.log_level
                )));
            }
        }

        Ok(())
    }

    /// Subvolume list in layout order
    ///
    /// Brick strings were validated at load time, so parse failures here
    /// surface as an error rather than being dropped silently.
    pub fn subvolumes(&self) -> Result<Vec<Subvolume>, ConfigError> {
        self.volume
            .subvols
            .iter()
            .map(|subvol| {
                let bricks = subvol
                    .bricks
                    .iter()
                    .map(|brick| {
                        BrickId::parse(brick).ok_or_else(|| {
                            ConfigError::ValidationError(format!("Invalid brick {}", brick))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Subvolume::new(subvol.name.clone(), bricks))
            })
            .collect()
    }

    /// Name hasher matching the volume's munge setting
    pub fn name_hasher(&self) -> NameHasher {
        if self.checks.rsync_munge {
            NameHasher::new()
        } else {
            NameHasher::literal()
        }
    }

    /// Poll deadline as a `Duration`
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.checks.poll_timeout_secs)
    }

    /// Poll interval as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.checks.poll_interval_ms)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Failed to serialize config: {0}")]
    SerializeError(String),

    #[error("Failed to write config: {0}")]
    WriteError(String),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> VerifyConfig {
        VerifyConfig {
            volume: VolumeConfig {
                name: "vol-dht".to_string(),
                subvols: vec![
                    SubvolConfig {
                        name: "vol-replicate-0".to_string(),
                        bricks: vec![
                            "server1:/bricks/brick1/b".to_string(),
                            "server2:/bricks/brick2/b".to_string(),
                        ],
                    },
                    SubvolConfig {
                        name: "vol-replicate-1".to_string(),
                        bricks: vec![
                            "server3:/bricks/brick3/b".to_string(),
                            "server4:/bricks/brick4/b".to_string(),
                        ],
                    },
                ],
            },
            checks: CheckConfig::default(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn test_default_checks() {
        let config = sample_config();
        assert_eq!(config.checks.poll_timeout_secs, 120);
        assert_eq!(config.checks.rename_attempts, 1000);
        assert!(config.checks.rsync_munge);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_config_validation() {
        let mut config = sample_config();
        assert!(config.validate().is_ok());

        config.volume.name = "".to_string();
        assert!(config.validate().is_err());
        config.volume.name = "vol-dht".to_string();

        config.volume.subvols[0].bricks[0] = "not-a-brick".to_string();
        assert!(config.validate().is_err());
        config.volume.subvols[0].bricks[0] = "server1:/bricks/brick1/b".to_string();

        config.checks.poll_interval_ms = 0;
        assert!(config.validate().is_err());
        config.checks.poll_interval_ms = 500;

        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = sample_config();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: VerifyConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.volume.name, deserialized.volume.name);
        assert_eq!(
            config.volume.subvols.len(),
            deserialized.volume.subvols.len()
        );
        assert_eq!(
            config.checks.rename_attempts,
            deserialized.checks.rename_attempts
        );
    }

    #[test]
    fn test_missing_checks_section_uses_defaults() {
        let toml_str = r#"
            log_level = "debug"

            [volume]
            name = "vol-dht"

            [[volume.subvols]]
            name = "vol-client-0"
            bricks = ["server1:/bricks/brick1/b"]
        "#;
        let config: VerifyConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.checks.poll_timeout_secs, 120);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_name_hasher_honors_munge_setting() {
        let mut config = sample_config();
        assert_eq!(config.name_hasher().munged(".foo.tmp123"), "foo");

        config.checks.rsync_munge = false;
        assert_eq!(config.name_hasher().munged(".foo.tmp123"), ".foo.tmp123");
    }

    #[test]
    fn test_subvolumes_parse_bricks() {
        let config = sample_config();
        let subvols = config.subvolumes().unwrap();
        assert_eq!(subvols.len(), 2);
        assert_eq!(subvols[0].bricks[0].host, "server1");
        assert_eq!(
            subvols[0].layout_brick().map(|b| b.path.as_str()),
            Some("/bricks/brick1/b")
        );
    }
}
