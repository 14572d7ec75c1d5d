//! Clone configuration (replica.toml)
//!
//! ```toml
//! [clone]
//! memo_policy = "on-entry"   # or "on-field"
//! max_depth = 1024          # 1..=4096
//! permissions = "FULL_ACCESS"
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::clone::{CloneEngine, CloneOptions, MemoPolicy, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
use crate::reflect::{Accessor, ClassRegistry, ReflectionPermission};

/// Errors that can occur while loading a clone configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Clone configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CloneConfig {
    /// `[clone]` table
    #[serde(default)]
    pub clone: CloneSection,
}

/// `[clone]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CloneSection {
    /// When source objects are memoized (default: "on-entry")
    pub memo_policy: MemoPolicy,

    /// Recursion limit (default: 1024, at most 4096)
    pub max_depth: usize,

    /// Accessor permissions (default: "FULL_ACCESS")
    pub permissions: ReflectionPermission,
}

impl Default for CloneSection {
    fn default() -> Self {
        Self {
            memo_policy: MemoPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            permissions: ReflectionPermission::FULL_ACCESS,
        }
    }
}

impl CloneConfig {
    /// Parse a config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a config from a string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CloneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clone.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.clone.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_depth {} exceeds the limit of {}",
                self.clone.max_depth, MAX_DEPTH_LIMIT
            )));
        }

        // Without public read/write nothing can be copied at all
        let required = ReflectionPermission::READ_PUBLIC.union(ReflectionPermission::WRITE_PUBLIC);
        if !self.clone.permissions.contains(required) {
            return Err(ConfigError::Invalid(format!(
                "permissions {} must include READ_PUBLIC and WRITE_PUBLIC",
                self.clone.permissions
            )));
        }

        Ok(())
    }

    /// Write config to a file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Engine options described by this config
    pub fn to_options(&self) -> CloneOptions {
        CloneOptions {
            memo_policy: self.clone.memo_policy,
            max_depth: self.clone.max_depth,
            accessor: Accessor::with_permissions(self.clone.permissions),
        }
    }

    /// Build a configured engine over a registry
    pub fn engine<'r>(&self, registry: &'r ClassRegistry) -> CloneEngine<'r> {
        CloneEngine::with_options(registry, self.to_options())
    }
}
