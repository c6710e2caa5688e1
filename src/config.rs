// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration of the edit behaviors.
//!
//! Loaded from TOML:
//!
//! ```toml
//! enable_scaling_edit = true
//!
//! [[behavior]]
//! name = "tangent-lock"
//! base = "default"
//! constrain_delta = "hor-ver-diag"
//! rules = [
//!     "ANY|NIL ANY|NIL SMO|UNS OFF|SEL ANY|NIL ANY|NIL false ConstrainPrevAngle",
//! ]
//! ```

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level edit configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Use scaling edits for segments whose end point is dragged
    pub enable_scaling_edit: bool,
    /// Custom behaviors, registered in order after the built-in ones
    #[serde(rename = "behavior")]
    pub behaviors: Vec<BehaviorConfig>,
}

/// A custom behavior variant
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BehaviorConfig {
    pub name: String,
    /// Registered behavior whose rules come first
    #[serde(default)]
    pub base: Option<String>,
    /// Delta constraint by name; inherited from `base` when absent
    #[serde(default)]
    pub constrain_delta: Option<String>,
    /// Whether the behavior supports scaling edits
    #[serde(default)]
    pub scaling_edit: bool,
    /// Extra rules in the one-line text format
    #[serde(default)]
    pub rules: Vec<String>,
}

impl EditConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading edit config: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read edit config: {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse edit config: {}", path.display()))?;
        tracing::debug!("Found {} custom behaviors", config.behaviors.len());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = EditConfig::from_toml_str("").unwrap();
        assert_eq!(config, EditConfig::default());
        assert!(!config.enable_scaling_edit);
    }

    #[test]
    fn parse_custom_behavior() {
        let config = EditConfig::from_toml_str(
            r#"
            enable_scaling_edit = true

            [[behavior]]
            name = "locked"
            base = "default"
            constrain_delta = "hor-ver-diag"
            rules = ["ANY|NIL ANY|NIL ANY|NIL OFF|SEL ANY|NIL ANY|NIL false DontMove"]

            [[behavior]]
            name = "plain"
            "#,
        )
        .unwrap();
        assert!(config.enable_scaling_edit);
        assert_eq!(config.behaviors.len(), 2);
        assert_eq!(config.behaviors[0].base.as_deref(), Some("default"));
        assert_eq!(config.behaviors[0].rules.len(), 1);
        assert!(!config.behaviors[0].scaling_edit);
        assert_eq!(config.behaviors[1].base, None);
        assert!(config.behaviors[1].rules.is_empty());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = EditConfig::from_toml_str("enable_scaling_edit = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EditConfig::load("/nonexistent/edit-config.toml").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/edit-config.toml"));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("edit-config-{}.toml", std::process::id()));
        std::fs::write(&path, "enable_scaling_edit = true\n").unwrap();
        let config = EditConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(config.enable_scaling_edit);
    }
}
