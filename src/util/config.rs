//! Configuration file support for archtest.
//!
//! A run is configured by the environment first (see [`crate::util::env`]).
//! The optional `archtest.toml` only describes the repository being tested:
//! where its packages live, which feature names to toggle, and what to feed
//! the examples smoke test. Every key is optional.
//!
//! ```toml
//! cargo = "cargo"
//!
//! [packages]
//! primary = "crates/core_arch"
//! secondary = "crates/std_detect"
//! examples = "examples"
//!
//! [features]
//! file_io = "std_detect_file_io"
//! dlsym = "std_detect_dlsym_getauxval"
//!
//! [smoke]
//! hex_input = "test"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use crate::core::package::{FeatureNames, PackageLayout};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "archtest.toml";

/// archtest configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Program used to drive builds (defaults to `cargo`)
    pub cargo: Option<PathBuf>,

    /// Package locations
    pub packages: PackageLayout,

    /// Feature names toggled on the secondary package
    pub features: FeatureNames,

    /// Examples smoke test settings
    pub smoke: SmokeConfig,
}

/// Settings for the examples smoke test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Line fed to the `hex` subcommand (a newline is appended)
    pub hex_input: String,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        SmokeConfig {
            hex_input: "test".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration with fallback to defaults if the file doesn't exist
    /// or can't be loaded.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Find the configuration for a run.
    ///
    /// An explicitly requested file must load. Otherwise `archtest.toml` in
    /// `dir` is used if present, and defaults if not.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Ok(Self::load_or_default(&dir.join(CONFIG_FILE_NAME))),
        }
    }

    /// The program used to drive builds.
    pub fn cargo_program(&self) -> PathBuf {
        self.cargo
            .clone()
            .unwrap_or_else(|| PathBuf::from("cargo"))
    }

    /// Apply a command-line override for the cargo program.
    pub fn with_cargo(mut self, cargo: Option<PathBuf>) -> Self {
        if cargo.is_some() {
            self.cargo = cargo;
        }
        self
    }
}
