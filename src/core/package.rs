//! The packages a test matrix drives.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the manifest file inside each package directory.
pub const MANIFEST_NAME: &str = "Cargo.toml";

/// Which package an invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Package {
    /// The core package; always tested, always first.
    Primary,
    /// The runtime-detection package; needs `std`.
    Secondary,
    /// The examples package; needs `std`.
    Examples,
    /// The whole workspace, run from the current directory.
    Workspace,
}

impl Package {
    pub fn as_str(&self) -> &'static str {
        match self {
            Package::Primary => "primary",
            Package::Secondary => "secondary",
            Package::Examples => "examples",
            Package::Workspace => "workspace",
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where each package lives, relative to the directory the run starts in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageLayout {
    pub primary: PathBuf,
    pub secondary: PathBuf,
    pub examples: PathBuf,
}

impl Default for PackageLayout {
    fn default() -> Self {
        PackageLayout {
            primary: PathBuf::from("crates/core_arch"),
            secondary: PathBuf::from("crates/std_detect"),
            examples: PathBuf::from("examples"),
        }
    }
}

impl PackageLayout {
    /// Directory of a package. The workspace has none.
    pub fn dir(&self, package: Package) -> Option<&Path> {
        match package {
            Package::Primary => Some(&self.primary),
            Package::Secondary => Some(&self.secondary),
            Package::Examples => Some(&self.examples),
            Package::Workspace => None,
        }
    }

    /// Manifest path of a package, for `--manifest-path`.
    pub fn manifest_path(&self, package: Package) -> Option<PathBuf> {
        self.dir(package).map(|dir| dir.join(MANIFEST_NAME))
    }
}

/// Cargo feature names toggled on the secondary package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureNames {
    /// Feature enabling file-based detection (e.g. reading `/proc`).
    pub file_io: String,
    /// Feature enabling dynamic symbol lookup of `getauxval`.
    pub dlsym: String,
}

impl Default for FeatureNames {
    fn default() -> Self {
        FeatureNames {
            file_io: "std_detect_file_io".to_string(),
            dlsym: "std_detect_dlsym_getauxval".to_string(),
        }
    }
}
