//! Core data structures for archtest.
//!
//! This module contains the types every stage of a run passes along:
//! - Target triples and pattern matching
//! - Toggles and flag sets
//! - Packages and planned invocations
//! - Error types

pub mod error;
pub mod flags;
pub mod invocation;
pub mod package;
pub mod target;
pub mod toggles;

pub use error::{ConfigError, RunError};
pub use flags::FlagSet;
pub use invocation::{Invocation, Mode};
pub use package::{FeatureNames, Package, PackageLayout};
pub use target::Target;
pub use toggles::ToggleSet;
