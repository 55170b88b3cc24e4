//! archtest - a per-target test matrix driver for SIMD intrinsic crates
//!
//! Given a target triple and a few toggles from the environment, this crate
//! composes compiler flags, plans every cargo invocation the target needs,
//! and runs them in order, stopping at the first failure.

pub mod core;
pub mod matrix;
pub mod ops;
pub mod util;

/// Test utilities and mocks for archtest unit tests.
///
/// Only compiled for tests. Provides a recording [`util::CommandRunner`] and
/// an in-memory environment lookup.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{FlagSet, Invocation, Mode, Package, Target, ToggleSet};
pub use matrix::{compose, TestPlan};
pub use ops::MatrixRun;
pub use util::{Config, RunEnvironment};
