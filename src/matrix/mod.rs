//! The test matrix: flag composition, planning, and execution.
//!
//! A run flows through these stages in order:
//!
//! 1. [`compose`] builds the base flag set from `RUSTFLAGS` and the target's
//!    toolchain family.
//! 2. [`TestPlan::new`] lays out every cargo invocation for the target and
//!    toggles.
//! 3. [`Executor::execute`] runs them one at a time and stops at the first
//!    failure.

pub mod compose;
pub mod executor;
pub mod plan;

pub use compose::{compose, ToolchainFamily};
pub use executor::{ExecutionReport, Executor};
pub use plan::{ExtraFamily, TestPlan};
