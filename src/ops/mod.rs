//! High-level operations.
//!
//! This module contains the implementation of archtest commands.

pub mod matrix_plan;
pub mod matrix_run;

pub use matrix_plan::{PlanReport, PlannedCommand};
pub use matrix_run::MatrixRun;
