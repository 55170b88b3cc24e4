//! Command implementations

pub mod flags;
pub mod plan;
pub mod run;

use anyhow::Result;

use crate::cli::GlobalArgs;
use archtest::ops::MatrixRun;
use archtest::util::{Config, RunEnvironment};

/// Resolve the environment and configuration, then plan the run.
///
/// The environment is read first so a missing `TARGET` is reported before
/// any file is touched.
pub fn prepare(global: &GlobalArgs) -> Result<MatrixRun> {
    let env = RunEnvironment::from_process()?;

    let cwd = std::env::current_dir()?;
    let config = Config::discover(global.config.as_deref(), &cwd)?.with_cargo(global.cargo.clone());

    Ok(MatrixRun::prepare(env, config))
}
