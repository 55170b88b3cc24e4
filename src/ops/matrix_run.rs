//! Implementation of `archtest run`.

use std::path::PathBuf;

use crate::core::error::RunError;
use crate::core::flags::FlagSet;
use crate::matrix::{compose, ExecutionReport, Executor, TestPlan};
use crate::util::config::Config;
use crate::util::env::RunEnvironment;
use crate::util::process::CommandRunner;
use crate::util::shell::Shell;

/// Everything decided before the first process is spawned.
///
/// Built once from the resolved environment and never mutated; the plan and
/// flags can be inspected or executed.
#[derive(Debug, Clone)]
pub struct MatrixRun {
    /// Resolved environment
    pub env: RunEnvironment,

    /// Repository configuration
    pub config: Config,

    /// Base flag set shared by every invocation
    pub flags: FlagSet,

    /// Ordered invocations
    pub plan: TestPlan,
}

impl MatrixRun {
    /// Compose flags and plan invocations for a resolved environment.
    pub fn prepare(env: RunEnvironment, config: Config) -> Self {
        let flags = compose(&env.target, &env.base_flags);
        let plan = TestPlan::new(&env.target, &env.toggles, &config);

        tracing::debug!(
            "planned {} invocation(s) for {} (extra family: {:?})",
            plan.len(),
            env.target,
            plan.extra_family
        );

        MatrixRun {
            env,
            config,
            flags,
            plan,
        }
    }

    /// The program invocations are run with.
    pub fn cargo(&self) -> PathBuf {
        self.config.cargo_program()
    }

    /// Create an executor bound to this run's flags and layout.
    pub fn executor<'a>(&'a self, shell: &'a Shell) -> Executor<'a> {
        Executor::new(self.cargo(), &self.config.packages, &self.flags, shell)
    }

    /// Execute the plan, stopping at the first failure.
    pub fn run(
        &self,
        shell: &Shell,
        runner: &mut dyn CommandRunner,
    ) -> Result<ExecutionReport, RunError> {
        self.env.log_summary(&self.flags);
        self.executor(shell).execute(&self.plan, runner)
    }
}
