//! Sequential, fail-fast plan execution.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::core::error::RunError;
use crate::core::flags::FlagSet;
use crate::core::invocation::Invocation;
use crate::core::package::PackageLayout;
use crate::core::target::Target;
use crate::matrix::plan::TestPlan;
use crate::util::env::RUSTFLAGS_VAR;
use crate::util::process::{CommandRunner, ProcessBuilder};
use crate::util::shell::{Shell, Status};

/// Outcome of a plan that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Number of invocations that ran and succeeded
    pub completed: usize,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

/// Turns planned invocations into processes and runs them one at a time.
pub struct Executor<'a> {
    cargo: PathBuf,
    layout: &'a PackageLayout,
    flags: &'a FlagSet,
    shell: &'a Shell,
}

impl<'a> Executor<'a> {
    /// Create a new executor.
    pub fn new(
        cargo: impl AsRef<Path>,
        layout: &'a PackageLayout,
        flags: &'a FlagSet,
        shell: &'a Shell,
    ) -> Self {
        Executor {
            cargo: cargo.as_ref().to_path_buf(),
            layout,
            flags,
            shell,
        }
    }

    /// The flags an invocation runs with: the run's set plus its own.
    pub fn flags_for(&self, inv: &Invocation) -> FlagSet {
        self.flags.extended(&inv.extra_flags)
    }

    /// Build the command line for one invocation.
    ///
    /// `cargo <subcommand> [--target=T] [--manifest-path=P] <args> <mode args> [-- <harness args>]`,
    /// with `RUSTFLAGS` and the invocation's environment layered over the
    /// inherited environment.
    pub fn command_for(&self, target: &Target, inv: &Invocation) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.cargo).arg(inv.mode.subcommand());

        if inv.mode.takes_target() {
            cmd = cmd.arg(format!("--target={}", target));
        }

        if inv.in_package_dir {
            if let Some(dir) = self.layout.dir(inv.package) {
                cmd = cmd.cwd(dir);
            }
        } else if let Some(manifest) = self.layout.manifest_path(inv.package) {
            cmd = cmd.arg(format!("--manifest-path={}", manifest.display()));
        }

        cmd = cmd.args(&inv.args).args(inv.mode.mode_args());

        if !inv.harness_args.is_empty() {
            cmd = cmd.arg("--").args(&inv.harness_args);
        }

        cmd = cmd.env(RUSTFLAGS_VAR, self.flags_for(inv).to_env_string());
        for (key, value) in &inv.env {
            cmd = cmd.env(key, value);
        }

        if let Some(ref input) = inv.stdin {
            cmd = cmd.stdin(input.as_bytes());
        }

        cmd
    }

    /// Run every invocation in plan order, stopping at the first failure.
    ///
    /// Nothing after a failing invocation is started, and nothing it left
    /// behind is cleaned up.
    pub fn execute(
        &self,
        plan: &TestPlan,
        runner: &mut dyn CommandRunner,
    ) -> Result<ExecutionReport, RunError> {
        let start = Instant::now();
        let total = plan.len();

        for reason in &plan.skipped {
            self.shell.status(Status::Skipped, reason);
        }

        for (i, inv) in plan.iter().enumerate() {
            let index = i + 1;
            let cmd = self.command_for(&plan.target, inv);
            let command = cmd.display_command();

            self.shell.status(
                Status::Running,
                format!("[{}/{}] {}", index, total, inv.describe()),
            );
            self.shell.verbose(&command);
            tracing::debug!(
                "invocation {}: {} (RUSTFLAGS={}, env={:?}, cwd={:?})",
                index,
                command,
                self.flags_for(inv),
                inv.env,
                cmd.get_cwd()
            );

            let status = runner.run(&cmd).map_err(|source| RunError::Spawn {
                index,
                total,
                description: inv.describe(),
                command: command.clone(),
                source,
            })?;

            if !status.success() {
                return Err(RunError::InvocationFailed {
                    index,
                    total,
                    description: inv.describe(),
                    command,
                    flags: self.flags_for(inv).to_env_string(),
                    code: status.code(),
                });
            }
        }

        Ok(ExecutionReport {
            completed: total,
            elapsed: start.elapsed(),
        })
    }
}
