//! Implementation of `archtest plan` and `archtest flags`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::invocation::Mode;
use crate::core::package::Package;
use crate::matrix::ExtraFamily;
use crate::ops::matrix_run::MatrixRun;
use crate::util::env::RUSTFLAGS_VAR;
use crate::util::shell::Shell;

/// A fully rendered plan, as printed by `archtest plan`.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub target: String,
    pub rustflags: String,
    pub extra_family: Option<ExtraFamily>,
    pub skipped: Vec<String>,
    pub steps: Vec<PlannedCommand>,
}

/// One rendered invocation.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedCommand {
    pub index: usize,
    pub package: Package,
    pub mode: Mode,
    pub command: String,
    pub rustflags: String,
    /// Scoped variables other than `RUSTFLAGS`
    pub env: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,
}

impl PlanReport {
    /// Render every invocation of a prepared run without executing anything.
    pub fn new(run: &MatrixRun, shell: &Shell) -> Self {
        let executor = run.executor(shell);
        let target = &run.plan.target;

        let steps = run
            .plan
            .iter()
            .enumerate()
            .map(|(i, inv)| {
                let cmd = executor.command_for(target, inv);
                let mut env = cmd.get_env().clone();
                let rustflags = env.remove(RUSTFLAGS_VAR).unwrap_or_default();
                PlannedCommand {
                    index: i + 1,
                    package: inv.package,
                    mode: inv.mode,
                    command: cmd.display_command(),
                    rustflags,
                    env,
                    cwd: cmd.get_cwd().map(|p| p.display().to_string()),
                    stdin: inv.stdin.clone(),
                }
            })
            .collect();

        PlanReport {
            target: target.to_string(),
            rustflags: run.flags.to_env_string(),
            extra_family: run.plan.extra_family,
            skipped: run.plan.skipped.clone(),
            steps,
        }
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render for humans.
    pub fn format(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Test plan for `{}`\n", self.target));
        out.push_str(&format!("# {}={}\n", RUSTFLAGS_VAR, self.rustflags));
        if let Some(family) = self.extra_family {
            out.push_str(&format!("# extra features: {:?}\n", family));
        }
        out.push('\n');

        for step in &self.steps {
            out.push_str(&format!("{:>3}. {}\n", step.index, step.command));
            if step.rustflags != self.rustflags {
                out.push_str(&format!("       {}={}\n", RUSTFLAGS_VAR, step.rustflags));
            }
            for (key, value) in &step.env {
                out.push_str(&format!("       {}={}\n", key, value));
            }
            if let Some(ref cwd) = step.cwd {
                out.push_str(&format!("       in {}\n", cwd));
            }
            if let Some(ref stdin) = step.stdin {
                out.push_str(&format!("       stdin: {:?}\n", stdin));
            }
        }

        if !self.skipped.is_empty() {
            out.push('\n');
            for reason in &self.skipped {
                out.push_str(&format!("skipped: {}\n", reason));
            }
        }

        out
    }
}
