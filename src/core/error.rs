//! Error types for configuration and execution.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Exit status for configuration errors (`EX_CONFIG` from sysexits.h).
///
/// Failed invocations exit with the child's own status, so a child that
/// itself exits with 78 is indistinguishable from a configuration error by
/// status alone. The stderr report tells them apart.
pub const CONFIG_EXIT_CODE: i32 = 78;

/// Exit status for failures that carry no status of their own.
pub const GENERIC_EXIT_CODE: i32 = 1;

/// Error raised before any invocation is planned.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ConfigError {
    #[error("the `{var}` environment variable must be set")]
    #[diagnostic(
        code(archtest::config::missing_var),
        help("set it to the target triple under test, e.g. `{var}=x86_64-unknown-linux-gnu`")
    )]
    MissingVar { var: &'static str },

    #[error("the `{var}` environment variable is not valid unicode: `{value}`")]
    #[diagnostic(code(archtest::config::invalid_var))]
    InvalidVar { var: &'static str, value: String },

    #[error("failed to read config file `{}`", path.display())]
    #[diagnostic(code(archtest::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file `{}`", path.display())]
    #[diagnostic(code(archtest::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigError::MissingVar { var } => Diagnostic::error(self.to_string())
                .with_context("no invocations were planned")
                .with_suggestion(format!(
                    "Export `{}` with the target triple under test",
                    var
                )),
            ConfigError::InvalidVar { .. } => Diagnostic::error(self.to_string())
                .with_context("no invocations were planned"),
            ConfigError::Read { path, source } => Diagnostic::error(self.to_string())
                .with_context(source.to_string())
                .with_location(path),
            ConfigError::Parse { path, source } => Diagnostic::error(self.to_string())
                .with_context(source.message().to_string())
                .with_location(path)
                .with_suggestion("Check the file against the documented `archtest.toml` keys"),
        }
    }
}

/// Error raised while executing a plan. Every variant aborts the run.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum RunError {
    #[error("failed to spawn invocation {index}/{total}: {description}")]
    #[diagnostic(
        code(archtest::run::spawn),
        help("check that cargo is on PATH, or pass --cargo")
    )]
    Spawn {
        index: usize,
        total: usize,
        description: String,
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invocation {index}/{total} failed: {description}")]
    #[diagnostic(code(archtest::run::failed))]
    InvocationFailed {
        index: usize,
        total: usize,
        description: String,
        command: String,
        flags: String,
        /// `None` when the child was killed by a signal
        code: Option<i32>,
    },
}

impl RunError {
    /// The process exit status this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Spawn { .. } => GENERIC_EXIT_CODE,
            RunError::InvocationFailed { code, .. } => match code {
                Some(0) | None => GENERIC_EXIT_CODE,
                Some(code) => *code,
            },
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RunError::Spawn {
                command, source, ..
            } => Diagnostic::error(self.to_string())
                .with_context(format!("command: {}", command))
                .with_context(format!("cause: {}", source))
                .with_suggestion("Check that cargo is on PATH, or pass `--cargo <path>`"),
            RunError::InvocationFailed {
                command,
                flags,
                code,
                ..
            } => {
                let status = match code {
                    Some(code) => format!("exit status: {}", code),
                    None => "terminated by signal".to_string(),
                };
                Diagnostic::error(self.to_string())
                    .with_context(format!("command: {}", command))
                    .with_context(format!("RUSTFLAGS: {}", flags))
                    .with_context(status)
                    .with_context("remaining invocations were not started")
            }
        }
    }
}

/// Map any error surfaced by a command to a process exit status.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ConfigError>().is_some() {
        CONFIG_EXIT_CODE
    } else if let Some(run) = err.downcast_ref::<RunError>() {
        run.exit_code()
    } else {
        GENERIC_EXIT_CODE
    }
}
