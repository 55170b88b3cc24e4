//! Planned units of work.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::flags::FlagSet;
use crate::core::package::Package;

/// How cargo is driven for an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// `cargo test`: build and run the test harness.
    Test,
    /// `cargo build`: compile only.
    Build,
    /// `cargo test --no-run`: compile the test harness without running it.
    CompileTests,
    /// `cargo run`: build and execute a binary.
    Run,
}

impl Mode {
    /// The cargo subcommand for this mode.
    pub fn subcommand(&self) -> &'static str {
        match self {
            Mode::Test | Mode::CompileTests => "test",
            Mode::Build => "build",
            Mode::Run => "run",
        }
    }

    /// Arguments the mode itself contributes after the invocation's own.
    pub fn mode_args(&self) -> &'static [&'static str] {
        match self {
            Mode::CompileTests => &["--no-run"],
            _ => &[],
        }
    }

    /// Whether the invocation cross-compiles for the run's target.
    ///
    /// `cargo run` executes on the host, so it never takes `--target`.
    pub fn takes_target(&self) -> bool {
        !matches!(self, Mode::Run)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Test => "test",
            Mode::Build => "build",
            Mode::CompileTests => "test --no-run",
            Mode::Run => "run",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single planned cargo invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Package to build or test
    pub package: Package,

    /// Cargo mode
    pub mode: Mode,

    /// Extra cargo arguments (`--release`, `--features=...`)
    pub args: Vec<String>,

    /// Arguments for the test harness, passed after `--`
    pub harness_args: Vec<String>,

    /// Flags appended to the run's flag set for this invocation only
    pub extra_flags: FlagSet,

    /// Environment layered over the inherited environment
    pub env: BTreeMap<String, String>,

    /// Text fed to the child's stdin
    pub stdin: Option<String>,

    /// Run from inside the package directory instead of via `--manifest-path`
    pub in_package_dir: bool,
}

impl Invocation {
    /// Create a new invocation with no extras.
    pub fn new(package: Package, mode: Mode) -> Self {
        Invocation {
            package,
            mode,
            args: Vec::new(),
            harness_args: Vec::new(),
            extra_flags: FlagSet::new(),
            env: BTreeMap::new(),
            stdin: None,
            in_package_dir: false,
        }
    }

    /// Add a single cargo argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple cargo arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add a test harness argument.
    pub fn harness_arg(mut self, arg: impl Into<String>) -> Self {
        self.harness_args.push(arg.into());
        self
    }

    /// Append scoped flags, whitespace separated.
    pub fn flags(mut self, flags: &str) -> Self {
        self.extra_flags.append_str(flags);
        self
    }

    /// Set a scoped environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Feed text to the child's stdin.
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Run from inside the package directory.
    pub fn in_package_dir(mut self) -> Self {
        self.in_package_dir = true;
        self
    }

    /// Whether this is a release-profile invocation.
    pub fn is_release(&self) -> bool {
        self.args.iter().any(|a| a == "--release")
    }

    /// Short human-readable identity, e.g. `secondary (test --release)`.
    pub fn describe(&self) -> String {
        let mut parts = vec![self.mode.to_string()];
        parts.extend(self.args.iter().cloned());
        format!("{} ({})", self.package, parts.join(" "))
    }
}
