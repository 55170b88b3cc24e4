//! Test utilities and mocks for archtest unit tests.
//!
//! This module is only compiled for tests. It provides a scripted
//! [`CommandRunner`] so plans can be executed without spawning cargo, and
//! helpers for building fake environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use archtest::test_support::{env_lookup, MockRunner};
//!
//! #[test]
//! fn test_example() {
//!     let env = RunEnvironment::resolve(env_lookup(&[("TARGET", "x86_64-unknown-linux-gnu")]))?;
//!     let mut runner = MockRunner::new().fail_at(2, ProcessStatus::from_code(101));
//!     // Execute a plan against the runner, then inspect runner.calls()...
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::io;

use crate::util::process::{CommandRunner, ProcessBuilder, ProcessStatus};

/// Build a variable lookup from fixed pairs, for `RunEnvironment::resolve`.
pub fn env_lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: BTreeMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

/// Scripted replacement for real process execution.
///
/// Every command succeeds unless scripted otherwise. Calls are numbered from
/// 1, in the order they are made.
#[derive(Debug, Default)]
pub struct MockRunner {
    outcomes: HashMap<usize, ProcessStatus>,
    spawn_errors: Vec<usize>,
    calls: Vec<ProcessBuilder>,
}

impl MockRunner {
    /// Create a runner where every command succeeds.
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Make the `call`-th command exit with `status`.
    pub fn fail_at(mut self, call: usize, status: ProcessStatus) -> Self {
        self.outcomes.insert(call, status);
        self
    }

    /// Make the `call`-th command fail to spawn.
    pub fn spawn_error_at(mut self, call: usize) -> Self {
        self.spawn_errors.push(call);
        self
    }

    /// Commands received so far.
    pub fn calls(&self) -> &[ProcessBuilder] {
        &self.calls
    }

    /// Display strings of the commands received so far.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.iter().map(ProcessBuilder::display_command).collect()
    }
}

impl CommandRunner for MockRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> io::Result<ProcessStatus> {
        self.calls.push(cmd.clone());
        let call = self.calls.len();

        if self.spawn_errors.contains(&call) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", cmd.get_program().display()),
            ));
        }

        Ok(self
            .outcomes
            .get(&call)
            .copied()
            .unwrap_or_else(|| ProcessStatus::from_code(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_scripts_outcomes() {
        let mut runner = MockRunner::new()
            .fail_at(2, ProcessStatus::from_code(7))
            .spawn_error_at(3);
        let cmd = ProcessBuilder::new("cargo").arg("test");

        assert!(runner.run(&cmd).unwrap().success());
        assert_eq!(runner.run(&cmd).unwrap().code(), Some(7));
        assert!(runner.run(&cmd).is_err());
        assert_eq!(runner.command_lines(), ["cargo test"; 3]);
    }

    #[test]
    fn test_env_lookup() {
        let lookup = env_lookup(&[("TARGET", "x86_64-unknown-linux-gnu")]);
        assert_eq!(lookup("TARGET").as_deref(), Some("x86_64-unknown-linux-gnu"));
        assert_eq!(lookup("NORUN"), None);
    }
}
