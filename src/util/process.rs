//! Subprocess execution utilities.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Builder for subprocess execution.
///
/// Children inherit the parent's environment, stdout and stderr; variables
/// set here are layered on top of the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
    stdin: Option<Vec<u8>>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
            stdin: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Set stdin data.
    pub fn stdin(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(data.into());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the environment overrides.
    pub fn get_env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Get the stdin data, if any.
    pub fn get_stdin(&self) -> Option<&[u8]> {
        self.stdin.as_deref()
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Spawn the command with inherited output and wait for it to exit.
    pub fn status(&self) -> io::Result<ProcessStatus> {
        let mut cmd = self.build_command();

        let Some(ref stdin_data) = self.stdin else {
            return cmd.status().map(ProcessStatus::from);
        };

        cmd.stdin(Stdio::piped());
        let mut child = cmd.spawn()?;

        if let Some(stdin) = child.stdin.take() {
            if let Err(e) = write_input(stdin, stdin_data) {
                // Don't leave the child running behind an aborted run.
                let _ = child.wait();
                return Err(e);
            }
        }

        child.wait().map(ProcessStatus::from)
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Write a child's input and close the pipe.
///
/// A child that exits without reading its input is judged by its exit
/// status alone, so a broken pipe is not an error.
fn write_input(mut stdin: impl Write, data: &[u8]) -> io::Result<()> {
    match stdin.write_all(data) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

/// Exit outcome of a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    code: Option<i32>,
}

impl ProcessStatus {
    /// A process that exited with the given code.
    pub fn from_code(code: i32) -> Self {
        ProcessStatus { code: Some(code) }
    }

    /// A process that was terminated by a signal.
    pub fn signaled() -> Self {
        ProcessStatus { code: None }
    }

    /// The exit code, or `None` if the process was killed by a signal.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ProcessStatus {
    fn from(status: ExitStatus) -> Self {
        ProcessStatus {
            code: status.code(),
        }
    }
}

/// Something that can run a process to completion.
///
/// The executor only ever talks to this trait, so tests can script exit
/// statuses without spawning anything.
pub trait CommandRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> io::Result<ProcessStatus>;
}

/// Runs commands as real child processes, one at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> io::Result<ProcessStatus> {
        cmd.status()
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Resolve the program used to drive builds.
///
/// A name found in PATH is returned as an absolute path; anything else is
/// returned unchanged so spawn errors mention what the user asked for.
pub fn resolve_program(program: &Path) -> PathBuf {
    program
        .to_str()
        .and_then(find_executable)
        .unwrap_or_else(|| program.to_path_buf())
}
