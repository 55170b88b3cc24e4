//! Status line output for the terminal.
//!
//! Every user-facing progress line goes through [`Shell`] so formatting stays
//! consistent: a right-aligned, optionally colored status word followed by the
//! message, written to stderr.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::time::Duration;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Default: status messages only
    #[default]
    Normal,
    /// --verbose: also print the full command line of every invocation
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success (green)
    Finished,

    // In-progress (cyan)
    Running,

    // Info (blue)
    Info,

    // Warning (yellow)
    Skipped,

    // Error (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Running => "Running",
            Status::Info => "Info",
            Status::Skipped => "Skipped",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished => "\x1b[1;32m",
            Status::Running => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Skipped => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }
}

/// Width the status word is right-aligned to.
const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug, Clone)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
        }
    }

    /// Create a shell from CLI flags.
    pub fn from_flags(verbose: bool, no_color: bool) -> Self {
        let verbosity = if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        let color = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Shell::new(verbosity, color)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`
    pub fn status(&self, status: Status, msg: impl Display) {
        eprintln!("{}", self.format_line(status, msg));
    }

    /// Print an info message.
    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: impl Display) {
        self.status(Status::Error, msg);
    }

    /// Print a message only in verbose mode, indented under the status column.
    pub fn verbose(&self, msg: impl Display) {
        if self.is_verbose() {
            eprintln!("{:width$} {}", "", msg, width = STATUS_WIDTH);
        }
    }

    /// Format a full status line.
    pub fn format_line(&self, status: Status, msg: impl Display) -> String {
        let text = status.as_str();
        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m {}",
                status.color_code(),
                text,
                msg,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$} {}", text, msg, width = STATUS_WIDTH)
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

/// Format a duration for human output.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
