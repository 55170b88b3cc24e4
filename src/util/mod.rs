//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod env;
pub mod process;
pub mod shell;

pub use config::Config;
pub use diagnostic::Diagnostic;
pub use env::RunEnvironment;
pub use process::{CommandRunner, ProcessBuilder, ProcessStatus, SystemRunner};
pub use shell::Shell;
