//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// archtest - run the per-target test matrix for a SIMD intrinsics workspace
///
/// The target comes from `TARGET`; `RUSTFLAGS`, `NORUN` and `NOSTD` adjust
/// what gets run.
#[derive(Parser)]
#[command(name = "archtest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Program used in place of `cargo`
    #[arg(long, global = true, env = "ARCHTEST_CARGO", value_name = "PATH")]
    pub cargo: Option<PathBuf>,

    /// Configuration file (defaults to ./archtest.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Options shared by every subcommand.
    pub fn global_args(&self) -> GlobalArgs {
        GlobalArgs {
            cargo: self.cargo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub cargo: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every planned invocation, stopping at the first failure (default)
    Run,

    /// Print the planned invocations without running them
    Plan(PlanArgs),

    /// Print the composed RUSTFLAGS for the target
    Flags,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,
}
