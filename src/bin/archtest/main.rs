//! archtest CLI - runs the per-target test matrix

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use archtest::core::error::{exit_code, ConfigError, RunError};
use archtest::util::diagnostic::emit;
use archtest::util::Shell;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let shell = Shell::from_flags(cli.verbose, cli.no_color);

    if let Err(e) = run(cli, &shell) {
        report(&e, &shell);
        std::process::exit(exit_code(&e));
    }
}

fn run(cli: Cli, shell: &Shell) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("archtest=debug")
    } else {
        EnvFilter::new("archtest=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global = cli.global_args();
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::execute(&global, shell),
        Commands::Plan(args) => commands::plan::execute(args, &global, shell),
        Commands::Flags => commands::flags::execute(&global),
    }
}

fn report(err: &anyhow::Error, shell: &Shell) {
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        emit(&e.to_diagnostic(), shell.use_color());
    } else if let Some(e) = err.downcast_ref::<RunError>() {
        emit(&e.to_diagnostic(), shell.use_color());
    } else {
        shell.error(format!("{:#}", err));
    }
}
