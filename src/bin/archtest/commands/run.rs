//! `archtest run` command

use anyhow::Result;

use crate::cli::GlobalArgs;
use archtest::util::process::resolve_program;
use archtest::util::shell::{format_duration, Status};
use archtest::util::{Shell, SystemRunner};

pub fn execute(global: &GlobalArgs, shell: &Shell) -> Result<()> {
    let mut run = super::prepare(global)?;

    let cargo = resolve_program(&run.cargo());
    tracing::debug!("using {}", cargo.display());
    run.config = run.config.with_cargo(Some(cargo));

    shell.note(format!(
        "{} invocation(s) planned for {}",
        run.plan.len(),
        run.env.target
    ));

    let report = run.run(shell, &mut SystemRunner)?;
    shell.status(
        Status::Finished,
        format!(
            "{} invocation(s) in {}",
            report.completed,
            format_duration(report.elapsed)
        ),
    );
    Ok(())
}
