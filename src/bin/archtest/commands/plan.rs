//! `archtest plan` command

use anyhow::Result;

use crate::cli::{GlobalArgs, PlanArgs};
use archtest::ops::PlanReport;
use archtest::util::Shell;

pub fn execute(args: PlanArgs, global: &GlobalArgs, shell: &Shell) -> Result<()> {
    let run = super::prepare(global)?;
    let report = PlanReport::new(&run, shell);

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.format());
    }

    Ok(())
}
