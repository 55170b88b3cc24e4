//! `archtest flags` command

use anyhow::Result;

use crate::cli::GlobalArgs;

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let run = super::prepare(global)?;
    println!("{}", run.flags);
    Ok(())
}
