use anyhow::{bail, Result};
use colored::Colorize;
use std::process::Command;

/// Run host tests. With neither flag, run everything.
pub fn run(unit: bool, integration: bool) -> Result<()> {
    let everything = unit == integration; // both flags or neither

    let mut cmd = Command::new("cargo");
    cmd.arg("test").arg("--workspace");
    if unit && !everything {
        cmd.arg("--lib");
    }
    if integration && !everything {
        cmd.arg("--tests");
    }

    println!("{}", "Running host tests...".bold());
    let status = cmd.status()?;
    if !status.success() {
        bail!("tests failed");
    }
    println!("{}", "Tests passed".green());
    Ok(())
}
