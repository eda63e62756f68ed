use anyhow::{bail, Result};
use colored::Colorize;
use std::process::Command;

/// Build workspace documentation for the host crates.
pub fn run(open: bool) -> Result<()> {
    println!("{}", "Building documentation...".bold());

    let mut cmd = Command::new("cargo");
    cmd.args(["doc", "--workspace", "--no-deps"]);
    if open {
        cmd.arg("--open");
    }

    let status = cmd.status()?;
    if !status.success() {
        bail!("cargo doc failed");
    }
    println!("{}", "Documentation built".green());
    Ok(())
}
