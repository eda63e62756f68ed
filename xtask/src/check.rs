use anyhow::{bail, Result};
use colored::Colorize;
use std::process::Command;

const HOST_CRATES: &[&str] = &["platform", "bluetooth", "crypto", "ui", "firmware"];

/// Check host crates, then attempt the hardware firmware build.
pub fn run() -> Result<()> {
    println!("{}", "Checking host crates...".bold());
    let mut cmd = Command::new("cargo");
    cmd.arg("check");
    for krate in HOST_CRATES {
        cmd.arg("-p").arg(krate);
    }
    run_checked(cmd)?;

    println!("{}", "Checking hardware firmware (xtensa)...".bold());
    // The Xtensa toolchain comes from espup; skip gracefully when absent.
    let status = Command::new("cargo")
        .args([
            "check",
            "-p",
            "firmware",
            "--features",
            "hardware",
            "--target",
            "xtensa-esp32-none-elf",
        ])
        .status()?;
    if !status.success() {
        println!(
            "{}",
            "hardware check failed (is the espup Xtensa toolchain installed?)".yellow()
        );
    }

    println!("{}", "Check complete".green());
    Ok(())
}

fn run_checked(mut cmd: Command) -> Result<()> {
    let status = cmd.status()?;
    if !status.success() {
        bail!("command failed: {cmd:?}");
    }
    Ok(())
}
