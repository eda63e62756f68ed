use anyhow::{bail, Result};
use colored::Colorize;
use std::process::Command;

/// Build and flash one firmware binary through espflash.
pub fn run(bin: &str, release: bool) -> Result<()> {
    if bin != "panel" && bin != "beacon" {
        bail!("unknown binary '{bin}' (expected 'panel' or 'beacon')");
    }

    println!("{}", format!("Flashing '{bin}' via espflash...").bold());

    let mut cmd = Command::new("cargo");
    cmd.args([
        "espflash",
        "flash",
        "--monitor",
        "-p",
        "firmware",
        "--bin",
        bin,
        "--features",
        "hardware",
        "--target",
        "xtensa-esp32-none-elf",
    ]);
    if release {
        cmd.arg("--release");
    }

    let status = cmd.status()?;
    if !status.success() {
        bail!("espflash failed (cargo install cargo-espflash?)");
    }
    println!("{}", "Flash complete".green());
    Ok(())
}
