// Desktop/tooling crate — unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod doc;
mod flash;
mod test;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "BLE Message Panel development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the workspace: host crates, then the hardware firmware if the
    /// Xtensa toolchain is installed
    Check,
    /// Run all host tests
    Test {
        /// Run only unit tests (lib targets)
        #[arg(long)]
        unit: bool,
        /// Run only integration tests (tests/ targets)
        #[arg(long)]
        integration: bool,
    },
    /// Build and flash a firmware binary via espflash
    Flash {
        /// Binary to flash: panel (default) or beacon
        #[arg(long, default_value = "panel")]
        bin: String,
        /// Build and flash the release profile
        #[arg(short, long)]
        release: bool,
    },
    /// Build and optionally open documentation
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Flash { bin, release } => flash::run(&bin, release),
        Commands::Doc { open } => doc::run(open),
    }
}
