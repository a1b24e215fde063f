//! CLI binary: builds the project described by `PATH/build.bbs`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bbs",
    version,
    about = "Builds the project described by PATH/build.bbs"
)]
struct Cli {
    /// Directory containing the top-level build spec
    path: PathBuf,

    /// Enable debug output (compiler command lines, skip decisions)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .init();

    let mut driver = bbs::Driver::new();
    if let Err(err) = driver.process(&cli.path) {
        tracing::error!("{err}");
        return ExitCode::FAILURE;
    }
    if let Err(err) = driver.build() {
        tracing::error!("{err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
