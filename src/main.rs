//! CLI entry point for tile map generation

use clap::Parser;
use tilecore::io::cli::{Cli, Generator};
use tracing_subscriber::EnvFilter;

fn main() -> tilecore::Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let generator = Generator::new(cli);
    generator.process().map(|_| ())
}
