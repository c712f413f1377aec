use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;
use docblock::{Engine, Settings};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries only the command output
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    debug!("Starting docblock v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load_or_default(cli.config.as_deref())?;
    let engine = Engine::new(settings)?;

    cli.execute(engine)
}
