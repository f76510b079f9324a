use anyhow::{Context, Result};
use assistant_core::{AssistantConfig, Session, StdConsole, Storage, render};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
use cli::Cli;

fn main() -> Result<()> {
    // Parse CLI arguments first to get verbosity level
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the prompts
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())))
        .init();

    let mut config = AssistantConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    render::set_color_enabled(config.color);

    let storage = Storage::new(config.data_dir());
    info!("Using data directory {}", storage.root().display());

    let mut session =
        Session::new(storage, config, StdConsole::new()).context("Failed to load saved data")?;
    session.run().context("Failed to save data")
}
