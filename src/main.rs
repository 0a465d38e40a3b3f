use anyhow::Result;
use clap::Parser;
use finboard::cli::Cli;
use finboard::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level(&config)))
        .init();

    match &config.source {
        Some(path) => log::debug!("Loaded config from {}", path.display()),
        None => log::debug!("No config at {}, using defaults", cli.config.display()),
    }

    cli.run(config).await
}
