use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use coin_twap::{
    app,
    cli::Cli,
    config::AppConfig,
    history::JsonFileStore,
    providers::coingecko::CoinGeckoProvider,
    report::ReportPublisher,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // stdout carries the result line; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    let provider = CoinGeckoProvider::from_config(&config.provider)
        .context("failed to set up the CoinGecko client")?;

    let publisher = ReportPublisher::new(config.files.template.clone(), config.files.report.clone());
    let store = JsonFileStore::new(config.files.history.clone(), publisher);

    let mut stdout = io::stdout().lock();
    let status = app::execute(&cli.to_request(), &provider, &store, &mut stdout).await?;

    Ok(ExitCode::from(status.exit_code()))
}
