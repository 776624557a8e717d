//! HCX CLI - Command line tool for climate analyses against the HimClimX service.

use anyhow::Context;
use clap::Parser;
use hcx_cmd::config::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hcx-cli",
    version,
    about = "HimClimX climate analytics toolkit"
)]
struct Cli {
    /// Settings file (defaults to hcx.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Analytics service base URL, overriding settings and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds, 0 for none
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: hcx_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        log::debug!("No .env file loaded: {}", e);
    }
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(url) = cli.api_url {
        settings.api.base_url = url;
    }
    if let Some(timeout) = cli.timeout_secs {
        settings.api.timeout_secs = timeout;
    }
    settings.validate()?;

    hcx_cmd::run(cli.command, settings).await
}
