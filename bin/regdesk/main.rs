//! Registration desk CLI
//!
//! Sign in, fill the registration form, confirm, and post it to the sheet.

mod wizard;

use anyhow::{Context, Result};
use clap::Parser;
use regdesk::{AppConfig, Session};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "regdesk")]
#[command(about = "Registration desk - sign in and submit registrations to a sheet")]
struct Args {
    /// Config file (defaults to ./regdesk.toml when present)
    #[arg(short, long, env = "REGDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Sheet API endpoint, overrides the config file
    #[arg(long, env = "REGDESK_ENDPOINT")]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not mix with the prompts
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("regdesk=warn".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load_or_default(args.config.as_deref())
        .context("Could not load configuration")?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = Some(endpoint);
    }
    debug!("Endpoint: {:?}", config.endpoint);

    let mut session = Session::from_config(&config);
    wizard::run(&mut session).await
}
