use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{anyhow, Result};
use argh::FromArgs;
use tracing::error;
use tracing_subscriber::EnvFilter;

use sentisage::{api, config, fetch};

#[derive(Debug, FromArgs, PartialEq)]
#[argh(description="SentiSage serves a pre-trained sentiment model over HTTP")]
struct SentiSageCLI {
    #[argh(subcommand)]
    nested: SentiSageSubCommands
}

#[derive(Debug, FromArgs, PartialEq)]
#[argh(subcommand)]
enum SentiSageSubCommands {
    Serve(Serve),
    Fetch(Fetch)
}

#[derive(Debug, FromArgs, PartialEq)]
#[argh(subcommand, name="serve", description="Load the model artefact and serve predictions")]
struct Serve {
    #[argh(option, short='c', description="config file path")]
    config: Option<PathBuf>,
}

#[derive(Debug, FromArgs, PartialEq)]
#[argh(subcommand, name="fetch", description="Download the model artefact to the configured model path")]
struct Fetch {
    #[argh(option, short='c', description="config file path")]
    config: Option<PathBuf>,

    #[argh(option, short='u', description="artefact url, overrides model_url from the config")]
    url: Option<String>,
}

#[::tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cmd : SentiSageCLI = argh::from_env();

    let outcome = match cmd.nested {
        SentiSageSubCommands::Serve(serve) => process_serve(&serve).await,
        SentiSageSubCommands::Fetch(fetch) => process_fetch(&fetch).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn process_serve(serve_params: &Serve) -> Result<()> {
    let config = config::load_config(serve_params.config.as_deref())?;
    api::serve(&config).await
}

async fn process_fetch(fetch_params: &Fetch) -> Result<()> {
    let config = config::load_config(fetch_params.config.as_deref())?;
    let url = fetch_params
        .url
        .as_deref()
        .or(config.model_url.as_deref())
        .ok_or_else(|| anyhow!("No artefact URL: pass --url or set model_url in the config"))?;
    let timeout = Duration::from_secs(config.fetch_timeout_secs);
    fetch::fetch_model(url, &config.model_path, timeout).await?;
    Ok(())
}
