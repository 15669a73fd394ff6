use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatepass_api::{cli, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatepass_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::Cli::parse();

    let config = gatepass_store::Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    tracing::info!("Backend: {}", config.backend.base_url);

    let state = AppState::init(config).await?;

    if let Err(e) = cli::run(state, args).await {
        // A terminal 401 has already cleared the session; everything else
        // surfaces with the resolved message.
        match e.downcast_ref::<gatepass_api::ApiError>() {
            Some(gatepass_api::ApiError::SessionExpired) => {
                eprintln!("Session expired, please log in again: gatepass login");
            }
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }

    Ok(())
}
