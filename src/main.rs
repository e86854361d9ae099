use log::{LevelFilter, debug, error, info};
use offbeat::config::ServerConfig;
use offbeat::server::{self, AppState};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Logging Setup ---
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info) // Default level
        .init();

    info!("offbeat starting...");

    let config = ServerConfig::from_env();
    if let Some(app_id) = &config.identity_app_id {
        debug!("Identity provider app: {}", app_id);
    }
    if config.signer_api_key.is_none() || config.rpc_url.is_none() || config.games_contract.is_none()
    {
        info!("Chain settings incomplete; on-chain submissions will fail per-request.");
    }

    let state = AppState::new(config);
    if let Err(e) = server::run(state).await {
        error!("Server exited with error: {}", e);
        return Err(e);
    }

    info!("Server exited gracefully.");
    Ok(())
}
