use std::sync::Arc;

use indra_variants_mcp::{
    build_app, config::Config, indra_client::IndraClient, logging, mcp, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let provider = Arc::new(IndraClient::new(config.indra_api_url.clone()));
    let state = AppState::new(provider);

    match config.bind_socket()? {
        Some(bind_socket) => {
            let app = build_app(state);
            let listener = tokio::net::TcpListener::bind(bind_socket).await?;

            info!(
                bind_addr = %config.bind_addr,
                bind_port = config.port.unwrap_or_default(),
                "http server starting"
            );

            axum::serve(listener, app.into_make_service()).await?;
        }
        None => {
            info!("stdio server starting");
            mcp::stdio::run(state).await?;
        }
    }

    Ok(())
}
