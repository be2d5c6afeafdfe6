use std::net::SocketAddr;

use anyhow::Result;
use log::info;

use intervue::config::Config;
use intervue::server::{build_router, AppState, GroqClient};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env()?;

    let state = AppState {
        groq: GroqClient::new(config.groq_api_key.clone()),
    };
    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("🚀 collaborator endpoints listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
