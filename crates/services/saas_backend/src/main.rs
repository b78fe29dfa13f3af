// File: services/saas_backend/src/main.rs
use saas_backend::app::{build_app, stripe_connect_from_config};
use saas_common::config_error;
use saas_config::{ensure_dotenv_loaded, load_config};
use std::error::Error;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // RUST_LOG may come from the dotenv file
    ensure_dotenv_loaded();
    saas_common::logging::init();

    let config = load_config().map_err(config_error)?;
    let connect = stripe_connect_from_config(&config)?;
    let app = build_app(connect.as_ref());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    if let Some(connect) = &connect {
        info!("Stripe Connect settings page at http://{}{}", addr, connect.index_path());
    }

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
