mod model;
mod server;

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::server::{
    config::Config, error::AppError, gateway::RazorpayGateway, router, scheduler::payment_expiry,
    startup, state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client()?;
    let cors = startup::cors_layer(&config)?;

    let gateway = Arc::new(RazorpayGateway::new(
        http_client,
        &config.razorpay_api_url,
        &config.razorpay_key_id,
        &config.razorpay_key_secret,
    ));

    // Keep the scheduler handle alive for the lifetime of the server
    let _scheduler = payment_expiry::start_scheduler(db.clone(), config.payment_expiry).await?;

    let state = AppState::new(
        db,
        &config.jwt_secret,
        gateway,
        &config.razorpay_key_id,
        &config.razorpay_key_secret,
    );

    let app = router::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("Starting server on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }

    tracing::info!("Shutting down");
}
