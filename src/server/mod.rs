pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::services::{SymbolTable, YahooClient};

/// Application state shared across all handlers. The symbol table is built
/// once at startup and never mutated; the client is cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    pub symbols: Arc<SymbolTable>,
    pub client: YahooClient,
}

/// Build the API router with all routes and the CORS layer attached.
pub fn build_router(state: AppState) -> Router {
    // The facade serves a browser frontend; allow any origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/api/stock/{symbol}", get(api::get_stock_handler))
        .route("/api/stocks/trending", get(api::get_trending_handler))
        .route("/api/stocks/all", get(api::get_all_stocks_handler))
        .route("/api/indices", get(api::get_indices_handler))
        .route("/api/stock/history/{symbol}", get(api::get_history_handler))
        .route("/api/stock/chart/{symbol}", get(api::get_chart_handler))
        .route("/api/search", get(api::search_handler))
        .route("/api/portfolio/calculate", post(api::calculate_portfolio_handler))
        .route("/api/mutual-funds", get(api::get_mutual_funds_handler))
        .route("/api/health", get(api::health_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the axum server.
pub async fn serve(
    symbols: Arc<SymbolTable>,
    client: YahooClient,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting marketfacade server");
    tracing::info!("Registering routes:");
    tracing::info!("  GET  /api/stock/{{symbol}}");
    tracing::info!("  GET  /api/stocks/trending");
    tracing::info!("  GET  /api/stocks/all?limit=20&offset=0");
    tracing::info!("  GET  /api/indices");
    tracing::info!("  GET  /api/stock/history/{{symbol}}?period=1mo&interval=1d");
    tracing::info!("  GET  /api/stock/chart/{{symbol}}?period=1mo");
    tracing::info!("  GET  /api/search?q=TCS");
    tracing::info!("  POST /api/portfolio/calculate");
    tracing::info!("  GET  /api/mutual-funds");
    tracing::info!("  GET  /api/health");

    let app = build_router(AppState { symbols, client });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
