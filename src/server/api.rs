use crate::error::RelayError;
use crate::models::api::GenerateResponse;
use crate::relay::GameRelay;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::post,
    Router,
    extract::{ rejection::BytesRejection, State },
    Json,
};
use tower_http::cors::{Any, CorsLayer};
use log::{info, warn};

pub const GENERATE_ROUTE: &str = "/api/generate";

#[derive(Clone)]
struct AppState {
    relay: Arc<GameRelay>,
}

pub fn router(relay: Arc<GameRelay>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(GENERATE_ROUTE, post(generate_handler))
        .layer(cors)
        .with_state(AppState { relay })
}

pub async fn start_http_server(
    addr: SocketAddr,
    relay: Arc<GameRelay>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = router(relay);
    let listener = tokio::net::TcpListener::bind(addr).await
        .map_err(|e| format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e))?;
    info!("HTTP API listening on: http://{}{}", addr, GENERATE_ROUTE);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

// Raw bytes so schema failures map onto our own error kinds instead of axum's
// rejection. A body over the size limit is reported as `{error}` too.
async fn generate_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GenerateResponse>, RelayError> {
    state.relay.ensure_configured()?;
    let body = body.map_err(|e| {
        warn!("Rejected unreadable request body: {}", e);
        RelayError::UnreadableBody(e)
    })?;
    state.relay.handle(&body).await.map(Json)
}
