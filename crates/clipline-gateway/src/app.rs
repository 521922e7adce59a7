use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::ws::ws_handler;
use clipline_core::ArchiveCache;

pub struct App {}

impl App {
    pub fn router<C: ArchiveCache>(state: AppState<C>) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/v1/ws", get(ws_handler::<C>))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

async fn health_handler() -> &'static str {
    "ok"
}
