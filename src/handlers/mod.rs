//! HTTP handlers for the web front end.
//!
//! ```text
//! Browser ──▶ Axum Router ──▶ scrape handlers ──▶ run_mode(Session)
//!                  │                                  │
//!                  ▼                                  ▼
//!           /health, /status                HTML table / attachment / JSON
//! ```

pub mod scrape;
pub mod status;

pub use scrape::{api_handler, index_handler, render_index, submit_handler};
pub use status::{health_handler, status_handler, status_router, AppState};

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Full application router.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/api/:mode", get(api_handler))
        .merge(status_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
