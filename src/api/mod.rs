pub mod auth;
pub mod contacts;
pub mod helpers;

use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::session_layer;
use crate::store::AppState;

/// Page routes. Every one of them runs with a session attached.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(contacts::router())
        .layer(from_fn_with_state(state.clone(), session_layer))
}

/// The whole application: probes, pages, and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", axum::routing::get(|| async { "ok" }))
        .merge(router(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
