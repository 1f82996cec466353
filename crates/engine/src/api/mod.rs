//! API layer - HTTP and WebSocket entry points.

pub mod auth;
pub mod error;
pub mod http;
pub mod sessions;
pub mod websocket;

use std::sync::Arc;

use crate::app::App;

pub use auth::Auth;
pub use error::ApiError;
pub use sessions::SessionRegistry;

/// Shared state for every route.
pub struct ApiState {
    pub app: Arc<App>,
    pub sessions: SessionRegistry,
}

impl ApiState {
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            sessions: SessionRegistry::new(),
        }
    }
}

/// Full router: REST routes plus the live roster socket.
pub fn router(state: Arc<ApiState>) -> axum::Router {
    http::routes()
        .route(
            "/ws/roster",
            axum::routing::get(websocket::roster_ws_handler),
        )
        .with_state(state)
}
