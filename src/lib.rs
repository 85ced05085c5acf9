pub mod auth;
pub mod config;
pub mod listings;
pub mod models;
pub mod store;
pub mod utils;

use axum::Router;
use axum_login::{
    AuthManagerLayerBuilder,
    tower_sessions::{MemoryStore, SessionManagerLayer},
};
use tower_http::trace::TraceLayer;

use crate::models::Backend;
pub use utils::Error;

/// Builds the full application router: session layer, auth layer, and the
/// auth + listings routes. Sessions live server-side in memory under random
/// ids, so they do not survive a restart.
pub fn create_router(backend: Backend) -> Router {
    let session_store = MemoryStore::default();
    // Served over plain http on localhost, so no secure-cookie flag.
    let session_manager_layer = SessionManagerLayer::new(session_store).with_secure(false);
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_manager_layer).build();

    Router::new()
        .merge(crate::auth::web::router())
        .merge(crate::listings::web::router())
        .layer(auth_layer)
        .layer(TraceLayer::new_for_http())
}
