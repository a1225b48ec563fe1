//! API routes for the Haven server.

pub mod incidents;
mod routes;
pub mod routing;

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}
