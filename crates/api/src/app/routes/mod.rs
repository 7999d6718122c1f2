use axum::{Router, routing::get};

pub mod system;

/// Routes guarded by the Basic-Auth access gate.
pub fn router() -> Router {
    Router::new()
        .route(system::SECURED_PATH, get(system::secured))
        .route("/whoami", get(system::whoami))
}
