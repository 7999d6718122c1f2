//! HTTP application wiring (Axum router + access gate).
//!
//! - `routes/`: protected handlers
//! - `errors.rs`: access-denied and error responses

use axum::{Router, routing::get};

use usersroles_auth::{Role, SharedIdentityStore};

use crate::middleware::{self, AccessState};

pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(store: SharedIdentityStore, required_role: Role) -> Router {
    let access = AccessState {
        store,
        required_role,
    };

    // Protected routes: require Basic auth and the configured role.
    let protected = routes::router().route_layer(axum::middleware::from_fn_with_state(
        access,
        middleware::basic_auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
