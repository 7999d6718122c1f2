use axum::{Extension, Json, http::StatusCode, response::IntoResponse};

use crate::context::PrincipalContext;

/// Path of the role-protected resource.
pub const SECURED_PATH: &str = "/secured";

/// Body returned by the protected resource.
pub const RESPONSE_BODY: &str = "GOOD";

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn secured() -> &'static str {
    RESPONSE_BODY
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "principal": principal.principal().as_str(),
        "roles": principal.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
}
