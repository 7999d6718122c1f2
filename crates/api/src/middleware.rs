use axum::{
    extract::State,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use base64::Engine;

use usersroles_auth::{AccessOutcome, AuthOutcome, Role, SharedIdentityStore, authenticate, authorize};

use crate::app::errors::denied_response;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AccessState {
    pub store: SharedIdentityStore,
    /// Role the guarded routes require.
    pub required_role: Role,
}

/// Basic-Auth gate: authenticate, check the required role, then run the route.
///
/// Every request is evaluated against the snapshot active when it arrived.
pub async fn basic_auth_middleware(
    State(state): State<AccessState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let snapshot = state.store.snapshot();
    let challenge_realm = if snapshot.realm().is_default() {
        state.store.config().domain_name.clone()
    } else {
        snapshot.realm().to_string()
    };

    let Some((principal, password)) = extract_basic(req.headers()) else {
        return denied_response(AccessOutcome::Unauthorized, &challenge_realm);
    };

    let outcome = authenticate(&snapshot, &principal, &password);
    match authorize(&outcome, &state.required_role) {
        AccessOutcome::Granted => {
            if let AuthOutcome::Authenticated { principal, roles } = outcome {
                req.extensions_mut()
                    .insert(PrincipalContext::new(principal, roles));
            }
            next.run(req).await
        }
        denied => denied_response(denied, &challenge_realm),
    }
}

/// Extract `(principal, password)` from an `Authorization: Basic ...` header.
fn extract_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (principal, password) = decoded.split_once(':')?;

    Some((principal.to_string(), password.to_string()))
}
