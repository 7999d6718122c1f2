use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use usersroles_auth::AccessOutcome;

/// Response for a request the access gate turned away.
///
/// The body names only the status; which check failed is never exposed.
/// Unauthorized responses carry a Basic challenge for `realm`.
pub fn denied_response(outcome: AccessOutcome, realm: &str) -> Response {
    let status = StatusCode::from_u16(outcome.status_code()).unwrap_or(StatusCode::UNAUTHORIZED);
    let (code, message) = match outcome {
        AccessOutcome::Forbidden => ("forbidden", "access denied"),
        _ => ("unauthorized", "authentication required"),
    };

    let mut response = json_error(status, code, message);
    if status == StatusCode::UNAUTHORIZED {
        let challenge = format!("Basic realm=\"{}\"", realm.replace('"', ""));
        if let Ok(value) = HeaderValue::from_str(&challenge) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, value);
        }
    }
    response
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_has_no_challenge() {
        let response = denied_response(AccessOutcome::Forbidden, "realm");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn unauthorized_carries_basic_challenge() {
        let response = denied_response(AccessOutcome::Unauthorized, "realm");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"realm\""
        );
    }
}
