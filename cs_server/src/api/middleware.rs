//! Guard middleware: credential decoding plus the capability check.
//!
//! The guard never rejects a request just for lacking a credential. It
//! decodes the bearer token into a [`Principal`] when one is present and
//! valid, looks the request up in the capability map by its matched route,
//! and only refuses the call when that operation's requirement is not met.
//! Everything else flows through unauthenticated.

use axum::{
    Json,
    extract::{MatchedPath, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use courtside::auth::{AccessDenied, Operation, authorize};

use super::AppState;
use super::error::ErrorBody;

/// Decode the credential, consult the capability map, and either refuse the
/// request or attach the principal and continue.
pub async fn guard_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let principal =
        bearer_token(request.headers()).and_then(|token| state.auth.verify_token(token));

    let operation = request
        .extensions()
        .get::<MatchedPath>()
        .and_then(|path| Operation::from_route(request.method().as_str(), path.as_str()));

    if let Some(operation) = operation {
        if let Err(denied) = authorize(operation.access(), principal.as_ref()) {
            let (status, message) = match denied {
                AccessDenied::Unauthenticated => {
                    (StatusCode::UNAUTHORIZED, "Authentication required")
                }
                AccessDenied::Forbidden => (StatusCode::FORBIDDEN, "Insufficient permissions"),
            };
            tracing::debug!(
                operation = ?operation,
                status = %status,
                "request refused by capability map"
            );
            return (
                status,
                Json(ErrorBody {
                    message: message.to_string(),
                }),
            )
                .into_response();
        }
    }

    if let Some(principal) = principal {
        request.extensions_mut().insert(principal);
    }

    next.run(request).await
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);
    }
}
