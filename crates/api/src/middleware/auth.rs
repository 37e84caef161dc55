//! Bearer-token authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tasknest_core::error::CoreError;

use crate::auth::service;
use crate::error::AppError;
use crate::state::AppState;

/// Pull the raw bearer token out of the request headers.
///
/// Distinguishes a missing/malformed header from a `Bearer` scheme with an
/// empty token; the logout handler reuses this to find the token to revoke.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, CoreError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(CoreError::Unauthorized {
            name: "Unauthorized",
            message: "Missing or invalid Authorization header",
        })?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(CoreError::Unauthorized {
            name: "Unauthorized",
            message: "Missing or invalid Authorization header",
        })?;

    if token.is_empty() {
        return Err(CoreError::Unauthorized {
            name: "Unauthorized",
            message: "Unauthorized access token",
        });
    }

    Ok(token)
}

/// Reject requests without a valid, unrevoked bearer token.
///
/// Applied to the resource routers; the `/auth` and system routes stay
/// public.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let claims = service::verify_token(&state.revocation, &state.config.jwt, token).await?;
    tracing::debug!(user_id = %claims.sub, role = ?claims.role, "Request authenticated");

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert_matches!(
            err,
            CoreError::Unauthorized {
                message: "Missing or invalid Authorization header",
                ..
            }
        );
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let err = bearer_token(&headers_with("Basic dXNlcjpwYXNz")).unwrap_err();
        assert_matches!(
            err,
            CoreError::Unauthorized {
                message: "Missing or invalid Authorization header",
                ..
            }
        );
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = bearer_token(&headers_with("Bearer ")).unwrap_err();
        assert_matches!(
            err,
            CoreError::Unauthorized {
                message: "Unauthorized access token",
                ..
            }
        );
    }

    #[test]
    fn bearer_token_is_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        let token = bearer_token(&headers).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }
}
