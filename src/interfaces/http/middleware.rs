//! Authentication middleware for Axum
//!
//! Verifies the bearer token and stores the caller identity in request
//! extensions. Token issuance happens outside this service.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::common::ApiError;
use crate::application::Actor;
use crate::domain::MemberRole;
use crate::infrastructure::crypto::jwt::{verify_token, Claims, JwtConfig};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

/// Authentication state containing the verification config
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Verified caller, available to handlers as `Extension<AuthenticatedMember>`.
#[derive(Clone, Debug)]
pub struct AuthenticatedMember {
    pub member_id: String,
    pub role: MemberRole,
}

impl AuthenticatedMember {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            member_id: claims.sub,
            role: claims.role,
        }
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.member_id.clone(), self.role)
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            let member = AuthenticatedMember::from_claims(claims);
            debug!(member_id = %member.member_id, role = %member.role, "Authenticated");
            request.extensions_mut().insert(member);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            auth_error_response(AuthError::InvalidToken)
        }
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let message = match error {
        AuthError::MissingToken => "Missing authentication token",
        AuthError::InvalidToken => "Invalid or expired authentication token",
    };
    ApiError::unauthorized(message).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::crypto::jwt::create_token;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test".into(),
            expiration_hours: 1,
            issuer: "court-booking".into(),
        }
    }

    async fn whoami(Extension(member): Extension<AuthenticatedMember>) -> String {
        format!("{}:{}", member.member_id, member.role)
    }

    fn app() -> Router {
        Router::new()
            .route("/me", get(whoami))
            .layer(middleware::from_fn_with_state(
                AuthState { jwt_config: jwt() },
                auth_middleware,
            ))
    }

    async fn call(auth: Option<String>) -> (StatusCode, String) {
        let mut req = Request::builder().uri("/me");
        if let Some(value) = auth {
            req = req.header(header::AUTHORIZATION, value);
        }
        let resp = app().oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_token_exposes_identity() {
        let token = create_token("m-7", MemberRole::Coach, &jwt()).unwrap();
        let (status, body) = call(Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "m-7:coach");
    }

    #[tokio::test]
    async fn missing_or_bad_token_is_401() {
        assert_eq!(call(None).await.0, StatusCode::UNAUTHORIZED);
        assert_eq!(call(Some("Bearer nope".into())).await.0, StatusCode::UNAUTHORIZED);
        assert_eq!(call(Some("Basic abc".into())).await.0, StatusCode::UNAUTHORIZED);

        let (_, body) = call(None).await;
        assert!(body.contains("UNAUTHORIZED"));
    }
}
