use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header::AUTHORIZATION, header::WWW_AUTHENTICATE, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::Error;
use crate::server::AppState;
use crate::server::response::ApiError;
use crate::types::{Capability, User};

/// Extractor for an authenticated caller: a valid bearer session token whose user still exists.
pub struct AuthUser {
    pub user: User,
    pub capabilities: Capability,
}

impl AuthUser {
    #[must_use]
    pub fn can(&self, required: Capability) -> bool {
        self.capabilities.has(required)
    }

    /// The single authorization check. Fails with 403 when the role lacks `required`.
    pub fn require(&self, required: Capability) -> Result<(), ApiError> {
        if self.can(required) {
            Ok(())
        } else {
            tracing::debug!(
                user = self.user.id,
                role = %self.user.role,
                required = %required,
                "capability check failed"
            );
            Err(ApiError::forbidden("You do not have access to this resource"))
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidToken,
    TokenExpired,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InvalidScheme => (StatusCode::UNAUTHORIZED, "Invalid authorization scheme"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let mut response = (status, Json(json!({ "message": message }))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer realm=\"snbp\""),
            );
        }

        response
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let raw_token = extract_bearer(auth_header)?;

        let claims = state.sessions.verify(raw_token).map_err(|e| match e {
            Error::TokenExpired => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        let user = state
            .store
            .get_user(claims.sub)
            .map_err(|e| {
                tracing::error!("Failed to load session user {}: {e}", claims.sub);
                AuthError::InternalError
            })?
            .ok_or(AuthError::InvalidToken)?;

        // Role comes from the stored account, not the token.
        let capabilities = Capability::for_role(user.role);
        Ok(AuthUser { user, capabilities })
    }
}

fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingAuth)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidScheme)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(token)
}
