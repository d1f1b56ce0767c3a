use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use crate::auth::{PasswordHasher, validate_password};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{CredentialsRequest, LoginResponse, RegisterResponse, UserSummary};
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, StoreResultExt};
use crate::server::validation::{normalize_email, validate_email};
use crate::types::Role;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

fn credentials(req: CredentialsRequest) -> Result<(String, String), ApiError> {
    let email = req.email.as_deref().map(normalize_email).unwrap_or_default();
    let password = req.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }
    Ok((email, password))
}

/// Self-registration always creates a SISWA account.
async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (email, password) = credentials(req)?;
    validate_email(&email)?;
    validate_password(&password).map_err(ApiError::bad_request)?;

    let hash = PasswordHasher::new()
        .hash(&password)
        .api_err("Failed to hash password")?;

    let user = match state.store.create_user(&email, &hash, Role::Siswa) {
        Ok(user) => user,
        Err(Error::AlreadyExists) => {
            return Err(ApiError::conflict(
                "Email is already registered. Sign in or use another email.",
            ));
        }
        Err(e) => {
            tracing::error!("Failed to create user {email}: {e}");
            return Err(ApiError::internal("Failed to create user"));
        }
    };

    tracing::info!(user = user.id, "registered student account");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful",
            user: UserSummary::from(&user),
        }),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (email, password) = credentials(req)?;

    let user = state
        .store
        .get_user_by_email(&email)
        .api_err("Failed to get user")?
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    let matches = PasswordHasher::new()
        .verify(&password, &user.password_hash)
        .api_err("Failed to verify password")?;
    if !matches {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.sessions.issue(&user).api_err("Failed to issue token")?;

    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
        expires_in: state.sessions.ttl().num_seconds(),
        user: UserSummary::from(&user),
    }))
}
