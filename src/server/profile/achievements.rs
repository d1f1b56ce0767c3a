use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::{ensure_profile, find_profile};
use crate::auth::AuthUser;
use crate::server::AppState;
use crate::server::dto::{AchievementRequest, EmailQuery};
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::scope::{Access, resolve_student};
use crate::server::validation::{optional_text, required};
use crate::types::Capability;

pub async fn create_achievement(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AchievementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(
        state.store.as_ref(),
        &auth,
        req.email.as_deref(),
        Access::Write(Capability::MANAGE_OWN_PROFILE),
    )?;
    let nama = required(req.nama, "nama")?;
    let tingkat = optional_text(req.tingkat);
    let tahun = req.tahun.filter(|t| *t > 0);

    let profile = ensure_profile(state.store.as_ref(), &user)?;
    let achievement = state
        .store
        .create_achievement(profile.id, &nama, tingkat.as_deref(), tahun)
        .api_err("Failed to create achievement")?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(achievement, "Achievement saved")),
    ))
}

pub async fn list_achievements(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(
        state.store.as_ref(),
        &auth,
        query.email.as_deref(),
        Access::Read(Capability::MANAGE_OWN_PROFILE),
    )?;
    let achievements = match find_profile(state.store.as_ref(), &user)? {
        Some(profile) => state
            .store
            .list_achievements(profile.id)
            .api_err("Failed to list achievements")?,
        None => Vec::new(),
    };
    Ok(Json(ApiResponse::success(achievements)))
}
