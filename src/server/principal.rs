use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, patch, post},
};

use crate::auth::AuthUser;
use crate::server::AppState;
use crate::server::dto::{PrincipalDecisionRequest, StatusRequest};
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::scope::{registration_view, registration_views};
use crate::server::students::{review_eligibility, student_rows};
use crate::server::validation::parse_status;
use crate::store::RegistrationFilter;
use crate::types::{Capability, PrincipalStatus};
use crate::workflow::Reviewer;
use crate::workflow::review::principal_decide;

pub fn principal_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/siswa", get(list_students))
        .route("/siswa/{user_id}/eligibility", post(update_eligibility))
        .route("/pendaftaran", get(list_registrations))
        .route("/pendaftaran/{id}", patch(decide_registration))
}

async fn list_students(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::VIEW_STUDENTS)?;
    Ok(Json(ApiResponse::success(student_rows(state.store.as_ref())?)))
}

async fn update_eligibility(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    JsonBody(req): JsonBody<StatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::PRINCIPAL_REVIEW)?;
    let updated = review_eligibility(state.store.as_ref(), Reviewer::Principal, user_id, req)?;
    Ok(Json(ApiResponse::success(updated)))
}

async fn list_registrations(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::VIEW_REGISTRATIONS)?;

    let regs = state
        .store
        .list_registrations(RegistrationFilter::All)
        .api_err("Failed to list registrations")?;

    Ok(Json(ApiResponse::success(registration_views(
        state.store.as_ref(),
        &regs,
    )?)))
}

async fn decide_registration(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<PrincipalDecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::PRINCIPAL_REVIEW)?;
    let decision = parse_status(
        req.kepsek_status.as_deref(),
        "kepsekStatus",
        &PrincipalStatus::ALL,
        PrincipalStatus::parse,
    )?;

    let mut reg = state
        .store
        .get_registration(id)
        .api_err("Failed to get registration")?
        .or_not_found("Registration not found")?;

    principal_decide(&mut reg, decision, req.kepsek_alasan.as_deref())?;
    state
        .store
        .update_registration(&reg)
        .api_err("Failed to update registration")?;

    tracing::info!(registration = reg.id, %decision, "principal decision recorded");
    Ok(Json(ApiResponse::success(registration_view(
        state.store.as_ref(),
        &reg,
    )?)))
}
