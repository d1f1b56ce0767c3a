use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, patch, post},
};

use crate::auth::AuthUser;
use crate::server::AppState;
use crate::server::dto::{
    CounselorRegistrationDto, RegistrationDto, StatusRequest, SuccessResponse,
};
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::scope::registration_owner;
use crate::server::students::{review_eligibility, student_rows};
use crate::server::validation::parse_status;
use crate::store::{RegistrationFilter, Store};
use crate::types::{Capability, Registration, RegistrationStatus};
use crate::workflow::Reviewer;
use crate::workflow::review::{counselor_set_status, forward_to_principal};
use crate::workflow::scoring::average;

pub fn counselor_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/siswa", get(list_students))
        .route("/siswa/{user_id}/eligibility", post(update_eligibility))
        .route("/pendaftaran", get(list_registrations))
        .route("/pendaftaran/{id}", delete(delete_registration))
        .route("/pendaftaran/{id}/status", patch(update_status))
        .route("/pendaftaran/{id}/kirim-ke-kepsek", post(send_to_principal))
}

fn counselor_view(
    store: &dyn Store,
    reg: &Registration,
) -> Result<CounselorRegistrationDto, ApiError> {
    let (profile, email) = registration_owner(store, reg)?;
    let grades = store
        .list_grades(profile.id)
        .api_err("Failed to list grades")?;
    Ok(CounselorRegistrationDto {
        registration: RegistrationDto::new(reg, &profile, &email),
        rata_rata: average(&grades),
    })
}

fn load_registration(store: &dyn Store, id: i64) -> Result<Registration, ApiError> {
    store
        .get_registration(id)
        .api_err("Failed to get registration")?
        .or_not_found("Registration not found")
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
    auth.require(Capability::COUNSELOR_REVIEW)?;
    let updated = review_eligibility(state.store.as_ref(), Reviewer::Counselor, user_id, req)?;
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
    let data = regs
        .iter()
        .map(|reg| counselor_view(state.store.as_ref(), reg))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ApiResponse::success(data)))
}

async fn update_status(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<StatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::COUNSELOR_REVIEW)?;
    let status = parse_status(
        req.status.as_deref(),
        "status",
        &RegistrationStatus::ALL,
        RegistrationStatus::parse,
    )?;

    let mut reg = load_registration(state.store.as_ref(), id)?;
    counselor_set_status(&mut reg, status);
    state
        .store
        .update_registration(&reg)
        .api_err("Failed to update registration")?;

    Ok(Json(ApiResponse::success(counselor_view(
        state.store.as_ref(),
        &reg,
    )?)))
}

async fn send_to_principal(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::COUNSELOR_REVIEW)?;

    let mut reg = load_registration(state.store.as_ref(), id)?;
    forward_to_principal(&mut reg)?;
    state
        .store
        .update_registration(&reg)
        .api_err("Failed to update registration")?;

    tracing::info!(registration = reg.id, "registration sent to principal");
    Ok(Json(ApiResponse::success(counselor_view(
        state.store.as_ref(),
        &reg,
    )?)))
}

async fn delete_registration(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::COUNSELOR_REVIEW)?;

    let deleted = state
        .store
        .delete_registration(id)
        .api_err("Failed to delete registration")?;
    if !deleted {
        return Err(ApiError::not_found("Registration not found"));
    }

    tracing::info!(registration = id, "registration deleted by counselor");
    Ok(Json(SuccessResponse { success: true }))
}
