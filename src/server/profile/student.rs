use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;

use super::{ensure_profile, find_profile};
use crate::auth::AuthUser;
use crate::server::AppState;
use crate::server::dto::{CompletenessResponse, EligibilityStatusView, EmailQuery, ProfileRequest};
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::scope::{Access, resolve_student};
use crate::server::validation::{optional_text, required};
use crate::types::Capability;
use crate::workflow::lookup::parse_birth_date;
use crate::workflow::scoring::threshold_check;

const READ: Access = Access::Read(Capability::MANAGE_OWN_PROFILE);
const WRITE: Access = Access::Write(Capability::MANAGE_OWN_PROFILE);

/// Absent leaves the field unchanged; an empty string clears it.
fn apply_optional(field: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *field = optional_text(value);
    }
}

pub async fn get_profile(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(state.store.as_ref(), &auth, query.email.as_deref(), READ)?;
    let profile = find_profile(state.store.as_ref(), &user)?;
    Ok(Json(ApiResponse::success(profile)))
}

pub async fn save_profile(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(state.store.as_ref(), &auth, req.email.as_deref(), WRITE)?;

    let nama = required(req.nama, "nama")?;
    let nisn = required(req.nisn, "nisn")?;
    let sekolah = required(req.sekolah, "sekolah")?;

    let birth_date = match req.tanggal_lahir.as_deref().map(str::trim) {
        None => None,
        Some("") => Some(None),
        Some(raw) => Some(Some(parse_birth_date(raw).ok_or_else(|| {
            ApiError::bad_request("tanggalLahir must be a date (YYYY-MM-DD)")
        })?)),
    };

    let mut profile = ensure_profile(state.store.as_ref(), &user)?;
    profile.nama = nama;
    profile.nisn = Some(nisn);
    profile.sekolah = Some(sekolah);
    if let Some(date) = birth_date {
        profile.tanggal_lahir = date;
    }
    apply_optional(&mut profile.tempat_lahir, req.tempat_lahir);
    apply_optional(&mut profile.npsn, req.npsn);
    apply_optional(&mut profile.nama_orang_tua, req.nama_orang_tua);
    apply_optional(&mut profile.alamat, req.alamat);
    apply_optional(&mut profile.kabupaten, req.kabupaten);
    apply_optional(&mut profile.provinsi, req.provinsi);
    profile.updated_at = Utc::now();

    state
        .store
        .update_profile(&profile)
        .api_err("Failed to save student profile")?;

    Ok(Json(ApiResponse::with_message(profile, "Profile saved")))
}

pub async fn check_complete(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(state.store.as_ref(), &auth, query.email.as_deref(), READ)?;
    let lengkap = find_profile(state.store.as_ref(), &user)?.is_some_and(|p| p.is_complete());
    Ok(Json(CompletenessResponse { lengkap }))
}

pub async fn eligibility_status(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(state.store.as_ref(), &auth, query.email.as_deref(), READ)?;
    let view = find_profile(state.store.as_ref(), &user)?.map(|p| EligibilityStatusView {
        eligibility_status: p.eligibility_status,
    });
    Ok(Json(ApiResponse::success(view)))
}

/// Informational threshold check over the mandatory subjects.
pub async fn eligibility_check(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(state.store.as_ref(), &auth, query.email.as_deref(), READ)?;
    let grades = match find_profile(state.store.as_ref(), &user)? {
        Some(profile) => state
            .store
            .list_grades(profile.id)
            .api_err("Failed to list grades")?,
        None => Vec::new(),
    };
    Ok(Json(threshold_check(&grades)))
}
