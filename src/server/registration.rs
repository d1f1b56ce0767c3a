use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::auth::AuthUser;
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{
    EmailQuery, LookupQuery, LookupResult, RegistrationDto, RegistrationRequest,
};
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::scope::{
    Access, registration_owner, registration_view, registration_views, resolve_student,
};
use crate::server::validation::{optional_text, required};
use crate::store::RegistrationFilter;
use crate::types::{Capability, NewRegistration};
use crate::workflow::lookup::{matches_announcement, parse_birth_date};
use crate::workflow::parse_registration_id;
use crate::workflow::review::{initial_review, outcome};

const LOOKUP_NOT_FOUND: &str = "Registration not found";

pub fn registration_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_own).post(create_registration))
        .route("/all", get(list_all))
        .route("/cek", get(lookup))
}

async fn create_registration(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<RegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(
        state.store.as_ref(),
        &auth,
        req.email.as_deref(),
        Access::Write(Capability::SUBMIT_REGISTRATION),
    )?;
    let choice1 = required(req.prodi1, "prodi1")?;
    let choice2 = optional_text(req.prodi2);

    let profile = state
        .store
        .ensure_profile(&user)
        .api_err("Failed to create student profile")?;

    let review = initial_review(profile.eligibility_status);
    let new = NewRegistration {
        student_id: profile.id,
        choice1_program: choice1,
        choice2_program: choice2,
        sent_to_principal: review.sent_to_principal,
        principal_status: review.principal_status,
    };

    let reg = match state.store.create_registration(&new) {
        Ok(reg) => reg,
        Err(Error::AlreadyExists) => {
            return Err(ApiError::bad_request(
                "You already have an SNBP registration. It can no longer be changed.",
            ));
        }
        Err(e) => {
            tracing::error!("Failed to create registration for student {}: {e}", profile.id);
            return Err(ApiError::internal("Failed to create registration"));
        }
    };

    tracing::info!(
        registration = reg.id,
        student = profile.id,
        pre_approved = reg.sent_to_principal,
        "registration created"
    );

    let dto = registration_view(state.store.as_ref(), &reg)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(dto, "Registration saved")),
    ))
}

async fn list_own(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(
        state.store.as_ref(),
        &auth,
        query.email.as_deref(),
        Access::Read(Capability::SUBMIT_REGISTRATION),
    )?;

    let profile = state
        .store
        .get_profile_by_user(user.id)
        .api_err("Failed to get student profile")?;
    let regs = match profile {
        Some(profile) => state
            .store
            .list_student_registrations(profile.id)
            .api_err("Failed to list registrations")?,
        None => Vec::new(),
    };

    Ok(Json(ApiResponse::success(registration_views(
        state.store.as_ref(),
        &regs,
    )?)))
}

async fn list_all(
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

/// Public announcement lookup by registration number and birth date.
/// Mismatches are all reported the same way.
async fn lookup(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LookupQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let number = query.nomor.as_deref().map(str::trim).unwrap_or_default();
    let id = parse_registration_id(number)
        .ok_or_else(|| ApiError::bad_request("Registration number is not valid"))?;

    let birth_date = match query.tgl_lahir.as_deref().map(str::trim) {
        None | Some("") => return Err(ApiError::bad_request("tglLahir is required")),
        Some(raw) => parse_birth_date(raw)
            .ok_or_else(|| ApiError::bad_request("tglLahir must be a date (YYYY-MM-DD)"))?,
    };

    let Some(reg) = state
        .store
        .get_registration(id)
        .api_err("Failed to get registration")?
    else {
        return Err(ApiError::not_found(LOOKUP_NOT_FOUND));
    };

    let (profile, email) = registration_owner(state.store.as_ref(), &reg)?;
    if !matches_announcement(&reg, &profile, number, birth_date) {
        return Err(ApiError::not_found(LOOKUP_NOT_FOUND));
    }

    Ok(Json(ApiResponse::success(LookupResult {
        registration: RegistrationDto::new(&reg, &profile, &email),
        hasil: outcome(&reg),
    })))
}
