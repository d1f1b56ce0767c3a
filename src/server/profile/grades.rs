use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::{ensure_profile, find_profile};
use crate::auth::AuthUser;
use crate::server::AppState;
use crate::server::dto::{
    EmailQuery, GradeRequest, SemesterGradesRequest, SemesterRequest, SuccessResponse,
};
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::scope::{Access, resolve_student};
use crate::server::validation::{required, validate_score, validate_semester};
use crate::store::Store;
use crate::types::{Capability, GradeRecord, User};

const READ: Access = Access::Read(Capability::MANAGE_OWN_PROFILE);
const WRITE: Access = Access::Write(Capability::MANAGE_OWN_PROFILE);

struct GradeInput {
    semester: i64,
    subject: String,
    score: f64,
}

fn grade_input(req: GradeRequest) -> Result<GradeInput, ApiError> {
    let semester = req
        .semester
        .ok_or_else(|| ApiError::bad_request("semester is required"))?;
    validate_semester(semester)?;
    let subject = required(req.mata_pelajaran, "mataPelajaran")?;
    let score = req
        .nilai
        .ok_or_else(|| ApiError::bad_request("nilai is required"))?;
    validate_score(score)?;
    Ok(GradeInput {
        semester,
        subject,
        score,
    })
}

/// Loads a grade owned by the student. Grades of other students are reported as missing.
fn owned_grade(store: &dyn Store, user: &User, id: i64) -> Result<GradeRecord, ApiError> {
    let profile = find_profile(store, user)?.or_not_found("Grade not found")?;
    store
        .get_grade(id)
        .api_err("Failed to get grade")?
        .filter(|g| g.student_id == profile.id)
        .or_not_found("Grade not found")
}

pub async fn create_grade(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<GradeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(state.store.as_ref(), &auth, req.email.as_deref(), WRITE)?;
    let input = grade_input(req)?;

    let profile = ensure_profile(state.store.as_ref(), &user)?;
    let grade = state
        .store
        .create_grade(profile.id, input.semester, &input.subject, input.score)
        .api_err("Failed to create grade")?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(grade, "Grade saved")),
    ))
}

pub async fn list_grades(
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
    Ok(Json(ApiResponse::success(grades)))
}

pub async fn update_grade(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<GradeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(state.store.as_ref(), &auth, None, WRITE)?;
    let mut grade = owned_grade(state.store.as_ref(), &user, id)?;
    let input = grade_input(req)?;

    grade.semester = input.semester;
    grade.subject = input.subject;
    grade.score = input.score;

    state
        .store
        .update_grade(&grade)
        .api_err("Failed to update grade")?;

    Ok(Json(ApiResponse::with_message(grade, "Grade updated")))
}

pub async fn delete_grade(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(state.store.as_ref(), &auth, None, WRITE)?;
    let grade = owned_grade(state.store.as_ref(), &user, id)?;

    state
        .store
        .delete_grade(grade.id)
        .api_err("Failed to delete grade")?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Bulk delete of one semester's grades.
pub async fn delete_semester(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SemesterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(state.store.as_ref(), &auth, req.email.as_deref(), WRITE)?;
    let semester = req
        .semester
        .ok_or_else(|| ApiError::bad_request("semester is required"))?;
    validate_semester(semester)?;

    let profile =
        find_profile(state.store.as_ref(), &user)?.or_not_found("Student profile not found")?;
    let deleted = state
        .store
        .delete_semester_grades(profile.id, semester)
        .api_err("Failed to delete grades")?;

    tracing::debug!(student = profile.id, semester, deleted, "deleted semester grades");
    Ok(Json(SuccessResponse { success: true }))
}

/// Replaces a semester's full set of grades in one transaction.
pub async fn replace_semester(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(semester): Path<i64>,
    JsonBody(req): JsonBody<SemesterGradesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(state.store.as_ref(), &auth, req.email.as_deref(), WRITE)?;
    validate_semester(semester)?;

    let items = req
        .nilai
        .ok_or_else(|| ApiError::bad_request("nilai is required"))?;
    let mut grades = Vec::with_capacity(items.len());
    for item in items {
        let subject = required(item.mata_pelajaran, "mataPelajaran")?;
        let score = item
            .nilai
            .ok_or_else(|| ApiError::bad_request("nilai is required"))?;
        validate_score(score)?;
        grades.push((subject, score));
    }

    let profile = ensure_profile(state.store.as_ref(), &user)?;
    let records = state
        .store
        .replace_semester_grades(profile.id, semester, &grades)
        .api_err("Failed to save grades")?;

    Ok(Json(ApiResponse::with_message(records, "Semester grades saved")))
}
