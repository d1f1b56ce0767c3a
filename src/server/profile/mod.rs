mod achievements;
mod grades;
mod student;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::server::AppState;
use crate::server::response::{ApiError, StoreResultExt};
use crate::store::Store;
use crate::types::{StudentProfile, User};

pub fn profile_router() -> Router<Arc<AppState>> {
    Router::new()
        // Student profile
        .route("/siswa", get(student::get_profile).post(student::save_profile))
        .route("/siswa/cek-lengkap", get(student::check_complete))
        .route("/eligibility-status", get(student::eligibility_status))
        .route("/eligibility", get(student::eligibility_check))
        // Grades
        .route("/nilai", get(grades::list_grades).post(grades::create_grade))
        .route(
            "/nilai/{id}",
            put(grades::update_grade).delete(grades::delete_grade),
        )
        .route("/nilai/semester", post(grades::delete_semester))
        .route("/nilai/semester/{semester}", put(grades::replace_semester))
        // Achievements
        .route(
            "/prestasi",
            get(achievements::list_achievements).post(achievements::create_achievement),
        )
}

/// Existing profile of a student, without creating one.
fn find_profile(store: &dyn Store, user: &User) -> Result<Option<StudentProfile>, ApiError> {
    store
        .get_profile_by_user(user.id)
        .api_err("Failed to get student profile")
}

/// Profile of a student, created with defaults on first use.
fn ensure_profile(store: &dyn Store, user: &User) -> Result<StudentProfile, ApiError> {
    store
        .ensure_profile(user)
        .api_err("Failed to create student profile")
}
