//! Student dashboard rows and eligibility decisions, shared by the counselor and principal routes.

use crate::server::dto::{EligibilityUpdateResponse, StatusRequest, StudentRow};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::parse_status;
use crate::store::Store;
use crate::types::{EligibilityStatus, Role};
use crate::workflow::Reviewer;
use crate::workflow::eligibility::{approves_registrations, transition};
use crate::workflow::scoring::semester_summary;

/// Every student profile, ordered by name, with the semester-average summary.
pub fn student_rows(store: &dyn Store) -> Result<Vec<StudentRow>, ApiError> {
    let profiles = store.list_profiles().api_err("Failed to list students")?;

    let mut rows = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let email = store
            .get_user(profile.user_id)
            .api_err("Failed to get user")?
            .map(|u| u.email)
            .unwrap_or_default();
        let grades = store
            .list_grades(profile.id)
            .api_err("Failed to list grades")?;
        let summary = semester_summary(&grades);

        rows.push(StudentRow {
            user_id: profile.user_id,
            nama: profile.nama,
            email,
            eligibility_status: profile.eligibility_status,
            rata_rata: summary.rata_rata,
            missing_semesters: summary.missing_semesters,
        });
    }
    Ok(rows)
}

/// Applies one eligibility step for the student account `user_id`.
pub fn review_eligibility(
    store: &dyn Store,
    reviewer: Reviewer,
    user_id: i64,
    req: StatusRequest,
) -> Result<EligibilityUpdateResponse, ApiError> {
    let target = parse_status(
        req.status.as_deref(),
        "status",
        &EligibilityStatus::ALL,
        EligibilityStatus::parse,
    )?;

    let user = store
        .get_user(user_id)
        .api_err("Failed to get user")?
        .filter(|u| u.role == Role::Siswa)
        .or_not_found("Student profile not found")?;
    let profile = store
        .get_profile_by_user(user.id)
        .api_err("Failed to get student profile")?
        .or_not_found("Student profile not found")?;

    let next = transition(reviewer, profile.eligibility_status, target)?;

    store
        .set_eligibility(profile.id, next)
        .api_err("Failed to update eligibility")?;

    if approves_registrations(next) {
        let approved = store
            .approve_student_registrations(profile.id)
            .api_err("Failed to approve registrations")?;
        tracing::info!(student = profile.id, approved, "registrations approved with eligibility");
    }

    tracing::info!(
        student = profile.id,
        %reviewer,
        from = %profile.eligibility_status,
        to = %next,
        "eligibility updated"
    );

    Ok(EligibilityUpdateResponse {
        user_id: user.id,
        eligibility_status: next,
    })
}
