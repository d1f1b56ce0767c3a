//! Resolution of the student a request targets, and loading of registration views.

use crate::auth::AuthUser;
use crate::server::dto::RegistrationDto;
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::normalize_email;
use crate::store::Store;
use crate::types::{Capability, Registration, Role, StudentProfile, User};

#[derive(Debug, Clone, Copy)]
pub enum Access {
    /// Modifying student data. Only the student themself may do this.
    Write(Capability),
    /// Reading student data. Other students' data needs `VIEW_STUDENTS`.
    Read(Capability),
}

/// Resolves an optional `email` parameter to the targeted student account.
/// An omitted email means the caller.
pub fn resolve_student(
    store: &dyn Store,
    caller: &AuthUser,
    email: Option<&str>,
    access: Access,
) -> Result<User, ApiError> {
    let requested = email
        .map(normalize_email)
        .filter(|e| !e.is_empty() && *e != caller.user.email);

    let Some(email) = requested else {
        let (Access::Write(own) | Access::Read(own)) = access;
        caller.require(own)?;
        return Ok(caller.user.clone());
    };

    if let Access::Write(_) = access {
        return Err(ApiError::forbidden(
            "Students can only modify their own data",
        ));
    }
    caller.require(Capability::VIEW_STUDENTS)?;

    let user = store
        .get_user_by_email(&email)
        .api_err("Failed to get user")?
        .or_not_found("User not found")?;

    if user.role != Role::Siswa {
        return Err(ApiError::not_found("Student not found"));
    }
    Ok(user)
}

/// Loads a registration's owning profile and account email.
pub fn registration_owner(
    store: &dyn Store,
    reg: &Registration,
) -> Result<(StudentProfile, String), ApiError> {
    let profile = store
        .get_profile(reg.student_id)
        .api_err("Failed to get student profile")?
        .or_not_found("Student profile not found")?;

    let email = store
        .get_user(profile.user_id)
        .api_err("Failed to get user")?
        .map(|u| u.email)
        .unwrap_or_default();

    Ok((profile, email))
}

pub fn registration_view(store: &dyn Store, reg: &Registration) -> Result<RegistrationDto, ApiError> {
    let (profile, email) = registration_owner(store, reg)?;
    Ok(RegistrationDto::new(reg, &profile, &email))
}

pub fn registration_views(
    store: &dyn Store,
    regs: &[Registration],
) -> Result<Vec<RegistrationDto>, ApiError> {
    regs.iter().map(|reg| registration_view(store, reg)).collect()
}
