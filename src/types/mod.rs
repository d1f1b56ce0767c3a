mod capability;
mod models;
mod status;

pub use capability::Capability;
pub use models::*;
pub use status::{EligibilityStatus, HomeRole, PrincipalStatus, RegistrationStatus, Role};
