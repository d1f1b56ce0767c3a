mod middleware;
mod password;
mod session;

pub use middleware::{AuthError, AuthUser};
pub use password::{PasswordHasher, validate_password};
pub use session::{Claims, SessionKeys};
