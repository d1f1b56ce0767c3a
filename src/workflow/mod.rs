//! Domain rules of the admission track, free of storage and HTTP concerns.

pub mod eligibility;
pub mod lookup;
pub mod number;
pub mod review;
pub mod scoring;

pub use eligibility::{Reviewer, TransitionError};
pub use number::{parse_registration_id, registration_number};
pub use review::{Outcome, ReviewError};
