use std::fmt;

use crate::types::EligibilityStatus;
use crate::types::EligibilityStatus::{Eligible, MenungguBk, MenungguKepsek, TidakEligible};

/// Who is acting on a student's eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reviewer {
    Counselor,
    Principal,
}

impl fmt::Display for Reviewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reviewer::Counselor => f.write_str("counselor"),
            Reviewer::Principal => f.write_str("principal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The student is not in the state this reviewer acts on.
    WrongSource {
        reviewer: Reviewer,
        expected: EligibilityStatus,
        actual: EligibilityStatus,
    },
    /// The requested target is not reachable for this reviewer.
    InvalidTarget {
        reviewer: Reviewer,
        target: EligibilityStatus,
    },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::WrongSource {
                reviewer,
                expected,
                actual,
            } => write!(
                f,
                "Only students with status {expected} can be reviewed by the {reviewer} (current status: {actual})"
            ),
            TransitionError::InvalidTarget { reviewer, target } => {
                write!(f, "The {reviewer} cannot set eligibility to {target}")
            }
        }
    }
}

impl std::error::Error for TransitionError {}

/// (reviewer, source, allowed targets)
const TRANSITIONS: [(Reviewer, EligibilityStatus, [EligibilityStatus; 2]); 2] = [
    (Reviewer::Counselor, MenungguBk, [MenungguKepsek, TidakEligible]),
    (Reviewer::Principal, MenungguKepsek, [Eligible, TidakEligible]),
];

/// Validates a single eligibility step and returns the new status.
pub fn transition(
    reviewer: Reviewer,
    current: EligibilityStatus,
    target: EligibilityStatus,
) -> Result<EligibilityStatus, TransitionError> {
    let Some((_, source, targets)) = TRANSITIONS.iter().find(|(r, _, _)| *r == reviewer) else {
        return Err(TransitionError::InvalidTarget { reviewer, target });
    };

    if !targets.contains(&target) {
        return Err(TransitionError::InvalidTarget { reviewer, target });
    }

    if current != *source {
        return Err(TransitionError::WrongSource {
            reviewer,
            expected: *source,
            actual: current,
        });
    }

    Ok(target)
}

/// Approving a student as eligible also approves their registrations on the principal side.
#[must_use]
pub fn approves_registrations(target: EligibilityStatus) -> bool {
    target == Eligible
}
