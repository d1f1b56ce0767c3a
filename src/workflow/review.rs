//! Registration review pipeline: counselor, principal, then admin finalization.
//!
//! Each step mutates a loaded [`Registration`] in place after checking its guard; persisting
//! the result is the caller's job.

use std::fmt;

use crate::types::{EligibilityStatus, PrincipalStatus, Registration, RegistrationStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// Counselors can only forward registrations they accepted.
    NotAcceptedByCounselor,
    /// Rejecting on the principal side needs a written reason.
    MissingReason,
    /// Admin only finalizes registrations the principal approved.
    NotApprovedByPrincipal,
    /// Admin decision must be DITERIMA or DITOLAK.
    InvalidDecision(RegistrationStatus),
    /// Accepted choice must be 1 or 2.
    InvalidChoice(u8),
    /// Choice 2 accepted on a registration without a second program.
    NoSecondChoice,
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::NotAcceptedByCounselor => f.write_str(
                "Only registrations with status DITERIMA can be sent to the principal",
            ),
            ReviewError::MissingReason => {
                f.write_str("A reason is required when the principal rejects a registration")
            }
            ReviewError::NotApprovedByPrincipal => {
                f.write_str("Only registrations approved by the principal can be processed")
            }
            ReviewError::InvalidDecision(status) => {
                write!(f, "Selection status must be DITERIMA or DITOLAK, got {status}")
            }
            ReviewError::InvalidChoice(choice) => {
                write!(f, "Accepted choice must be 1 or 2, got {choice}")
            }
            ReviewError::NoSecondChoice => f.write_str("Registration has no second choice"),
        }
    }
}

impl std::error::Error for ReviewError {}

/// Review fields a fresh registration starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialReview {
    pub sent_to_principal: bool,
    pub principal_status: Option<PrincipalStatus>,
}

/// Students already approved as eligible get registrations that skip principal review.
#[must_use]
pub fn initial_review(eligibility: EligibilityStatus) -> InitialReview {
    if eligibility == EligibilityStatus::Eligible {
        InitialReview {
            sent_to_principal: true,
            principal_status: Some(PrincipalStatus::Disetujui),
        }
    } else {
        InitialReview {
            sent_to_principal: false,
            principal_status: None,
        }
    }
}

/// Counselors may set any selection status. Anything but acceptance drops the admitted program.
pub fn counselor_set_status(reg: &mut Registration, status: RegistrationStatus) {
    reg.status = status;
    if status != RegistrationStatus::Diterima {
        reg.accepted_program = None;
    }
}

pub fn forward_to_principal(reg: &mut Registration) -> Result<(), ReviewError> {
    if reg.status != RegistrationStatus::Diterima {
        return Err(ReviewError::NotAcceptedByCounselor);
    }
    reg.sent_to_principal = true;
    reg.principal_status = Some(PrincipalStatus::BelumDitinjau);
    Ok(())
}

/// Any principal decision marks the registration as sent. The reason is kept only on rejection,
/// and the admitted program only on approval.
pub fn principal_decide(
    reg: &mut Registration,
    decision: PrincipalStatus,
    reason: Option<&str>,
) -> Result<(), ReviewError> {
    let reason = reason.map(str::trim).filter(|r| !r.is_empty());

    if decision == PrincipalStatus::Ditolak && reason.is_none() {
        return Err(ReviewError::MissingReason);
    }

    reg.sent_to_principal = true;
    reg.principal_status = Some(decision);
    reg.principal_reason = match decision {
        PrincipalStatus::Ditolak => reason.map(str::to_string),
        _ => None,
    };
    if decision != PrincipalStatus::Disetujui {
        reg.accepted_program = None;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalization {
    pub status: RegistrationStatus,
    /// Program the student was admitted to, if accepted.
    pub accepted_program: Option<String>,
}

/// Admin decision. Accepting choice 2 moves it into choice 1 and clears choice 2, so the
/// admitted program is always readable from `choice1_program`; `accepted_program` records it
/// explicitly as well.
pub fn finalize(
    reg: &mut Registration,
    decision: RegistrationStatus,
    accepted_choice: Option<u8>,
) -> Result<Finalization, ReviewError> {
    if reg.principal_status != Some(PrincipalStatus::Disetujui) {
        return Err(ReviewError::NotApprovedByPrincipal);
    }

    match decision {
        RegistrationStatus::Diterima => {
            let choice = accepted_choice.unwrap_or(1);
            match choice {
                1 => {}
                2 => {
                    let second = reg.choice2_program.take().ok_or(ReviewError::NoSecondChoice)?;
                    reg.choice1_program = second;
                }
                other => return Err(ReviewError::InvalidChoice(other)),
            }
            reg.accepted_program = Some(reg.choice1_program.clone());
        }
        RegistrationStatus::Ditolak => {
            reg.accepted_program = None;
        }
        RegistrationStatus::Menunggu => return Err(ReviewError::InvalidDecision(decision)),
    }

    reg.status = decision;
    Ok(Finalization {
        status: decision,
        accepted_program: reg.accepted_program.clone(),
    })
}

/// Outcome shown on the public announcement lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Outcome {
    #[serde(rename = "lulus")]
    Lulus,
    #[serde(rename = "tidak lulus")]
    TidakLulus,
    #[serde(rename = "pending")]
    Pending,
}

#[must_use]
pub fn outcome(reg: &Registration) -> Outcome {
    let principal = reg.principal_status;
    if reg.status == RegistrationStatus::Diterima && principal == Some(PrincipalStatus::Disetujui)
    {
        Outcome::Lulus
    } else if reg.status == RegistrationStatus::Ditolak
        || principal == Some(PrincipalStatus::Ditolak)
    {
        Outcome::TidakLulus
    } else {
        Outcome::Pending
    }
}
