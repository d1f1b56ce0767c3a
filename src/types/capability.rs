use std::fmt;

use serde::{Deserialize, Serialize};

use super::Role;

/// Capability represents a bitmask of operations a role may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(u32);

impl Capability {
    pub const MANAGE_OWN_PROFILE: Capability = Capability(1 << 0); // 1
    pub const SUBMIT_REGISTRATION: Capability = Capability(1 << 1); // 2
    pub const RUN_SIMULATION: Capability = Capability(1 << 2); // 4
    pub const VIEW_STUDENTS: Capability = Capability(1 << 3); // 8
    pub const VIEW_REGISTRATIONS: Capability = Capability(1 << 4); // 16
    pub const COUNSELOR_REVIEW: Capability = Capability(1 << 5); // 32
    pub const PRINCIPAL_REVIEW: Capability = Capability(1 << 6); // 64
    pub const FINALIZE_SELECTION: Capability = Capability(1 << 7); // 128
    pub const MANAGE_HOME_CONTENT: Capability = Capability(1 << 8); // 256

    const NAMES: [(Capability, &'static str); 9] = [
        (Self::MANAGE_OWN_PROFILE, "profile:manage"),
        (Self::SUBMIT_REGISTRATION, "registration:submit"),
        (Self::RUN_SIMULATION, "simulation:run"),
        (Self::VIEW_STUDENTS, "students:view"),
        (Self::VIEW_REGISTRATIONS, "registrations:view"),
        (Self::COUNSELOR_REVIEW, "review:counselor"),
        (Self::PRINCIPAL_REVIEW, "review:principal"),
        (Self::FINALIZE_SELECTION, "selection:finalize"),
        (Self::MANAGE_HOME_CONTENT, "home:manage"),
    ];

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if this bitmask contains every bit of `required`.
    #[must_use]
    pub const fn has(self, required: Capability) -> bool {
        self.0 & required.0 == required.0
    }

    #[must_use]
    pub const fn union(self, other: Capability) -> Capability {
        Capability(self.0 | other.0)
    }

    /// The capability table. Every authorization decision goes through here.
    #[must_use]
    pub const fn for_role(role: Role) -> Capability {
        match role {
            Role::Siswa => Self::MANAGE_OWN_PROFILE
                .union(Self::SUBMIT_REGISTRATION)
                .union(Self::RUN_SIMULATION),
            Role::GuruBk => Self::VIEW_STUDENTS
                .union(Self::VIEW_REGISTRATIONS)
                .union(Self::COUNSELOR_REVIEW),
            Role::KepalaSekolah => Self::VIEW_STUDENTS
                .union(Self::VIEW_REGISTRATIONS)
                .union(Self::PRINCIPAL_REVIEW),
            Role::Admin => Self::VIEW_STUDENTS
                .union(Self::VIEW_REGISTRATIONS)
                .union(Self::FINALIZE_SELECTION)
                .union(Self::MANAGE_HOME_CONTENT),
        }
    }

    #[must_use]
    pub fn to_strings(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(cap, _)| self.has(*cap))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_strings().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_cannot_review() {
        let caps = Capability::for_role(Role::Siswa);
        assert!(caps.has(Capability::SUBMIT_REGISTRATION));
        assert!(!caps.has(Capability::COUNSELOR_REVIEW));
        assert!(!caps.has(Capability::VIEW_STUDENTS));
    }

    #[test]
    fn test_review_capabilities_are_disjoint() {
        let bk = Capability::for_role(Role::GuruBk);
        let kepsek = Capability::for_role(Role::KepalaSekolah);
        assert!(bk.has(Capability::COUNSELOR_REVIEW));
        assert!(!bk.has(Capability::PRINCIPAL_REVIEW));
        assert!(kepsek.has(Capability::PRINCIPAL_REVIEW));
        assert!(!kepsek.has(Capability::COUNSELOR_REVIEW));
    }

    #[test]
    fn test_only_admin_finalizes() {
        for role in Role::ALL {
            let finalizes = Capability::for_role(role).has(Capability::FINALIZE_SELECTION);
            assert_eq!(finalizes, role == Role::Admin);
        }
    }

    #[test]
    fn test_display_lists_names() {
        let caps = Capability::for_role(Role::Siswa);
        assert_eq!(
            caps.to_string(),
            "profile:manage, registration:submit, simulation:run"
        );
    }
}
