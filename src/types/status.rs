use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role. Fixed at account creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Siswa,
    GuruBk,
    KepalaSekolah,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Siswa, Role::GuruBk, Role::KepalaSekolah, Role::Admin];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Siswa => "SISWA",
            Role::GuruBk => "GURU_BK",
            Role::KepalaSekolah => "KEPALA_SEKOLAH",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

/// Eligibility of a student to take part in the admission track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityStatus {
    MenungguBk,
    MenungguKepsek,
    Eligible,
    TidakEligible,
}

impl EligibilityStatus {
    pub const ALL: [EligibilityStatus; 4] = [
        EligibilityStatus::MenungguBk,
        EligibilityStatus::MenungguKepsek,
        EligibilityStatus::Eligible,
        EligibilityStatus::TidakEligible,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EligibilityStatus::MenungguBk => "MENUNGGU_BK",
            EligibilityStatus::MenungguKepsek => "MENUNGGU_KEPSEK",
            EligibilityStatus::Eligible => "ELIGIBLE",
            EligibilityStatus::TidakEligible => "TIDAK_ELIGIBLE",
        }
    }

    pub fn parse(s: &str) -> Option<EligibilityStatus> {
        Self::ALL.into_iter().find(|e| e.as_str() == s)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            EligibilityStatus::Eligible | EligibilityStatus::TidakEligible
        )
    }
}

/// Selection status of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Menunggu,
    Diterima,
    Ditolak,
}

impl RegistrationStatus {
    pub const ALL: [RegistrationStatus; 3] = [
        RegistrationStatus::Menunggu,
        RegistrationStatus::Diterima,
        RegistrationStatus::Ditolak,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RegistrationStatus::Menunggu => "MENUNGGU",
            RegistrationStatus::Diterima => "DITERIMA",
            RegistrationStatus::Ditolak => "DITOLAK",
        }
    }

    pub fn parse(s: &str) -> Option<RegistrationStatus> {
        Self::ALL.into_iter().find(|s2| s2.as_str() == s)
    }
}

/// Principal review outcome for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrincipalStatus {
    BelumDitinjau,
    Disetujui,
    Ditolak,
}

impl PrincipalStatus {
    pub const ALL: [PrincipalStatus; 3] = [
        PrincipalStatus::BelumDitinjau,
        PrincipalStatus::Disetujui,
        PrincipalStatus::Ditolak,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PrincipalStatus::BelumDitinjau => "BELUM_DITINJAU",
            PrincipalStatus::Disetujui => "DISETUJUI",
            PrincipalStatus::Ditolak => "DITOLAK",
        }
    }

    pub fn parse(s: &str) -> Option<PrincipalStatus> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

/// Audience of a landing-page text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HomeRole {
    Public,
    Siswa,
    GuruBk,
    KepalaSekolah,
    Admin,
}

impl HomeRole {
    pub const ALL: [HomeRole; 5] = [
        HomeRole::Public,
        HomeRole::Siswa,
        HomeRole::GuruBk,
        HomeRole::KepalaSekolah,
        HomeRole::Admin,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HomeRole::Public => "PUBLIC",
            HomeRole::Siswa => "SISWA",
            HomeRole::GuruBk => "GURU_BK",
            HomeRole::KepalaSekolah => "KEPALA_SEKOLAH",
            HomeRole::Admin => "ADMIN",
        }
    }

    /// Case-insensitive parse.
    pub fn parse(s: &str) -> Option<HomeRole> {
        let upper = s.trim().to_uppercase();
        Self::ALL.into_iter().find(|h| h.as_str() == upper)
    }
}

macro_rules! impl_display {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_display!(
    Role,
    EligibilityStatus,
    RegistrationStatus,
    PrincipalStatus,
    HomeRole
);
