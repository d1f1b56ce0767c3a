use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{EligibilityStatus, HomeRole, PrincipalStatus, RegistrationStatus, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: i64,
    pub user_id: i64,
    pub nama: String,
    pub nisn: Option<String>,
    pub sekolah: Option<String>,
    pub tempat_lahir: Option<String>,
    pub tanggal_lahir: Option<NaiveDate>,
    pub npsn: Option<String>,
    pub nama_orang_tua: Option<String>,
    pub alamat: Option<String>,
    pub kabupaten: Option<String>,
    pub provinsi: Option<String>,
    pub eligibility_status: EligibilityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentProfile {
    /// A profile is complete once name, NISN and school are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        !self.nama.trim().is_empty() && filled(&self.nisn) && filled(&self.sekolah)
    }
}

/// One report-card score ("nilai rapor").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    pub id: i64,
    #[serde(rename = "siswaId")]
    pub student_id: i64,
    pub semester: i64,
    #[serde(rename = "mataPelajaran")]
    pub subject: String,
    #[serde(rename = "nilai")]
    pub score: f64,
}

/// A student achievement ("prestasi").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: i64,
    #[serde(rename = "siswaId")]
    pub student_id: i64,
    pub nama: String,
    pub tingkat: Option<String>,
    pub tahun: Option<i64>,
}

/// A university registration ("pendaftaran"). At most one per student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub student_id: i64,
    pub choice1_program: String,
    pub choice2_program: Option<String>,
    pub accepted_program: Option<String>,
    pub status: RegistrationStatus,
    pub sent_to_principal: bool,
    pub principal_status: Option<PrincipalStatus>,
    pub principal_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub student_id: i64,
    pub choice1_program: String,
    pub choice2_program: Option<String>,
    pub sent_to_principal: bool,
    pub principal_status: Option<PrincipalStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeContent {
    pub role: HomeRole,
    pub title: String,
    pub subtitle: Option<String>,
}

/// Static reference row: a study program offered by a university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    #[serde(rename = "prodi")]
    pub name: String,
    #[serde(rename = "universitas")]
    pub university_name: String,
}
