use serde::{Deserialize, Serialize};

use crate::types::{
    EligibilityStatus, PrincipalStatus, Registration, RegistrationStatus, Role, StudentProfile, User,
};
use crate::workflow::registration_number;
use crate::workflow::review::Outcome;
use crate::workflow::scoring::Chance;

// Requests. Fields are optional so that missing values produce field-specific messages.

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub email: Option<String>,
    pub nama: Option<String>,
    pub nisn: Option<String>,
    pub sekolah: Option<String>,
    pub tempat_lahir: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub npsn: Option<String>,
    pub nama_orang_tua: Option<String>,
    pub alamat: Option<String>,
    pub kabupaten: Option<String>,
    pub provinsi: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRequest {
    pub email: Option<String>,
    pub semester: Option<i64>,
    pub mata_pelajaran: Option<String>,
    pub nilai: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SemesterRequest {
    pub email: Option<String>,
    pub semester: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterGradeItem {
    pub mata_pelajaran: Option<String>,
    pub nilai: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SemesterGradesRequest {
    pub email: Option<String>,
    pub nilai: Option<Vec<SemesterGradeItem>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AchievementRequest {
    pub email: Option<String>,
    pub nama: Option<String>,
    pub tingkat: Option<String>,
    pub tahun: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegistrationRequest {
    pub email: Option<String>,
    pub prodi1: Option<String>,
    pub prodi2: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupQuery {
    pub nomor: Option<String>,
    pub tgl_lahir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SimulationRequest {
    pub email: Option<String>,
    pub prodi1: Option<String>,
    pub prodi2: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalDecisionRequest {
    pub kepsek_status: Option<String>,
    pub kepsek_alasan: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub status: Option<String>,
    pub pilihan_diterima: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeContentRequest {
    pub role: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UniversityQuery {
    pub universitas: Option<String>,
}

// Responses

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct CompletenessResponse {
    pub lengkap: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityStatusView {
    pub eligibility_status: EligibilityStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityUpdateResponse {
    pub user_id: i64,
    pub eligibility_status: EligibilityStatus,
}

/// A registration as shown to students and staff.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDto {
    pub id: i64,
    pub nomor_pendaftaran: String,
    pub email: String,
    pub nama: String,
    pub prodi1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prodi2: Option<String>,
    pub prodi_diterima: Option<String>,
    pub status: RegistrationStatus,
    pub tanggal: String,
    pub dikirim_ke_kepsek: bool,
    pub kepsek_status: Option<PrincipalStatus>,
    pub kepsek_alasan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sekolah: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kabupaten: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provinsi: Option<String>,
}

impl RegistrationDto {
    #[must_use]
    pub fn new(reg: &Registration, profile: &StudentProfile, email: &str) -> Self {
        Self {
            id: reg.id,
            nomor_pendaftaran: registration_number(reg.id, &reg.created_at),
            email: email.to_string(),
            nama: profile.nama.clone(),
            prodi1: reg.choice1_program.clone(),
            prodi2: reg.choice2_program.clone(),
            prodi_diterima: reg.accepted_program.clone(),
            status: reg.status,
            tanggal: reg.created_at.format("%Y-%m-%d").to_string(),
            dikirim_ke_kepsek: reg.sent_to_principal,
            kepsek_status: reg.principal_status,
            kepsek_alasan: reg.principal_reason.clone(),
            sekolah: profile.sekolah.clone(),
            kabupaten: profile.kabupaten.clone(),
            provinsi: profile.provinsi.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    #[serde(flatten)]
    pub registration: RegistrationDto,
    pub hasil: Outcome,
}

/// Counselor listing row: the registration plus the student's plain grade average.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounselorRegistrationDto {
    #[serde(flatten)]
    pub registration: RegistrationDto,
    pub rata_rata: Option<f64>,
}

/// Admin selection row with matching scores.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionDto {
    #[serde(flatten)]
    pub registration: RegistrationDto,
    pub rata_rata: f64,
    pub persentase1: f64,
    pub persentase2: f64,
}

/// BK/Kepsek dashboard row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRow {
    pub user_id: i64,
    pub nama: String,
    pub email: String,
    pub eligibility_status: EligibilityStatus,
    pub rata_rata: f64,
    pub missing_semesters: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub skor: f64,
    pub kategori: Chance,
    pub prodi1: String,
    pub prodi2: String,
}

#[derive(Debug, Serialize)]
pub struct HomeContentDto {
    pub role: String,
    pub title: String,
    pub subtitle: String,
}
