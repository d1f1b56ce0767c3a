mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Which registrations a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationFilter {
    /// Every registration, newest first.
    All,
    /// Registrations the principal approved, newest first.
    PrincipalApproved,
    /// Registrations no longer waiting (status != MENUNGGU), oldest first.
    Finalized,
}

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    /// Fails with `Error::AlreadyExists` when the email is taken.
    fn create_user(&self, email: &str, password_hash: &str, role: Role) -> Result<User>;
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    fn list_users(&self) -> Result<Vec<User>>;
    fn has_admin(&self) -> Result<bool>;

    // Student profile operations
    /// Returns the user's profile, creating a default one on first use.
    fn ensure_profile(&self, user: &User) -> Result<StudentProfile>;
    fn get_profile(&self, id: i64) -> Result<Option<StudentProfile>>;
    fn get_profile_by_user(&self, user_id: i64) -> Result<Option<StudentProfile>>;
    /// All profiles ordered by name.
    fn list_profiles(&self) -> Result<Vec<StudentProfile>>;
    fn update_profile(&self, profile: &StudentProfile) -> Result<()>;
    fn set_eligibility(&self, profile_id: i64, status: EligibilityStatus) -> Result<()>;

    // Grade operations
    fn create_grade(
        &self,
        student_id: i64,
        semester: i64,
        subject: &str,
        score: f64,
    ) -> Result<GradeRecord>;
    fn get_grade(&self, id: i64) -> Result<Option<GradeRecord>>;
    fn update_grade(&self, grade: &GradeRecord) -> Result<()>;
    fn delete_grade(&self, id: i64) -> Result<bool>;
    /// Ordered by semester, then subject.
    fn list_grades(&self, student_id: i64) -> Result<Vec<GradeRecord>>;
    fn delete_semester_grades(&self, student_id: i64, semester: i64) -> Result<usize>;
    /// Deletes a semester's grades and inserts the given set in one transaction.
    fn replace_semester_grades(
        &self,
        student_id: i64,
        semester: i64,
        grades: &[(String, f64)],
    ) -> Result<Vec<GradeRecord>>;

    // Achievement operations
    fn create_achievement(
        &self,
        student_id: i64,
        nama: &str,
        tingkat: Option<&str>,
        tahun: Option<i64>,
    ) -> Result<Achievement>;
    /// Ordered by year descending (unknown years last), then name.
    fn list_achievements(&self, student_id: i64) -> Result<Vec<Achievement>>;

    // Registration operations
    /// Fails with `Error::AlreadyExists` when the student already has a registration.
    fn create_registration(&self, new: &NewRegistration) -> Result<Registration>;
    fn get_registration(&self, id: i64) -> Result<Option<Registration>>;
    fn list_registrations(&self, filter: RegistrationFilter) -> Result<Vec<Registration>>;
    fn list_student_registrations(&self, student_id: i64) -> Result<Vec<Registration>>;
    fn update_registration(&self, reg: &Registration) -> Result<()>;
    fn delete_registration(&self, id: i64) -> Result<bool>;
    /// Marks every registration of the student as sent to and approved by the principal.
    fn approve_student_registrations(&self, student_id: i64) -> Result<usize>;

    // Home content operations
    fn get_home_content(&self, role: HomeRole) -> Result<Option<HomeContent>>;
    fn upsert_home_content(&self, content: &HomeContent) -> Result<()>;

    // Reference data
    /// Returns true if the program was newly inserted.
    fn upsert_program(&self, program: &Program) -> Result<bool>;
    fn list_universities(&self) -> Result<Vec<String>>;
    fn list_programs(&self, university: Option<&str>) -> Result<Vec<Program>>;

    fn close(&self) -> Result<()>;
}
