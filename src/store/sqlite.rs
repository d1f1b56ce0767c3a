use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};

use super::schema::SCHEMA;
use super::{RegistrationFilter, Store};
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

macro_rules! sql_text_enum {
    ($($ty:ty),*) => {
        $(
            impl ToSql for $ty {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.as_str()))
                }
            }

            impl FromSql for $ty {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    let s = value.as_str()?;
                    <$ty>::parse(s).ok_or_else(|| {
                        FromSqlError::Other(
                            format!("invalid {} value: {s}", stringify!($ty)).into(),
                        )
                    })
                }
            }
        )*
    };
}

sql_text_enum!(
    Role,
    EligibilityStatus,
    RegistrationStatus,
    PrincipalStatus,
    HomeRole
);

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_date(s: Option<String>) -> Option<NaiveDate> {
    let s = s?;
    match NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::error!("Invalid date in database: '{}' - {}", s, e);
            None
        }
    }
}

fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

const USER_COLUMNS: &str = "id, email, password_hash, role, created_at";

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        role: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

const PROFILE_COLUMNS: &str = "id, user_id, nama, nisn, sekolah, tempat_lahir, tanggal_lahir, npsn,
     nama_orang_tua, alamat, kabupaten, provinsi, eligibility_status, created_at, updated_at";

fn map_profile(row: &Row<'_>) -> rusqlite::Result<StudentProfile> {
    Ok(StudentProfile {
        id: row.get(0)?,
        user_id: row.get(1)?,
        nama: row.get(2)?,
        nisn: row.get(3)?,
        sekolah: row.get(4)?,
        tempat_lahir: row.get(5)?,
        tanggal_lahir: parse_date(row.get(6)?),
        npsn: row.get(7)?,
        nama_orang_tua: row.get(8)?,
        alamat: row.get(9)?,
        kabupaten: row.get(10)?,
        provinsi: row.get(11)?,
        eligibility_status: row.get(12)?,
        created_at: parse_datetime(&row.get::<_, String>(13)?),
        updated_at: parse_datetime(&row.get::<_, String>(14)?),
    })
}

const GRADE_COLUMNS: &str = "id, student_id, semester, subject, score";

fn map_grade(row: &Row<'_>) -> rusqlite::Result<GradeRecord> {
    Ok(GradeRecord {
        id: row.get(0)?,
        student_id: row.get(1)?,
        semester: row.get(2)?,
        subject: row.get(3)?,
        score: row.get(4)?,
    })
}

const ACHIEVEMENT_COLUMNS: &str = "id, student_id, nama, tingkat, tahun";

fn map_achievement(row: &Row<'_>) -> rusqlite::Result<Achievement> {
    Ok(Achievement {
        id: row.get(0)?,
        student_id: row.get(1)?,
        nama: row.get(2)?,
        tingkat: row.get(3)?,
        tahun: row.get(4)?,
    })
}

const REGISTRATION_COLUMNS: &str = "id, student_id, choice1_program, choice2_program,
     accepted_program, status, sent_to_principal, principal_status, principal_reason, created_at";

fn map_registration(row: &Row<'_>) -> rusqlite::Result<Registration> {
    Ok(Registration {
        id: row.get(0)?,
        student_id: row.get(1)?,
        choice1_program: row.get(2)?,
        choice2_program: row.get(3)?,
        accepted_program: row.get(4)?,
        status: row.get(5)?,
        sent_to_principal: row.get(6)?,
        principal_status: row.get(7)?,
        principal_reason: row.get(8)?,
        created_at: parse_datetime(&row.get::<_, String>(9)?),
    })
}

impl SqliteStore {
    fn query_list<T, P>(
        &self,
        sql: &str,
        params: P,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>>
    where
        P: rusqlite::Params,
    {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn query_one<T, P>(
        &self,
        sql: &str,
        params: P,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Option<T>>
    where
        P: rusqlite::Params,
    {
        self.conn()
            .query_row(sql, params, map)
            .optional()
            .map_err(Error::from)
    }
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, email: &str, password_hash: &str, role: Role) -> Result<User> {
        let created_at = Utc::now();
        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO users (email, password_hash, role, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![email, password_hash, role, format_datetime(&created_at)],
        );

        match result {
            Ok(_) => Ok(User {
                id: conn.last_insert_rowid(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                role,
                created_at,
            }),
            Err(e) if is_constraint_violation(&e) => Err(Error::AlreadyExists),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.query_one(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            map_user,
        )
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_one(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            map_user,
        )
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.query_list(
            &format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"),
            [],
            map_user,
        )
    }

    fn has_admin(&self) -> Result<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM users WHERE role = ?1",
            params![Role::Admin],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // Student profile operations

    fn ensure_profile(&self, user: &User) -> Result<StudentProfile> {
        let now = format_datetime(&Utc::now());
        let default_name = user.email.split('@').next().unwrap_or(&user.email);

        self.conn().execute(
            "INSERT OR IGNORE INTO student_profiles (user_id, nama, eligibility_status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![user.id, default_name, EligibilityStatus::MenungguBk, now],
        )?;

        self.get_profile_by_user(user.id)?.ok_or(Error::NotFound)
    }

    fn get_profile(&self, id: i64) -> Result<Option<StudentProfile>> {
        self.query_one(
            &format!("SELECT {PROFILE_COLUMNS} FROM student_profiles WHERE id = ?1"),
            params![id],
            map_profile,
        )
    }

    fn get_profile_by_user(&self, user_id: i64) -> Result<Option<StudentProfile>> {
        self.query_one(
            &format!("SELECT {PROFILE_COLUMNS} FROM student_profiles WHERE user_id = ?1"),
            params![user_id],
            map_profile,
        )
    }

    fn list_profiles(&self) -> Result<Vec<StudentProfile>> {
        self.query_list(
            &format!(
                "SELECT {PROFILE_COLUMNS} FROM student_profiles ORDER BY nama COLLATE NOCASE, id"
            ),
            [],
            map_profile,
        )
    }

    fn update_profile(&self, profile: &StudentProfile) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE student_profiles SET nama = ?1, nisn = ?2, sekolah = ?3, tempat_lahir = ?4,
                 tanggal_lahir = ?5, npsn = ?6, nama_orang_tua = ?7, alamat = ?8, kabupaten = ?9,
                 provinsi = ?10, updated_at = ?11
             WHERE id = ?12",
            params![
                profile.nama,
                profile.nisn,
                profile.sekolah,
                profile.tempat_lahir,
                profile.tanggal_lahir.as_ref().map(format_date),
                profile.npsn,
                profile.nama_orang_tua,
                profile.alamat,
                profile.kabupaten,
                profile.provinsi,
                format_datetime(&profile.updated_at),
                profile.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn set_eligibility(&self, profile_id: i64, status: EligibilityStatus) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE student_profiles SET eligibility_status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status, format_datetime(&Utc::now()), profile_id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Grade operations

    fn create_grade(
        &self,
        student_id: i64,
        semester: i64,
        subject: &str,
        score: f64,
    ) -> Result<GradeRecord> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO grade_records (student_id, semester, subject, score) VALUES (?1, ?2, ?3, ?4)",
            params![student_id, semester, subject, score],
        )?;

        Ok(GradeRecord {
            id: conn.last_insert_rowid(),
            student_id,
            semester,
            subject: subject.to_string(),
            score,
        })
    }

    fn get_grade(&self, id: i64) -> Result<Option<GradeRecord>> {
        self.query_one(
            &format!("SELECT {GRADE_COLUMNS} FROM grade_records WHERE id = ?1"),
            params![id],
            map_grade,
        )
    }

    fn update_grade(&self, grade: &GradeRecord) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE grade_records SET semester = ?1, subject = ?2, score = ?3 WHERE id = ?4",
            params![grade.semester, grade.subject, grade.score, grade.id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_grade(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM grade_records WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn list_grades(&self, student_id: i64) -> Result<Vec<GradeRecord>> {
        self.query_list(
            &format!(
                "SELECT {GRADE_COLUMNS} FROM grade_records WHERE student_id = ?1
                 ORDER BY semester, subject, id"
            ),
            params![student_id],
            map_grade,
        )
    }

    fn delete_semester_grades(&self, student_id: i64, semester: i64) -> Result<usize> {
        let rows = self.conn().execute(
            "DELETE FROM grade_records WHERE student_id = ?1 AND semester = ?2",
            params![student_id, semester],
        )?;
        Ok(rows)
    }

    fn replace_semester_grades(
        &self,
        student_id: i64,
        semester: i64,
        grades: &[(String, f64)],
    ) -> Result<Vec<GradeRecord>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM grade_records WHERE student_id = ?1 AND semester = ?2",
            params![student_id, semester],
        )?;

        let mut records = Vec::with_capacity(grades.len());
        for (subject, score) in grades {
            tx.execute(
                "INSERT INTO grade_records (student_id, semester, subject, score) VALUES (?1, ?2, ?3, ?4)",
                params![student_id, semester, subject, score],
            )?;
            records.push(GradeRecord {
                id: tx.last_insert_rowid(),
                student_id,
                semester,
                subject: subject.clone(),
                score: *score,
            });
        }

        tx.commit()?;
        Ok(records)
    }

    // Achievement operations

    fn create_achievement(
        &self,
        student_id: i64,
        nama: &str,
        tingkat: Option<&str>,
        tahun: Option<i64>,
    ) -> Result<Achievement> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO achievements (student_id, nama, tingkat, tahun) VALUES (?1, ?2, ?3, ?4)",
            params![student_id, nama, tingkat, tahun],
        )?;

        Ok(Achievement {
            id: conn.last_insert_rowid(),
            student_id,
            nama: nama.to_string(),
            tingkat: tingkat.map(str::to_string),
            tahun,
        })
    }

    fn list_achievements(&self, student_id: i64) -> Result<Vec<Achievement>> {
        self.query_list(
            &format!(
                "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements WHERE student_id = ?1
                 ORDER BY tahun IS NULL, tahun DESC, nama, id"
            ),
            params![student_id],
            map_achievement,
        )
    }

    // Registration operations

    fn create_registration(&self, new: &NewRegistration) -> Result<Registration> {
        let created_at = Utc::now();
        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO registrations (student_id, choice1_program, choice2_program, status,
                 sent_to_principal, principal_status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.student_id,
                new.choice1_program,
                new.choice2_program,
                RegistrationStatus::Menunggu,
                new.sent_to_principal,
                new.principal_status,
                format_datetime(&created_at),
            ],
        );

        match result {
            Ok(_) => Ok(Registration {
                id: conn.last_insert_rowid(),
                student_id: new.student_id,
                choice1_program: new.choice1_program.clone(),
                choice2_program: new.choice2_program.clone(),
                accepted_program: None,
                status: RegistrationStatus::Menunggu,
                sent_to_principal: new.sent_to_principal,
                principal_status: new.principal_status,
                principal_reason: None,
                created_at,
            }),
            Err(e) if is_constraint_violation(&e) => Err(Error::AlreadyExists),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_registration(&self, id: i64) -> Result<Option<Registration>> {
        self.query_one(
            &format!("SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = ?1"),
            params![id],
            map_registration,
        )
    }

    fn list_registrations(&self, filter: RegistrationFilter) -> Result<Vec<Registration>> {
        let clause = match filter {
            RegistrationFilter::All => "ORDER BY created_at DESC, id DESC",
            RegistrationFilter::PrincipalApproved => {
                "WHERE principal_status = 'DISETUJUI' ORDER BY created_at DESC, id DESC"
            }
            RegistrationFilter::Finalized => {
                "WHERE status != 'MENUNGGU' ORDER BY created_at ASC, id ASC"
            }
        };

        self.query_list(
            &format!("SELECT {REGISTRATION_COLUMNS} FROM registrations {clause}"),
            [],
            map_registration,
        )
    }

    fn list_student_registrations(&self, student_id: i64) -> Result<Vec<Registration>> {
        self.query_list(
            &format!(
                "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE student_id = ?1
                 ORDER BY created_at DESC, id DESC"
            ),
            params![student_id],
            map_registration,
        )
    }

    fn update_registration(&self, reg: &Registration) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE registrations SET choice1_program = ?1, choice2_program = ?2,
                 accepted_program = ?3, status = ?4, sent_to_principal = ?5,
                 principal_status = ?6, principal_reason = ?7
             WHERE id = ?8",
            params![
                reg.choice1_program,
                reg.choice2_program,
                reg.accepted_program,
                reg.status,
                reg.sent_to_principal,
                reg.principal_status,
                reg.principal_reason,
                reg.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_registration(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM registrations WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn approve_student_registrations(&self, student_id: i64) -> Result<usize> {
        let rows = self.conn().execute(
            "UPDATE registrations SET sent_to_principal = 1, principal_status = ?1
             WHERE student_id = ?2",
            params![PrincipalStatus::Disetujui, student_id],
        )?;
        Ok(rows)
    }

    // Home content operations

    fn get_home_content(&self, role: HomeRole) -> Result<Option<HomeContent>> {
        self.query_one(
            "SELECT role, title, subtitle FROM home_contents WHERE role = ?1",
            params![role],
            |row| {
                Ok(HomeContent {
                    role: row.get(0)?,
                    title: row.get(1)?,
                    subtitle: row.get(2)?,
                })
            },
        )
    }

    fn upsert_home_content(&self, content: &HomeContent) -> Result<()> {
        self.conn().execute(
            "INSERT INTO home_contents (role, title, subtitle) VALUES (?1, ?2, ?3)
             ON CONFLICT(role) DO UPDATE SET title = excluded.title, subtitle = excluded.subtitle",
            params![content.role, content.title, content.subtitle],
        )?;
        Ok(())
    }

    // Reference data

    fn upsert_program(&self, program: &Program) -> Result<bool> {
        let rows = self.conn().execute(
            "INSERT OR IGNORE INTO programs (university_name, name) VALUES (?1, ?2)",
            params![program.university_name, program.name],
        )?;
        Ok(rows > 0)
    }

    fn list_universities(&self) -> Result<Vec<String>> {
        self.query_list(
            "SELECT DISTINCT university_name FROM programs ORDER BY university_name",
            [],
            |row| row.get(0),
        )
    }

    fn list_programs(&self, university: Option<&str>) -> Result<Vec<Program>> {
        self.query_list(
            "SELECT name, university_name FROM programs
             WHERE ?1 IS NULL OR university_name = ?1
             ORDER BY university_name, name",
            params![university],
            |row| {
                Ok(Program {
                    name: row.get(0)?,
                    university_name: row.get(1)?,
                })
            },
        )
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
