pub const SCHEMA: &str = r#"
-- Accounts; role is fixed at creation
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,         -- argon2id PHC string
    role TEXT NOT NULL DEFAULT 'SISWA',
    created_at TEXT NOT NULL
);

-- One profile per student account, created lazily
CREATE TABLE IF NOT EXISTS student_profiles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    nama TEXT NOT NULL,
    nisn TEXT,
    sekolah TEXT,
    tempat_lahir TEXT,
    tanggal_lahir TEXT,                  -- YYYY-MM-DD
    npsn TEXT,
    nama_orang_tua TEXT,
    alamat TEXT,
    kabupaten TEXT,
    provinsi TEXT,
    eligibility_status TEXT NOT NULL DEFAULT 'MENUNGGU_BK',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Report-card scores
CREATE TABLE IF NOT EXISTS grade_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES student_profiles(id) ON DELETE CASCADE,
    semester INTEGER NOT NULL CHECK (semester BETWEEN 1 AND 5),
    subject TEXT NOT NULL,
    score REAL NOT NULL
);

-- Achievements, append-only
CREATE TABLE IF NOT EXISTS achievements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES student_profiles(id) ON DELETE CASCADE,
    nama TEXT NOT NULL,
    tingkat TEXT,
    tahun INTEGER
);

-- University registrations; the UNIQUE student_id enforces one per student
CREATE TABLE IF NOT EXISTS registrations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL UNIQUE REFERENCES student_profiles(id) ON DELETE CASCADE,
    choice1_program TEXT NOT NULL,
    choice2_program TEXT,
    accepted_program TEXT,
    status TEXT NOT NULL DEFAULT 'MENUNGGU',
    sent_to_principal INTEGER NOT NULL DEFAULT 0,
    principal_status TEXT,               -- NULL until forwarded or approved
    principal_reason TEXT,
    created_at TEXT NOT NULL
);

-- Landing-page text per audience
CREATE TABLE IF NOT EXISTS home_contents (
    role TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    subtitle TEXT
);

-- Reference data
CREATE TABLE IF NOT EXISTS programs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    university_name TEXT NOT NULL,
    name TEXT NOT NULL,

    UNIQUE(university_name, name)
);

CREATE INDEX IF NOT EXISTS idx_grade_records_student ON grade_records(student_id, semester);
CREATE INDEX IF NOT EXISTS idx_achievements_student ON achievements(student_id);
CREATE INDEX IF NOT EXISTS idx_registrations_created ON registrations(created_at);
CREATE INDEX IF NOT EXISTS idx_registrations_principal ON registrations(principal_status);
CREATE INDEX IF NOT EXISTS idx_student_profiles_nama ON student_profiles(nama);
"#;
