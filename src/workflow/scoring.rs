//! Advisory scores shown on dashboards. None of these gate a workflow step.

use serde::Serialize;

use crate::types::GradeRecord;

/// Semesters a complete report card covers.
pub const SEMESTERS: [i64; 5] = [1, 2, 3, 4, 5];

/// Programs treated as more competitive by the admin matching score.
pub const DIFFICULT_PROGRAM_KEYWORDS: [&str; 4] =
    ["kedokteran", "informatika", "ilmu komputer", "teknik sipil"];

const DIFFICULT_PROGRAM_PENALTY: f64 = 10.0;

/// Subjects counted by the informational eligibility threshold check.
pub const MANDATORY_SUBJECTS: [&str; 8] = [
    "Matematika",
    "Fisika",
    "Kimia",
    "Biologi",
    "Matematika Peminatan",
    "Agama",
    "PPKN",
    "Bahasa Indonesia",
];

pub const ELIGIBILITY_THRESHOLD: f64 = 85.0;

/// Plain mean of every score, `None` without scores.
#[must_use]
pub fn average(grades: &[GradeRecord]) -> Option<f64> {
    if grades.is_empty() {
        return None;
    }
    Some(grades.iter().map(|g| g.score).sum::<f64>() / grades.len() as f64)
}

#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[must_use]
pub fn is_difficult_program(program: &str) -> bool {
    let lower = program.to_lowercase();
    DIFFICULT_PROGRAM_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Admin matching score for one program choice, clamped to [0, 100]. Empty program scores 0.
#[must_use]
pub fn matching_score(average: f64, program: &str) -> f64 {
    if program.trim().is_empty() {
        return 0.0;
    }
    let score = if is_difficult_program(program) {
        average - DIFFICULT_PROGRAM_PENALTY
    } else {
        average
    };
    score.clamp(0.0, 100.0)
}

/// Pre-registration self-check score.
#[must_use]
pub fn simulation_score(grades: &[GradeRecord], achievement_count: usize) -> f64 {
    let Some(avg) = average(grades) else {
        return 0.0;
    };
    (avg * 0.7 + 2.0 * achievement_count as f64).min(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Chance {
    Tinggi,
    Sedang,
    Rendah,
    #[serde(rename = "Belum ada data")]
    NoData,
}

impl Chance {
    #[must_use]
    pub fn from_score(score: f64) -> Chance {
        if score >= 80.0 {
            Chance::Tinggi
        } else if score >= 60.0 {
            Chance::Sedang
        } else if score > 0.0 {
            Chance::Rendah
        } else {
            Chance::NoData
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterSummary {
    pub rata_rata: f64,
    pub missing_semesters: Vec<i64>,
}

/// Mean of per-semester means over [`SEMESTERS`]. A semester without grades counts as 0.
#[must_use]
pub fn semester_summary(grades: &[GradeRecord]) -> SemesterSummary {
    let mut total = 0.0;
    let mut missing_semesters = Vec::new();

    for semester in SEMESTERS {
        let (sum, count) = grades
            .iter()
            .filter(|g| g.semester == semester)
            .fold((0.0, 0usize), |(sum, count), g| (sum + g.score, count + 1));

        if count == 0 {
            missing_semesters.push(semester);
        } else {
            total += sum / count as f64;
        }
    }

    SemesterSummary {
        rata_rata: total / SEMESTERS.len() as f64,
        missing_semesters,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdCheck {
    pub eligible: bool,
    pub rata_rata: f64,
}

/// Average over grade rows whose subject is mandatory, compared to [`ELIGIBILITY_THRESHOLD`].
#[must_use]
pub fn threshold_check(grades: &[GradeRecord]) -> ThresholdCheck {
    let mandatory: Vec<GradeRecord> = grades
        .iter()
        .filter(|g| MANDATORY_SUBJECTS.contains(&g.subject.as_str()))
        .cloned()
        .collect();

    match average(&mandatory) {
        Some(avg) => ThresholdCheck {
            eligible: avg >= ELIGIBILITY_THRESHOLD,
            rata_rata: avg,
        },
        None => ThresholdCheck {
            eligible: false,
            rata_rata: 0.0,
        },
    }
}
