//! crates/jobmate_core/src/cv_utils.rs
//!
//! Read-only helpers over a finished CV: quality score, preview line, date
//! formatting, and JSON export/import.

use chrono::{Datelike, NaiveDate, Utc};

use crate::domain::CvData;
use crate::validation::{validate_cv, FieldError};

/// Scores how complete a CV is, from 0 to 100.
pub fn cv_score(cv: &CvData) -> u8 {
    let info = &cv.personal_info;
    let mut score: u32 = 0;

    // Personal info (20)
    if !info.full_name.is_empty() {
        score += 5;
    }
    if !info.email.is_empty() {
        score += 5;
    }
    if !info.phone.is_empty() {
        score += 3;
    }
    if !info.location.is_empty() {
        score += 3;
    }
    let present = |link: &Option<String>| link.as_deref().is_some_and(|s| !s.is_empty());
    if present(&info.linkedin) {
        score += 2;
    }
    if present(&info.website) || present(&info.github) {
        score += 2;
    }

    // Summary (15)
    let summary_len = cv.professional_summary.chars().count();
    if summary_len > 0 {
        score += if summary_len > 100 && summary_len < 300 {
            15
        } else if summary_len >= 50 {
            10
        } else {
            5
        };
    }

    // Experience (25)
    score += match cv.work_experience.len() {
        0 => 0,
        1 => 15,
        2 => 20,
        _ => 25,
    };

    // Education (15)
    score += match cv.education.len() {
        0 => 0,
        1 => 10,
        _ => 15,
    };

    // Skills (15)
    score += match cv.skills.len() {
        0..=2 => 0,
        3..=4 => 8,
        5..=7 => 12,
        _ => 15,
    };

    // Certifications and languages (5 each)
    score += (cv.certifications.len() as u32 * 2).min(5);
    if let Some(languages) = &cv.languages {
        score += (languages.len() as u32 * 2).min(5);
    }

    score.min(100) as u8
}

/// One-line teaser: name, latest role, and the start of the summary.
pub fn preview_text(cv: &CvData) -> String {
    let role = cv
        .work_experience
        .first()
        .map(|e| e.job_title.as_str())
        .filter(|title| !title.is_empty())
        .unwrap_or("Professional");
    let summary: String = cv.professional_summary.chars().take(100).collect();
    format!("{} - {} | {}...", cv.personal_info.full_name, role, summary)
}

/// Parses the date formats the form produces: `YYYY-MM-DD`, `YYYY-MM`, or an
/// RFC 3339 timestamp.
pub fn parse_cv_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok())
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// "Mar 2021", or "Present" for a missing end date.
pub fn format_month_year(value: Option<&str>) -> String {
    match value {
        None => "Present".to_string(),
        Some(raw) => parse_cv_date(raw)
            .map(|date| date.format("%b %Y").to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

fn plural(n: i32, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Whole months between two dates, rendered as "2 years 3 months".
pub fn duration_between(start: NaiveDate, end: NaiveDate) -> String {
    let months =
        ((end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32).max(0);
    let years = months / 12;
    let remaining = months % 12;
    match (years, remaining) {
        (0, m) => plural(m, "month"),
        (y, 0) => plural(y, "year"),
        (y, m) => format!("{} {}", plural(y, "year"), plural(m, "month")),
    }
}

/// Duration of a position, counting up to today when it is current.
pub fn position_duration(start: &str, end: Option<&str>) -> Option<String> {
    let start = parse_cv_date(start)?;
    let end = match end {
        Some(raw) => parse_cv_date(raw)?,
        None => Utc::now().date_naive(),
    };
    Some(duration_between(start, end))
}

/// `cv_<Full_Name>_<YYYY-MM-DD>.json`
pub fn export_file_name(cv: &CvData, today: NaiveDate) -> String {
    let name = cv
        .personal_info
        .full_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("cv_{}_{}.json", name, today.format("%Y-%m-%d"))
}

pub fn export_json(cv: &CvData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(cv)
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid CV data format: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Imported CV is incomplete")]
    Incomplete(Vec<FieldError>),
}

/// Parses an exported CV, rejecting documents missing required sections.
pub fn import_json(raw: &str) -> Result<CvData, ImportError> {
    let cv: CvData = serde_json::from_str(raw)?;
    validate_cv(&cv).map_err(ImportError::Incomplete)?;
    Ok(cv)
}
