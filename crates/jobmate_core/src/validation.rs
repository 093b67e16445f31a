//! crates/jobmate_core/src/validation.rs
//!
//! Required-field checks reported per field, so callers can show each message
//! next to the input it belongs to.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

use crate::domain::{CvData, CvGenerationRequest, LoginCredentials, PersonalInfo, RegisterCredentials};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Joins field errors into one line, e.g. for a banner.
pub fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
    })
}

pub fn looks_like_email(value: &str) -> bool {
    email_pattern().is_match(value.trim())
}

fn check_email(errors: &mut Vec<FieldError>, field: &'static str, email: &str) {
    if email.trim().is_empty() {
        errors.push(FieldError::new(field, "Email is required"));
    } else if !looks_like_email(email) {
        errors.push(FieldError::new(field, "Email address is not valid"));
    }
}

fn check_cv_sections(
    errors: &mut Vec<FieldError>,
    personal_info: &PersonalInfo,
    work_entries: usize,
    education_entries: usize,
    skills: usize,
) {
    if personal_info.full_name.trim().is_empty() {
        errors.push(FieldError::new("personalInfo.fullName", "Full name is required"));
    }
    check_email(errors, "personalInfo.email", &personal_info.email);
    if work_entries == 0 {
        errors.push(FieldError::new(
            "workExperience",
            "At least one work experience is required",
        ));
    }
    if education_entries == 0 {
        errors.push(FieldError::new(
            "education",
            "At least one education entry is required",
        ));
    }
    if skills == 0 {
        errors.push(FieldError::new("skills", "At least one skill is required"));
    }
}

fn into_result(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_request(request: &CvGenerationRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_cv_sections(
        &mut errors,
        &request.personal_info,
        request.work_experience.len(),
        request.education.len(),
        request.skills.len(),
    );
    into_result(errors)
}

pub fn validate_cv(cv: &CvData) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_cv_sections(
        &mut errors,
        &cv.personal_info,
        cv.work_experience.len(),
        cv.education.len(),
        cv.skills.len(),
    );
    into_result(errors)
}

pub fn validate_login(credentials: &LoginCredentials) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_email(&mut errors, "email", &credentials.email);
    if credentials.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    into_result(errors)
}

pub fn validate_registration(credentials: &RegisterCredentials) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if credentials.first_name.trim().is_empty() {
        errors.push(FieldError::new("first_name", "First name is required"));
    }
    if credentials.last_name.trim().is_empty() {
        errors.push(FieldError::new("last_name", "Last name is required"));
    }
    check_email(&mut errors, "email", &credentials.email);
    if credentials.password.len() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    into_result(errors)
}
