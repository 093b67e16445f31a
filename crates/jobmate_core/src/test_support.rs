//! Fixtures and fake ports shared by the unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::{
    Application, ApplicationStatus, Certification, CvData, CvGenerationRequest, Education,
    PersonalInfo, WorkExperience,
};
use crate::draft::{
    CvDraft, DraftUpdate, EducationUpdate, PersonalInfoUpdate, WorkExperienceUpdate,
};
use crate::ports::{CvGenerationService, PortError, PortResult};

const TITLES: [&str; 4] = [
    "Senior Frontend Engineer",
    "Product Designer",
    "Full Stack Developer",
    "UX Researcher",
];
const COMPANIES: [&str; 4] = ["TechCorp", "DesignStudio", "WebSolutions", "InnovateAI"];
const LOCATIONS: [&str; 4] = ["Remote", "New York, NY", "San Francisco, CA", "London, UK"];
const TYPES: [&str; 4] = ["Full-time", "Contract", "Full-time", "Part-time"];

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap()
}

/// `n` applications cycling through titles and statuses; every sixth record
/// (index 4, 10, 16, ...) is rejected. Applied dates are distinct.
pub fn mock_applications(n: usize) -> Vec<Application> {
    (0..n)
        .map(|i| {
            let applied = base_time() - Duration::days((i as i64 * 7) % 50 + i as i64 * 50);
            Application {
                id: format!("app-{}", i + 1),
                job_title: TITLES[i % 4].to_string(),
                company: COMPANIES[i % 4].to_string(),
                location: LOCATIONS[i % 4].to_string(),
                employment_type: TYPES[i % 4].to_string(),
                status: ApplicationStatus::ALL[i % 6],
                applied_date: applied,
                last_updated: applied + Duration::hours((i as i64 * 13) % 29),
                salary_range: Some("$100k - $130k".to_string()),
                logo: None,
            }
        })
        .collect()
}

pub fn application(id: &str, status: ApplicationStatus, at: DateTime<Utc>) -> Application {
    Application {
        id: id.to_string(),
        job_title: "Engineer".to_string(),
        company: "Initech".to_string(),
        location: "Remote".to_string(),
        employment_type: "Full-time".to_string(),
        status,
        applied_date: at,
        last_updated: at,
        salary_range: None,
        logo: None,
    }
}

/// A valid CV with one of each section and a 65-character summary.
pub fn sample_cv(name: &str, template: &str) -> CvData {
    CvData {
        id: Some("cv-1".to_string()),
        personal_info: PersonalInfo {
            full_name: name.to_string(),
            email: "someone@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
            location: "London, UK".to_string(),
            linkedin: None,
            website: None,
            github: None,
        },
        professional_summary: "Analyst who turns messy spreadsheets into decisions people trust."
            .to_string(),
        work_experience: vec![WorkExperience {
            id: "w1".to_string(),
            job_title: "Analyst".to_string(),
            company: "Babbage & Co".to_string(),
            location: "London, UK".to_string(),
            start_date: "2019-05-01".to_string(),
            end_date: None,
            description: "Modelled the difference engine's output.".to_string(),
            achievements: vec!["Published the first algorithm".to_string()],
        }],
        education: vec![Education {
            id: "e1".to_string(),
            degree: "Mathematics".to_string(),
            institution: "Private tutoring".to_string(),
            location: "London, UK".to_string(),
            graduation_date: "1835-06-01".to_string(),
            gpa: None,
            honors: None,
        }],
        skills: vec!["Math".to_string(), "Analysis".to_string(), "Writing".to_string()],
        certifications: vec![Certification {
            id: "c1".to_string(),
            name: "Analytical Engines".to_string(),
            issuer: "Royal Society".to_string(),
            date: "1843-01-01".to_string(),
            credential_id: None,
        }],
        languages: None,
        achievements: None,
        template: template.to_string(),
        created_at: None,
        updated_at: None,
    }
}

/// A form draft that passes validation.
pub fn filled_draft(name: &str) -> CvDraft {
    let mut draft = CvDraft::default();
    let work = draft.work_experience[0].id.clone();
    let edu = draft.education[0].id.clone();
    for update in [
        DraftUpdate::PersonalInfo(PersonalInfoUpdate::FullName(name.to_string())),
        DraftUpdate::PersonalInfo(PersonalInfoUpdate::Email("someone@example.com".into())),
        DraftUpdate::WorkExperience {
            id: work.clone(),
            update: WorkExperienceUpdate::JobTitle("Analyst".into()),
        },
        DraftUpdate::WorkExperience {
            id: work,
            update: WorkExperienceUpdate::Company("Babbage & Co".into()),
        },
        DraftUpdate::Education {
            id: edu.clone(),
            update: EducationUpdate::Degree("Mathematics".into()),
        },
        DraftUpdate::Education {
            id: edu,
            update: EducationUpdate::Institution("Private tutoring".into()),
        },
        DraftUpdate::AddSkill("Math".into()),
    ] {
        draft.apply(update);
    }
    draft
}

fn cv_from_request(request: &CvGenerationRequest) -> CvData {
    CvData {
        id: Some("cv-generated".to_string()),
        personal_info: request.personal_info.clone(),
        professional_summary: request
            .professional_summary
            .clone()
            .unwrap_or_else(|| "Enhanced summary".to_string()),
        work_experience: request.work_experience.clone(),
        education: request.education.clone(),
        skills: request.skills.clone(),
        certifications: request.certifications.clone().unwrap_or_default(),
        languages: request.languages.clone(),
        achievements: request.achievements.clone(),
        template: request.template_id.clone(),
        created_at: None,
        updated_at: None,
    }
}

enum Mode {
    Echo,
    Fail(PortError),
    Sequence(Mutex<VecDeque<PortResult<CvData>>>),
}

/// A scripted generation service that counts calls.
pub struct FakeCvService {
    mode: Mode,
    calls: AtomicUsize,
}

impl FakeCvService {
    /// Echoes the request back as a document.
    pub fn echo() -> Self {
        Self {
            mode: Mode::Echo,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: PortError) -> Self {
        Self {
            mode: Mode::Fail(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns the given outcomes in order, one per call.
    pub fn sequence(outcomes: Vec<PortResult<CvData>>) -> Self {
        Self {
            mode: Mode::Sequence(Mutex::new(outcomes.into())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self, echo: impl FnOnce() -> CvData) -> PortResult<CvData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            Mode::Echo => Ok(echo()),
            Mode::Fail(error) => Err(error.clone()),
            Mode::Sequence(outcomes) => outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PortError::Unexpected("script exhausted".into()))),
        }
    }
}

#[async_trait]
impl CvGenerationService for FakeCvService {
    async fn generate(&self, request: &CvGenerationRequest) -> PortResult<CvData> {
        self.next(|| cv_from_request(request))
    }

    async fn regenerate(&self, current: &CvData) -> PortResult<CvData> {
        self.next(|| {
            let mut cv = current.clone();
            cv.professional_summary = format!("Regenerated: {}", cv.professional_summary);
            cv
        })
    }

    async fn list_resumes(&self) -> PortResult<Vec<CvData>> {
        Ok(Vec::new())
    }

    async fn get_resume(&self, id: &str) -> PortResult<CvData> {
        Err(PortError::NotFound(id.to_string()))
    }

    async fn delete_resume(&self, _id: &str) -> PortResult<()> {
        Ok(())
    }
}

/// A generation service whose requests never complete.
pub struct PendingCvService;

#[async_trait]
impl CvGenerationService for PendingCvService {
    async fn generate(&self, _request: &CvGenerationRequest) -> PortResult<CvData> {
        futures::future::pending().await
    }

    async fn regenerate(&self, _current: &CvData) -> PortResult<CvData> {
        futures::future::pending().await
    }

    async fn list_resumes(&self) -> PortResult<Vec<CvData>> {
        futures::future::pending().await
    }

    async fn get_resume(&self, _id: &str) -> PortResult<CvData> {
        futures::future::pending().await
    }

    async fn delete_resume(&self, _id: &str) -> PortResult<()> {
        futures::future::pending().await
    }
}
