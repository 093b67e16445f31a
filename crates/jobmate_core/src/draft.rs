//! crates/jobmate_core/src/draft.rs
//!
//! The editable CV form state and the typed update operations applied to it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Certification, CvData, CvGenerationRequest, Education, PersonalInfo, WorkExperience,
};

fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PersonalInfoUpdate {
    FullName(String),
    Email(String),
    Phone(String),
    Location(String),
    Linkedin(String),
    Website(String),
    Github(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkExperienceUpdate {
    JobTitle(String),
    Company(String),
    Location(String),
    StartDate(String),
    /// `None` marks the position as current.
    EndDate(Option<String>),
    Description(String),
    AddAchievement,
    SetAchievement { index: usize, text: String },
    RemoveAchievement(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EducationUpdate {
    Degree(String),
    Institution(String),
    Location(String),
    GraduationDate(String),
    Gpa(String),
    Honors(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CertificationUpdate {
    Name(String),
    Issuer(String),
    Date(String),
    CredentialId(String),
}

/// Every edit the CV form can make.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftUpdate {
    PersonalInfo(PersonalInfoUpdate),
    ProfessionalSummary(String),
    AddWorkExperience,
    RemoveWorkExperience(String),
    WorkExperience { id: String, update: WorkExperienceUpdate },
    AddEducation,
    RemoveEducation(String),
    Education { id: String, update: EducationUpdate },
    AddSkill(String),
    RemoveSkill(String),
    AddCertification,
    RemoveCertification(String),
    Certification { id: String, update: CertificationUpdate },
}

/// The in-progress CV form: what the user types before generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvDraft {
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub professional_summary: String,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

impl Default for CvDraft {
    /// A blank form with one empty work and one empty education entry.
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            professional_summary: String::new(),
            work_experience: vec![blank_work_experience()],
            education: vec![blank_education()],
            skills: Vec::new(),
            certifications: Vec::new(),
        }
    }
}

fn blank_work_experience() -> WorkExperience {
    WorkExperience {
        id: new_entry_id(),
        achievements: vec![String::new()],
        ..Default::default()
    }
}

fn blank_education() -> Education {
    Education {
        id: new_entry_id(),
        ..Default::default()
    }
}

impl CvDraft {
    /// Pre-fills the form from an existing document, for "edit".
    pub fn from_cv(cv: &CvData) -> Self {
        Self {
            personal_info: cv.personal_info.clone(),
            professional_summary: cv.professional_summary.clone(),
            work_experience: cv.work_experience.clone(),
            education: cv.education.clone(),
            skills: cv.skills.clone(),
            certifications: cv.certifications.clone(),
        }
    }

    /// Applies one edit. Updates addressed to an unknown entry id are ignored.
    pub fn apply(&mut self, update: DraftUpdate) {
        match update {
            DraftUpdate::PersonalInfo(field) => self.apply_personal_info(field),
            DraftUpdate::ProfessionalSummary(text) => self.professional_summary = text,
            DraftUpdate::AddWorkExperience => self.work_experience.push(blank_work_experience()),
            DraftUpdate::RemoveWorkExperience(id) => {
                self.work_experience.retain(|entry| entry.id != id)
            }
            DraftUpdate::WorkExperience { id, update } => {
                if let Some(entry) = self.work_experience.iter_mut().find(|e| e.id == id) {
                    apply_work_experience(entry, update);
                }
            }
            DraftUpdate::AddEducation => self.education.push(blank_education()),
            DraftUpdate::RemoveEducation(id) => self.education.retain(|entry| entry.id != id),
            DraftUpdate::Education { id, update } => {
                if let Some(entry) = self.education.iter_mut().find(|e| e.id == id) {
                    apply_education(entry, update);
                }
            }
            DraftUpdate::AddSkill(skill) => {
                let skill = skill.trim();
                if !skill.is_empty() && !self.skills.iter().any(|s| s == skill) {
                    self.skills.push(skill.to_string());
                }
            }
            DraftUpdate::RemoveSkill(skill) => self.skills.retain(|s| *s != skill),
            DraftUpdate::AddCertification => self.certifications.push(Certification {
                id: new_entry_id(),
                ..Default::default()
            }),
            DraftUpdate::RemoveCertification(id) => {
                self.certifications.retain(|entry| entry.id != id)
            }
            DraftUpdate::Certification { id, update } => {
                if let Some(entry) = self.certifications.iter_mut().find(|e| e.id == id) {
                    apply_certification(entry, update);
                }
            }
        }
    }

    fn apply_personal_info(&mut self, update: PersonalInfoUpdate) {
        let info = &mut self.personal_info;
        match update {
            PersonalInfoUpdate::FullName(v) => info.full_name = v,
            PersonalInfoUpdate::Email(v) => info.email = v,
            PersonalInfoUpdate::Phone(v) => info.phone = v,
            PersonalInfoUpdate::Location(v) => info.location = v,
            PersonalInfoUpdate::Linkedin(v) => info.linkedin = non_empty(v),
            PersonalInfoUpdate::Website(v) => info.website = non_empty(v),
            PersonalInfoUpdate::Github(v) => info.github = non_empty(v),
        }
    }

    /// Builds the generation request, dropping half-filled entries.
    ///
    /// Work entries need a title and a company, education entries a degree and an
    /// institution. Blank achievement lines are dropped too.
    pub fn into_request(self, template_id: impl Into<String>) -> CvGenerationRequest {
        let work_experience = self
            .work_experience
            .into_iter()
            .filter(|e| !e.job_title.trim().is_empty() && !e.company.trim().is_empty())
            .map(|mut e| {
                e.achievements.retain(|a| !a.trim().is_empty());
                e
            })
            .collect();
        let education = self
            .education
            .into_iter()
            .filter(|e| !e.degree.trim().is_empty() && !e.institution.trim().is_empty())
            .collect();
        CvGenerationRequest {
            personal_info: self.personal_info,
            professional_summary: non_empty(self.professional_summary),
            work_experience,
            education,
            skills: self.skills,
            certifications: Some(self.certifications),
            languages: None,
            achievements: None,
            template_id: template_id.into(),
        }
    }
}

fn apply_work_experience(entry: &mut WorkExperience, update: WorkExperienceUpdate) {
    match update {
        WorkExperienceUpdate::JobTitle(v) => entry.job_title = v,
        WorkExperienceUpdate::Company(v) => entry.company = v,
        WorkExperienceUpdate::Location(v) => entry.location = v,
        WorkExperienceUpdate::StartDate(v) => entry.start_date = v,
        WorkExperienceUpdate::EndDate(v) => entry.end_date = v,
        WorkExperienceUpdate::Description(v) => entry.description = v,
        WorkExperienceUpdate::AddAchievement => entry.achievements.push(String::new()),
        WorkExperienceUpdate::SetAchievement { index, text } => {
            if let Some(line) = entry.achievements.get_mut(index) {
                *line = text;
            }
        }
        WorkExperienceUpdate::RemoveAchievement(index) => {
            if index < entry.achievements.len() {
                entry.achievements.remove(index);
            }
        }
    }
}

fn apply_education(entry: &mut Education, update: EducationUpdate) {
    match update {
        EducationUpdate::Degree(v) => entry.degree = v,
        EducationUpdate::Institution(v) => entry.institution = v,
        EducationUpdate::Location(v) => entry.location = v,
        EducationUpdate::GraduationDate(v) => entry.graduation_date = v,
        EducationUpdate::Gpa(v) => entry.gpa = non_empty(v),
        EducationUpdate::Honors(v) => entry.honors = non_empty(v),
    }
}

fn apply_certification(entry: &mut Certification, update: CertificationUpdate) {
    match update {
        CertificationUpdate::Name(v) => entry.name = v,
        CertificationUpdate::Issuer(v) => entry.issuer = v,
        CertificationUpdate::Date(v) => entry.date = v,
        CertificationUpdate::CredentialId(v) => entry.credential_id = non_empty(v),
    }
}
