//! crates/jobmate_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the client's core logic.
//! These traits form the boundary between the workflows in this crate and the
//! concrete backends (REST API, local storage) implemented in the client service.

use async_trait::async_trait;

use crate::domain::{
    AnalyticsData, AnalyticsFilters, Application, ApplicationUpdate, AuthResponse, CoverLetter,
    CoverLetterRequest, CoverLetterUpdate, CvData, CvGenerationRequest, DashboardStats,
    JobApplication, JobPosting, JobQuery, JobUpdate, LoginCredentials, NewApplication, NewJob,
    RegisterCredentials, ScreeningDecision, User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., HTTP, disk).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A 401, with the backend's explanation when it sent one.
    #[error("Unauthorized")]
    Unauthorized(Option<String>),
    #[error("Request failed with status {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// The human-readable message to surface to the user.
    ///
    /// Backend-supplied detail wins; everything else falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PortError::Api {
                detail: Some(detail),
                ..
            }
            | PortError::Unauthorized(Some(detail))
                if !detail.trim().is_empty() =>
            {
                detail.clone()
            }
            PortError::Unauthorized(_) => "Your session has expired. Please log in again.".to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Local Persistence Port
//=========================================================================================

/// A string key/value store, the local-storage analogue.
///
/// Implementations are synchronous: every call completes before returning.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PortResult<()>;
    fn remove(&self, key: &str) -> PortResult<()>;
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> PortResult<AuthResponse>;
    async fn register(&self, credentials: &RegisterCredentials) -> PortResult<AuthResponse>;
    async fn current_user(&self) -> PortResult<User>;
}

#[async_trait]
pub trait ApplicationService: Send + Sync {
    async fn list_applications(&self) -> PortResult<Vec<Application>>;
    async fn get_application(&self, id: &str) -> PortResult<Application>;
    async fn create_application(&self, application: &NewApplication) -> PortResult<Application>;
    async fn update_application(
        &self,
        id: &str,
        update: &ApplicationUpdate,
    ) -> PortResult<Application>;
    async fn delete_application(&self, id: &str) -> PortResult<()>;
}

#[async_trait]
pub trait JobService: Send + Sync {
    async fn list_jobs(&self, query: &JobQuery) -> PortResult<Vec<JobPosting>>;
    async fn get_job(&self, id: &str) -> PortResult<JobPosting>;
    async fn create_job(&self, job: &NewJob) -> PortResult<JobPosting>;
    async fn update_job(&self, id: &str, update: &JobUpdate) -> PortResult<JobPosting>;
    async fn delete_job(&self, id: &str) -> PortResult<()>;
}

#[async_trait]
pub trait HrService: Send + Sync {
    async fn dashboard_stats(&self) -> PortResult<DashboardStats>;
    async fn candidates(&self, job_id: Option<&str>) -> PortResult<Vec<JobApplication>>;
    /// Candidates ranked by match score for one job.
    async fn suggested_candidates(&self, job_id: &str) -> PortResult<Vec<JobApplication>>;
    async fn screen_candidate(
        &self,
        application_id: &str,
        decision: &ScreeningDecision,
    ) -> PortResult<JobApplication>;
    async fn analytics(&self, filters: &AnalyticsFilters) -> PortResult<AnalyticsData>;
}

#[async_trait]
pub trait CoverLetterService: Send + Sync {
    async fn generate_cover_letter(&self, request: &CoverLetterRequest) -> PortResult<CoverLetter>;
    async fn list_cover_letters(&self) -> PortResult<Vec<CoverLetter>>;
    async fn get_cover_letter(&self, id: &str) -> PortResult<CoverLetter>;
    async fn update_cover_letter(
        &self,
        id: &str,
        update: &CoverLetterUpdate,
    ) -> PortResult<CoverLetter>;
    async fn delete_cover_letter(&self, id: &str) -> PortResult<()>;
}

/// The external CV enhancement service.
#[async_trait]
pub trait CvGenerationService: Send + Sync {
    /// Sends a draft for enhancement and returns the populated document.
    async fn generate(&self, request: &CvGenerationRequest) -> PortResult<CvData>;
    /// Re-runs enhancement over an already generated document.
    async fn regenerate(&self, current: &CvData) -> PortResult<CvData>;
    async fn list_resumes(&self) -> PortResult<Vec<CvData>>;
    async fn get_resume(&self, id: &str) -> PortResult<CvData>;
    async fn delete_resume(&self, id: &str) -> PortResult<()>;
}
