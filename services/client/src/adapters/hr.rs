//! services/client/src/adapters/hr.rs
//!
//! Implements the employer-side `HrService` port against `/hr`.

use async_trait::async_trait;
use jobmate_core::{
    domain::{AnalyticsData, AnalyticsFilters, DashboardStats, JobApplication, ScreeningDecision},
    ports::{HrService, PortResult},
};
use serde::Serialize;

use super::http::ApiClient;

#[derive(Serialize)]
struct CandidateQuery<'a> {
    #[serde(rename = "jobId", skip_serializing_if = "Option::is_none")]
    job_id: Option<&'a str>,
}

#[derive(Clone)]
pub struct RestHrAdapter {
    client: ApiClient,
}

impl RestHrAdapter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HrService for RestHrAdapter {
    async fn dashboard_stats(&self) -> PortResult<DashboardStats> {
        self.client.get("/hr/stats").await
    }

    async fn candidates(&self, job_id: Option<&str>) -> PortResult<Vec<JobApplication>> {
        self.client
            .get_with_query("/hr/candidates", &CandidateQuery { job_id })
            .await
    }

    async fn suggested_candidates(&self, job_id: &str) -> PortResult<Vec<JobApplication>> {
        self.client
            .get(&format!("/hr/jobs/{}/suggestions", job_id))
            .await
    }

    async fn screen_candidate(
        &self,
        application_id: &str,
        decision: &ScreeningDecision,
    ) -> PortResult<JobApplication> {
        self.client
            .patch(&format!("/hr/applications/{}/screen", application_id), decision)
            .await
    }

    async fn analytics(&self, filters: &AnalyticsFilters) -> PortResult<AnalyticsData> {
        self.client.get_with_query("/hr/analytics", filters).await
    }
}
