//! services/client/src/adapters/jobs.rs
//!
//! Implements the `JobService` port against `/jobs`.

use async_trait::async_trait;
use jobmate_core::{
    domain::{JobPosting, JobQuery, JobUpdate, NewJob},
    ports::{JobService, PortResult},
};

use super::http::ApiClient;

const JOBS_ENDPOINT: &str = "/jobs";

#[derive(Clone)]
pub struct RestJobsAdapter {
    client: ApiClient,
}

impl RestJobsAdapter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobService for RestJobsAdapter {
    async fn list_jobs(&self, query: &JobQuery) -> PortResult<Vec<JobPosting>> {
        self.client.get_with_query(JOBS_ENDPOINT, query).await
    }

    async fn get_job(&self, id: &str) -> PortResult<JobPosting> {
        self.client.get(&format!("{}/{}", JOBS_ENDPOINT, id)).await
    }

    async fn create_job(&self, job: &NewJob) -> PortResult<JobPosting> {
        self.client.post(JOBS_ENDPOINT, job).await
    }

    async fn update_job(&self, id: &str, update: &JobUpdate) -> PortResult<JobPosting> {
        self.client
            .patch(&format!("{}/{}", JOBS_ENDPOINT, id), update)
            .await
    }

    async fn delete_job(&self, id: &str) -> PortResult<()> {
        self.client.delete(&format!("{}/{}", JOBS_ENDPOINT, id)).await
    }
}
