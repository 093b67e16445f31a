//! services/client/src/adapters/resumes.rs
//!
//! Implements the `CvGenerationService` port against `/resumes`.

use async_trait::async_trait;
use jobmate_core::{
    domain::{CvData, CvGenerationRequest},
    ports::{CvGenerationService, PortResult},
};
use tracing::info;

use super::http::ApiClient;

const RESUMES_ENDPOINT: &str = "/resumes";

#[derive(Clone)]
pub struct RestResumesAdapter {
    client: ApiClient,
}

impl RestResumesAdapter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CvGenerationService for RestResumesAdapter {
    async fn generate(&self, request: &CvGenerationRequest) -> PortResult<CvData> {
        info!(
            "Requesting CV generation for '{}' with template '{}'",
            request.personal_info.full_name, request.template_id
        );
        self.client
            .post(&format!("{}/generate", RESUMES_ENDPOINT), request)
            .await
    }

    /// Regenerates a saved CV in place. A document the backend never saw (no
    /// id) is sent through `generate` instead.
    async fn regenerate(&self, current: &CvData) -> PortResult<CvData> {
        match current.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => {
                info!("Requesting regeneration of CV {}", id);
                self.client
                    .post_empty(&format!("{}/{}/regenerate", RESUMES_ENDPOINT, id))
                    .await
            }
            None => self.generate(&CvGenerationRequest::from_cv(current)).await,
        }
    }

    async fn list_resumes(&self) -> PortResult<Vec<CvData>> {
        self.client.get(RESUMES_ENDPOINT).await
    }

    async fn get_resume(&self, id: &str) -> PortResult<CvData> {
        self.client.get(&format!("{}/{}", RESUMES_ENDPOINT, id)).await
    }

    async fn delete_resume(&self, id: &str) -> PortResult<()> {
        self.client
            .delete(&format!("{}/{}", RESUMES_ENDPOINT, id))
            .await
    }
}
