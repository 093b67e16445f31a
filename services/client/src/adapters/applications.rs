//! services/client/src/adapters/applications.rs
//!
//! Implements the `ApplicationService` port against `/applications`.

use async_trait::async_trait;
use jobmate_core::{
    domain::{Application, ApplicationUpdate, NewApplication},
    ports::{ApplicationService, PortResult},
};

use super::http::ApiClient;

const APPLICATIONS_ENDPOINT: &str = "/applications";

#[derive(Clone)]
pub struct RestApplicationsAdapter {
    client: ApiClient,
}

impl RestApplicationsAdapter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApplicationService for RestApplicationsAdapter {
    async fn list_applications(&self) -> PortResult<Vec<Application>> {
        self.client.get(APPLICATIONS_ENDPOINT).await
    }

    async fn get_application(&self, id: &str) -> PortResult<Application> {
        self.client
            .get(&format!("{}/{}", APPLICATIONS_ENDPOINT, id))
            .await
    }

    async fn create_application(&self, application: &NewApplication) -> PortResult<Application> {
        self.client.post(APPLICATIONS_ENDPOINT, application).await
    }

    async fn update_application(
        &self,
        id: &str,
        update: &ApplicationUpdate,
    ) -> PortResult<Application> {
        self.client
            .patch(&format!("{}/{}", APPLICATIONS_ENDPOINT, id), update)
            .await
    }

    async fn delete_application(&self, id: &str) -> PortResult<()> {
        self.client
            .delete(&format!("{}/{}", APPLICATIONS_ENDPOINT, id))
            .await
    }
}
