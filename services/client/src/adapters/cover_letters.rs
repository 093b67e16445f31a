//! services/client/src/adapters/cover_letters.rs
//!
//! Implements the `CoverLetterService` port against `/cover-letters`.

use async_trait::async_trait;
use jobmate_core::{
    domain::{CoverLetter, CoverLetterRequest, CoverLetterUpdate},
    ports::{CoverLetterService, PortResult},
};

use super::http::ApiClient;

const COVER_LETTERS_ENDPOINT: &str = "/cover-letters";

#[derive(Clone)]
pub struct RestCoverLettersAdapter {
    client: ApiClient,
}

impl RestCoverLettersAdapter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CoverLetterService for RestCoverLettersAdapter {
    async fn generate_cover_letter(&self, request: &CoverLetterRequest) -> PortResult<CoverLetter> {
        self.client
            .post(&format!("{}/generate", COVER_LETTERS_ENDPOINT), request)
            .await
    }

    async fn list_cover_letters(&self) -> PortResult<Vec<CoverLetter>> {
        self.client.get(COVER_LETTERS_ENDPOINT).await
    }

    async fn get_cover_letter(&self, id: &str) -> PortResult<CoverLetter> {
        self.client
            .get(&format!("{}/{}", COVER_LETTERS_ENDPOINT, id))
            .await
    }

    async fn update_cover_letter(
        &self,
        id: &str,
        update: &CoverLetterUpdate,
    ) -> PortResult<CoverLetter> {
        self.client
            .patch(&format!("{}/{}", COVER_LETTERS_ENDPOINT, id), update)
            .await
    }

    async fn delete_cover_letter(&self, id: &str) -> PortResult<()> {
        self.client
            .delete(&format!("{}/{}", COVER_LETTERS_ENDPOINT, id))
            .await
    }
}
