//! services/client/src/adapters/auth.rs
//!
//! Implements the `AuthService` port against the `/auth` endpoints.

use async_trait::async_trait;
use jobmate_core::{
    domain::{AuthResponse, LoginCredentials, RegisterCredentials, User},
    ports::{AuthService, PortResult},
};

use super::http::ApiClient;

#[derive(Clone)]
pub struct RestAuthAdapter {
    client: ApiClient,
}

impl RestAuthAdapter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthService for RestAuthAdapter {
    async fn login(&self, credentials: &LoginCredentials) -> PortResult<AuthResponse> {
        self.client.post("/auth/login", credentials).await
    }

    async fn register(&self, credentials: &RegisterCredentials) -> PortResult<AuthResponse> {
        self.client.post("/auth/register", credentials).await
    }

    async fn current_user(&self) -> PortResult<User> {
        self.client.get("/auth/me").await
    }
}
