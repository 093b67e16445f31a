//! crates/jobmate_core/src/session.rs
//!
//! The signed-in user's session: who they are and the bearer token sent with
//! every request. The context is passed explicitly to whatever builds requests
//! and is persisted in the same envelope shape the web client used.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::domain::UserProfile;
use crate::persistence::{SingleSlot, SESSION_STORAGE_KEY};
use crate::ports::KeyValueStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

/// Field-by-field profile edits applied to the signed-in user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl SessionContext {
    pub fn set_auth(&mut self, user: UserProfile, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.is_authenticated = true;
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }

    /// Merges profile edits. Does nothing when signed out.
    pub fn update_user(&mut self, update: ProfileUpdate) {
        let Some(user) = self.user.as_mut() else {
            return;
        };
        if let Some(v) = update.full_name {
            user.full_name = v;
        }
        if let Some(v) = update.email {
            user.email = v;
        }
        if let Some(v) = update.phone_number {
            user.phone_number = Some(v);
        }
        if let Some(v) = update.location {
            user.location = v;
        }
        if let Some(v) = update.bio {
            user.bio = Some(v);
        }
        if let Some(v) = update.avatar {
            user.avatar = Some(v);
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }
}

/// The persisted form: `{"state": {...}, "version": 0}`.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    state: SessionContext,
    #[serde(default)]
    version: u32,
}

/// A shared, persisted session. Clones refer to the same session.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<SessionContext>>,
    slot: SingleSlot<PersistedSession>,
}

impl SessionHandle {
    /// Loads the persisted session; missing or corrupt data means signed out.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let slot = SingleSlot::<PersistedSession>::new(store, SESSION_STORAGE_KEY);
        let context = slot.load().map(|p| p.state).unwrap_or_default();
        Self {
            inner: Arc::new(RwLock::new(context)),
            slot,
        }
    }

    pub fn snapshot(&self) -> SessionContext {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().bearer_token().map(str::to_string)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn set_auth(&self, user: UserProfile, token: String) {
        info!("signed in as {}", user.email);
        self.modify(|ctx| ctx.set_auth(user, token));
    }

    pub fn logout(&self) {
        info!("session cleared");
        self.modify(SessionContext::logout);
    }

    pub fn update_user(&self, update: ProfileUpdate) {
        self.modify(|ctx| ctx.update_user(update));
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionContext> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn modify(&self, change: impl FnOnce(&mut SessionContext)) {
        let persisted = {
            let mut ctx = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            change(&mut *ctx);
            PersistedSession {
                state: (*ctx).clone(),
                version: 0,
            }
        };
        if let Err(e) = self.slot.save(&persisted) {
            warn!("failed to persist session: {}", e);
        }
    }
}
