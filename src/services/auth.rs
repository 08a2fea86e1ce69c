//! Authentication service interface
//!
//! Identity and sessions are owned by an external service. This module
//! describes what the dashboard consumes from it.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error reported by the auth service, carrying its raw message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthServiceError {
    pub message: String,
}

impl AuthServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Signed-in user as known to the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// Authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Profile data attached at sign-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
}

/// Handle returned by [`AuthService::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type SessionCallback = Arc<dyn Fn(AuthChangeEvent, Option<&Session>) + Send + Sync>;

/// Operations consumed from the external identity service
pub trait AuthService: Send + Sync {
    fn sign_in<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<Session, AuthServiceError>>;

    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
        profile: Profile,
    ) -> BoxFuture<'a, Result<Session, AuthServiceError>>;

    fn sign_out(&self) -> BoxFuture<'_, Result<(), AuthServiceError>>;

    fn current_session(&self) -> BoxFuture<'_, Result<Option<Session>, AuthServiceError>>;

    /// Register a callback for session changes. One slot per subscriber.
    fn subscribe(&self, callback: SessionCallback) -> SubscriptionId;

    /// Drop a subscription. Returns `false` if it was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Callback registry that auth service implementations can embed
#[derive(Default)]
pub struct SessionListeners {
    next_id: AtomicU64,
    callbacks: Mutex<HashMap<SubscriptionId, SessionCallback>>,
}

impl SessionListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: SessionCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, callback);
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every callback. The registry lock is released first so
    /// callbacks may subscribe or unsubscribe.
    pub fn notify(&self, event: AuthChangeEvent, session: Option<&Session>) {
        let callbacks: Vec<SessionCallback> = self
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for callback in callbacks {
            callback(event, session);
        }
    }
}

impl std::fmt::Debug for SessionListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionListeners")
            .field("subscribers", &self.len())
            .finish()
    }
}
