//! In-process auth service
//!
//! Stands in for the hosted identity service during development and tests.
//! Accounts live in memory only.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use chrono::{DateTime, Duration, Utc};
use futures::{future::BoxFuture, FutureExt};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use super::auth::{
    AuthChangeEvent, AuthService, AuthServiceError, Profile, Session, SessionCallback,
    SessionListeners, SubscriptionId, User,
};

pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";
pub const ALREADY_REGISTERED: &str = "User already registered";
pub const UNREACHABLE: &str = "TypeError: Failed to fetch";
pub const TTL_OUT_OF_RANGE: &str = "Session lifetime is out of range";

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password_digest: String,
}

/// Unsalted SHA-256. Fine for an in-process stand-in, not for real credentials.
fn digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Auth service holding accounts and the current session in memory
#[derive(Debug)]
pub struct InMemoryAuthService {
    accounts: Mutex<HashMap<String, Account>>,
    session: Mutex<Option<Session>>,
    listeners: SessionListeners,
    offline: AtomicBool,
    session_ttl: Duration,
}

impl InMemoryAuthService {
    pub fn new(session_ttl: Duration) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            session: Mutex::new(None),
            listeners: SessionListeners::new(),
            offline: AtomicBool::new(false),
            session_ttl,
        }
    }

    /// Simulate the service being unreachable
    pub fn set_offline(&self, offline: bool) {
        info!("In-memory auth service offline={}", offline);
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn ensure_reachable(&self) -> Result<(), AuthServiceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthServiceError::new(UNREACHABLE));
        }
        Ok(())
    }

    fn expiry(&self) -> Result<DateTime<Utc>, AuthServiceError> {
        Utc::now()
            .checked_add_signed(self.session_ttl)
            .ok_or_else(|| AuthServiceError::new(TTL_OUT_OF_RANGE))
    }

    fn open_session(&self, user: User, expires_at: DateTime<Utc>) -> Session {
        let session = Session {
            access_token: Uuid::new_v4().to_string(),
            user,
            expires_at,
        };
        *lock(&self.session) = Some(session.clone());
        self.listeners.notify(AuthChangeEvent::SignedIn, Some(&session));
        session
    }

    fn sign_in_now(&self, email: &str, password: &str) -> Result<Session, AuthServiceError> {
        self.ensure_reachable()?;
        let expires_at = self.expiry()?;

        let key = email.trim().to_lowercase();
        let user = {
            let accounts = lock(&self.accounts);
            match accounts.get(&key) {
                Some(account) if account.password_digest == digest(password) => {
                    account.user.clone()
                }
                _ => {
                    debug!("Rejected sign-in for {}", key);
                    return Err(AuthServiceError::new(INVALID_CREDENTIALS));
                }
            }
        };

        info!("User signed in: {}", user.email);
        Ok(self.open_session(user, expires_at))
    }

    fn sign_up_now(
        &self,
        email: &str,
        password: &str,
        profile: Profile,
    ) -> Result<Session, AuthServiceError> {
        self.ensure_reachable()?;
        let expires_at = self.expiry()?;

        let key = email.trim().to_lowercase();
        let user = {
            let mut accounts = lock(&self.accounts);
            if accounts.contains_key(&key) {
                return Err(AuthServiceError::new(ALREADY_REGISTERED));
            }
            let user = User {
                id: Uuid::new_v4(),
                email: key.clone(),
                name: profile.name,
            };
            accounts.insert(
                key,
                Account {
                    user: user.clone(),
                    password_digest: digest(password),
                },
            );
            user
        };

        info!("User registered: {}", user.email);
        Ok(self.open_session(user, expires_at))
    }

    fn sign_out_now(&self) -> Result<(), AuthServiceError> {
        self.ensure_reachable()?;

        let previous = lock(&self.session).take();
        if let Some(session) = previous {
            info!("User signed out: {}", session.user.email);
            self.listeners.notify(AuthChangeEvent::SignedOut, None);
        }
        Ok(())
    }

    fn current_session_now(&self) -> Result<Option<Session>, AuthServiceError> {
        self.ensure_reachable()?;

        let (current, expired) = {
            let mut session = lock(&self.session);
            if session.as_ref().is_some_and(Session::is_expired) {
                (None, session.take())
            } else {
                (session.clone(), None)
            }
        };

        if let Some(expired) = expired {
            debug!("Session for {} expired", expired.user.email);
            self.listeners.notify(AuthChangeEvent::SignedOut, None);
        }
        Ok(current)
    }
}

impl Default for InMemoryAuthService {
    fn default() -> Self {
        Self::new(Duration::hours(1))
    }
}

impl AuthService for InMemoryAuthService {
    fn sign_in<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<Session, AuthServiceError>> {
        async move { self.sign_in_now(email, password) }.boxed()
    }

    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
        profile: Profile,
    ) -> BoxFuture<'a, Result<Session, AuthServiceError>> {
        async move { self.sign_up_now(email, password, profile) }.boxed()
    }

    fn sign_out(&self) -> BoxFuture<'_, Result<(), AuthServiceError>> {
        async move { self.sign_out_now() }.boxed()
    }

    fn current_session(&self) -> BoxFuture<'_, Result<Option<Session>, AuthServiceError>> {
        async move { self.current_session_now() }.boxed()
    }

    fn subscribe(&self, callback: SessionCallback) -> SubscriptionId {
        self.listeners.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn profile(name: &str) -> Profile {
        Profile {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let auth = InMemoryAuthService::default();

        let session = auth
            .sign_up("Ada@Example.com", "secret1", profile("Ada"))
            .await
            .unwrap();
        assert_eq!(session.user.email, "ada@example.com");
        assert_eq!(session.user.name, "Ada");

        auth.sign_out().await.unwrap();
        assert!(auth.current_session().await.unwrap().is_none());

        let again = auth.sign_in("ada@example.com", "secret1").await.unwrap();
        assert_eq!(again.user.id, session.user.id);
        assert_ne!(again.access_token, session.access_token);
        assert_eq!(auth.current_session().await.unwrap(), Some(again));
    }

    #[tokio::test]
    async fn test_wrong_password_and_duplicate_email() {
        let auth = InMemoryAuthService::default();
        auth.sign_up("ada@example.com", "secret1", profile("Ada"))
            .await
            .unwrap();

        let err = auth.sign_in("ada@example.com", "wrong!").await.unwrap_err();
        assert_eq!(err.message, INVALID_CREDENTIALS);

        let err = auth.sign_in("nobody@example.com", "secret1").await.unwrap_err();
        assert_eq!(err.message, INVALID_CREDENTIALS);

        let err = auth
            .sign_up("ADA@example.com", "another", profile("Ada"))
            .await
            .unwrap_err();
        assert_eq!(err.message, ALREADY_REGISTERED);
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let auth = InMemoryAuthService::default();
        auth.set_offline(true);

        assert_eq!(auth.current_session().await.unwrap_err().message, UNREACHABLE);
        assert!(auth.sign_in("ada@example.com", "secret1").await.is_err());
        assert!(auth.sign_out().await.is_err());

        auth.set_offline(false);
        assert!(auth.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_dropped() {
        let auth = InMemoryAuthService::new(Duration::seconds(-1));
        auth.sign_up("ada@example.com", "secret1", profile("Ada"))
            .await
            .unwrap();
        assert!(auth.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expiry_notifies_signed_out() {
        let auth = InMemoryAuthService::new(Duration::seconds(-1));
        let events = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&events);
        let on_change = move |event: AuthChangeEvent, _: Option<&Session>| {
            seen.lock().unwrap().push(event);
        };
        auth.subscribe(Arc::new(on_change));

        auth.sign_up("ada@example.com", "secret1", profile("Ada"))
            .await
            .unwrap();
        assert!(auth.current_session().await.unwrap().is_none());
        // Already dropped, no second notification
        assert!(auth.current_session().await.unwrap().is_none());

        assert_eq!(
            *events.lock().unwrap(),
            vec![AuthChangeEvent::SignedIn, AuthChangeEvent::SignedOut]
        );
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_is_an_error() {
        let auth = InMemoryAuthService::new(Duration::minutes(1_000_000_000_000));

        let err = auth
            .sign_up("ada@example.com", "secret1", profile("Ada"))
            .await
            .unwrap_err();
        assert_eq!(err.message, TTL_OUT_OF_RANGE);
        assert!(auth.current_session().await.unwrap().is_none());

        // The failed sign-up left no account behind
        let err = auth.sign_in("ada@example.com", "secret1").await.unwrap_err();
        assert_eq!(err.message, TTL_OUT_OF_RANGE);
    }

    #[tokio::test]
    async fn test_listeners_see_sign_in_and_out() {
        let auth = InMemoryAuthService::default();
        let events = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&events);
        let on_change = move |event: AuthChangeEvent, session: Option<&Session>| {
            let name = session.map(|s| s.user.name.clone());
            seen.lock().unwrap().push((event, name));
        };
        let id = auth.subscribe(Arc::new(on_change));

        auth.sign_up("ada@example.com", "secret1", profile("Ada"))
            .await
            .unwrap();
        auth.sign_out().await.unwrap();
        // Signing out twice only notifies once
        auth.sign_out().await.unwrap();

        assert!(auth.unsubscribe(id));
        assert_eq!(auth.subscriber_count(), 0);
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                (AuthChangeEvent::SignedIn, Some("Ada".to_string())),
                (AuthChangeEvent::SignedOut, None),
            ]
        );
    }
}
