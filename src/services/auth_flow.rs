//! Auth flow: validation, in-flight guard and user-facing reporting around
//! the auth service.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError, RwLock,
};

use tracing::{debug, error, info, warn};

use super::{
    auth::{AuthChangeEvent, AuthService, Profile, Session, SubscriptionId},
    notifications::{Notifications, Toast},
};
use crate::{
    error::{AppError, ValidationError},
    validation::{LoginForm, RegisterForm},
};

/// Where the client goes after signing in or up
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Clears the in-flight flag on every exit path
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Front door to the auth service for the dashboard
pub struct AuthController {
    service: Arc<dyn AuthService>,
    notifications: Arc<Notifications>,
    in_flight: AtomicBool,
    current: Arc<RwLock<Option<Session>>>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl AuthController {
    pub fn new(service: Arc<dyn AuthService>, notifications: Arc<Notifications>) -> Self {
        Self {
            service,
            notifications,
            in_flight: AtomicBool::new(false),
            current: Arc::new(RwLock::new(None)),
            subscription: Mutex::new(None),
        }
    }

    /// Load the existing session and start mirroring session changes.
    ///
    /// An unreachable service is reported but not fatal.
    pub async fn initialize(&self) {
        {
            let mut subscription = self
                .subscription
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if subscription.is_none() {
                let mirror = Arc::clone(&self.current);
                let on_change = move |event: AuthChangeEvent, session: Option<&Session>| {
                    debug!("Auth state changed: {:?}", event);
                    let mut current = mirror.write().unwrap_or_else(PoisonError::into_inner);
                    *current = match event {
                        AuthChangeEvent::SignedIn => session.cloned(),
                        AuthChangeEvent::SignedOut => None,
                    };
                };
                *subscription = Some(self.service.subscribe(Arc::new(on_change)));
            }
        }

        match self.service.current_session().await {
            Ok(session) => {
                if let Some(session) = &session {
                    info!("Restored session for {}", session.user.email);
                }
                self.set_current(session);
            }
            Err(e) => {
                error!("Error fetching session: {}", e);
                self.notifications.notify(Toast::destructive(
                    "Connection Error",
                    "Could not connect to authentication service. Please try again later.",
                ));
            }
        }
    }

    /// Stop mirroring session changes
    pub fn teardown(&self) {
        let id = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(id) = id {
            if !self.service.unsubscribe(id) {
                warn!("Auth subscription was already removed");
            }
        }
    }

    /// The mirrored session, if it has not expired
    pub fn current_session(&self) -> Option<Session> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().is_some_and(Session::is_expired) {
            debug!("Mirrored session expired");
            *current = None;
        }
        current.clone()
    }

    /// Whether a submission is pending
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn sign_in(&self, form: &LoginForm) -> Result<Session, AppError> {
        form.validate()
            .into_result()
            .map_err(ValidationError::Form)?;
        let _guard = self.begin()?;

        match self.service.sign_in(&form.email, &form.password).await {
            Ok(session) => {
                self.set_current(Some(session.clone()));
                self.notifications.notify(Toast::new(
                    "Logged in successfully",
                    "Welcome back to StudyBuddy!",
                ));
                Ok(session)
            }
            Err(raw) => {
                error!("Sign in error: {}", raw);
                Err(self.report(
                    "Error logging in",
                    AppError::classify(&raw, "An error occurred during login."),
                ))
            }
        }
    }

    pub async fn sign_up(&self, form: &RegisterForm) -> Result<Session, AppError> {
        form.validate()
            .into_result()
            .map_err(ValidationError::Form)?;
        let _guard = self.begin()?;

        debug!("Attempting to sign up: {}", form.email);
        let profile = Profile {
            name: form.name.trim().to_string(),
        };
        match self.service.sign_up(&form.email, &form.password, profile).await {
            Ok(session) => {
                self.set_current(Some(session.clone()));
                self.notifications.notify(Toast::new(
                    "Account created",
                    "Your account has been created successfully! Please check your email for verification.",
                ));
                Ok(session)
            }
            Err(raw) => {
                error!("Sign up error: {}", raw);
                Err(self.report(
                    "Error creating account",
                    AppError::classify(&raw, "An error occurred during registration."),
                ))
            }
        }
    }

    pub async fn sign_out(&self) -> Result<(), AppError> {
        let _guard = self.begin()?;

        match self.service.sign_out().await {
            Ok(()) => {
                self.set_current(None);
                self.notifications.notify(Toast::new(
                    "Logged out",
                    "You have been logged out successfully.",
                ));
                Ok(())
            }
            Err(raw) => {
                error!("Sign out error: {}", raw);
                Err(self.report(
                    "Error logging out",
                    AppError::classify(&raw, "An error occurred during logout."),
                ))
            }
        }
    }

    fn begin(&self) -> Result<InFlightGuard<'_>, AppError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| AppError::InFlight)?;
        Ok(InFlightGuard(&self.in_flight))
    }

    fn set_current(&self, session: Option<Session>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn report(&self, title: &str, err: AppError) -> AppError {
        self.notifications.notify(Toast::destructive(title, err.to_string()));
        err
    }
}

impl std::fmt::Debug for AuthController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthController")
            .field("in_flight", &self.is_busy())
            .field("signed_in", &self.current_session().is_some())
            .finish()
    }
}
