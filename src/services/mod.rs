//! External service module
//!
//! This module contains the auth service interface and its in-memory
//! implementation, the auth flow built on top of it, and toast notifications.

pub mod auth;
pub mod auth_flow;
pub mod memory_auth;
pub mod notifications;

// Re-export main types
pub use auth::{
    AuthChangeEvent, AuthService, AuthServiceError, Profile, Session, SessionCallback,
    SessionListeners, SubscriptionId, User,
};
pub use auth_flow::{AuthController, DASHBOARD_PATH};
pub use memory_auth::InMemoryAuthService;
pub use notifications::{Notifications, Toast, ToastVariant};
