//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tracing::info;

use super::TimerState;
use crate::{
    error::AppError,
    services::{AuthController, AuthService, Notifications, Toast},
    timer::{StudySession, TimerEngine},
    utils::format_duration,
};

/// Main application state shared by all handlers
#[derive(Debug)]
pub struct AppState {
    /// Session timer
    pub timer: TimerEngine,
    /// Auth flow in front of the auth service
    pub auth: AuthController,
    /// Toast channel
    pub notifications: Arc<Notifications>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        tick_period: Duration,
        auth_service: Arc<dyn AuthService>,
    ) -> Self {
        let notifications = Arc::new(Notifications::new());

        Self {
            timer: TimerEngine::new(tick_period),
            auth: AuthController::new(auth_service, Arc::clone(&notifications)),
            notifications,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Remember the latest user action for the status endpoint
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Start or resume the timer, toasting when no subject was chosen
    pub fn start_tracking(&self, subject: &str, topic: Option<&str>) -> Result<TimerState, AppError> {
        self.record_action("timer-start");
        self.timer.start(subject, topic).map_err(|e| {
            self.notifications
                .notify(Toast::destructive(e.title(), e.description()));
            AppError::from(e)
        })
    }

    pub fn pause_tracking(&self) -> TimerState {
        self.record_action("timer-pause");
        self.timer.pause()
    }

    pub fn reset_tracking(&self) -> TimerState {
        self.record_action("timer-reset");
        self.timer.reset()
    }

    /// Save the current session and report it. Nothing is persisted.
    pub fn save_session(&self) -> Result<StudySession, AppError> {
        self.record_action("timer-save");
        match self.timer.save() {
            Ok(session) => {
                self.notifications
                    .notify(Toast::new("Study session saved", session.summary()));
                Ok(session)
            }
            Err(e) => {
                self.notifications
                    .notify(Toast::destructive(e.title(), e.description()));
                Err(e.into())
            }
        }
    }

    /// Report a feature that is not available yet
    pub fn coming_soon(&self, feature: &str, description: &str) {
        info!("Coming-soon feature requested: {}", feature);
        self.notifications.notify(Toast::new(feature, description));
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_duration(self.start_time.elapsed().as_secs())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Stop the tick task and drop the auth subscription
    pub fn shutdown(&self) {
        self.timer.reset();
        self.auth.teardown();
        info!("Application state shut down");
    }
}
