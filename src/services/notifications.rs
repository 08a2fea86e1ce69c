//! Toast notifications
//!
//! Fire-and-forget messages for whatever front-end is listening. Recent
//! toasts are also kept so a polling client can catch up.

use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// How many toasts [`Notifications::recent`] keeps
pub const RECENT_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    pub timestamp: DateTime<Utc>,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
            timestamp: Utc::now(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Destructive,
            ..Self::new(title, description)
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}

/// Toast channel shared by the timer and auth flows
#[derive(Debug)]
pub struct Notifications {
    tx: broadcast::Sender<Toast>,
    recent: Mutex<VecDeque<Toast>>,
}

impl Notifications {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self {
            tx,
            recent: Mutex::new(VecDeque::with_capacity(RECENT_CAPACITY)),
        }
    }

    /// Publish a toast. Never fails; having no listeners is fine.
    pub fn notify(&self, toast: Toast) {
        if toast.is_destructive() {
            warn!("Toast: {} - {}", toast.title, toast.description);
        } else {
            info!("Toast: {} - {}", toast.title, toast.description);
        }

        {
            let mut recent = self.recent.lock().unwrap_or_else(PoisonError::into_inner);
            if recent.len() == RECENT_CAPACITY {
                recent.pop_front();
            }
            recent.push_back(toast.clone());
        }

        // Err only means nobody is subscribed
        let _ = self.tx.send(toast);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }

    /// Most recent toasts, oldest first
    pub fn recent(&self) -> Vec<Toast> {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}
