//! Registration and feedback models
//!
//! The event listing does not carry registration counts; they are derived
//! from the per-event registration list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::models::event::{timestamp, EventId};

/// Registration state as stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// A player's registration for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: EventId,
    pub status: RegistrationStatus,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub registered_at: DateTime<Utc>,
    /// Only present on the per-event listing
    #[serde(default)]
    pub user_name: Option<String>,
}

impl Registration {
    /// Whether the registration takes a spot
    pub fn holds_spot(&self) -> bool {
        self.status == RegistrationStatus::Registered
    }
}

/// Number of registrations holding a spot
pub fn count_registered(registrations: &[Registration]) -> i32 {
    let count = registrations.iter().filter(|r| r.holds_spot()).count();
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Post-event rating left by a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub event_id: EventId,
    /// 1 to 5 stars
    pub rating: i32,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_name: Option<String>,
}

/// Mean rating, `None` when there is no feedback
pub fn average_rating(feedback: &[Feedback]) -> Option<f64> {
    if feedback.is_empty() {
        return None;
    }
    let total: i64 = feedback.iter().map(|f| i64::from(f.rating)).sum();
    Some(total as f64 / feedback.len() as f64)
}
