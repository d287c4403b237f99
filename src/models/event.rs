//! Event model

use std::fmt;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use crate::utils::logging::log_malformed_record;

/// Records created within this many days count as new
pub const NEW_EVENT_WINDOW_DAYS: i64 = 7;

/// Opaque event identifier, numeric or textual depending on the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Int(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Int(id) => write!(f, "{}", id),
            EventId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        EventId::Int(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId::Text(id.to_string())
    }
}

/// Organizer summary embedded in event payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organizer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Event snapshot as received from the event source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    #[serde(default = "default_max_participants")]
    pub max_participants: i32,
    #[serde(default, deserialize_with = "nullable_count")]
    pub registered_count: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub entry_fee: Option<f64>,
    #[serde(default)]
    pub organizer: Option<Organizer>,
}

/// Lifecycle status derived from the wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Cancelled,
    Upcoming,
    Live,
    Completed,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Cancelled => write!(f, "cancelled"),
            EventStatus::Upcoming => write!(f, "upcoming"),
            EventStatus::Live => write!(f, "live"),
            EventStatus::Completed => write!(f, "completed"),
        }
    }
}

fn default_max_participants() -> i32 {
    100
}

fn default_active() -> bool {
    true
}

fn nullable_count<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(0))
}

/// Backend timestamps come either as RFC 3339 or as naive ISO strings in UTC
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

impl EventRecord {
    /// Start of the event day; time-of-day is display only
    pub fn starts_at(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.date.and_time(NaiveTime::MIN))
    }

    /// Registered share of capacity, `None` for records without a capacity
    pub fn fill_ratio(&self) -> Option<f64> {
        if self.max_participants <= 0 {
            None
        } else {
            Some(self.registered_count as f64 / self.max_participants as f64)
        }
    }

    /// Fill ratio of at least 80%. Records without a capacity count as filled.
    pub fn is_filling_up(&self) -> bool {
        let registered = i64::from(self.registered_count);
        let capacity = i64::from(self.max_participants);
        capacity <= 0 || registered * 5 >= capacity * 4
    }

    /// Registered share of capacity as a rounded percentage
    pub fn registration_progress(&self) -> u32 {
        if self.max_participants <= 0 {
            log_malformed_record(&self.id, "max_participants", i64::from(self.max_participants));
            return 0;
        }
        if self.registered_count < 0 {
            log_malformed_record(&self.id, "registered_count", i64::from(self.registered_count));
            return 0;
        }

        let registered = u64::from(self.registered_count.unsigned_abs());
        let capacity = u64::from(self.max_participants.unsigned_abs());
        // round half up, integer only
        ((200 * registered + capacity) / (2 * capacity)) as u32
    }

    pub fn is_full(&self) -> bool {
        self.registered_count >= self.max_participants
    }

    pub fn is_new(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at <= Duration::days(NEW_EVENT_WINDOW_DAYS)
    }

    pub fn spots_left(&self) -> u32 {
        (i64::from(self.max_participants) - i64::from(self.registered_count)).max(0) as u32
    }

    /// Absent or zero entry fee
    pub fn is_free(&self) -> bool {
        self.entry_fee.map_or(true, |fee| fee <= 0.0)
    }

    /// Status at `now`. Not cached; callers re-evaluate on every refresh.
    pub fn status(&self, now: DateTime<Utc>) -> EventStatus {
        if !self.is_active {
            return EventStatus::Cancelled;
        }

        let starts_at = self.starts_at();
        if starts_at > now {
            EventStatus::Upcoming
        } else if now <= starts_at + Duration::hours(24) {
            EventStatus::Live
        } else {
            EventStatus::Completed
        }
    }

    /// Free-text match over title, description, category and location.
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        use crate::utils::helpers::contains_ignore_case;

        contains_ignore_case(&self.title, needle)
            || self.description.as_deref().map_or(false, |d| contains_ignore_case(d, needle))
            || self.category.as_deref().map_or(false, |c| contains_ignore_case(c, needle))
            || contains_ignore_case(&self.location, needle)
    }
}
