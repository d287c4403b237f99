//! Data models module
//!
//! This module contains the event records, registrations and filter criteria used throughout the catalog

pub mod event;
pub mod filter;
pub mod registration;

// Re-export commonly used models
pub use event::{EventRecord, EventId, EventStatus, Organizer};
pub use filter::{FilterCriteria, DateBucket, Availability, SortKey, PreparedFilter};
pub use registration::{Registration, RegistrationStatus, Feedback, count_registered, average_rating};
