//! Event fixtures for catalog tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use GameHub::models::{EventId, EventRecord, Organizer};

/// Fixed reference instant: Wednesday 2025-10-15 14:00 UTC
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 15, 14, 0, 0).unwrap()
}

/// Builder for test event records
#[derive(Debug, Clone)]
pub struct EventBuilder {
    record: EventRecord,
}

impl EventBuilder {
    pub fn new(id: i64, title: &str) -> Self {
        let now = reference_now();
        Self {
            record: EventRecord {
                id: EventId::Int(id),
                title: title.to_string(),
                description: Some(format!("{} tournament", title)),
                category: Some("esports".to_string()),
                date: now.date_naive(),
                time: "18:00".to_string(),
                location: "Online Gaming Arena".to_string(),
                max_participants: 64,
                registered_count: 0,
                is_active: true,
                created_at: now - Duration::days(30),
                entry_fee: None,
                organizer: Some(Organizer {
                    id: 1,
                    name: Name().fake(),
                    email: Some(SafeEmail().fake()),
                    role: Some("organizer".to_string()),
                }),
            },
        }
    }

    pub fn days_ahead(mut self, days: i64) -> Self {
        self.record.date = reference_now().date_naive() + Duration::days(days);
        self
    }

    pub fn capacity(mut self, max: i32, registered: i32) -> Self {
        self.record.max_participants = max;
        self.record.registered_count = registered;
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.record.category = Some(category.to_string());
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.record.location = location.to_string();
        self
    }

    pub fn created_days_ago(mut self, days: i64) -> Self {
        self.record.created_at = reference_now() - Duration::days(days);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.record.is_active = false;
        self
    }

    pub fn build(self) -> EventRecord {
        self.record
    }
}

/// `count` records titled "Match 01".."Match NN", one day apart
pub fn numbered_events(count: i64) -> Vec<EventRecord> {
    (1..=count)
        .map(|i| EventBuilder::new(i, &format!("Match {:02}", i)).days_ahead(i).build())
        .collect()
}

/// Backend JSON for an event, as the GameHub API serializes it
pub fn event_json(id: i64, title: &str, category: &str, date: &str, max: i32) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{} for gaming enthusiasts", title),
        "category": category,
        "date": date,
        "time": "18:00",
        "location": "Test Gaming Arena",
        "max_participants": max,
        "organizer_id": 1,
        "is_active": true,
        "created_at": "2025-10-01T12:00:00.000000",
        "organizer": {
            "id": 1,
            "name": "Test Organizer",
            "email": "organizer@test.com",
            "role": "organizer",
            "is_active": true,
            "created_at": "2025-09-01T08:00:00"
        }
    })
}

/// Backend JSON for a registration row
pub fn registration_json(id: i64, event_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "user_id": id + 100,
        "event_id": event_id,
        "status": status,
        "registered_at": "2025-10-10T09:30:00.000000",
        "user_name": format!("Player {}", id)
    })
}
