//! Filter criteria model
//!
//! User supplied criteria for narrowing and ordering the event catalog. All
//! criteria are optional and AND-combined; an unset criterion matches every
//! record.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::models::event::EventRecord;
use crate::utils::errors::GameHubError;
use crate::utils::helpers::normalize_filter_value;

/// Calendar-relative date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateBucket {
    Today,
    Tomorrow,
    ThisWeek,
    NextWeek,
    ThisMonth,
}

/// Capacity or freshness based filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    Available,
    Full,
    New,
}

/// Ordering applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    DateAsc,
    DateDesc,
    NameAsc,
    NameDesc,
    ParticipantsAsc,
    ParticipantsDesc,
}

fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

impl DateBucket {
    pub const ALL: [DateBucket; 5] = [
        DateBucket::Today,
        DateBucket::Tomorrow,
        DateBucket::ThisWeek,
        DateBucket::NextWeek,
        DateBucket::ThisMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateBucket::Today => "today",
            DateBucket::Tomorrow => "tomorrow",
            DateBucket::ThisWeek => "this-week",
            DateBucket::NextWeek => "next-week",
            DateBucket::ThisMonth => "this-month",
        }
    }

    /// Whether `event_date` falls in this bucket relative to `now`.
    ///
    /// Weeks start on Sunday, so "this week" runs from today through the
    /// upcoming Saturday and "next week" is the seven days after that.
    pub fn matches(&self, event_date: NaiveDate, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        let week_end = shift(today, 6 - i64::from(today.weekday().num_days_from_sunday()));

        match self {
            DateBucket::Today => event_date == today,
            DateBucket::Tomorrow => shift(today, 1) == Some(event_date),
            DateBucket::ThisWeek => {
                week_end.map_or(false, |end| event_date >= today && event_date <= end)
            }
            DateBucket::NextWeek => match (week_end.and_then(|e| shift(e, 1)), week_end.and_then(|e| shift(e, 7))) {
                (Some(start), Some(end)) => event_date >= start && event_date <= end,
                _ => false,
            },
            DateBucket::ThisMonth => {
                event_date.year() == today.year() && event_date.month() == today.month()
            }
        }
    }
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Full => "full",
            Availability::New => "new",
        }
    }

    /// `available` and `full` split on an 80% fill ratio, inclusive on the
    /// `full` side. `new` looks at the creation timestamp.
    pub fn matches(&self, record: &EventRecord, now: DateTime<Utc>) -> bool {
        match self {
            Availability::Available => !record.is_filling_up(),
            Availability::Full => record.is_filling_up(),
            Availability::New => record.is_new(now),
        }
    }
}

thread_local! {
    /// Root-locale collator at secondary strength: accents order letters the
    /// way a dictionary does, case is ignored.
    static TITLE_COLLATOR: Option<Collator> = {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        Collator::try_new(&Default::default(), options)
            .map_err(|e| warn!(error = ?e, "Title collator unavailable, ordering by folded code points"))
            .ok()
    };
}

/// Locale-aware, case-insensitive title ordering
fn collate(a: &str, b: &str) -> Ordering {
    TITLE_COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase)),
    })
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateAsc => "date-asc",
            SortKey::DateDesc => "date-desc",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::ParticipantsAsc => "participants-asc",
            SortKey::ParticipantsDesc => "participants-desc",
        }
    }

    pub fn compare(&self, a: &EventRecord, b: &EventRecord) -> Ordering {
        match self {
            SortKey::DateAsc => a.date.cmp(&b.date),
            SortKey::DateDesc => b.date.cmp(&a.date),
            SortKey::NameAsc => collate(&a.title, &b.title),
            SortKey::NameDesc => collate(&b.title, &a.title),
            SortKey::ParticipantsAsc => a.registered_count.cmp(&b.registered_count),
            SortKey::ParticipantsDesc => b.registered_count.cmp(&a.registered_count),
        }
    }

    /// Stable sort; ties keep their relative order
    pub fn sort(&self, records: &mut [EventRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

macro_rules! impl_keyword {
    ($ty:ty, $what:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = GameHubError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|candidate| candidate.as_str() == wanted)
                    .ok_or_else(|| GameHubError::InvalidInput(format!("Unknown {}: {}", $what, s)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_keyword!(DateBucket, "date bucket", [
    DateBucket::Today,
    DateBucket::Tomorrow,
    DateBucket::ThisWeek,
    DateBucket::NextWeek,
    DateBucket::ThisMonth,
]);

impl_keyword!(Availability, "availability", [
    Availability::Available,
    Availability::Full,
    Availability::New,
]);

impl_keyword!(SortKey, "sort key", [
    SortKey::DateAsc,
    SortKey::DateDesc,
    SortKey::NameAsc,
    SortKey::NameDesc,
    SortKey::ParticipantsAsc,
    SortKey::ParticipantsDesc,
]);

/// Filter criteria for the event catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Exact, case-insensitive category
    pub category: Option<String>,
    /// Case-insensitive location substring
    pub location: Option<String>,
    pub date_bucket: Option<DateBucket>,
    pub availability: Option<Availability>,
    /// Case-insensitive substring over title, description, category, location
    pub search_text: Option<String>,
    pub sort_key: Option<SortKey>,
}

impl FilterCriteria {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_date_bucket(mut self, bucket: DateBucket) -> Self {
        self.date_bucket = Some(bucket);
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = Some(availability);
        self
    }

    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn with_sort_key(mut self, key: SortKey) -> Self {
        self.sort_key = Some(key);
        self
    }

    /// Build criteria from raw form or query values.
    ///
    /// Recognised keys are `category`, `location`, `date`, `availability`,
    /// `search` and `sort`. Unknown keys and unrecognised keyword values are
    /// dropped, so they filter nothing.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut criteria = Self::default();

        for (key, value) in params {
            match key {
                "category" => criteria.category = Some(value.to_string()),
                "location" => criteria.location = Some(value.to_string()),
                "search" => criteria.search_text = Some(value.to_string()),
                "date" => criteria.date_bucket = parse_keyword(key, value),
                "availability" => criteria.availability = parse_keyword(key, value),
                "sort" => criteria.sort_key = parse_keyword(key, value),
                _ => debug!(key = key, "Ignoring unknown filter parameter"),
            }
        }

        criteria
    }

    /// Non-empty criteria as `(key, value)` pairs using the same keys as
    /// [`FilterCriteria::from_params`].
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        let text = [
            ("category", &self.category),
            ("location", &self.location),
            ("search", &self.search_text),
        ];
        for (key, value) in text {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((key, value.to_string()));
            }
        }
        if let Some(bucket) = self.date_bucket {
            params.push(("date", bucket.to_string()));
        }
        if let Some(availability) = self.availability {
            params.push(("availability", availability.to_string()));
        }
        if let Some(sort) = self.sort_key {
            params.push(("sort", sort.to_string()));
        }

        params
    }

    /// Lowercase the text criteria once ahead of a filtering pass
    pub fn prepare(&self) -> PreparedFilter {
        PreparedFilter {
            category: self.category.as_deref().and_then(normalize_filter_value),
            location: self.location.as_deref().and_then(normalize_filter_value),
            date_bucket: self.date_bucket,
            availability: self.availability,
            search_text: self.search_text.as_deref().and_then(normalize_filter_value),
        }
    }

    /// Returns true if the record satisfies every supplied criterion.
    pub fn matches(&self, record: &EventRecord, now: DateTime<Utc>) -> bool {
        self.prepare().matches(record, now)
    }
}

fn parse_keyword<T: FromStr<Err = GameHubError>>(key: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(key = key, error = %e, "Ignoring unrecognised filter value");
            None
        }
    }
}

/// Criteria with text fields normalized for matching
#[derive(Debug, Clone, Default)]
pub struct PreparedFilter {
    category: Option<String>,
    location: Option<String>,
    date_bucket: Option<DateBucket>,
    availability: Option<Availability>,
    search_text: Option<String>,
}

impl PreparedFilter {
    pub fn matches(&self, record: &EventRecord, now: DateTime<Utc>) -> bool {
        if let Some(ref category) = self.category {
            let record_category = record.category.as_deref().and_then(normalize_filter_value);
            if record_category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }

        if let Some(ref location) = self.location {
            if !record.location.to_lowercase().contains(location.as_str()) {
                return false;
            }
        }

        if let Some(bucket) = self.date_bucket {
            if !bucket.matches(record.date, now) {
                return false;
            }
        }

        if let Some(availability) = self.availability {
            if !availability.matches(record, now) {
                return false;
            }
        }

        if let Some(ref text) = self.search_text {
            if !record.matches_text(text) {
                return false;
            }
        }

        true
    }
}
