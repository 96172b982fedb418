use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Work calendar event models
// ============================================================================

/// A work-calendar event. `start_date` and `end_date` are inclusive
/// calendar dates with no time-of-day component; `day_key` is the
/// canonical `YYYY-MM-DD` string of the start date, the key under which
/// the event is grouped in per-day lookups.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub employee_id: String,
    pub title: String,
    pub category: String,
    pub body: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_key: String,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CalendarEvent {
    /// Whether the event spans more than one day.
    pub fn is_range(&self) -> bool {
        self.start_date != self.end_date
    }
}

/// Payload for creating or replacing an event. The id and `day_key` are
/// derived server-side; an update keeps the existing id and overwrites
/// every other field (last write wins).
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEventPayload {
    pub title: String,
    pub category: String,
    pub body: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
