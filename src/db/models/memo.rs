use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A freeform note pinned to a single calendar day. Memos render alongside
/// events in a day cell but carry no category, range, or capacity
/// semantics.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DayMemo {
    pub id: String,
    pub employee_id: String,
    pub memo_date: NaiveDate,
    pub body: String,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDayMemo {
    pub memo_date: NaiveDate,
    pub body: String,
}
