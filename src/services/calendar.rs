use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};

use crate::db::models::{CalendarEvent, CalendarEventPayload};
use crate::db::{CalendarEventRepository, DayMemoRepository};
use crate::error::{AppError, AppResult};
use crate::services::layout::{self, MonthGrid};
use crate::AppState;

/// Orchestration around the work calendar: validates and admits event
/// writes against the per-day cap, assembles the month view, and runs
/// the retention sweep. All layout math lives in [`layout`]; this module
/// owns the I/O around it.
pub struct CalendarService;

impl CalendarService {
    /// First day of a requested month, rejecting out-of-range input
    /// before it reaches date arithmetic.
    pub fn first_of_month(year: i32, month: u32) -> AppResult<NaiveDate> {
        if !(1..=12).contains(&month) {
            return Err(AppError::BadRequest(format!("Invalid month: {}", month)));
        }
        if !(1970..=9999).contains(&year) {
            return Err(AppError::BadRequest(format!("Invalid year: {}", year)));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid month: {}-{}", year, month)))
    }

    /// Inclusive last day of the month starting at `first`.
    fn last_of_month(first: NaiveDate) -> NaiveDate {
        first + chrono::Days::new(u64::from(layout::days_in_month(first)) - 1)
    }

    fn validate_payload(payload: &CalendarEventPayload) -> AppResult<()> {
        if payload.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if payload.category.trim().is_empty() {
            return Err(AppError::Validation("Category is required".to_string()));
        }
        if payload.end_date < payload.start_date {
            return Err(AppError::Validation(
                "End date must not be before start date".to_string(),
            ));
        }
        Ok(())
    }

    /// Reject the write if any day of the payload's range would exceed the
    /// per-day event cap. The error names the first over-full date.
    fn admit(
        events: &[CalendarEvent],
        payload: &CalendarEventPayload,
        exclude_id: Option<&str>,
        cap: usize,
    ) -> AppResult<()> {
        if let Some(day) = layout::first_over_capacity(
            events,
            payload.start_date,
            payload.end_date,
            exclude_id,
            cap,
        ) {
            return Err(AppError::Validation(format!(
                "Too many events on {}: at most {} per day",
                day.format("%Y-%m-%d"),
                cap
            )));
        }
        Ok(())
    }

    /// The fully derived month view for one employee: grid cells with
    /// capped, lane-assigned, color-mapped items.
    pub async fn month_view(
        state: &Arc<AppState>,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> AppResult<MonthGrid> {
        let first = Self::first_of_month(year, month)?;

        let events = CalendarEventRepository::list_for_employee(&state.db, employee_id).await?;
        let memos = DayMemoRepository::list_for_employee(&state.db, employee_id).await?;
        let today = Utc::now().date_naive();

        Ok(layout::build_month(
            first,
            today,
            &events,
            &memos,
            &state.config.calendar,
        ))
    }

    /// Raw events intersecting the requested month, undecorated.
    pub async fn month_events(
        state: &Arc<AppState>,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> AppResult<Vec<CalendarEvent>> {
        let first = Self::first_of_month(year, month)?;
        let last = Self::last_of_month(first);

        let events = CalendarEventRepository::list_for_employee(&state.db, employee_id).await?;
        Ok(events
            .into_iter()
            .filter(|e| e.start_date <= last && e.end_date >= first)
            .collect())
    }

    pub async fn create_event(
        state: &Arc<AppState>,
        employee_id: &str,
        payload: CalendarEventPayload,
    ) -> AppResult<CalendarEvent> {
        Self::validate_payload(&payload)?;

        let events = CalendarEventRepository::list_for_employee(&state.db, employee_id).await?;
        Self::admit(&events, &payload, None, state.config.calendar.day_event_cap)?;

        CalendarEventRepository::create(&state.db, employee_id, &payload).await
    }

    pub async fn update_event(
        state: &Arc<AppState>,
        employee_id: &str,
        id: &str,
        payload: CalendarEventPayload,
    ) -> AppResult<CalendarEvent> {
        Self::validate_payload(&payload)?;

        let events = CalendarEventRepository::list_for_employee(&state.db, employee_id).await?;
        Self::admit(
            &events,
            &payload,
            Some(id),
            state.config.calendar.day_event_cap,
        )?;

        CalendarEventRepository::update(&state.db, employee_id, id, &payload)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    pub async fn delete_event(state: &Arc<AppState>, employee_id: &str, id: &str) -> AppResult<()> {
        let deleted = CalendarEventRepository::delete(&state.db, employee_id, id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        Ok(())
    }

    /// Delete every event the employee has keyed into the given month.
    pub async fn clear_month(
        state: &Arc<AppState>,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> AppResult<u64> {
        let first = Self::first_of_month(year, month)?;
        let last = Self::last_of_month(first);

        CalendarEventRepository::delete_month(&state.db, employee_id, first, last).await
    }

    /// Cutoff date for the retention sweep: ranges that ended before this
    /// are dropped.
    pub fn retention_cutoff(today: NaiveDate, retention_months: u32) -> NaiveDate {
        today
            .checked_sub_months(Months::new(retention_months))
            .unwrap_or(today)
    }

    /// One retention pass over all employees. Returns rows removed.
    pub async fn prune_expired(state: &Arc<AppState>) -> AppResult<u64> {
        let cutoff = Self::retention_cutoff(
            Utc::now().date_naive(),
            state.config.calendar.retention_months,
        );
        CalendarEventRepository::delete_ended_before(&state.db, cutoff).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payload(title: &str, category: &str, start: NaiveDate, end: NaiveDate) -> CalendarEventPayload {
        CalendarEventPayload {
            title: title.to_string(),
            category: category.to_string(),
            body: None,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn validation_requires_title_and_category() {
        let d = date(2025, 3, 1);
        assert!(matches!(
            CalendarService::validate_payload(&payload("  ", "meeting", d, d)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            CalendarService::validate_payload(&payload("standup", "", d, d)),
            Err(AppError::Validation(_))
        ));
        assert!(CalendarService::validate_payload(&payload("standup", "meeting", d, d)).is_ok());
    }

    #[test]
    fn validation_rejects_inverted_range() {
        let err = CalendarService::validate_payload(&payload(
            "trip",
            "trip",
            date(2025, 3, 10),
            date(2025, 3, 9),
        ));
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn first_of_month_rejects_out_of_range() {
        assert!(CalendarService::first_of_month(2025, 0).is_err());
        assert!(CalendarService::first_of_month(2025, 13).is_err());
        assert!(CalendarService::first_of_month(12025, 1).is_err());
        assert_eq!(
            CalendarService::first_of_month(2025, 2).unwrap(),
            date(2025, 2, 1)
        );
    }

    #[test]
    fn last_of_month_handles_lengths() {
        assert_eq!(
            CalendarService::last_of_month(date(2024, 2, 1)),
            date(2024, 2, 29)
        );
        assert_eq!(
            CalendarService::last_of_month(date(2025, 12, 1)),
            date(2025, 12, 31)
        );
    }

    #[test]
    fn retention_cutoff_crosses_year_boundaries() {
        assert_eq!(
            CalendarService::retention_cutoff(date(2025, 3, 15), 24),
            date(2023, 3, 15)
        );
        assert_eq!(
            CalendarService::retention_cutoff(date(2025, 1, 31), 2),
            date(2024, 11, 30)
        );
    }

    #[test]
    fn admission_error_names_the_failing_date() {
        use crate::db::models::CalendarEvent;
        use chrono::NaiveDateTime;

        let d = date(2025, 7, 15);
        let ts = NaiveDateTime::parse_from_str("2024-01-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let existing: Vec<CalendarEvent> = (0..3)
            .map(|i| CalendarEvent {
                id: format!("e{}", i),
                employee_id: "emp-1".to_string(),
                title: "busy".to_string(),
                category: "meeting".to_string(),
                body: String::new(),
                start_date: d,
                end_date: d,
                day_key: d.format("%Y-%m-%d").to_string(),
                created_at: ts,
                updated_at: ts,
            })
            .collect();

        let err = CalendarService::admit(&existing, &payload("one more", "meeting", d, d), None, 3);
        match err {
            Err(AppError::Validation(msg)) => assert!(msg.contains("2025-07-15")),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }
}
