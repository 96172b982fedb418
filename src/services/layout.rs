//! Calendar layout engine.
//!
//! Pure date-only computations behind the month view:
//! - month grid generation (Sunday-first, padded to full weeks)
//! - event-to-day intersection with start/end-of-range flags
//! - per-cell capping with range events prioritized
//! - lane assignment for visual continuity of multi-day bars
//! - category -> color/label mapping and title truncation
//!
//! Everything here works on `NaiveDate` values; callers strip any
//! time-of-day component before reaching this module. Interval checks
//! against full datetimes are off by one around midnight boundaries.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::config::CalendarConfig;
use crate::db::models::{CalendarEvent, DayMemo};

/// Display metadata for an event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub color: &'static str,
    pub label: &'static str,
}

/// Total mapping from category identifier to display color and label.
/// Unknown or empty categories fall back to a neutral style instead of
/// failing the render.
pub fn category_style(category: &str) -> CategoryStyle {
    match category {
        "meeting" => CategoryStyle {
            color: "#3b82f6",
            label: "Meeting",
        },
        "trip" => CategoryStyle {
            color: "#10b981",
            label: "Business trip",
        },
        "leave" => CategoryStyle {
            color: "#f59e0b",
            label: "Leave",
        },
        _ => CategoryStyle {
            color: "#9ca3af",
            label: "Other",
        },
    }
}

/// Number of days in the month starting at `first_of_month`, computed as
/// "first of next month minus one day".
pub fn days_in_month(first_of_month: NaiveDate) -> u32 {
    first_of_month
        .checked_add_months(Months::new(1))
        .and_then(|next_first| next_first.pred_opt())
        // unreachable for any date a caller can construct below chrono's
        // maximum year; December always has 31 days
        .map_or(31, |last| last.day())
}

/// All cell dates for the month grid containing `first_of_month`:
/// enough trailing days of the previous month to align the 1st to its
/// weekday column, every day of the month, then leading days of the
/// next month only until the total is a multiple of 7.
pub fn grid_dates(first_of_month: NaiveDate) -> Vec<NaiveDate> {
    let lead = u64::from(first_of_month.weekday().num_days_from_sunday());
    let grid_start = first_of_month - Days::new(lead);

    let mut total = lead + u64::from(days_in_month(first_of_month));
    if total % 7 != 0 {
        total += 7 - total % 7;
    }

    grid_start.iter_days().take(total as usize).collect()
}

/// One event's relationship to a single day cell.
#[derive(Debug, Clone, Copy)]
pub struct DaySpan<'a> {
    pub event: &'a CalendarEvent,
    pub starts_here: bool,
    pub ends_here: bool,
}

/// Events whose inclusive `[start_date, end_date]` range contains `day`,
/// sorted by category first so same-category bars cluster across adjacent
/// cells, then by start date and id as stable tiebreaks.
pub fn events_for_day<'a>(day: NaiveDate, events: &'a [CalendarEvent]) -> Vec<DaySpan<'a>> {
    let mut spans: Vec<DaySpan<'a>> = events
        .iter()
        .filter(|e| e.start_date <= day && day <= e.end_date)
        .map(|e| DaySpan {
            event: e,
            starts_here: day == e.start_date,
            ends_here: day == e.end_date,
        })
        .collect();

    spans.sort_by(|a, b| {
        a.event
            .category
            .cmp(&b.event.category)
            .then_with(|| a.event.start_date.cmp(&b.event.start_date))
            .then_with(|| a.event.id.cmp(&b.event.id))
    });

    spans
}

/// Keep at most `limit` spans for one cell. Multi-day events win slots over
/// single-day ones; within the same kind the intersection sort order wins.
/// Returns the kept spans and how many were dropped.
pub fn cap_visible<'a>(spans: Vec<DaySpan<'a>>, limit: usize) -> (Vec<DaySpan<'a>>, usize) {
    if spans.len() <= limit {
        return (spans, 0);
    }

    let ranges = spans.iter().filter(|s| s.event.is_range());
    let singles = spans.iter().filter(|s| !s.event.is_range());

    let keep: Vec<DaySpan<'a>> = ranges.chain(singles).take(limit).copied().collect();
    let dropped = spans.len() - keep.len();

    (keep, dropped)
}

/// Shorten a display title to `limit` characters plus an ellipsis.
/// Titles at or under the limit pass through unchanged. Counts `char`s,
/// not bytes.
pub fn truncate_title(title: &str, limit: usize) -> String {
    if title.chars().count() <= limit {
        return title.to_string();
    }
    let cut: String = title.chars().take(limit).collect();
    format!("{}...", cut)
}

/// Lane numbers handed out to events over the course of one grid build.
///
/// Scoped to a single `build_month` call and threaded through it
/// explicitly, so two concurrent builds (or two tests) can never observe
/// each other's assignments. An event keeps its lane for every day it
/// spans, which is what keeps a multi-day bar on one visual row.
#[derive(Debug, Default)]
struct LaneMap {
    lanes: HashMap<String, usize>,
}

impl LaneMap {
    /// Lane for each span of one day, in span order. Events seen on an
    /// earlier day keep their lane; new events take the lowest lane not
    /// occupied by any other event present in this cell.
    fn assign(&mut self, day_spans: &[DaySpan<'_>]) -> Vec<usize> {
        let mut taken: HashSet<usize> = day_spans
            .iter()
            .filter_map(|s| self.lanes.get(&s.event.id))
            .copied()
            .collect();

        day_spans
            .iter()
            .map(|span| {
                if let Some(lane) = self.lanes.get(&span.event.id) {
                    return *lane;
                }
                let mut lane = 0;
                while taken.contains(&lane) {
                    lane += 1;
                }
                taken.insert(lane);
                self.lanes.insert(span.event.id.clone(), lane);
                lane
            })
            .collect()
    }
}

/// A renderable event occurrence inside one day cell.
#[derive(Debug, Clone, Serialize)]
pub struct EventCell {
    pub id: String,
    pub title: String,
    pub category: String,
    pub color: &'static str,
    pub label: &'static str,
    pub starts_here: bool,
    pub ends_here: bool,
    pub is_range: bool,
    pub lane: usize,
}

/// Content of a day cell: either a structured event occurrence or a
/// freeform memo. The two never share fields.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayItem {
    Event(EventCell),
    Memo { id: String, body: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub items: Vec<DayItem>,
    /// Events intersecting this day but dropped by the visible cap;
    /// rendered client-side as a "+N more" affordance.
    pub overflow: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<DayCell>,
}

/// Assemble the full month view. Purely derived from its inputs; calling
/// it twice with the same arguments yields identical output.
pub fn build_month(
    first_of_month: NaiveDate,
    today: NaiveDate,
    events: &[CalendarEvent],
    memos: &[DayMemo],
    cfg: &CalendarConfig,
) -> MonthGrid {
    let mut lane_map = LaneMap::default();

    let cells = grid_dates(first_of_month)
        .into_iter()
        .map(|date| {
            let spans = events_for_day(date, events);
            let (visible, overflow) = cap_visible(spans, cfg.visible_limit);
            let lanes = lane_map.assign(&visible);

            let mut items: Vec<DayItem> = visible
                .iter()
                .zip(lanes)
                .map(|(span, lane)| {
                    let style = category_style(&span.event.category);
                    DayItem::Event(EventCell {
                        id: span.event.id.clone(),
                        title: truncate_title(&span.event.title, cfg.title_limit),
                        category: span.event.category.clone(),
                        color: style.color,
                        label: style.label,
                        starts_here: span.starts_here,
                        ends_here: span.ends_here,
                        is_range: span.event.is_range(),
                        lane,
                    })
                })
                .collect();

            items.extend(
                memos
                    .iter()
                    .filter(|m| m.memo_date == date)
                    .map(|m| DayItem::Memo {
                        id: m.id.clone(),
                        body: m.body.clone(),
                    }),
            );

            DayCell {
                date,
                in_month: date.year() == first_of_month.year()
                    && date.month() == first_of_month.month(),
                is_today: date == today,
                items,
                overflow,
            }
        })
        .collect();

    MonthGrid {
        year: first_of_month.year(),
        month: first_of_month.month(),
        cells,
    }
}

/// First day of the new event's range that would exceed `cap` events once
/// the new one is added, or `None` if every day has room.
///
/// The cap is per-day and stored events are keyed only under their start
/// day, so the check walks the range one calendar day at a time and
/// re-derives the set of occupying events per day: the union of events
/// whose `day_key` is that day and events whose range merely passes
/// through it. `exclude_id` removes the event being updated from the
/// union so it does not collide with itself.
pub fn first_over_capacity(
    events: &[CalendarEvent],
    start: NaiveDate,
    end: NaiveDate,
    exclude_id: Option<&str>,
    cap: usize,
) -> Option<NaiveDate> {
    let mut day = start;
    loop {
        let key = day.format("%Y-%m-%d").to_string();
        let mut occupied: HashSet<&str> = events
            .iter()
            .filter(|e| e.day_key == key)
            .map(|e| e.id.as_str())
            .collect();
        for span in events_for_day(day, events) {
            occupied.insert(span.event.id.as_str());
        }
        if let Some(id) = exclude_id {
            occupied.remove(id);
        }

        if occupied.len() >= cap {
            return Some(day);
        }
        if day >= end {
            return None;
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => return None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: &str, category: &str, start: NaiveDate, end: NaiveDate) -> CalendarEvent {
        let ts = NaiveDateTime::parse_from_str("2024-01-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        CalendarEvent {
            id: id.to_string(),
            employee_id: "emp-1".to_string(),
            title: format!("event {}", id),
            category: category.to_string(),
            body: String::new(),
            start_date: start,
            end_date: end,
            day_key: start.format("%Y-%m-%d").to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn cfg() -> CalendarConfig {
        CalendarConfig::default()
    }

    #[test]
    fn grid_is_full_weeks_and_counts_month_days() {
        for (y, m) in [(2024, 2), (2025, 2), (2025, 6), (2025, 8), (2023, 12)] {
            let first = date(y, m, 1);
            let dates = grid_dates(first);
            assert_eq!(dates.len() % 7, 0, "{}-{} grid not full weeks", y, m);
            let in_month = dates
                .iter()
                .filter(|d| d.year() == y && d.month() == m)
                .count();
            assert_eq!(in_month, days_in_month(first) as usize);
            assert_eq!(dates[0].weekday(), Weekday::Sun);
        }
    }

    #[test]
    fn grid_february_non_leap_starting_sunday_has_no_padding() {
        // February 2015 starts on a Sunday and has exactly 28 days
        let dates = grid_dates(date(2015, 2, 1));
        assert_eq!(dates.len(), 28);
        assert_eq!(dates[0], date(2015, 2, 1));
        assert_eq!(dates[27], date(2015, 2, 28));
    }

    #[test]
    fn grid_january_backfills_from_previous_december() {
        // 2025-01-01 is a Wednesday, so the grid starts 2024-12-29
        let dates = grid_dates(date(2025, 1, 1));
        assert_eq!(dates[0], date(2024, 12, 29));
        assert_eq!(dates[3], date(2025, 1, 1));
    }

    #[test]
    fn grid_december_forwardfills_into_next_january() {
        // December 2025 ends on a Wednesday; the last row pads into 2026
        let dates = grid_dates(date(2025, 12, 1));
        assert_eq!(*dates.last().unwrap(), date(2026, 1, 3));
        assert_eq!(dates.len() % 7, 0);
    }

    #[test]
    fn grid_generation_is_idempotent() {
        let a = grid_dates(date(2024, 7, 1));
        let b = grid_dates(date(2024, 7, 1));
        assert_eq!(a, b);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(date(2024, 2, 1)), 29);
        assert_eq!(days_in_month(date(2025, 2, 1)), 28);
        assert_eq!(days_in_month(date(2025, 4, 1)), 30);
        assert_eq!(days_in_month(date(2025, 12, 1)), 31);
    }

    #[test]
    fn single_day_event_starts_and_ends_on_its_day() {
        let d = date(2025, 3, 10);
        let events = [event("a", "meeting", d, d)];

        let spans = events_for_day(d, &events);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].starts_here);
        assert!(spans[0].ends_here);

        assert!(events_for_day(d.pred_opt().unwrap(), &events).is_empty());
        assert!(events_for_day(d.succ_opt().unwrap(), &events).is_empty());
    }

    #[test]
    fn range_event_flags_per_day() {
        let events = [event("a", "trip", date(2025, 3, 10), date(2025, 3, 12))];

        let first = events_for_day(date(2025, 3, 10), &events);
        assert!(first[0].starts_here && !first[0].ends_here);

        let middle = events_for_day(date(2025, 3, 11), &events);
        assert!(!middle[0].starts_here && !middle[0].ends_here);

        let last = events_for_day(date(2025, 3, 12), &events);
        assert!(!last[0].starts_here && last[0].ends_here);
    }

    #[test]
    fn intersection_sorts_by_category_then_id() {
        let d = date(2025, 5, 5);
        let events = [
            event("z", "trip", d, d),
            event("b", "meeting", d, d),
            event("a", "meeting", d, d),
        ];
        let spans = events_for_day(d, &events);
        let ids: Vec<&str> = spans.iter().map(|s| s.event.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "z"]);
    }

    #[test]
    fn capping_prefers_range_events() {
        let d = date(2025, 5, 5);
        let events = [
            event("a", "leave", d, d),
            event("b", "meeting", d, d),
            event("c", "meeting", d, date(2025, 5, 7)),
            event("d", "trip", d, date(2025, 5, 6)),
        ];
        let (visible, dropped) = cap_visible(events_for_day(d, &events), 3);
        assert_eq!(dropped, 1);
        let ids: Vec<&str> = visible.iter().map(|s| s.event.id.as_str()).collect();
        // both ranges first in sort order, then the earliest single-day event
        assert_eq!(ids, vec!["c", "d", "a"]);
    }

    #[test]
    fn capping_under_limit_drops_nothing() {
        let d = date(2025, 5, 5);
        let events = [event("a", "meeting", d, d)];
        let (visible, dropped) = cap_visible(events_for_day(d, &events), 3);
        assert_eq!(visible.len(), 1);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn truncation_at_and_over_limit() {
        assert_eq!(truncate_title("standup", 15), "standup");
        assert_eq!(truncate_title("exactly15chars!", 15), "exactly15chars!");
        assert_eq!(
            truncate_title("quarterly planning offsite", 15),
            "quarterly plann..."
        );
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        assert_eq!(truncate_title("übergabegespräch", 15), "übergabegespräc...");
    }

    #[test]
    fn unknown_category_falls_back() {
        let style = category_style("sabbatical");
        assert_eq!(style.label, "Other");
        assert_eq!(category_style(""), style);
        assert_eq!(category_style("meeting").label, "Meeting");
    }

    #[test]
    fn lanes_stay_stable_across_a_bar() {
        let events = [
            event("bar", "trip", date(2025, 6, 2), date(2025, 6, 5)),
            event("x", "meeting", date(2025, 6, 3), date(2025, 6, 3)),
        ];
        let grid = build_month(date(2025, 6, 1), date(2025, 6, 1), &events, &[], &cfg());

        let lanes: Vec<usize> = grid
            .cells
            .iter()
            .flat_map(|c| c.items.iter())
            .filter_map(|item| match item {
                DayItem::Event(e) if e.id == "bar" => Some(e.lane),
                _ => None,
            })
            .collect();
        assert_eq!(lanes.len(), 4);
        assert!(lanes.iter().all(|&l| l == lanes[0]));
    }

    #[test]
    fn build_month_marks_today_and_overflow() {
        let d = date(2025, 6, 10);
        let events = [
            event("a", "meeting", d, d),
            event("b", "meeting", d, d),
            event("c", "meeting", d, d),
            event("d", "meeting", d, d),
        ];
        let grid = build_month(date(2025, 6, 1), d, &events, &[], &cfg());

        let cell = grid.cells.iter().find(|c| c.date == d).unwrap();
        assert!(cell.is_today);
        assert_eq!(cell.items.len(), 3);
        assert_eq!(cell.overflow, 1);
        assert_eq!(grid.cells.iter().filter(|c| c.is_today).count(), 1);
    }

    #[test]
    fn build_month_includes_memos_as_tagged_items() {
        let ts = NaiveDateTime::parse_from_str("2024-01-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let memo = DayMemo {
            id: "m1".to_string(),
            employee_id: "emp-1".to_string(),
            memo_date: date(2025, 6, 12),
            body: "dentist".to_string(),
            created_at: ts,
            updated_at: ts,
        };
        let grid = build_month(date(2025, 6, 1), date(2025, 6, 1), &[], &[memo], &cfg());

        let cell = grid
            .cells
            .iter()
            .find(|c| c.date == date(2025, 6, 12))
            .unwrap();
        assert!(matches!(
            &cell.items[0],
            DayItem::Memo { body, .. } if body == "dentist"
        ));
    }

    #[test]
    fn build_month_is_idempotent() {
        let events = [event("a", "trip", date(2025, 6, 2), date(2025, 6, 5))];
        let a = build_month(date(2025, 6, 1), date(2025, 6, 3), &events, &[], &cfg());
        let b = build_month(date(2025, 6, 1), date(2025, 6, 3), &events, &[], &cfg());
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }

    #[test]
    fn capacity_check_rejects_fourth_event_naming_the_day() {
        let d = date(2025, 7, 15);
        let existing = [
            event("a", "meeting", d, d),
            event("b", "meeting", d, d),
            event("c", "leave", d, d),
        ];
        // a new range passing through the full day is rejected on that day
        let conflict = first_over_capacity(&existing, date(2025, 7, 14), date(2025, 7, 16), None, 3);
        assert_eq!(conflict, Some(d));
    }

    #[test]
    fn capacity_check_allows_third_event() {
        let d = date(2025, 7, 15);
        let existing = [event("a", "meeting", d, d), event("b", "meeting", d, d)];
        assert_eq!(first_over_capacity(&existing, d, d, None, 3), None);
    }

    #[test]
    fn capacity_check_counts_ranges_passing_through() {
        // events keyed under other days still occupy the middle day
        let existing = [
            event("a", "trip", date(2025, 7, 10), date(2025, 7, 20)),
            event("b", "trip", date(2025, 7, 12), date(2025, 7, 18)),
            event("c", "leave", date(2025, 7, 14), date(2025, 7, 16)),
        ];
        let conflict =
            first_over_capacity(&existing, date(2025, 7, 15), date(2025, 7, 15), None, 3);
        assert_eq!(conflict, Some(date(2025, 7, 15)));
    }

    #[test]
    fn capacity_check_excludes_the_event_being_updated() {
        let d = date(2025, 7, 15);
        let existing = [
            event("a", "meeting", d, d),
            event("b", "meeting", d, d),
            event("c", "leave", d, d),
        ];
        // moving "c" within the same day must not collide with itself
        assert_eq!(first_over_capacity(&existing, d, d, Some("c"), 3), None);
    }
}
