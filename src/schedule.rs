use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::models::{DayOfWeek, RecurrenceRule, SessionInstance};

/// First day (Sunday) of the week containing `today + 7 days`.
pub fn anchor_week_start(today: NaiveDate) -> NaiveDate {
    let next_week = today + Duration::days(7);
    next_week - Duration::days(next_week.weekday().num_days_from_sunday() as i64)
}

/// Resolves each rule to its occurrence in the anchor week, dropping rules
/// whose day is not recognised. The result is sorted by date and never
/// contains a date before `today`.
pub fn resolve_sessions(today: NaiveDate, rules: &[RecurrenceRule]) -> Vec<SessionInstance> {
    let week_start = anchor_week_start(today);

    let mut sessions: Vec<SessionInstance> = rules
        .iter()
        .filter_map(|rule| {
            let day = match rule.day.parse::<DayOfWeek>() {
                Ok(day) => day,
                Err(err) => {
                    debug!(error = %err, "dropping recurrence rule");
                    return None;
                }
            };
            let date = week_start + Duration::days(day.offset() as i64);
            (date >= today).then(|| SessionInstance {
                date,
                day,
                time: rule.time.clone(),
            })
        })
        .collect();

    sessions.sort_by_key(|session| session.date);
    sessions
}

pub fn find_session<'a>(
    sessions: &'a [SessionInstance],
    date: NaiveDate,
    time: &str,
) -> Option<&'a SessionInstance> {
    let time = time.trim();
    sessions
        .iter()
        .find(|session| session.date == date && session.time.trim() == time)
}
