use chrono::{Duration, NaiveDateTime};
use icalendar::{Calendar, Component, Event, EventLike};
use tracing::debug;

use crate::models::{FitnessClass, SessionInstance};

const DEFAULT_DURATION_MIN: u32 = 60;

#[derive(Clone)]
pub struct ICalExporter {
    club_name: String,
    location: Option<String>,
}

impl ICalExporter {
    pub fn new(club_name: impl Into<String>, location: Option<String>) -> Self {
        Self {
            club_name: club_name.into(),
            location,
        }
    }

    pub fn generate(&self, class: &FitnessClass, sessions: &[SessionInstance]) -> Vec<u8> {
        if sessions.is_empty() {
            return Vec::new();
        }

        let mut calendar = Calendar::new();
        calendar.name(&format!("{} - {}", self.club_name, class.name));

        let duration = Duration::minutes(class.duration_min.unwrap_or(DEFAULT_DURATION_MIN) as i64);
        let location = self
            .location
            .clone()
            .unwrap_or_else(|| self.club_name.clone());

        for session in sessions {
            let Some(time) = session.start_time() else {
                debug!(time = %session.time, class_id = %class.id, "skipping session with unparsable time");
                continue;
            };
            let start = NaiveDateTime::new(session.date, time);

            let mut event = Event::new();
            event.summary(&format!("{} with {}", class.name, class.instructor));
            event.starts(start);
            event.ends(start + duration);
            event.location(&location);
            if let Some(description) = &class.description {
                event.description(description);
            }
            event.uid(&format!(
                "{}-{}-fitclub-booking",
                start.format("%Y%m%dT%H%M%S"),
                class.id.replace(' ', "-")
            ));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}
