use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

/// Day of the week, with weeks starting on Sunday.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Zero-based offset from the start of the week (Sunday = 0).
    pub fn offset(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown day of week: {0}")]
pub struct UnknownDay(pub String);

impl FromStr for DayOfWeek {
    type Err = UnknownDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDay(s.to_string()))
    }
}

/// Weekly slot a class normally runs in, as stored on the class entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct RecurrenceRule {
    #[schema(example = "Monday")]
    pub day: String,
    #[schema(example = "18:00")]
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct FitnessClass {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_min: Option<u32>,
    #[serde(default)]
    pub schedule: Vec<RecurrenceRule>,
}

/// One dated occurrence of a class, derived from a [`RecurrenceRule`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct SessionInstance {
    #[schema(value_type = String, format = "date", example = "2024-01-15")]
    pub date: NaiveDate,
    pub day: DayOfWeek,
    #[schema(example = "18:00")]
    pub time: String,
}

impl SessionInstance {
    pub fn start_time(&self) -> Option<NaiveTime> {
        let time = self.time.trim();
        NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .ok()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct BookingRequest {
    pub user_email: String,
    pub user_name: String,
    pub class_id: String,
    pub class_name: String,
    pub instructor: String,
    #[schema(value_type = String, format = "date", example = "2024-01-15")]
    pub date: NaiveDate,
    pub time: String,
    pub day_of_week: DayOfWeek,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Booking as echoed back by the entity store after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CreatedBooking {
    #[serde(deserialize_with = "deserialize_entity_id")]
    pub id: String,
    #[serde(flatten)]
    pub booking: BookingRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CurrentUser {
    pub email: String,
    #[serde(default)]
    pub full_name: String,
}

/// Time-windowed marketing content (banner, popup) shown on one placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PromotableContent {
    pub id: String,
    pub placement_type: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "deserialize_instant")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_instant")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_link: Option<String>,
}

/// Entity ids as the store sends them: strings or plain numbers.
pub fn entity_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn deserialize_entity_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    entity_id(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid entity id: {raw}")))
}

fn default_enabled() -> bool {
    true
}

/// Accepts RFC 3339 instants and bare `YYYY-MM-DD` dates (UTC midnight).
/// Empty strings count as unset.
fn deserialize_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    parse_instant(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date or date-time: {raw}")))
}

pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_day_of_week_parse() {
        assert_eq!("Monday".parse::<DayOfWeek>().unwrap(), DayOfWeek::Monday);
        assert_eq!(" saturday ".parse::<DayOfWeek>().unwrap(), DayOfWeek::Saturday);
        assert!("Funday".parse::<DayOfWeek>().is_err());
        assert!("".parse::<DayOfWeek>().is_err());
    }

    #[test]
    fn test_day_of_week_offsets() {
        assert_eq!(DayOfWeek::Sunday.offset(), 0);
        assert_eq!(DayOfWeek::Wednesday.offset(), 3);
        assert_eq!(DayOfWeek::Saturday.offset(), 6);
    }

    #[test]
    fn test_promotion_accepts_plain_dates() {
        let json = r#"{
            "id": "p1",
            "placement_type": "home_banner",
            "start_date": "2024-05-01",
            "end_date": "2024-05-31T23:59:00Z",
            "title": "Summer deal"
        }"#;
        let promo: PromotableContent = serde_json::from_str(json).unwrap();
        assert!(promo.enabled);
        assert_eq!(
            promo.start_date,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            promo.end_date,
            Some(Utc.with_ymd_and_hms(2024, 5, 31, 23, 59, 0).unwrap())
        );
    }

    #[test]
    fn test_promotion_empty_dates_are_unset() {
        let json = r#"{"id": "p2", "placement_type": "popup", "start_date": "", "end_date": null}"#;
        let promo: PromotableContent = serde_json::from_str(json).unwrap();
        assert!(promo.start_date.is_none());
        assert!(promo.end_date.is_none());
    }

    #[test]
    fn test_created_booking_flattens_request() {
        let json = r#"{
            "id": "b-1",
            "user_email": "ann@example.com",
            "user_name": "Ann",
            "class_id": "c-1",
            "class_name": "Spin",
            "instructor": "Tom",
            "date": "2024-01-15",
            "time": "18:00",
            "day_of_week": "Monday",
            "status": "confirmed"
        }"#;
        let created: CreatedBooking = serde_json::from_str(json).unwrap();
        assert_eq!(created.id, "b-1");
        assert_eq!(created.booking.day_of_week, DayOfWeek::Monday);
        assert_eq!(created.booking.status, BookingStatus::Confirmed);
        assert!(created.booking.phone.is_none());
    }

    #[test]
    fn test_created_booking_numeric_id() {
        let json = r#"{
            "id": 17,
            "user_email": "ann@example.com",
            "user_name": "Ann",
            "class_id": "c-1",
            "class_name": "Spin",
            "instructor": "Tom",
            "date": "2024-01-15",
            "time": "18:00",
            "day_of_week": "Monday",
            "status": "confirmed"
        }"#;
        let created: CreatedBooking = serde_json::from_str(json).unwrap();
        assert_eq!(created.id, "17");
    }

    #[test]
    fn test_unknown_day_message() {
        let err = "Funday".parse::<DayOfWeek>().unwrap_err();
        assert_eq!(err, UnknownDay("Funday".to_string()));
        assert_eq!(err.to_string(), "unknown day of week: Funday");
    }
}
