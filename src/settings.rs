use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub store_base_url: Url,
    pub store_api_key: Option<String>,
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
    pub timezone: Tz,
    pub club_name: String,
    pub club_location: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .add_source(File::with_name("fitclub").required(false))
            // APP_STORE_BASE_URL, APP_TIMEZONE, ...
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("store_base_url", "http://localhost:8000/api")?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("timezone", "UTC")?
            .set_default("club_name", "FitClub")?
            .build()?;

        config.try_deserialize()
    }

    /// Calendar date at the club at instant `now`.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_local_date_uses_club_timezone() {
        let settings = Settings {
            store_base_url: Url::parse("https://example.com").unwrap(),
            store_api_key: None,
            debug: false,
            enable_swagger: false,
            port: 8080,
            timezone: chrono_tz::America::New_York,
            club_name: "FitClub".to_string(),
            club_location: None,
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 3, 0, 0).unwrap();
        assert_eq!(
            settings.local_date(now),
            NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()
        );
    }
}
