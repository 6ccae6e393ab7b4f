//! Shared domain models: validated snapshots of provider data plus the
//! environment value threaded through display code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::condition::Condition;
use crate::daytime::{LocalDayTime, SunTimes};

/// Error for provider payloads that cannot be turned into the validated
/// models below.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("provider payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("provider forecast contained no data")]
    EmptyForecast,
}

/// Geographic point, decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One validated current-weather observation for a location.
///
/// Built at the provider boundary from raw JSON. Fields the provider may
/// omit (condition array, sun times) are defaulted there, so nothing above
/// this type deals with missing data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub coordinates: Coordinates,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: f64,
    pub condition: Condition,
    pub condition_text: String,
    pub observation_time: DateTime<Utc>,
    pub sun_times: SunTimes,
}

/// One 3-hour forecast slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: DateTime<Utc>,
    /// Provider-formatted local timestamp, e.g. `2024-03-01 12:00:00`.
    pub time_text: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    /// Probability of precipitation, 0.0..=1.0.
    pub precipitation_chance: f64,
    pub condition: Condition,
    pub condition_text: String,
}

/// Forecast for one location: up to five days of 3-hour slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub location_name: String,
    pub country: String,
    pub entries: Vec<ForecastEntry>,
}

impl Forecast {
    /// The next `n` slots, for an hourly strip.
    #[must_use]
    pub fn hourly(&self, n: usize) -> &[ForecastEntry] {
        &self.entries[..self.entries.len().min(n)]
    }

    /// One entry per day: the noon slot, which the provider timestamps
    /// `12:00:00` in its text field.
    #[must_use]
    pub fn daily(&self) -> Vec<&ForecastEntry> {
        self.entries.iter().filter(|e| e.time_text.contains("12:00:00")).collect()
    }
}

/// Display theme, derived from day/night at the observed location rather
/// than from device settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn for_day_time(day_time: &LocalDayTime) -> Self {
        if day_time.is_night { Self::Dark } else { Self::Light }
    }
}

/// Environment handed to display code as an explicit value, never as
/// ambient shared state.
#[derive(Debug, Clone, Copy)]
pub struct AppEnvironment {
    pub theme: Theme,
    pub day_time: LocalDayTime,
    pub coordinates: Coordinates,
}

impl AppEnvironment {
    #[must_use]
    pub fn new(day_time: LocalDayTime, coordinates: Coordinates) -> Self {
        Self { theme: Theme::for_day_time(&day_time), day_time, coordinates }
    }
}

/// Bucket a wind bearing into an 8-point compass direction.
#[must_use]
pub fn compass_direction(degrees: f64) -> &'static str {
    let deg = degrees.rem_euclid(360.0);
    match deg {
        d if !(22.5..337.5).contains(&d) => "N",
        d if d < 67.5 => "NE",
        d if d < 112.5 => "E",
        d if d < 157.5 => "SE",
        d if d < 202.5 => "S",
        d if d < 247.5 => "SW",
        d if d < 292.5 => "W",
        _ => "NW",
    }
}
