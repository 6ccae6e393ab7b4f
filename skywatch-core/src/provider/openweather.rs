use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    condition::Condition,
    daytime::SunTimes,
    model::{Coordinates, CurrentConditions, Forecast, ForecastEntry, PayloadError},
};

use super::WeatherProvider;

const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
}

/// How a request addresses its location.
enum Target<'a> {
    Coords(Coordinates),
    Name(&'a str),
}

impl Target<'_> {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Target::Coords(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
            Target::Name(name) => vec![("q", (*name).to_string())],
        }
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    async fn fetch(&self, url: &str, target: &Target<'_>, what: &str) -> Result<String> {
        let mut query = target.query_pairs();
        query.push(("appid", self.api_key.clone()));
        query.push(("units", "metric".to_string()));

        debug!(url, what, "requesting OpenWeather data");

        let res = self
            .http
            .get(url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }

    async fn fetch_current(&self, target: Target<'_>) -> Result<CurrentConditions> {
        let body = self.fetch(CURRENT_URL, &target, "current weather").await?;
        parse_current(&body).context("Failed to validate OpenWeather current payload")
    }

    async fn fetch_forecast(&self, target: Target<'_>) -> Result<Forecast> {
        let body = self.fetch(FORECAST_URL, &target, "5-day forecast").await?;
        parse_forecast(&body).context("Failed to validate OpenWeather forecast payload")
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, coords: Coordinates) -> Result<CurrentConditions> {
        self.fetch_current(Target::Coords(coords)).await
    }

    async fn current_by_name(&self, city: &str) -> Result<CurrentConditions> {
        self.fetch_current(Target::Name(city)).await
    }

    async fn forecast(&self, coords: Coordinates) -> Result<Forecast> {
        self.fetch_forecast(Target::Coords(coords)).await
    }

    async fn forecast_by_name(&self, city: &str) -> Result<Forecast> {
        self.fetch_forecast(Target::Name(city)).await
    }
}

// Raw payload shapes. Fields the API may omit carry defaults here so the
// validated models never see missing data.

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    description: String,
}

#[derive(Debug, Deserialize, Default)]
struct OwWind {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

#[derive(Debug, Deserialize, Default)]
struct OwCoord {
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: i64,
    #[serde(default)]
    timezone: i64,
    #[serde(default)]
    coord: OwCoord,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastSlot {
    dt: i64,
    #[serde(default)]
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastSlot>,
}

fn parse_current(body: &str) -> Result<CurrentConditions, PayloadError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let observation_time = unix_to_utc(parsed.dt).unwrap_or_else(Utc::now);
    let (condition, condition_text) = classify(&parsed.weather);

    Ok(CurrentConditions {
        location_name: parsed.name,
        coordinates: Coordinates {
            latitude: parsed.coord.lat,
            longitude: parsed.coord.lon,
        },
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        wind_direction_deg: parsed.wind.deg,
        condition,
        condition_text,
        observation_time,
        sun_times: SunTimes {
            utc_offset_seconds: parsed.timezone,
            sunrise_epoch_seconds: parsed.sys.sunrise,
            sunset_epoch_seconds: parsed.sys.sunset,
        },
    })
}

fn parse_forecast(body: &str) -> Result<Forecast, PayloadError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)?;

    if parsed.list.is_empty() {
        return Err(PayloadError::EmptyForecast);
    }

    let entries = parsed
        .list
        .into_iter()
        .map(|slot| {
            let (condition, condition_text) = classify(&slot.weather);
            ForecastEntry {
                time: unix_to_utc(slot.dt).unwrap_or_else(Utc::now),
                time_text: slot.dt_txt,
                temperature_c: slot.main.temp,
                feels_like_c: slot.main.feels_like,
                humidity_pct: slot.main.humidity,
                wind_speed_mps: slot.wind.speed,
                precipitation_chance: slot.pop,
                condition,
                condition_text,
            }
        })
        .collect();

    Ok(Forecast {
        location_name: parsed.city.name,
        country: parsed.city.country,
        entries,
    })
}

fn classify(weather: &[OwWeather]) -> (Condition, String) {
    weather.first().map_or_else(
        || (Condition::default(), "Unknown".to_string()),
        |w| (Condition::from_owm_id(w.id), w.description.clone()),
    )
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        // Back off to a char boundary; error bodies are not always ASCII.
        let mut cut = MAX;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_FIXTURE: &str = r#"{
        "coord": {"lon": -9.1333, "lat": 38.7167},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 21.4, "feels_like": 21.1, "temp_min": 19.9, "temp_max": 23.0,
                 "pressure": 1019, "humidity": 56},
        "wind": {"speed": 4.6, "deg": 310},
        "dt": 1700000000,
        "sys": {"country": "PT", "sunrise": 1699946640, "sunset": 1699983120},
        "timezone": 0,
        "name": "Lisbon"
    }"#;

    #[test]
    fn parses_current_payload() {
        let current = parse_current(CURRENT_FIXTURE).expect("fixture should parse");

        assert_eq!(current.location_name, "Lisbon");
        assert_eq!(current.condition, Condition::Clear);
        assert_eq!(current.condition_text, "clear sky");
        assert_eq!(current.humidity_pct, 56);
        assert_eq!(current.sun_times.sunrise_epoch_seconds, 1_699_946_640);
        assert_eq!(current.sun_times.sunset_epoch_seconds, 1_699_983_120);
        assert_eq!(current.sun_times.utc_offset_seconds, 0);
        assert!((current.coordinates.latitude - 38.7167).abs() < 1e-9);
    }

    #[test]
    fn empty_weather_array_defaults_the_condition() {
        let body = r#"{
            "weather": [],
            "main": {"temp": 3.0, "feels_like": 1.0, "humidity": 80},
            "dt": 1700000000,
            "name": "Somewhere"
        }"#;

        let current = parse_current(body).expect("payload without condition still parses");
        assert_eq!(current.condition, Condition::Clouds);
        assert_eq!(current.condition_text, "Unknown");
        // No sys block: sun times default to zero instead of failing.
        assert_eq!(current.sun_times.sunrise_epoch_seconds, 0);
        assert_eq!(current.sun_times.utc_offset_seconds, 0);
    }

    #[test]
    fn parses_forecast_payload() {
        let body = r#"{
            "city": {"name": "Lisbon", "country": "PT"},
            "list": [
                {"dt": 1700049600, "dt_txt": "2023-11-15 12:00:00",
                 "main": {"temp": 18.0, "feels_like": 17.5, "humidity": 60},
                 "weather": [{"id": 500, "description": "light rain"}],
                 "wind": {"speed": 3.1, "deg": 200},
                 "pop": 0.45},
                {"dt": 1700060400, "dt_txt": "2023-11-15 15:00:00",
                 "main": {"temp": 17.0, "feels_like": 16.2, "humidity": 64},
                 "weather": [{"id": 801, "description": "few clouds"}],
                 "wind": {"speed": 2.8, "deg": 210},
                 "pop": 0.1}
            ]
        }"#;

        let forecast = parse_forecast(body).expect("fixture should parse");

        assert_eq!(forecast.location_name, "Lisbon");
        assert_eq!(forecast.country, "PT");
        assert_eq!(forecast.entries.len(), 2);
        assert_eq!(forecast.entries[0].condition, Condition::Rain);
        assert!((forecast.entries[0].precipitation_chance - 0.45).abs() < 1e-9);
        assert_eq!(forecast.daily().len(), 1);
    }

    #[test]
    fn empty_forecast_list_is_an_error() {
        let body = r#"{"city": {"name": "Nowhere"}, "list": []}"#;
        let err = parse_forecast(body).unwrap_err();
        assert!(matches!(err, PayloadError::EmptyForecast));
        assert!(err.to_string().contains("contained no data"));
    }

    #[test]
    fn malformed_json_is_rejected_with_a_typed_error() {
        let err = parse_current("{not json").unwrap_err();
        assert!(matches!(err, PayloadError::Malformed(_)));
        assert!(err.to_string().contains("not valid JSON"));

        assert!(matches!(parse_forecast("[]").unwrap_err(), PayloadError::Malformed(_)));
    }

    #[test]
    fn truncate_body_caps_long_payloads() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert!(truncated.len() <= 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        // A two-byte char straddling the 200-byte cap must not panic the
        // error path.
        let mut long = "x".repeat(199);
        long.push_str("ééé");

        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }
}
