//! Human-friendly rendering of weather data.
//!
//! Day/night is resolved per rendered location from its own sun times, so a
//! favorites list can mix daylight and night cities in one view.

use chrono::Utc;
use std::fmt::Write;

use skywatch_core::{
    AppEnvironment, CurrentConditions, FavoriteCity, Forecast, model::compass_direction,
    resolve_at,
};

pub fn render_current(current: &CurrentConditions) -> String {
    render_current_at(current, Utc::now().timestamp())
}

fn render_current_at(current: &CurrentConditions, now_epoch_seconds: i64) -> String {
    let day_time = resolve_at(Some(&current.sun_times), now_epoch_seconds);
    let env = AppEnvironment::new(day_time, current.coordinates);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  [{}]",
        current.location_name,
        current.condition.icon_name(env.day_time.is_night)
    );
    let _ = writeln!(
        out,
        "{:.0}°C, {}  (feels like {:.0}°C)",
        current.temperature_c,
        capitalize_words(&current.condition_text),
        current.feels_like_c
    );
    let _ = writeln!(out, "Humidity {}%", current.humidity_pct);
    let _ = writeln!(
        out,
        "Wind {:.1} m/s {}",
        current.wind_speed_mps,
        compass_direction(current.wind_direction_deg)
    );
    let _ = writeln!(
        out,
        "Sunrise {:02}:00, sunset {:02}:00 local (now {:02}:00, {})",
        env.day_time.sunrise_hour,
        env.day_time.sunset_hour,
        env.day_time.current_local_hour,
        if env.day_time.is_night { "night" } else { "day" }
    );
    out
}

pub fn render_forecast(forecast: &Forecast, hourly: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}, {}", forecast.location_name, forecast.country);

    if hourly {
        for entry in forecast.hourly(10) {
            let _ = writeln!(
                out,
                "{}  {:>5.1}°C  {}  rain {:.0}%",
                slot_label(&entry.time_text),
                entry.temperature_c,
                capitalize_words(&entry.condition_text),
                entry.precipitation_chance * 100.0
            );
        }
    } else {
        for entry in forecast.daily() {
            let _ = writeln!(
                out,
                "{}  {:>5.1}°C  {}  rain {:.0}%",
                entry.time.format("%A, %d %B"),
                entry.temperature_c,
                capitalize_words(&entry.condition_text),
                entry.precipitation_chance * 100.0
            );
        }
    }

    out
}

pub fn render_favorite_line(favorite: &FavoriteCity) -> String {
    render_favorite_line_at(favorite, Utc::now().timestamp())
}

fn render_favorite_line_at(favorite: &FavoriteCity, now_epoch_seconds: i64) -> String {
    let day_time = resolve_at(Some(&favorite.conditions.sun_times), now_epoch_seconds);

    format!(
        "{}{}  {:.0}° — {}  [{}]",
        favorite.name,
        if favorite.my_location { " (My Location)" } else { "" },
        favorite.conditions.temperature_c,
        capitalize_words(&favorite.conditions.condition_text),
        if day_time.is_night { "night" } else { "day" }
    )
}

/// Uppercase the first letter of each word; provider descriptions arrive
/// all-lowercase.
fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `HH:MM` slice of the provider's `YYYY-MM-DD HH:MM:SS` text, or the raw
/// text when it has some other shape.
fn slot_label(time_text: &str) -> &str {
    time_text.get(11..16).unwrap_or(time_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skywatch_core::{Condition, Coordinates, SunTimes};

    fn conditions() -> CurrentConditions {
        CurrentConditions {
            location_name: "Lisbon".to_string(),
            coordinates: Coordinates { latitude: 38.7167, longitude: -9.1333 },
            temperature_c: 21.4,
            feels_like_c: 21.1,
            humidity_pct: 56,
            wind_speed_mps: 4.6,
            wind_direction_deg: 310.0,
            condition: Condition::Clear,
            condition_text: "clear sky".to_string(),
            observation_time: Utc::now(),
            // 2023-11-14, sunrise 07:24 UTC, sunset 17:32 UTC.
            sun_times: SunTimes {
                utc_offset_seconds: 0,
                sunrise_epoch_seconds: 1_699_946_640,
                sunset_epoch_seconds: 1_699_983_120,
            },
        }
    }

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(capitalize_words("light rain"), "Light Rain");
        assert_eq!(capitalize_words("clear sky"), "Clear Sky");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn slot_label_extracts_the_clock_time() {
        assert_eq!(slot_label("2023-11-15 12:00:00"), "12:00");
        assert_eq!(slot_label("odd"), "odd");
    }

    #[test]
    fn current_render_shows_sun_icon_during_the_day() {
        // Noon UTC on the snapshot's date.
        let noon = 1_699_963_200;
        let rendered = render_current_at(&conditions(), noon);

        assert!(rendered.contains("day-sunny"));
        assert!(rendered.contains("Clear Sky"));
        assert!(rendered.contains("Sunrise 07:00, sunset 17:00"));
        assert!(rendered.contains("day)"));
    }

    #[test]
    fn current_render_switches_to_moon_at_night() {
        // 22:00 UTC, past the sunset hour.
        let late = 1_699_999_200;
        let rendered = render_current_at(&conditions(), late);

        assert!(rendered.contains("moon-outline"));
        assert!(rendered.contains("night)"));
    }

    #[test]
    fn favorite_line_marks_device_location() {
        let favorite = FavoriteCity {
            city_id: 2_267_057,
            name: "Lisbon".to_string(),
            my_location: true,
            conditions: conditions(),
        };

        let noon = 1_699_963_200;
        let line = render_favorite_line_at(&favorite, noon);

        assert!(line.starts_with("Lisbon (My Location)"));
        assert!(line.contains("21°"));
        assert!(line.ends_with("[day]"));
    }
}
