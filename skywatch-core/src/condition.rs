//! Weather-condition families mapped from OpenWeather condition ids.
//!
//! The provider reports a numeric condition id per observation; the ranges
//! below follow the published id table (2xx thunderstorm, 3xx drizzle, 5xx
//! rain, 6xx snow, 7xx atmosphere, 800 clear, 801+ clouds).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    /// The 7xx group: mist, fog, haze, dust, squalls, tornado.
    Atmosphere,
    Clear,
    FewClouds,
    #[default]
    Clouds,
}

impl Condition {
    /// Map an OpenWeather condition id to its family.
    ///
    /// 511 (freezing rain) classifies as snow. Unknown ids fall back to
    /// the overcast default rather than erroring.
    #[must_use]
    pub fn from_owm_id(id: u32) -> Self {
        match id {
            200..=232 => Self::Thunderstorm,
            300..=321 => Self::Drizzle,
            500..=504 | 520..=531 => Self::Rain,
            511 | 600..=622 => Self::Snow,
            701..=781 => Self::Atmosphere,
            800 => Self::Clear,
            801 | 802 => Self::FewClouds,
            _ => Self::Clouds,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Atmosphere => "Mist",
            Self::Clear => "Clear",
            Self::FewClouds => "Few Clouds",
            Self::Clouds => "Clouds",
        }
    }

    /// Icon name for this condition at the given time of day.
    ///
    /// Only clear and lightly-clouded skies change glyph after sunset.
    #[must_use]
    pub fn icon_name(&self, is_night: bool) -> &'static str {
        match (self, is_night) {
            (Self::Thunderstorm, _) => "thunderstorm-outline",
            (Self::Drizzle | Self::Rain, _) => "rainy-outline",
            (Self::Snow, _) => "snow-outline",
            (Self::Atmosphere, _) => "weather-fog",
            (Self::Clear, false) => "day-sunny",
            (Self::Clear, true) => "moon-outline",
            (Self::FewClouds, false) => "partly-sunny-outline",
            (Self::FewClouds, true) => "cloudy-night-outline",
            (Self::Clouds, _) => "cloud-outline",
        }
    }
}
