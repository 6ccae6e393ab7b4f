//! Map overlay layers and their tile URLs.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

const TILE_BASE: &str = "https://tile.openweathermap.org/map";

/// Overlay layers offered on the map screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapLayer {
    Clouds,
    Precipitation,
    Pressure,
    Wind,
    Temperature,
}

impl MapLayer {
    /// Layer identifier in the tile server's URL scheme.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            MapLayer::Clouds => "clouds_new",
            MapLayer::Precipitation => "precipitation_new",
            MapLayer::Pressure => "pressure_new",
            MapLayer::Wind => "wind_new",
            MapLayer::Temperature => "temp_new",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            MapLayer::Clouds => "Clouds",
            MapLayer::Precipitation => "Precipitation",
            MapLayer::Pressure => "Pressure",
            MapLayer::Wind => "Wind",
            MapLayer::Temperature => "Temperature",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [MapLayer] {
        &[
            MapLayer::Clouds,
            MapLayer::Precipitation,
            MapLayer::Pressure,
            MapLayer::Wind,
            MapLayer::Temperature,
        ]
    }

    /// URL of one overlay tile.
    #[must_use]
    pub fn tile_url(&self, z: u32, x: u32, y: u32, api_key: &str) -> String {
        format!("{TILE_BASE}/{}/{z}/{x}/{y}.png?appid={api_key}", self.slug())
    }

    /// Template with `{z}/{x}/{y}` placeholders, as map widgets expect.
    #[must_use]
    pub fn url_template(&self, api_key: &str) -> String {
        format!("{TILE_BASE}/{}/{{z}}/{{x}}/{{y}}.png?appid={api_key}", self.slug())
    }
}

impl std::fmt::Display for MapLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for MapLayer {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "clouds" | "clouds_new" => Ok(MapLayer::Clouds),
            "precipitation" | "precipitation_new" => Ok(MapLayer::Precipitation),
            "pressure" | "pressure_new" => Ok(MapLayer::Pressure),
            "wind" | "wind_new" => Ok(MapLayer::Wind),
            "temperature" | "temp" | "temp_new" => Ok(MapLayer::Temperature),
            _ => Err(anyhow!(
                "Unknown map layer '{value}'. Supported layers: clouds, precipitation, pressure, wind, temperature."
            )),
        }
    }
}
