use crate::{
    Config,
    model::{Coordinates, CurrentConditions, Forecast},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A weather data source. Locations are addressed either by coordinates
/// (device location) or by catalog city name (search results).
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, coords: Coordinates) -> anyhow::Result<CurrentConditions>;
    async fn current_by_name(&self, city: &str) -> anyhow::Result<CurrentConditions>;
    async fn forecast(&self, coords: Coordinates) -> anyhow::Result<Forecast>;
    async fn forecast_by_name(&self, city: &str) -> anyhow::Result<Forecast>;
}

/// Construct the provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `skywatch configure` and enter your OpenWeather API key."
        )
    })?;

    Ok(Box::new(OpenWeatherProvider::new(api_key.to_owned())))
}
