//! Core library for the `skywatch` weather browser.
//!
//! This crate defines:
//! - Day/night resolution in the observed location's local time
//! - Validated domain models for provider payloads
//! - The OpenWeather client, city catalog, and favorites persistence
//! - Configuration handling and map overlay layers
//!
//! It is used by `skywatch-cli`, but can also be reused by other binaries or services.

pub mod catalog;
pub mod condition;
pub mod config;
pub mod daytime;
pub mod favorites;
pub mod model;
pub mod provider;
pub mod tiles;

pub use condition::Condition;
pub use config::Config;
pub use daytime::{LocalDayTime, SunTimes, hour_of_day, resolve, resolve_at};
pub use favorites::{FavoriteCity, FavoritesStore};
pub use model::{AppEnvironment, Coordinates, CurrentConditions, Forecast, PayloadError, Theme};
pub use provider::WeatherProvider;
pub use tiles::MapLayer;
