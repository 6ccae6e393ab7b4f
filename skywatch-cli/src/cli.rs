use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use skywatch_core::{
    Config, Coordinates, FavoriteCity, FavoritesStore, MapLayer, catalog,
    provider::provider_from_config,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skywatch", version, about = "Weather browser CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current conditions for a city, or for explicit coordinates.
    Now {
        /// City name from the catalog; omit when passing --lat/--lon.
        city: Option<String>,

        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Show the 5-day forecast, one entry per day.
    Forecast {
        /// City name from the catalog.
        city: String,

        /// Show the next 3-hour slots instead of daily entries.
        #[arg(long)]
        hourly: bool,
    },

    /// Search the city catalog by name prefix.
    Search {
        prefix: String,
    },

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },

    /// Print the overlay tile URL template for map widgets.
    Map {
        /// Layer: clouds, precipitation, pressure, wind, or temperature.
        #[arg(long)]
        layer: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List saved cities, device location first.
    List,

    /// Fetch current conditions for a catalog city and save it.
    Add { city: String },

    /// Remove a saved city.
    Remove { city: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Now { city, lat, lon } => show_now(&config, city, lat, lon).await,
            Command::Forecast { city, hourly } => show_forecast(&config, &city, hourly).await,
            Command::Search { prefix } => {
                search(&prefix);
                Ok(())
            }
            Command::Favorites { command } => favorites(&config, command).await,
            Command::Map { layer } => show_map(&config, layer),
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = inquire::Text::new("OpenWeather API key:")
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key cannot be empty.");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show_now(
    config: &Config,
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;

    let current = match (city, lat, lon) {
        (Some(name), None, None) => provider.current_by_name(&name).await?,
        (None, Some(latitude), Some(longitude)) => {
            provider.current(Coordinates { latitude, longitude }).await?
        }
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            bail!("Pass either a city name or --lat/--lon, not both.")
        }
        _ => bail!("Pass a city name or both --lat and --lon."),
    };

    print!("{}", output::render_current(&current));
    Ok(())
}

async fn show_forecast(config: &Config, city: &str, hourly: bool) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let forecast = provider.forecast_by_name(city).await?;

    print!("{}", output::render_forecast(&forecast, hourly));
    Ok(())
}

fn search(prefix: &str) {
    let matches = catalog::search(prefix);

    if matches.is_empty() {
        println!("No catalog cities match '{prefix}'.");
        return;
    }

    for city in matches {
        println!("{}  (id {})", city.name, city.id);
    }
}

async fn favorites(config: &Config, command: FavoritesCommand) -> anyhow::Result<()> {
    let store = FavoritesStore::open(config.favorite_limit())?;

    match command {
        FavoritesCommand::List => {
            let saved = store.list()?;
            if saved.is_empty() {
                println!("No favorite cities saved yet.");
                return Ok(());
            }
            for favorite in saved {
                println!("{}", output::render_favorite_line(&favorite));
            }
        }

        FavoritesCommand::Add { city } => {
            let entry = find_catalog_city(&city)?;
            let provider = provider_from_config(config)?;
            let conditions = provider.current_by_name(&entry.name).await?;

            store.save(&FavoriteCity {
                city_id: entry.id,
                name: entry.name.clone(),
                my_location: false,
                conditions,
            })?;
            println!("Saved {} to favorites.", entry.name);
        }

        FavoritesCommand::Remove { city } => {
            let entry = find_catalog_city(&city)?;
            if store.remove(entry.id)? {
                println!("Removed {} from favorites.", entry.name);
            } else {
                println!("{} was not in your favorites.", entry.name);
            }
        }
    }

    Ok(())
}

fn show_map(config: &Config, layer: Option<String>) -> anyhow::Result<()> {
    let layer = match layer {
        Some(s) => MapLayer::try_from(s.as_str())?,
        None => config.default_layer()?,
    };

    let api_key = config.api_key().unwrap_or("<API_KEY>");

    println!("{}: {}", layer.label(), layer.url_template(api_key));
    Ok(())
}

fn find_catalog_city(name: &str) -> anyhow::Result<&'static catalog::CatalogCity> {
    catalog::all()
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "'{name}' is not in the city catalog.\n\
                 Hint: run `skywatch search <prefix>` to list matching cities."
            )
        })
}
