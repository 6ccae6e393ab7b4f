//! Persistence for favorited cities: one JSON blob per city in the platform
//! data directory, keyed `city-<id>.json`.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::CurrentConditions;

/// Stock cap on saved cities.
pub const DEFAULT_LIMIT: usize = 5;

/// One saved city: catalog identity plus the last-seen conditions, kept so
/// the list screen can resolve day/night per city without refetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteCity {
    pub city_id: u64,
    /// Catalog name, which may differ from the provider's location name.
    pub name: String,
    /// Marks the device-location entry, which sorts first and is exempt
    /// from removal in edit mode.
    #[serde(default)]
    pub my_location: bool,
    pub conditions: CurrentConditions,
}

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("Cannot save more than {limit} favorite cities.")]
    LimitReached { limit: usize },

    #[error("'{name}' has already been added to your favorites.")]
    AlreadySaved { name: String },

    #[error("favorites storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("favorite entry is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// File-backed favorites store. The root directory is injectable so tests
/// run against a scratch directory.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    root: PathBuf,
    limit: usize,
}

impl FavoritesStore {
    /// Open the store in the platform data directory.
    pub fn open(limit: usize) -> anyhow::Result<Self> {
        let dirs = crate::config::project_dirs()?;
        Ok(Self::with_root(dirs.data_dir().join("favorites"), limit))
    }

    pub fn with_root(root: impl Into<PathBuf>, limit: usize) -> Self {
        Self { root: root.into(), limit }
    }

    fn entry_path(&self, city_id: u64) -> PathBuf {
        self.root.join(format!("city-{city_id}.json"))
    }

    pub fn is_saved(&self, city_id: u64) -> bool {
        self.entry_path(city_id).exists()
    }

    /// Save a city, refusing past the cap or when it is already saved.
    pub fn save(&self, favorite: &FavoriteCity) -> Result<(), FavoritesError> {
        if self.is_saved(favorite.city_id) {
            return Err(FavoritesError::AlreadySaved { name: favorite.name.clone() });
        }

        if self.list()?.len() >= self.limit {
            return Err(FavoritesError::LimitReached { limit: self.limit });
        }

        fs::create_dir_all(&self.root)?;

        let blob = serde_json::to_vec_pretty(favorite)?;
        fs::write(self.entry_path(favorite.city_id), blob)?;

        debug!(city_id = favorite.city_id, name = %favorite.name, "saved favorite city");
        Ok(())
    }

    /// Load one saved city, `None` when it isn't saved.
    pub fn load(&self, city_id: u64) -> Result<Option<FavoriteCity>, FavoritesError> {
        let path = self.entry_path(city_id);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Remove a saved city. Returns whether an entry was actually removed.
    pub fn remove(&self, city_id: u64) -> Result<bool, FavoritesError> {
        let path = self.entry_path(city_id);
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(path)?;
        debug!(city_id, "removed favorite city");
        Ok(true)
    }

    /// All saved cities, device-location entry first. Entries that fail to
    /// parse are skipped, since storage may hold blobs from older versions.
    pub fn list(&self) -> Result<Vec<FavoriteCity>, FavoritesError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut favorites = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !is_city_entry(&path) {
                continue;
            }

            match fs::read_to_string(&path).map_err(FavoritesError::from).and_then(|contents| {
                serde_json::from_str::<FavoriteCity>(&contents).map_err(FavoritesError::from)
            }) {
                Ok(favorite) => favorites.push(favorite),
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unreadable favorite entry");
                }
            }
        }

        favorites.sort_by(|a, b| b.my_location.cmp(&a.my_location).then(a.name.cmp(&b.name)));
        Ok(favorites)
    }
}

fn is_city_entry(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("city-") && n.ends_with(".json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::daytime::SunTimes;
    use crate::model::Coordinates;
    use chrono::Utc;

    fn favorite(city_id: u64, name: &str, my_location: bool) -> FavoriteCity {
        FavoriteCity {
            city_id,
            name: name.to_string(),
            my_location,
            conditions: CurrentConditions {
                location_name: name.to_string(),
                coordinates: Coordinates { latitude: 0.0, longitude: 0.0 },
                temperature_c: 20.0,
                feels_like_c: 19.0,
                humidity_pct: 50,
                wind_speed_mps: 3.0,
                wind_direction_deg: 180.0,
                condition: Condition::Clear,
                condition_text: "clear sky".to_string(),
                observation_time: Utc::now(),
                sun_times: SunTimes {
                    utc_offset_seconds: 0,
                    sunrise_epoch_seconds: 1_699_946_640,
                    sunset_epoch_seconds: 1_699_983_120,
                },
            },
        }
    }

    fn scratch_store(limit: usize) -> (tempfile::TempDir, FavoritesStore) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = FavoritesStore::with_root(dir.path().join("favorites"), limit);
        (dir, store)
    }

    #[test]
    fn save_load_remove_roundtrip() {
        let (_dir, store) = scratch_store(DEFAULT_LIMIT);

        store.save(&favorite(1, "Lisbon", false)).expect("save succeeds");
        assert!(store.is_saved(1));

        let loaded = store.load(1).expect("load succeeds").expect("entry exists");
        assert_eq!(loaded.name, "Lisbon");
        assert_eq!(loaded.conditions.condition, Condition::Clear);

        assert!(store.remove(1).expect("remove succeeds"));
        assert!(!store.is_saved(1));
        assert!(!store.remove(1).expect("second remove is a no-op"));
    }

    #[test]
    fn load_of_unsaved_city_is_none() {
        let (_dir, store) = scratch_store(DEFAULT_LIMIT);
        assert!(store.load(42).expect("load succeeds").is_none());
    }

    #[test]
    fn duplicate_save_is_rejected() {
        let (_dir, store) = scratch_store(DEFAULT_LIMIT);
        store.save(&favorite(1, "Lisbon", false)).expect("first save");

        let err = store.save(&favorite(1, "Lisbon", false)).unwrap_err();
        assert!(matches!(err, FavoritesError::AlreadySaved { .. }));
        assert!(err.to_string().contains("already been added"));
    }

    #[test]
    fn cap_is_enforced() {
        let (_dir, store) = scratch_store(2);
        store.save(&favorite(1, "Lisbon", false)).expect("save 1");
        store.save(&favorite(2, "Oslo", false)).expect("save 2");

        let err = store.save(&favorite(3, "Quito", false)).unwrap_err();
        assert!(matches!(err, FavoritesError::LimitReached { limit: 2 }));
    }

    #[test]
    fn list_puts_device_location_first_and_skips_corrupt_entries() {
        let (_dir, store) = scratch_store(DEFAULT_LIMIT);
        store.save(&favorite(1, "Zurich", false)).expect("save");
        store.save(&favorite(2, "Accra", true)).expect("save");
        store.save(&favorite(3, "Lisbon", false)).expect("save");

        // A corrupt blob in storage must not break listing.
        fs::write(store.entry_path(99), "{broken").expect("write corrupt entry");

        let listed = store.list().expect("list succeeds");
        assert_eq!(listed.len(), 3);
        assert!(listed[0].my_location);
        assert_eq!(listed[0].name, "Accra");
        assert_eq!(listed[1].name, "Lisbon");
        assert_eq!(listed[2].name, "Zurich");
    }

    #[test]
    fn listing_an_unopened_store_is_empty() {
        let (_dir, store) = scratch_store(DEFAULT_LIMIT);
        assert!(store.list().expect("list succeeds").is_empty());
    }
}
