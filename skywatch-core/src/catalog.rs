//! Fixed catalog of searchable major cities.
//!
//! The catalog is a static asset compiled into the binary; search is the
//! autocomplete used by the city-search screen.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One catalog entry. The id doubles as the favorites storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCity {
    pub id: u64,
    pub name: String,
}

static CITIES: OnceLock<Vec<CatalogCity>> = OnceLock::new();

/// All catalog cities, in asset order.
pub fn all() -> &'static [CatalogCity] {
    CITIES.get_or_init(|| {
        serde_json::from_str(include_str!("../assets/major_cities.json"))
            .expect("embedded city catalog is valid JSON")
    })
}

/// Look a city up by its catalog id.
#[must_use]
pub fn find_by_id(id: u64) -> Option<&'static CatalogCity> {
    all().iter().find(|city| city.id == id)
}

/// Case-insensitive starts-with search over city names.
///
/// An empty query yields no matches; the search field clears its suggestion
/// list when emptied.
#[must_use]
pub fn search(prefix: &str) -> Vec<&'static CatalogCity> {
    if prefix.is_empty() {
        return Vec::new();
    }

    let needle = prefix.to_lowercase();
    all()
        .iter()
        .filter(|city| city.name.to_lowercase().starts_with(&needle))
        .collect()
}
