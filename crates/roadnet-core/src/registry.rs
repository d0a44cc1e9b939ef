//! City registry: name-keyed lookup and creation of city vertices.
//!
//! Cities are stored in a `SlotMap` and indexed by name. A city is created
//! the first time a road (or an ingested route) mentions it and lives until
//! the whole network is dropped.

use crate::id::CityId;
use slotmap::SlotMap;
use std::collections::HashMap;

/// Returns true if `name` may be used as a city name.
///
/// A valid name is non-empty and contains neither `;` nor any byte in
/// `0..=31`.
///
/// # Examples
///
/// ```
/// use roadnet_core::registry::is_valid_city_name;
///
/// assert!(is_valid_city_name("Kraków"));
/// assert!(!is_valid_city_name(""));
/// assert!(!is_valid_city_name("A;B"));
/// assert!(!is_valid_city_name("tab\there"));
/// ```
pub fn is_valid_city_name(name: &str) -> bool {
    !name.is_empty() && !name.bytes().any(|b| b <= 31 || b == b';')
}

/// A named vertex of the road network.
#[derive(Debug, Clone)]
pub struct City {
    name: String,
}

impl City {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Name-keyed table of cities.
#[derive(Debug, Clone, Default)]
pub struct CityRegistry {
    cities: SlotMap<CityId, City>,
    by_name: HashMap<String, CityId>,
}

impl CityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a city by name.
    pub fn find(&self, name: &str) -> Option<CityId> {
        self.by_name.get(name).copied()
    }

    /// Return the existing city called `name`, creating it if needed.
    ///
    /// The caller is responsible for validating the name first.
    pub fn find_or_insert(&mut self, name: &str) -> CityId {
        if let Some(id) = self.find(name) {
            return id;
        }
        let id = self.cities.insert(City {
            name: name.to_owned(),
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    pub fn get(&self, city: CityId) -> Option<&City> {
        self.cities.get(city)
    }

    /// Name of a city, or the empty string for a stale id.
    pub fn name(&self, city: CityId) -> &str {
        self.cities.get(city).map(City::name).unwrap_or("")
    }

    pub fn contains(&self, city: CityId) -> bool {
        self.cities.contains_key(city)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CityId, &City)> {
        self.cities.iter()
    }
}
