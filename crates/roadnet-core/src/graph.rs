use crate::id::*;
use crate::registry::CityRegistry;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// Per-road data stored in the road graph.
///
/// Roads are undirected: `ends` is an unordered pair kept in the order the
/// road was created.
#[derive(Debug, Clone)]
pub struct RoadData {
    ends: [CityId; 2],
    length: u32,
    year: i32,
    /// Routes currently traversing this road.
    routes: BTreeSet<RouteId>,
}

impl RoadData {
    /// Both endpoints, in creation order.
    pub fn ends(&self) -> [CityId; 2] {
        self.ends
    }

    /// The endpoint opposite `city`.
    ///
    /// Returns the first endpoint when `city` is not on the road at all, so
    /// callers must only ask about one of the road's own endpoints.
    pub fn other(&self, city: CityId) -> CityId {
        if self.ends[0] == city {
            self.ends[1]
        } else {
            self.ends[0]
        }
    }

    pub fn joins(&self, city: CityId) -> bool {
        self.ends.contains(&city)
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Construction or latest repair year.
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn routes(&self) -> &BTreeSet<RouteId> {
        &self.routes
    }
}

// ---------------------------------------------------------------------------
// RoadGraph
// ---------------------------------------------------------------------------

/// The road graph: cities, undirected roads, and per-city adjacency.
///
/// Adjacency is stored in a `SecondaryMap` keyed by `CityId`, kept in sync
/// with the city registry. Each city's incident roads are listed in the
/// order they were attached.
///
/// Operations here are unchecked building blocks. Argument validation and
/// atomicity live in [`crate::network::RoadNetwork`].
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    cities: CityRegistry,
    roads: SlotMap<RoadId, RoadData>,
    adjacency: SecondaryMap<CityId, Vec<RoadId>>,
}

impl RoadGraph {
    /// Create a new, empty road graph.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Return the city called `name`, creating it with an empty adjacency
    /// list if it does not exist yet.
    pub(crate) fn ensure_city(&mut self, name: &str) -> CityId {
        let city = self.cities.find_or_insert(name);
        if !self.adjacency.contains_key(city) {
            self.adjacency.insert(city, Vec::new());
        }
        city
    }

    /// Create a road between two existing, distinct, unconnected cities.
    pub(crate) fn connect(&mut self, a: CityId, b: CityId, length: u32, year: i32) -> RoadId {
        debug_assert_ne!(a, b, "self-loop");
        debug_assert!(self.road_between(a, b).is_none(), "duplicate road");

        let road = self.roads.insert(RoadData {
            ends: [a, b],
            length,
            year,
            routes: BTreeSet::new(),
        });
        if let Some(adj) = self.adjacency.get_mut(a) {
            adj.push(road);
        }
        if let Some(adj) = self.adjacency.get_mut(b) {
            adj.push(road);
        }
        road
    }

    /// Detach a road from both endpoints and discard it.
    pub(crate) fn disconnect(&mut self, road: RoadId) -> Option<RoadData> {
        let data = self.roads.remove(road)?;
        for city in data.ends {
            if let Some(adj) = self.adjacency.get_mut(city) {
                adj.retain(|&r| r != road);
            }
        }
        Some(data)
    }

    pub(crate) fn set_year(&mut self, road: RoadId, year: i32) {
        if let Some(data) = self.roads.get_mut(road) {
            data.year = year;
        }
    }

    /// Record that `route` traverses `road`.
    pub(crate) fn tag_route(&mut self, road: RoadId, route: RouteId) {
        if let Some(data) = self.roads.get_mut(road) {
            data.routes.insert(route);
        }
    }

    /// Forget that `route` traverses `road`.
    pub(crate) fn untag_route(&mut self, road: RoadId, route: RouteId) {
        if let Some(data) = self.roads.get_mut(road) {
            data.routes.remove(&route);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn cities(&self) -> &CityRegistry {
        &self.cities
    }

    /// Look up a city by name.
    pub fn city(&self, name: &str) -> Option<CityId> {
        self.cities.find(name)
    }

    pub fn city_name(&self, city: CityId) -> &str {
        self.cities.name(city)
    }

    pub fn road(&self, road: RoadId) -> Option<&RoadData> {
        self.roads.get(road)
    }

    /// Roads incident to a city, in attachment order.
    pub fn incident(&self, city: CityId) -> &[RoadId] {
        self.adjacency
            .get(city)
            .map(|adj| adj.as_slice())
            .unwrap_or(&[])
    }

    /// Cities visited by walking `roads` from `start`, start first. Roads
    /// no longer in the graph are skipped.
    pub fn walk(&self, start: CityId, roads: &[RoadId]) -> Vec<CityId> {
        let mut cities = Vec::with_capacity(roads.len() + 1);
        let mut at = start;
        cities.push(at);
        for &road in roads {
            if let Some(data) = self.roads.get(road) {
                at = data.other(at);
                cities.push(at);
            }
        }
        cities
    }

    /// Find the road joining two cities.
    ///
    /// Scans the adjacency of whichever city has the lower degree.
    pub fn road_between(&self, a: CityId, b: CityId) -> Option<RoadId> {
        let (scan, target) = if self.incident(a).len() <= self.incident(b).len() {
            (a, b)
        } else {
            (b, a)
        };
        self.incident(scan).iter().copied().find(|&r| {
            self.roads
                .get(r)
                .is_some_and(|data| data.other(scan) == target)
        })
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn contains_road(&self, road: RoadId) -> bool {
        self.roads.contains_key(road)
    }

    /// Iterate over all roads and their data.
    pub fn roads(&self) -> impl Iterator<Item = (RoadId, &RoadData)> {
        self.roads.iter()
    }
}
