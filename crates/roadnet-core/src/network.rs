//! The road network: graph, route table, and every operation that mutates
//! them.
//!
//! Each operation validates its arguments and computes everything it needs
//! before touching any state, so a failed call leaves the network exactly as
//! it was. Road removal is the one operation that may reroute several routes
//! at once; it finds a bypass for every affected route first and only then
//! commits all of them together.

use crate::description::{DescriptionError, Leg, RouteDescription};
use crate::graph::{RoadData, RoadGraph};
use crate::id::*;
use crate::registry::is_valid_city_name;
use crate::route::{Route, RouteStore};
use crate::search::{Path, SearchError, SearchScope, find_path};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors returned by network operations. Every error means the network was
/// left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("invalid city name {0:?}")]
    InvalidCityName(String),
    #[error("unknown city {0:?}")]
    UnknownCity(String),
    #[error("a road cannot join {0:?} to itself")]
    SelfLoop(String),
    #[error("a road between {0:?} and {1:?} already exists")]
    DuplicateRoad(String, String),
    #[error("no road between {0:?} and {1:?}")]
    NoSuchRoad(String, String),
    #[error("road length must be positive")]
    ZeroLength,
    #[error("road year must be nonzero")]
    ZeroYear,
    #[error("repair year {requested} precedes current year {current}")]
    YearRegression { current: i32, requested: i32 },
    #[error(transparent)]
    RouteId(#[from] InvalidRouteId),
    #[error("route {0} already exists")]
    RouteInUse(RouteId),
    #[error("route {0} does not exist")]
    UnknownRoute(RouteId),
    #[error("route {0} has no roads")]
    EmptyRoute(RouteId),
    #[error("city {city:?} already lies on route {route}")]
    CityOnRoute { route: RouteId, city: String },
    #[error("route {0} can be extended equally well from either end")]
    AmbiguousExtension(RouteId),
    #[error("route {route} has no bypass: {source}")]
    NoBypass { route: RouteId, source: SearchError },
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Description(#[from] DescriptionError),
    #[error("route visits {0:?} more than once")]
    RepeatedCity(String),
    #[error("road {0:?}-{1:?} does not match the existing road")]
    ConflictingRoad(String, String),
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Serializable view of one road.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RoadSummary {
    pub cities: [String; 2],
    pub length: u32,
    pub year: i32,
    pub routes: Vec<u16>,
}

/// Serializable view of one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub id: u16,
    pub cities: Vec<String>,
    pub length: u64,
    pub min_year: i32,
}

/// Serializable view of the whole network. Roads are sorted by city names so
/// two networks with the same content produce equal summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub cities: usize,
    pub roads: Vec<RoadSummary>,
    pub routes: Vec<RouteSummary>,
}

// ---------------------------------------------------------------------------
// RoadNetwork
// ---------------------------------------------------------------------------

/// Which end of a route an extension attaches to.
enum Extension {
    Head(Path),
    Tail(Path),
}

/// A road network together with its numbered routes.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    graph: RoadGraph,
    routes: RouteStore,
}

fn check_name(name: &str) -> Result<(), NetworkError> {
    if is_valid_city_name(name) {
        Ok(())
    } else {
        Err(NetworkError::InvalidCityName(name.to_owned()))
    }
}

impl RoadNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    #[cfg(test)]
    pub(crate) fn graph_mut_for_tests(&mut self) -> &mut RoadGraph {
        &mut self.graph
    }

    pub fn routes(&self) -> &RouteStore {
        &self.routes
    }

    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(id)
    }

    pub fn city_count(&self) -> usize {
        self.graph.city_count()
    }

    pub fn road_count(&self) -> usize {
        self.graph.road_count()
    }

    /// The road joining two named cities, if any.
    pub fn road(&self, a: &str, b: &str) -> Option<&RoadData> {
        let road = self.graph.road_between(self.graph.city(a)?, self.graph.city(b)?)?;
        self.graph.road(road)
    }

    /// Decode a stored route into its text form.
    pub fn route_description(&self, id: RouteId) -> Option<RouteDescription> {
        let route = self.routes.get(id)?;
        let mut at = route.start();
        let mut legs = Vec::with_capacity(route.roads().len());
        for &road in route.roads() {
            let data = self.graph.road(road)?;
            at = data.other(at);
            legs.push(Leg {
                length: data.length(),
                year: data.year(),
                to: self.graph.city_name(at).to_owned(),
            });
        }
        Some(RouteDescription {
            id,
            start: self.graph.city_name(route.start()).to_owned(),
            legs,
        })
    }

    /// Describe a route by raw id. Unused and out-of-range ids give an empty
    /// string.
    ///
    /// # Examples
    ///
    /// ```
    /// use roadnet_core::id::RouteId;
    /// use roadnet_core::network::RoadNetwork;
    ///
    /// let mut net = RoadNetwork::new();
    /// net.add_road("A", "B", 10, 2000).unwrap();
    /// net.new_route(RouteId::new(1).unwrap(), "A", "B").unwrap();
    /// assert_eq!(net.describe_route(1), "1;A;10;2000;B");
    /// assert_eq!(net.describe_route(0), "");
    /// assert_eq!(net.describe_route(2), "");
    /// ```
    pub fn describe_route(&self, raw_id: u32) -> String {
        RouteId::new(raw_id)
            .ok()
            .and_then(|id| self.route_description(id))
            .map(|description| description.to_string())
            .unwrap_or_default()
    }

    /// Build a serializable summary of the whole network.
    pub fn summary(&self) -> NetworkSummary {
        let mut roads: Vec<RoadSummary> = self
            .graph
            .roads()
            .map(|(_, data)| {
                let [a, b] = data.ends();
                let mut cities = [
                    self.graph.city_name(a).to_owned(),
                    self.graph.city_name(b).to_owned(),
                ];
                cities.sort();
                RoadSummary {
                    cities,
                    length: data.length(),
                    year: data.year(),
                    routes: data.routes().iter().map(|id| id.get()).collect(),
                }
            })
            .collect();
        roads.sort();

        let routes = self
            .routes
            .iter()
            .map(|(id, route)| RouteSummary {
                id: id.get(),
                cities: route
                    .cities(&self.graph)
                    .into_iter()
                    .map(|city| self.graph.city_name(city).to_owned())
                    .collect(),
                length: route.length(),
                min_year: route.min_year(),
            })
            .collect();

        NetworkSummary {
            cities: self.graph.city_count(),
            roads,
            routes,
        }
    }

    fn known_city(&self, name: &str) -> Result<CityId, NetworkError> {
        check_name(name)?;
        self.graph
            .city(name)
            .ok_or_else(|| NetworkError::UnknownCity(name.to_owned()))
    }

    /// Resolve the road between two named cities, validating both names.
    fn known_road(&self, a: &str, b: &str) -> Result<(CityId, CityId, RoadId), NetworkError> {
        check_name(a)?;
        check_name(b)?;
        if a == b {
            return Err(NetworkError::SelfLoop(a.to_owned()));
        }
        let first = self.known_city(a)?;
        let second = self.known_city(b)?;
        let road = self
            .graph
            .road_between(first, second)
            .ok_or_else(|| NetworkError::NoSuchRoad(a.to_owned(), b.to_owned()))?;
        Ok((first, second, road))
    }

    // -----------------------------------------------------------------------
    // Roads
    // -----------------------------------------------------------------------

    /// Add a road, creating either city if it does not exist yet.
    pub fn add_road(
        &mut self,
        a: &str,
        b: &str,
        length: u32,
        year: i32,
    ) -> Result<RoadId, NetworkError> {
        check_name(a)?;
        check_name(b)?;
        if a == b {
            return Err(NetworkError::SelfLoop(a.to_owned()));
        }
        if length == 0 {
            return Err(NetworkError::ZeroLength);
        }
        if year == 0 {
            return Err(NetworkError::ZeroYear);
        }
        if self.road(a, b).is_some() {
            return Err(NetworkError::DuplicateRoad(a.to_owned(), b.to_owned()));
        }

        let first = self.graph.ensure_city(a);
        let second = self.graph.ensure_city(b);
        let road = self.graph.connect(first, second, length, year);
        debug!(from = a, to = b, length, year, "road added");
        Ok(road)
    }

    /// Record a repair. The year may stay the same but never go back.
    pub fn repair_road(&mut self, a: &str, b: &str, year: i32) -> Result<(), NetworkError> {
        if year == 0 {
            return Err(NetworkError::ZeroYear);
        }
        let (_, _, road) = self.known_road(a, b)?;
        let current = self.graph.road(road).map_or(year, RoadData::year);
        if year < current {
            return Err(NetworkError::YearRegression {
                current,
                requested: year,
            });
        }

        self.graph.set_year(road, year);
        self.refresh_routes_on(road);
        debug!(from = a, to = b, year, "road repaired");
        Ok(())
    }

    /// Remove a road, rerouting every route that uses it.
    ///
    /// Each dependent route gets the unique best bypass between the road's
    /// endpoints that avoids the rest of that route. If any dependent route
    /// has no such bypass, nothing changes.
    pub fn remove_road(&mut self, a: &str, b: &str) -> Result<(), NetworkError> {
        let (first, second, road) = self.known_road(a, b)?;
        let dependents: Vec<RouteId> = self
            .graph
            .road(road)
            .map(|data| data.routes().iter().copied().collect())
            .unwrap_or_default();

        // Validate: every dependent route needs a bypass.
        let mut bypasses = Vec::with_capacity(dependents.len());
        for &id in &dependents {
            let route = self.routes.get(id).ok_or(NetworkError::UnknownRoute(id))?;
            let scope = SearchScope::excluding(route.cities(&self.graph))
                .allow(first)
                .allow(second)
                .ban(road);
            let bypass = find_path(&self.graph, first, second, &scope)
                .map_err(|source| NetworkError::NoBypass { route: id, source })?;
            bypasses.push((id, bypass));
        }

        // Commit.
        for (id, bypass) in bypasses {
            if let Some(route) = self.routes.get_mut(id) {
                route.splice(&self.graph, road, &bypass);
            }
            for &detour in &bypass.roads {
                self.graph.tag_route(detour, id);
            }
            debug!(route = %id, roads = bypass.roads.len(), "route rerouted");
        }
        self.graph.disconnect(road);
        debug!(from = a, to = b, rerouted = dependents.len(), "road removed");
        Ok(())
    }

    /// Recompute cached values of every route traversing `road`.
    fn refresh_routes_on(&mut self, road: RoadId) {
        let Some(data) = self.graph.road(road) else {
            return;
        };
        for &id in data.routes() {
            if let Some(route) = self.routes.get_mut(id) {
                route.refresh(&self.graph);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Routes
    // -----------------------------------------------------------------------

    /// Create a route along the unique best path between two cities.
    pub fn new_route(&mut self, id: RouteId, a: &str, b: &str) -> Result<(), NetworkError> {
        if self.routes.contains(id) {
            return Err(NetworkError::RouteInUse(id));
        }
        check_name(a)?;
        check_name(b)?;
        if a == b {
            return Err(NetworkError::SelfLoop(a.to_owned()));
        }
        let source = self.known_city(a)?;
        let destination = self.known_city(b)?;
        let path = find_path(
            &self.graph,
            source,
            destination,
            &SearchScope::unrestricted(),
        )?;

        let route = Route::from_path(path);
        self.tag_all(id, route.roads());
        debug!(route = %id, from = a, to = b, length = route.length(), "route created");
        self.routes.insert(id, route);
        Ok(())
    }

    /// Extend a route from one of its ends to `city`.
    ///
    /// Both ends are tried, each avoiding every city already on the route.
    /// The shorter extension wins, then the one whose oldest road is newer.
    /// A full tie fails.
    pub fn extend_route(&mut self, id: RouteId, city: &str) -> Result<(), NetworkError> {
        let route = self.routes.get(id).ok_or(NetworkError::UnknownRoute(id))?;
        let target = self.known_city(city)?;
        let on_route = route.cities(&self.graph);
        if on_route.contains(&target) {
            return Err(NetworkError::CityOnRoute {
                route: id,
                city: city.to_owned(),
            });
        }

        let scope = SearchScope::excluding(on_route);
        let head = find_path(
            &self.graph,
            route.start(),
            target,
            &scope.clone().allow(route.start()),
        );
        let tail = find_path(&self.graph, route.end(), target, &scope.allow(route.end()));

        let extension = match (head, tail) {
            (Err(err), Err(_)) => return Err(err.into()),
            (Ok(head), Err(_)) => Extension::Head(head),
            (Err(_), Ok(tail)) => Extension::Tail(tail),
            (Ok(head), Ok(tail)) => match head.rank(&tail) {
                Ordering::Less => Extension::Head(head),
                Ordering::Greater => Extension::Tail(tail),
                Ordering::Equal => return Err(NetworkError::AmbiguousExtension(id)),
            },
        };

        let Some(route) = self.routes.get_mut(id) else {
            return Err(NetworkError::UnknownRoute(id));
        };
        match extension {
            Extension::Head(path) => route.prepend(&self.graph, path),
            Extension::Tail(path) => route.append(&self.graph, path),
        }
        let roads = route.roads().to_vec();
        self.tag_all(id, &roads);
        debug!(route = %id, to = city, "route extended");
        Ok(())
    }

    /// Delete a route. Its roads stay in the network.
    pub fn remove_route(&mut self, id: RouteId) -> Result<(), NetworkError> {
        let route = self.routes.remove(id).ok_or(NetworkError::UnknownRoute(id))?;
        for &road in route.roads() {
            self.graph.untag_route(road, id);
        }
        debug!(route = %id, "route removed");
        Ok(())
    }

    /// Store a route given in text form exactly as described.
    ///
    /// Missing cities and roads are created. A described road that already
    /// exists must have the same length and a year no older than the
    /// existing one; a newer year counts as a repair.
    pub fn ingest_route(&mut self, description: &RouteDescription) -> Result<(), NetworkError> {
        let id = description.id;
        if self.routes.contains(id) {
            return Err(NetworkError::RouteInUse(id));
        }
        if description.legs.is_empty() {
            return Err(NetworkError::EmptyRoute(id));
        }

        let mut seen = HashSet::new();
        for name in description.cities() {
            check_name(name)?;
            if !seen.insert(name) {
                return Err(NetworkError::RepeatedCity(name.to_owned()));
            }
        }

        let mut from = description.start.as_str();
        for leg in &description.legs {
            if leg.length == 0 {
                return Err(NetworkError::ZeroLength);
            }
            if leg.year == 0 {
                return Err(NetworkError::ZeroYear);
            }
            if let Some(existing) = self.road(from, &leg.to)
                && (existing.length() != leg.length || existing.year() > leg.year)
            {
                return Err(NetworkError::ConflictingRoad(from.to_owned(), leg.to.clone()));
            }
            from = leg.to.as_str();
        }

        // Commit.
        let start = self.graph.ensure_city(&description.start);
        let mut at = start;
        let mut roads = Vec::with_capacity(description.legs.len());
        let mut repaired = Vec::new();
        for leg in &description.legs {
            let next = self.graph.ensure_city(&leg.to);
            let road = match self.graph.road_between(at, next) {
                Some(road) => {
                    if self.graph.road(road).is_some_and(|data| data.year() < leg.year) {
                        self.graph.set_year(road, leg.year);
                        repaired.push(road);
                    }
                    road
                }
                None => self.graph.connect(at, next, leg.length, leg.year),
            };
            roads.push(road);
            at = next;
        }
        for road in repaired {
            self.refresh_routes_on(road);
        }

        let route = Route::from_roads(&self.graph, start, roads);
        self.tag_all(id, route.roads());
        debug!(route = %id, roads = route.roads().len(), "route ingested");
        self.routes.insert(id, route);
        Ok(())
    }

    /// Parse and ingest a route description.
    pub fn ingest_route_text(&mut self, text: &str) -> Result<(), NetworkError> {
        let description = RouteDescription::parse(text)?;
        self.ingest_route(&description)
    }

    fn tag_all(&mut self, id: RouteId, roads: &[RoadId]) {
        for &road in roads {
            self.graph.tag_route(road, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn add_road_rejections() {
        let mut net = RoadNetwork::new();
        assert_eq!(
            net.add_road("", "B", 1, 1),
            Err(NetworkError::InvalidCityName(String::new()))
        );
        assert_eq!(
            net.add_road("A;", "B", 1, 1),
            Err(NetworkError::InvalidCityName("A;".into()))
        );
        assert_eq!(
            net.add_road("A", "A", 1, 1),
            Err(NetworkError::SelfLoop("A".into()))
        );
        assert_eq!(net.add_road("A", "B", 0, 1), Err(NetworkError::ZeroLength));
        assert_eq!(net.add_road("A", "B", 1, 0), Err(NetworkError::ZeroYear));
        assert_eq!(net.city_count(), 0);

        net.add_road("A", "B", 1, 1).unwrap();
        assert_eq!(
            net.add_road("B", "A", 2, 2),
            Err(NetworkError::DuplicateRoad("B".into(), "A".into()))
        );
        assert_eq!(net.road_count(), 1);
        assert_eq!(net.road("A", "B").unwrap().length(), 1);
    }

    #[test]
    fn repair_is_monotonic() {
        let mut net = network(&[("A", "B", 1, 2000)]);
        assert_eq!(
            net.repair_road("A", "B", 1999),
            Err(NetworkError::YearRegression {
                current: 2000,
                requested: 1999
            })
        );
        net.repair_road("A", "B", 2000).unwrap();
        net.repair_road("B", "A", 2005).unwrap();
        assert_eq!(net.road("A", "B").unwrap().year(), 2005);

        assert_eq!(net.repair_road("A", "B", 0), Err(NetworkError::ZeroYear));
        assert_eq!(
            net.repair_road("A", "C", 2010),
            Err(NetworkError::UnknownCity("C".into()))
        );
        assert_eq!(
            net.repair_road("A", "A", 2010),
            Err(NetworkError::SelfLoop("A".into()))
        );
    }

    #[test]
    fn repair_refreshes_route_cache() {
        let mut net = network(&[("A", "B", 1, 2000), ("B", "C", 1, 2001)]);
        net.new_route(route_id(1), "A", "C").unwrap();
        assert_eq!(net.route(route_id(1)).unwrap().min_year(), 2000);
        net.repair_road("A", "B", 2010).unwrap();
        assert_eq!(net.route(route_id(1)).unwrap().min_year(), 2001);
        assert_eq!(net.describe_route(1), "1;A;1;2010;B;1;2001;C");
    }

    #[test]
    fn new_route_tags_roads() {
        let mut net = network(&[("A", "B", 1, 2000), ("B", "C", 1, 2001)]);
        net.new_route(route_id(4), "C", "A").unwrap();
        assert_eq!(net.describe_route(4), "4;C;1;2001;B;1;2000;A");
        assert!(net.road("A", "B").unwrap().routes().contains(&route_id(4)));
        assert!(net.road("B", "C").unwrap().routes().contains(&route_id(4)));
        assert_valid(&net);
    }

    #[test]
    fn new_route_rejections() {
        let mut net = network(&[("A", "B", 1, 2000), ("C", "D", 1, 2000)]);
        net.new_route(route_id(1), "A", "B").unwrap();
        assert_eq!(
            net.new_route(route_id(1), "A", "B"),
            Err(NetworkError::RouteInUse(route_id(1)))
        );
        assert_eq!(
            net.new_route(route_id(2), "A", "A"),
            Err(NetworkError::SelfLoop("A".into()))
        );
        assert_eq!(
            net.new_route(route_id(2), "A", "X"),
            Err(NetworkError::UnknownCity("X".into()))
        );
        assert_eq!(
            net.new_route(route_id(2), "A", "D"),
            Err(NetworkError::Search(SearchError::NoPath))
        );
        assert!(net.route(route_id(2)).is_none());
    }

    #[test]
    fn extend_from_tail() {
        let mut net = network(&[("A", "B", 1, 2000), ("B", "C", 1, 2000), ("C", "D", 3, 1990)]);
        net.new_route(route_id(1), "A", "C").unwrap();
        net.extend_route(route_id(1), "D").unwrap();
        assert_eq!(net.describe_route(1), "1;A;1;2000;B;1;2000;C;3;1990;D");
        assert_eq!(net.route(route_id(1)).unwrap().min_year(), 1990);
        assert_valid(&net);
    }

    #[test]
    fn extend_from_head() {
        let mut net = network(&[("A", "B", 1, 2000), ("B", "C", 1, 2000), ("D", "A", 3, 1990)]);
        net.new_route(route_id(1), "A", "C").unwrap();
        net.extend_route(route_id(1), "D").unwrap();
        assert_eq!(net.describe_route(1), "1;D;3;1990;A;1;2000;B;1;2000;C");
        assert_valid(&net);
    }

    #[test]
    fn extend_cannot_cross_route() {
        // D is reachable from C only through A, which is already on the route.
        let mut net = network(&[
            ("A", "B", 1, 2000),
            ("B", "C", 1, 2000),
            ("A", "D", 1, 2000),
        ]);
        net.new_route(route_id(1), "C", "B").unwrap();
        net.extend_route(route_id(1), "A").unwrap();
        assert_eq!(net.describe_route(1), "1;C;1;2000;B;1;2000;A");
        net.extend_route(route_id(1), "D").unwrap();
        assert_eq!(net.describe_route(1), "1;C;1;2000;B;1;2000;A;1;2000;D");
    }

    #[test]
    fn extend_rejections() {
        let mut net = network(&[("A", "B", 1, 2000), ("X", "Y", 1, 2000)]);
        net.new_route(route_id(1), "A", "B").unwrap();
        assert_eq!(
            net.extend_route(route_id(2), "X"),
            Err(NetworkError::UnknownRoute(route_id(2)))
        );
        assert_eq!(
            net.extend_route(route_id(1), "B"),
            Err(NetworkError::CityOnRoute {
                route: route_id(1),
                city: "B".into()
            })
        );
        assert_eq!(
            net.extend_route(route_id(1), "X"),
            Err(NetworkError::Search(SearchError::NoPath))
        );
        assert_eq!(
            net.extend_route(route_id(1), "Nowhere"),
            Err(NetworkError::UnknownCity("Nowhere".into()))
        );
        assert_eq!(net.describe_route(1), "1;A;1;2000;B");
    }

    #[test]
    fn extend_prefers_newer_on_equal_length() {
        let mut net = network(&[
            ("A", "B", 1, 2000),
            ("A", "X", 2, 1995),
            ("B", "X", 2, 1996),
        ]);
        net.new_route(route_id(1), "A", "B").unwrap();
        net.extend_route(route_id(1), "X").unwrap();
        assert_eq!(net.describe_route(1), "1;A;1;2000;B;2;1996;X");
    }

    #[test]
    fn remove_unused_road() {
        let mut net = network(&[("A", "B", 1, 2000)]);
        net.remove_road("B", "A").unwrap();
        assert_eq!(net.road_count(), 0);
        assert_eq!(net.city_count(), 2);
        assert!(net.graph().incident(net.graph().city("A").unwrap()).is_empty());
        assert_eq!(
            net.remove_road("A", "B"),
            Err(NetworkError::NoSuchRoad("A".into(), "B".into()))
        );
    }

    #[test]
    fn remove_road_reroutes_in_place() {
        let mut net = network(&[
            ("A", "B", 1, 2000),
            ("B", "C", 1, 2000),
            ("C", "D", 1, 2000),
            ("B", "X", 2, 1980),
            ("X", "C", 2, 1990),
        ]);
        net.new_route(route_id(1), "D", "A").unwrap();
        assert_eq!(net.describe_route(1), "1;D;1;2000;C;1;2000;B;1;2000;A");

        net.remove_road("B", "C").unwrap();
        assert!(net.road("B", "C").is_none());
        assert_eq!(
            net.describe_route(1),
            "1;D;1;2000;C;2;1990;X;2;1980;B;1;2000;A"
        );
        let route = net.route(route_id(1)).unwrap();
        assert_eq!(route.length(), 6);
        assert_eq!(route.min_year(), 1980);
        assert_valid(&net);
    }

    #[test]
    fn remove_road_without_bypass_changes_nothing() {
        let mut net = network(&[("A", "B", 1, 2000), ("B", "C", 1, 2000)]);
        net.new_route(route_id(1), "A", "C").unwrap();
        let before = net.summary();
        assert_eq!(
            net.remove_road("A", "B"),
            Err(NetworkError::NoBypass {
                route: route_id(1),
                source: SearchError::NoPath
            })
        );
        assert_eq!(net.summary(), before);
    }

    #[test]
    fn remove_route_untags() {
        let mut net = network(&[("A", "B", 1, 2000)]);
        net.new_route(route_id(1), "A", "B").unwrap();
        net.remove_route(route_id(1)).unwrap();
        assert!(net.road("A", "B").unwrap().routes().is_empty());
        assert_eq!(net.describe_route(1), "");
        assert_eq!(
            net.remove_route(route_id(1)),
            Err(NetworkError::UnknownRoute(route_id(1)))
        );
        // The id is free again.
        net.new_route(route_id(1), "B", "A").unwrap();
    }

    #[test]
    fn ingest_creates_and_repairs() {
        let mut net = network(&[("A", "B", 5, 2000)]);
        net.ingest_route_text("12;A;5;2010;B;7;1999;C").unwrap();
        assert_eq!(net.road("A", "B").unwrap().year(), 2010);
        assert_eq!(net.road("B", "C").unwrap().length(), 7);
        assert_eq!(net.describe_route(12), "12;A;5;2010;B;7;1999;C");
        assert_eq!(net.route(route_id(12)).unwrap().min_year(), 1999);
        assert_valid(&net);
    }

    #[test]
    fn ingest_rejections_leave_network_unchanged() {
        let mut net = network(&[("A", "B", 5, 2000)]);
        net.ingest_route_text("1;A;5;2000;B").unwrap();
        let before = net.summary();

        let cases = [
            ("1;A;5;2000;B", NetworkError::RouteInUse(route_id(1))),
            ("2;A;6;2000;B", NetworkError::ConflictingRoad("A".into(), "B".into())),
            ("2;A;5;1999;B", NetworkError::ConflictingRoad("A".into(), "B".into())),
            ("2;C;1;1;D;1;1;C", NetworkError::RepeatedCity("C".into())),
            ("2;C;1;1;C", NetworkError::RepeatedCity("C".into())),
            ("2;C;0;1;D", NetworkError::ZeroLength),
            ("2;C;1;0;D", NetworkError::ZeroYear),
            ("2;C;1;1;", NetworkError::InvalidCityName(String::new())),
        ];
        for (text, expected) in cases {
            assert_eq!(net.ingest_route_text(text), Err(expected), "{text}");
            assert_eq!(net.summary(), before, "{text}");
        }
        assert!(matches!(
            net.ingest_route_text("0;C;1;1;D"),
            Err(NetworkError::Description(_))
        ));
    }

    #[test]
    fn ingest_without_roads_is_rejected() {
        let mut net = network(&[("A", "B", 5, 2000)]);
        let before = net.summary();
        let description = RouteDescription {
            id: route_id(5),
            start: "Solo".into(),
            legs: Vec::new(),
        };
        assert_eq!(
            net.ingest_route(&description),
            Err(NetworkError::EmptyRoute(route_id(5)))
        );
        assert_eq!(net.summary(), before);
        assert!(net.graph().city("Solo").is_none());
        assert_eq!(net.describe_route(5), "");
        assert_valid(&net);
    }

    #[test]
    fn summary_is_sorted() {
        let mut net = network(&[("Z", "A", 1, 2000), ("B", "C", 2, 2001)]);
        net.new_route(route_id(3), "A", "Z").unwrap();
        let summary = net.summary();
        assert_eq!(summary.cities, 4);
        assert_eq!(summary.roads[0].cities, ["A".to_string(), "Z".to_string()]);
        assert_eq!(summary.roads[0].routes, vec![3]);
        assert_eq!(summary.routes[0].cities, vec!["A", "Z"]);
    }
}
