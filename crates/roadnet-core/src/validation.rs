//! Structural consistency checks for a road network.
//!
//! [`validate`] walks the whole network and reports every broken invariant
//! it finds. Operations never leave a network in a state this reports on;
//! the checks exist for tests and for callers that want to audit a network
//! after a long command sequence.

use crate::id::{CityId, RoadId, RouteId};
use crate::network::RoadNetwork;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A single broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("road {0:?} joins a city to itself")]
    SelfLoop(RoadId),
    #[error("road {0:?} references a missing city")]
    DanglingRoad(RoadId),
    #[error("cities {0:?} and {1:?} are joined by more than one road")]
    ParallelRoads(CityId, CityId),
    #[error("road {road:?} is missing from the adjacency of {city:?}")]
    MissingAdjacency { road: RoadId, city: CityId },
    #[error("adjacency of {city:?} lists foreign road {road:?}")]
    ForeignAdjacency { road: RoadId, city: CityId },
    #[error("route {0} has no roads")]
    EmptyRoute(RouteId),
    #[error("route {0} is not a connected path")]
    BrokenRoute(RouteId),
    #[error("route {0} visits a city twice")]
    RepeatedCity(RouteId),
    #[error("route {0} has stale cached values")]
    StaleCache(RouteId),
    #[error("road {road:?} carries tags {tagged:?} but is used by {actual:?}")]
    TagMismatch {
        road: RoadId,
        tagged: Vec<RouteId>,
        actual: Vec<RouteId>,
    },
}

/// Check every structural invariant of `net`. An empty result means the
/// network is consistent.
pub fn validate(net: &RoadNetwork) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_roads(net, &mut violations);
    let usage = check_routes(net, &mut violations);
    check_tags(net, &usage, &mut violations);
    violations
}

fn check_roads(net: &RoadNetwork, violations: &mut Vec<Violation>) {
    let graph = net.graph();
    let mut pairs = HashSet::new();

    for (road, data) in graph.roads() {
        let [a, b] = data.ends();
        if a == b {
            violations.push(Violation::SelfLoop(road));
        }
        if !graph.cities().contains(a) || !graph.cities().contains(b) {
            violations.push(Violation::DanglingRoad(road));
            continue;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if !pairs.insert(key) {
            violations.push(Violation::ParallelRoads(key.0, key.1));
        }
        for city in [a, b] {
            if !graph.incident(city).contains(&road) {
                violations.push(Violation::MissingAdjacency { road, city });
            }
        }
    }

    for (city, _) in graph.cities().iter() {
        for &road in graph.incident(city) {
            if !graph.road(road).is_some_and(|data| data.joins(city)) {
                violations.push(Violation::ForeignAdjacency { road, city });
            }
        }
    }
}

/// Returns the set of routes actually traversing each road.
fn check_routes(
    net: &RoadNetwork,
    violations: &mut Vec<Violation>,
) -> HashMap<RoadId, BTreeSet<RouteId>> {
    let graph = net.graph();
    let mut usage: HashMap<RoadId, BTreeSet<RouteId>> = HashMap::new();

    for (id, route) in net.routes().iter() {
        if route.roads().is_empty() {
            violations.push(Violation::EmptyRoute(id));
            continue;
        }

        let mut at = route.start();
        let mut visited = HashSet::from([at]);
        let mut length = 0u64;
        let mut min_year = i32::MAX;
        let mut connected = true;
        let mut simple = true;

        for &road in route.roads() {
            usage.entry(road).or_default().insert(id);
            let Some(data) = graph.road(road).filter(|data| data.joins(at)) else {
                connected = false;
                break;
            };
            at = data.other(at);
            simple &= visited.insert(at);
            length += u64::from(data.length());
            min_year = min_year.min(data.year());
        }

        if !connected {
            violations.push(Violation::BrokenRoute(id));
            continue;
        }
        if !simple {
            violations.push(Violation::RepeatedCity(id));
        }
        if at != route.end() || length != route.length() || min_year != route.min_year() {
            violations.push(Violation::StaleCache(id));
        }
    }
    usage
}

fn check_tags(
    net: &RoadNetwork,
    usage: &HashMap<RoadId, BTreeSet<RouteId>>,
    violations: &mut Vec<Violation>,
) {
    let empty = BTreeSet::new();
    for (road, data) in net.graph().roads() {
        let actual = usage.get(&road).unwrap_or(&empty);
        if data.routes() != actual {
            violations.push(Violation::TagMismatch {
                road,
                tagged: data.routes().iter().copied().collect(),
                actual: actual.iter().copied().collect(),
            });
        }
    }
}
