//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::id::{CityId, RouteId};
use crate::network::RoadNetwork;
use crate::validation::validate;

/// Build a network from `(from, to, length, year)` tuples.
pub fn network(roads: &[(&str, &str, u32, i32)]) -> RoadNetwork {
    let mut net = RoadNetwork::new();
    for &(a, b, length, year) in roads {
        net.add_road(a, b, length, year)
            .unwrap_or_else(|e| panic!("add_road({a}, {b}): {e}"));
    }
    net
}

pub fn route_id(raw: u32) -> RouteId {
    RouteId::new(raw).unwrap()
}

/// Name of the grid city at `(row, col)`.
pub fn grid_city(row: usize, col: usize) -> String {
    format!("{row}-{col}")
}

/// A `rows` x `cols` grid of cities named `"row-col"`, with varied lengths
/// and years so most searches have a unique answer.
pub fn grid(rows: usize, cols: usize) -> RoadNetwork {
    let mut net = RoadNetwork::new();
    for r in 0..rows {
        for c in 0..cols {
            let here = grid_city(r, c);
            if c + 1 < cols {
                let length = 1 + ((r * 7 + c * 13) % 9) as u32;
                let year = 1950 + ((r * 31 + c * 17) % 70) as i32;
                net.add_road(&here, &grid_city(r, c + 1), length, year)
                    .unwrap();
            }
            if r + 1 < rows {
                let length = 1 + ((r * 11 + c * 5) % 8) as u32;
                let year = 1950 + ((r * 13 + c * 29) % 70) as i32;
                net.add_road(&here, &grid_city(r + 1, c), length, year)
                    .unwrap();
            }
        }
    }
    net
}

/// Resolve city ids to names.
pub fn city_names<'a>(net: &'a RoadNetwork, cities: &[CityId]) -> Vec<&'a str> {
    cities
        .iter()
        .map(|&city| net.graph().city_name(city))
        .collect()
}

/// Panic with every violation if `net` is inconsistent.
pub fn assert_valid(net: &RoadNetwork) {
    let violations = validate(net);
    assert!(violations.is_empty(), "invariant violations: {violations:#?}");
}
