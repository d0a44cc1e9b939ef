//! Roadnet Core -- the engine behind a national road network and its
//! numbered routes.
//!
//! Cities are joined by undirected roads, each with a length and a
//! construction (or latest repair) year. Routes are persisted simple paths
//! through the network, identified by numbers `1..=999`, and are kept
//! consistent as roads are added, repaired and removed.
//!
//! # Path Selection
//!
//! New routes and route extensions follow the result of
//! [`search::find_path`]:
//!
//! 1. The shortest total length wins.
//! 2. Among equally long paths, the one whose oldest road is newest wins.
//! 3. If a city on the chosen path can be reached a second way with the
//!    same length and oldest road, the search fails rather than pick one.
//!
//! # Atomic Operations
//!
//! Every operation on [`network::RoadNetwork`] either fully applies or
//! returns an error and leaves the network untouched:
//!
//! ```rust
//! use roadnet_core::id::RouteId;
//! use roadnet_core::network::RoadNetwork;
//!
//! let mut net = RoadNetwork::new();
//! net.add_road("Gdańsk", "Toruń", 170, 2005).unwrap();
//! net.add_road("Toruń", "Łódź", 180, 2012).unwrap();
//! net.new_route(RouteId::new(1).unwrap(), "Gdańsk", "Łódź").unwrap();
//!
//! // The only road into Gdańsk carries route 1 and has no bypass.
//! assert!(net.remove_road("Gdańsk", "Toruń").is_err());
//! assert_eq!(net.describe_route(1), "1;Gdańsk;170;2005;Toruń;180;2012;Łódź");
//! ```
//!
//! # Key Types
//!
//! - [`network::RoadNetwork`] -- Graph plus route table; all operations.
//! - [`graph::RoadGraph`] -- Cities, roads and per-city adjacency.
//! - [`registry::CityRegistry`] -- Name-keyed city table.
//! - [`queue::PriorityQueue`] -- Indexed min-heap with decrease-key.
//! - [`search::find_path`] -- Unique best path search.
//! - [`route::RouteStore`] -- Route table indexed by [`id::RouteId`].
//! - [`description::RouteDescription`] -- Route text encoding.
//! - [`validation::validate`] -- Structural invariant checks.

pub mod description;
pub mod graph;
pub mod id;
pub mod network;
pub mod queue;
pub mod registry;
pub mod route;
pub mod search;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
