//! Multi-criteria shortest-path search.
//!
//! A search runs Dijkstra's algorithm over the part of the road graph that is
//! reachable from the source without passing through an excluded city. Paths
//! are ranked by total length, and among equally long paths the one whose
//! oldest road is newest wins.
//!
//! Ties are detected city by city. If any city on the chosen path can also
//! be reached through a second neighbour with the same (distance, min-year)
//! label, the search fails with [`SearchError::Ambiguous`]. A rival path
//! whose label differs at every shared city is not detected, even when its
//! final length and min-year equal the chosen path's.
//!
//! # Phases
//!
//! 1. **Seed** -- The source enters the queue at [`Priority::SOURCE`].
//! 2. **Expand** -- Every city reachable through non-excluded cities is
//!    discovered with an iterative depth-first walk and queued at
//!    [`Priority::UNREACHED`].
//! 3. **Relax** -- The queue is drained. Each settled city relaxes its
//!    roads, skipping the banned road, excluded cities and settled cities.
//! 4. **Reconstruct** -- Predecessor roads are followed from the destination
//!    back to the source.
//! 5. **Validate** -- Every city on the path is checked for a second
//!    predecessor offering an identical (distance, min-year) pair.
//!
//! All per-search state lives in a [`SecondaryMap`] owned by the call and is
//! dropped when it returns, on success and failure alike.

use crate::graph::RoadGraph;
use crate::id::{CityId, RoadId};
use crate::queue::{Priority, PriorityQueue};
use slotmap::SecondaryMap;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::trace;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Reasons a search produces no path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no path exists")]
    NoPath,
    #[error("more than one optimal path exists")]
    Ambiguous,
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// The part of the graph a single search may use.
///
/// Excluded cities are never entered and never discovered through. The
/// banned road is never relaxed. The source city is always usable, even if
/// it appears in the exclusion set.
#[derive(Debug, Clone, Default)]
pub struct SearchScope {
    excluded: HashSet<CityId>,
    banned: Option<RoadId>,
}

impl SearchScope {
    /// A scope covering the whole graph.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// A scope with the given cities excluded.
    pub fn excluding(cities: impl IntoIterator<Item = CityId>) -> Self {
        Self {
            excluded: cities.into_iter().collect(),
            banned: None,
        }
    }

    /// Re-enable a previously excluded city.
    pub fn allow(mut self, city: CityId) -> Self {
        self.excluded.remove(&city);
        self
    }

    /// Forbid a single road.
    pub fn ban(mut self, road: RoadId) -> Self {
        self.banned = Some(road);
        self
    }

    pub fn is_excluded(&self, city: CityId) -> bool {
        self.excluded.contains(&city)
    }

    pub fn is_banned(&self, road: RoadId) -> bool {
        self.banned == Some(road)
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// A simple path found by a search, ordered from source to destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub source: CityId,
    pub destination: CityId,
    pub roads: Vec<RoadId>,
    /// Sum of road lengths.
    pub length: u64,
    /// Oldest road year along the path.
    pub min_year: i32,
}

impl Path {
    /// Ranking used when two candidate paths compete: shorter first, then
    /// the one with the newer oldest road. `Equal` means a full tie.
    pub fn rank(&self, other: &Path) -> Ordering {
        self.length
            .cmp(&other.length)
            .then_with(|| other.min_year.cmp(&self.min_year))
    }

    /// Cities along the path, source first.
    pub fn cities(&self, graph: &RoadGraph) -> Vec<CityId> {
        graph.walk(self.source, &self.roads)
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Transient per-city search state.
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    best: Priority,
    settled: bool,
    /// Road through which `best` was reached.
    via: Option<RoadId>,
}

impl SearchNode {
    fn unreached() -> Self {
        Self {
            best: Priority::UNREACHED,
            settled: false,
            via: None,
        }
    }
}

struct Search<'a> {
    graph: &'a RoadGraph,
    scope: &'a SearchScope,
    nodes: SecondaryMap<CityId, SearchNode>,
    queue: PriorityQueue<CityId>,
}

/// Find the unique best path from `source` to `destination` within `scope`.
///
/// # Examples
///
/// ```
/// use roadnet_core::network::RoadNetwork;
/// use roadnet_core::search::{find_path, SearchScope};
///
/// let mut net = RoadNetwork::new();
/// net.add_road("A", "B", 5, 2000).unwrap();
/// net.add_road("B", "C", 5, 2010).unwrap();
/// net.add_road("A", "C", 20, 2020).unwrap();
///
/// let graph = net.graph();
/// let a = graph.city("A").unwrap();
/// let c = graph.city("C").unwrap();
/// let path = find_path(graph, a, c, &SearchScope::unrestricted()).unwrap();
/// assert_eq!(path.length, 10);
/// assert_eq!(path.min_year, 2000);
/// ```
pub fn find_path(
    graph: &RoadGraph,
    source: CityId,
    destination: CityId,
    scope: &SearchScope,
) -> Result<Path, SearchError> {
    if source == destination
        || !graph.cities().contains(source)
        || !graph.cities().contains(destination)
    {
        return Err(SearchError::NoPath);
    }

    let mut search = Search::seed(graph, scope, source);
    search.expand(source);
    if !search.nodes.contains_key(destination) {
        trace!(reachable = search.nodes.len(), "destination outside search scope");
        return Err(SearchError::NoPath);
    }
    search.relax();
    let path = search.reconstruct(source, destination)?;
    search.validate(&path)?;
    Ok(path)
}

impl<'a> Search<'a> {
    fn seed(graph: &'a RoadGraph, scope: &'a SearchScope, source: CityId) -> Self {
        let mut nodes = SecondaryMap::new();
        nodes.insert(
            source,
            SearchNode {
                best: Priority::SOURCE,
                ..SearchNode::unreached()
            },
        );
        Self {
            graph,
            scope,
            nodes,
            queue: PriorityQueue::seeded(source),
        }
    }

    /// Discover every city reachable from `source` through non-excluded
    /// cities. Membership ignores the banned road: a city reachable only
    /// across it is queued but never reached.
    fn expand(&mut self, source: CityId) {
        let graph = self.graph;
        let mut stack = vec![source];
        let mut discovered = Vec::new();
        while let Some(city) = stack.pop() {
            for &road in graph.incident(city) {
                let Some(data) = graph.road(road) else {
                    continue;
                };
                let next = data.other(city);
                if self.scope.is_excluded(next) || self.nodes.contains_key(next) {
                    continue;
                }
                self.nodes.insert(next, SearchNode::unreached());
                discovered.push(next);
                stack.push(next);
            }
        }
        self.queue.extend_unreached(discovered);
        trace!(reachable = self.nodes.len(), "search expanded");
    }

    /// Drain the queue, settling cities in priority order.
    fn relax(&mut self) {
        let graph = self.graph;
        while let Some((city, best)) = self.queue.pop() {
            if !best.is_reached() {
                // Everything left is cut off by the banned road.
                break;
            }
            if let Some(node) = self.nodes.get_mut(city) {
                node.settled = true;
            }
            for &road in graph.incident(city) {
                if self.scope.is_banned(road) {
                    continue;
                }
                let Some(data) = graph.road(road) else {
                    continue;
                };
                let next = data.other(city);
                let Some(node) = self.nodes.get_mut(next) else {
                    continue;
                };
                if node.settled {
                    continue;
                }
                let candidate = Priority {
                    distance: best.distance.saturating_add(u64::from(data.length())),
                    year: best.year.min(data.year()),
                };
                let accept = match candidate.distance.cmp(&node.best.distance) {
                    Ordering::Less => true,
                    Ordering::Equal => candidate.year > node.best.year,
                    Ordering::Greater => false,
                };
                if accept {
                    node.best = candidate;
                    node.via = Some(road);
                    self.queue.decrease(next, candidate);
                }
            }
        }
    }

    fn reconstruct(&self, source: CityId, destination: CityId) -> Result<Path, SearchError> {
        let end = self
            .nodes
            .get(destination)
            .filter(|node| node.settled && node.best.is_reached())
            .ok_or(SearchError::NoPath)?;

        let mut roads = Vec::new();
        let mut at = destination;
        while let Some(road) = self.nodes.get(at).and_then(|node| node.via) {
            // A predecessor chain can never be longer than the node set.
            if roads.len() >= self.nodes.len() {
                return Err(SearchError::NoPath);
            }
            roads.push(road);
            at = self
                .graph
                .road(road)
                .map(|data| data.other(at))
                .ok_or(SearchError::NoPath)?;
        }
        if at != source {
            return Err(SearchError::NoPath);
        }
        roads.reverse();

        Ok(Path {
            source,
            destination,
            roads,
            length: end.best.distance,
            min_year: end.best.year,
        })
    }

    /// Reject the path if any city on it has an off-path neighbour that
    /// reaches it with the same distance and the same min-year.
    fn validate(&self, path: &Path) -> Result<(), SearchError> {
        let cities = path.cities(self.graph);
        for (i, &city) in cities.iter().enumerate() {
            let Some(own) = self.nodes.get(city).map(|node| node.best) else {
                continue;
            };
            let prev = i.checked_sub(1).map(|p| cities[p]);
            let next = cities.get(i + 1).copied();

            for &road in self.graph.incident(city) {
                if self.scope.is_banned(road) {
                    continue;
                }
                let Some(data) = self.graph.road(road) else {
                    continue;
                };
                let neighbour = data.other(city);
                if Some(neighbour) == prev || Some(neighbour) == next {
                    continue;
                }
                let Some(other) = self.nodes.get(neighbour).map(|node| node.best) else {
                    continue;
                };
                if !other.is_reached() {
                    continue;
                }
                let distance = other.distance.saturating_add(u64::from(data.length()));
                let year = other.year.min(data.year());
                if distance == own.distance && year == own.year {
                    trace!(?city, ?neighbour, "second optimal path found");
                    return Err(SearchError::Ambiguous);
                }
            }
        }
        Ok(())
    }
}
