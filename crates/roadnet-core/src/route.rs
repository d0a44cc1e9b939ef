//! Routes and the route table.
//!
//! A [`Route`] is a simple path stored as its start city plus the ordered
//! list of roads walked from there. Length and minimum year are cached and
//! refreshed whenever the path or one of its roads changes.

use crate::graph::RoadGraph;
use crate::id::{CityId, MAX_ROUTE_ID, RoadId, RouteId};
use crate::search::Path;

/// A persisted path through the road network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    start: CityId,
    end: CityId,
    roads: Vec<RoadId>,
    length: u64,
    min_year: i32,
}

impl Route {
    /// Build a route from a path returned by a search.
    pub(crate) fn from_path(path: Path) -> Self {
        Self {
            start: path.source,
            end: path.destination,
            roads: path.roads,
            length: path.length,
            min_year: path.min_year,
        }
    }

    /// Build a route from an explicit road sequence and compute its caches.
    pub(crate) fn from_roads(graph: &RoadGraph, start: CityId, roads: Vec<RoadId>) -> Self {
        let mut route = Self {
            start,
            end: start,
            roads,
            length: 0,
            min_year: i32::MAX,
        };
        route.refresh(graph);
        route
    }

    pub fn start(&self) -> CityId {
        self.start
    }

    pub fn end(&self) -> CityId {
        self.end
    }

    pub fn roads(&self) -> &[RoadId] {
        &self.roads
    }

    /// Total length of all roads on the route.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Year of the oldest road on the route.
    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    /// Cities along the route, start first.
    pub fn cities(&self, graph: &RoadGraph) -> Vec<CityId> {
        graph.walk(self.start, &self.roads)
    }

    /// Recompute the end city, length and minimum year from the graph.
    pub(crate) fn refresh(&mut self, graph: &RoadGraph) {
        let mut at = self.start;
        let mut length = 0u64;
        let mut min_year = i32::MAX;
        for &road in &self.roads {
            if let Some(data) = graph.road(road) {
                at = data.other(at);
                length = length.saturating_add(u64::from(data.length()));
                min_year = min_year.min(data.year());
            }
        }
        self.end = at;
        self.length = length;
        self.min_year = min_year;
    }

    /// Attach `path`, which runs from the current start to a new city, in
    /// front of the route. The new city becomes the start.
    pub(crate) fn prepend(&mut self, graph: &RoadGraph, path: Path) {
        debug_assert_eq!(path.source, self.start);
        let mut roads = path.roads;
        roads.reverse();
        roads.extend_from_slice(&self.roads);
        self.roads = roads;
        self.start = path.destination;
        self.refresh(graph);
    }

    /// Attach `path`, which runs from the current end to a new city, behind
    /// the route. The new city becomes the end.
    pub(crate) fn append(&mut self, graph: &RoadGraph, path: Path) {
        debug_assert_eq!(path.source, self.end);
        self.roads.extend(path.roads);
        self.refresh(graph);
    }

    /// Replace `road` with `bypass`, keeping the route's direction.
    ///
    /// `bypass` must join the two endpoints of `road`, in either order.
    /// Returns false if the route does not use `road`.
    pub(crate) fn splice(&mut self, graph: &RoadGraph, road: RoadId, bypass: &Path) -> bool {
        let Some(pos) = self.roads.iter().position(|&r| r == road) else {
            return false;
        };
        let entry = self.cities(graph)[pos];
        if entry == bypass.source {
            self.roads.splice(pos..=pos, bypass.roads.iter().copied());
        } else {
            self.roads.splice(pos..=pos, bypass.roads.iter().rev().copied());
        }
        self.refresh(graph);
        true
    }
}

// ---------------------------------------------------------------------------
// RouteStore
// ---------------------------------------------------------------------------

/// Fixed table of routes indexed by id. Slot 0 is never used.
#[derive(Debug, Clone)]
pub struct RouteStore {
    slots: Vec<Option<Route>>,
}

impl Default for RouteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteStore {
    pub fn new() -> Self {
        Self {
            slots: vec![None; usize::from(MAX_ROUTE_ID) + 1],
        }
    }

    pub fn get(&self, id: RouteId) -> Option<&Route> {
        self.slots[id.index()].as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: RouteId) -> Option<&mut Route> {
        self.slots[id.index()].as_mut()
    }

    pub fn contains(&self, id: RouteId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Store a route in an empty slot. Returns false if the slot is taken.
    pub(crate) fn insert(&mut self, id: RouteId, route: Route) -> bool {
        let slot = &mut self.slots[id.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(route);
        true
    }

    pub(crate) fn remove(&mut self, id: RouteId) -> Option<Route> {
        self.slots[id.index()].take()
    }

    /// Iterate over stored routes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (RouteId, &Route)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            let route = slot.as_ref()?;
            let id = RouteId::new(i as u32).ok()?;
            Some((id, route))
        })
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
