use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Identifies a city (vertex) in the road graph.
    pub struct CityId;

    /// Identifies a road (undirected edge) in the road graph.
    pub struct RoadId;
}

/// Largest route id a caller may assign. Id 0 is reserved.
pub const MAX_ROUTE_ID: u16 = 999;

/// Raised when a raw number falls outside the route id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("route id {0} is outside 1..=999")]
pub struct InvalidRouteId(pub u32);

/// Caller-assigned route identifier in `1..=999`. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RouteId(u16);

impl RouteId {
    /// Validate a raw id.
    ///
    /// # Examples
    ///
    /// ```
    /// use roadnet_core::id::RouteId;
    ///
    /// assert!(RouteId::new(1).is_ok());
    /// assert!(RouteId::new(0).is_err());
    /// assert!(RouteId::new(1000).is_err());
    /// ```
    pub fn new(raw: u32) -> Result<Self, InvalidRouteId> {
        if raw == 0 || raw > u32::from(MAX_ROUTE_ID) {
            return Err(InvalidRouteId(raw));
        }
        Ok(Self(raw as u16))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Slot index in the route table.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<u32> for RouteId {
    type Error = InvalidRouteId;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<RouteId> for u32 {
    fn from(id: RouteId) -> Self {
        u32::from(id.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
