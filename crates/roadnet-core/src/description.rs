//! Text encoding of routes.
//!
//! A route is written as
//! `<id>;<city0>;<length0>;<year0>;<city1>;...;<cityN>`: the id, the start
//! city, then for every road its length, its year and the city it leads to.
//! Fields are separated by `;` with no trailing separator.

use crate::id::{InvalidRouteId, RouteId};
use std::fmt;
use std::str::FromStr;

/// Errors raised while decoding a route description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptionError {
    #[error("expected id, start city and at least one road, got {0} fields")]
    FieldCount(usize),
    #[error("malformed route id {0:?}")]
    MalformedRouteId(String),
    #[error(transparent)]
    RouteId(#[from] InvalidRouteId),
    #[error("malformed road length {0:?}")]
    MalformedLength(String),
    #[error("malformed road year {0:?}")]
    MalformedYear(String),
}

/// One road of a described route and the city it leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    pub length: u32,
    pub year: i32,
    pub to: String,
}

/// A decoded route description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescription {
    pub id: RouteId,
    pub start: String,
    pub legs: Vec<Leg>,
}

/// Parse an unsigned 32-bit decimal with no sign.
pub fn parse_u32(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Parse a signed 32-bit decimal; only `-` is accepted as a sign.
pub fn parse_i32(field: &str) -> Option<i32> {
    let digits = field.strip_prefix('-').unwrap_or(field);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

impl RouteDescription {
    /// Decode a description.
    ///
    /// Only the shape and the numbers are checked here; city names and
    /// consistency with the network are checked on ingestion.
    ///
    /// # Examples
    ///
    /// ```
    /// use roadnet_core::description::RouteDescription;
    ///
    /// let route = RouteDescription::parse("7;A;10;2000;B;5;-3;C").unwrap();
    /// assert_eq!(route.id.get(), 7);
    /// assert_eq!(route.cities().collect::<Vec<_>>(), ["A", "B", "C"]);
    /// assert_eq!(route.length(), 15);
    /// assert_eq!(route.min_year(), Some(-3));
    /// ```
    pub fn parse(text: &str) -> Result<Self, DescriptionError> {
        let fields: Vec<&str> = text.split(';').collect();
        if fields.len() < 5 || (fields.len() - 2) % 3 != 0 {
            return Err(DescriptionError::FieldCount(fields.len()));
        }

        let raw_id = parse_u32(fields[0])
            .ok_or_else(|| DescriptionError::MalformedRouteId(fields[0].to_owned()))?;
        let id = RouteId::new(raw_id)?;

        let legs = fields[2..]
            .chunks_exact(3)
            .map(|leg| {
                let length = parse_u32(leg[0])
                    .ok_or_else(|| DescriptionError::MalformedLength(leg[0].to_owned()))?;
                let year = parse_i32(leg[1])
                    .ok_or_else(|| DescriptionError::MalformedYear(leg[1].to_owned()))?;
                Ok(Leg {
                    length,
                    year,
                    to: leg[2].to_owned(),
                })
            })
            .collect::<Result<Vec<_>, DescriptionError>>()?;

        Ok(Self {
            id,
            start: fields[1].to_owned(),
            legs,
        })
    }

    /// City names in order, start first.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.start.as_str()).chain(self.legs.iter().map(|leg| leg.to.as_str()))
    }

    /// Sum of all road lengths.
    pub fn length(&self) -> u64 {
        self.legs.iter().map(|leg| u64::from(leg.length)).sum()
    }

    /// Oldest road year, or `None` for a description without roads.
    pub fn min_year(&self) -> Option<i32> {
        self.legs.iter().map(|leg| leg.year).min()
    }
}

impl FromStr for RouteDescription {
    type Err = DescriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RouteDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.id, self.start)?;
        for leg in &self.legs {
            write!(f, ";{};{};{}", leg.length, leg.year, leg.to)?;
        }
        Ok(())
    }
}
