//! Named 3D point

use serde::Serialize;

use crate::error::{ParseError, ParseReason};

/// A named position in 3D space, in meters
///
/// Fields are private so a point cannot change after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    name: String,
    x: f64,
    y: f64,
    z: f64,
}

impl Point {
    /// Create a point, rejecting names the line format cannot carry and non-finite coordinates
    pub fn new(name: impl Into<String>, x: f64, y: f64, z: f64) -> Result<Self, ParseError> {
        let name = name.into();
        let fragment = || format!("{}:{}:{}:{}", name, x, y, z);

        if name.is_empty() {
            return Err(ParseError::new(fragment(), ParseReason::EmptyName));
        }
        if name.contains([crate::codec::DELIMITER, '\n', '\r']) {
            return Err(ParseError::new(fragment(), ParseReason::InvalidName));
        }
        for (axis, value) in [('x', x), ('y', y), ('z', z)] {
            if !value.is_finite() {
                return Err(ParseError::new(
                    fragment(),
                    ParseReason::InvalidNumber {
                        axis,
                        value: value.to_string(),
                    },
                ));
            }
        }

        Ok(Self { name, x, y, z })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// Straight-line distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        euclidean_distance(self, other)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::codec::encode(self))
    }
}

impl std::str::FromStr for Point {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::codec::decode(s)
    }
}

/// `sqrt(dx² + dy² + dz²)` in double precision
pub fn euclidean_distance(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}
