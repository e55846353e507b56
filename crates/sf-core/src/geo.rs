//! Planar coordinate type.
//!
//! The airspace is modelled as a flat plane with coordinates in metres.  All
//! costs derived from positions (distances, potentials) are `f64`, so the
//! coordinate type is `f64` as well to avoid lossy round-trips.

/// A position on the simulation plane, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Squared Euclidean distance.  Cheaper than [`distance`](Self::distance)
    /// for range comparisons.
    #[inline]
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// `true` if `other` lies within `range` metres (inclusive).
    #[inline]
    pub fn within(self, other: Point, range: f64) -> bool {
        self.distance_sq(other) <= range * range
    }

    /// Move at most `max_step` metres towards `target`.
    ///
    /// Returns `target` exactly when it is reachable within `max_step`, so
    /// callers can detect arrival with `==`.
    pub fn step_towards(self, target: Point, max_step: f64) -> Point {
        let d = self.distance(target);
        if d <= max_step {
            return target;
        }
        let f = max_step / d;
        Point::new(self.x + (target.x - self.x) * f, self.y + (target.y - self.y) * f)
    }

    /// Coordinates as an array, the form `rstar` indexes.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
