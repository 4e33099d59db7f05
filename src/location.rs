//! Grid coordinates and compass arithmetic.
//!
//! Directions are integer degrees on a compass: 0 is north and angles grow
//! clockwise. Movement only ever uses the eight octants, 45° apart.

use std::fmt;

/// An immutable `(row, col)` coordinate. Rows grow downward.
///
/// Ordering is row-major, which keeps iteration over occupied cells
/// deterministic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    row: i32,
    col: i32,
}

impl Location {
    pub const NORTH: i32 = 0;
    pub const NORTHEAST: i32 = 45;
    pub const EAST: i32 = 90;
    pub const SOUTHEAST: i32 = 135;
    pub const SOUTH: i32 = 180;
    pub const SOUTHWEST: i32 = 225;
    pub const WEST: i32 = 270;
    pub const NORTHWEST: i32 = 315;

    pub const LEFT: i32 = -90;
    pub const RIGHT: i32 = 90;
    pub const HALF_LEFT: i32 = -45;
    pub const HALF_RIGHT: i32 = 45;
    pub const AHEAD: i32 = 0;
    pub const HALF_CIRCLE: i32 = 180;
    pub const FULL_CIRCLE: i32 = 360;

    /// The eight octants in clockwise order starting at north.
    pub const COMPASS: [i32; 8] = [
        Self::NORTH,
        Self::NORTHEAST,
        Self::EAST,
        Self::SOUTHEAST,
        Self::SOUTH,
        Self::SOUTHWEST,
        Self::WEST,
        Self::NORTHWEST,
    ];

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[inline]
    pub fn col(&self) -> i32 {
        self.col
    }

    /// The neighbouring location in `direction`, snapped to the nearest octant.
    ///
    /// No bounds check happens here; validity is a grid concern. Coordinates
    /// wrap at the `i32` limits, so this never fails.
    pub fn adjacent(&self, direction: i32) -> Location {
        let heading = direction.rem_euclid(Self::FULL_CIRCLE);
        let snapped = (heading + Self::HALF_RIGHT / 2) % Self::FULL_CIRCLE;
        let (dr, dc) = match snapped / Self::HALF_RIGHT {
            0 => (-1, 0),
            1 => (-1, 1),
            2 => (0, 1),
            3 => (1, 1),
            4 => (1, 0),
            5 => (1, -1),
            6 => (0, -1),
            _ => (-1, -1),
        };
        Location::new(self.row.wrapping_add(dr), self.col.wrapping_add(dc))
    }

    /// The octant that best approximates the heading from `self` to `target`.
    ///
    /// `atan2(0, 0)` is zero, so asking for the direction toward `self` yields
    /// a stable [`Location::EAST`]. Callers that care (the chameleon critter)
    /// keep their own heading instead.
    pub fn direction_toward(&self, target: Location) -> i32 {
        // wrapping differences agree with `adjacent` across the i32 seam
        let dx = f64::from(target.col.wrapping_sub(self.col));
        // screen rows grow downward, math y grows upward
        let dy = f64::from(target.row.wrapping_sub(self.row));
        let angle = (-dy).atan2(dx).to_degrees() as i32;
        // reflect math angle (ccw from east) into compass bearing (cw from north)
        let mut compass = Self::RIGHT - angle + Self::HALF_RIGHT / 2;
        if compass < 0 {
            compass += Self::FULL_CIRCLE;
        }
        (compass / Self::HALF_RIGHT) * Self::HALF_RIGHT
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
