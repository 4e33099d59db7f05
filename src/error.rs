//! Contract violations raised by the grid, actor and world layers.
//!
//! None of these are retried. They surface at the caller (UI or test) and the
//! UI boundary is free to turn them into no-ops.

use crate::location::Location;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("location {0} is not valid in this grid")]
    InvalidLocation(Location),
    #[error("cannot place an absent occupant")]
    NullOccupant,
    #[error("this actor is already contained in a grid")]
    AlreadyPlaced,
    #[error("this actor is not contained in a grid")]
    NotPlaced,
    #[error("the grid contains a different actor at location {location}")]
    GridInconsistency { location: Location },
    #[error("grid dimensions {rows}x{cols} are not positive or exceed the cell limit")]
    InvalidDimensions { rows: i32, cols: i32 },
}
