use std::collections::BTreeMap;
use std::fmt;

use crate::error::GridError;
use crate::grid::{write_grid, Grid, GridBounds, Occupant};
use crate::location::Location;

/// Sparse grid over all integer locations.
/// Only occupied cells are stored; a missing key is an empty cell.
#[derive(Clone, Debug)]
pub struct UnboundedGrid<T> {
    /// Occupants keyed by location; `BTreeMap` keeps iteration row-major.
    occupants: BTreeMap<Location, T>,
    /// Cached extent of the occupied cells
    bounds: Option<GridBounds>,
}

impl<T> Default for UnboundedGrid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UnboundedGrid<T> {
    /// Create a new empty unbounded grid
    pub fn new() -> Self {
        Self {
            occupants: BTreeMap::new(),
            bounds: None,
        }
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    /// Grow the cached bounds to cover a newly occupied cell
    fn update_bounds(&mut self, loc: Location) {
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.including(loc),
            None => GridBounds::at(loc),
        });
    }

    /// Recalculate bounds from scratch (after a cell on the edge was vacated)
    fn recalculate_bounds(&mut self) {
        self.bounds = None;
        let locs: Vec<Location> = self.occupants.keys().copied().collect();
        for loc in locs {
            self.update_bounds(loc);
        }
    }
}

impl<T: Occupant + Send> Grid<T> for UnboundedGrid<T> {
    fn name(&self) -> &'static str {
        "UnboundedGrid"
    }

    fn num_rows(&self) -> Option<i32> {
        None
    }

    fn num_cols(&self) -> Option<i32> {
        None
    }

    fn is_valid(&self, _loc: Location) -> bool {
        true
    }

    fn get(&self, loc: Location) -> Result<Option<T>, GridError> {
        Ok(self.occupants.get(&loc).copied())
    }

    fn put(&mut self, loc: Location, occupant: T) -> Result<Option<T>, GridError> {
        if occupant.is_null() {
            return Err(GridError::NullOccupant);
        }
        let previous = self.occupants.insert(loc, occupant);
        self.update_bounds(loc);
        Ok(previous)
    }

    fn remove(&mut self, loc: Location) -> Result<Option<T>, GridError> {
        let previous = self.occupants.remove(&loc);
        if previous.is_some() && self.bounds.map_or(false, |b| b.touches_edge(loc)) {
            self.recalculate_bounds();
        }
        Ok(previous)
    }

    fn occupied_locations(&self) -> Box<dyn Iterator<Item = Location> + '_> {
        Box::new(self.occupants.keys().copied())
    }

    fn occupied_bounds(&self) -> Option<GridBounds> {
        self.bounds
    }
}

impl<T: Occupant + Send> fmt::Display for UnboundedGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(self, f)
    }
}
