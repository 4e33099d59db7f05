//! Occupant storage keyed by [`Location`].
//!
//! A grid maps each location to at most one occupant. Two storage strategies
//! implement the same [`Grid`] contract:
//! * [`BoundedGrid`]: fixed `rows × cols` rectangle, flat row-major `Vec`.
//! * [`UnboundedGrid`](crate::unbounded_grid::UnboundedGrid): every integer
//!   location is valid, sparse map storage.
//!
//! The adjacency queries are derived from the eight compass octants on each
//! call and returned as lazy iterators; call again to restart.

use std::fmt;

use crate::error::GridError;
use crate::location::Location;
use crate::unbounded_grid::UnboundedGrid;

/// Something a grid can hold. Handles are small `Copy` values; the grid never
/// owns the thing they refer to.
pub trait Occupant: Copy + PartialEq + fmt::Debug {
    /// A null handle refers to nothing and is rejected by [`Grid::put`].
    fn is_null(&self) -> bool {
        false
    }
}

/// Uniform contract over bounded and unbounded storage.
pub trait Grid<T: Occupant>: fmt::Debug + Send {
    /// Type name shown in menus and debug output.
    fn name(&self) -> &'static str;

    /// Row count, or `None` when unbounded.
    fn num_rows(&self) -> Option<i32>;

    /// Column count, or `None` when unbounded.
    fn num_cols(&self) -> Option<i32>;

    fn is_valid(&self, loc: Location) -> bool;

    /// The occupant at `loc`, if any.
    fn get(&self, loc: Location) -> Result<Option<T>, GridError>;

    /// Store `occupant` at `loc` and hand back whatever was there before.
    fn put(&mut self, loc: Location, occupant: T) -> Result<Option<T>, GridError>;

    /// Clear `loc`, returning the previous occupant. Clearing an empty cell is
    /// not an error.
    fn remove(&mut self, loc: Location) -> Result<Option<T>, GridError>;

    /// Every occupied location in row-major order.
    fn occupied_locations(&self) -> Box<dyn Iterator<Item = Location> + '_>;

    fn valid_adjacent_locations(&self, loc: Location) -> Box<dyn Iterator<Item = Location> + '_> {
        Box::new(
            Location::COMPASS
                .into_iter()
                .map(move |d| loc.adjacent(d))
                .filter(move |l| self.is_valid(*l)),
        )
    }

    fn empty_adjacent_locations(&self, loc: Location) -> Box<dyn Iterator<Item = Location> + '_> {
        Box::new(
            self.valid_adjacent_locations(loc)
                .filter(move |l| matches!(self.get(*l), Ok(None))),
        )
    }

    fn occupied_adjacent_locations(&self, loc: Location) -> Box<dyn Iterator<Item = Location> + '_> {
        Box::new(
            self.valid_adjacent_locations(loc)
                .filter(move |l| matches!(self.get(*l), Ok(Some(_)))),
        )
    }

    /// Occupants of the occupied adjacent cells.
    fn neighbors(&self, loc: Location) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new(
            self.occupied_adjacent_locations(loc)
                .filter_map(move |l| self.get(l).ok().flatten()),
        )
    }

    /// Smallest rectangle covering every occupied cell, `None` when empty.
    fn occupied_bounds(&self) -> Option<GridBounds> {
        self.occupied_locations().fold(None, |acc: Option<GridBounds>, loc| {
            Some(match acc {
                Some(b) => b.including(loc),
                None => GridBounds::at(loc),
            })
        })
    }
}

/// Inclusive extent of a set of locations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridBounds {
    pub min_row: i32,
    pub max_row: i32,
    pub min_col: i32,
    pub max_col: i32,
}

impl GridBounds {
    pub fn at(loc: Location) -> Self {
        Self {
            min_row: loc.row(),
            max_row: loc.row(),
            min_col: loc.col(),
            max_col: loc.col(),
        }
    }

    pub fn including(self, loc: Location) -> Self {
        Self {
            min_row: self.min_row.min(loc.row()),
            max_row: self.max_row.max(loc.row()),
            min_col: self.min_col.min(loc.col()),
            max_col: self.max_col.max(loc.col()),
        }
    }

    /// Whether `loc` lies on the outer rim of these bounds.
    pub fn touches_edge(&self, loc: Location) -> bool {
        loc.row() == self.min_row
            || loc.row() == self.max_row
            || loc.col() == self.min_col
            || loc.col() == self.max_col
    }
}

/// Shared `Display` body: `Name(rowsxcols){(r, c)=occupant, ...}`.
pub(crate) fn write_grid<T, G>(grid: &G, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    T: Occupant,
    G: Grid<T> + ?Sized,
{
    match (grid.num_rows(), grid.num_cols()) {
        (Some(rows), Some(cols)) => write!(f, "{}({}x{}){{", grid.name(), rows, cols)?,
        _ => write!(f, "{}{{", grid.name())?,
    }
    for (i, loc) in grid.occupied_locations().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        if let Ok(Some(occupant)) = grid.get(loc) {
            write!(f, "{}={:?}", loc, occupant)?;
        }
    }
    f.write_str("}")
}

/// Which storage strategy to build.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GridShape {
    Bounded { rows: i32, cols: i32 },
    Unbounded,
}

impl Default for GridShape {
    fn default() -> Self {
        GridShape::Bounded {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

impl GridShape {
    /// Names of every grid type, for menu population.
    pub const NAMES: [&'static str; 2] = ["BoundedGrid", "UnboundedGrid"];

    pub fn build<T: Occupant + Send + 'static>(self) -> Result<Box<dyn Grid<T>>, GridError> {
        let grid: Box<dyn Grid<T>> = match self {
            GridShape::Bounded { rows, cols } => Box::new(BoundedGrid::<T>::new(rows, cols)?),
            GridShape::Unbounded => Box::new(UnboundedGrid::<T>::new()),
        };
        Ok(grid)
    }
}

pub const DEFAULT_ROWS: i32 = 10;
pub const DEFAULT_COLS: i32 = 10;
/// Largest number of cells a [`BoundedGrid`] will allocate.
pub const MAX_CELLS: usize = 1 << 24;

/// Fixed-size rectangular grid.
#[derive(Clone, Debug)]
pub struct BoundedGrid<T> {
    rows: i32,
    cols: i32,
    cells: Vec<Option<T>>, // rows * cols, row-major
}

impl<T: Occupant> Default for BoundedGrid<T> {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cells: vec![None; (DEFAULT_ROWS * DEFAULT_COLS) as usize],
        }
    }
}

impl<T: Occupant> BoundedGrid<T> {
    /// Create an empty `rows × cols` grid.
    pub fn new(rows: i32, cols: i32) -> Result<Self, GridError> {
        if rows <= 0 || cols <= 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        let cells = match (rows as usize).checked_mul(cols as usize) {
            Some(n) if n <= MAX_CELLS => n,
            _ => return Err(GridError::InvalidDimensions { rows, cols }),
        };
        Ok(Self {
            rows,
            cols,
            cells: vec![None; cells],
        })
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    #[inline]
    fn contains(&self, loc: Location) -> bool {
        (0..self.rows).contains(&loc.row()) && (0..self.cols).contains(&loc.col())
    }

    fn index(&self, loc: Location) -> Result<usize, GridError> {
        if !self.contains(loc) {
            return Err(GridError::InvalidLocation(loc));
        }
        Ok(loc.row() as usize * self.cols as usize + loc.col() as usize)
    }
}

impl<T: Occupant + Send> Grid<T> for BoundedGrid<T> {
    fn name(&self) -> &'static str {
        "BoundedGrid"
    }

    fn num_rows(&self) -> Option<i32> {
        Some(self.rows)
    }

    fn num_cols(&self) -> Option<i32> {
        Some(self.cols)
    }

    fn is_valid(&self, loc: Location) -> bool {
        self.contains(loc)
    }

    fn get(&self, loc: Location) -> Result<Option<T>, GridError> {
        let idx = self.index(loc)?;
        Ok(self.cells[idx])
    }

    fn put(&mut self, loc: Location, occupant: T) -> Result<Option<T>, GridError> {
        let idx = self.index(loc)?;
        if occupant.is_null() {
            return Err(GridError::NullOccupant);
        }
        Ok(self.cells[idx].replace(occupant))
    }

    fn remove(&mut self, loc: Location) -> Result<Option<T>, GridError> {
        let idx = self.index(loc)?;
        Ok(self.cells[idx].take())
    }

    fn occupied_locations(&self) -> Box<dyn Iterator<Item = Location> + '_> {
        let cols = self.cols as usize;
        Box::new(
            self.cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_some())
                .map(move |(idx, _)| Location::new((idx / cols) as i32, (idx % cols) as i32)),
        )
    }
}

impl<T: Occupant + Send> fmt::Display for BoundedGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(self, f)
    }
}
