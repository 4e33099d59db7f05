//! A grid together with the actors living in it.
//!
//! The grid stores [`ActorId`] handles and the stage's arena owns the
//! [`Actor`] values behind them. An actor is in the arena exactly while it is
//! placed: taking it off the grid hands the value back to the caller, and an
//! evicted or eaten actor is simply dropped.

use std::fmt;

use log::debug;
use slotmap::SlotMap;

use crate::actor::{Actor, ActorId, GridId};
use crate::error::GridError;
use crate::grid::{BoundedGrid, Grid, GridShape};
use crate::location::Location;

mod behavior;

pub struct Stage {
    grid: Box<dyn Grid<ActorId>>,
    grid_id: GridId,
    actors: SlotMap<ActorId, Actor>,
}

impl Default for Stage {
    fn default() -> Self {
        Self::with_grid(Box::new(BoundedGrid::<ActorId>::default()))
    }
}

impl Stage {
    pub fn new(shape: GridShape) -> Result<Self, GridError> {
        Ok(Self::with_grid(shape.build()?))
    }

    fn with_grid(grid: Box<dyn Grid<ActorId>>) -> Self {
        Self {
            grid,
            grid_id: GridId::FIRST,
            actors: SlotMap::with_key(),
        }
    }

    /// Read-only view of the storage. All mutation goes through the stage.
    pub fn grid(&self) -> &dyn Grid<ActorId> {
        self.grid.as_ref()
    }

    pub fn grid_id(&self) -> GridId {
        self.grid_id
    }

    /// Number of placed actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Mutable access for recoloring or reorienting a placed actor. Placement
    /// fields are not reachable through this.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    pub fn actor_at(&self, loc: Location) -> Result<Option<(ActorId, &Actor)>, GridError> {
        Ok(self
            .grid
            .get(loc)?
            .and_then(|id| self.actors.get(id).map(|actor| (id, actor))))
    }

    /// Snapshot of every occupied cell and its occupant, row-major.
    pub fn occupants(&self) -> Vec<(Location, ActorId)> {
        self.grid
            .occupied_locations()
            .filter_map(|loc| self.grid.get(loc).ok().flatten().map(|id| (loc, id)))
            .collect()
    }

    /// Whether `id` is placed in this stage's current grid instance.
    pub fn is_attached(&self, id: ActorId) -> bool {
        self.actors
            .get(id)
            .map_or(false, |actor| actor.grid == Some(self.grid_id))
    }

    /// Place a detached actor at `loc`, evicting whoever is there.
    pub fn put_self_in_grid(&mut self, mut actor: Actor, loc: Location) -> Result<ActorId, GridError> {
        if actor.is_placed() {
            return Err(GridError::AlreadyPlaced);
        }
        if let Some(prior) = self.grid.get(loc)? {
            let evicted = self.remove_self_from_grid(prior)?;
            debug!("{} evicted from {}", evicted.kind().name(), loc);
        }
        actor.grid = Some(self.grid_id);
        actor.location = Some(loc);
        let id = self.actors.insert(actor);
        if let Err(err) = self.grid.put(loc, id) {
            self.actors.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Take `id` off the grid and hand the detached actor back.
    pub fn remove_self_from_grid(&mut self, id: ActorId) -> Result<Actor, GridError> {
        let loc = self.placed_at(id)?;
        self.grid.remove(loc)?;
        let mut actor = self.actors.remove(id).ok_or(GridError::NotPlaced)?;
        actor.grid = None;
        actor.location = None;
        Ok(actor)
    }

    /// Move `id` to `loc`, evicting whoever is there.
    pub fn move_to(&mut self, id: ActorId, loc: Location) -> Result<(), GridError> {
        let from = self.placed_at(id)?;
        if !self.grid.is_valid(loc) {
            return Err(GridError::InvalidLocation(loc));
        }
        if loc == from {
            return Ok(());
        }
        if let Some(other) = self.grid.get(loc)? {
            let evicted = self.remove_self_from_grid(other)?;
            debug!("{} evicted from {}", evicted.kind().name(), loc);
        }
        self.grid.remove(from)?;
        if let Some(actor) = self.actors.get_mut(id) {
            actor.location = Some(loc);
        }
        self.grid.put(loc, id)?;
        Ok(())
    }

    /// Swap in a freshly built grid, carrying occupants over to the same
    /// coordinates. Occupants invalid in the new shape are detached and
    /// returned.
    pub fn replace_grid(&mut self, shape: GridShape) -> Result<Vec<Actor>, GridError> {
        let mut grid = shape.build::<ActorId>()?;
        let grid_id = self.grid_id.next();
        let mut dropped = Vec::new();
        for (loc, id) in self.occupants() {
            if grid.is_valid(loc) {
                grid.put(loc, id)?;
                if let Some(actor) = self.actors.get_mut(id) {
                    actor.grid = Some(grid_id);
                }
            } else if let Some(mut actor) = self.actors.remove(id) {
                actor.grid = None;
                actor.location = None;
                dropped.push(actor);
            }
        }
        self.grid = grid;
        self.grid_id = grid_id;
        Ok(dropped)
    }

    /// Location of a placed actor, after checking the grid agrees.
    fn placed_at(&self, id: ActorId) -> Result<Location, GridError> {
        let actor = self.actors.get(id).ok_or(GridError::NotPlaced)?;
        let loc = match (actor.grid, actor.location) {
            (Some(grid), Some(loc)) if grid == self.grid_id => loc,
            _ => return Err(GridError::NotPlaced),
        };
        if self.grid.get(loc).ok().flatten() != Some(id) {
            return Err(GridError::GridInconsistency { location: loc });
        }
        Ok(loc)
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("grid", &self.grid.name())
            .field("grid_id", &self.grid_id)
            .field("actors", &self.actors.len())
            .finish()
    }
}
