//! Per-step behaviour of every actor kind.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use super::Stage;
use crate::actor::{Actor, ActorId, ActorKind};
use crate::error::GridError;
use crate::grid::Grid;
use crate::location::Location;

/// Percent of each color channel a flower loses per step.
const FLOWER_DARKENING_PERCENT: u8 = 5;

const CRAB_SENSING_TURNS: [i32; 3] = [Location::AHEAD, Location::HALF_LEFT, Location::HALF_RIGHT];
const CRAB_MOVING_TURNS: [i32; 2] = [Location::LEFT, Location::RIGHT];

impl Stage {
    /// Run one step of `id`'s behaviour.
    pub fn act<R: Rng + ?Sized>(&mut self, id: ActorId, rng: &mut R) -> Result<(), GridError> {
        let kind = self.actors.get(id).ok_or(GridError::NotPlaced)?.kind;
        match kind {
            ActorKind::Actor => self.turn(id, Location::HALF_CIRCLE),
            ActorKind::Rock => Ok(()),
            ActorKind::Flower => {
                let flower = self.actors.get_mut(id).ok_or(GridError::NotPlaced)?;
                flower.set_color(flower.color().darken(FLOWER_DARKENING_PERCENT));
                Ok(())
            }
            ActorKind::Bug => {
                if self.can_move(id) {
                    self.advance(id)
                } else {
                    self.turn(id, Location::HALF_RIGHT)
                }
            }
            ActorKind::BoxBug { side_length, steps } => {
                if steps < side_length && self.can_move(id) {
                    self.advance(id)?;
                    self.set_kind(id, ActorKind::BoxBug { side_length, steps: steps + 1 });
                    Ok(())
                } else {
                    self.turn(id, Location::RIGHT)?;
                    self.set_kind(id, ActorKind::box_bug(side_length));
                    Ok(())
                }
            }
            ActorKind::Critter | ActorKind::CrabCritter | ActorKind::ChameleonCritter => {
                let sensed = self.sensed_actors(id)?;
                self.process_actors(id, &sensed, rng)?;
                let candidates = self.move_locations(id)?;
                let target = self.select_move_location(id, &candidates, rng);
                self.make_move(id, target, rng)
            }
        }
    }

    /// A bug can advance when the cell ahead is on the grid and either empty
    /// or holding a flower.
    pub fn can_move(&self, id: ActorId) -> bool {
        let (Ok(loc), Some(actor)) = (self.placed_at(id), self.actors.get(id)) else {
            return false;
        };
        let ahead = loc.adjacent(actor.direction());
        if !self.grid.is_valid(ahead) {
            return false;
        }
        match self.grid.get(ahead) {
            Ok(None) => true,
            Ok(Some(other)) => self.actors.get(other).map_or(false, |a| a.kind.is_flower()),
            Err(_) => false,
        }
    }

    /// Step a bug one cell ahead and drop a flower of its color where it was.
    ///
    /// When the cell ahead is off the grid the bug removes itself instead,
    /// still leaving the flower on its last cell. `act` never gets here in
    /// that state since it checks [`Stage::can_move`] first.
    pub fn advance(&mut self, id: ActorId) -> Result<(), GridError> {
        let from = self.placed_at(id)?;
        let (direction, color) = self
            .actors
            .get(id)
            .map(|a| (a.direction(), a.color()))
            .ok_or(GridError::NotPlaced)?;
        let ahead = from.adjacent(direction);
        if self.grid.is_valid(ahead) {
            self.move_to(id, ahead)?;
        } else {
            self.remove_self_from_grid(id)?;
            debug!("bug walked off the grid at {}", from);
        }
        self.put_self_in_grid(Actor::flower().with_color(color), from)?;
        Ok(())
    }

    fn turn(&mut self, id: ActorId, delta: i32) -> Result<(), GridError> {
        self.actors
            .get_mut(id)
            .ok_or(GridError::NotPlaced)?
            .turn(delta);
        Ok(())
    }

    fn set_kind(&mut self, id: ActorId, kind: ActorKind) {
        if let Some(actor) = self.actors.get_mut(id) {
            actor.kind = kind;
        }
    }

    /// Valid neighbours of `loc` at each of `turns` relative to `heading`.
    fn locations_in_directions<'a>(
        &'a self,
        loc: Location,
        heading: i32,
        turns: &'a [i32],
    ) -> impl Iterator<Item = Location> + 'a {
        turns
            .iter()
            .map(move |turn| loc.adjacent(heading + turn))
            .filter(move |l| self.grid.is_valid(*l))
    }

    /// The occupants a critter reacts to this step.
    fn sensed_actors(&self, id: ActorId) -> Result<Vec<ActorId>, GridError> {
        let loc = self.placed_at(id)?;
        let actor = self.actors.get(id).ok_or(GridError::NotPlaced)?;
        Ok(match actor.kind {
            ActorKind::CrabCritter => self
                .locations_in_directions(loc, actor.direction(), &CRAB_SENSING_TURNS)
                .filter_map(|l| self.grid.get(l).ok().flatten())
                .collect(),
            _ => self.grid.neighbors(loc).collect(),
        })
    }

    fn process_actors<R: Rng + ?Sized>(
        &mut self,
        id: ActorId,
        sensed: &[ActorId],
        rng: &mut R,
    ) -> Result<(), GridError> {
        let kind = self.actors.get(id).ok_or(GridError::NotPlaced)?.kind;
        if kind == ActorKind::ChameleonCritter {
            let borrowed = sensed
                .choose(rng)
                .and_then(|other| self.actors.get(*other))
                .map(|other| other.color());
            if let (Some(color), Some(me)) = (borrowed, self.actors.get_mut(id)) {
                me.set_color(color);
            }
            return Ok(());
        }
        for &other in sensed {
            let edible = self
                .actors
                .get(other)
                .map_or(false, |a| !a.kind.is_rock() && !a.kind.is_critter());
            if edible {
                let eaten = self.remove_self_from_grid(other)?;
                debug!("{} eaten by {}", eaten.kind().name(), kind.name());
            }
        }
        Ok(())
    }

    /// Empty cells a critter may move into.
    fn move_locations(&self, id: ActorId) -> Result<Vec<Location>, GridError> {
        let loc = self.placed_at(id)?;
        let actor = self.actors.get(id).ok_or(GridError::NotPlaced)?;
        Ok(match actor.kind {
            ActorKind::CrabCritter => self
                .locations_in_directions(loc, actor.direction(), &CRAB_MOVING_TURNS)
                .filter(|l| matches!(self.grid.get(*l), Ok(None)))
                .collect(),
            _ => self.grid.empty_adjacent_locations(loc).collect(),
        })
    }

    /// One candidate uniformly at random, or the critter's own cell when
    /// there is none.
    fn select_move_location<R: Rng + ?Sized>(
        &self,
        id: ActorId,
        candidates: &[Location],
        rng: &mut R,
    ) -> Option<Location> {
        match candidates.choose(rng) {
            Some(loc) => Some(*loc),
            None => self.actors.get(id).and_then(|a| a.location()),
        }
    }

    fn make_move<R: Rng + ?Sized>(
        &mut self,
        id: ActorId,
        target: Option<Location>,
        rng: &mut R,
    ) -> Result<(), GridError> {
        let Some(target) = target else {
            self.remove_self_from_grid(id)?;
            return Ok(());
        };
        let (kind, here) = self
            .actors
            .get(id)
            .map(|a| (a.kind, a.location()))
            .ok_or(GridError::NotPlaced)?;
        match kind {
            ActorKind::CrabCritter if here == Some(target) => {
                let delta = if rng.gen_bool(0.5) {
                    Location::LEFT
                } else {
                    Location::RIGHT
                };
                return self.turn(id, delta);
            }
            ActorKind::ChameleonCritter => {
                // facing your own cell is undefined; keep the current heading
                if let Some(here) = here.filter(|h| *h != target) {
                    let heading = here.direction_toward(target);
                    if let Some(me) = self.actors.get_mut(id) {
                        me.set_direction(heading);
                    }
                }
            }
            _ => {}
        }
        self.move_to(id, target)
    }
}
