//! The simulation driver.
//!
//! A [`World`] owns a [`Stage`] and the random source lent to actors. It runs
//! steps, takes add/remove commands from the UI and tells subscribers when
//! something visible changed.

use std::collections::BTreeSet;
use std::f64::consts::TAU;
use std::fmt;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::actor::{Actor, ActorId};
use crate::error::GridError;
use crate::grid::{Grid, GridShape, DEFAULT_COLS, DEFAULT_ROWS};
use crate::location::Location;
use crate::stage::Stage;

pub const DEFAULT_MESSAGE: &str =
    "Click on a grid location to construct or manipulate an actor.";

/// Notification sent to the rendering side after a visible change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Repaint {
    Added(Location),
    Removed(Location),
    Moved { from: Location, to: Location },
    Stepped { generation: u64 },
    GridReplaced,
    Message,
}

/// What happened during one [`World::step`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub generation: u64,
    /// Actors whose `act` ran to completion
    pub acted: usize,
    /// Snapshot entries already gone when their turn came
    pub skipped: usize,
    /// Actors whose `act` returned an error
    pub failed: usize,
}

pub struct World {
    stage: Stage,
    rng: ChaCha8Rng,
    generation: u64,
    message: Option<String>,
    occupant_types: BTreeSet<&'static str>,
    subscribers: Vec<Sender<Repaint>>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// An empty 10×10 bounded world seeded from the OS.
    pub fn new() -> Self {
        Self::from_parts(Stage::default(), ChaCha8Rng::from_entropy())
    }

    /// An empty world over `shape`. A seed makes every random choice
    /// reproducible.
    pub fn with_grid(shape: GridShape, seed: Option<u64>) -> Result<Self, GridError> {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self::from_parts(Stage::new(shape)?, rng))
    }

    fn from_parts(stage: Stage, rng: ChaCha8Rng) -> Self {
        Self {
            stage,
            rng,
            generation: 0,
            message: None,
            occupant_types: BTreeSet::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn grid(&self) -> &dyn Grid<ActorId> {
        self.stage.grid()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Number of completed steps.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.stage.actor(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.stage.actor_mut(id)
    }

    /// The world's random source, for callers building randomized layouts.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// The actor under a clicked cell. Clicks outside the grid find nothing.
    pub fn inspect(&self, loc: Location) -> Option<(ActorId, &Actor)> {
        if !self.grid().is_valid(loc) {
            return None;
        }
        self.stage.actor_at(loc).ok().flatten()
    }

    /// Swap the grid for a new `shape`, keeping occupants at the same
    /// coordinates where they still fit. Returns the ones that did not.
    pub fn set_grid(&mut self, shape: GridShape) -> Result<Vec<Actor>, GridError> {
        let dropped = self.stage.replace_grid(shape)?;
        info!(
            "grid replaced by {}, {} occupant(s) dropped",
            self.grid().name(),
            dropped.len()
        );
        self.notify(Repaint::GridReplaced);
        Ok(dropped)
    }

    /// Names of the grid types a UI can offer.
    pub fn grid_types(&self) -> &'static [&'static str] {
        &GridShape::NAMES
    }

    /// Names of every actor kind ever added to this world.
    pub fn occupant_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.occupant_types.iter().copied()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The message to show, falling back to [`DEFAULT_MESSAGE`].
    pub fn display_message(&self) -> &str {
        self.message().unwrap_or(DEFAULT_MESSAGE)
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.notify(Repaint::Message);
    }

    /// Let every actor placed right now act once.
    ///
    /// Occupants are snapshotted first, so actors created during the step
    /// wait for the next one and actors removed earlier in the step are
    /// skipped. A failing actor is logged and the step carries on.
    pub fn step(&mut self) -> StepSummary {
        let snapshot = self.stage.occupants();
        let mut summary = StepSummary {
            generation: self.generation + 1,
            ..StepSummary::default()
        };
        for (loc, id) in snapshot {
            if !self.stage.is_attached(id) {
                summary.skipped += 1;
                continue;
            }
            match self.stage.act(id, &mut self.rng) {
                Ok(()) => summary.acted += 1,
                Err(err) => {
                    warn!("actor starting at {} failed to act: {}", loc, err);
                    summary.failed += 1;
                }
            }
        }
        self.generation = summary.generation;
        debug!(
            "generation {}: {} acted, {} skipped, {} failed",
            summary.generation, summary.acted, summary.skipped, summary.failed
        );
        self.notify(Repaint::Stepped {
            generation: self.generation,
        });
        summary
    }

    /// Place `actor` at `loc`, or at a random empty cell when `loc` is
    /// `None`. A full grid leaves the actor unplaced and returns `Ok(None)`.
    pub fn add(&mut self, actor: Actor, loc: Option<Location>) -> Result<Option<ActorId>, GridError> {
        let name = actor.kind().name();
        let loc = match loc.or_else(|| self.random_empty_location()) {
            Some(loc) => loc,
            None => {
                // still offered to the UI even though nothing was placed
                self.occupant_types.insert(name);
                debug!("no empty cell for {}", name);
                return Ok(None);
            }
        };
        let id = self.stage.put_self_in_grid(actor, loc)?;
        self.occupant_types.insert(name);
        self.notify(Repaint::Added(loc));
        Ok(Some(id))
    }

    /// Take whoever is at `loc` off the grid.
    pub fn remove(&mut self, loc: Location) -> Result<Option<Actor>, GridError> {
        let Some(id) = self.grid().get(loc)? else {
            return Ok(None);
        };
        let actor = self.stage.remove_self_from_grid(id)?;
        self.notify(Repaint::Removed(loc));
        Ok(Some(actor))
    }

    /// Move a placed actor, evicting whoever is at `to`.
    pub fn move_actor(&mut self, id: ActorId, to: Location) -> Result<(), GridError> {
        let from = self
            .actor(id)
            .and_then(Actor::location)
            .ok_or(GridError::NotPlaced)?;
        self.stage.move_to(id, to)?;
        self.notify(Repaint::Moved { from, to });
        Ok(())
    }

    /// A uniformly chosen empty cell of a bounded grid, `None` when full.
    ///
    /// Unbounded grids are sampled around the origin with a gaussian offset
    /// until an empty cell turns up.
    pub fn random_empty_location(&mut self) -> Option<Location> {
        let grid = self.stage.grid();
        match (grid.num_rows(), grid.num_cols()) {
            (Some(rows), Some(cols)) => {
                let empty: Vec<Location> = (0..rows)
                    .flat_map(|r| (0..cols).map(move |c| Location::new(r, c)))
                    .filter(|loc| matches!(grid.get(*loc), Ok(None)))
                    .collect();
                empty.choose(&mut self.rng).copied()
            }
            _ => loop {
                let row = (f64::from(DEFAULT_ROWS) * gaussian(&mut self.rng)) as i32;
                let col = (f64::from(DEFAULT_COLS) * gaussian(&mut self.rng)) as i32;
                let loc = Location::new(row, col);
                if grid.is_valid(loc) && matches!(grid.get(loc), Ok(None)) {
                    return Some(loc);
                }
            },
        }
    }

    /// A fresh channel of [`Repaint`] events. Dropping the receiver
    /// unsubscribes it.
    pub fn subscribe(&mut self) -> Receiver<Repaint> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: Repaint) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

/// Standard normal sample via the Box-Muller transform.
fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::EPSILON);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("stage", &self.stage)
            .field("generation", &self.generation)
            .field("message", &self.message)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// One character per cell between `#` rules: the first letter of the
/// occupant's kind, blank for an empty cell. Unbounded grids show the box
/// around their occupants.
impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.grid();
        let (rows, cols) = match (grid.num_rows(), grid.num_cols()) {
            (Some(rows), Some(cols)) => (0..rows, 0..cols),
            _ => match grid.occupied_bounds() {
                Some(b) => (b.min_row..b.max_row + 1, b.min_col..b.max_col + 1),
                None => (0..0, 0..0),
            },
        };
        let rule = "#".repeat(cols.len() + 2);
        writeln!(f, "{}", rule)?;
        for row in rows {
            f.write_str("#")?;
            for col in cols.clone() {
                let glyph = self
                    .stage
                    .actor_at(Location::new(row, col))
                    .ok()
                    .flatten()
                    .and_then(|(_, actor)| actor.kind().name().chars().next())
                    .unwrap_or(' ');
                write!(f, "{}", glyph)?;
            }
            writeln!(f, "#")?;
        }
        writeln!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorKind;
    use crate::color::Color;

    fn world(rows: i32, cols: i32) -> World {
        World::with_grid(GridShape::Bounded { rows, cols }, Some(7)).unwrap()
    }

    #[test]
    fn new_world_is_ten_by_ten_with_default_message() {
        let w = World::new();
        assert_eq!(w.grid().num_rows(), Some(10));
        assert_eq!(w.grid().num_cols(), Some(10));
        assert_eq!(w.message(), None);
        assert_eq!(w.display_message(), DEFAULT_MESSAGE);
        assert_eq!(w.grid_types(), &["BoundedGrid", "UnboundedGrid"]);
    }

    #[test]
    fn dropped_flowers_wait_for_the_next_step() {
        let mut w = world(3, 3);
        let bug = w
            .add(Actor::bug().facing(Location::EAST), Some(Location::new(0, 0)))
            .unwrap()
            .unwrap();

        let first = w.step();
        assert_eq!(first.acted, 1);
        let (_, flower) = w.inspect(Location::new(0, 0)).unwrap();
        assert_eq!(flower.color(), Color::RED);

        let second = w.step();
        assert_eq!(second.acted, 2);
        let (_, flower) = w.inspect(Location::new(0, 0)).unwrap();
        assert_eq!(flower.color(), Color::RED.darken(5));
        assert_eq!(w.actor(bug).unwrap().location(), Some(Location::new(0, 2)));
        assert_eq!(w.generation(), 2);
    }

    #[test]
    fn eaten_actors_are_skipped() {
        let mut w = world(1, 3);
        // the critter goes first and eats the flower before its turn
        w.add(Actor::critter(), Some(Location::new(0, 0))).unwrap();
        w.add(Actor::flower(), Some(Location::new(0, 1))).unwrap();
        w.add(Actor::rock(), Some(Location::new(0, 2))).unwrap();
        let summary = w.step();
        assert_eq!(summary.acted, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn add_without_location_fills_empty_cells_then_gives_up() {
        let mut w = world(2, 2);
        for _ in 0..4 {
            assert!(w.add(Actor::rock(), None).unwrap().is_some());
        }
        assert_eq!(w.stage().len(), 4);
        assert_eq!(w.add(Actor::flower(), None).unwrap(), None);
        assert_eq!(w.random_empty_location(), None);
        assert_eq!(w.occupant_types().collect::<Vec<_>>(), vec!["Flower", "Rock"]);
    }

    #[test]
    fn failed_add_does_not_register_its_kind() {
        let mut w = world(2, 2);
        assert_eq!(
            w.add(Actor::critter(), Some(Location::new(5, 5))),
            Err(GridError::InvalidLocation(Location::new(5, 5)))
        );
        assert_eq!(w.occupant_types().count(), 0);
        w.add(Actor::rock(), Some(Location::new(0, 0))).unwrap();
        assert_eq!(w.occupant_types().collect::<Vec<_>>(), vec!["Rock"]);
    }

    #[test]
    fn random_location_on_unbounded_grid_is_empty() {
        let mut w = World::with_grid(GridShape::Unbounded, Some(11)).unwrap();
        w.add(Actor::rock(), Some(Location::new(0, 0))).unwrap();
        for _ in 0..50 {
            let loc = w.random_empty_location().unwrap();
            assert!(w.inspect(loc).is_none());
            w.add(Actor::flower(), Some(loc)).unwrap();
        }
        assert_eq!(w.stage().len(), 51);
    }

    #[test]
    fn critter_at_the_coordinate_limit_steps_cleanly() {
        let mut w = World::with_grid(GridShape::Unbounded, Some(8)).unwrap();
        let edge = Location::new(i32::MAX, 0);
        let critter = w.add(Actor::critter(), Some(edge)).unwrap().unwrap();
        w.add(Actor::flower(), Some(Location::new(i32::MIN, 0))).unwrap();

        // the flower sorts first and acts, then the critter eats it across the seam
        let summary = w.step();
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.acted, 2);
        assert_eq!(w.stage().len(), 1);
        let moved = w.actor(critter).unwrap().location().unwrap();
        assert!(Location::COMPASS.iter().any(|d| edge.adjacent(*d) == moved));
    }

    #[test]
    fn remove_returns_the_actor() {
        let mut w = world(3, 3);
        let loc = Location::new(1, 1);
        w.add(Actor::flower(), Some(loc)).unwrap();
        let removed = w.remove(loc).unwrap().unwrap();
        assert_eq!(removed.kind(), ActorKind::Flower);
        assert_eq!(w.remove(loc).unwrap(), None);
        assert_eq!(
            w.remove(Location::new(9, 9)),
            Err(GridError::InvalidLocation(Location::new(9, 9)))
        );
    }

    #[test]
    fn inspect_ignores_invalid_cells() {
        let w = world(2, 2);
        assert!(w.inspect(Location::new(-1, 0)).is_none());
        assert!(w.inspect(Location::new(0, 0)).is_none());
    }

    #[test]
    fn shrinking_the_grid_drops_what_no_longer_fits() {
        let mut w = world(5, 5);
        w.add(Actor::rock(), Some(Location::new(0, 0))).unwrap();
        w.add(Actor::bug(), Some(Location::new(4, 4))).unwrap();
        let dropped = w.set_grid(GridShape::Bounded { rows: 2, cols: 2 }).unwrap();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].kind(), ActorKind::Bug);
        assert!(w.inspect(Location::new(0, 0)).is_some());
    }

    #[test]
    fn subscribers_hear_every_change() {
        let mut w = world(3, 3);
        let rx = w.subscribe();
        let id = w.add(Actor::bug(), Some(Location::new(2, 0))).unwrap().unwrap();
        w.move_actor(id, Location::new(2, 1)).unwrap();
        w.set_message("hello");
        w.step();
        w.remove(Location::new(1, 1)).unwrap();
        let events: Vec<Repaint> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                Repaint::Added(Location::new(2, 0)),
                Repaint::Moved {
                    from: Location::new(2, 0),
                    to: Location::new(2, 1)
                },
                Repaint::Message,
                Repaint::Stepped { generation: 1 },
                Repaint::Removed(Location::new(1, 1)),
            ]
        );
    }

    #[test]
    fn dropped_receivers_are_forgotten() {
        let mut w = world(2, 2);
        drop(w.subscribe());
        w.set_message("nobody listening");
        assert!(w.subscribers.is_empty());
    }

    #[test]
    fn text_view_marks_occupants() {
        let mut w = world(2, 3);
        w.add(Actor::rock(), Some(Location::new(0, 0))).unwrap();
        w.add(Actor::flower(), Some(Location::new(1, 2))).unwrap();
        assert_eq!(w.to_string(), "#####\n#R  #\n#  F#\n#####\n");
    }

    #[test]
    fn unbounded_text_view_covers_occupied_box() {
        let mut w = World::with_grid(GridShape::Unbounded, Some(1)).unwrap();
        w.add(Actor::bug(), Some(Location::new(-1, -1))).unwrap();
        w.add(Actor::critter(), Some(Location::new(0, 1))).unwrap();
        assert_eq!(w.to_string(), "#####\n#B  #\n#  C#\n#####\n");
    }
}
