//! gridworld: a grid of colored actors stepping in discrete time.
//!
//! Actors (rocks, flowers, bugs, critters) occupy the cells of a bounded or
//! unbounded grid and act once per step. Rendering is left to the caller,
//! which reads the grid and listens for [`Repaint`] events.
//!
//! # Features
//! * **One occupant per cell**: placing onto an occupied cell evicts.
//! * **Snapshot stepping**: actors born during a step act from the next one.
//! * **Seedable randomness**: a `World` built with a seed replays exactly.
//!
//! # Example
//! ```
//! use gridworld::{Actor, GridShape, Location, World};
//! let mut world = World::with_grid(GridShape::Bounded { rows: 5, cols: 5 }, Some(1)).unwrap();
//! let bug = world
//!     .add(Actor::bug().facing(Location::EAST), Some(Location::new(2, 0)))
//!     .unwrap()
//!     .unwrap();
//! world.step();
//! assert_eq!(world.actor(bug).unwrap().location(), Some(Location::new(2, 1)));
//! ```

pub mod actor;
pub mod color;
pub mod config;
pub mod error;
pub mod grid;
pub mod location;
pub mod runner;
pub mod scenario;
pub mod stage;
pub mod unbounded_grid;
pub mod world;

// Main exports
pub use actor::{Actor, ActorId, ActorKind, GridId};
pub use color::Color;
pub use config::Config;
pub use error::GridError;
pub use grid::{BoundedGrid, Grid, GridBounds, GridShape, Occupant};
pub use location::Location;
pub use runner::Runner;
pub use scenario::Scenario;
pub use stage::Stage;
pub use unbounded_grid::UnboundedGrid;
pub use world::{Repaint, StepSummary, World, DEFAULT_MESSAGE};
