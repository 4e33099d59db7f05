//! Grid occupants.
//!
//! An [`Actor`] is plain data: kind, facing, color and a back-reference to the
//! grid cell it occupies. Behaviour lives in [`Stage`](crate::stage::Stage),
//! which owns both the grid and the actors placed in it.

use std::fmt;

use slotmap::{new_key_type, Key};

use crate::color::Color;
use crate::grid::Occupant;
use crate::location::Location;

new_key_type! {
    /// Handle to an actor placed on a stage. This is what grid cells store.
    pub struct ActorId;
}

impl Occupant for ActorId {
    fn is_null(&self) -> bool {
        Key::is_null(self)
    }
}

/// Identity of one grid instance. Replacing a stage's grid mints a new id, so
/// a stale back-reference never matches the live grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridId(u64);

impl GridId {
    pub(crate) const FIRST: GridId = GridId(1);

    pub(crate) fn next(self) -> GridId {
        GridId(self.0 + 1)
    }
}

/// The closed family of actor behaviours.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActorKind {
    /// Turns around every step.
    Actor,
    /// Does nothing.
    Rock,
    /// Darkens a little every step.
    Flower,
    /// Moves ahead leaving flowers behind, turns when blocked.
    Bug,
    /// A bug that walks the outline of a square.
    BoxBug { side_length: u32, steps: u32 },
    /// Eats non-rock, non-critter neighbours then wanders.
    Critter,
    /// Senses ahead, moves sideways.
    CrabCritter,
    /// Takes on a neighbour's color and faces where it goes.
    ChameleonCritter,
}

impl ActorKind {
    pub fn box_bug(side_length: u32) -> Self {
        ActorKind::BoxBug {
            side_length,
            steps: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActorKind::Actor => "Actor",
            ActorKind::Rock => "Rock",
            ActorKind::Flower => "Flower",
            ActorKind::Bug => "Bug",
            ActorKind::BoxBug { .. } => "BoxBug",
            ActorKind::Critter => "Critter",
            ActorKind::CrabCritter => "CrabCritter",
            ActorKind::ChameleonCritter => "ChameleonCritter",
        }
    }

    pub fn default_color(&self) -> Color {
        match self {
            ActorKind::Rock => Color::BLACK,
            ActorKind::Flower => Color::PINK,
            ActorKind::Bug | ActorKind::BoxBug { .. } | ActorKind::CrabCritter => Color::RED,
            ActorKind::Actor | ActorKind::Critter | ActorKind::ChameleonCritter => Color::BLUE,
        }
    }

    pub fn is_rock(&self) -> bool {
        matches!(self, ActorKind::Rock)
    }

    pub fn is_flower(&self) -> bool {
        matches!(self, ActorKind::Flower)
    }

    /// Critter and every specialisation of it.
    pub fn is_critter(&self) -> bool {
        matches!(
            self,
            ActorKind::Critter | ActorKind::CrabCritter | ActorKind::ChameleonCritter
        )
    }
}

/// A grid occupant. Freshly built actors are detached.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub(crate) kind: ActorKind,
    pub(crate) grid: Option<GridId>,
    pub(crate) location: Option<Location>,
    direction: i32,
    color: Color,
}

impl Actor {
    /// A detached actor facing north in its kind's default color.
    pub fn new(kind: ActorKind) -> Self {
        Self {
            kind,
            grid: None,
            location: None,
            direction: Location::NORTH,
            color: kind.default_color(),
        }
    }

    pub fn rock() -> Self {
        Self::new(ActorKind::Rock)
    }

    pub fn flower() -> Self {
        Self::new(ActorKind::Flower)
    }

    pub fn bug() -> Self {
        Self::new(ActorKind::Bug)
    }

    pub fn critter() -> Self {
        Self::new(ActorKind::Critter)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn facing(mut self, direction: i32) -> Self {
        self.set_direction(direction);
        self
    }

    #[inline]
    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    #[inline]
    pub fn grid(&self) -> Option<GridId> {
        self.grid
    }

    #[inline]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn is_placed(&self) -> bool {
        self.grid.is_some()
    }

    #[inline]
    pub fn direction(&self) -> i32 {
        self.direction
    }

    /// Set the heading, normalised into `[0, 360)`.
    pub fn set_direction(&mut self, direction: i32) {
        self.direction = direction.rem_euclid(Location::FULL_CIRCLE);
    }

    /// Rotate by `delta` degrees, clockwise when positive.
    pub fn turn(&mut self, delta: i32) {
        self.set_direction(self.direction + delta.rem_euclid(Location::FULL_CIRCLE));
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn reset_color(&mut self) {
        self.color = self.kind.default_color();
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[location=", self.kind.name())?;
        match self.location {
            Some(loc) => write!(f, "{}", loc)?,
            None => f.write_str("none")?,
        }
        write!(f, ",direction={},color={}]", self.direction, self.color)
    }
}
