//! Demo layouts for the binary.

use clap::ValueEnum;
use serde::Deserialize;

use crate::actor::{Actor, ActorKind};
use crate::color::Color;
use crate::error::GridError;
use crate::location::Location;
use crate::world::World;

/// Number of box bugs in [`Scenario::BoxBugs`]; side lengths run 1..=8.
const BOX_BUGS: u32 = 8;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Two critters grazing among flowers and rocks
    #[default]
    Critters,
    /// Crab critters, bugs, flowers and rocks
    Crabs,
    /// Chameleon critters among colored rocks
    Chameleons,
    /// Box bugs of increasing size in random colors
    BoxBugs,
    /// A single bug and rock at random spots
    Bugs,
}

impl Scenario {
    /// Add this layout's actors to `world`. The fixed layouts need at least
    /// an 8×9 grid; smaller bounded grids report the first cell that does not
    /// fit.
    pub fn populate(self, world: &mut World) -> Result<(), GridError> {
        self.populate_with(world, ActorKind::Flower.default_color())
    }

    /// Like [`Scenario::populate`], with `flowers` as the color of every
    /// flower the layout does not color itself.
    pub fn populate_with(self, world: &mut World, flowers: Color) -> Result<(), GridError> {
        let at = |row, col| Some(Location::new(row, col));
        match self {
            Scenario::Critters => {
                world.add(Actor::rock(), at(7, 8))?;
                world.add(Actor::rock(), at(3, 3))?;
                world.add(Actor::flower().with_color(Color::BLUE), at(2, 8))?;
                world.add(Actor::flower().with_color(Color::PINK), at(5, 5))?;
                world.add(Actor::flower().with_color(Color::RED), at(1, 5))?;
                world.add(Actor::flower().with_color(Color::YELLOW), at(7, 2))?;
                world.add(Actor::critter(), at(4, 4))?;
                world.add(Actor::critter(), at(5, 8))?;
            }
            Scenario::Crabs => {
                for (row, col) in [(7, 5), (5, 4), (5, 7), (7, 3)] {
                    world.add(Actor::rock(), at(row, col))?;
                }
                for (row, col) in [(7, 8), (2, 2), (3, 5), (3, 8)] {
                    world.add(Actor::flower().with_color(flowers), at(row, col))?;
                }
                world.add(Actor::bug(), at(6, 5))?;
                world.add(Actor::bug(), at(5, 3))?;
                for (row, col) in [(4, 5), (6, 1), (7, 4)] {
                    world.add(Actor::new(ActorKind::CrabCritter), at(row, col))?;
                }
            }
            Scenario::Chameleons => {
                world.add(Actor::rock(), at(7, 8))?;
                world.add(Actor::rock(), at(3, 3))?;
                world.add(Actor::rock().with_color(Color::BLUE), at(2, 8))?;
                world.add(Actor::rock().with_color(Color::PINK), at(5, 5))?;
                world.add(Actor::rock().with_color(Color::RED), at(1, 5))?;
                world.add(Actor::rock().with_color(Color::YELLOW), at(7, 2))?;
                world.add(Actor::new(ActorKind::ChameleonCritter), at(4, 4))?;
                world.add(Actor::new(ActorKind::ChameleonCritter), at(5, 8))?;
            }
            Scenario::BoxBugs => {
                for side in 1..=BOX_BUGS {
                    let color = Color::random(world.rng());
                    world.add(Actor::new(ActorKind::box_bug(side)).with_color(color), None)?;
                }
            }
            Scenario::Bugs => {
                world.add(Actor::bug(), None)?;
                world.add(Actor::rock(), None)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridShape;

    fn world() -> World {
        World::with_grid(GridShape::default(), Some(5)).unwrap()
    }

    fn count(world: &World, kind: ActorKind) -> usize {
        world
            .stage()
            .occupants()
            .into_iter()
            .filter(|(_, id)| world.actor(*id).map(Actor::kind) == Some(kind))
            .count()
    }

    #[test]
    fn crab_layout_matches_its_population() {
        let mut w = world();
        Scenario::Crabs.populate(&mut w).unwrap();
        assert_eq!(count(&w, ActorKind::Rock), 4);
        assert_eq!(count(&w, ActorKind::Flower), 4);
        assert_eq!(count(&w, ActorKind::Bug), 2);
        assert_eq!(count(&w, ActorKind::CrabCritter), 3);
    }

    #[test]
    fn uncolored_flowers_take_the_requested_color() {
        let mut w = world();
        let yellow: Color = "yellow".parse().unwrap();
        Scenario::Crabs.populate_with(&mut w, yellow).unwrap();
        let (_, flower) = w.inspect(Location::new(2, 2)).unwrap();
        assert_eq!(flower.color(), Color::YELLOW);

        let mut w = world();
        Scenario::Critters.populate_with(&mut w, yellow).unwrap();
        let (_, flower) = w.inspect(Location::new(2, 8)).unwrap();
        assert_eq!(flower.color(), Color::BLUE);
    }

    #[test]
    fn chameleons_start_among_colored_rocks() {
        let mut w = world();
        Scenario::Chameleons.populate(&mut w).unwrap();
        let (_, rock) = w.inspect(Location::new(2, 8)).unwrap();
        assert_eq!(rock.color(), Color::BLUE);
        assert_eq!(count(&w, ActorKind::ChameleonCritter), 2);
    }

    #[test]
    fn box_bugs_land_on_random_cells() {
        let mut w = world();
        Scenario::BoxBugs.populate(&mut w).unwrap();
        assert_eq!(w.stage().len(), BOX_BUGS as usize);
        let mut sides: Vec<u32> = w
            .stage()
            .occupants()
            .into_iter()
            .filter_map(|(_, id)| match w.actor(id)?.kind() {
                ActorKind::BoxBug { side_length, .. } => Some(side_length),
                _ => None,
            })
            .collect();
        sides.sort_unstable();
        assert_eq!(sides, (1..=BOX_BUGS).collect::<Vec<_>>());
    }

    #[test]
    fn fixed_layout_rejects_a_small_grid() {
        let mut w = World::with_grid(GridShape::Bounded { rows: 4, cols: 4 }, Some(5)).unwrap();
        assert_eq!(
            Scenario::Critters.populate(&mut w),
            Err(GridError::InvalidLocation(Location::new(7, 8)))
        );
    }
}
