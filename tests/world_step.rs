use gridworld::{Actor, ActorKind, Color, GridShape, Location, Scenario, World};

fn layout(world: &World) -> Vec<(Location, ActorKind, i32, Color)> {
    world
        .stage()
        .occupants()
        .into_iter()
        .filter_map(|(loc, id)| {
            let a = world.actor(id)?;
            Some((loc, a.kind(), a.direction(), a.color()))
        })
        .collect()
}

#[test]
fn same_seed_replays_the_same_run() {
    let run = |seed| {
        let mut w = World::with_grid(GridShape::default(), Some(seed)).unwrap();
        Scenario::Crabs.populate(&mut w).unwrap();
        for _ in 0..25 {
            w.step();
        }
        layout(&w)
    };
    assert_eq!(run(17), run(17));
}

#[test]
fn every_step_acts_only_on_actors_present_at_its_start() {
    let mut w = World::with_grid(GridShape::default(), Some(2)).unwrap();
    Scenario::Critters.populate(&mut w).unwrap();
    for _ in 0..20 {
        let before = w.stage().len();
        let summary = w.step();
        assert_eq!(summary.acted + summary.skipped + summary.failed, before);
        assert_eq!(summary.failed, 0);
    }
}

#[test]
fn cells_and_back_references_stay_in_sync() {
    let mut w = World::with_grid(GridShape::default(), Some(9)).unwrap();
    Scenario::Crabs.populate(&mut w).unwrap();
    Scenario::BoxBugs.populate(&mut w).unwrap();
    for _ in 0..30 {
        w.step();
        for (loc, id) in w.stage().occupants() {
            let actor = w.actor(id).unwrap();
            assert_eq!(actor.location(), Some(loc));
            assert_eq!(actor.grid(), Some(w.stage().grid_id()));
        }
    }
}

#[test]
fn lone_bug_circles_a_bounded_grid() {
    let mut w = World::with_grid(GridShape::Bounded { rows: 4, cols: 4 }, Some(0)).unwrap();
    let bug = w
        .add(Actor::bug().facing(Location::NORTH), Some(Location::new(3, 0)))
        .unwrap()
        .unwrap();
    for _ in 0..40 {
        w.step();
        let loc = w.actor(bug).unwrap().location().unwrap();
        assert!(w.grid().is_valid(loc));
    }
    // nothing but flowers and the bug itself
    assert!(layout(&w)
        .iter()
        .all(|(_, kind, _, _)| matches!(kind, ActorKind::Bug | ActorKind::Flower)));
}

#[test]
fn switching_to_unbounded_keeps_the_population() {
    let mut w = World::with_grid(GridShape::default(), Some(4)).unwrap();
    Scenario::Chameleons.populate(&mut w).unwrap();
    let before = layout(&w);
    assert!(w.set_grid(GridShape::Unbounded).unwrap().is_empty());
    assert_eq!(layout(&w), before);
    for _ in 0..10 {
        w.step();
    }
    assert_eq!(w.stage().len(), before.len());
}
