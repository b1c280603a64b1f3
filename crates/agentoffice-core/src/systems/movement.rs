//! Movement system - advances walking characters cell by cell

use crate::components::{cell_origin, Behavior, Body, Walk};
use agentoffice_logic::pathfinding::Direction;
use hecs::World;

/// Move walking characters along their paths. Each cell transit takes
/// `seconds_per_tile`; on arrival the `Walk` component is removed and the
/// arrival state applied.
pub fn movement_system(world: &mut World, delta_seconds: f32, seconds_per_tile: f32) {
    let mut arrived = Vec::new();

    for (entity, (body, walk, behavior)) in world.query_mut::<(&mut Body, &mut Walk, &mut Behavior)>() {
        walk.progress += delta_seconds / seconds_per_tile;

        if walk.progress >= 1.0 {
            if let Some(next) = walk.path.pop_front() {
                body.tile = next;
                body.pos = cell_origin(next);
                walk.progress = 0.0;
                if let Some(&after) = walk.path.front() {
                    body.facing = Direction::toward(next, after);
                }
            }
        } else if let Some(&next) = walk.path.front() {
            body.pos = cell_origin(body.tile).lerp(cell_origin(next), walk.progress);
        }

        if walk.path.is_empty() {
            behavior.enter(walk.arrival);
            arrived.push(entity);
        }
    }

    // Remove movement - arrived
    for entity in arrived {
        let _ = world.remove_one::<Walk>(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentoffice_logic::animation::CharacterState;
    use agentoffice_logic::pathfinding::Cell;

    fn walker(world: &mut World, path: Vec<Cell>) -> hecs::Entity {
        let mut behavior = Behavior::new(CharacterState::Walking, 30.0);
        behavior.frame = 1;
        world.spawn((
            Body::at(Cell::new(1, 1)),
            Walk::new(path, CharacterState::Reading),
            behavior,
        ))
    }

    #[test]
    fn test_interpolates_between_cells() {
        let mut world = World::new();
        let e = walker(&mut world, vec![Cell::new(2, 1)]);
        movement_system(&mut world, 0.15, 0.3);
        let body = *world.get::<&Body>(e).unwrap();
        assert!((body.pos.x - 72.0).abs() < 1e-3, "x = {}", body.pos.x);
        assert_eq!(body.pos.y, 48.0);
        assert_eq!(body.tile, Cell::new(1, 1));
    }

    #[test]
    fn test_arrival_applies_state_and_removes_walk() {
        let mut world = World::new();
        let e = walker(&mut world, vec![Cell::new(2, 1), Cell::new(2, 2)]);
        movement_system(&mut world, 0.3, 0.3);
        {
            let body = *world.get::<&Body>(e).unwrap();
            assert_eq!(body.tile, Cell::new(2, 1));
            assert_eq!(body.facing, Direction::Down);
        }
        assert!(world.get::<&Walk>(e).is_ok());

        movement_system(&mut world, 0.3, 0.3);
        assert!(world.get::<&Walk>(e).is_err());
        let behavior = *world.get::<&Behavior>(e).unwrap();
        assert_eq!(behavior.state, CharacterState::Reading);
        assert_eq!(behavior.frame, 0);
        // Facing unchanged once the path is empty
        assert_eq!(world.get::<&Body>(e).unwrap().facing, Direction::Down);
    }

    #[test]
    fn test_each_cell_takes_fixed_time() {
        let mut world = World::new();
        let path: Vec<Cell> = (2..=5).map(|c| Cell::new(c, 1)).collect();
        let e = walker(&mut world, path);
        let dt = 1.0 / 30.0;
        let mut steps = 0;
        while world.get::<&Walk>(e).is_ok() && steps < 1000 {
            movement_system(&mut world, dt, 0.3);
            steps += 1;
        }
        // 4 cells × 0.3 s at 30 steps/s, give or take one step per cell
        assert!((36..=40).contains(&steps), "steps = {steps}");
        assert_eq!(world.get::<&Body>(e).unwrap().tile, Cell::new(5, 1));
    }
}
