//! Character controller - spawning, state transitions and walk requests.
//!
//! Every function takes an entity handle that may be stale (the roster was
//! rebuilt since the handle was taken). Stale handles are reported as
//! `Transition::Missing` / `false`, never as a panic.

use crate::components::{Agent, Behavior, Body, DwellRange, Walk};
use agentoffice_logic::animation::CharacterState;
use agentoffice_logic::layout::Desk;
use agentoffice_logic::pathfinding::{find_path, Cell, Direction, WalkGrid};
use hecs::{Entity, World};
use rand::Rng;

/// Outcome of a state change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state changed now.
    Applied,
    /// The character is walking; the state becomes its arrival state.
    Queued,
    /// A walk was started that ends in the requested state.
    Walking,
    /// Already in that state.
    Unchanged,
    /// No such character.
    Missing,
}

/// Spawn components for a member seated at `desk`.
pub fn character_bundle(
    name: &str,
    seat_index: usize,
    desk: &Desk,
    dwell: DwellRange,
    rng: &mut impl Rng,
) -> (Agent, Body, Behavior) {
    (
        Agent::new(name, seat_index, desk.chair, desk.anchor),
        Body::at(desk.chair),
        Behavior::new(CharacterState::Idle, dwell.sample(rng)),
    )
}

/// Set a character's state directly. While walking, the request replaces
/// the pending arrival state instead.
pub fn set_state(
    world: &mut World,
    entity: Entity,
    state: CharacterState,
    dwell: DwellRange,
    rng: &mut impl Rng,
) -> Transition {
    if let Ok(mut walk) = world.get::<&mut Walk>(entity) {
        walk.arrival = state;
        return Transition::Queued;
    }
    let Ok(mut behavior) = world.get::<&mut Behavior>(entity) else {
        return Transition::Missing;
    };
    if behavior.state == state {
        return Transition::Unchanged;
    }
    behavior.enter(state);
    behavior.previous = None;
    behavior.reset_dwell(dwell, rng);
    Transition::Applied
}

/// Map an external status string and apply it with [`set_state`].
pub fn set_status(
    world: &mut World,
    entity: Entity,
    status: &str,
    dwell: DwellRange,
    rng: &mut impl Rng,
) -> Transition {
    set_state(world, entity, CharacterState::from_status(status), dwell, rng)
}

/// Start walking to `target`. Returns `false` (and changes nothing) when
/// there is no route or the entity is gone.
///
/// A character already between two cells finishes entering the next cell
/// first, keeping its progress, and the new route continues from there.
pub fn walk_to(
    world: &mut World,
    grid: &WalkGrid,
    entity: Entity,
    target: Cell,
    arrival: CharacterState,
) -> bool {
    let in_transit = world
        .get::<&Walk>(entity)
        .ok()
        .and_then(|walk| walk.path.front().map(|&next| (next, walk.progress)));
    let Ok(mut body) = world.get::<&mut Body>(entity) else {
        return false;
    };

    let (path, progress) = match in_transit {
        Some((next, progress)) => {
            let mut path = find_path(grid, next, target);
            if path.is_empty() && next != target {
                return false;
            }
            path.insert(0, next);
            (path, progress)
        }
        None => {
            let path = find_path(grid, body.tile, target);
            if path.is_empty() {
                return false;
            }
            body.pos = crate::components::cell_origin(body.tile);
            (path, 0.0)
        }
    };
    body.facing = Direction::toward(body.tile, path[0]);
    drop(body);

    if let Ok(mut behavior) = world.get::<&mut Behavior>(entity) {
        behavior.enter(CharacterState::Walking);
        behavior.previous = None;
    }
    let mut walk = Walk::new(path, arrival);
    walk.progress = progress;
    world.insert_one(entity, walk).is_ok()
}

/// Play the celebration once, then return to the current state. Walking
/// characters are left alone.
pub fn celebrate(world: &mut World, entity: Entity) -> bool {
    if world.get::<&Walk>(entity).is_ok() {
        return false;
    }
    let Ok(mut behavior) = world.get::<&mut Behavior>(entity) else {
        return false;
    };
    if !behavior.state.is_one_shot() {
        behavior.previous = Some(behavior.state);
    }
    behavior.enter(CharacterState::Celebrate);
    true
}

pub fn state_of(world: &World, entity: Entity) -> Option<CharacterState> {
    world.get::<&Behavior>(entity).ok().map(|b| b.state)
}

pub fn is_walking(world: &World, entity: Entity) -> bool {
    world.get::<&Walk>(entity).is_ok()
}
