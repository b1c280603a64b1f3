//! Idle system - idle or sleeping characters fidget after a random dwell

use crate::components::{Behavior, DwellRange, Walk};
use agentoffice_logic::animation::CharacterState;
use hecs::World;
use rand::Rng;

pub fn idle_system(world: &mut World, delta_seconds: f32, dwell: DwellRange, rng: &mut impl Rng) {
    for (_, (behavior, walk)) in world.query_mut::<(&mut Behavior, Option<&Walk>)>() {
        if walk.is_some() {
            continue;
        }
        if behavior.dwell_stale {
            behavior.reset_dwell(dwell, rng);
        }
        if !matches!(behavior.state, CharacterState::Idle | CharacterState::Sleeping) {
            continue;
        }
        behavior.dwell -= delta_seconds;
        if behavior.dwell <= 0.0 {
            behavior.previous = Some(behavior.state);
            behavior.enter(CharacterState::Fidget);
            behavior.reset_dwell(dwell, rng);
        }
    }
}
