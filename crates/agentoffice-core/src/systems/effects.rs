//! Effects system - advances every effects layer against current character positions

use crate::components::{Behavior, Body};
use crate::effects::{Anchor, EffectsLayer};
use hecs::{Entity, World};
use std::collections::HashMap;

pub fn effects_system(world: &mut World, delta_seconds: f32) {
    let anchors: HashMap<Entity, Anchor> = world
        .query::<(&Body, &Behavior)>()
        .iter()
        .map(|(entity, (body, behavior))| {
            (
                entity,
                Anchor {
                    pos: body.pos,
                    state: behavior.state,
                },
            )
        })
        .collect();

    for (_, layer) in world.query_mut::<&mut EffectsLayer>() {
        layer.update(delta_seconds, &anchors);
    }
}
