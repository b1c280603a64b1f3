//! The office simulation context.
//!
//! An [`Office`] is built from a generated layout and a roster: it spawns the
//! backdrop, furniture, one character per seated member and the effects
//! layer into a [`Scene`], and remembers which entity belongs to whom. It is
//! replaced wholesale whenever the roster changes.

use crate::components::{cell_origin, Agent, Backdrop, Behavior, Body, Prop, Vec2};
use crate::config::OfficeConfig;
use crate::effects::{EffectsLayer, Glyph, DEFAULT_BUBBLE_SECONDS};
use crate::events::{Member, StatusEvent};
use crate::scene::Scene;
use crate::systems::{character_bundle, is_walking, set_state, walk_to, RenderCache, Transition};
use agentoffice_logic::animation::CharacterState;
use agentoffice_logic::constants::{CHARACTER_HEIGHT, CHARACTER_WIDTH, GAME_TILE, SCALE};
use agentoffice_logic::layout::{Decoration, OfficeLayout};
use agentoffice_logic::pathfinding::{Cell, Direction};
use agentoffice_logic::sprites::{keys, SpriteLibrary};
use hecs::{Entity, World};
use rand::Rng;

/// What the info overlay shows for a clicked character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCard {
    pub name: String,
    pub label: String,
    pub state: CharacterState,
    /// Emoji plus state name, e.g. `💻 working`.
    pub status_line: String,
    pub task: Option<String>,
    pub last_msg: Option<String>,
}

pub struct Office {
    pub layout: OfficeLayout,
    roster: Vec<(String, Entity)>,
    effects: Entity,
    pub cache: RenderCache,
}

impl Office {
    /// Spawn everything for `layout` into `scene`. Members beyond the desk
    /// count are not seated.
    pub fn build(
        scene: &mut Scene,
        layout: OfficeLayout,
        members: &[Member],
        statuses: &[StatusEvent],
        library: &dyn SpriteLibrary,
        config: &OfficeConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let cache = RenderCache::build(library, config);
        let t = GAME_TILE as f32;

        scene.add((Backdrop {
            cols: layout.cols,
            rows: layout.rows,
        },));

        // Furniture
        for desk in &layout.desks {
            let desk_pos = cell_origin(desk.anchor);
            scene.add((Prop::new(keys::DESK, desk_pos, (desk.anchor.row + 2) as f32 * t),));
            scene.add((Prop::new(
                keys::PC,
                cell_origin(desk.workstation),
                (desk.anchor.row + 2) as f32 * t + 1.0,
            ),));
            let chair_key = match desk.chair_facing {
                Direction::Down => keys::CHAIR_DOWN,
                _ => keys::CHAIR_UP,
            };
            scene.add((Prop::new(chair_key, cell_origin(desk.chair), (desk.chair.row + 1) as f32 * t),));
        }
        for deco in &layout.decorations {
            scene.add((decoration_prop(deco, library),));
        }

        // Characters
        let dwell = config.dwell();
        let mut roster = Vec::new();
        for (seat, (member, desk)) in members.iter().zip(&layout.desks).enumerate() {
            let entity = scene.add(character_bundle(&member.name, seat, desk, dwell, rng));
            roster.push((member.name.clone(), entity));
        }
        if members.len() > layout.desks.len() {
            log::warn!(
                "{} member(s) without a desk were not seated",
                members.len() - layout.desks.len()
            );
        }

        let effects = scene.add((EffectsLayer::new(),));

        for &index in &layout.repaired_chairs {
            if let Some(desk) = layout.desks.get(index) {
                log::warn!(
                    "Chair at ({}, {}) had no route to the coffee station; opened its neighbours",
                    desk.chair.col,
                    desk.chair.row
                );
            }
        }
        log::info!(
            "Built office for {} member(s): {}x{} tiles, {} desks",
            roster.len(),
            layout.cols,
            layout.rows,
            layout.desks.len()
        );

        let office = Self {
            layout,
            roster,
            effects,
            cache,
        };

        // Initial statuses are set directly, without walking
        let world = scene.world_mut();
        for status in statuses {
            let Some(entity) = office.character(&status.agent) else {
                log::warn!("Status for unknown agent '{}'", status.agent);
                continue;
            };
            set_state(world, entity, CharacterState::from_status(&status.state), dwell, rng);
            office.record_details(world, entity, status);
        }
        office
    }

    /// Case-insensitive lookup of a member's character.
    pub fn character(&self, name: &str) -> Option<Entity> {
        self.roster
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, e)| e)
    }

    /// Seated members in desk order.
    pub fn roster(&self) -> impl Iterator<Item = (&str, Entity)> {
        self.roster.iter().map(|(n, e)| (n.as_str(), *e))
    }

    pub fn headcount(&self) -> usize {
        self.roster.len()
    }

    pub fn effects_entity(&self) -> Entity {
        self.effects
    }

    fn record_details(&self, world: &mut World, entity: Entity, status: &StatusEvent) {
        if let Ok(mut agent) = world.get::<&mut Agent>(entity) {
            if status.task.is_some() {
                agent.task = status.task.clone();
            }
            if status.last_msg.is_some() {
                agent.last_msg = status.last_msg.clone();
            }
        }
    }

    /// Apply a live status event. Coffee walks to the coffee machine; work
    /// states walk back to the seat first when the character is elsewhere.
    pub fn apply_status(
        &self,
        world: &mut World,
        status: &StatusEvent,
        config: &OfficeConfig,
        rng: &mut impl Rng,
    ) -> Transition {
        let Some(entity) = self.character(&status.agent) else {
            log::warn!("Status for unknown agent '{}'", status.agent);
            return Transition::Missing;
        };
        self.record_details(world, entity, status);

        let state = CharacterState::from_status(&status.state);
        let dwell = config.dwell();
        if is_walking(world, entity) {
            return set_state(world, entity, state, dwell, rng);
        }
        let Some((tile, seat)) = self.tile_and_seat(world, entity) else {
            return Transition::Missing;
        };

        let destination = match state {
            CharacterState::Coffee => Some(self.layout.coffee_station.approach()),
            CharacterState::Working | CharacterState::Reading | CharacterState::Sleeping => Some(seat),
            _ => None,
        };
        match destination {
            Some(target) if target != tile => {
                if walk_to(world, &self.layout.grid, entity, target, state) {
                    Transition::Walking
                } else {
                    set_state(world, entity, state, dwell, rng)
                }
            }
            _ => set_state(world, entity, state, dwell, rng),
        }
    }

    fn tile_and_seat(&self, world: &World, entity: Entity) -> Option<(Cell, Cell)> {
        let tile = world.get::<&Body>(entity).ok()?.tile;
        let seat = world.get::<&Agent>(entity).ok()?.seat;
        Some((tile, seat))
    }

    fn position(&self, world: &World, name: &str) -> Option<(Entity, Vec2)> {
        let entity = self.character(name)?;
        let pos = world.get::<&Body>(entity).ok()?.pos;
        Some((entity, pos))
    }

    /// Envelope from one member to another. Returns `false` when either is
    /// unknown.
    pub fn send_message(&self, world: &mut World, from: &str, to: &str, summary: &str) -> bool {
        let (Some((sender, from_pos)), Some((recipient, to_pos))) =
            (self.position(world, from), self.position(world, to))
        else {
            log::warn!("Message between unknown agents '{}' -> '{}'", from, to);
            return false;
        };
        if let Ok(mut agent) = world.get::<&mut Agent>(sender) {
            agent.last_msg = Some(summary.to_string());
        }
        let Ok(mut layer) = world.get::<&mut EffectsLayer>(self.effects) else {
            return false;
        };
        layer.send_envelope(sender, from_pos, recipient, to_pos);
        true
    }

    pub fn assign_task(&self, world: &mut World, name: &str, task: &str) -> bool {
        let Some((entity, pos)) = self.position(world, name) else {
            log::warn!("Task for unknown agent '{}'", name);
            return false;
        };
        if let Ok(mut agent) = world.get::<&mut Agent>(entity) {
            agent.task = Some(task.to_string());
        }
        let Ok(mut layer) = world.get::<&mut EffectsLayer>(self.effects) else {
            return false;
        };
        layer.spawn_bubble(entity, pos, Glyph::Task, DEFAULT_BUBBLE_SECONDS);
        true
    }

    /// One-shot celebration plus a star burst.
    pub fn celebrate(&self, world: &mut World, name: &str, rng: &mut impl Rng) -> bool {
        let Some((entity, pos)) = self.position(world, name) else {
            log::warn!("Completion for unknown agent '{}'", name);
            return false;
        };
        crate::systems::celebrate(world, entity);
        let Ok(mut layer) = world.get::<&mut EffectsLayer>(self.effects) else {
            return false;
        };
        layer.spawn_celebration(pos, rng);
        true
    }

    pub fn shutdown(&self, world: &mut World) {
        if let Ok(mut layer) = world.get::<&mut EffectsLayer>(self.effects) {
            layer.flash();
        }
    }

    /// Topmost visible character whose sprite box contains `(x, y)`.
    pub fn hit_test(&self, world: &World, x: f32, y: f32) -> Option<AgentCard> {
        let w = (CHARACTER_WIDTH * SCALE) as f32;
        let h = (CHARACTER_HEIGHT * SCALE) as f32;
        let mut best: Option<(f32, Entity)> = None;
        for &(_, entity) in &self.roster {
            let Ok(mut query) = world.query_one::<(&Body, &Behavior)>(entity) else {
                continue;
            };
            let Some((body, behavior)) = query.get() else {
                continue;
            };
            if behavior.state == CharacterState::Gone {
                continue;
            }
            let inside = x >= body.pos.x && x < body.pos.x + w && y >= body.pos.y && y < body.pos.y + h;
            if inside && best.map_or(true, |(d, _)| body.depth() >= d) {
                best = Some((body.depth(), entity));
            }
        }
        let (_, entity) = best?;
        card(world, entity)
    }
}

fn card(world: &World, entity: Entity) -> Option<AgentCard> {
    let agent = world.get::<&Agent>(entity).ok()?;
    let state = world.get::<&Behavior>(entity).ok()?.state;
    Some(AgentCard {
        name: agent.name.clone(),
        label: agent.label.clone(),
        state,
        status_line: format!("{} {}", state.status_emoji(), state.as_str()),
        task: agent.task.clone(),
        last_msg: agent.last_msg.clone(),
    })
}

/// Props sort by the row under their footprint.
fn decoration_prop(deco: &Decoration, library: &dyn SpriteLibrary) -> Prop {
    let t = GAME_TILE as f32;
    let key = deco.kind.sprite_key();
    let height = library
        .lookup(key)
        .map_or(deco.kind.footprint().1, |s| s.height_tiles() as i32);
    let pos = cell_origin(Cell::new(deco.col, deco.row));
    Prop::new(key, pos, (deco.row + height) as f32 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::placeholder_book;
    use agentoffice_logic::layout::generate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn members(n: usize) -> Vec<Member> {
        (0..n).map(|i| Member::new(format!("agent-{i}"))).collect()
    }

    fn build(n: usize, statuses: &[StatusEvent]) -> (Scene, Office, StdRng) {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(7);
        let book = placeholder_book();
        let office = Office::build(
            &mut scene,
            generate(n),
            &members(n),
            statuses,
            &book,
            &OfficeConfig::default(),
            &mut rng,
        );
        (scene, office, rng)
    }

    fn state(scene: &Scene, office: &Office, name: &str) -> CharacterState {
        let e = office.character(name).unwrap();
        scene.world().get::<&Behavior>(e).unwrap().state
    }

    #[test]
    fn test_build_spawns_everything() {
        let (scene, office, _) = build(3, &[]);
        // backdrop + 3×(desk, pc, chair) + decorations + 3 characters + effects
        let expected = 1 + 9 + office.layout.decorations.len() + 3 + 1;
        assert_eq!(scene.len(), expected);
        assert_eq!(office.headcount(), 3);
        assert!(scene.contains(office.effects_entity()));
    }

    #[test]
    fn test_extra_members_not_seated() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(1);
        let layout = generate(12);
        let office = Office::build(
            &mut scene,
            layout,
            &members(12),
            &[],
            &placeholder_book(),
            &OfficeConfig::default(),
            &mut rng,
        );
        assert_eq!(office.headcount(), 8);
        assert!(office.character("agent-9").is_none());
    }

    #[test]
    fn test_initial_statuses_applied() {
        let mut s = StatusEvent::new("AGENT-1", "typing");
        s.task = Some("refactor".into());
        let (scene, office, _) = build(3, &[s]);
        assert_eq!(state(&scene, &office, "agent-1"), CharacterState::Working);
        assert_eq!(state(&scene, &office, "agent-0"), CharacterState::Idle);
        let e = office.character("agent-1").unwrap();
        let agent = scene.world().get::<&Agent>(e).unwrap();
        assert_eq!(agent.task.as_deref(), Some("refactor"));
    }

    #[test]
    fn test_coffee_walks_to_machine() {
        let (mut scene, office, mut rng) = build(3, &[]);
        let t = office.apply_status(
            scene.world_mut(),
            &StatusEvent::new("agent-0", "coffee"),
            &OfficeConfig::default(),
            &mut rng,
        );
        assert_eq!(t, Transition::Walking);
        assert_eq!(state(&scene, &office, "agent-0"), CharacterState::Walking);

        for _ in 0..300 {
            crate::systems::movement_system(scene.world_mut(), 0.1, 0.3);
        }
        assert_eq!(state(&scene, &office, "agent-0"), CharacterState::Coffee);
        let e = office.character("agent-0").unwrap();
        assert_eq!(scene.world().get::<&Body>(e).unwrap().tile, office.layout.coffee_station.approach());

        // Back to work walks back to the seat
        let t = office.apply_status(
            scene.world_mut(),
            &StatusEvent::new("agent-0", "typing"),
            &OfficeConfig::default(),
            &mut rng,
        );
        assert_eq!(t, Transition::Walking);
        for _ in 0..300 {
            crate::systems::movement_system(scene.world_mut(), 0.1, 0.3);
        }
        assert_eq!(state(&scene, &office, "agent-0"), CharacterState::Working);
        assert_eq!(scene.world().get::<&Body>(e).unwrap().tile, office.layout.desks[0].chair);
    }

    #[test]
    fn test_status_at_seat_applies_directly() {
        let (mut scene, office, mut rng) = build(3, &[]);
        let t = office.apply_status(
            scene.world_mut(),
            &StatusEvent::new("agent-2", "sleeping"),
            &OfficeConfig::default(),
            &mut rng,
        );
        assert_eq!(t, Transition::Applied);
        assert_eq!(state(&scene, &office, "agent-2"), CharacterState::Sleeping);
    }

    #[test]
    fn test_unknown_agent_is_missing() {
        let (mut scene, office, mut rng) = build(3, &[]);
        let t = office.apply_status(
            scene.world_mut(),
            &StatusEvent::new("nobody", "typing"),
            &OfficeConfig::default(),
            &mut rng,
        );
        assert_eq!(t, Transition::Missing);
        assert!(!office.send_message(scene.world_mut(), "agent-0", "nobody", "hi"));
    }

    #[test]
    fn test_message_spawns_envelope_and_records_summary() {
        let (mut scene, office, _) = build(3, &[]);
        assert!(office.send_message(scene.world_mut(), "agent-0", "agent-2", "please review"));
        let layer = scene.world().get::<&EffectsLayer>(office.effects_entity()).unwrap();
        assert_eq!(layer.len(), 2);
        drop(layer);
        let e = office.character("agent-0").unwrap();
        let agent = scene.world().get::<&Agent>(e).unwrap();
        assert_eq!(agent.last_msg.as_deref(), Some("please review"));
    }

    #[test]
    fn test_celebrate_and_task() {
        let (mut scene, office, mut rng) = build(3, &[]);
        assert!(office.celebrate(scene.world_mut(), "agent-1", &mut rng));
        assert!(office.assign_task(scene.world_mut(), "agent-1", "write docs"));
        office.shutdown(scene.world_mut());
        assert_eq!(state(&scene, &office, "agent-1"), CharacterState::Celebrate);
        let layer = scene.world().get::<&EffectsLayer>(office.effects_entity()).unwrap();
        // 8 stars + task bubble + flash
        assert_eq!(layer.len(), 10);
    }

    #[test]
    fn test_hit_test_and_card() {
        let mut s = StatusEvent::new("agent-1", "typing");
        s.task = Some("ship it".into());
        let (mut scene, office, _) = build(3, &[s]);
        let e = office.character("agent-1").unwrap();
        let pos = scene.world().get::<&Body>(e).unwrap().pos;

        let card = office.hit_test(scene.world(), pos.x + 1.0, pos.y + 70.0).unwrap();
        assert_eq!(card.name, "agent-1");
        assert_eq!(card.label, "1");
        assert_eq!(card.status_line, "\u{1F4BB} working");
        assert_eq!(card.task.as_deref(), Some("ship it"));

        // The aisle tile to the right is empty
        assert!(office.hit_test(scene.world(), pos.x + 50.0, pos.y + 10.0).is_none());

        scene.world_mut().get::<&mut Behavior>(e).unwrap().state = CharacterState::Gone;
        assert!(office.hit_test(scene.world(), pos.x + 1.0, pos.y + 70.0).is_none());
    }
}
