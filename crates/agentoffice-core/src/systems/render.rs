//! Render system - depth-sorted drawing of the scene onto a surface

use crate::components::{Agent, Backdrop, Behavior, Body, Prop, SpawnOrder};
use crate::config::OfficeConfig;
use crate::effects::EffectsLayer;
use agentoffice_logic::animation::{sprite_key, CharacterState};
use agentoffice_logic::constants::{depth, room, GAME_TILE, SCALE};
use agentoffice_logic::palette::PaletteTable;
use agentoffice_logic::pathfinding::Direction;
use agentoffice_logic::raster::{colorize, PixelGrid};
use agentoffice_logic::sprites::{keys, SpriteLibrary, SpriteSource};
use agentoffice_logic::surface::{BlitOptions, Surface};
use hecs::{Entity, World};
use std::collections::{HashMap, HashSet};

/// A character frame recolored for one seat, with its display size.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSprite {
    pub grid: PixelGrid,
    pub dw: u32,
    pub dh: u32,
}

/// Per-office drawing cache: tinted floor and wall tiles, recolored
/// character frames and the set of sprite keys already reported missing.
#[derive(Debug, Default)]
pub struct RenderCache {
    floor: Option<PixelGrid>,
    wall: Option<PixelGrid>,
    frames: HashMap<(usize, String), CachedSprite>,
    missing: HashSet<String>,
    palettes: PaletteTable,
}

impl RenderCache {
    /// Tint the library's floor and wall tiles for the team.
    pub fn build(library: &dyn SpriteLibrary, config: &OfficeConfig) -> Self {
        let mut cache = Self::default();
        cache.floor = library
            .lookup_grid(keys::FLOOR_TILE)
            .map(|g| colorize(&g, config.floor_tint()));
        cache.wall = library
            .lookup_grid(keys::WALL_TILE)
            .map(|g| colorize(&g, config.wall_tint()));
        if cache.floor.is_none() {
            cache.note_missing(keys::FLOOR_TILE);
        }
        if cache.wall.is_none() {
            cache.note_missing(keys::WALL_TILE);
        }
        cache
    }

    pub fn floor(&self) -> Option<&PixelGrid> {
        self.floor.as_ref()
    }

    pub fn wall(&self) -> Option<&PixelGrid> {
        self.wall.as_ref()
    }

    /// Record a missing sprite key. Each key is logged once per cache.
    pub fn note_missing(&mut self, key: &str) {
        if self.missing.insert(key.to_string()) {
            log::debug!("Sprite '{}' not found, skipping", key);
        }
    }

    pub fn missing_keys(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().map(String::as_str)
    }

    /// The frame `key` recolored for `palette_index`, built on first use.
    pub fn character_frame(
        &mut self,
        library: &dyn SpriteLibrary,
        palette_index: usize,
        key: &str,
    ) -> Option<&CachedSprite> {
        let cache_key = (palette_index, key.to_string());
        if !self.frames.contains_key(&cache_key) {
            let Some(source) = library.lookup(key) else {
                self.note_missing(key);
                return None;
            };
            let Some(grid) = source.to_grid(library.sheet()) else {
                self.note_missing(key);
                return None;
            };
            let (dw, dh) = match source {
                SpriteSource::Sheet(r) => (r.dw, r.dh),
                SpriteSource::Grid(g) => (g.width as u32 * SCALE, g.height as u32 * SCALE),
            };
            let grid = self.palettes.recolor_for_seat(&grid, palette_index);
            self.frames.insert(cache_key.clone(), CachedSprite { grid, dw, dh });
        }
        self.frames.get(&cache_key)
    }
}

/// Indices of `depths` in drawing order: ascending depth, ties kept in input
/// order.
pub fn draw_order(depths: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..depths.len()).collect();
    order.sort_by(|&a, &b| depths[a].total_cmp(&depths[b]));
    order
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawKind {
    Backdrop,
    Prop,
    Character,
    Effects,
}

struct DrawItem {
    order: u64,
    depth: f32,
    entity: Entity,
    kind: DrawKind,
}

/// Clear the surface and draw every drawable entity in ascending depth.
/// Entities whose sprite cannot be resolved are skipped.
pub fn render_system(world: &World, surface: &mut Surface, library: &dyn SpriteLibrary, cache: &mut RenderCache) {
    surface.clear();

    let order_of = |o: Option<&SpawnOrder>| o.map_or(u64::MAX, |o| o.0);
    let mut items = Vec::new();

    for (entity, (_, order)) in world.query::<(&Backdrop, Option<&SpawnOrder>)>().iter() {
        items.push(DrawItem {
            order: order_of(order),
            depth: depth::FLOOR,
            entity,
            kind: DrawKind::Backdrop,
        });
    }
    for (entity, (prop, order)) in world.query::<(&Prop, Option<&SpawnOrder>)>().iter() {
        items.push(DrawItem {
            order: order_of(order),
            depth: prop.depth,
            entity,
            kind: DrawKind::Prop,
        });
    }
    for (entity, (_, body, _, order)) in world
        .query::<(&Agent, &Body, &Behavior, Option<&SpawnOrder>)>()
        .iter()
    {
        items.push(DrawItem {
            order: order_of(order),
            depth: body.depth(),
            entity,
            kind: DrawKind::Character,
        });
    }
    for (entity, (_, order)) in world.query::<(&EffectsLayer, Option<&SpawnOrder>)>().iter() {
        items.push(DrawItem {
            order: order_of(order),
            depth: depth::EFFECTS,
            entity,
            kind: DrawKind::Effects,
        });
    }

    // Entity-set order first, so equal depths draw in insertion order
    items.sort_by_key(|i| i.order);
    let depths: Vec<f32> = items.iter().map(|i| i.depth).collect();

    for index in draw_order(&depths) {
        let item = &items[index];
        match item.kind {
            DrawKind::Backdrop => {
                if let Ok(backdrop) = world.get::<&Backdrop>(item.entity) {
                    draw_backdrop(surface, &backdrop, cache);
                }
            }
            DrawKind::Prop => {
                if let Ok(prop) = world.get::<&Prop>(item.entity) {
                    draw_prop(surface, &prop, library, cache);
                }
            }
            DrawKind::Character => draw_character(world, item.entity, surface, library, cache),
            DrawKind::Effects => {
                if let Ok(layer) = world.get::<&EffectsLayer>(item.entity) {
                    layer.draw(surface, library, cache);
                }
            }
        }
    }
}

fn draw_backdrop(surface: &mut Surface, backdrop: &Backdrop, cache: &RenderCache) {
    let t = GAME_TILE;
    for row in 0..backdrop.rows {
        let tile = if row < room::WALL_ROWS { cache.wall() } else { cache.floor() };
        let Some(tile) = tile else {
            continue;
        };
        for col in 0..backdrop.cols {
            let (x, y) = ((col as u32 * t) as i32, (row as u32 * t) as i32);
            surface.blit_sized(tile, x, y, t, t, BlitOptions::default());
        }
    }
}

fn draw_prop(surface: &mut Surface, prop: &Prop, library: &dyn SpriteLibrary, cache: &mut RenderCache) {
    let Some(source) = library.lookup(&prop.key) else {
        cache.note_missing(&prop.key);
        return;
    };
    let (x, y) = (prop.pos.x.round() as i32, prop.pos.y.round() as i32);
    let opts = BlitOptions::default().flipped(prop.flip);
    if !surface.blit_source(library.sheet(), source, x, y, opts) {
        cache.note_missing(&prop.key);
    }
}

fn draw_character(
    world: &World,
    entity: Entity,
    surface: &mut Surface,
    library: &dyn SpriteLibrary,
    cache: &mut RenderCache,
) {
    let Ok(mut query) = world.query_one::<(&Agent, &Body, &Behavior)>(entity) else {
        return;
    };
    let Some((agent, body, behavior)) = query.get() else {
        return;
    };
    if behavior.state == CharacterState::Gone {
        return;
    }
    let animation = behavior.state.animation();
    // Idle always shows the standing pose
    let suffix = if behavior.state == CharacterState::Idle {
        "stand"
    } else {
        animation.suffix(behavior.frame)
    };
    let key = sprite_key(body.facing, animation, suffix);
    let Some(sprite) = cache.character_frame(library, agent.palette_index, &key) else {
        return;
    };
    let opts = BlitOptions::default().flipped(body.facing == Direction::Left);
    let (x, y) = (body.pos.x.round() as i32, body.pos.y.round() as i32);
    surface.blit_sized(&sprite.grid, x, y, sprite.dw, sprite.dh, opts);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vec2;
    use crate::placeholder::{placeholder_book, placeholder_color};
    use crate::scene::Scene;
    use agentoffice_logic::pathfinding::Cell;
    use agentoffice_logic::raster::Color;
    use agentoffice_logic::sprites::SpriteBook;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn block_book() -> SpriteBook {
        let mut book = SpriteBook::new();
        book.insert_grid("red", PixelGrid::filled(2, 2, RED));
        book.insert_grid("blue", PixelGrid::filled(2, 2, BLUE));
        book
    }

    #[test]
    fn test_draw_order_is_stable() {
        assert_eq!(draw_order(&[40.0, 10.0, 40.0, 25.0]), vec![1, 3, 0, 2]);
        assert!(draw_order(&[]).is_empty());
    }

    #[test]
    fn test_deeper_prop_draws_on_top() {
        let mut scene = Scene::new();
        // Added in reverse depth order
        scene.add((Prop::new("blue", Vec2::ZERO, 20.0),));
        scene.add((Prop::new("red", Vec2::ZERO, 10.0),));
        let mut surface = Surface::new(12, 12);
        let mut cache = RenderCache::default();
        render_system(scene.world(), &mut surface, &block_book(), &mut cache);
        assert_eq!(surface.pixel(0, 0), Some(BLUE));
    }

    #[test]
    fn test_equal_depth_keeps_insertion_order() {
        let mut scene = Scene::new();
        scene.add((Prop::new("red", Vec2::ZERO, 10.0),));
        scene.add((Prop::new("blue", Vec2::ZERO, 10.0),));
        let mut surface = Surface::new(12, 12);
        let mut cache = RenderCache::default();
        render_system(scene.world(), &mut surface, &block_book(), &mut cache);
        assert_eq!(surface.pixel(0, 0), Some(BLUE));
    }

    #[test]
    fn test_missing_sprite_is_skipped() {
        let mut scene = Scene::new();
        scene.add((Prop::new("red", Vec2::ZERO, 10.0),));
        scene.add((Prop::new("nope", Vec2::ZERO, 20.0),));
        let mut surface = Surface::new(12, 12);
        let mut cache = RenderCache::default();
        render_system(scene.world(), &mut surface, &block_book(), &mut cache);
        render_system(scene.world(), &mut surface, &block_book(), &mut cache);
        assert_eq!(surface.pixel(0, 0), Some(RED));
        assert_eq!(cache.missing_keys().collect::<Vec<_>>(), vec!["nope"]);
    }

    #[test]
    fn test_render_clears_previous_frame() {
        let mut scene = Scene::new();
        let e = scene.add((Prop::new("red", Vec2::ZERO, 10.0),));
        let mut surface = Surface::new(12, 12);
        let mut cache = RenderCache::default();
        render_system(scene.world(), &mut surface, &block_book(), &mut cache);
        scene.remove(e);
        render_system(scene.world(), &mut surface, &block_book(), &mut cache);
        assert_eq!(surface.pixel(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_gone_character_not_drawn() {
        let book = placeholder_book();
        let mut scene = Scene::new();
        let agent = Agent::new("agent-a", 0, Cell::new(0, 0), Cell::new(0, 0));
        let e = scene.add((agent, Body::at(Cell::new(0, 0)), Behavior::new(CharacterState::Idle, 30.0)));
        let mut surface = Surface::new(48, 72);
        let mut cache = RenderCache::default();

        render_system(scene.world(), &mut surface, &book, &mut cache);
        let drawn = surface.pixels().iter().filter(|c| c.a > 0).count();
        assert!(drawn > 0);

        scene.world_mut().get::<&mut Behavior>(e).unwrap().state = CharacterState::Gone;
        render_system(scene.world(), &mut surface, &book, &mut cache);
        assert!(surface.pixels().iter().all(|c| c.a == 0));
    }

    #[test]
    fn test_left_facing_mirrors_right_frame() {
        let book = placeholder_book();
        let draw = |facing: Direction| {
            let mut scene = Scene::new();
            let agent = Agent::new("agent-a", 0, Cell::new(0, 0), Cell::new(0, 0));
            let mut body = Body::at(Cell::new(0, 0));
            body.facing = facing;
            scene.add((agent, body, Behavior::new(CharacterState::Idle, 30.0)));
            let mut surface = Surface::new(48, 72);
            let mut cache = RenderCache::default();
            render_system(scene.world(), &mut surface, &book, &mut cache);
            surface
        };
        let right = draw(Direction::Right);
        let left = draw(Direction::Left);
        for y in 0..72 {
            for x in 0..48 {
                assert_eq!(right.pixel(x, y), left.pixel(47 - x, y), "({x},{y})");
            }
        }
    }

    #[test]
    fn test_backdrop_uses_tinted_tiles() {
        let book = placeholder_book();
        let config = OfficeConfig::default();
        let cache_floor = colorize(&PixelGrid::filled(16, 16, placeholder_color(keys::FLOOR_TILE)), config.floor_tint());
        let mut scene = Scene::new();
        scene.add((Backdrop { cols: 2, rows: 3 },));
        let mut surface = Surface::new(96, 144);
        let mut cache = RenderCache::build(&book, &config);
        render_system(scene.world(), &mut surface, &book, &mut cache);
        assert_eq!(surface.pixel(10, 100), cache_floor.get(0, 0));
        assert_ne!(surface.pixel(10, 10), surface.pixel(10, 100));
    }

    #[test]
    fn test_frames_recolored_per_seat() {
        let book = placeholder_book();
        let mut cache = RenderCache::default();
        let key = "down/walk_stand";
        let seat0 = cache.character_frame(&book, 0, key).unwrap().clone();
        let seat1 = cache.character_frame(&book, 1, key).unwrap().clone();
        assert_ne!(seat0.grid, seat1.grid);
        assert_eq!((seat0.dw, seat0.dh), (48, 72));
    }
}
