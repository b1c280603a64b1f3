//! Transient visual effects.
//!
//! All effects live in one [`EffectsLayer`] component drawn on top of the
//! scene. Each effect runs for a fixed duration; position and opacity are
//! functions of `elapsed / duration`. Finished effects are pruned after the
//! whole list has been advanced.

use crate::components::Vec2;
use crate::systems::RenderCache;
use agentoffice_logic::animation::CharacterState;
use agentoffice_logic::constants::{CHARACTER_WIDTH, SCALE};
use agentoffice_logic::raster::Color;
use agentoffice_logic::sprites::{keys, SpriteLibrary, SpriteSource};
use agentoffice_logic::surface::{BlitOptions, Surface};
use hecs::Entity;
use rand::Rng;
use std::collections::HashMap;
use std::f32::consts::PI;

/// Horizontal offset from a character's left edge to its centre.
const CHARACTER_CENTER: f32 = (CHARACTER_WIDTH / 2 * SCALE) as f32;

// ── Timings ──

pub const ENVELOPE_SECONDS: f32 = 1.0;
pub const RECEIPT_BUBBLE_SECONDS: f32 = 1.5;
pub const SENDER_BUBBLE_SECONDS: f32 = 0.8;
pub const DEFAULT_BUBBLE_SECONDS: f32 = 2.0;
pub const SLEEP_GLYPH_SECONDS: f32 = 3.0;
/// Pause between one sleep glyph fading out and the next one starting.
pub const SLEEP_RESPAWN_SECONDS: f32 = 0.5;
pub const FLASH_SECONDS: f32 = 2.0;
/// Stars lose 1.5 "life" per second.
pub const STAR_SECONDS: f32 = 1.0 / 1.5;

const ENVELOPE_ARC: f32 = 60.0;
const BUBBLE_RISE: f32 = 20.0;
const STAR_COUNT: usize = 8;
const STAR_GRAVITY: f32 = 60.0;
const STAR_LIFT: f32 = 30.0;
const FLASH_COUNT: f32 = 3.0;
const FLASH_PEAK_ALPHA: f32 = 0.15;
/// Glyph sprites are drawn at this integer scale.
const GLYPH_SCALE: u32 = 2;

const STAR_COLORS: [Color; 4] = [
    Color::rgb(0xFF, 0xD7, 0x00),
    Color::rgb(0xFF, 0x6B, 0x6B),
    Color::rgb(0x4F, 0xC3, 0xF7),
    Color::rgb(0x81, 0xC7, 0x84),
];
const FLASH_COLOR: Color = Color::rgb(255, 50, 50);

/// Icon shown inside a bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    Envelope,
    Idea,
    Task,
    Sleep,
}

impl Glyph {
    pub fn sprite_key(self) -> &'static str {
        match self {
            Glyph::Envelope => keys::FX_ENVELOPE,
            Glyph::Idea => keys::FX_IDEA,
            Glyph::Task => keys::FX_TASK,
            Glyph::Sleep => keys::FX_SLEEP,
        }
    }
}

/// What a character looks like to the effects layer this step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub pos: Vec2,
    pub state: CharacterState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    /// Flies from sender to recipient, then pops an idea bubble on the
    /// recipient.
    Envelope {
        start: Vec2,
        end: Vec2,
        recipient: Entity,
    },
    /// Rises above its owner and fades out.
    Bubble {
        owner: Entity,
        glyph: Glyph,
        start_y: f32,
    },
    /// Celebration particle.
    Star { velocity: Vec2, color: Color },
    SleepGlyph { owner: Entity },
    /// Full-surface red flash.
    Flash,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec2,
    pub elapsed: f32,
    pub duration: f32,
    pub done: bool,
}

impl Effect {
    fn new(kind: EffectKind, pos: Vec2, duration: f32) -> Self {
        Self {
            kind,
            pos,
            elapsed: 0.0,
            duration,
            done: false,
        }
    }

    /// `from` and `to` are character positions.
    pub fn envelope(from: Vec2, to: Vec2, recipient: Entity) -> Self {
        let start = from + Vec2::new(CHARACTER_CENTER, 0.0);
        let end = to + Vec2::new(CHARACTER_CENTER, 0.0);
        Self::new(
            EffectKind::Envelope {
                start,
                end,
                recipient,
            },
            start,
            ENVELOPE_SECONDS,
        )
    }

    pub fn bubble(owner: Entity, owner_pos: Vec2, glyph: Glyph, duration: f32) -> Self {
        let start_y = owner_pos.y - 10.0;
        Self::new(
            EffectKind::Bubble {
                owner,
                glyph,
                start_y,
            },
            Vec2::new(owner_pos.x + CHARACTER_CENTER, start_y),
            duration,
        )
    }

    pub fn sleep_glyph(owner: Entity, owner_pos: Vec2) -> Self {
        Self::new(
            EffectKind::SleepGlyph { owner },
            sleep_glyph_pos(owner_pos, 0.0),
            SLEEP_GLYPH_SECONDS,
        )
    }

    /// A ring of stars bursting from `center`.
    pub fn stars(center: Vec2, rng: &mut impl Rng) -> Vec<Self> {
        (0..STAR_COUNT)
            .map(|i| {
                let angle = 2.0 * PI / STAR_COUNT as f32 * i as f32;
                let speed = rng.gen_range(40.0..70.0);
                let velocity = Vec2::new(angle.cos() * speed, angle.sin() * speed - STAR_LIFT);
                Self::new(
                    EffectKind::Star {
                        velocity,
                        color: STAR_COLORS[i % STAR_COLORS.len()],
                    },
                    center,
                    STAR_SECONDS,
                )
            })
            .collect()
    }

    pub fn flash() -> Self {
        Self::new(EffectKind::Flash, Vec2::ZERO, FLASH_SECONDS)
    }

    /// 0..1, clamped.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }

    pub fn alpha(&self) -> f32 {
        let p = self.progress();
        match self.kind {
            EffectKind::Envelope { .. } => 1.0,
            EffectKind::Bubble { .. } => 1.0 - ((p - 0.7) / 0.3).max(0.0),
            EffectKind::Star { .. } => (1.0 - p).max(0.0),
            EffectKind::SleepGlyph { .. } => 1.0 - ((p - 0.6) / 0.4).max(0.0),
            EffectKind::Flash if p < 1.0 => {
                (p * PI * 2.0 * FLASH_COUNT).sin().max(0.0) * FLASH_PEAK_ALPHA
            }
            EffectKind::Flash => 0.0,
        }
    }

    /// Advance by `dt`. Returns a follow-up effect when this one finishes
    /// and chains into another.
    pub fn advance(&mut self, dt: f32, anchors: &HashMap<Entity, Anchor>) -> Option<Effect> {
        if self.done {
            return None;
        }
        self.elapsed += dt;

        if let EffectKind::Star { velocity, .. } = &mut self.kind {
            self.pos = self.pos + *velocity * dt;
            velocity.y += STAR_GRAVITY * dt;
        }

        let p = self.progress();
        if p >= 1.0 {
            self.done = true;
            return match self.kind {
                EffectKind::Envelope { recipient, .. } => anchors
                    .get(&recipient)
                    .map(|a| Effect::bubble(recipient, a.pos, Glyph::Idea, RECEIPT_BUBBLE_SECONDS)),
                _ => None,
            };
        }

        match self.kind {
            EffectKind::Envelope { start, end, .. } => {
                let mut pos = start.lerp(end, p);
                pos.y -= (p * PI).sin() * ENVELOPE_ARC;
                self.pos = pos;
            }
            EffectKind::Bubble { owner, start_y, .. } => {
                self.pos.y = start_y - p * BUBBLE_RISE;
                if let Some(a) = anchors.get(&owner) {
                    self.pos.x = a.pos.x + CHARACTER_CENTER;
                }
            }
            EffectKind::SleepGlyph { owner } => {
                if let Some(a) = anchors.get(&owner) {
                    self.pos = sleep_glyph_pos(a.pos, p);
                }
            }
            EffectKind::Star { .. } | EffectKind::Flash => {}
        }
        None
    }

    fn draw(&self, surface: &mut Surface, library: &dyn SpriteLibrary, cache: &mut RenderCache) {
        let alpha = self.alpha();
        match &self.kind {
            EffectKind::Envelope { .. } => {
                draw_glyph(surface, library, cache, Glyph::Envelope, self.pos, alpha);
            }
            EffectKind::Bubble { glyph, .. } => {
                draw_glyph(surface, library, cache, *glyph, self.pos, alpha);
            }
            EffectKind::SleepGlyph { .. } => {
                draw_glyph(surface, library, cache, Glyph::Sleep, self.pos, alpha);
            }
            EffectKind::Star { color, .. } => {
                let size = 3.0 * (1.0 - self.progress());
                let a = (alpha * f32::from(color.a)).round() as u8;
                surface.fill_rect(
                    self.pos.x - size / 2.0,
                    self.pos.y - size / 2.0,
                    size,
                    size,
                    color.with_alpha(a),
                );
            }
            EffectKind::Flash => {
                if alpha > 0.0 {
                    let a = (alpha * 255.0).round() as u8;
                    surface.fill_rect(
                        0.0,
                        0.0,
                        surface.width() as f32,
                        surface.height() as f32,
                        FLASH_COLOR.with_alpha(a),
                    );
                }
            }
        }
    }
}

fn sleep_glyph_pos(owner_pos: Vec2, progress: f32) -> Vec2 {
    Vec2::new(
        owner_pos.x + (12 * SCALE) as f32 + progress * 15.0,
        owner_pos.y - 5.0 - progress * 30.0,
    )
}

/// Draw a glyph sprite centred horizontally on `pos` with its bottom edge
/// on `pos.y`.
fn draw_glyph(
    surface: &mut Surface,
    library: &dyn SpriteLibrary,
    cache: &mut RenderCache,
    glyph: Glyph,
    pos: Vec2,
    alpha: f32,
) {
    let key = glyph.sprite_key();
    let Some(source) = library.lookup(key) else {
        cache.note_missing(key);
        return;
    };
    let (w, h) = match source {
        SpriteSource::Grid(g) => (g.width as u32 * GLYPH_SCALE, g.height as u32 * GLYPH_SCALE),
        SpriteSource::Sheet(r) => (r.dw, r.dh),
    };
    let x = (pos.x - w as f32 / 2.0).round() as i32;
    let y = (pos.y - h as f32).round() as i32;
    let opts = BlitOptions {
        scale: GLYPH_SCALE,
        ..Default::default()
    }
    .with_opacity(alpha);
    if !surface.blit_source(library.sheet(), source, x, y, opts) {
        cache.note_missing(key);
    }
}

/// Recurring sleep-glyph task for one sleeping character.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SleepLoop {
    owner: Entity,
    cooldown: f32,
}

/// The effect list plus the sleep-glyph loops. One per office.
#[derive(Debug, Default)]
pub struct EffectsLayer {
    effects: Vec<Effect>,
    sleep_loops: Vec<SleepLoop>,
}

impl EffectsLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
        self.sleep_loops.clear();
    }

    /// Envelope from sender to recipient, plus an envelope bubble over the
    /// sender.
    pub fn send_envelope(&mut self, sender: Entity, sender_pos: Vec2, recipient: Entity, recipient_pos: Vec2) {
        self.push(Effect::envelope(sender_pos, recipient_pos, recipient));
        self.push(Effect::bubble(sender, sender_pos, Glyph::Envelope, SENDER_BUBBLE_SECONDS));
    }

    pub fn spawn_bubble(&mut self, owner: Entity, owner_pos: Vec2, glyph: Glyph, duration: f32) {
        self.push(Effect::bubble(owner, owner_pos, glyph, duration));
    }

    /// Star burst centred on a character's head.
    pub fn spawn_celebration(&mut self, owner_pos: Vec2, rng: &mut impl Rng) {
        let center = owner_pos + Vec2::new(CHARACTER_CENTER, 0.0);
        self.effects.extend(Effect::stars(center, rng));
    }

    pub fn flash(&mut self) {
        self.push(Effect::flash());
    }

    /// Whether a sleep loop is currently running for `owner`.
    pub fn is_sleep_looping(&self, owner: Entity) -> bool {
        self.sleep_loops.iter().any(|l| l.owner == owner)
    }

    fn has_sleep_glyph(&self, owner: Entity) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e.kind, EffectKind::SleepGlyph { owner: o } if o == owner))
    }

    pub fn update(&mut self, dt: f32, anchors: &HashMap<Entity, Anchor>) {
        let mut spawned = Vec::new();
        for effect in &mut self.effects {
            if let Some(next) = effect.advance(dt, anchors) {
                spawned.push(next);
            }
        }
        self.effects.retain(|e| !e.done);
        self.effects.extend(spawned);

        // Sleep loops: start for new sleepers, cancel for anyone who woke
        // up or left the office.
        self.sleep_loops.retain(|l| {
            anchors
                .get(&l.owner)
                .is_some_and(|a| a.state == CharacterState::Sleeping)
        });
        for (&entity, anchor) in anchors {
            if anchor.state == CharacterState::Sleeping && !self.is_sleep_looping(entity) {
                self.sleep_loops.push(SleepLoop {
                    owner: entity,
                    cooldown: 0.0,
                });
            }
        }

        for i in 0..self.sleep_loops.len() {
            let owner = self.sleep_loops[i].owner;
            if self.has_sleep_glyph(owner) {
                continue;
            }
            self.sleep_loops[i].cooldown -= dt;
            if self.sleep_loops[i].cooldown <= 0.0 {
                self.sleep_loops[i].cooldown = SLEEP_RESPAWN_SECONDS;
                if let Some(a) = anchors.get(&owner) {
                    self.effects.push(Effect::sleep_glyph(owner, a.pos));
                }
            }
        }
    }

    pub fn draw(&self, surface: &mut Surface, library: &dyn SpriteLibrary, cache: &mut RenderCache) {
        for effect in &self.effects {
            effect.draw(surface, library, cache);
        }
    }
}
