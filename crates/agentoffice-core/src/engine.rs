//! Scheduler - fixed-step update/draw loop over the office scene

use crate::config::OfficeConfig;
use crate::events::{coalesce, Member, OfficeEvent, StatusEvent};
use crate::office::{AgentCard, Office};
use crate::scene::Scene;
use crate::systems::*;
use agentoffice_logic::layout::{clamp_headcount, generate};
use agentoffice_logic::sprites::SpriteLibrary;
use agentoffice_logic::surface::Surface;
use crossbeam_channel::{unbounded, Receiver, Sender};
use hecs::{DynamicBundle, Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Drives the office: owns the scene, the drawing surface, the sprite
/// library and the current [`Office`].
///
/// The host calls [`Scheduler::frame`] from its per-frame callback with a
/// millisecond timestamp. Elapsed time is accumulated and consumed in fixed
/// steps of `1 / fps` seconds; the scene is drawn once per callback that
/// advanced at least one step.
pub struct Scheduler {
    scene: Scene,
    surface: Option<Surface>,
    library: Box<dyn SpriteLibrary>,
    config: OfficeConfig,
    rng: StdRng,
    office: Option<Office>,
    /// Drawing cache used when no office is loaded.
    scratch_cache: RenderCache,
    running: bool,
    last_timestamp: Option<f64>,
    accumulator_ms: f64,
    steps: u64,
    events_tx: Sender<OfficeEvent>,
    events_rx: Receiver<OfficeEvent>,
}

impl Scheduler {
    pub fn new(config: OfficeConfig, library: impl SpriteLibrary + 'static) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (events_tx, events_rx) = unbounded();
        Self {
            scene: Scene::new(),
            surface: None,
            library: Box::new(library),
            config,
            rng,
            office: None,
            scratch_cache: RenderCache::default(),
            running: false,
            last_timestamp: None,
            accumulator_ms: 0.0,
            steps: 0,
            events_tx,
            events_rx,
        }
    }

    // ── Lifecycle ──

    /// Attach a surface and start accepting frames. The first frame after
    /// starting only records its timestamp.
    pub fn start(&mut self, surface: Surface) {
        self.surface = Some(surface);
        self.running = true;
        self.last_timestamp = None;
        self.accumulator_ms = 0.0;
    }

    /// Halt updates and drawing. The scene is kept, so `start` resumes it.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop and discard everything: scene, office and surface.
    pub fn teardown(&mut self) {
        self.stop();
        self.scene.clear();
        self.office = None;
        self.surface = None;
    }

    /// Resize the surface to a container size and device pixel ratio.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height, device_pixel_ratio);
        }
    }

    // ── Entity set ──

    pub fn add_entity(&mut self, bundle: impl DynamicBundle) -> Entity {
        self.scene.add(bundle)
    }

    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        self.scene.remove(entity)
    }

    /// Remove every entity. The office goes with them.
    pub fn clear_entities(&mut self) {
        self.scene.clear();
        self.office = None;
    }

    // ── Frame loop ──

    /// Host frame callback. Returns the number of fixed steps run.
    pub fn frame(&mut self, timestamp_ms: f64) -> usize {
        if !self.running {
            return 0;
        }
        self.pump_events();

        let Some(last) = self.last_timestamp.replace(timestamp_ms) else {
            return 0;
        };
        self.accumulator_ms += (timestamp_ms - last).max(0.0);

        let step_ms = 1000.0 / f64::from(self.config.fps.max(1));
        let step_seconds = self.config.step_seconds();
        let mut steps = 0;
        while self.accumulator_ms >= step_ms && steps < self.config.max_catch_up_steps as usize {
            self.accumulator_ms -= step_ms;
            self.update(step_seconds);
            steps += 1;
        }

        // Too far behind: drop whole steps, keep the remainder
        if self.accumulator_ms >= step_ms {
            let dropped = (self.accumulator_ms / step_ms).floor();
            self.accumulator_ms -= dropped * step_ms;
            log::debug!("Dropped {} step(s) ({:.1} ms) of catch-up time", dropped, dropped * step_ms);
        }

        if steps > 0 {
            self.render();
        }
        steps
    }

    /// Run one fixed step and draw, regardless of wall-clock time.
    pub fn step(&mut self) {
        self.pump_events();
        self.update(self.config.step_seconds());
        self.render();
    }

    /// Run `seconds` worth of fixed steps, drawing once at the end.
    pub fn advance(&mut self, seconds: f32) -> usize {
        self.pump_events();
        let dt = self.config.step_seconds();
        let steps = (seconds / dt).round() as usize;
        for _ in 0..steps {
            self.update(dt);
        }
        self.render();
        steps
    }

    /// Advance every system by `delta_seconds`.
    pub fn update(&mut self, delta_seconds: f32) {
        let dwell = self.config.dwell();
        let world = self.scene.world_mut();
        animation_system(world, delta_seconds);
        movement_system(world, delta_seconds, self.config.seconds_per_tile);
        idle_system(world, delta_seconds, dwell, &mut self.rng);
        effects_system(world, delta_seconds);
        self.steps += 1;
    }

    /// Draw the scene onto the surface, if one is attached.
    pub fn render(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let cache = match self.office.as_mut() {
            Some(office) => &mut office.cache,
            None => &mut self.scratch_cache,
        };
        render_system(self.scene.world(), surface, self.library.as_ref(), cache);
    }

    // ── Office ──

    /// Rebuild the office for a new roster. The old scene is discarded.
    pub fn load_roster(&mut self, members: &[Member], statuses: &[StatusEvent]) {
        self.scene.clear();
        self.office = None;
        let layout = generate(clamp_headcount(members.len()));
        let office = Office::build(
            &mut self.scene,
            layout,
            members,
            statuses,
            self.library.as_ref(),
            &self.config,
            &mut self.rng,
        );
        self.office = Some(office);
    }

    // ── Events ──

    /// A sender for queueing events from any thread.
    pub fn event_sender(&self) -> Sender<OfficeEvent> {
        self.events_tx.clone()
    }

    pub fn enqueue(&self, event: OfficeEvent) {
        // The receiver lives in `self`, so this cannot disconnect
        let _ = self.events_tx.send(event);
    }

    /// Apply every queued event. A burst of roster events rebuilds once.
    pub fn pump_events(&mut self) -> usize {
        let events = coalesce(self.events_rx.try_iter().collect());
        let count = events.len();
        for event in events {
            self.dispatch(event);
        }
        count
    }

    /// Apply one event immediately.
    pub fn dispatch(&mut self, event: OfficeEvent) {
        if let OfficeEvent::Roster { members, statuses } = event {
            self.load_roster(&members, &statuses);
            return;
        }
        let Some(office) = self.office.as_ref() else {
            log::debug!("No office loaded, ignoring {:?}", event);
            return;
        };
        let world = self.scene.world_mut();
        match event {
            OfficeEvent::Roster { .. } => {}
            OfficeEvent::Status(status) => {
                office.apply_status(world, &status, &self.config, &mut self.rng);
            }
            OfficeEvent::Message {
                from_agent,
                to_agent,
                summary,
            } => {
                office.send_message(world, &from_agent, &to_agent, &summary);
            }
            OfficeEvent::TaskAssigned { agent, task } => {
                office.assign_task(world, &agent, &task);
            }
            OfficeEvent::Completed { agent } => {
                office.celebrate(world, &agent, &mut self.rng);
            }
            OfficeEvent::Shutdown => office.shutdown(world),
        }
    }

    /// Info card for the character under a surface position.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<AgentCard> {
        self.office.as_ref()?.hit_test(self.scene.world(), x, y)
    }

    // ── Accessors ──

    pub fn office(&self) -> Option<&Office> {
        self.office.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn world(&self) -> &World {
        self.scene.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.scene.world_mut()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn config(&self) -> &OfficeConfig {
        &self.config
    }

    /// Total fixed steps run so far.
    pub fn step_count(&self) -> u64 {
        self.steps
    }
}
