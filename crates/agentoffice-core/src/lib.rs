//! AgentOffice Core - Pixel-Art Office Simulation Engine
//!
//! An ECS-based simulation of a small office in which one animated character
//! represents each member of a monitored agent team. External status events
//! drive what each character does; transient effects visualize messages,
//! task assignments, completions and shutdowns.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: the backdrop, furniture props, characters, the effects layer
//! - **Components**: Pure data attached to entities (Body, Behavior, Walk, Prop, etc.)
//! - **Systems**: Logic that queries and updates components each fixed step
//!
//! The [`engine::Scheduler`] owns the scene and the drawing surface and runs
//! the systems at a fixed rate; the [`office::Office`] is the per-roster
//! simulation context, rebuilt whenever the team changes.
//!
//! # Example
//!
//! ```rust,no_run
//! use agentoffice_core::prelude::*;
//! use agentoffice_core::placeholder::placeholder_book;
//! use agentoffice_logic::surface::Surface;
//!
//! let mut scheduler = Scheduler::new(OfficeConfig::default(), placeholder_book());
//! scheduler.start(Surface::new(672, 768));
//! scheduler.enqueue(OfficeEvent::Roster {
//!     members: vec![Member::new("agent-planner"), Member::new("agent-coder")],
//!     statuses: Vec::new(),
//! });
//!
//! let mut now = 0.0;
//! loop {
//!     scheduler.frame(now);
//!     now += 1000.0 / 60.0; // 60 Hz host
//! }
//! ```

pub mod components;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod events;
pub mod office;
pub mod placeholder;
pub mod scene;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::OfficeConfig;
    pub use crate::engine::Scheduler;
    pub use crate::error::OfficeError;
    pub use crate::events::{Member, OfficeEvent, StatusEvent};
    pub use crate::office::{AgentCard, Office};
}
