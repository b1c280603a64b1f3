//! Systems that run every scheduler step, plus the character controller.

mod animation;
mod character;
mod effects;
mod idle;
mod movement;
mod render;

pub use animation::*;
pub use character::*;
pub use effects::*;
pub use idle::*;
pub use movement::*;
pub use render::*;
