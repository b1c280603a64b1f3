//! Character components: identity, body, behavior and walking.

use super::common::{cell_origin, Vec2};
use agentoffice_logic::animation::CharacterState;
use agentoffice_logic::constants::{CHARACTER_HEIGHT, SCALE};
use agentoffice_logic::pathfinding::{Cell, Direction};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One team member seated in the office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Member name as supplied by the roster.
    pub name: String,
    /// Short display label.
    pub label: String,
    /// Outfit palette index (the seat index).
    pub palette_index: usize,
    /// Chair tile; the character's home.
    pub seat: Cell,
    /// Desk anchor tile.
    pub desk: Cell,
    pub task: Option<String>,
    pub last_msg: Option<String>,
}

impl Agent {
    pub fn new(name: impl Into<String>, palette_index: usize, seat: Cell, desk: Cell) -> Self {
        let name = name.into();
        Self {
            label: agentoffice_logic::animation::persona_label(&name),
            name,
            palette_index,
            seat,
            desk,
            task: None,
            last_msg: None,
        }
    }
}

/// Tile, interpolated pixel position and facing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// The last tile the character fully reached.
    pub tile: Cell,
    pub pos: Vec2,
    pub facing: Direction,
}

impl Body {
    pub fn at(tile: Cell) -> Self {
        Self {
            tile,
            pos: cell_origin(tile),
            facing: Direction::Down,
        }
    }

    /// Depth key: the pixel row of the sprite's feet.
    pub fn depth(&self) -> f32 {
        self.pos.y + (CHARACTER_HEIGHT * SCALE) as f32
    }
}

/// Animation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub state: CharacterState,
    /// State to return to after a one-shot animation.
    pub previous: Option<CharacterState>,
    pub frame: usize,
    pub frame_timer: f32,
    /// Seconds left before an idle or sleeping character fidgets.
    pub dwell: f32,
    /// Set on every state change; the idle system resamples `dwell`.
    #[serde(default)]
    pub dwell_stale: bool,
}

impl Behavior {
    pub fn new(state: CharacterState, dwell: f32) -> Self {
        Self {
            state,
            previous: None,
            frame: 0,
            frame_timer: 0.0,
            dwell,
            dwell_stale: false,
        }
    }

    /// Switch state and restart the animation. The dwell timer is marked
    /// for resampling.
    pub fn enter(&mut self, state: CharacterState) {
        self.state = state;
        self.frame = 0;
        self.frame_timer = 0.0;
        self.dwell_stale = true;
    }

    pub fn reset_dwell(&mut self, dwell: DwellRange, rng: &mut impl Rng) {
        self.dwell = dwell.sample(rng);
        self.dwell_stale = false;
    }
}

/// Remaining walk. Present only while a character is walking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Walk {
    /// Cells still to visit, nearest first.
    pub path: VecDeque<Cell>,
    /// 0..1 progress from `Body::tile` toward `path[0]`.
    pub progress: f32,
    /// State adopted once the path is exhausted.
    pub arrival: CharacterState,
}

impl Walk {
    pub fn new(path: impl IntoIterator<Item = Cell>, arrival: CharacterState) -> Self {
        Self {
            path: path.into_iter().collect(),
            progress: 0.0,
            arrival,
        }
    }
}

/// Randomized fidget dwell, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DwellRange {
    pub min: f32,
    pub max: f32,
}

impl DwellRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for DwellRange {
    fn default() -> Self {
        Self::new(20.0, 60.0)
    }
}
