//! Character states, the external status vocabulary and animation tables.

use crate::pathfinding::Direction;
use serde::{Deserialize, Serialize};

/// Internal character state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterState {
    #[default]
    Idle,
    Working,
    Reading,
    Sleeping,
    /// Present in the world but not drawn.
    Gone,
    Coffee,
    Chatting,
    Celebrate,
    Walking,
    Fidget,
}

impl CharacterState {
    /// Map an external status string. Unknown strings become `Idle`.
    pub fn from_status(status: &str) -> Self {
        match status {
            "typing" => CharacterState::Working,
            "reading" => CharacterState::Reading,
            "sleeping" => CharacterState::Sleeping,
            "gone" => CharacterState::Gone,
            "coffee" => CharacterState::Coffee,
            _ => CharacterState::Idle,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CharacterState::Idle => "idle",
            CharacterState::Working => "working",
            CharacterState::Reading => "reading",
            CharacterState::Sleeping => "sleeping",
            CharacterState::Gone => "gone",
            CharacterState::Coffee => "coffee",
            CharacterState::Chatting => "chatting",
            CharacterState::Celebrate => "celebrate",
            CharacterState::Walking => "walking",
            CharacterState::Fidget => "fidget",
        }
    }

    pub fn animation(self) -> Animation {
        match self {
            CharacterState::Working | CharacterState::Chatting => Animation::Type,
            CharacterState::Reading => Animation::Read,
            CharacterState::Sleeping => Animation::Sleep,
            CharacterState::Celebrate => Animation::Celebrate,
            _ => Animation::Walk,
        }
    }

    /// Seconds per animation frame.
    pub fn frame_duration(self) -> f32 {
        match self {
            CharacterState::Idle => 1.5,
            CharacterState::Working => 0.4,
            CharacterState::Reading | CharacterState::Sleeping => 2.0,
            CharacterState::Walking => 0.3,
            CharacterState::Celebrate => 0.5,
            CharacterState::Fidget => 0.8,
            // chatting, coffee, gone
            _ => 1.0,
        }
    }

    /// Plays one animation cycle, then reverts to the previous state.
    pub fn is_one_shot(self) -> bool {
        matches!(self, CharacterState::Celebrate | CharacterState::Fidget)
    }

    pub fn status_emoji(self) -> &'static str {
        match self {
            CharacterState::Working => "\u{1F4BB}",
            CharacterState::Reading => "\u{1F4D6}",
            CharacterState::Sleeping => "\u{1F4A4}",
            CharacterState::Gone => "\u{1F6AA}",
            CharacterState::Coffee => "\u{2615}",
            CharacterState::Idle => "\u{1F9D8}",
            CharacterState::Chatting => "\u{1F4AC}",
            CharacterState::Celebrate => "\u{1F389}",
            _ => "\u{2753}",
        }
    }
}

/// Sprite animation families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Animation {
    Walk,
    Type,
    Read,
    Sleep,
    Celebrate,
}

impl Animation {
    pub fn name(self) -> &'static str {
        match self {
            Animation::Walk => "walk",
            Animation::Type => "type",
            Animation::Read => "read",
            Animation::Sleep => "sleep",
            Animation::Celebrate => "celebrate",
        }
    }

    pub fn suffixes(self) -> &'static [&'static str] {
        match self {
            Animation::Walk => &["stand", "step"],
            Animation::Type | Animation::Read | Animation::Sleep => &["1", "2"],
            Animation::Celebrate => &["1", "2", "3"],
        }
    }

    pub fn frame_count(self) -> usize {
        self.suffixes().len()
    }

    pub fn suffix(self, frame: usize) -> &'static str {
        let s = self.suffixes();
        s[frame % s.len()]
    }
}

/// Library key of a character frame, e.g. `down/walk_step`. Left-facing
/// frames reuse the right-facing art; the caller mirrors them.
pub fn sprite_key(direction: Direction, animation: Animation, suffix: &str) -> String {
    let dir = match direction {
        Direction::Left => Direction::Right,
        d => d,
    };
    format!("{}/{}_{}", dir.as_str(), animation.name(), suffix)
}

/// Short display label for a member name: `agent-code-reviewer` →
/// `Code Rev..`.
pub fn persona_label(name: &str) -> String {
    let trimmed = name
        .strip_prefix("agent-")
        .or_else(|| name.strip_prefix("bot-"))
        .unwrap_or(name);
    let label = trimmed
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ");
    if label.chars().count() > 10 {
        let head: String = label.chars().take(8).collect();
        format!("{head}..")
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(CharacterState::from_status("typing"), CharacterState::Working);
        assert_eq!(CharacterState::from_status("sleeping"), CharacterState::Sleeping);
        assert_eq!(CharacterState::from_status("coffee"), CharacterState::Coffee);
        assert_eq!(CharacterState::from_status("dancing"), CharacterState::Idle);
        assert_eq!(CharacterState::from_status(""), CharacterState::Idle);
        // Internal names are not part of the external vocabulary
        assert_eq!(CharacterState::from_status("working"), CharacterState::Idle);
    }

    #[test]
    fn test_frame_durations_in_range() {
        for state in [
            CharacterState::Idle,
            CharacterState::Working,
            CharacterState::Reading,
            CharacterState::Sleeping,
            CharacterState::Celebrate,
            CharacterState::Fidget,
        ] {
            let d = state.frame_duration();
            assert!((0.4..=2.0).contains(&d), "{state:?}: {d}");
        }
    }

    #[test]
    fn test_celebrate_cycle_is_three_frames() {
        let anim = CharacterState::Celebrate.animation();
        assert_eq!(anim.frame_count(), 3);
        assert_eq!(anim.suffix(3), "1");
    }

    #[test]
    fn test_sprite_key_mirrors_left() {
        assert_eq!(sprite_key(Direction::Left, Animation::Walk, "step"), "right/walk_step");
        assert_eq!(sprite_key(Direction::Up, Animation::Type, "2"), "up/type_2");
    }

    #[test]
    fn test_persona_label() {
        assert_eq!(persona_label("agent-lead"), "Lead");
        assert_eq!(persona_label("bot-qa"), "Qa");
        assert_eq!(persona_label("data-eng"), "Data Eng");
        assert_eq!(persona_label("agent-code-reviewer"), "Code Rev..");
        assert_eq!(persona_label("researcher"), "Researcher");
    }

    #[test]
    fn test_state_serde_names() {
        assert_eq!(CharacterState::Celebrate.as_str(), "celebrate");
        assert!(CharacterState::Fidget.is_one_shot());
        assert!(!CharacterState::Walking.is_one_shot());
    }
}
