//! Animation system - advances frame timers and ends one-shot animations

use crate::components::Behavior;
use agentoffice_logic::animation::CharacterState;
use hecs::World;

/// Slack for accumulated float error in frame timers.
const FRAME_EPSILON: f32 = 1e-4;

pub fn animation_system(world: &mut World, delta_seconds: f32) {
    for (_, behavior) in world.query_mut::<&mut Behavior>() {
        advance_frames(behavior, delta_seconds);
    }
}

/// Advance one character's animation by `delta_seconds`, carrying any
/// remainder into the next frame.
pub fn advance_frames(behavior: &mut Behavior, delta_seconds: f32) {
    behavior.frame_timer += delta_seconds;
    loop {
        let duration = behavior.state.frame_duration();
        if behavior.frame_timer + FRAME_EPSILON < duration {
            break;
        }
        behavior.frame_timer -= duration;
        let frames = behavior.state.animation().frame_count();
        behavior.frame = (behavior.frame + 1) % frames;

        if behavior.state.is_one_shot() && behavior.frame == 0 {
            let back = behavior.previous.take().unwrap_or(CharacterState::Idle);
            behavior.enter(back);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_cycles_two_frames() {
        let mut b = Behavior::new(CharacterState::Working, 30.0);
        advance_frames(&mut b, 0.4);
        assert_eq!(b.frame, 1);
        advance_frames(&mut b, 0.4);
        assert_eq!(b.frame, 0);
        assert_eq!(b.state, CharacterState::Working);
    }

    #[test]
    fn test_celebration_reverts_after_three_frames() {
        let mut b = Behavior::new(CharacterState::Celebrate, 30.0);
        b.previous = Some(CharacterState::Reading);
        let dt = 1.0 / 30.0;
        // 1.5 s = 45 steps
        for _ in 0..44 {
            advance_frames(&mut b, dt);
        }
        assert_eq!(b.state, CharacterState::Celebrate);
        assert_eq!(b.frame, 2);
        advance_frames(&mut b, dt);
        assert_eq!(b.state, CharacterState::Reading);
        assert_eq!(b.frame, 0);
        assert!(b.previous.is_none());
    }

    #[test]
    fn test_fidget_defaults_to_idle() {
        let mut b = Behavior::new(CharacterState::Fidget, 30.0);
        advance_frames(&mut b, 1.6);
        assert_eq!(b.state, CharacterState::Idle);
    }

    #[test]
    fn test_large_step_does_not_skip_revert() {
        let mut b = Behavior::new(CharacterState::Celebrate, 30.0);
        b.previous = Some(CharacterState::Working);
        advance_frames(&mut b, 10.0);
        assert_eq!(b.state, CharacterState::Working);
        assert_eq!(b.frame_timer, 0.0);
    }
}
