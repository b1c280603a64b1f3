//! End-to-end scheduler scenarios.
//!
//! Exercises: roster event → layout → office build → status/interaction
//! events → fixed-step systems → depth-sorted render.
//!
//! Every scheduler uses a fixed seed so dwell timers and star speeds repeat.

use agentoffice_core::effects::{EffectKind, EffectsLayer};
use agentoffice_core::placeholder::placeholder_book;
use agentoffice_core::prelude::*;
use agentoffice_core::systems::{draw_order, is_walking, state_of};
use agentoffice_logic::animation::CharacterState;
use agentoffice_logic::surface::Surface;

// ── Helpers ────────────────────────────────────────────────────────────

const TEAM: [&str; 5] = [
    "agent-planner",
    "agent-coder",
    "agent-code-reviewer",
    "agent-tester",
    "agent-writer",
];

fn started(team: usize) -> Scheduler {
    let mut s = Scheduler::new(OfficeConfig::seeded(2024), placeholder_book());
    s.start(Surface::new(768, 768));
    s.enqueue(OfficeEvent::Roster {
        members: TEAM.iter().take(team).map(|n| Member::new(*n)).collect(),
        statuses: Vec::new(),
    });
    s.pump_events();
    s
}

fn status(agent: &str, state: &str) -> OfficeEvent {
    OfficeEvent::Status(StatusEvent::new(agent, state))
}

fn state(s: &Scheduler, name: &str) -> CharacterState {
    let e = s.office().and_then(|o| o.character(name)).expect("character");
    state_of(s.world(), e).expect("state")
}

fn body(s: &Scheduler, name: &str) -> Body {
    let e = s.office().and_then(|o| o.character(name)).expect("character");
    *s.world().get::<&Body>(e).expect("body")
}

fn effects(s: &Scheduler) -> Vec<EffectKind> {
    let office = s.office().expect("office");
    let layer = s.world().get::<&EffectsLayer>(office.effects_entity()).expect("layer");
    layer.effects().iter().map(|e| e.kind.clone()).collect()
}

// ── Character state machine ────────────────────────────────────────────

#[test]
fn idle_to_sleeping() {
    let mut s = started(3);
    assert_eq!(state(&s, "agent-coder"), CharacterState::Idle);
    s.dispatch(status("agent-coder", "sleeping"));
    assert_eq!(state(&s, "agent-coder"), CharacterState::Sleeping);
}

#[test]
fn status_while_walking_applies_on_arrival() {
    let mut s = started(3);
    s.dispatch(status("agent-planner", "coffee"));
    assert_eq!(state(&s, "agent-planner"), CharacterState::Walking);

    s.dispatch(status("agent-planner", "sleeping"));
    assert_eq!(state(&s, "agent-planner"), CharacterState::Walking);

    s.advance(0.5);
    assert_eq!(state(&s, "agent-planner"), CharacterState::Walking);

    s.advance(15.0);
    let e = s.office().unwrap().character("agent-planner").unwrap();
    assert!(!is_walking(s.world(), e));
    assert_eq!(state(&s, "agent-planner"), CharacterState::Sleeping);
    let coffee = s.office().unwrap().layout.coffee_station.approach();
    assert_eq!(body(&s, "agent-planner").tile, coffee);
}

#[test]
fn unknown_status_defaults_to_idle() {
    let mut s = started(2);
    s.dispatch(status("agent-coder", "typing"));
    s.dispatch(status("agent-coder", "hibernating"));
    assert_eq!(state(&s, "agent-coder"), CharacterState::Idle);
}

#[test]
fn celebration_reverts_after_one_and_a_half_seconds() {
    let mut s = started(3);
    s.dispatch(status("agent-coder", "typing"));
    s.dispatch(OfficeEvent::Completed {
        agent: "agent-coder".into(),
    });
    assert_eq!(state(&s, "agent-coder"), CharacterState::Celebrate);

    // 3 frames × 0.5 s = 45 steps
    s.advance(1.5 - 1.0 / 30.0);
    assert_eq!(state(&s, "agent-coder"), CharacterState::Celebrate);
    s.advance(1.0 / 30.0);
    assert_eq!(state(&s, "agent-coder"), CharacterState::Working);
}

#[test]
fn walking_depth_tracks_position() {
    let mut s = started(3);
    s.dispatch(status("agent-planner", "coffee"));
    let before = body(&s, "agent-planner");
    s.advance(1.0);
    let after = body(&s, "agent-planner");
    assert_ne!(after.pos, before.pos);
    assert_eq!(after.depth(), after.pos.y + 72.0);
}

// ── Effects ────────────────────────────────────────────────────────────

#[test]
fn message_envelope_chains_receipt_bubble() {
    let mut s = started(3);
    s.dispatch(OfficeEvent::Message {
        from_agent: "agent-planner".into(),
        to_agent: "agent-code-reviewer".into(),
        summary: "plan ready".into(),
    });
    assert_eq!(effects(&s).len(), 2);

    s.advance(1.1);
    let fx = effects(&s);
    assert_eq!(fx.len(), 1);
    assert!(matches!(fx[0], EffectKind::Bubble { .. }));

    s.advance(1.5);
    assert!(effects(&s).is_empty());
}

#[test]
fn sleep_glyphs_stop_when_character_wakes() {
    let mut s = started(3);
    s.dispatch(status("agent-coder", "sleeping"));
    s.advance(0.1);
    assert_eq!(effects(&s).len(), 1);

    s.advance(6.0);
    assert!(!effects(&s).is_empty(), "loop keeps respawning while asleep");

    s.dispatch(status("agent-coder", "typing"));
    s.advance(4.0);
    assert!(effects(&s).is_empty());
}

#[test]
fn rebuild_discards_old_characters_safely() {
    let mut s = started(3);
    let old = s.office().unwrap().character("agent-planner").unwrap();
    s.dispatch(status("agent-planner", "sleeping"));
    s.advance(0.1);

    s.dispatch(OfficeEvent::Roster {
        members: TEAM.iter().map(|n| Member::new(*n)).collect(),
        statuses: vec![StatusEvent::new("agent-writer", "reading")],
    });
    assert!(!s.scene().contains(old));
    assert_eq!(s.office().unwrap().headcount(), 5);
    assert_eq!(state(&s, "agent-writer"), CharacterState::Reading);
    assert_eq!(state(&s, "agent-planner"), CharacterState::Idle);
    s.advance(1.0);
}

// ── Scheduler & rendering ──────────────────────────────────────────────

#[test]
fn draw_order_is_stable_and_ascending() {
    assert_eq!(draw_order(&[40.0, 10.0, 40.0, 25.0]), vec![1, 3, 0, 2]);
}

#[test]
fn frame_loop_renders_and_hit_tests() {
    let mut s = started(5);
    s.dispatch(status("agent-code-reviewer", "reading"));
    assert_eq!(s.frame(0.0), 0);
    assert_eq!(s.frame(34.0), 1);

    let surface = s.surface().unwrap();
    let drawn = surface.pixels().iter().filter(|c| c.a > 0).count();
    assert!(drawn > 0);

    let pos = body(&s, "agent-code-reviewer").pos;
    let card = s.hit_test(pos.x + 24.0, pos.y + 36.0).expect("card");
    assert_eq!(card.name, "agent-code-reviewer");
    assert_eq!(card.label, "Code Rev..");
    assert_eq!(card.state, CharacterState::Reading);
    assert!(card.status_line.ends_with("reading"));
    assert!(s.hit_test(-100.0, -100.0).is_none());
}

#[test]
fn gone_character_not_hit() {
    let mut s = started(2);
    s.dispatch(status("agent-coder", "gone"));
    let pos = body(&s, "agent-coder").pos;
    assert!(s.hit_test(pos.x + 24.0, pos.y + 36.0).is_none());
}

#[test]
fn json_events_drive_the_office() {
    let mut s = started(2);
    let e = OfficeEvent::from_json(r#"{"type":"task_assigned","agent":"agent-coder","task":"fix build"}"#)
        .expect("parse");
    s.enqueue(e);
    s.pump_events();
    let card = {
        let pos = body(&s, "agent-coder").pos;
        s.hit_test(pos.x + 24.0, pos.y + 36.0).expect("card")
    };
    assert_eq!(card.task.as_deref(), Some("fix build"));
    assert!(matches!(effects(&s)[0], EffectKind::Bubble { .. }));
}
