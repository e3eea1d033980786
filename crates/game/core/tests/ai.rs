mod common;

use boss_room_core::{AiStateKind, LifeState};
use common::*;

#[test]
fn idle_brain_hates_everyone_in_range() {
    let mut h = Harness::new();
    let boss = h.spawn(BOSS, 0.0, 0.0);
    let near = h.spawn(TANK, 0.0, 3.0);
    let _far = h.spawn(TANK, 0.0, 30.0);

    h.tick();

    let brain = h.engine.brain(boss).unwrap();
    assert_eq!(brain.hated(), &[near]);
    assert_eq!(brain.current_state(), AiStateKind::Idle);
}

#[test]
fn equidistant_foes_resolve_to_first_hated() {
    let mut h = Harness::new();
    let boss = h.spawn(BOSS, 0.0, 0.0);
    let first = h.spawn(TANK, 0.0, 3.0);
    let second = h.spawn(TANK, 0.0, -3.0);

    h.run(2);

    let brain = h.engine.brain(boss).unwrap();
    assert_eq!(brain.hated(), &[first, second]);
    assert_eq!(brain.current_state(), AiStateKind::Attack);

    let head = h.engine.player(boss).unwrap().active_action_info().cloned();
    assert_eq!(head.as_ref().map(|r| r.action_id), Some(CHASE));
    assert_eq!(head.and_then(|r| r.first_target()), Some(first));
}

#[test]
fn brain_closes_in_and_attacks() {
    let mut h = Harness::new();
    let boss = h.spawn(BOSS, 0.0, 0.0);
    let tank = h.spawn(TANK, 0.0, 4.0);

    h.run(40);

    assert_eq!(h.starts(boss, CHASE).len(), 1);
    assert!(!h.starts(boss, CLAW).is_empty());
    assert!(h.hp(tank) < 100);
}

#[test]
fn fainted_player_characters_are_dropped() {
    let mut h = Harness::new();
    let boss = h.spawn(BOSS, 0.0, 0.0);
    let tank = h.spawn(TANK, 0.0, 1.5);

    // 20 claws of 5 damage each.
    h.run(400);

    let body = h.engine.world().actor(tank).unwrap();
    assert_eq!(body.life_state, LifeState::Fainted);
    assert!(h.engine.brain(boss).unwrap().hated().is_empty());
    assert_eq!(
        h.engine.brain(boss).unwrap().current_state(),
        AiStateKind::Idle
    );
}
