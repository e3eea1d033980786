mod common;

use boss_room_core::{
    ActionRequestData, BuffableValue, ClientRequest, LifeState, ReplicatedFields,
    ReplicationDelta,
};
use common::*;

#[test]
fn melee_lands_exactly_at_exec_time() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let dummy = h.spawn(DUMMY, 0.0, 1.5);

    h.play(tank, ActionRequestData::new(MELEE).with_target(dummy));
    h.run(4);
    assert_eq!(h.hp(dummy), 50);

    let report = h.tick().clone();
    assert_eq!(h.hp(dummy), 40);
    let start = h.starts(tank, MELEE)[0];
    assert_eq!(report.now.saturating_sub(start).as_micros(), 400_000);
    assert!(report.deltas.iter().any(|d| matches!(
        d,
        ReplicationDelta::Changed { changed, state }
            if state.id == dummy && changed.contains(ReplicatedFields::HIT_POINTS)
    )));
}

#[test]
fn victims_hate_their_attacker() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let dummy = h.spawn(DUMMY, 0.0, 1.5);

    h.play(tank, ActionRequestData::new(MELEE).with_target(dummy));
    h.run(6);

    assert_eq!(h.engine.brain(dummy).unwrap().hated(), &[tank]);
}

#[test]
fn lethal_damage_kills_npc_and_clears_its_actions() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let dummy = h.spawn(DUMMY, 0.0, 1.5);

    for _ in 0..5 {
        h.play(tank, ActionRequestData::new(MELEE).with_target(dummy));
        h.run(9);
    }

    let body = h.engine.world().actor(dummy).unwrap();
    assert_eq!(body.hit_points.current, 0);
    assert_eq!(body.life_state, LifeState::Dead);
    assert_eq!(h.engine.player(dummy).unwrap().running_action_count(), 0);

    // Dead actors ignore requests.
    h.play(dummy, ActionRequestData::new(WAVE));
    h.tick();
    assert!(h.starts(dummy, WAVE).is_empty());
}

#[test]
fn partially_charged_shield_reduces_damage() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);

    h.play(tank, ActionRequestData::new(SHIELD));
    h.run(5);
    h.engine
        .submit(ClientRequest::StopChargingUp { actor: tank });
    h.tick();

    let now = h.engine.now();
    let actions = h.engine.actions();
    let player = h.engine.player(tank).unwrap();
    assert_eq!(
        player.buffed_value(BuffableValue::PercentDamageReceived, now, actions),
        0.375
    );
    assert_eq!(
        player.buffed_value(BuffableValue::ChanceToStunTramplers, now, actions),
        0.0
    );
    // Released shields stop blocking.
    assert!(player.active_action_info().is_none());
}

#[test]
fn fully_charged_shield_stuns_tramplers() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);

    h.play(tank, ActionRequestData::new(SHIELD));
    h.run(11);

    let now = h.engine.now();
    let actions = h.engine.actions();
    let player = h.engine.player(tank).unwrap();
    assert_eq!(
        player.buffed_value(BuffableValue::ChanceToStunTramplers, now, actions),
        1.0
    );
    assert_eq!(
        player.buffed_value(BuffableValue::PercentDamageReceived, now, actions),
        0.0
    );
}

#[test]
fn trampling_a_stun_pot_chains_into_stun() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let pot = h.spawn(POT, 0.0, 2.3);

    h.play(tank, ActionRequestData::new(TRAMPLE));
    h.run(6);

    assert_eq!(
        h.engine.world().actor(pot).unwrap().life_state,
        LifeState::Dead
    );
    assert_eq!(h.ends(tank, TRAMPLE), 1);
    assert_eq!(h.starts(tank, STUN).len(), 1);
    let player = h.engine.player(tank).unwrap();
    assert_eq!(player.active_action_info().map(|r| r.action_id), Some(STUN));

    let now = h.engine.now();
    assert_eq!(
        player.buffed_value(BuffableValue::PercentDamageReceived, now, h.engine.actions()),
        2.0
    );
}

#[test]
fn attacking_breaks_stealth() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let dummy = h.spawn(DUMMY, 0.0, 1.5);

    h.play(tank, ActionRequestData::new(STEALTH));
    h.run(4);
    assert!(h.engine.world().actor(tank).unwrap().is_stealthy);

    h.play(tank, ActionRequestData::new(MELEE).with_target(dummy));
    h.tick();

    assert!(!h.engine.world().actor(tank).unwrap().is_stealthy);
    assert_eq!(h.ends(tank, STEALTH), 1);
}
