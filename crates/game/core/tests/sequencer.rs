mod common;

use boss_room_core::{ActionRequestData, ClientRequest, LifeState, SimTime, Vec3};
use common::*;

#[test]
fn superseding_request_cancels_head_once() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);

    h.play(tank, ActionRequestData::new(WAVE));
    h.tick();
    h.play(tank, ActionRequestData::new(CHEER));
    h.run(3);

    assert_eq!(h.starts(tank, WAVE).len(), 1);
    assert_eq!(h.cancels(tank, WAVE), 1);
    assert_eq!(h.ends(tank, WAVE), 0);
    assert_eq!(h.starts(tank, CHEER).len(), 1);

    let player = h.engine.player(tank).unwrap();
    assert_eq!(player.active_action_info().map(|r| r.action_id), Some(CHEER));
    assert_eq!(h.engine.pool().outstanding(), 1);
}

#[test]
fn exec_time_blocker_releases_queue_at_exec() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);

    h.play(tank, ActionRequestData::new(SHOUT));
    h.play(tank, ActionRequestData::new(WAVE).queued());
    h.run(20);

    let shout = h.starts(tank, SHOUT);
    let wave = h.starts(tank, WAVE);
    assert_eq!(shout.len(), 1);
    assert_eq!(wave.len(), 1);
    assert_eq!(wave[0].saturating_sub(shout[0]), SimTime::from_secs_f32(1.5));
}

#[test]
fn both_actions_run_after_demotion() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);

    h.play(tank, ActionRequestData::new(SHOUT));
    h.play(tank, ActionRequestData::new(WAVE).queued());
    h.run(16);

    let player = h.engine.player(tank).unwrap();
    assert_eq!(player.running_action_count(), 2);
    assert_eq!(player.non_blocking_actions().count(), 1);
    assert_eq!(player.active_action_info().map(|r| r.action_id), Some(WAVE));
}

#[test]
fn deep_queue_discards_requests() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);

    h.play(tank, ActionRequestData::new(SHOUT));
    h.play(tank, ActionRequestData::new(SHOUT).queued());
    h.play(tank, ActionRequestData::new(SHOUT).queued());
    h.tick();

    let player = h.engine.player(tank).unwrap();
    assert_eq!(player.queued_action_count(), 2);
    assert_eq!(h.engine.pool().outstanding(), 2);
}

#[test]
fn reuse_time_gates_replay() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);

    h.play(tank, ActionRequestData::new(SALUTE));
    h.run(4);
    // Ended at 0.4 s, but the cooldown runs until 1.1 s.
    h.play(tank, ActionRequestData::new(SALUTE));
    h.run(6);
    assert_eq!(h.starts(tank, SALUTE).len(), 1);

    h.play(tank, ActionRequestData::new(SALUTE));
    h.tick();
    assert_eq!(h.starts(tank, SALUTE).len(), 2);
}

#[test]
fn chase_is_synthesized_once_before_closing_attack() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let dummy = h.spawn(DUMMY, 0.0, 5.0);

    h.play(tank, ActionRequestData::new(MELEE).with_target(dummy).closing());
    h.run(30);

    let chases = h.starts(tank, CHASE);
    let swings = h.starts(tank, MELEE);
    assert_eq!(chases.len(), 1);
    assert_eq!(h.ends(tank, CHASE), 1);
    assert_eq!(swings.len(), 1);
    assert!(swings[0] > chases[0]);

    let here = h.engine.world().position(tank).unwrap();
    let there = h.engine.world().position(dummy).unwrap();
    assert!(here.distance(there) < 2.0);
    assert_eq!(h.hp(dummy), 40);
}

#[test]
fn target_is_set_ahead_of_single_target_action() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let dummy = h.spawn(DUMMY, 0.0, 1.5);

    h.play(tank, ActionRequestData::new(MELEE).with_target(dummy));
    h.tick();

    assert_eq!(h.starts(tank, TARGET).len(), 1);
    assert_eq!(h.engine.world().actor(tank).unwrap().target, Some(dummy));
    let player = h.engine.player(tank).unwrap();
    assert_eq!(player.non_blocking_actions().count(), 1);
    assert_eq!(player.active_action_info().map(|r| r.action_id), Some(MELEE));
}

#[test]
fn despawn_returns_every_instance() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let dummy = h.spawn(DUMMY, 0.0, 5.0);

    h.play(tank, ActionRequestData::new(MELEE).with_target(dummy).closing());
    h.play(tank, ActionRequestData::new(WAVE).queued());
    h.run(2);
    assert!(h.engine.pool().outstanding() >= 3);

    h.engine.despawn_actor(tank).unwrap();
    assert_eq!(h.engine.pool().outstanding(), 0);
    assert!(h.engine.player(tank).is_none());
    assert!(h.engine.despawn_actor(tank).is_err());
}

#[test]
fn move_to_interrupts_and_walks() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let dummy = h.spawn(DUMMY, 0.0, 1.5);

    h.play(tank, ActionRequestData::new(MELEE).with_target(dummy));
    h.tick();
    h.engine.submit(ClientRequest::MoveTo {
        actor: tank,
        destination: Vec3::new(2.0, 0.0, 0.0),
    });
    h.run(10);

    // Melee is not interruptible; the target action is.
    assert_eq!(h.cancels(tank, MELEE), 0);
    assert_eq!(h.cancels(tank, TARGET), 1);
    assert_eq!(h.engine.world().position(tank), Some(Vec3::new(2.0, 0.0, 0.0)));
}

#[test]
fn encoded_requests_are_accepted() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);

    let bytes = ActionRequestData::new(WAVE).encode().unwrap();
    h.engine.submit_encoded(tank, &bytes).unwrap();
    assert!(h.engine.submit_encoded(tank, &bytes[..2]).is_err());
    h.tick();

    assert_eq!(h.starts(tank, WAVE).len(), 1);
}

#[test]
fn instant_action_ahead_of_strike_starts_each_once() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let dummy = h.spawn(DUMMY, 0.0, 1.5);

    h.play(tank, ActionRequestData::new(JAB).with_target(dummy));
    h.tick();

    assert_eq!(h.starts(tank, TARGET).len(), 1);
    assert_eq!(h.starts(tank, JAB).len(), 1);
    assert_eq!(h.hp(dummy), 40);

    h.run(5);
    assert_eq!(h.ends(tank, JAB), 1);
    assert_eq!(h.hp(dummy), 40);
}

#[test]
fn blocking_request_during_tail_of_exec_time_blocker_starts_at_once() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);

    h.play(tank, ActionRequestData::new(BRACE));
    h.run(15);
    // 1.4 s in; the request lands on the tick at 1.5 s.
    h.play(tank, ActionRequestData::new(WAVE).queued());
    h.tick();

    let brace = h.starts(tank, BRACE);
    let wave = h.starts(tank, WAVE);
    assert_eq!(wave.len(), 1);
    assert_eq!(wave[0].saturating_sub(brace[0]), SimTime::from_secs_f32(1.5));
    assert_eq!(h.cancels(tank, BRACE), 0);

    let player = h.engine.player(tank).unwrap();
    assert_eq!(player.active_action_info().map(|r| r.action_id), Some(WAVE));
    assert_eq!(player.non_blocking_actions().count(), 1);
}

#[test]
fn closing_attack_starts_within_range() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let dummy = h.spawn(DUMMY, 0.0, 6.0);

    h.play(tank, ActionRequestData::new(MELEE).with_target(dummy).closing());
    let mut at_start = None;
    for _ in 0..40 {
        let before = h.engine.world().position(tank).unwrap();
        h.tick();
        if at_start.is_none() && !h.starts(tank, MELEE).is_empty() {
            at_start = Some(before);
        }
    }

    let here = at_start.expect("melee started");
    let there = h.engine.world().position(dummy).unwrap();
    assert!(here.distance(there) < 2.0);
    assert_eq!(h.starts(tank, CHASE).len(), 1);
}

#[test]
fn chase_reaches_target_standing_higher() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let dummy = h.spawn_at(DUMMY, Vec3::new(0.0, 1.0, 5.0));

    h.play(tank, ActionRequestData::new(MELEE).with_target(dummy).closing());
    h.run(60);

    assert_eq!(h.starts(tank, CHASE).len(), 1);
    assert_eq!(h.ends(tank, CHASE), 1);
    assert_eq!(h.starts(tank, MELEE).len(), 1);
    assert_eq!(h.ends(tank, MELEE), 1);

    let here = h.engine.world().position(tank).unwrap();
    let there = h.engine.world().position(dummy).unwrap();
    assert!(here.flat_distance_squared(there) < 4.0);
}

#[test]
fn finished_instances_go_back_to_the_pool_pristine() {
    let mut h = Harness::new();
    let tank = h.spawn(TANK, 0.0, 0.0);
    let pot = h.spawn(POT, 0.0, 2.3);

    h.play(tank, ActionRequestData::new(TRAMPLE));
    h.run(6);
    assert_eq!(h.ends(tank, TRAMPLE), 1);
    assert_eq!(h.starts(tank, STUN).len(), 1);
    assert_eq!(
        h.engine.world().actor(pot).unwrap().life_state,
        LifeState::Dead
    );

    let pool = h.engine.pool();
    assert_eq!(pool.available(TRAMPLE), 1);
    assert!(pool.free_instances(TRAMPLE).all(|i| i.is_pristine()));

    // Let the stun wear off, then trample through empty space.
    h.run(12);
    h.play(tank, ActionRequestData::new(TRAMPLE));
    h.run(25);

    assert_eq!(h.starts(tank, TRAMPLE).len(), 2);
    assert_eq!(h.ends(tank, TRAMPLE), 2);
    assert_eq!(h.starts(tank, STUN).len(), 1);
    assert!(h.engine.pool().free_instances(TRAMPLE).all(|i| i.is_pristine()));
    assert!(h.engine.pool().free_instances(STUN).all(|i| i.is_pristine()));
}
