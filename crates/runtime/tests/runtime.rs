use std::time::Duration;

use boss_room_content::Content;
use boss_room_core::{
    ActionEvent, ActionId, ActionRequestData, ActorId, ClassId, LifeState, ReplicationDelta,
    SpawnRequest, Vec3,
};
use boss_room_runtime::{Event, Runtime, RuntimeError, RuntimeHandle, Topic};
use tokio::sync::broadcast;

const TANK: ClassId = ClassId(1);
const IMP: ClassId = ClassId(10);
const EMOTE_WAVE: ActionId = ActionId(4);

async fn manual_runtime() -> Runtime {
    Runtime::builder()
        .content(Content::embedded().unwrap())
        .auto_tick(false)
        .build()
        .await
        .unwrap()
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

async fn spawn_tank(handle: &RuntimeHandle) -> ActorId {
    handle
        .spawn(SpawnRequest::new(TANK, Vec3::ZERO))
        .await
        .unwrap()
}

#[tokio::test]
async fn spawned_actors_show_up_in_snapshots() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();

    let tank = spawn_tank(&handle).await;
    let imp = handle
        .spawn(SpawnRequest::new(IMP, Vec3::new(30.0, 0.0, 0.0)))
        .await
        .unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.actors.len(), 2);
    let tank_state = snapshot.actor(tank).unwrap();
    assert_eq!(tank_state.hit_points.current, 200);
    assert_eq!(tank_state.life_state, LifeState::Alive);
    assert!(snapshot.actor(imp).is_some());

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn ticks_publish_replication_before_the_tick_marker() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    let mut replication = handle.subscribe(Topic::Replication);
    let mut ticks = handle.subscribe(Topic::Tick);

    let tank = spawn_tank(&handle).await;
    let report = handle.step().await.unwrap();
    assert_eq!(report.tick, 1);

    let deltas = drain(&mut replication);
    assert!(deltas.iter().any(|event| matches!(
        event,
        Event::Replication(r) if r.tick == 1 && matches!(&r.delta, ReplicationDelta::Spawned(a) if a.id == tank)
    )));
    match drain(&mut ticks).as_slice() {
        [Event::Tick(marker)] => {
            assert_eq!(marker.tick, 1);
            assert_eq!(marker.deltas, report.deltas.len());
        }
        other => panic!("expected one tick marker, got {other:?}"),
    }
}

#[tokio::test]
async fn requests_wait_for_the_next_tick() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    let mut cues = handle.subscribe(Topic::Presentation);

    let tank = spawn_tank(&handle).await;
    handle
        .play_action(tank, ActionRequestData::new(EMOTE_WAVE))
        .await
        .unwrap();
    assert!(drain(&mut cues).is_empty());

    handle.step().await.unwrap();
    let started = drain(&mut cues);
    assert!(started.iter().any(|event| matches!(
        event,
        Event::Presentation(p) if matches!(&p.event, ActionEvent::Started { actor, request } if *actor == tank && request.action_id == EMOTE_WAVE)
    )));

    // The wave lasts 1.5 s at 30 Hz.
    let mut ended = false;
    for _ in 0..60 {
        handle.step().await.unwrap();
        ended |= drain(&mut cues).iter().any(|event| matches!(
            event,
            Event::Presentation(p) if matches!(p.event, ActionEvent::Ended { actor, action } if actor == tank && action == EMOTE_WAVE)
        ));
        if ended {
            break;
        }
    }
    assert!(ended);
}

#[tokio::test]
async fn encoded_requests_are_decoded_at_the_boundary() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    let mut cues = handle.subscribe(Topic::Presentation);
    let tank = spawn_tank(&handle).await;

    let err = handle.play_encoded(tank, &[4, 0]).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Wire(_)));

    let bytes = ActionRequestData::new(EMOTE_WAVE).encode().unwrap();
    handle.play_encoded(tank, &bytes).await.unwrap();
    handle.step().await.unwrap();
    assert!(!drain(&mut cues).is_empty());
}

#[tokio::test]
async fn despawn_removes_the_actor() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    let tank = spawn_tank(&handle).await;

    handle
        .play_action(tank, ActionRequestData::new(EMOTE_WAVE))
        .await
        .unwrap();
    handle.step().await.unwrap();
    handle.despawn(tank).await.unwrap();

    assert!(handle.snapshot().await.unwrap().actor(tank).is_none());
    assert!(matches!(
        handle.despawn(tank).await,
        Err(RuntimeError::Spawn(_))
    ));
}

#[tokio::test]
async fn unknown_classes_are_rejected() {
    let runtime = manual_runtime().await;
    let result = runtime
        .handle()
        .spawn(SpawnRequest::new(ClassId(999), Vec3::ZERO))
        .await;
    assert!(matches!(result, Err(RuntimeError::Spawn(_))));
}

#[tokio::test]
async fn building_without_content_fails() {
    let result = Runtime::builder().auto_tick(false).build().await;
    assert!(matches!(result, Err(RuntimeError::MissingContent)));
}

#[tokio::test]
async fn fixed_rate_runtime_ticks_on_its_own() {
    let runtime = Runtime::builder()
        .content(Content::embedded().unwrap())
        .build()
        .await
        .unwrap();
    let mut ticks = runtime.subscribe(Topic::Tick);

    let first = tokio::time::timeout(Duration::from_secs(2), ticks.recv())
        .await
        .expect("no tick within two seconds")
        .unwrap();
    assert!(matches!(first, Event::Tick(marker) if marker.tick >= 1));

    assert!(matches!(
        runtime.handle().step().await,
        Err(RuntimeError::AutoTickEnabled)
    ));
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn snapshots_survive_bincode() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    spawn_tank(&handle).await;
    handle.step().await.unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    let decoded = boss_room_runtime::WorldSnapshot::decode(&snapshot.encode().unwrap()).unwrap();
    assert_eq!(decoded, snapshot);
}
