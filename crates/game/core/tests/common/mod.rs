#![allow(dead_code)]

use std::sync::Arc;

use boss_room_core::{
    ActionDefinition, ActionEvent, ActionId, ActionLogic, ActionRegistry, ActionRequestData,
    ActorId, ActorTraits, BlockingMode, CharacterClass, ClassCatalog, ClassId, ClientRequest,
    GameConfig, GameEngine, NaiveSpatialOracle, PcgRng, SimTime, SpawnRequest, TickReport, Vec3,
};

pub const CHASE: ActionId = ActionId(1);
pub const TARGET: ActionId = ActionId(2);
pub const STUN: ActionId = ActionId(3);
pub const MELEE: ActionId = ActionId(10);
pub const WAVE: ActionId = ActionId(11);
pub const CHEER: ActionId = ActionId(12);
pub const SHOUT: ActionId = ActionId(13);
pub const SALUTE: ActionId = ActionId(14);
pub const JAB: ActionId = ActionId(15);
pub const BRACE: ActionId = ActionId(16);
pub const TRAMPLE: ActionId = ActionId(20);
pub const SHIELD: ActionId = ActionId(21);
pub const STEALTH: ActionId = ActionId(22);
pub const CLAW: ActionId = ActionId(23);

pub const TANK: ClassId = ClassId(1);
pub const DUMMY: ClassId = ClassId(2);
pub const POT: ClassId = ClassId(3);
pub const BOSS: ClassId = ClassId(4);

pub fn registry() -> ActionRegistry {
    let emote = |id, name, duration| {
        ActionDefinition::new(id, name, ActionLogic::Emote).with_timing(0.0, duration)
    };
    let mut trample = ActionDefinition::new(TRAMPLE, "trample", ActionLogic::Trample)
        .with_amount(20)
        .with_timing(0.2, 2.0);
    trample.move_speed = 10.0;
    trample.splash_damage = 5;
    trample.knockback_speed = 4.0;
    trample.knockback_duration = 0.3;
    let mut shield = ActionDefinition::new(SHIELD, "shield", ActionLogic::ChargedShield)
        .with_timing(1.0, 0.0);
    shield.effect_duration_seconds = 2.0;

    ActionRegistry::builder()
        .definition(ActionDefinition::new(CHASE, "chase", ActionLogic::Chase))
        .definition(
            ActionDefinition::new(TARGET, "target", ActionLogic::Target)
                .with_blocking(BlockingMode::OnlyDuringExecTime),
        )
        .definition(
            ActionDefinition::new(STUN, "stunned", ActionLogic::Stunned)
                .with_amount(2)
                .with_timing(0.0, 1.0),
        )
        .definition(
            ActionDefinition::new(MELEE, "swing", ActionLogic::Melee)
                .with_amount(10)
                .with_range(2.0)
                .with_timing(0.4, 0.8),
        )
        .definition(emote(WAVE, "wave", 2.0))
        .definition(emote(CHEER, "cheer", 2.0))
        .definition(
            emote(SHOUT, "shout", 3.0)
                .with_timing(1.5, 3.0)
                .with_blocking(BlockingMode::OnlyDuringExecTime),
        )
        .definition(emote(SALUTE, "salute", 0.3).with_reuse_time(1.0))
        .definition(
            ActionDefinition::new(JAB, "jab", ActionLogic::Melee)
                .with_amount(10)
                .with_range(2.0)
                .with_timing(0.0, 0.5),
        )
        .definition(
            emote(BRACE, "brace", 2.0)
                .with_timing(1.0, 2.0)
                .with_blocking(BlockingMode::OnlyDuringExecTime),
        )
        .definition(trample)
        .definition(shield)
        .definition(
            ActionDefinition::new(STEALTH, "stealth", ActionLogic::StealthMode)
                .with_timing(0.3, 0.0)
                .friendly(),
        )
        .definition(
            ActionDefinition::new(CLAW, "claw", ActionLogic::Melee)
                .with_amount(5)
                .with_range(2.0)
                .with_timing(0.4, 0.8),
        )
        .general_chase(CHASE)
        .general_target(TARGET)
        .stun(STUN)
        .build()
        .expect("test registry is valid")
}

pub fn classes() -> ClassCatalog {
    ClassCatalog::new([
        CharacterClass::new(TANK, "tank", 100),
        CharacterClass::new(DUMMY, "dummy", 50).npc(0.0),
        CharacterClass::new(POT, "pot", 1)
            .with_traits(ActorTraits::BREAKABLE | ActorTraits::STUN_ON_TRAMPLE),
        CharacterClass::new(BOSS, "boss", 500)
            .npc(10.0)
            .with_skill(CLAW),
    ])
}

/// Engine at 10 Hz with every report kept.
pub struct Harness {
    pub engine: GameEngine,
    pub reports: Vec<TickReport>,
}

impl Harness {
    pub fn new() -> Self {
        let engine = GameEngine::builder()
            .actions(Arc::new(registry()))
            .classes(Arc::new(classes()))
            .spatial(Arc::new(NaiveSpatialOracle))
            .rng(Arc::new(PcgRng))
            .config(GameConfig::with_tick_rate(10).with_seed(7))
            .build()
            .expect("engine wiring is complete");
        Self {
            engine,
            reports: Vec::new(),
        }
    }

    pub fn spawn(&mut self, class: ClassId, x: f32, z: f32) -> ActorId {
        self.spawn_at(class, Vec3::new(x, 0.0, z))
    }

    pub fn spawn_at(&mut self, class: ClassId, position: Vec3) -> ActorId {
        self.engine
            .spawn_actor(SpawnRequest::new(class, position))
            .expect("class is registered")
    }

    pub fn play(&mut self, actor: ActorId, request: ActionRequestData) {
        self.engine
            .submit(ClientRequest::PlayAction { actor, request });
    }

    pub fn tick(&mut self) -> &TickReport {
        let report = self.engine.tick();
        self.reports.push(report);
        self.reports.last().expect("just pushed")
    }

    pub fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    pub fn hp(&self, actor: ActorId) -> i32 {
        self.engine
            .world()
            .actor(actor)
            .map_or(0, |a| a.hit_points.current)
    }

    pub fn events(&self) -> impl Iterator<Item = (SimTime, &ActionEvent)> {
        self.reports
            .iter()
            .flat_map(|r| r.events.iter().map(move |e| (r.now, e)))
    }

    /// Times at which `action` started on `actor`.
    pub fn starts(&self, actor: ActorId, action: ActionId) -> Vec<SimTime> {
        self.events()
            .filter_map(|(now, event)| match event {
                ActionEvent::Started { actor: a, request }
                    if *a == actor && request.action_id == action =>
                {
                    Some(now)
                }
                _ => None,
            })
            .collect()
    }

    pub fn cancels(&self, actor: ActorId, action: ActionId) -> usize {
        self.events()
            .filter(|(_, e)| {
                matches!(e, ActionEvent::Cancelled { actor: a, action: x } if *a == actor && *x == action)
            })
            .count()
    }

    pub fn ends(&self, actor: ActorId, action: ActionId) -> usize {
        self.events()
            .filter(|(_, e)| {
                matches!(e, ActionEvent::Ended { actor: a, action: x } if *a == actor && *x == action)
            })
            .count()
    }
}
