//! Action identity and the static shape of every action.

use std::fmt;

use crate::state::SimTime;

/// Registry handle of an action type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionId(pub u16);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action:{}", self.0)
    }
}

/// Behavior family of an action. Each value maps to exactly one logic
/// implementation, chosen when the pool builds the instance.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionLogic {
    Melee,
    #[cfg_attr(feature = "serde", serde(alias = "RangedTargeted"))]
    RangedFxTargeted,
    Chase,
    Revive,
    LaunchProjectile,
    Emote,
    AoE,
    Trample,
    ChargedShield,
    Stunned,
    Target,
    ChargedLaunchProjectile,
    StealthMode,
    DashAttack,
    ImpToss,
    PickUp,
    Drop,
}

impl ActionLogic {
    /// Logics that fire a projectile and therefore need projectile data.
    pub fn needs_projectile(self) -> bool {
        matches!(
            self,
            Self::RangedFxTargeted
                | Self::LaunchProjectile
                | Self::ChargedLaunchProjectile
                | Self::ImpToss
        )
    }
}

/// How long an action keeps other blocking actions waiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockingMode {
    #[default]
    EntireDuration,
    OnlyDuringExecTime,
}

/// Gameplay values running actions may alter for their owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffableValue {
    /// Multiplier on incoming healing. Unbuffed: 1.
    PercentHealingReceived,
    /// Multiplier on incoming damage. Unbuffed: 1.
    PercentDamageReceived,
    /// Chance that a trampler hitting this actor stuns itself. Unbuffed: 0.
    ChanceToStunTramplers,
}

impl BuffableValue {
    pub const fn unbuffed(self) -> f32 {
        match self {
            Self::PercentHealingReceived | Self::PercentDamageReceived => 1.0,
            Self::ChanceToStunTramplers => 0.0,
        }
    }
}

/// Things that happen to an actor that its running actions may react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameplayActivity {
    AttackedByEnemy,
    Healed,
    StoppedChargingUp,
    /// Raised right before the owner plays a hostile action.
    UsingAttackAction,
}

/// Opaque projectile descriptor. The prefab handle is resolved by the host.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileInfo {
    pub prefab: String,
    pub speed_mps: f32,
    pub range: f32,
    pub damage: i32,
    #[cfg_attr(feature = "serde", serde(default = "default_max_victims"))]
    pub max_victims: u32,
}

#[cfg(feature = "serde")]
fn default_max_victims() -> u32 {
    1
}

/// Immutable description of one action type.
///
/// Durations are authored in seconds. A non-positive duration means the
/// action runs until its logic decides to stop.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionDefinition {
    pub id: ActionId,
    pub name: String,
    pub logic: ActionLogic,
    pub amount: i32,
    pub mana_cost: i32,
    pub range: f32,
    pub duration_seconds: f32,
    pub exec_time_seconds: f32,
    pub effect_duration_seconds: f32,
    pub reuse_time_seconds: f32,
    pub blocking_mode: BlockingMode,
    /// Movement input interrupts this action, and it stops movement on start.
    pub interruptible: bool,
    /// Actions allowed to interrupt this one even when it is not interruptible.
    ///
    /// Loaded and validated as content data only. A request that does not
    /// queue supersedes the head whatever this list holds.
    pub interruptible_by: Vec<ActionId>,
    pub is_friendly: bool,
    pub radius: f32,
    pub splash_damage: i32,
    pub move_speed: f32,
    pub knockback_speed: f32,
    pub knockback_duration: f32,
    pub anim: Option<String>,
    pub anim2: Option<String>,
    pub react_anim: Option<String>,
    pub projectiles: Vec<ProjectileInfo>,
    pub spawns: Vec<String>,
}

impl Default for ActionDefinition {
    fn default() -> Self {
        Self::new(ActionId::default(), "", ActionLogic::Emote)
    }
}

impl ActionDefinition {
    pub fn new(id: ActionId, name: impl Into<String>, logic: ActionLogic) -> Self {
        Self {
            id,
            name: name.into(),
            logic,
            amount: 0,
            mana_cost: 0,
            range: 0.0,
            duration_seconds: 0.0,
            exec_time_seconds: 0.0,
            effect_duration_seconds: 0.0,
            reuse_time_seconds: 0.0,
            blocking_mode: BlockingMode::EntireDuration,
            interruptible: false,
            interruptible_by: Vec::new(),
            is_friendly: false,
            radius: 0.0,
            splash_damage: 0,
            move_speed: 0.0,
            knockback_speed: 0.0,
            knockback_duration: 0.0,
            anim: None,
            anim2: None,
            react_anim: None,
            projectiles: Vec::new(),
            spawns: Vec::new(),
        }
    }

    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn with_timing(mut self, exec_time_seconds: f32, duration_seconds: f32) -> Self {
        self.exec_time_seconds = exec_time_seconds;
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn with_blocking(mut self, blocking_mode: BlockingMode) -> Self {
        self.blocking_mode = blocking_mode;
        self
    }

    pub fn with_reuse_time(mut self, reuse_time_seconds: f32) -> Self {
        self.reuse_time_seconds = reuse_time_seconds;
        self
    }

    pub fn friendly(mut self) -> Self {
        self.is_friendly = true;
        self
    }

    pub fn interruptible(mut self) -> Self {
        self.interruptible = true;
        self
    }

    pub fn with_projectile(mut self, projectile: ProjectileInfo) -> Self {
        self.projectiles.push(projectile);
        self
    }

    pub fn duration(&self) -> SimTime {
        SimTime::from_secs_f32(self.duration_seconds)
    }

    pub fn exec_time(&self) -> SimTime {
        SimTime::from_secs_f32(self.exec_time_seconds)
    }

    pub fn effect_duration(&self) -> SimTime {
        SimTime::from_secs_f32(self.effect_duration_seconds)
    }

    pub fn reuse_time(&self) -> SimTime {
        SimTime::from_secs_f32(self.reuse_time_seconds)
    }

    /// Whether the sequencer should end the action once its duration passes.
    pub fn is_expirable(&self) -> bool {
        self.duration_seconds > 0.0
    }

    /// Seconds this action holds the blocking queue.
    pub fn blocking_seconds(&self) -> f32 {
        match self.blocking_mode {
            BlockingMode::OnlyDuringExecTime => self.exec_time_seconds,
            BlockingMode::EntireDuration => self.duration_seconds,
        }
    }
}
