/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Fixed simulation rate. Every tick advances the clock by `1 / tick_rate_hz`.
    pub tick_rate_hz: u32,
    /// Queued requests are discarded once the blocking time ahead of them
    /// reaches this many seconds.
    pub max_queue_time_depth: f32,
    /// Extra reach granted to melee detection beyond the definition's range.
    pub melee_range_padding: f32,
    /// How far past its range an area attack may still be aimed.
    pub aoe_max_distance_divergence: f32,
    /// Distance at which a trampling actor counts as touching a victim.
    pub physical_touch_distance: f32,
    /// Movement speed for actors whose class does not define one.
    pub default_move_speed: f32,
    /// Base seed for every random roll made during the session.
    pub game_seed: u64,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of skills a character class may expose to its brain.
    pub const MAX_SKILLS: usize = 4;
    /// Maximum number of projectile variants on a single definition.
    pub const MAX_PROJECTILES: usize = 4;
    /// Collision radius shared by every actor.
    pub const ACTOR_RADIUS: f32 = 0.5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TICK_RATE_HZ: u32 = 30;
    pub const DEFAULT_MAX_QUEUE_TIME_DEPTH: f32 = 1.6;
    pub const DEFAULT_MELEE_RANGE_PADDING: f32 = 0.0;
    pub const DEFAULT_AOE_MAX_DISTANCE_DIVERGENCE: f32 = 1.0;
    pub const DEFAULT_PHYSICAL_TOUCH_DISTANCE: f32 = 1.0;
    pub const DEFAULT_MOVE_SPEED: f32 = 5.0;

    pub fn new() -> Self {
        Self {
            tick_rate_hz: Self::DEFAULT_TICK_RATE_HZ,
            max_queue_time_depth: Self::DEFAULT_MAX_QUEUE_TIME_DEPTH,
            melee_range_padding: Self::DEFAULT_MELEE_RANGE_PADDING,
            aoe_max_distance_divergence: Self::DEFAULT_AOE_MAX_DISTANCE_DIVERGENCE,
            physical_touch_distance: Self::DEFAULT_PHYSICAL_TOUCH_DISTANCE,
            default_move_speed: Self::DEFAULT_MOVE_SPEED,
            game_seed: 0,
        }
    }

    pub fn with_tick_rate(tick_rate_hz: u32) -> Self {
        Self {
            tick_rate_hz,
            ..Self::new()
        }
    }

    pub fn with_seed(mut self, game_seed: u64) -> Self {
        self.game_seed = game_seed;
        self
    }

    /// Duration of one tick in microseconds. A zero rate is treated as 1 Hz.
    pub fn tick_interval_micros(&self) -> u64 {
        1_000_000 / u64::from(self.tick_rate_hz.max(1))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
