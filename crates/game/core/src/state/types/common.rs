use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Network handle of a spawned actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u64);

impl ActorId {
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position or direction in world space (metres).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared(self, other: Self) -> f32 {
        (other - self).length_squared()
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Distance on the ground plane. Followers stop by this measure.
    pub fn flat_distance_squared(self, other: Self) -> f32 {
        (other - self).flat().length_squared()
    }

    /// Drops the vertical component.
    pub fn flat(self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len <= f32::EPSILON {
            None
        } else {
            Some(self * (1.0 / len))
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Simulation time in whole microseconds since the session started.
///
/// Integer time keeps duration comparisons exact: an action with a 1.0 s
/// duration ends on the same tick on every machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: Self = Self(0);
    pub const MICROS_PER_SEC: u64 = 1_000_000;

    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * 1_000)
    }

    /// Rounds to the nearest microsecond. Negative and NaN inputs become zero.
    pub fn from_secs_f32(secs: f32) -> Self {
        if secs.is_nan() || secs <= 0.0 {
            return Self::ZERO;
        }
        Self((f64::from(secs) * Self::MICROS_PER_SEC as f64).round() as u64)
    }

    pub const fn as_micros(self) -> u64 {
        self.0
    }

    pub fn as_secs_f32(self) -> f32 {
        (self.0 as f64 / Self::MICROS_PER_SEC as f64) as f32
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn saturating_sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(rhs.0))
    }
}

impl Add for SimTime {
    type Output = SimTime;
    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl AddAssign for SimTime {
    fn add_assign(&mut self, rhs: SimTime) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f32())
    }
}

/// Fixed-step simulation clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    now: SimTime,
    tick: u64,
    interval: SimTime,
}

impl SimClock {
    pub fn new(interval: SimTime) -> Self {
        Self {
            now: SimTime::ZERO,
            tick: 0,
            interval,
        }
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Number of ticks advanced so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn interval(&self) -> SimTime {
        self.interval
    }

    pub fn advance(&mut self) -> SimTime {
        self.now += self.interval;
        self.tick += 1;
        self.now
    }
}

/// Integer hit points with an upper bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitPoints {
    pub current: i32,
    pub maximum: i32,
}

impl HitPoints {
    pub fn full(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Applies a signed change and clamps to `[0, maximum]`.
    pub fn apply(&mut self, delta: i32) {
        self.current = self.current.saturating_add(delta).clamp(0, self.maximum);
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_time_rounds_to_nearest_micro() {
        assert_eq!(SimTime::from_secs_f32(0.4), SimTime(400_000));
        assert_eq!(SimTime::from_secs_f32(1.6), SimTime(1_600_000));
        assert_eq!(SimTime::from_secs_f32(-1.0), SimTime::ZERO);
    }

    #[test]
    fn hit_points_clamp_both_ways() {
        let mut hp = HitPoints::full(100);
        hp.apply(-250);
        assert_eq!(hp.current, 0);
        assert!(hp.is_depleted());
        hp.apply(500);
        assert_eq!(hp.current, 100);
    }

    #[test]
    fn flat_distance_ignores_height() {
        let here = Vec3::ZERO;
        let there = Vec3::new(0.0, 1.0, 2.0);
        assert_eq!(here.flat_distance_squared(there), 4.0);
        assert_eq!(here.distance_squared(there), 5.0);
    }

    #[test]
    fn clock_advances_by_interval() {
        let mut clock = SimClock::new(SimTime::from_millis(100));
        clock.advance();
        clock.advance();
        assert_eq!(clock.now(), SimTime::from_millis(200));
        assert_eq!(clock.tick(), 2);
    }
}
