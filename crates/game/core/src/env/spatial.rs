//! Spatial queries over the world.
//!
//! The action pipeline never walks the world itself to find victims; it asks
//! a [`SpatialOracle`]. Hosts with a physics scene plug in their own; the
//! [`NaiveSpatialOracle`] treats every actor as a sphere of
//! [`GameConfig::ACTOR_RADIUS`] and scans linearly.

use crate::config::GameConfig;
use crate::state::{ActorId, QueryMask, Vec3, World};

/// Oracle answering overlap and sweep queries.
///
/// Results are ordered nearest first; ties keep handle order.
pub trait SpatialOracle: Send + Sync {
    /// Actors whose collision sphere intersects the sphere at `center`.
    fn overlap_sphere(&self, world: &World, center: Vec3, radius: f32, mask: QueryMask)
    -> Vec<ActorId>;

    /// Actors hit by a box of `half_width` swept from `origin` along
    /// `direction` for `range` metres.
    fn cast_box(
        &self,
        world: &World,
        origin: Vec3,
        direction: Vec3,
        half_width: f32,
        range: f32,
        mask: QueryMask,
    ) -> Vec<ActorId>;
}

/// Linear-scan implementation of [`SpatialOracle`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NaiveSpatialOracle;

fn sort_by_distance(mut hits: Vec<(f32, ActorId)>) -> Vec<ActorId> {
    hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    hits.into_iter().map(|(_, id)| id).collect()
}

impl SpatialOracle for NaiveSpatialOracle {
    fn overlap_sphere(
        &self,
        world: &World,
        center: Vec3,
        radius: f32,
        mask: QueryMask,
    ) -> Vec<ActorId> {
        let reach = radius + GameConfig::ACTOR_RADIUS;
        let hits = world
            .actors()
            .filter(|a| mask.intersects(a.layer()))
            .filter_map(|a| {
                let d2 = center.distance_squared(a.position);
                (d2 <= reach * reach).then_some((d2, a.id))
            })
            .collect();
        sort_by_distance(hits)
    }

    fn cast_box(
        &self,
        world: &World,
        origin: Vec3,
        direction: Vec3,
        half_width: f32,
        range: f32,
        mask: QueryMask,
    ) -> Vec<ActorId> {
        let Some(dir) = direction.flat().normalized() else {
            return Vec::new();
        };
        let lateral_reach = half_width + GameConfig::ACTOR_RADIUS;
        let hits = world
            .actors()
            .filter(|a| mask.intersects(a.layer()))
            .filter_map(|a| {
                let offset = (a.position - origin).flat();
                let along = offset.dot(dir);
                if along < -GameConfig::ACTOR_RADIUS || along > range + GameConfig::ACTOR_RADIUS {
                    return None;
                }
                let lateral = (offset - dir * along).length();
                (lateral <= lateral_reach).then_some((along.max(0.0), a.id))
            })
            .collect();
        sort_by_distance(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ClassId;
    use crate::state::{ActorState, ActorTraits};

    fn world() -> World {
        let mut world = World::new();
        let pc = |id, x, z| {
            ActorState::new(ActorId(id), ClassId(0), ActorTraits::empty(), 10)
                .with_position(Vec3::new(x, 0.0, z))
        };
        world.insert(pc(1, 0.0, 0.0)).unwrap();
        world.insert(pc(2, 0.0, 3.0)).unwrap();
        world.insert(pc(3, 0.0, 1.5)).unwrap();
        world
            .insert(
                ActorState::new(ActorId(4), ClassId(1), ActorTraits::NPC, 10)
                    .with_position(Vec3::new(0.0, 0.0, 1.0)),
            )
            .unwrap();
        world
    }

    #[test]
    fn box_cast_orders_nearest_first_and_respects_mask() {
        let hits = NaiveSpatialOracle.cast_box(
            &world(),
            Vec3::ZERO,
            Vec3::FORWARD,
            0.5,
            4.0,
            QueryMask::PCS,
        );
        assert_eq!(hits, vec![ActorId(1), ActorId(3), ActorId(2)]);
    }

    #[test]
    fn overlap_sphere_filters_by_layer() {
        let hits =
            NaiveSpatialOracle.overlap_sphere(&world(), Vec3::ZERO, 1.0, QueryMask::NPCS);
        assert_eq!(hits, vec![ActorId(4)]);
    }
}
