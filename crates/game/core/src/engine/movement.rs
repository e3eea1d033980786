//! Straight-line kinematic stand-in for character movement.
//!
//! No navigation mesh: pathing walks straight at the destination, following
//! walks straight at the target. Forced movement (charges, knockbacks) runs
//! until its deadline and cannot be overridden by input.

use crate::state::{ActorState, MovementState, SimTime, Vec3, World};

/// Metres a follower may end up inside its stop distance, so the chase
/// range check that uses a strict comparison is satisfied on arrival.
const FOLLOW_OVERLAP: f32 = 0.1;

/// Result of integrating one actor for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Step {
    pub position: Vec3,
    pub movement: MovementState,
    /// New facing, when the actor turned toward where it walks.
    pub facing: Option<Vec3>,
}

fn toward(from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
    let delta = (to - from).flat();
    let distance = delta.length();
    if distance <= max_step || distance == 0.0 {
        return Vec3::new(to.x, from.y, to.z);
    }
    from + delta * (max_step / distance)
}

pub(super) fn advance(actor: &ActorState, world: &World, now: SimTime, dt: f32) -> Step {
    let position = actor.position;
    let walk = actor.move_speed * dt;
    let stay = Step {
        position,
        movement: actor.movement,
        facing: None,
    };
    match actor.movement {
        MovementState::Idle => stay,
        MovementState::PathTo { destination } => {
            let next = toward(position, destination, walk);
            let arrived = (destination - next).flat().length_squared() <= f32::EPSILON;
            Step {
                position: next,
                movement: if arrived {
                    MovementState::Idle
                } else {
                    actor.movement
                },
                facing: Some(destination - position),
            }
        }
        MovementState::Follow {
            target,
            stop_distance,
        } => {
            let Some(there) = world.position(target) else {
                return Step {
                    movement: MovementState::Idle,
                    ..stay
                };
            };
            let distance = (there - position).flat().length();
            let max_step = (distance - stop_distance + FOLLOW_OVERLAP).clamp(0.0, distance);
            Step {
                position: toward(position, there, walk.min(max_step)),
                movement: actor.movement,
                facing: Some(there - position),
            }
        }
        MovementState::Charge { speed, until } => {
            if now >= until {
                return Step {
                    movement: MovementState::Idle,
                    ..stay
                };
            }
            Step {
                position: position + actor.forward * (speed * dt),
                movement: actor.movement,
                facing: None,
            }
        }
        MovementState::Knockback { velocity, until } => {
            if now >= until {
                return Step {
                    movement: MovementState::Idle,
                    ..stay
                };
            }
            Step {
                position: position + velocity * dt,
                movement: actor.movement,
                facing: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ClassId;
    use crate::state::{ActorId, ActorTraits};

    fn walker(movement: MovementState) -> ActorState {
        let mut actor = ActorState::new(ActorId(1), ClassId(0), ActorTraits::empty(), 10)
            .with_move_speed(5.0);
        actor.movement = movement;
        actor
    }

    #[test]
    fn path_arrives_and_idles() {
        let world = World::new();
        let actor = walker(MovementState::PathTo {
            destination: Vec3::new(0.0, 0.0, 0.4),
        });
        let step = advance(&actor, &world, SimTime::ZERO, 0.1);
        assert_eq!(step.position, Vec3::new(0.0, 0.0, 0.4));
        assert_eq!(step.movement, MovementState::Idle);
    }

    #[test]
    fn follow_stops_just_inside_range() {
        let mut world = World::new();
        world
            .insert(walker(MovementState::Idle).with_position(Vec3::new(0.0, 0.0, 2.0)))
            .unwrap();
        let mut chaser = walker(MovementState::Follow {
            target: ActorId(1),
            stop_distance: 1.5,
        });
        chaser.id = ActorId(2);

        let step = advance(&chaser, &world, SimTime::ZERO, 1.0);
        let left = (Vec3::new(0.0, 0.0, 2.0) - step.position).length();
        assert!(left < 1.5 && left > 1.3, "left {left}");
    }

    #[test]
    fn forced_movement_expires() {
        let world = World::new();
        let actor = walker(MovementState::Knockback {
            velocity: Vec3::new(1.0, 0.0, 0.0),
            until: SimTime::from_millis(100),
        });
        let moving = advance(&actor, &world, SimTime::ZERO, 0.1);
        assert!(moving.position.x > 0.0);
        let done = advance(&actor, &world, SimTime::from_millis(100), 0.1);
        assert_eq!(done.movement, MovementState::Idle);
        assert_eq!(done.position, actor.position);
    }
}
