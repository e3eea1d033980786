use super::{ActionBehavior, ideal_melee_foe};
use crate::action::{ActionRun, BuffableValue, InstanceView};
use crate::config::GameConfig;
use crate::state::Vec3;

/// Closer than this and the dash goes straight ahead for its full range.
const MIN_DASH_DISTANCE: f32 = 2.0;
/// The dash stops this far short of the requested point.
const STOP_SHORT: f32 = 1.0;

/// Blink to a point and strike on arrival.
///
/// The owner is immune to damage from exec time on. The teleport and the
/// strike both happen at `end`, so a cancelled dash goes nowhere.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashAttackLogic {
    destination: Vec3,
}

/// Where a dash toward `requested` lands, clamped to `range`.
fn dash_destination(origin: Vec3, forward: Vec3, requested: Vec3, range: f32) -> Vec3 {
    let mut spot = requested;
    if spot.is_zero() || origin.distance(spot) <= MIN_DASH_DISTANCE {
        spot = origin + forward * range;
    }
    spot = move_towards(origin, spot, range);
    move_towards(spot, origin, STOP_SHORT)
}

fn move_towards(from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_step || distance == 0.0 {
        return to;
    }
    from + delta * (max_step / distance)
}

impl ActionBehavior for DashAttackLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        let Some((origin, forward)) = run.me().map(|me| (me.position, me.forward)) else {
            return false;
        };
        self.destination = dash_destination(origin, forward, run.data.position, run.def.range);
        run.face_point(self.destination);
        true
    }

    fn end(&mut self, run: &mut ActionRun<'_, '_>) {
        let actor = run.actor();
        run.cx.world.set_position(actor, self.destination);
        let radius = run.def.radius;
        let preferred = run.data.first_target();
        if let Some(foe) = ideal_melee_foe(run, GameConfig::ACTOR_RADIUS, radius, preferred) {
            let amount = run.def.amount;
            run.damage(foe, amount);
        }
    }

    fn buff_value(&self, view: &InstanceView<'_>, buff: BuffableValue, value: &mut f32) {
        if buff == BuffableValue::PercentDamageReceived && view.reached_exec() {
            *value = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_is_clamped_and_stops_short() {
        let origin = Vec3::ZERO;
        let far = dash_destination(origin, Vec3::FORWARD, Vec3::new(0.0, 0.0, 20.0), 8.0);
        assert_eq!(far, Vec3::new(0.0, 0.0, 7.0));

        let near = dash_destination(origin, Vec3::FORWARD, Vec3::new(1.0, 0.0, 0.0), 8.0);
        assert_eq!(near, Vec3::new(0.0, 0.0, 7.0));

        let exact = dash_destination(origin, Vec3::FORWARD, Vec3::new(5.0, 0.0, 0.0), 8.0);
        assert_eq!(exact, Vec3::new(4.0, 0.0, 0.0));
    }
}
