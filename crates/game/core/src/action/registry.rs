//! Load-time catalog of action definitions.
//!
//! The registry is assembled once from content, validated, and then shared
//! read-only (behind an `Arc`) by the engine, the pool and every instance.
//! Everything that could make a request fail structurally (missing chase
//! prototype, projectile logics without projectiles) is rejected here so the
//! tick never has to.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::action::{ActionDefinition, ActionId, ActionLogic, RegistryError};

/// Validated, immutable map of [`ActionId`] to [`ActionDefinition`].
#[derive(Clone, Debug)]
pub struct ActionRegistry {
    definitions: BTreeMap<ActionId, Arc<ActionDefinition>>,
    general_chase: ActionId,
    general_target: Option<ActionId>,
    stun: Option<ActionId>,
}

impl ActionRegistry {
    pub fn builder() -> ActionRegistryBuilder {
        ActionRegistryBuilder::default()
    }

    pub fn get(&self, id: ActionId) -> Option<&ActionDefinition> {
        self.definitions.get(&id).map(Arc::as_ref)
    }

    pub(crate) fn get_shared(&self, id: ActionId) -> Option<&Arc<ActionDefinition>> {
        self.definitions.get(&id)
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn by_name(&self, name: &str) -> Option<&ActionDefinition> {
        self.definitions
            .values()
            .find(|d| d.name == name)
            .map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.definitions.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Chase prototype synthesized ahead of closing attacks.
    pub fn general_chase(&self) -> ActionId {
        self.general_chase
    }

    /// Target prototype synthesized ahead of single-target actions.
    pub fn general_target(&self) -> Option<ActionId> {
        self.general_target
    }

    /// Action a stunned trampler chains into.
    pub fn stun(&self) -> Option<ActionId> {
        self.stun
    }
}

/// Collects definitions and prototype roles, then validates them.
#[derive(Clone, Debug, Default)]
pub struct ActionRegistryBuilder {
    definitions: Vec<ActionDefinition>,
    general_chase: Option<ActionId>,
    general_target: Option<ActionId>,
    stun: Option<ActionId>,
}

impl ActionRegistryBuilder {
    pub fn definition(mut self, definition: ActionDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn definitions(mut self, definitions: impl IntoIterator<Item = ActionDefinition>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    pub fn general_chase(mut self, id: ActionId) -> Self {
        self.general_chase = Some(id);
        self
    }

    pub fn general_target(mut self, id: ActionId) -> Self {
        self.general_target = Some(id);
        self
    }

    pub fn stun(mut self, id: ActionId) -> Self {
        self.stun = Some(id);
        self
    }

    /// Validates every definition and the prototype roles.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] found. Validation order follows
    /// definition order, then roles.
    pub fn build(self) -> Result<ActionRegistry, RegistryError> {
        let mut definitions = BTreeMap::new();
        for definition in self.definitions {
            validate_definition(&definition)?;
            let id = definition.id;
            if definitions.insert(id, Arc::new(definition)).is_some() {
                return Err(RegistryError::DuplicateId(id));
            }
        }

        for definition in definitions.values() {
            if let Some(other) = definition
                .interruptible_by
                .iter()
                .find(|other| !definitions.contains_key(*other))
            {
                return Err(RegistryError::UnknownInterrupter {
                    id: definition.id,
                    other: *other,
                });
            }
        }

        let general_chase = self.general_chase.ok_or(RegistryError::MissingGeneralChase)?;
        check_role(&definitions, "general chase", general_chase, ActionLogic::Chase)?;
        if let Some(id) = self.general_target {
            check_role(&definitions, "general target", id, ActionLogic::Target)?;
        }
        if let Some(id) = self.stun {
            check_role(&definitions, "stun", id, ActionLogic::Stunned)?;
        }

        Ok(ActionRegistry {
            definitions,
            general_chase,
            general_target: self.general_target,
            stun: self.stun,
        })
    }
}

fn check_role(
    definitions: &BTreeMap<ActionId, Arc<ActionDefinition>>,
    role: &'static str,
    id: ActionId,
    expected: ActionLogic,
) -> Result<(), RegistryError> {
    let definition = definitions
        .get(&id)
        .ok_or(RegistryError::UnknownPrototype { role, id })?;
    if definition.logic != expected {
        return Err(RegistryError::WrongPrototypeLogic {
            role,
            id,
            expected,
            found: definition.logic,
        });
    }
    Ok(())
}

fn validate_definition(definition: &ActionDefinition) -> Result<(), RegistryError> {
    let id = definition.id;
    let non_negative = [
        ("range", definition.range),
        ("exec_time_seconds", definition.exec_time_seconds),
        ("effect_duration_seconds", definition.effect_duration_seconds),
        ("reuse_time_seconds", definition.reuse_time_seconds),
        ("radius", definition.radius),
        ("move_speed", definition.move_speed),
        ("knockback_speed", definition.knockback_speed),
        ("knockback_duration", definition.knockback_duration),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(RegistryError::InvalidTunable { id, field });
        }
    }
    // Non-positive durations are the "indefinite" sentinel, so only finiteness matters.
    if !definition.duration_seconds.is_finite() {
        return Err(RegistryError::InvalidTunable {
            id,
            field: "duration_seconds",
        });
    }
    if definition.is_expirable() && definition.exec_time_seconds > definition.duration_seconds {
        return Err(RegistryError::ExecTimeBeyondDuration {
            id,
            exec: definition.exec_time_seconds,
            duration: definition.duration_seconds,
        });
    }
    if definition.logic.needs_projectile() && definition.projectiles.is_empty() {
        return Err(RegistryError::MissingProjectiles {
            id,
            logic: definition.logic,
        });
    }
    for projectile in &definition.projectiles {
        if !(projectile.speed_mps.is_finite() && projectile.speed_mps > 0.0) {
            return Err(RegistryError::InvalidTunable {
                id,
                field: "projectiles.speed_mps",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{BlockingMode, ProjectileInfo};
    use crate::error::GameError;

    fn chase() -> ActionDefinition {
        ActionDefinition::new(ActionId(1), "chase", ActionLogic::Chase)
    }

    #[test]
    fn builds_with_roles() {
        let registry = ActionRegistry::builder()
            .definition(chase())
            .definition(
                ActionDefinition::new(ActionId(2), "target", ActionLogic::Target)
                    .with_blocking(BlockingMode::OnlyDuringExecTime),
            )
            .general_chase(ActionId(1))
            .general_target(ActionId(2))
            .build()
            .unwrap();

        assert_eq!(registry.general_chase(), ActionId(1));
        assert_eq!(registry.general_target(), Some(ActionId(2)));
        assert_eq!(registry.by_name("target").map(|d| d.id), Some(ActionId(2)));
    }

    #[test]
    fn missing_chase_is_fatal() {
        let err = ActionRegistry::builder().definition(chase()).build().unwrap_err();
        assert_eq!(err, RegistryError::MissingGeneralChase);
        assert_eq!(err.error_code(), "REGISTRY_MISSING_GENERAL_CHASE");
    }

    #[test]
    fn chase_role_must_use_chase_logic() {
        let err = ActionRegistry::builder()
            .definition(ActionDefinition::new(ActionId(1), "swing", ActionLogic::Melee))
            .general_chase(ActionId(1))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::WrongPrototypeLogic {
                expected: ActionLogic::Chase,
                found: ActionLogic::Melee,
                ..
            }
        ));
    }

    #[test]
    fn rejects_duplicates_and_bad_timing() {
        let err = ActionRegistry::builder()
            .definition(chase())
            .definition(chase())
            .general_chase(ActionId(1))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId(ActionId(1)));

        let err = ActionRegistry::builder()
            .definition(chase())
            .definition(
                ActionDefinition::new(ActionId(5), "slow", ActionLogic::Melee).with_timing(2.0, 1.0),
            )
            .general_chase(ActionId(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::ExecTimeBeyondDuration { .. }));
    }

    #[test]
    fn projectile_logics_need_projectiles() {
        let bolt = ActionDefinition::new(ActionId(3), "bolt", ActionLogic::LaunchProjectile);
        let err = ActionRegistry::builder()
            .definition(chase())
            .definition(bolt.clone())
            .general_chase(ActionId(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::MissingProjectiles { .. }));

        let registry = ActionRegistry::builder()
            .definition(chase())
            .definition(bolt.with_projectile(ProjectileInfo {
                prefab: "arrow".into(),
                speed_mps: 20.0,
                range: 20.0,
                damage: 5,
                max_victims: 1,
            }))
            .general_chase(ActionId(1))
            .build();
        assert!(registry.is_ok());
    }
}
