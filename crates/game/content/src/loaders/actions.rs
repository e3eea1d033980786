//! Action catalog loader.
//!
//! Loads action definitions and the prototype roles (general chase, general
//! target, stun) from RON, resolving roles by action name.

use std::path::Path;

use boss_room_core::{ActionDefinition, ActionId, ActionRegistry};

use crate::loaders::{LoadResult, read_file};

/// On-disk shape of the action catalog.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ActionCatalog {
    pub general_chase: String,
    #[serde(default)]
    pub general_target: Option<String>,
    #[serde(default)]
    pub stun: Option<String>,
    pub actions: Vec<ActionDefinition>,
}

impl ActionCatalog {
    fn id_of(&self, role: &str, name: &str) -> LoadResult<ActionId> {
        self.actions
            .iter()
            .find(|def| def.name == name)
            .map(|def| def.id)
            .ok_or_else(|| anyhow::anyhow!("{} action '{}' is not in the catalog", role, name))
    }

    /// Validates the catalog into a registry.
    pub fn into_registry(self) -> LoadResult<ActionRegistry> {
        let chase = self.id_of("general chase", &self.general_chase)?;
        let target = self
            .general_target
            .as_deref()
            .map(|name| self.id_of("general target", name))
            .transpose()?;
        let stun = self
            .stun
            .as_deref()
            .map(|name| self.id_of("stun", name))
            .transpose()?;

        let mut builder = ActionRegistry::builder()
            .definitions(self.actions)
            .general_chase(chase);
        if let Some(target) = target {
            builder = builder.general_target(target);
        }
        if let Some(stun) = stun {
            builder = builder.stun(stun);
        }
        let registry = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid action catalog: {}", e))?;
        tracing::debug!(actions = registry.len(), "action catalog loaded");
        Ok(registry)
    }
}

/// Loader for the action catalog from RON files.
pub struct ActionLoader;

impl ActionLoader {
    pub fn load(path: &Path) -> LoadResult<ActionRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ActionRegistry> {
        let catalog: ActionCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse action catalog RON: {}", e))?;
        catalog.into_registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boss_room_core::{ActionLogic, BlockingMode};

    #[test]
    fn embedded_catalog_is_valid() {
        let registry = ActionLoader::parse(crate::loaders::embedded::ACTIONS).unwrap();

        let chase = registry.get(registry.general_chase()).unwrap();
        assert_eq!(chase.logic, ActionLogic::Chase);
        let target = registry.get(registry.general_target().unwrap()).unwrap();
        assert_eq!(target.blocking_mode, BlockingMode::OnlyDuringExecTime);
        assert_eq!(
            registry.stun().and_then(|id| registry.get(id)).map(|d| d.logic),
            Some(ActionLogic::Stunned)
        );

        let shot = registry.by_name("archer_charged_shot").unwrap();
        assert_eq!(shot.projectiles.len(), 3);
        assert_eq!(shot.projectiles[2].max_victims, 3);
        assert_eq!(shot.projectiles[0].max_victims, 1);
    }

    #[test]
    fn unknown_role_name_is_rejected() {
        let text = r#"(
            general_chase: "missing",
            actions: [(id: ActionId(0), name: "chase", logic: Chase)],
        )"#;
        let err = ActionLoader::parse(text).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn registry_validation_surfaces() {
        let text = r#"(
            general_chase: "chase",
            actions: [
                (id: ActionId(0), name: "chase", logic: Chase),
                (id: ActionId(1), name: "late", logic: Melee, exec_time_seconds: 2.0, duration_seconds: 1.0),
            ],
        )"#;
        let err = ActionLoader::parse(text).unwrap_err();
        assert!(err.to_string().contains("Invalid action catalog"));
    }
}
