//! Content factory for loading everything a session needs.

use std::path::{Path, PathBuf};

use boss_room_core::{ActionRegistry, ClassCatalog, GameConfig};

use crate::loaders::{
    ActionLoader, ClassLoader, ConfigLoader, Encounter, EncounterLoader, LoadResult, embedded,
};

/// Everything a session is built from.
#[derive(Debug)]
pub struct Content {
    pub config: GameConfig,
    pub actions: ActionRegistry,
    pub classes: ClassCatalog,
}

impl Content {
    /// Cross-checks classes against the action catalog.
    pub fn new(config: GameConfig, actions: ActionRegistry, classes: ClassCatalog) -> LoadResult<Self> {
        for class in classes.iter() {
            if let Some(skill) = class.skills.iter().find(|id| !actions.contains(**id)) {
                anyhow::bail!("Class '{}' uses unknown action {}", class.name, skill);
            }
        }
        Ok(Self {
            config,
            actions,
            classes,
        })
    }

    /// The default content compiled into this crate.
    pub fn embedded() -> LoadResult<Self> {
        Self::new(
            ConfigLoader::parse(embedded::CONFIG)?,
            ActionLoader::parse(embedded::ACTIONS)?,
            ClassLoader::parse(embedded::CLASSES)?,
        )
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── actions.ron
/// ├── classes.ron
/// └── encounters/
///     └── boss_arena.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the action catalog from `actions.ron`.
    pub fn load_actions(&self) -> LoadResult<ActionRegistry> {
        ActionLoader::load(&self.data_dir.join("actions.ron"))
    }

    /// Load character classes from `classes.ron`.
    pub fn load_classes(&self) -> LoadResult<ClassCatalog> {
        ClassLoader::load(&self.data_dir.join("classes.ron"))
    }

    /// Load an encounter from `encounters/{name}.ron`.
    pub fn load_encounter(&self, name: &str) -> LoadResult<Encounter> {
        let path = self.data_dir.join("encounters").join(format!("{}.ron", name));
        EncounterLoader::load(&path)
    }

    /// Load config, actions and classes together.
    pub fn load_content(&self) -> LoadResult<Content> {
        Content::new(self.load_config()?, self.load_actions()?, self.load_classes()?)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_content_is_consistent() {
        let content = Content::embedded().unwrap();
        assert!(content.actions.len() > 10);
        assert!(!content.classes.is_empty());
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "game_seed = 5").unwrap();
        std::fs::write(dir.path().join("actions.ron"), embedded::ACTIONS).unwrap();
        std::fs::write(dir.path().join("classes.ron"), embedded::CLASSES).unwrap();
        std::fs::create_dir(dir.path().join("encounters")).unwrap();
        std::fs::write(
            dir.path().join("encounters").join("boss_arena.ron"),
            embedded::BOSS_ARENA,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        let content = factory.load_content().unwrap();
        assert_eq!(content.config.game_seed, 5);
        assert_eq!(factory.load_encounter("boss_arena").unwrap().name, "boss_arena");
        assert!(factory.load_encounter("missing").is_err());
    }

    #[test]
    fn class_with_unknown_skill_is_rejected() {
        let actions = ActionLoader::parse(embedded::ACTIONS).unwrap();
        let classes = ClassLoader::parse(
            r#"[(id: ClassId(1), name: "x", is_npc: false, base_hp: 1, skills: [ActionId(999)])]"#,
        )
        .unwrap();
        assert!(Content::new(GameConfig::default(), actions, classes).is_err());
    }
}
