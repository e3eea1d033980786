//! Encounter layout loader.

use std::path::Path;

use boss_room_core::{ClassCatalog, SpawnRequest, Vec3};

use crate::loaders::{LoadResult, read_file};

/// One actor placed by an encounter, by class name.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct SpawnSpec {
    pub class: String,
    pub position: Vec3,
    #[serde(default)]
    pub facing: Option<Vec3>,
}

/// Initial placement of every actor in an arena.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Encounter {
    pub name: String,
    pub spawns: Vec<SpawnSpec>,
}

impl Encounter {
    /// Resolves class names into spawn requests, in file order.
    pub fn spawn_requests(&self, classes: &ClassCatalog) -> LoadResult<Vec<SpawnRequest>> {
        self.spawns
            .iter()
            .map(|spec| {
                let class = classes.by_name(&spec.class).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Encounter '{}' places unknown class '{}'",
                        self.name,
                        spec.class
                    )
                })?;
                let mut request = SpawnRequest::new(class.id, spec.position);
                request.facing = spec.facing;
                Ok(request)
            })
            .collect()
    }
}

/// Loader for encounter layouts from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<Encounter> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Encounter> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::{ClassLoader, embedded};

    #[test]
    fn boss_arena_resolves() {
        let classes = ClassLoader::parse(embedded::CLASSES).unwrap();
        let arena = EncounterLoader::parse(embedded::BOSS_ARENA).unwrap();

        let spawns = arena.spawn_requests(&classes).unwrap();
        assert_eq!(spawns.len(), arena.spawns.len());
        let boss = spawns.last().unwrap();
        assert_eq!(Some(boss.class), classes.by_name("imp_boss").map(|c| c.id));
        assert_eq!(boss.facing, Some(Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn unknown_class_is_reported() {
        let classes = ClassLoader::parse(embedded::CLASSES).unwrap();
        let arena = Encounter {
            name: "empty".into(),
            spawns: vec![SpawnSpec {
                class: "dragon".into(),
                position: Vec3::ZERO,
                facing: None,
            }],
        };
        let err = arena.spawn_requests(&classes).unwrap_err();
        assert!(err.to_string().contains("dragon"));
    }
}
