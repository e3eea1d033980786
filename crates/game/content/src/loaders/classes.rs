//! Character class loader.

use std::collections::BTreeSet;
use std::path::Path;

use boss_room_core::{CharacterClass, ClassCatalog};

use crate::loaders::{LoadResult, read_file};

/// Loader for character classes from RON files.
///
/// RON format: `Vec<CharacterClass>`. Class ids and names must be unique.
pub struct ClassLoader;

impl ClassLoader {
    pub fn load(path: &Path) -> LoadResult<ClassCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ClassCatalog> {
        let classes: Vec<CharacterClass> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse class catalog RON: {}", e))?;

        let mut ids = BTreeSet::new();
        let mut names = BTreeSet::new();
        for class in &classes {
            if !ids.insert(class.id) {
                anyhow::bail!("Duplicate class id {:?}", class.id);
            }
            if !names.insert(class.name.as_str()) {
                anyhow::bail!("Duplicate class name '{}'", class.name);
            }
            if class.base_hp <= 0 {
                anyhow::bail!("Class '{}' must have positive base_hp", class.name);
            }
        }
        Ok(ClassCatalog::new(classes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boss_room_core::{ActorTraits, ClassId};

    #[test]
    fn embedded_classes_parse() {
        let catalog = ClassLoader::parse(crate::loaders::embedded::CLASSES).unwrap();

        let boss = catalog.by_name("imp_boss").unwrap();
        assert!(boss.is_npc);
        assert_eq!(boss.move_speed, Some(3.5));
        assert_eq!(boss.skills.len(), 2);

        let pillar = catalog.by_name("stun_pillar").unwrap();
        assert_eq!(
            pillar.traits,
            ActorTraits::BREAKABLE | ActorTraits::STUN_ON_TRAMPLE
        );
        assert_eq!(catalog.by_name("tank").map(|c| c.id), Some(ClassId(1)));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let text = r#"[
            (id: ClassId(1), name: "imp", is_npc: true, base_hp: 10),
            (id: ClassId(2), name: "imp", is_npc: true, base_hp: 10),
        ]"#;
        assert!(ClassLoader::parse(text).is_err());
    }
}
