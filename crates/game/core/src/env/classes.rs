use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::action::ActionId;
use crate::config::GameConfig;
use crate::state::ActorTraits;

/// Identifier of a character class (archer, imp, boss, pot, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassId(pub u16);

/// Skills a class can use, in slot order.
pub type SkillSet = ArrayVec<ActionId, { GameConfig::MAX_SKILLS }>;

/// Static description of a character class.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterClass {
    pub id: ClassId,
    pub name: String,
    /// NPC classes are driven by an AI brain.
    pub is_npc: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: ActorTraits,
    pub base_hp: i32,
    /// Radius within which an idle NPC notices player characters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub detect_range: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub move_speed: Option<f32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: SkillSet,
}

impl CharacterClass {
    pub fn new(id: ClassId, name: impl Into<String>, base_hp: i32) -> Self {
        Self {
            id,
            name: name.into(),
            is_npc: false,
            traits: ActorTraits::empty(),
            base_hp,
            detect_range: 0.0,
            move_speed: None,
            skills: SkillSet::new(),
        }
    }

    pub fn npc(mut self, detect_range: f32) -> Self {
        self.is_npc = true;
        self.traits |= ActorTraits::NPC;
        self.detect_range = detect_range;
        self
    }

    pub fn with_traits(mut self, traits: ActorTraits) -> Self {
        self.traits |= traits;
        self
    }

    /// Adds a skill slot. Extra skills beyond the slot limit are ignored.
    pub fn with_skill(mut self, skill: ActionId) -> Self {
        let _ = self.skills.try_push(skill);
        self
    }

    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = Some(speed);
        self
    }

    /// Traits an actor of this class is spawned with.
    pub fn spawn_traits(&self) -> ActorTraits {
        if self.is_npc {
            self.traits | ActorTraits::NPC
        } else {
            self.traits
        }
    }
}

/// Oracle providing character class definitions.
pub trait ClassOracle: Send + Sync {
    fn class(&self, id: ClassId) -> Option<&CharacterClass>;
}

/// In-memory class table.
#[derive(Clone, Debug, Default)]
pub struct ClassCatalog {
    classes: BTreeMap<ClassId, CharacterClass>,
}

impl ClassCatalog {
    pub fn new(classes: impl IntoIterator<Item = CharacterClass>) -> Self {
        Self {
            classes: classes.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn insert(&mut self, class: CharacterClass) {
        self.classes.insert(class.id, class);
    }

    pub fn by_name(&self, name: &str) -> Option<&CharacterClass> {
        self.classes.values().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterClass> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassOracle for ClassCatalog {
    fn class(&self, id: ClassId) -> Option<&CharacterClass> {
        self.classes.get(&id)
    }
}
