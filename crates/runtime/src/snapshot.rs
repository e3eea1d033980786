//! Point-in-time copies of the replicated world.
//!
//! A [`WorldSnapshot`] holds the peer-visible state of every spawned actor.
//! It is what a late-joining peer needs before it can apply the deltas
//! published on [`Topic::Replication`](crate::Topic), and what
//! [`SnapshotStore`] persists.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use boss_room_core::{ActorId, GameEngine, ReplicatedActor, SimTime};

use crate::api::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub now: SimTime,
    /// Ordered by actor id.
    pub actors: Vec<ReplicatedActor>,
}

impl WorldSnapshot {
    pub fn capture(engine: &GameEngine) -> Self {
        Self {
            tick: engine.current_tick(),
            now: engine.now(),
            actors: engine.world().actors().map(ReplicatedActor::from).collect(),
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&ReplicatedActor> {
        self.actors
            .binary_search_by_key(&id, |actor| actor.id)
            .ok()
            .map(|index| &self.actors[index])
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Directory of bincode snapshots, one file per tick.
///
/// Files are named `snapshot_{tick}.bin` and written through a temporary
/// file plus rename so a crash never leaves a half-written snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    base_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn path(&self, tick: u64) -> PathBuf {
        self.base_dir.join(format!("snapshot_{tick}.bin"))
    }

    pub fn save(&self, snapshot: &WorldSnapshot) -> Result<PathBuf> {
        let path = self.path(snapshot.tick);
        let temp_path = path.with_extension("bin.tmp");
        fs::write(&temp_path, snapshot.encode()?)?;
        fs::rename(&temp_path, &path)?;
        tracing::debug!(tick = snapshot.tick, path = %path.display(), "saved snapshot");
        Ok(path)
    }

    pub fn load(&self, tick: u64) -> Result<Option<WorldSnapshot>> {
        let path = self.path(tick);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        WorldSnapshot::decode(&bytes).map(Some)
    }

    /// Ticks with a stored snapshot, ascending.
    pub fn ticks(&self) -> Result<Vec<u64>> {
        let mut ticks = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let name = entry?.file_name();
            if let Some(tick) = name
                .to_str()
                .and_then(|n| n.strip_prefix("snapshot_"))
                .and_then(|n| n.strip_suffix(".bin"))
                .and_then(|n| n.parse::<u64>().ok())
            {
                ticks.push(tick);
            }
        }
        ticks.sort_unstable();
        Ok(ticks)
    }

    pub fn latest(&self) -> Result<Option<WorldSnapshot>> {
        match self.ticks()?.last() {
            Some(&tick) => self.load(tick),
            None => Ok(None),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boss_room_core::{HitPoints, LifeState, Vec3};
    use tempfile::TempDir;

    fn snapshot(tick: u64) -> WorldSnapshot {
        let actor = ReplicatedActor {
            id: ActorId(3),
            hit_points: HitPoints::full(40),
            life_state: LifeState::Alive,
            is_stealthy: false,
            target: Some(ActorId(9)),
            held_object: None,
            position: Vec3::new(1.0, 0.0, -2.0),
            active_action: None,
        };
        WorldSnapshot {
            tick,
            now: SimTime::from_millis(tick * 100),
            actors: vec![actor],
        }
    }

    #[test]
    fn lookup_by_actor_id() {
        let snap = snapshot(1);
        assert_eq!(snap.actor(ActorId(3)).map(|a| a.target), Some(Some(ActorId(9))));
        assert!(snap.actor(ActorId(4)).is_none());
    }

    #[test]
    fn truncated_bytes_fail_to_decode() {
        let bytes = snapshot(1).encode().unwrap();
        assert!(WorldSnapshot::decode(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn store_keeps_one_file_per_tick() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("snapshots")).unwrap();

        store.save(&snapshot(12)).unwrap();
        store.save(&snapshot(3)).unwrap();

        assert_eq!(store.ticks().unwrap(), vec![3, 12]);
        assert_eq!(store.latest().unwrap(), Some(snapshot(12)));
        assert_eq!(store.load(5).unwrap(), None);
    }
}
