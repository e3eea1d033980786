//! Headless host for one boss-room session.
//!
//! Loads content, spawns an encounter, and lets the runtime tick on its own
//! timer until the configured run time elapses or Ctrl-C arrives. Every
//! presentation event is appended to `events.jsonl` in the session
//! directory, and the final world state is saved as a bincode snapshot.
mod config;
mod logging;

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use boss_room_content::loaders::embedded;
use boss_room_content::{Content, ContentFactory, Encounter, EncounterLoader};
use boss_room_runtime::{Event, Runtime, RuntimeConfig, RuntimeHandle, SnapshotStore, Topic};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    let session = logging::init(config.session_id.as_deref())?;

    let (mut content, encounter) = load_content(&config)?;
    if let Some(hz) = config.tick_rate_hz {
        content.config.tick_rate_hz = hz;
    }
    let spawns = encounter.spawn_requests(&content.classes)?;

    let runtime_config = RuntimeConfig {
        game_config: content.config.clone(),
        event_buffer_size: config.event_buffer,
        command_buffer_size: config.command_buffer,
        auto_tick: true,
    };
    let runtime = Runtime::builder()
        .content(content)
        .config(runtime_config)
        .build()
        .await?;
    let handle = runtime.handle();

    let recorder = spawn_recorder(
        runtime.subscribe(Topic::Presentation),
        &session.dir.join("events.jsonl"),
    )?;

    for spawn in spawns {
        handle.spawn(spawn).await?;
    }
    tracing::info!(
        encounter = %encounter.name,
        actors = encounter.spawns.len(),
        "encounter ready"
    );

    wait_for_shutdown(config.run_seconds).await;

    save_snapshot(&handle, &session.dir).await?;
    drop(handle);
    runtime.shutdown().await?;
    recorder.await.context("event recorder panicked")?;

    tracing::info!(session = %session.id, "session finished");
    Ok(())
}

fn load_content(config: &ServerConfig) -> Result<(Content, Encounter)> {
    match &config.content_dir {
        Some(dir) => {
            let factory = ContentFactory::new(dir);
            tracing::info!(dir = %factory.data_dir().display(), "loading content");
            Ok((
                factory.load_content()?,
                factory.load_encounter(&config.encounter)?,
            ))
        }
        None => {
            tracing::info!("loading embedded content");
            if config.encounter != "boss_arena" {
                anyhow::bail!(
                    "Encounter '{}' needs CONTENT_DIR; only boss_arena is embedded",
                    config.encounter
                );
            }
            Ok((
                Content::embedded()?,
                EncounterLoader::parse(embedded::BOSS_ARENA)?,
            ))
        }
    }
}

/// Appends every presentation event as one JSON line.
fn spawn_recorder(
    mut events: broadcast::Receiver<Event>,
    path: &Path,
) -> Result<JoinHandle<()>> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create event log: {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);

    Ok(tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Err(e) = serde_json::to_writer(&mut writer, &event)
                        .map_err(std::io::Error::from)
                        .and_then(|()| writer.write_all(b"\n"))
                    {
                        tracing::warn!(error = %e, "event log write failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event recorder lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        if let Err(e) = writer.flush() {
            tracing::warn!(error = %e, "event log flush failed");
        }
    }))
}

async fn wait_for_shutdown(run_seconds: u64) {
    let limit = async {
        if run_seconds == 0 {
            std::future::pending::<()>().await;
        } else {
            tokio::time::sleep(Duration::from_secs(run_seconds)).await;
        }
    };
    tokio::select! {
        _ = limit => tracing::info!(run_seconds, "run time elapsed"),
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("interrupted"),
            Err(e) => tracing::warn!(error = %e, "failed to listen for Ctrl-C"),
        },
    }
}

async fn save_snapshot(handle: &RuntimeHandle, session_dir: &Path) -> Result<()> {
    let snapshot = handle.snapshot().await?;
    let store = SnapshotStore::new(session_dir.join("snapshots"))?;
    let path = store.save(&snapshot)?;
    let alive = snapshot
        .actors
        .iter()
        .filter(|actor| actor.life_state == boss_room_core::LifeState::Alive)
        .count();
    tracing::info!(
        tick = snapshot.tick,
        actors = snapshot.actors.len(),
        alive,
        path = %path.display(),
        "saved final snapshot"
    );
    Ok(())
}
