//=========================================================================
// Progress Integration Tests
//=========================================================================
//
// Saving and loading through the engine facade and through a scene,
// with the local store on disk and an in-memory cloud.
//
//=========================================================================

mod common;

use common::*;
use tempfile::TempDir;
use tunnel_engine::core::services::{FileProgressStore, LoadState, MemoryProgressStore};
use tunnel_engine::prelude::*;

fn engine_with_stores(
    dir: &TempDir,
    cloud: &MemoryProgressStore,
    interval: u32,
) -> Engine<ChannelEventSource, VirtualDisplay> {
    let (_sender, events) = ChannelEventSource::channel();
    EngineBuilder::new()
        .with_checkpoint_interval(interval)
        .with_cloud_save(true)
        .with_local_store(FileProgressStore::new(dir.path()))
        .with_cloud_store(cloud.clone())
        .build(events, VirtualDisplay::new())
        .unwrap()
}

#[test]
fn cloud_saves_only_on_checkpoints_or_when_forced() {
    let dir = TempDir::new().unwrap();
    let cloud = MemoryProgressStore::new();
    let mut engine = engine_with_stores(&dir, &cloud, 5);

    assert!(engine.is_cloud_save_enabled());

    assert!(engine.save_progress(10, false));
    assert_eq!(cloud.saved_level(), Some(10), "Level 10 is a checkpoint");

    assert!(engine.save_progress(11, false));
    assert_eq!(cloud.saved_level(), Some(10), "Level 11 is not a checkpoint");

    assert!(engine.save_progress(11, true));
    assert_eq!(cloud.saved_level(), Some(11), "Forced save reaches the cloud");

    let local = FileProgressStore::new(dir.path());
    assert!(local.path_for("progress").exists(), "Local save always written");
}

#[test]
fn load_takes_highest_level_of_both_stores() {
    let dir = TempDir::new().unwrap();
    let cloud = MemoryProgressStore::new();

    {
        let mut engine = engine_with_stores(&dir, &cloud, 5);
        engine.save_progress(15, false);
        engine.save_progress(17, false);
    }

    let mut engine = engine_with_stores(&dir, &cloud, 5);
    let loader = engine.begin_saved_game_load();
    assert_eq!(loader.state(), &LoadState::LoadingCloud);
    assert_eq!(loader.run_to_completion(), &LoadState::Completed);
    assert_eq!(loader.level_loaded(), 17);
    assert_eq!(engine.data_state_machine().loading_percentage(), 100);
}

#[test]
fn load_without_any_save_starts_at_zero() {
    let dir = TempDir::new().unwrap();
    let cloud = MemoryProgressStore::new();
    let mut engine = engine_with_stores(&dir, &cloud, 4);

    let loader = engine.begin_saved_game_load();
    loader.run_to_completion();

    assert!(loader.is_loading_completed());
    assert_eq!(loader.level_loaded(), 0);
}

//=== Saving From a Scene =================================================

struct SavingScene {
    level: u32,
}

impl Scene for SavingScene {
    fn do_frame(&mut self, ctx: &mut SceneContext<'_>) {
        let progress = ctx.services_mut().progress_mut();
        if progress.save_progress(self.level, false) {
            self.level += 1;
        }
    }
}

#[test]
fn scenes_save_through_context_services() {
    let local = MemoryProgressStore::new();
    let (sender, events) = ChannelEventSource::channel();
    let mut engine = EngineBuilder::new()
        .with_local_store(local.clone())
        .build(events, VirtualDisplay::new())
        .unwrap();
    engine.request_new_scene(Box::new(SavingScene { level: 3 }));

    send(&sender, AppCommand::InitWindow(window(800, 600)));
    send(&sender, AppCommand::GainedFocus);
    engine.tick().unwrap();
    engine.tick().unwrap();

    assert_eq!(local.saved_level(), Some(4));
    assert!(!engine.is_cloud_save_enabled(), "No cloud store configured");
}
