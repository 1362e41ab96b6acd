//=========================================================================
// Engine Lifecycle Integration Tests
//=========================================================================
//
// Drives a whole engine through a channel event source, the way an
// embedding host would, and checks what the scenes observe.
//
//=========================================================================

mod common;

use common::*;
use tunnel_engine::core::display::{DisplayChange, SwapchainChangeReason};
use tunnel_engine::prelude::*;

fn log_of(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

//=== Full Lifecycle ======================================================

#[test]
fn window_focus_render_terminate_destroy() {
    let log = new_log();
    let (sender, mut engine) = channel_engine(VirtualDisplay::new());
    engine.request_new_scene(Box::new(RecordingScene::new("A", &log)));

    send(&sender, AppCommand::Start);
    send(&sender, AppCommand::InitWindow(window(800, 600)));
    send(&sender, AppCommand::GainedFocus);
    engine.tick().unwrap();

    assert!(engine.has_started());
    assert!(engine.is_animating());
    assert_eq!(engine.surface_size(), (800, 600));
    assert_eq!(engine.display().presented_frames(), 1);
    assert_eq!(log_of(&log), vec!["A.install", "A.startGraphics"]);

    send(&sender, AppCommand::TermWindow);
    send(&sender, AppCommand::Destroy);
    engine.game_loop().unwrap();

    assert!(engine.is_quitting());
    assert!(!engine.has_swapchain());
    assert_eq!(engine.display().live_swapchains(), 0, "Swapchain released");
    assert_eq!(
        log_of(&log),
        vec!["A.install", "A.startGraphics", "A.killGraphics", "A.uninstall"]
    );
    assert!(engine.invariants_hold());

    drop(engine);
    assert_eq!(log.borrow().len(), 4, "Dropping a shut down engine notifies nothing");
}

#[test]
fn dropping_tick_driven_engine_tears_down_scene_and_swapchain() {
    let log = new_log();
    let display = ScriptedDisplay::failing(0);
    let released = display.release_counter();
    let (sender, mut engine) = channel_engine(display);
    engine.request_new_scene(Box::new(RecordingScene::new("A", &log)));

    send(&sender, AppCommand::InitWindow(window(800, 600)));
    send(&sender, AppCommand::GainedFocus);
    engine.tick().unwrap();
    assert_eq!(log_of(&log), vec!["A.install", "A.startGraphics"]);
    assert_eq!(engine.display().live_swapchains(), 1);

    drop(engine);

    assert_eq!(
        log_of(&log),
        vec!["A.install", "A.startGraphics", "A.killGraphics", "A.uninstall"]
    );
    assert_eq!(released.get(), 1, "Swapchain released on drop");
}

#[test]
fn unfocused_engine_does_not_render() {
    let log = new_log();
    let (sender, mut engine) = channel_engine(VirtualDisplay::new());
    engine.request_new_scene(Box::new(RecordingScene::new("A", &log)));

    send(&sender, AppCommand::InitWindow(window(800, 600)));
    engine.tick().unwrap();

    assert!(engine.has_gfx_objects());
    assert!(!engine.is_animating());
    assert_eq!(engine.display().presented_frames(), 0);
    assert!(log.borrow().is_empty(), "Pending scene waits for the first frame");
}

//=== Swapchain Retry =====================================================

#[test]
fn swapchain_creation_is_retried_on_later_ticks() {
    let (sender, mut engine) = channel_engine(ScriptedDisplay::failing(2));

    send(&sender, AppCommand::InitWindow(window(640, 480)));
    send(&sender, AppCommand::GainedFocus);
    engine.tick().unwrap();

    assert!(engine.is_display_initialized());
    assert!(!engine.has_swapchain());
    assert_eq!(engine.display().create_attempts, 2, "Event plus one retry");

    // No events: the poll times out after the retry interval.
    engine.tick().unwrap();

    assert!(engine.has_swapchain());
    assert!(engine.has_gfx_objects());
    assert_eq!(engine.display().create_attempts, 3);
    assert_eq!(engine.display().presented_frames(), 1);
}

//=== Scene Transitions ===================================================

#[test]
fn scene_requested_from_frame_installs_on_next_frame() {
    let log = new_log();
    let (sender, mut engine) = channel_engine(VirtualDisplay::new());
    let b = RecordingScene::new("B", &log);
    let b_frames = b.frame_counter();
    engine.request_new_scene(Box::new(RecordingScene::new("A", &log).then(Box::new(b))));

    send(&sender, AppCommand::InitWindow(window(800, 600)));
    send(&sender, AppCommand::GainedFocus);
    engine.tick().unwrap();
    assert!(engine.scene_manager().has_pending_scene());

    engine.tick().unwrap();

    assert_eq!(
        log_of(&log),
        vec![
            "A.install",
            "A.startGraphics",
            "A.killGraphics",
            "A.uninstall",
            "B.install",
            "B.startGraphics",
        ]
    );
    assert_eq!(*b_frames.borrow(), 1);
    assert_eq!(engine.scene_manager().current_scene_name(), Some("B"));
}

#[test]
fn last_request_before_frame_wins() {
    let log = new_log();
    let (sender, mut engine) = channel_engine(VirtualDisplay::new());
    engine.request_new_scene(Box::new(RecordingScene::new("A", &log)));
    engine.request_new_scene(Box::new(RecordingScene::new("B", &log)));

    send(&sender, AppCommand::InitWindow(window(800, 600)));
    send(&sender, AppCommand::GainedFocus);
    engine.tick().unwrap();

    assert_eq!(log_of(&log), vec!["B.install", "B.startGraphics"]);
}

//=== Display Notifications ===============================================

#[test]
fn resize_updates_scene_and_rebuilds_swapchain() {
    let log = new_log();
    let (sender, mut engine) = channel_engine(VirtualDisplay::new());
    engine.request_new_scene(Box::new(RecordingScene::new("A", &log)));

    send(&sender, AppCommand::InitWindow(window(800, 600)));
    send(&sender, AppCommand::GainedFocus);
    engine.tick().unwrap();
    log.borrow_mut().clear();

    send(&sender, DisplayChange::ResolutionChanged { width: 1024, height: 768 });
    send(&sender, DisplayChange::SwapchainChanged(SwapchainChangeReason::Resized));
    engine.tick().unwrap();

    assert_eq!(
        log_of(&log),
        vec!["A.resized 1024x768", "A.killGraphics", "A.startGraphics"]
    );
    assert_eq!(engine.swapchain().map(|s| (s.width, s.height)), Some((1024, 768)));
    assert_eq!(engine.display().live_swapchains(), 1, "Old swapchain released");
    assert_eq!(engine.display().presented_frames(), 2);
}

#[test]
fn pause_needs_graphics_resume_does_not() {
    let log = new_log();
    let (sender, mut engine) = channel_engine(VirtualDisplay::new());
    engine.request_new_scene(Box::new(RecordingScene::new("A", &log)));

    send(&sender, AppCommand::InitWindow(window(800, 600)));
    send(&sender, AppCommand::GainedFocus);
    engine.tick().unwrap();
    log.borrow_mut().clear();

    send(&sender, AppCommand::Pause);
    send(&sender, AppCommand::TermWindow);
    send(&sender, AppCommand::Pause);
    send(&sender, AppCommand::Resume);
    engine.tick().unwrap();

    assert_eq!(log_of(&log), vec!["A.pause", "A.killGraphics", "A.resume"]);
}

//=== Input ===============================================================

#[test]
fn unconsumed_back_ends_game_loop() {
    let log = new_log();
    let (sender, mut engine) = channel_engine(VirtualDisplay::new());
    engine.request_new_scene(Box::new(RecordingScene::new("A", &log)));

    send(&sender, AppCommand::InitWindow(window(800, 600)));
    send(&sender, AppCommand::GainedFocus);
    engine.tick().unwrap();

    send(&sender, InputEvent::BackPressed);
    engine.game_loop().unwrap();

    assert_eq!(
        log_of(&log),
        vec!["A.install", "A.startGraphics", "A.back", "A.killGraphics", "A.uninstall"]
    );
}

#[test]
fn escape_key_offers_back_to_scene() {
    let log = new_log();
    let (sender, mut engine) = channel_engine(VirtualDisplay::new());
    engine.request_new_scene(Box::new(RecordingScene::new("A", &log).consuming_back()));

    send(&sender, AppCommand::InitWindow(window(800, 600)));
    send(&sender, AppCommand::GainedFocus);
    engine.tick().unwrap();

    send(&sender, InputEvent::KeyDown { key: KeyCode::Escape });
    engine.tick().unwrap();

    assert!(!engine.is_quitting());
    assert_eq!(log_of(&log).last().map(String::as_str), Some("A.back"));
}

//=== Host Faults =========================================================

#[test]
fn disconnected_host_is_fatal_but_shuts_down() {
    let log = new_log();
    let (sender, mut engine) = channel_engine(VirtualDisplay::new());
    engine.request_new_scene(Box::new(RecordingScene::new("A", &log)));

    send(&sender, AppCommand::InitWindow(window(800, 600)));
    send(&sender, AppCommand::GainedFocus);
    engine.tick().unwrap();
    drop(sender);

    let result = engine.game_loop();

    assert!(matches!(result, Err(EngineError::Platform(_))));
    assert_eq!(log_of(&log).last().map(String::as_str), Some("A.uninstall"));
}

#[test]
fn missing_api_level_is_host_fault() {
    let (_sender, events) = ChannelEventSource::channel();
    let result = EngineBuilder::new()
        .with_platform_app(tunnel_engine::core::platform_bridge::PlatformApp {
            api_level: 0,
            screen_density: 160,
        })
        .build(events, VirtualDisplay::new());

    assert!(matches!(result, Err(EngineError::HostFault(_))));
}
