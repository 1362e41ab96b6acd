//=========================================================================
// Shared Integration Test Helpers
//=========================================================================
//
// A scene that records its hooks into a shared log, a display that fails
// a scripted number of swapchain creations and counts releases, and an
// engine fed through a channel.
//
//=========================================================================

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crossbeam_channel::Sender;
use tunnel_engine::core::display::{
    DisplayFormat, FrameHandle, SwapchainHandle, SwapchainInfo,
};
use tunnel_engine::core::services::MemoryProgressStore;
use tunnel_engine::prelude::*;

//=== Recording Scene =====================================================

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Logs every lifecycle hook as `"<name>.<hook>"`. Frames are not logged.
pub struct RecordingScene {
    name: &'static str,
    log: Log,
    frames: Rc<RefCell<u32>>,
    next: Option<Box<dyn Scene>>,
    consume_back: bool,
}

impl RecordingScene {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            frames: Rc::new(RefCell::new(0)),
            next: None,
            consume_back: false,
        }
    }

    /// Requests `next` from inside the first rendered frame.
    pub fn then(mut self, next: Box<dyn Scene>) -> Self {
        self.next = Some(next);
        self
    }

    pub fn consuming_back(mut self) -> Self {
        self.consume_back = true;
        self
    }

    /// Shared frame counter, readable after the scene is boxed.
    pub fn frame_counter(&self) -> Rc<RefCell<u32>> {
        self.frames.clone()
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}.{}", self.name, hook));
    }
}

impl Scene for RecordingScene {
    fn on_install(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("install");
    }

    fn on_uninstall(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("uninstall");
    }

    fn on_start_graphics(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("startGraphics");
    }

    fn on_kill_graphics(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("killGraphics");
    }

    fn do_frame(&mut self, ctx: &mut SceneContext<'_>) {
        *self.frames.borrow_mut() += 1;
        if let Some(next) = self.next.take() {
            ctx.request_new_scene(next);
        }
    }

    fn on_back_key_pressed(&mut self, _ctx: &mut SceneContext<'_>) -> bool {
        self.record("back");
        self.consume_back
    }

    fn on_pause(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("pause");
    }

    fn on_resume(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("resume");
    }

    fn on_screen_resized(&mut self, width: u32, height: u32, _ctx: &mut SceneContext<'_>) {
        self.log
            .borrow_mut()
            .push(format!("{}.resized {}x{}", self.name, width, height));
    }

    fn name(&self) -> &str {
        self.name
    }
}

//=== Scripted Display ====================================================

/// [`VirtualDisplay`] that rejects the first `failures` swapchain requests.
pub struct ScriptedDisplay {
    inner: VirtualDisplay,
    failures: u32,
    released: Rc<Cell<u32>>,
    pub create_attempts: u32,
}

impl ScriptedDisplay {
    pub fn failing(failures: u32) -> Self {
        Self {
            inner: VirtualDisplay::new(),
            failures,
            released: Rc::new(Cell::new(0)),
            create_attempts: 0,
        }
    }

    /// Shared count of released swapchains, readable after the engine
    /// owning this display is gone.
    pub fn release_counter(&self) -> Rc<Cell<u32>> {
        self.released.clone()
    }

    pub fn live_swapchains(&self) -> usize {
        self.inner.live_swapchains()
    }

    pub fn presented_frames(&self) -> u64 {
        self.inner.presented_frames()
    }
}

impl Display for ScriptedDisplay {
    fn initialize(&mut self, window: &NativeWindow) -> Result<DisplayFormat, DisplayError> {
        self.inner.initialize(window)
    }

    fn create_swapchain(
        &mut self,
        window: &NativeWindow,
        format: DisplayFormat,
    ) -> Result<SwapchainInfo, DisplayError> {
        self.create_attempts += 1;
        if self.failures > 0 {
            self.failures -= 1;
            return Err(DisplayError::NotReady);
        }
        self.inner.create_swapchain(window, format)
    }

    fn release_swapchain(&mut self, swapchain: SwapchainHandle) {
        self.released.set(self.released.get() + 1);
        self.inner.release_swapchain(swapchain)
    }

    fn acquire_frame(&mut self, swapchain: SwapchainHandle) -> Result<FrameHandle, DisplayError> {
        self.inner.acquire_frame(swapchain)
    }

    fn present_frame(
        &mut self,
        swapchain: SwapchainHandle,
        frame: FrameHandle,
    ) -> Result<(), DisplayError> {
        self.inner.present_frame(swapchain, frame)
    }
}

//=== Engine Helpers ======================================================

pub type ChannelEngine<D> = Engine<ChannelEventSource, D>;

/// Engine on a channel with in-memory progress storage.
pub fn channel_engine<D: Display>(display: D) -> (Sender<PlatformEvent>, ChannelEngine<D>) {
    let (sender, events) = ChannelEventSource::channel();
    let engine = EngineBuilder::new()
        .with_local_store(MemoryProgressStore::new())
        .build(events, display)
        .expect("engine builds");
    (sender, engine)
}

pub fn window(width: u32, height: u32) -> NativeWindow {
    NativeWindow {
        handle: WindowHandle(7),
        width,
        height,
    }
}

pub fn send(sender: &Sender<PlatformEvent>, event: impl Into<PlatformEvent>) {
    sender.send(event.into()).expect("engine side alive");
}
