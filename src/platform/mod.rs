//=========================================================================
// Platform Subsystem
//
// Desktop host glue: drives a Winit event loop from inside the engine's
// game loop and translates OS events into `PlatformEvent`s.
//
// Architecture:
// ```text
//  Game Loop (main thread)
//   │
//   └─ WinitEventSource::poll_event(timeout)
//        ├─ EventBuffer non-empty? → pop one event
//        └─ pump_app_events(timeout, HostHandler)
//             │
//             HostHandler (ApplicationHandler)
//              ├─ resumed        → create Window → InitWindow
//              ├─ suspended      → TermWindow
//              ├─ Focused        → GainedFocus / LostFocus
//              ├─ Resized        → ResolutionChanged + SwapchainChanged
//              │                     (zero-sized resizes are dropped)
//              ├─ input          → InputProcessor → InputEvent
//              ├─ CloseRequested → Destroy
//              └─ memory_warning → LowMemory
//               ↓
//             EventBuffer
// ```
//
// The loop is pumped rather than run, so the engine keeps ownership of
// its own loop and the timeout rules of `EventSource` map directly onto
// the pump timeout. A pump that dispatches nothing the engine cares about
// yields `Ok(None)`.
//
// Winit requires the event loop on the main thread (macOS/iOS), so
// `run_desktop` must be called from `main`.
//
//=========================================================================

//=== Submodules ==========================================================

mod event_buffer;
mod input_processor;

//=== External Crates =====================================================

use std::time::Duration;

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{Ime, StartCause, Touch, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

//=== Internal Imports ====================================================

use crate::config::WindowConfig;
use crate::core::display::{DisplayChange, SwapchainChangeReason, VirtualDisplay};
use crate::core::input::InputEvent;
use crate::core::platform_bridge::{
    AppCommand, EventSource, NativeWindow, PlatformError, PlatformEvent, WindowHandle,
};
use crate::core::scene::Scene;
use crate::engine::EngineBuilder;
use crate::error::EngineError;
use event_buffer::EventBuffer;
use input_processor::InputProcessor;

//=== Entry Point =========================================================

/// Builds an engine on a Winit window and runs it until the window closes.
///
/// Rendering goes through [`VirtualDisplay`]; the window provides the
/// lifecycle, focus, resize and input events.
///
/// # Errors
///
/// Returns the construction error, or the host fault that ended the loop.
pub fn run_desktop(builder: EngineBuilder, initial_scene: Box<dyn Scene>) -> Result<(), EngineError> {
    let events = WinitEventSource::new(builder.config().window.clone())?;
    let mut engine = builder.build(events, VirtualDisplay::new())?;
    engine.request_new_scene(initial_scene);
    engine.game_loop()
}

//=== WinitEventSource ====================================================

/// [`EventSource`] backed by a pumped Winit event loop.
///
/// This type is NOT Send/Sync - it must remain on the main thread.
pub struct WinitEventSource {
    event_loop: EventLoop<()>,
    handler: HostHandler,
}

impl WinitEventSource {
    //--- Construction -----------------------------------------------------

    /// Creates the event loop. The window itself is created lazily once
    /// the platform resumes the application.
    pub fn new(window: WindowConfig) -> Result<Self, PlatformError> {
        let event_loop = EventLoop::new()
            .map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        info!(target: "platform", "Platform subsystem initialized");
        Ok(Self {
            event_loop,
            handler: HostHandler::new(window),
        })
    }
}

impl EventSource for WinitEventSource {
    fn poll_event(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Option<PlatformEvent>, PlatformError> {
        if let Some(event) = self.handler.buffer.pop() {
            return Ok(Some(event));
        }
        if let Some(fault) = self.handler.fault.take() {
            return Err(fault);
        }
        if self.handler.exited {
            return Err(PlatformError::Disconnected);
        }

        let status = self.event_loop.pump_app_events(timeout, &mut self.handler);
        if let PumpStatus::Exit(code) = status {
            debug!(target: "platform", "Event loop exited with code {}", code);
            self.handler.exited = true;
            self.handler.send_destroy();
        }

        if self.handler.buffer.is_empty() {
            trace!(target: "platform", "Pump dispatched no engine events");
        } else {
            trace!(target: "platform", "{} events buffered after pump", self.handler.buffer.len());
        }
        Ok(self.handler.buffer.pop())
    }
}

impl std::fmt::Debug for WinitEventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WinitEventSource")
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

//=== HostHandler =========================================================

/// Winit callbacks. Everything is translated and buffered, never acted on.
#[derive(Debug)]
struct HostHandler {
    /// Window settings used in `resumed()`.
    config: WindowConfig,

    /// OS window (None until `resumed()` called).
    window: Option<Window>,

    buffer: EventBuffer,

    input_processor: InputProcessor,

    /// Failure to hand to the next poll.
    fault: Option<PlatformError>,

    destroy_sent: bool,
    exited: bool,
}

impl HostHandler {
    fn new(config: WindowConfig) -> Self {
        Self {
            config,
            window: None,
            buffer: EventBuffer::new(),
            input_processor: InputProcessor::new(),
            fault: None,
            destroy_sent: false,
            exited: false,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Destroy is delivered once, whichever exit path comes first.
    fn send_destroy(&mut self) {
        if !self.destroy_sent {
            self.destroy_sent = true;
            self.buffer.push(AppCommand::Destroy);
        }
    }

    fn push_input(&mut self, event: Option<InputEvent>) {
        if let Some(event) = event {
            self.buffer.push(event);
        }
    }

    /// Zero-sized resizes come from minimized windows and are dropped;
    /// the swapchain is kept until the next real resize.
    fn push_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!(target: "platform", "Ignoring {}x{} resize (minimized)", width, height);
            return;
        }
        self.buffer.push(DisplayChange::ResolutionChanged { width, height });
        self.buffer.push(DisplayChange::SwapchainChanged(SwapchainChangeReason::Resized));
    }

    fn native_window(window: &Window) -> NativeWindow {
        let size = window.inner_size();
        NativeWindow {
            handle: WindowHandle(u64::from(window.id())),
            width: size.width,
            height: size.height,
        }
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for HostHandler {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if cause == StartCause::Init {
            self.buffer.push(AppCommand::Start);
        }
    }

    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            self.buffer.push(AppCommand::Resume);
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                window.set_ime_allowed(true);
                let native = Self::native_window(&window);
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    native.width,
                    native.height,
                    window.scale_factor()
                );
                self.window = Some(window);
                self.buffer.push(AppCommand::InitWindow(native));
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.fault = Some(PlatformError::WindowCreation(e.to_string()));
                event_loop.exit();
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Suspended, releasing window");
        self.buffer.push(AppCommand::Pause);
        self.buffer.push(AppCommand::TermWindow);
        self.window = None;
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send_destroy();
                event_loop.exit();
            }

            WindowEvent::Focused(true) => self.buffer.push(AppCommand::GainedFocus),
            WindowEvent::Focused(false) => self.buffer.push(AppCommand::LostFocus),

            WindowEvent::Resized(size) => self.push_resize(size.width, size.height),

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                debug!(target: "platform", "Scale factor now {}", scale_factor);
                self.buffer.push(AppCommand::ConfigChanged);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let event = self.input_processor.process_key_event(&key_event);
                if event.is_none() {
                    trace!(target: "platform::input", "Key ignored");
                }
                self.push_input(event);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .process_cursor_moved(position.x as f32, position.y as f32);
                self.push_input(event);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(button, state);
                self.push_input(event);
            }

            WindowEvent::Touch(Touch { id, phase, location, .. }) => {
                let event = self.input_processor.process_touch(
                    id,
                    phase,
                    location.x as f32,
                    location.y as f32,
                );
                self.buffer.push(event);
            }

            WindowEvent::Ime(Ime::Commit(text)) => {
                trace!(target: "platform::input", "Text committed ({} bytes)", text.len());
                self.buffer.push(InputEvent::TextInput);
            }

            WindowEvent::RedrawRequested => self.buffer.push(AppCommand::WindowRedrawNeeded),

            _ => {}
        }
    }

    fn memory_warning(&mut self, _event_loop: &ActiveEventLoop) {
        warn!(target: "platform", "Memory warning from OS");
        self.buffer.push(AppCommand::LowMemory);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Event loop exiting");
        self.window = None;
        self.send_destroy();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
