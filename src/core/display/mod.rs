//=========================================================================
// Display Subsystem Boundary
//=========================================================================
//
// Contract between the engine and whatever owns the real swapchain
// (Vulkan, GLES, a compositor, or the GPU-less `VirtualDisplay`).
//
// Architecture:
// ```text
//   Engine ──initialize()──────────► Display ──► DisplayFormat
//          ──create_swapchain()────►         ──► SwapchainInfo
//          ──acquire_frame()───────►         ──► FrameHandle
//          ──present_frame()───────►
//          ──release_swapchain()───►
//
//   Display ──DisplayChange──► PlatformEvent::Display ──► Engine
//                               (swapchain changed, resolution changed)
// ```
//
// Handles are small `Copy` values checked by generation, so a handle
// that outlived its swapchain is rejected instead of aliasing a new one.
//
//=========================================================================

//=== Module Declarations =================================================

mod virtual_display;

//=== Public API ==========================================================

pub use virtual_display::VirtualDisplay;

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::NativeWindow;
use crate::error::DisplayError;

//=== DisplayFormat =======================================================

/// Pixel format negotiated during display initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayFormat {
    Rgba8Unorm,
    Rgba8Srgb,
    Rgb565,
}

//=== Handles =============================================================

/// Generation-checked reference to a swapchain owned by a [`Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapchainHandle {
    pub index: u32,
    pub generation: u32,
}

/// One acquired swapchain image, valid until presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle {
    pub image: u32,
    pub serial: u64,
}

/// Result of a successful swapchain creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapchainInfo {
    pub handle: SwapchainHandle,
    pub width: u32,
    pub height: u32,
    pub image_count: u32,
}

//=== Change Notifications ================================================

/// Why the display subsystem invalidated the current swapchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapchainChangeReason {
    Resized,
    Lost,
    Recreated,
}

/// Asynchronous display notifications delivered through the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayChange {
    SwapchainChanged(SwapchainChangeReason),
    ResolutionChanged { width: u32, height: u32 },
}

//=== Display Trait =======================================================

/// Swapchain provider consumed by the engine.
///
/// Every method may fail transiently; the engine retries on a later loop
/// iteration instead of propagating the error.
pub trait Display {
    /// Prepares the display for `window` and picks a pixel format.
    fn initialize(&mut self, window: &NativeWindow) -> Result<DisplayFormat, DisplayError>;

    /// Creates a swapchain presenting to `window`.
    fn create_swapchain(
        &mut self,
        window: &NativeWindow,
        format: DisplayFormat,
    ) -> Result<SwapchainInfo, DisplayError>;

    /// Releases a swapchain. Stale handles are ignored.
    fn release_swapchain(&mut self, swapchain: SwapchainHandle);

    /// Acquires the next image to render into.
    fn acquire_frame(&mut self, swapchain: SwapchainHandle) -> Result<FrameHandle, DisplayError>;

    /// Presents a previously acquired image.
    fn present_frame(
        &mut self,
        swapchain: SwapchainHandle,
        frame: FrameHandle,
    ) -> Result<(), DisplayError>;
}
