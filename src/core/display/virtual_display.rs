//=========================================================================
// Virtual Display
//=========================================================================
//
// GPU-less `Display` implementation.
//
// Allocates logical swapchains in a generation-checked arena and rotates
// through their images on acquire/present. Used for headless runs and by
// the desktop host, where no draw calls are issued.
//
// Arena:
//   slots: Vec<Slot>
//     ├─ generation: bumped on every release
//     └─ swapchain:  Option<VirtualSwapchain>
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{Display, DisplayFormat, FrameHandle, SwapchainHandle, SwapchainInfo};
use crate::core::platform_bridge::{NativeWindow, WindowHandle};
use crate::error::DisplayError;

//=== Constants ===========================================================

const DEFAULT_IMAGE_COUNT: u32 = 3;

//=== Internal Types ======================================================

#[derive(Debug)]
struct VirtualSwapchain {
    window: WindowHandle,
    image_count: u32,
    next_image: u32,
    acquired: Option<FrameHandle>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    swapchain: Option<VirtualSwapchain>,
}

//=== VirtualDisplay ======================================================

/// Display backend that manages logical swapchains without a GPU.
#[derive(Debug)]
pub struct VirtualDisplay {
    format: DisplayFormat,
    image_count: u32,
    slots: Vec<Slot>,
    frame_serial: u64,
    presented_frames: u64,
}

impl VirtualDisplay {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::with_format(DisplayFormat::Rgba8Srgb, DEFAULT_IMAGE_COUNT)
    }

    /// # Panics
    ///
    /// Panics if `image_count == 0`.
    pub fn with_format(format: DisplayFormat, image_count: u32) -> Self {
        assert!(image_count > 0, "Swapchain image count must be positive");
        Self {
            format,
            image_count,
            slots: Vec::new(),
            frame_serial: 0,
            presented_frames: 0,
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Number of swapchains currently alive.
    pub fn live_swapchains(&self) -> usize {
        self.slots.iter().filter(|slot| slot.swapchain.is_some()).count()
    }

    /// Total frames presented across all swapchains.
    pub fn presented_frames(&self) -> u64 {
        self.presented_frames
    }

    //--- Internal Helpers -------------------------------------------------

    fn lookup(&mut self, handle: SwapchainHandle) -> Result<&mut VirtualSwapchain, DisplayError> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.swapchain.as_mut())
            .ok_or(DisplayError::InvalidHandle)
    }

    fn allocate(&mut self, swapchain: VirtualSwapchain) -> SwapchainHandle {
        let index = match self.slots.iter().position(|slot| slot.swapchain.is_none()) {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };

        let slot = &mut self.slots[index];
        slot.swapchain = Some(swapchain);

        SwapchainHandle {
            index: index as u32,
            generation: slot.generation,
        }
    }
}

impl Default for VirtualDisplay {
    fn default() -> Self {
        Self::new()
    }
}

//=== Display Implementation ==============================================

impl Display for VirtualDisplay {
    fn initialize(&mut self, window: &NativeWindow) -> Result<DisplayFormat, DisplayError> {
        if window.width == 0 || window.height == 0 {
            return Err(DisplayError::NotReady);
        }
        debug!(target: "engine::display", "Virtual display initialized for {:?}", window.handle);
        Ok(self.format)
    }

    fn create_swapchain(
        &mut self,
        window: &NativeWindow,
        format: DisplayFormat,
    ) -> Result<SwapchainInfo, DisplayError> {
        if format != self.format {
            return Err(DisplayError::Unsupported(format!("{:?}", format)));
        }
        if window.width == 0 || window.height == 0 {
            return Err(DisplayError::NotReady);
        }

        let handle = self.allocate(VirtualSwapchain {
            window: window.handle,
            image_count: self.image_count,
            next_image: 0,
            acquired: None,
        });

        Ok(SwapchainInfo {
            handle,
            width: window.width,
            height: window.height,
            image_count: self.image_count,
        })
    }

    fn release_swapchain(&mut self, swapchain: SwapchainHandle) {
        let Some(slot) = self.slots.get_mut(swapchain.index as usize) else {
            return;
        };
        if slot.generation != swapchain.generation {
            return;
        }
        if let Some(released) = slot.swapchain.take() {
            debug!(
                target: "engine::display",
                "Released virtual swapchain for {:?}",
                released.window
            );
            slot.generation = slot.generation.wrapping_add(1);
        }
    }

    fn acquire_frame(&mut self, swapchain: SwapchainHandle) -> Result<FrameHandle, DisplayError> {
        self.frame_serial += 1;
        let serial = self.frame_serial;
        let chain = self.lookup(swapchain)?;

        if chain.acquired.is_some() {
            return Err(DisplayError::NotReady);
        }

        let frame = FrameHandle {
            image: chain.next_image,
            serial,
        };
        chain.next_image = (chain.next_image + 1) % chain.image_count;
        chain.acquired = Some(frame);

        trace!(target: "engine::display", "Acquired image {} (serial {})", frame.image, serial);
        Ok(frame)
    }

    fn present_frame(
        &mut self,
        swapchain: SwapchainHandle,
        frame: FrameHandle,
    ) -> Result<(), DisplayError> {
        let chain = self.lookup(swapchain)?;

        if chain.acquired != Some(frame) {
            return Err(DisplayError::InvalidHandle);
        }
        chain.acquired = None;
        self.presented_frames += 1;
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn window(width: u32, height: u32) -> NativeWindow {
        NativeWindow {
            handle: WindowHandle(7),
            width,
            height,
        }
    }

    #[test]
    fn zero_sized_window_is_not_ready() {
        let mut display = VirtualDisplay::new();
        assert_eq!(display.initialize(&window(0, 600)), Err(DisplayError::NotReady));
    }

    #[test]
    fn swapchain_reports_window_extent() {
        let mut display = VirtualDisplay::new();
        let format = display.initialize(&window(800, 600)).unwrap();
        let info = display.create_swapchain(&window(800, 600), format).unwrap();

        assert_eq!((info.width, info.height), (800, 600));
        assert_eq!(info.image_count, DEFAULT_IMAGE_COUNT);
        assert_eq!(display.live_swapchains(), 1);
    }

    #[test]
    fn unsupported_format_is_rejected() {
        let mut display = VirtualDisplay::new();
        let result = display.create_swapchain(&window(800, 600), DisplayFormat::Rgb565);
        assert!(matches!(result, Err(DisplayError::Unsupported(_))));
    }

    #[test]
    fn images_rotate_across_frames() {
        let mut display = VirtualDisplay::with_format(DisplayFormat::Rgba8Srgb, 2);
        let info = display
            .create_swapchain(&window(64, 64), DisplayFormat::Rgba8Srgb)
            .unwrap();

        let mut images = Vec::new();
        for _ in 0..3 {
            let frame = display.acquire_frame(info.handle).unwrap();
            images.push(frame.image);
            display.present_frame(info.handle, frame).unwrap();
        }

        assert_eq!(images, vec![0, 1, 0]);
        assert_eq!(display.presented_frames(), 3);
    }

    #[test]
    fn double_acquire_is_refused() {
        let mut display = VirtualDisplay::new();
        let info = display
            .create_swapchain(&window(64, 64), DisplayFormat::Rgba8Srgb)
            .unwrap();

        display.acquire_frame(info.handle).unwrap();
        assert_eq!(display.acquire_frame(info.handle), Err(DisplayError::NotReady));
    }

    #[test]
    fn stale_handle_is_rejected_after_slot_reuse() {
        let mut display = VirtualDisplay::new();
        let first = display
            .create_swapchain(&window(64, 64), DisplayFormat::Rgba8Srgb)
            .unwrap();
        display.release_swapchain(first.handle);

        let second = display
            .create_swapchain(&window(64, 64), DisplayFormat::Rgba8Srgb)
            .unwrap();

        assert_eq!(first.handle.index, second.handle.index, "Slot should be reused");
        assert_ne!(first.handle.generation, second.handle.generation);
        assert_eq!(display.acquire_frame(first.handle), Err(DisplayError::InvalidHandle));
        assert!(display.acquire_frame(second.handle).is_ok());
    }

    #[test]
    fn releasing_stale_handle_keeps_live_swapchain() {
        let mut display = VirtualDisplay::new();
        let first = display
            .create_swapchain(&window(64, 64), DisplayFormat::Rgba8Srgb)
            .unwrap();
        display.release_swapchain(first.handle);
        let _second = display
            .create_swapchain(&window(64, 64), DisplayFormat::Rgba8Srgb)
            .unwrap();

        display.release_swapchain(first.handle);
        assert_eq!(display.live_swapchains(), 1);
    }
}
