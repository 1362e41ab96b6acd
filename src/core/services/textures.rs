//=========================================================================
// Texture Manager
//=========================================================================
//
// Name → handle registry whose residency follows the graphics lifecycle.
//
// Decoding and upload are the renderer's business; this manager tracks
// which textures are wanted and whether graphics objects currently exist
// for them. Handles survive graphics loss, residency does not.
//
//   request("ship") ──► TextureHandle(0)
//   on_graphics_ready() ──► all resident
//   on_graphics_lost()  ──► none resident
//
//=========================================================================

use std::collections::HashMap;

use log::debug;

//=== TextureHandle =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

//=== TextureManager ======================================================

#[derive(Debug, Default)]
pub struct TextureManager {
    names: Vec<String>,
    by_name: HashMap<String, TextureHandle>,
    graphics_ready: bool,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `name`, registering it on first use.
    pub fn request(&mut self, name: &str) -> TextureHandle {
        if let Some(&handle) = self.by_name.get(name) {
            return handle;
        }

        let handle = TextureHandle(self.names.len() as u32);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), handle);
        debug!(target: "services", "Registered texture {:?} as {:?}", name, handle);
        handle
    }

    pub fn lookup(&self, name: &str) -> Option<TextureHandle> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, handle: TextureHandle) -> Option<&str> {
        self.names.get(handle.0 as usize).map(String::as_str)
    }

    /// A texture is resident when it is registered and graphics are up.
    pub fn is_resident(&self, handle: TextureHandle) -> bool {
        self.graphics_ready && (handle.0 as usize) < self.names.len()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    //--- Graphics Lifecycle -----------------------------------------------

    pub fn on_graphics_ready(&mut self) {
        self.graphics_ready = true;
        debug!(target: "services", "{} textures resident", self.names.len());
    }

    pub fn on_graphics_lost(&mut self) {
        self.graphics_ready = false;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
