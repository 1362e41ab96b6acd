//=========================================================================
// Game Asset Manager
//=========================================================================
//
// Narrow "load asset" interface over a root directory.
//
// In-memory overrides take precedence over the filesystem, which lets
// embedders ship packed assets and lets tests run without files.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use log::debug;

//=== Internal Dependencies ===============================================

use crate::error::AssetError;

//=== GameAssetManager ====================================================

#[derive(Debug)]
pub struct GameAssetManager {
    root: PathBuf,
    overrides: HashMap<String, Vec<u8>>,
}

impl GameAssetManager {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            overrides: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registers in-memory content for `name`, shadowing any file.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.overrides.insert(name.into(), bytes);
    }

    /// Loads the raw bytes of an asset.
    ///
    /// Names are relative paths below the asset root; names escaping the
    /// root (`..`, absolute paths) are reported as not found.
    pub fn load_asset(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        if let Some(bytes) = self.overrides.get(name) {
            return Ok(bytes.clone());
        }

        let relative = Path::new(name);
        let escapes_root = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes_root {
            return Err(AssetError::NotFound(name.to_string()));
        }

        let path = self.root.join(relative);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(target: "services", "Loaded asset {:?} ({} bytes)", path, bytes.len());
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AssetError::NotFound(name.to_string()))
            }
            Err(e) => Err(AssetError::Io(format!("{}: {}", path.display(), e))),
        }
    }

    /// Returns `true` if `name` can be loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.overrides.contains_key(name) || self.load_asset(name).is_ok()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
