//=========================================================================
// Vibration Helper
//=========================================================================
//
// Haptics behind a narrow trait.
//
// API level 31 introduced a vibration manager service that replaces the
// legacy vibrator service; the helper records which one the host should
// route to and forwards requests to the host-provided `Vibrator`.
//
//=========================================================================

use std::fmt;
use std::time::Duration;

use log::{debug, trace};

//=== Constants ===========================================================

/// First API level exposing the vibration manager service.
pub const VIBRATION_MANAGER_API_LEVEL: u32 = 31;

//=== SystemService =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemService {
    Vibrator,
    VibrationManager,
}

impl SystemService {
    pub fn for_api_level(api_level: u32) -> Self {
        if api_level >= VIBRATION_MANAGER_API_LEVEL {
            Self::VibrationManager
        } else {
            Self::Vibrator
        }
    }
}

//=== Vibrator ============================================================

/// Host-provided haptics backend.
pub trait Vibrator {
    fn has_vibrator(&self) -> bool;

    fn vibrate(&mut self, service: SystemService, duration: Duration);
}

/// Backend for devices without haptics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVibrator;

impl Vibrator for NullVibrator {
    fn has_vibrator(&self) -> bool {
        false
    }

    fn vibrate(&mut self, _service: SystemService, _duration: Duration) {}
}

//=== VibrationHelper =====================================================

pub struct VibrationHelper {
    service: SystemService,
    backend: Box<dyn Vibrator>,
}

impl VibrationHelper {
    pub fn new(api_level: u32, backend: Box<dyn Vibrator>) -> Self {
        let service = SystemService::for_api_level(api_level);
        debug!(target: "services", "Vibration routed through {:?}", service);
        Self { service, backend }
    }

    pub fn service(&self) -> SystemService {
        self.service
    }

    pub fn has_vibrator(&self) -> bool {
        self.backend.has_vibrator()
    }

    /// Requests a vibration. Ignored on devices without a vibrator.
    pub fn vibrate(&mut self, duration: Duration) {
        if !self.backend.has_vibrator() || duration.is_zero() {
            return;
        }
        trace!(target: "services", "Vibrate {:?}", duration);
        self.backend.vibrate(self.service, duration);
    }
}

impl fmt::Debug for VibrationHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VibrationHelper")
            .field("service", &self.service)
            .field("has_vibrator", &self.backend.has_vibrator())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
