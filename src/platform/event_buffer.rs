//=========================================================================
// Event Buffer
//
// FIFO of platform events collected during one winit pump, drained one
// at a time by `WinitEventSource::poll_event`.
//
// Discrete events keep their order. Consecutive moves of the same
// pointer coalesce into the latest position, so a burst of cursor
// motion between two polls reaches the engine as a single move.
//
//=========================================================================

use std::collections::VecDeque;

use crate::core::input::InputEvent;
use crate::core::platform_bridge::PlatformEvent;

//=== EventBuffer =========================================================

#[derive(Debug, Default)]
pub(crate) struct EventBuffer {
    events: VecDeque<PlatformEvent>,
}

impl EventBuffer {
    pub(crate) fn new() -> Self {
        const BASE_CAPACITY: usize = 64;
        Self {
            events: VecDeque::with_capacity(BASE_CAPACITY),
        }
    }

    /// Appends an event, replacing a trailing move of the same pointer.
    pub(crate) fn push(&mut self, event: impl Into<PlatformEvent>) {
        let event = event.into();

        if let (
            PlatformEvent::Input(InputEvent::PointerMove { pointer_id: new_id, .. }),
            Some(PlatformEvent::Input(InputEvent::PointerMove { pointer_id: last_id, .. })),
        ) = (&event, self.events.back())
        {
            if new_id == last_id {
                self.events.pop_back();
            }
        }

        self.events.push_back(event);
    }

    pub(crate) fn pop(&mut self) -> Option<PlatformEvent> {
        self.events.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
