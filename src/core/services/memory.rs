//=========================================================================
// Memory Consumer
//=========================================================================
//
// Debug allocator used to exercise low-memory handling.
//
// While enabled it grows by one block per frame up to `max_blocks`.
// A low-memory command releases everything.
//
//=========================================================================

use log::{debug, info};

use crate::config::MemoryConsumerConfig;

//=== MemoryConsumer ======================================================

#[derive(Debug)]
pub struct MemoryConsumer {
    config: MemoryConsumerConfig,
    blocks: Vec<Vec<u8>>,
}

impl MemoryConsumer {
    pub fn new(config: MemoryConsumerConfig) -> Self {
        Self {
            config,
            blocks: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Bytes currently held.
    pub fn consumed_bytes(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }

    /// Grows by one block. Called once per rendered frame.
    pub fn update(&mut self) {
        if !self.config.enabled || self.blocks.len() >= self.config.max_blocks {
            return;
        }
        // Touch every byte so the pages are actually committed.
        self.blocks.push(vec![0xA5; self.config.block_size]);
        debug!(target: "services", "Memory consumer holds {} bytes", self.consumed_bytes());
    }

    /// Frees every block.
    pub fn on_low_memory(&mut self) {
        if self.blocks.is_empty() {
            return;
        }
        info!(
            target: "services",
            "Low memory: releasing {} bytes",
            self.consumed_bytes()
        );
        self.blocks = Vec::new();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool) -> MemoryConsumerConfig {
        MemoryConsumerConfig {
            enabled,
            block_size: 16,
            max_blocks: 2,
        }
    }

    #[test]
    fn disabled_consumer_never_allocates() {
        let mut consumer = MemoryConsumer::new(config(false));
        consumer.update();
        assert_eq!(consumer.consumed_bytes(), 0);
    }

    #[test]
    fn growth_is_capped() {
        let mut consumer = MemoryConsumer::new(config(true));
        for _ in 0..5 {
            consumer.update();
        }
        assert_eq!(consumer.consumed_bytes(), 32, "Growth stops at max_blocks");
    }

    #[test]
    fn low_memory_releases_everything() {
        let mut consumer = MemoryConsumer::new(config(true));
        consumer.update();
        consumer.on_low_memory();
        assert_eq!(consumer.consumed_bytes(), 0);

        consumer.update();
        assert_eq!(consumer.consumed_bytes(), 16, "Consumer keeps growing afterwards");
    }
}
