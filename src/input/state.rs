//! Cross-thread input snapshot
//!
//! One atomic byte holds the latest button mask. The poller stores, the frame
//! loop loads; neither side blocks and readers never see a torn value.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use super::{Buttons, InputSource};

/// Reader half; implements [`InputSource`]
#[derive(Debug, Clone, Default)]
pub struct SharedInput {
    state: Arc<AtomicU8>,
}

/// Writer half handed to the poller
#[derive(Debug, Clone)]
pub struct InputPublisher {
    state: Arc<AtomicU8>,
}

impl SharedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer that publishes into this snapshot
    pub fn publisher(&self) -> InputPublisher {
        InputPublisher { state: Arc::clone(&self.state) }
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Buttons {
        Buttons::from_bits_truncate(self.state.load(Ordering::Relaxed))
    }
}

impl InputPublisher {
    /// Replace the snapshot
    pub fn publish(&self, buttons: Buttons) {
        self.state.store(buttons.bits(), Ordering::Relaxed);
    }
}

impl InputSource for SharedInput {
    fn read_input(&mut self) -> Buttons {
        self.snapshot()
    }
}
