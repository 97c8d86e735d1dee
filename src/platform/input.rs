//! Press/release input shared between the UI thread and the game loop

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::sim::TickInput;

#[derive(Debug, Default)]
struct Flags {
    ascend: AtomicBool,
    start_requested: AtomicBool,
}

/// Cloneable handle; every clone writes the same flags
#[derive(Debug, Clone, Default)]
pub struct InputSignal {
    flags: Arc<Flags>,
}

impl InputSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ascend, and ask for a round to start
    pub fn press(&self) {
        self.flags.ascend.store(true, Ordering::Relaxed);
        self.flags.start_requested.store(true, Ordering::Relaxed);
    }

    pub fn release(&self) {
        self.flags.ascend.store(false, Ordering::Relaxed);
    }

    pub fn is_pressed(&self) -> bool {
        self.flags.ascend.load(Ordering::Relaxed)
    }

    /// Read the flags for one tick. A pending start request is consumed.
    pub fn sample(&self) -> TickInput {
        TickInput {
            ascend: self.flags.ascend.load(Ordering::Relaxed),
            start: self.flags.start_requested.swap(false, Ordering::Relaxed),
        }
    }
}
