//! One-shot warning latch.

use std::sync::atomic::{AtomicBool, Ordering};

/// Lets a warning through exactly once, so a recurring failure is reported
/// without flooding the log.
#[derive(Debug, Default)]
pub struct WarnOnce {
    fired: AtomicBool,
}

impl WarnOnce {
    pub const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Returns true for the first caller only.
    pub fn fire(&self) -> bool {
        !self.fired.swap(true, Ordering::AcqRel)
    }

    /// Re-arms the latch.
    pub fn reset(&self) {
        self.fired.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_until_reset() {
        let latch = WarnOnce::new();
        assert!(latch.fire());
        assert!(!latch.fire());
        assert!(!latch.fire());

        latch.reset();
        assert!(latch.fire());
    }
}
