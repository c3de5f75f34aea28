//! Cooperative cancellation handle shared by `extractWaveform` and `renderCut`.
//!
//! Both port operations are required to accept and honor cancellation; this
//! is a thin `Arc<AtomicBool>` flag the long-running ffmpeg-driving loops
//! poll between chunks of work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Cancel(Arc<AtomicBool>);

impl Cancel {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for Cancel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        assert!(!Cancel::new().is_cancelled());
    }

    #[test]
    fn cancel_is_observed() {
        let c = Cancel::new();
        c.cancel();
        assert!(c.is_cancelled());
    }

    #[test]
    fn clones_share_state() {
        let a = Cancel::new();
        let b = a.clone();
        a.cancel();
        assert!(b.is_cancelled());
    }
}
