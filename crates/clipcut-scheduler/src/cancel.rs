//! Cooperative cancellation flag (§5). A thin wrapper around
//! `clipcut_media::Cancel` rather than a second `Arc<AtomicBool>` type: the
//! same handle is threaded straight into `renderCut` so a cancel the caller
//! observes is the same cancel the media adapter's loop polls, with no
//! separate snapshot to fall out of sync.

use clipcut_core::{ClipcutError, Result};

#[derive(Debug, Clone, Default)]
pub struct Cancel(clipcut_media::Cancel);

impl Cancel {
    pub fn new() -> Self {
        Self(clipcut_media::Cancel::new())
    }

    pub fn cancel(&self) {
        self.0.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }

    pub fn as_media_cancel(&self) -> clipcut_media::Cancel {
        self.0.clone()
    }

    /// Check-and-fail helper for suspension points that don't otherwise
    /// talk to the media adapter.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ClipcutError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        assert!(!Cancel::new().is_cancelled());
        assert!(Cancel::new().check().is_ok());
    }

    #[test]
    fn clones_share_state() {
        let a = Cancel::new();
        let b = a.clone();
        a.cancel();
        assert!(b.is_cancelled());
        assert!(b.check().is_err());
    }

    #[test]
    fn media_cancel_handle_shares_the_same_flag() {
        let a = Cancel::new();
        let media = a.as_media_cancel();
        a.cancel();
        assert!(media.is_cancelled());
    }
}
