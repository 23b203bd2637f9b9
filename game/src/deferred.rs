use std::time::Duration;

/// Scheduled continuation tied to the session epoch it was created in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Deferred {
    epoch: u64,
    remaining: Duration,
}

/// Result of advancing a [`Deferred`] continuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeferredStatus {
    /// The delay has not elapsed yet.
    Pending,
    /// The delay elapsed within the epoch that scheduled it.
    Ready,
    /// The epoch moved on; the continuation must be dropped.
    Stale,
}

impl Deferred {
    pub(crate) const fn new(epoch: u64, delay: Duration) -> Self {
        Self {
            epoch,
            remaining: delay,
        }
    }

    pub(crate) fn advance(&mut self, dt: Duration, current_epoch: u64) -> DeferredStatus {
        if self.epoch != current_epoch {
            return DeferredStatus::Stale;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            DeferredStatus::Ready
        } else {
            DeferredStatus::Pending
        }
    }
}
