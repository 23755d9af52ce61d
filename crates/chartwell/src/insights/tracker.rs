//! Request-generation tracking.
//!
//! Every insights request is stamped with a [`RequestToken`] carrying a
//! generation number and the dataset version it was built from. Only a reply
//! whose token is still current may be applied; anything else is stale.

use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken {
    generation: u64,
    dataset_version: u64,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dataset_version(&self) -> u64 {
        self.dataset_version
    }
}

/// Issues monotonically increasing request tokens.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token for a request built from `dataset_version`.
    ///
    /// Issuing a token supersedes every token issued before it.
    pub fn issue(&self, dataset_version: u64) -> RequestToken {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation = generation, dataset_version = dataset_version; "Issued request token");
        RequestToken {
            generation,
            dataset_version,
        }
    }

    /// Supersedes all outstanding tokens without issuing a new one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    /// Returns `true` if `token` is the latest issued token and was built
    /// from `dataset_version`.
    pub fn is_current(&self, token: RequestToken, dataset_version: u64) -> bool {
        token.generation == self.latest.load(Ordering::Acquire)
            && token.dataset_version == dataset_version
    }
}
