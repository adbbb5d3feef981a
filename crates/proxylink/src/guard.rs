//! The size guard.
//!
//! The platform refuses plugin messages above 32,766 bytes. The guard
//! keeps a margin below that and drops whole messages; it never
//! truncates or splits one.

use crate::DropReason;

/// Default safety ceiling in bytes.
pub const SOFT_LIMIT: usize = 30_000;

/// Checks fully encoded messages against a byte ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeGuard {
    limit: usize,
}

impl SizeGuard {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Accepts messages strictly smaller than the limit.
    ///
    /// # Errors
    /// Returns [`DropReason::Oversized`] when `size >= limit`.
    pub fn check(&self, size: usize) -> Result<(), DropReason> {
        if size >= self.limit {
            return Err(DropReason::Oversized {
                size,
                limit: self.limit,
            });
        }
        Ok(())
    }
}

impl Default for SizeGuard {
    fn default() -> Self {
        Self::new(SOFT_LIMIT)
    }
}
