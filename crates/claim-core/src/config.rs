use std::time::Duration;

/// Configuration for a [`ClaimCache`](crate::ClaimCache) instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Number of world buckets to pre-allocate in the claim table.
    pub world_capacity: usize,
    /// Number of owners to pre-allocate in the owner index.
    pub owner_capacity: usize,
    /// Bulk write sections slower than this are logged as warnings. `None` disables the check.
    pub slow_write_threshold: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            world_capacity: 8,
            owner_capacity: 256,
            slow_write_threshold: Some(Duration::from_millis(50)),
        }
    }
}

impl CacheConfig {
    /// Set the number of pre-allocated world buckets.
    pub fn with_world_capacity(mut self, worlds: usize) -> Self {
        self.world_capacity = worlds;
        self
    }

    /// Set the number of pre-allocated owner entries.
    pub fn with_owner_capacity(mut self, owners: usize) -> Self {
        self.owner_capacity = owners;
        self
    }

    /// Set the slow-write warning threshold (`None` = never warn).
    pub fn with_slow_write_threshold(mut self, threshold: Option<Duration>) -> Self {
        self.slow_write_threshold = threshold;
        self
    }

    /// True when a write section that took `elapsed` should be reported as slow.
    pub(crate) fn is_slow(&self, elapsed: Duration) -> bool {
        self.slow_write_threshold.is_some_and(|limit| elapsed > limit)
    }
}
