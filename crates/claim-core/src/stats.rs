use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::cache::ClaimCache;

/// Aggregate counts over the cache, taken from one consistent read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Claimed chunks across all worlds.
    pub total_chunks: usize,
    /// Owners holding at least one chunk.
    pub total_owners: usize,
    /// Villages holding at least one chunk.
    pub total_villages: usize,
    /// Worlds holding at least one claim.
    pub world_count: usize,
    /// Chunks attributed to some village.
    pub village_chunks: usize,
}

impl CacheStats {
    /// Chunks held as personal claims.
    pub fn personal_chunks(&self) -> usize {
        self.total_chunks - self.village_chunks
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chunks={} owners={} villages={} worlds={} village_chunks={}",
            self.total_chunks,
            self.total_owners,
            self.total_villages,
            self.world_count,
            self.village_chunks
        )
    }
}

/// Read-only diagnostics view for telemetry and admin tooling.
#[derive(Debug, Clone)]
pub struct StatsReporter {
    cache: Arc<ClaimCache>,
}

impl StatsReporter {
    /// A reporter over a shared cache.
    pub fn new(cache: Arc<ClaimCache>) -> Self {
        Self { cache }
    }

    /// Current counts.
    pub fn collect(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Current counts, also emitted as an info event.
    pub fn report(&self) -> CacheStats {
        let stats = self.collect();
        info!(
            total_chunks = stats.total_chunks,
            total_owners = stats.total_owners,
            total_villages = stats.total_villages,
            world_count = stats.world_count,
            village_chunks = stats.village_chunks,
            "claim cache stats"
        );
        stats
    }
}
