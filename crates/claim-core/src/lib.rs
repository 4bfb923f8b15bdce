//! Concurrent ownership cache for chunk land claims.
//!
//! The cache tracks which chunk is owned by which player or village and keeps
//! two derived indices (owner -> chunks, village -> chunks) in lockstep with the
//! claim table. All three containers live behind a single reader-writer lock
//! inside [`ClaimCache`]; callers share one instance through an `Arc`.
//!
//! Durability is the caller's concern: the cache is loaded from a
//! [`ClaimSnapshot`] at startup and every mutation is mirrored to storage by
//! whoever performed it.

/// The guarded cache: every read and write of the claim containers.
pub mod cache;
/// Claim records, owner and village identifiers, and claim cost metadata.
pub mod claim;
/// Tuning knobs for a cache instance.
pub mod config;
/// Chunk coordinates and 4-neighbourhood adjacency.
pub mod coord;
/// Error types used throughout the crate.
pub mod error;
/// Derived owner and village membership indices.
pub mod index;
/// Snapshots and bulk loading from a durable store.
pub mod loader;
/// Aggregate counts for diagnostics.
pub mod stats;
/// The primary coordinate -> claim table.
pub mod table;

/// Re-export the cache and connected-group types.
pub use cache::{ClaimCache, ConnectedChunks};
/// Re-export claim record types.
pub use claim::{ClaimCost, ClaimKind, ClaimRecord, OwnerId, ResourceType, VillageId};
/// Re-export cache configuration.
pub use config::CacheConfig;
/// Re-export the coordinate key.
pub use coord::ChunkCoord;
/// Re-export error types.
pub use error::{CacheError, CacheResult};
/// Re-export bulk loading types.
pub use loader::{BulkLoader, ClaimSnapshot, LoadReport};
/// Re-export diagnostics types.
pub use stats::{CacheStats, StatsReporter};
