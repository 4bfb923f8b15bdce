use crate::coord::ChunkCoord;

/// Alias for `Result<T, CacheError>`.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors surfaced to callers of the claim cache.
///
/// Lookups of absent chunks, owners or villages are not errors; they return
/// `None` or an empty collection.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The chunk is already owned, so an exclusive claim was refused.
    #[error("chunk {coord} is already claimed by {owner_name}")]
    AlreadyClaimed {
        /// The contested chunk.
        coord: ChunkCoord,
        /// Display name of the current owner.
        owner_name: String,
    },

    /// A snapshot filed a record under a world or key that does not match it.
    #[error("snapshot bucket \"{world}\" holds a record for {coord}")]
    WorldMismatch {
        /// The world bucket the record was found in.
        world: String,
        /// The record's own coordinate.
        coord: ChunkCoord,
    },

    /// A record stream contained two claims for the same chunk.
    #[error("duplicate claim for chunk {0}")]
    DuplicateClaim(ChunkCoord),
}
