pub mod check;
pub mod dissolve;
pub mod owner;
pub mod stats;
pub mod village;

use std::path::Path;

use claim_core::{BulkLoader, ChunkCoord, ClaimCache, ClaimSnapshot, OwnerId};
use tracing::debug;
use uuid::Uuid;

/// Read a snapshot file and load it into a fresh cache.
fn load_cache(path: &Path) -> Result<ClaimCache, String> {
    debug!(path = %path.display(), "reading claim snapshot");
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let snapshot: ClaimSnapshot = serde_json::from_str(&content)
        .map_err(|e| format!("invalid snapshot {}: {e}", path.display()))?;

    let cache = ClaimCache::new();
    BulkLoader::new(&cache)
        .load(snapshot)
        .map_err(|e| e.to_string())?;
    Ok(cache)
}

fn parse_owner(s: &str) -> Result<OwnerId, String> {
    Uuid::parse_str(s)
        .map(OwnerId)
        .map_err(|e| format!("invalid owner uuid \"{s}\": {e}"))
}

/// Sorted, comma-joined coordinates for compact listings.
fn format_coords(coords: impl IntoIterator<Item = ChunkCoord>) -> String {
    let mut coords: Vec<ChunkCoord> = coords.into_iter().collect();
    coords.sort();
    coords
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
