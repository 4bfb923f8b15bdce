use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::ClaimCache;
use crate::claim::ClaimRecord;
use crate::coord::ChunkCoord;
use crate::error::{CacheError, CacheResult};

/// A materialized copy of every claim, grouped world -> chunk -> record.
///
/// This is what a durable store hands to [`ClaimCache::load_all`] at startup
/// and what [`ClaimCache::export`] hands back. Serialized as a flat array of
/// records sorted by coordinate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ClaimRecord>", into = "Vec<ClaimRecord>")]
pub struct ClaimSnapshot {
    worlds: HashMap<String, HashMap<ChunkCoord, ClaimRecord>>,
}

impl ClaimSnapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-grouped map. Call [`validate`](Self::validate) (or let
    /// `load_all` do it) before trusting the grouping.
    pub fn from_worlds(worlds: HashMap<String, HashMap<ChunkCoord, ClaimRecord>>) -> Self {
        Self { worlds }
    }

    /// Group a flat record stream. Two records for one chunk is an error.
    pub fn from_records(records: impl IntoIterator<Item = ClaimRecord>) -> CacheResult<Self> {
        let mut snapshot = Self::new();
        for record in records {
            let bucket = snapshot
                .worlds
                .entry(record.coord.world().to_string())
                .or_default();
            match bucket.entry(record.coord.clone()) {
                Entry::Occupied(slot) => return Err(CacheError::DuplicateClaim(slot.key().clone())),
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }
        Ok(snapshot)
    }

    /// Add a record under its own world and coordinate, returning any record it replaced.
    pub fn insert(&mut self, record: ClaimRecord) -> Option<ClaimRecord> {
        self.worlds
            .entry(record.coord.world().to_string())
            .or_default()
            .insert(record.coord.clone(), record)
    }

    /// Check that every record sits under its own world and coordinate.
    pub fn validate(&self) -> CacheResult<()> {
        for (world, bucket) in &self.worlds {
            for (key, record) in bucket {
                if record.coord.world() != world || record.coord != *key {
                    return Err(CacheError::WorldMismatch {
                        world: world.clone(),
                        coord: record.coord.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.worlds.values().map(HashMap::len).sum()
    }

    /// True when the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.worlds.values().all(HashMap::is_empty)
    }

    /// Number of worlds holding at least one record.
    pub fn world_count(&self) -> usize {
        self.worlds.values().filter(|b| !b.is_empty()).count()
    }

    /// The record stored for `coord`.
    pub fn get(&self, coord: &ChunkCoord) -> Option<&ClaimRecord> {
        self.worlds.get(coord.world())?.get(coord)
    }

    /// Iterate all records.
    pub fn records(&self) -> impl Iterator<Item = &ClaimRecord> {
        self.worlds.values().flat_map(HashMap::values)
    }

    /// Consume the snapshot into its records.
    pub fn into_records(self) -> impl Iterator<Item = ClaimRecord> {
        self.worlds.into_values().flat_map(HashMap::into_values)
    }
}

impl TryFrom<Vec<ClaimRecord>> for ClaimSnapshot {
    type Error = CacheError;

    fn try_from(records: Vec<ClaimRecord>) -> CacheResult<Self> {
        Self::from_records(records)
    }
}

impl From<ClaimSnapshot> for Vec<ClaimRecord> {
    fn from(snapshot: ClaimSnapshot) -> Self {
        let mut records: Vec<ClaimRecord> = snapshot.into_records().collect();
        records.sort_by(|a, b| a.coord.cmp(&b.coord));
        records
    }
}

/// Summary of a completed bulk load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Claims loaded.
    pub chunks: usize,
    /// Worlds with at least one claim.
    pub worlds: usize,
    /// Villages with at least one claim.
    pub villages: usize,
    /// Time spent rebuilding, including the write lock wait.
    pub elapsed: Duration,
}

/// Startup helper that rebuilds a [`ClaimCache`] from store output.
pub struct BulkLoader<'a> {
    cache: &'a ClaimCache,
}

impl<'a> BulkLoader<'a> {
    /// A loader that writes into `cache`.
    pub fn new(cache: &'a ClaimCache) -> Self {
        Self { cache }
    }

    /// Replace the cache contents with `snapshot`.
    pub fn load(&self, snapshot: ClaimSnapshot) -> CacheResult<LoadReport> {
        debug!(records = snapshot.len(), "bulk loading claim snapshot");
        self.cache.load_all(snapshot)
    }

    /// Group a flat record stream (one row per claim) and load it.
    pub fn load_records(
        &self,
        records: impl IntoIterator<Item = ClaimRecord>,
    ) -> CacheResult<LoadReport> {
        self.load(ClaimSnapshot::from_records(records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{OwnerId, VillageId};

    fn rec(x: i32, z: i32, world: &str) -> ClaimRecord {
        ClaimRecord::personal(ChunkCoord::new(x, z, world), OwnerId::new(), "Alex")
    }

    #[test]
    fn from_records_groups_by_world() {
        let snapshot = ClaimSnapshot::from_records([rec(0, 0, "a"), rec(1, 0, "a"), rec(0, 0, "b")]).unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.world_count(), 2);
        assert!(snapshot.get(&ChunkCoord::new(1, 0, "a")).is_some());
    }

    #[test]
    fn from_records_rejects_duplicates() {
        let err = ClaimSnapshot::from_records([rec(0, 0, "a"), rec(0, 0, "a")]).unwrap_err();
        assert!(matches!(err, CacheError::DuplicateClaim(c) if c == ChunkCoord::new(0, 0, "a")));
    }

    #[test]
    fn validate_catches_misfiled_record() {
        let mut bucket = HashMap::new();
        bucket.insert(ChunkCoord::new(0, 0, "a"), rec(0, 0, "b"));
        let snapshot = ClaimSnapshot::from_worlds(HashMap::from([("a".to_string(), bucket)]));
        assert!(matches!(snapshot.validate(), Err(CacheError::WorldMismatch { .. })));
    }

    #[test]
    fn validate_catches_wrong_key() {
        let mut bucket = HashMap::new();
        bucket.insert(ChunkCoord::new(9, 9, "a"), rec(0, 0, "a"));
        let snapshot = ClaimSnapshot::from_worlds(HashMap::from([("a".to_string(), bucket)]));
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn malformed_snapshot_leaves_cache_untouched() {
        let cache = ClaimCache::new();
        cache.add_claim(rec(5, 5, "a"));

        let mut bucket = HashMap::new();
        bucket.insert(ChunkCoord::new(0, 0, "a"), rec(0, 0, "b"));
        let bad = ClaimSnapshot::from_worlds(HashMap::from([("a".to_string(), bucket)]));

        assert!(BulkLoader::new(&cache).load(bad).is_err());
        assert!(cache.is_claimed(&ChunkCoord::new(5, 5, "a")));
        assert_eq!(cache.stats().total_chunks, 1);
    }

    #[test]
    fn load_records_replaces_previous_contents() {
        let cache = ClaimCache::new();
        cache.add_claim(rec(100, 100, "old"));
        let mayor = OwnerId::new();
        let records = vec![
            ClaimRecord::village(ChunkCoord::new(0, 0, "a"), VillageId(1), mayor, "Mayor"),
            rec(1, 1, "a"),
        ];

        let report = BulkLoader::new(&cache).load_records(records).unwrap();
        assert_eq!(report.chunks, 2);
        assert_eq!(report.worlds, 1);
        assert_eq!(report.villages, 1);
        assert!(!cache.is_claimed(&ChunkCoord::new(100, 100, "old")));
        assert_eq!(cache.owner_claim_count(mayor), 1);
    }

    #[test]
    fn json_is_a_sorted_record_array() {
        let snapshot = ClaimSnapshot::from_records([rec(2, 0, "w"), rec(1, 0, "w")]).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();
        let array = json.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["coord"]["x"], 1);

        let back: ClaimSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn json_with_duplicates_fails_to_parse() {
        let r = rec(0, 0, "w");
        let json = serde_json::to_string(&vec![r.clone(), r]).unwrap();
        assert!(serde_json::from_str::<ClaimSnapshot>(&json).is_err());
    }
}
