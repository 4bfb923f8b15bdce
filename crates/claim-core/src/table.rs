use std::collections::HashMap;

use crate::claim::ClaimRecord;
use crate::coord::ChunkCoord;

/// Source of truth: chunk coordinate -> claim record.
///
/// Records are bucketed per world so that world counts are cheap and emptied
/// worlds can be reclaimed. The table has no locking of its own; it is only
/// reachable through [`ClaimCache`](crate::ClaimCache).
#[derive(Debug, Clone, Default)]
pub struct ClaimTable {
    worlds: HashMap<String, HashMap<ChunkCoord, ClaimRecord>>,
}

impl ClaimTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `worlds` world buckets.
    pub fn with_capacity(worlds: usize) -> Self {
        Self {
            worlds: HashMap::with_capacity(worlds),
        }
    }

    /// The record for `coord`, if claimed.
    pub fn get(&self, coord: &ChunkCoord) -> Option<&ClaimRecord> {
        self.worlds.get(coord.world())?.get(coord)
    }

    /// Mutable access to the record for `coord`.
    pub(crate) fn get_mut(&mut self, coord: &ChunkCoord) -> Option<&mut ClaimRecord> {
        self.worlds.get_mut(coord.world())?.get_mut(coord)
    }

    /// True when `coord` has a record.
    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.get(coord).is_some()
    }

    /// Store `record` under its own coordinate. Returns the record it replaced.
    pub fn put(&mut self, record: ClaimRecord) -> Option<ClaimRecord> {
        self.worlds
            .entry(record.coord.world().to_string())
            .or_default()
            .insert(record.coord.clone(), record)
    }

    /// Remove and return the record for `coord`. The world bucket stays until pruned.
    pub fn remove(&mut self, coord: &ChunkCoord) -> Option<ClaimRecord> {
        self.worlds.get_mut(coord.world())?.remove(coord)
    }

    /// Total number of records across all worlds.
    pub fn len(&self) -> usize {
        self.worlds.values().map(HashMap::len).sum()
    }

    /// True when no world holds a record.
    pub fn is_empty(&self) -> bool {
        self.worlds.values().all(HashMap::is_empty)
    }

    /// Number of worlds holding at least one record.
    pub fn world_count(&self) -> usize {
        self.worlds.values().filter(|b| !b.is_empty()).count()
    }

    /// Number of allocated world buckets, including emptied ones.
    pub fn bucket_count(&self) -> usize {
        self.worlds.len()
    }

    /// All records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ClaimRecord> {
        self.worlds.values().flat_map(HashMap::values)
    }

    /// Drop every record and bucket.
    pub fn clear(&mut self) {
        self.worlds.clear();
    }

    /// Drop empty world buckets. Returns how many were dropped.
    pub fn prune_empty_worlds(&mut self) -> usize {
        let before = self.worlds.len();
        self.worlds.retain(|_, bucket| !bucket.is_empty());
        before - self.worlds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::OwnerId;

    fn claim(x: i32, z: i32, world: &str) -> ClaimRecord {
        ClaimRecord::personal(ChunkCoord::new(x, z, world), OwnerId::new(), "Alex")
    }

    #[test]
    fn put_get_remove() {
        let mut table = ClaimTable::new();
        assert!(table.put(claim(1, 1, "w")).is_none());
        assert!(table.contains(&ChunkCoord::new(1, 1, "w")));
        assert_eq!(table.len(), 1);

        let removed = table.remove(&ChunkCoord::new(1, 1, "w")).unwrap();
        assert_eq!(removed.coord, ChunkCoord::new(1, 1, "w"));
        assert!(table.get(&ChunkCoord::new(1, 1, "w")).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn put_returns_previous_record() {
        let mut table = ClaimTable::new();
        let first = claim(0, 0, "w");
        table.put(first.clone());
        let previous = table.put(claim(0, 0, "w")).unwrap();
        assert_eq!(previous.owner, first.owner);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn remove_absent_is_none() {
        let mut table = ClaimTable::new();
        assert!(table.remove(&ChunkCoord::new(0, 0, "nowhere")).is_none());
        assert_eq!(table.bucket_count(), 0);
    }

    #[test]
    fn worlds_are_counted_and_pruned() {
        let mut table = ClaimTable::with_capacity(2);
        table.put(claim(0, 0, "a"));
        table.put(claim(0, 0, "b"));
        assert_eq!(table.world_count(), 2);

        table.remove(&ChunkCoord::new(0, 0, "b"));
        assert_eq!(table.world_count(), 1);
        assert_eq!(table.bucket_count(), 2);

        assert_eq!(table.prune_empty_worlds(), 1);
        assert_eq!(table.bucket_count(), 1);
        assert_eq!(table.len(), 1);
    }
}
