use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::claim::{ClaimKind, ClaimRecord, OwnerId, VillageId};
use crate::config::CacheConfig;
use crate::coord::ChunkCoord;
use crate::error::{CacheError, CacheResult};
use crate::index::{OwnerIndex, VillageIndex};
use crate::loader::{ClaimSnapshot, LoadReport};
use crate::stats::CacheStats;
use crate::table::ClaimTable;

/// The claim table and its two derived indices.
///
/// Only `ClaimCache` holds one of these, and only behind its lock. Every
/// mutation goes through [`CacheState::insert`] or [`CacheState::detach`]
/// (or the conversion routine), which update all three containers together.
#[derive(Debug)]
struct CacheState {
    table: ClaimTable,
    owners: OwnerIndex,
    villages: VillageIndex,
}

impl CacheState {
    fn new(config: &CacheConfig) -> Self {
        Self {
            table: ClaimTable::with_capacity(config.world_capacity),
            owners: OwnerIndex::with_capacity(config.owner_capacity),
            villages: VillageIndex::new(),
        }
    }

    /// Store `record`, replacing any record for the same chunk. The displaced
    /// record's index entries are dropped before the new ones are added.
    fn insert(&mut self, record: ClaimRecord) -> Option<ClaimRecord> {
        let displaced = self.detach(&record.coord);
        self.owners.add(record.owner, record.coord.clone());
        if let Some(village) = record.village_id() {
            self.villages.add(village, record.coord.clone());
        }
        self.table.put(record);
        displaced
    }

    /// Remove the record for `coord` together with its index entries.
    fn detach(&mut self, coord: &ChunkCoord) -> Option<ClaimRecord> {
        let record = self.table.remove(coord)?;
        self.owners.remove(record.owner, coord);
        if let Some(village) = record.village_id() {
            self.villages.remove(village, coord);
        }
        Some(record)
    }

    fn convert_village(
        &mut self,
        village: VillageId,
        owner: OwnerId,
        owner_name: &str,
        at: DateTime<Utc>,
    ) -> Vec<ClaimRecord> {
        let Some(coords) = self.villages.members_ref(village) else {
            return Vec::new();
        };
        if coords.is_empty() {
            return Vec::new();
        }

        let mut converted = Vec::with_capacity(coords.len());
        for coord in coords {
            let Some(record) = self.table.get_mut(coord) else {
                continue;
            };
            let previous_owner = record.owner;
            record.make_personal(owner, owner_name, at);
            self.owners.remove(previous_owner, coord);
            self.owners.add(owner, coord.clone());
            converted.push(record.clone());
        }

        self.villages.remove_all(village);
        converted.sort_by(|a, b| a.coord.cmp(&b.coord));
        converted
    }

    fn clear(&mut self) {
        self.table.clear();
        self.owners.clear();
        self.villages.clear();
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            total_chunks: self.table.len(),
            total_owners: self.owners.active_len(),
            total_villages: self.villages.active_len(),
            world_count: self.table.world_count(),
            village_chunks: self.villages.total_chunks(),
        }
    }
}

/// A group of edge-connected chunks held by one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedChunks {
    /// The owner of every chunk in the group.
    pub owner: OwnerId,
    /// The chunks, all in one world.
    pub chunks: HashSet<ChunkCoord>,
}

impl ConnectedChunks {
    /// Number of chunks in the group.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True when the group holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// True when `coord` is part of the group.
    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.chunks.contains(coord)
    }

    /// True when `coord` shares an edge with some chunk of the group.
    pub fn is_connected_to(&self, coord: &ChunkCoord) -> bool {
        self.chunks.iter().any(|c| c.is_adjacent(coord))
    }

    fn min_coord(&self) -> Option<&ChunkCoord> {
        self.chunks.iter().min()
    }
}

/// Thread-safe ownership cache over chunk claims.
///
/// The claim table, the owner index and the village index sit behind a single
/// reader-writer lock and are only ever touched as a unit, so a reader sees
/// either all or none of a write. Share one instance between threads with
/// `Arc<ClaimCache>`.
///
/// Read methods return owned copies; the containers never escape the lock.
#[derive(Debug)]
pub struct ClaimCache {
    state: RwLock<CacheState>,
    config: CacheConfig,
}

impl Default for ClaimCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimCache {
    /// An empty cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// An empty cache with the given configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            state: RwLock::new(CacheState::new(&config)),
            config,
        }
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Chunk lookups
    // -----------------------------------------------------------------------

    /// True when `coord` is claimed.
    pub fn is_claimed(&self, coord: &ChunkCoord) -> bool {
        self.state.read().table.contains(coord)
    }

    /// The claim on `coord`, if any.
    pub fn owner_of(&self, coord: &ChunkCoord) -> Option<ClaimRecord> {
        self.state.read().table.get(coord).cloned()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Store a claim, replacing whatever claim the chunk had (last write wins).
    /// Returns the displaced claim.
    pub fn add_claim(&self, record: ClaimRecord) -> Option<ClaimRecord> {
        let coord = record.coord.clone();
        let owner = record.owner;
        let kind = record.kind;
        let displaced = self.state.write().insert(record);

        debug!(
            coord = %coord,
            owner = %owner,
            kind = %kind,
            replaced = displaced.is_some(),
            "claim added"
        );
        displaced
    }

    /// Store a claim only if the chunk is unclaimed.
    ///
    /// The check and the insert happen under one write lock, so two callers
    /// racing for the same chunk cannot both succeed.
    pub fn try_claim(&self, record: ClaimRecord) -> CacheResult<()> {
        let coord = record.coord.clone();
        let owner = record.owner;
        {
            let mut state = self.state.write();
            if let Some(existing) = state.table.get(&record.coord) {
                return Err(CacheError::AlreadyClaimed {
                    coord,
                    owner_name: existing.owner_name.clone(),
                });
            }
            state.insert(record);
        }

        debug!(coord = %coord, owner = %owner, "chunk claimed");
        Ok(())
    }

    /// Remove the claim on `coord`. Absent chunks yield `None` and change nothing.
    pub fn remove_claim(&self, coord: &ChunkCoord) -> Option<ClaimRecord> {
        let removed = self.state.write().detach(coord);
        if let Some(record) = &removed {
            debug!(coord = %coord, owner = %record.owner, kind = %record.kind, "claim removed");
        }
        removed
    }

    /// Hand every chunk of `village` to `owner` as personal claims and dissolve
    /// the village's index entry.
    ///
    /// Runs as one write critical section; readers see the village either
    /// fully intact or fully converted. Returns the rewritten records sorted by
    /// coordinate, or an empty list if the village holds nothing.
    pub fn convert_village_to_personal(
        &self,
        village: VillageId,
        owner: OwnerId,
        owner_name: &str,
    ) -> Vec<ClaimRecord> {
        let started = Instant::now();
        let converted = self
            .state
            .write()
            .convert_village(village, owner, owner_name, Utc::now());
        self.note_bulk_write("convert_village", started);

        if !converted.is_empty() {
            info!(
                village = %village,
                owner = %owner,
                chunks = converted.len(),
                "village converted to personal claims"
            );
        }
        converted
    }

    /// Replace the whole cache with `snapshot`.
    ///
    /// The snapshot is validated before the lock is taken; a malformed snapshot
    /// leaves the cache untouched. Readers never observe a half-loaded cache.
    pub fn load_all(&self, snapshot: ClaimSnapshot) -> CacheResult<LoadReport> {
        snapshot.validate()?;

        let started = Instant::now();
        let stats = {
            let mut state = self.state.write();
            state.clear();
            for record in snapshot.into_records() {
                state.insert(record);
            }
            state.stats()
        };
        self.note_bulk_write("load_all", started);

        let report = LoadReport {
            chunks: stats.total_chunks,
            worlds: stats.world_count,
            villages: stats.total_villages,
            elapsed: started.elapsed(),
        };
        info!(
            chunks = report.chunks,
            worlds = report.worlds,
            villages = report.villages,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "claim cache loaded"
        );
        Ok(report)
    }

    /// Drop emptied world, owner and village entries. Query results are unaffected.
    /// Returns how many entries were reclaimed.
    pub fn cleanup(&self) -> usize {
        let started = Instant::now();
        let reclaimed = {
            let mut state = self.state.write();
            state.table.prune_empty_worlds() + state.owners.prune_empty() + state.villages.prune_empty()
        };
        self.note_bulk_write("cleanup", started);

        debug!(reclaimed, "claim cache cleaned up");
        reclaimed
    }

    // -----------------------------------------------------------------------
    // Village queries
    // -----------------------------------------------------------------------

    /// All chunks attributed to `village`.
    pub fn village_chunks(&self, village: VillageId) -> HashSet<ChunkCoord> {
        self.state.read().villages.members(village)
    }

    /// Number of chunks attributed to `village`.
    pub fn village_chunk_count(&self, village: VillageId) -> usize {
        self.state.read().villages.count(village)
    }

    /// True when `coord` is a claim of `village`.
    pub fn is_chunk_in_village(&self, coord: &ChunkCoord, village: VillageId) -> bool {
        self.state.read().villages.contains(coord, village)
    }

    /// The village owning `coord`, if it is a village claim.
    pub fn village_of(&self, coord: &ChunkCoord) -> Option<VillageId> {
        self.state.read().villages.village_of(coord)
    }

    // -----------------------------------------------------------------------
    // Owner queries
    // -----------------------------------------------------------------------

    /// All chunks held by `owner`, personal and village alike.
    pub fn owner_claims(&self, owner: OwnerId) -> HashSet<ChunkCoord> {
        self.state.read().owners.members(owner)
    }

    /// Number of chunks held by `owner`.
    pub fn owner_claim_count(&self, owner: OwnerId) -> usize {
        self.state.read().owners.count(owner)
    }

    /// Partition `owner`'s personal claims into edge-connected groups.
    ///
    /// Groups are ordered largest first, ties broken by their smallest coordinate.
    pub fn connected_groups(&self, owner: OwnerId) -> Vec<ConnectedChunks> {
        let personal: HashSet<ChunkCoord> = {
            let state = self.state.read();
            let Some(coords) = state.owners.members_ref(owner) else {
                return Vec::new();
            };
            coords
                .iter()
                .filter(|c| {
                    state
                        .table
                        .get(c)
                        .is_some_and(|r| r.kind == ClaimKind::Personal)
                })
                .cloned()
                .collect()
        };

        let mut visited: HashSet<ChunkCoord> = HashSet::with_capacity(personal.len());
        let mut groups = Vec::new();
        for start in &personal {
            if visited.contains(start) {
                continue;
            }
            let mut chunks = HashSet::new();
            let mut queue = VecDeque::from([start.clone()]);
            visited.insert(start.clone());
            while let Some(current) = queue.pop_front() {
                for next in current.neighbors() {
                    if personal.contains(&next) && visited.insert(next.clone()) {
                        queue.push_back(next);
                    }
                }
                chunks.insert(current);
            }
            groups.push(ConnectedChunks { owner, chunks });
        }

        groups.sort_by(|a, b| {
            b.len()
                .cmp(&a.len())
                .then_with(|| a.min_coord().cmp(&b.min_coord()))
        });
        groups
    }

    // -----------------------------------------------------------------------
    // Whole-cache views
    // -----------------------------------------------------------------------

    /// Aggregate counts, taken under one read lock.
    pub fn stats(&self) -> CacheStats {
        self.state.read().stats()
    }

    /// A consistent copy of every claim, suitable for handing to a store.
    pub fn export(&self) -> ClaimSnapshot {
        let state = self.state.read();
        let mut snapshot = ClaimSnapshot::new();
        for record in state.table.iter() {
            snapshot.insert(record.clone());
        }
        snapshot
    }

    fn note_bulk_write(&self, op: &'static str, started: Instant) {
        let elapsed = started.elapsed();
        if self.config.is_slow(elapsed) {
            warn!(op, elapsed_ms = elapsed.as_millis() as u64, "slow claim cache write");
        }
    }
}
