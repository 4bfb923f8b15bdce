use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::claim::{OwnerId, VillageId};
use crate::coord::ChunkCoord;

/// Set-valued map from an id to the chunks it holds.
///
/// Removing the last member leaves an empty set behind; [`prune_empty`]
/// reclaims those.
///
/// [`prune_empty`]: MemberIndex::prune_empty
#[derive(Debug, Clone)]
pub struct MemberIndex<K> {
    sets: HashMap<K, HashSet<ChunkCoord>>,
}

impl<K> Default for MemberIndex<K> {
    fn default() -> Self {
        Self {
            sets: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Copy> MemberIndex<K> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with room for `ids` ids.
    pub fn with_capacity(ids: usize) -> Self {
        Self {
            sets: HashMap::with_capacity(ids),
        }
    }

    /// Record `coord` as a member of `id`. Returns false if it already was.
    pub fn add(&mut self, id: K, coord: ChunkCoord) -> bool {
        self.sets.entry(id).or_default().insert(coord)
    }

    /// Drop `coord` from `id`. Returns false if it was not a member.
    pub fn remove(&mut self, id: K, coord: &ChunkCoord) -> bool {
        self.sets
            .get_mut(&id)
            .is_some_and(|set| set.remove(coord))
    }

    /// True when `coord` is a member of `id`.
    pub fn contains(&self, id: K, coord: &ChunkCoord) -> bool {
        self.sets.get(&id).is_some_and(|set| set.contains(coord))
    }

    /// A copy of `id`'s members (empty when unknown).
    pub fn members(&self, id: K) -> HashSet<ChunkCoord> {
        self.sets.get(&id).cloned().unwrap_or_default()
    }

    /// Borrow `id`'s members without copying.
    pub(crate) fn members_ref(&self, id: K) -> Option<&HashSet<ChunkCoord>> {
        self.sets.get(&id)
    }

    /// Number of members of `id`.
    pub fn count(&self, id: K) -> usize {
        self.sets.get(&id).map_or(0, HashSet::len)
    }

    /// Remove `id` entirely and hand back its members.
    pub fn remove_all(&mut self, id: K) -> HashSet<ChunkCoord> {
        self.sets.remove(&id).unwrap_or_default()
    }

    /// Number of ids with an entry, including emptied ones not yet pruned.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// True when no id has an entry.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// True when `id` has an entry, even an empty one.
    pub fn has_entry(&self, id: K) -> bool {
        self.sets.contains_key(&id)
    }

    /// Number of ids holding at least one member.
    pub fn active_len(&self) -> usize {
        self.sets.values().filter(|set| !set.is_empty()).count()
    }

    /// Sum of all member counts.
    pub fn total_members(&self) -> usize {
        self.sets.values().map(HashSet::len).sum()
    }

    /// Iterate `(id, members)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &HashSet<ChunkCoord>)> {
        self.sets.iter()
    }

    /// Drop entries whose set is empty. Returns how many were dropped.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.sets.len();
        self.sets.retain(|_, set| !set.is_empty());
        before - self.sets.len()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.sets.clear();
    }
}

/// Owner -> chunks held by that owner.
pub type OwnerIndex = MemberIndex<OwnerId>;

/// Village -> chunks, plus the reverse chunk -> village map.
#[derive(Debug, Clone, Default)]
pub struct VillageIndex {
    members: MemberIndex<VillageId>,
    by_coord: HashMap<ChunkCoord, VillageId>,
}

impl VillageIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute `coord` to `village`, detaching it from any other village first.
    pub fn add(&mut self, village: VillageId, coord: ChunkCoord) {
        let previous = self.by_coord.insert(coord.clone(), village);
        if let Some(previous) = previous.filter(|p| *p != village) {
            self.members.remove(previous, &coord);
        }
        self.members.add(village, coord);
    }

    /// Detach `coord` from `village`. Returns false if it was not attributed to it.
    pub fn remove(&mut self, village: VillageId, coord: &ChunkCoord) -> bool {
        if self.by_coord.get(coord) != Some(&village) {
            return false;
        }
        self.by_coord.remove(coord);
        self.members.remove(village, coord)
    }

    /// The village `coord` belongs to.
    pub fn village_of(&self, coord: &ChunkCoord) -> Option<VillageId> {
        self.by_coord.get(coord).copied()
    }

    /// True when `coord` is attributed to `village`.
    pub fn contains(&self, coord: &ChunkCoord, village: VillageId) -> bool {
        self.village_of(coord) == Some(village)
    }

    /// A copy of `village`'s chunks.
    pub fn members(&self, village: VillageId) -> HashSet<ChunkCoord> {
        self.members.members(village)
    }

    pub(crate) fn members_ref(&self, village: VillageId) -> Option<&HashSet<ChunkCoord>> {
        self.members.members_ref(village)
    }

    /// Number of chunks attributed to `village`.
    pub fn count(&self, village: VillageId) -> usize {
        self.members.count(village)
    }

    /// Remove `village` and every reverse entry pointing at it in one pass.
    pub fn remove_all(&mut self, village: VillageId) -> HashSet<ChunkCoord> {
        let coords = self.members.remove_all(village);
        for coord in &coords {
            self.by_coord.remove(coord);
        }
        coords
    }

    /// Number of villages with an entry.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when no village has an entry.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of villages holding at least one chunk.
    pub fn active_len(&self) -> usize {
        self.members.active_len()
    }

    /// Number of chunks attributed to any village.
    pub fn total_chunks(&self) -> usize {
        self.by_coord.len()
    }

    /// Iterate `(village, chunks)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&VillageId, &HashSet<ChunkCoord>)> {
        self.members.iter()
    }

    /// Drop villages whose chunk set is empty.
    pub fn prune_empty(&mut self) -> usize {
        self.members.prune_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.members.clear();
        self.by_coord.clear();
    }
}
