use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one chunk of world space: its grid position and world name.
///
/// This is the uniform key of the claim table and both membership indices.
/// Fields are private so a key cannot change while it sits inside a map.
/// Ordering is by world name, then `x`, then `z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    world: String,
    x: i32,
    z: i32,
}

impl ChunkCoord {
    /// Create a coordinate for chunk `(x, z)` in `world`.
    pub fn new(x: i32, z: i32, world: impl Into<String>) -> Self {
        Self {
            world: world.into(),
            x,
            z,
        }
    }

    /// Chunk grid x.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Chunk grid z.
    pub fn z(&self) -> i32 {
        self.z
    }

    /// Name of the world the chunk belongs to.
    pub fn world(&self) -> &str {
        &self.world
    }

    /// Flat string key (`world_x_z`) for stores that key rows by a single column.
    pub fn chunk_key(&self) -> String {
        format!("{}_{}_{}", self.world, self.x, self.z)
    }

    /// True when `other` shares an edge with this chunk in the same world.
    /// Diagonal neighbours do not count.
    pub fn is_adjacent(&self, other: &ChunkCoord) -> bool {
        if self.world != other.world {
            return false;
        }
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dz = (i64::from(self.z) - i64::from(other.z)).abs();
        dx + dz == 1
    }

    /// The four edge-sharing neighbours (north, south, west, east).
    ///
    /// Neighbours that would overflow the `i32` grid are skipped.
    pub fn neighbors(&self) -> Vec<ChunkCoord> {
        [(0, -1), (0, 1), (-1, 0), (1, 0)]
            .into_iter()
            .filter_map(|(dx, dz)| {
                let x = self.x.checked_add(dx)?;
                let z = self.z.checked_add(dz)?;
                Some(ChunkCoord::new(x, z, self.world.clone()))
            })
            .collect()
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.world, self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn equal_values_hash_alike() {
        let mut set = HashSet::new();
        set.insert(ChunkCoord::new(3, -7, "world"));
        assert!(set.contains(&ChunkCoord::new(3, -7, String::from("world"))));
        assert!(!set.contains(&ChunkCoord::new(3, -7, "world_nether")));
    }

    #[test]
    fn display_and_chunk_key() {
        let c = ChunkCoord::new(12, -4, "overworld");
        assert_eq!(c.to_string(), "overworld(12,-4)");
        assert_eq!(c.chunk_key(), "overworld_12_-4");
    }

    #[test]
    fn adjacency_is_edge_only_and_per_world() {
        let c = ChunkCoord::new(0, 0, "w");
        assert!(c.is_adjacent(&ChunkCoord::new(1, 0, "w")));
        assert!(c.is_adjacent(&ChunkCoord::new(0, -1, "w")));
        assert!(!c.is_adjacent(&ChunkCoord::new(1, 1, "w")));
        assert!(!c.is_adjacent(&c));
        assert!(!c.is_adjacent(&ChunkCoord::new(1, 0, "other")));
    }

    #[test]
    fn neighbors_are_adjacent() {
        let c = ChunkCoord::new(5, 5, "w");
        let n = c.neighbors();
        assert_eq!(n.len(), 4);
        assert!(n.iter().all(|o| c.is_adjacent(o)));
    }

    #[test]
    fn neighbors_skip_grid_overflow() {
        let c = ChunkCoord::new(i32::MAX, 0, "w");
        assert_eq!(c.neighbors().len(), 3);
    }

    #[test]
    fn ordering_groups_by_world() {
        let mut coords = vec![
            ChunkCoord::new(1, 0, "b"),
            ChunkCoord::new(0, 0, "b"),
            ChunkCoord::new(9, 9, "a"),
        ];
        coords.sort();
        assert_eq!(coords[0].world(), "a");
        assert_eq!(coords[1], ChunkCoord::new(0, 0, "b"));
    }
}
