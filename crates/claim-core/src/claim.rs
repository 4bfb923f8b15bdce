use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coord::ChunkCoord;

/// Unique identifier of a player who can own chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    /// Generate a new random owner ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Opaque identifier of a village. Names, mayors and membership live elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VillageId(pub u32);

impl fmt::Display for VillageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "village#{}", self.0)
    }
}

/// Whether a chunk is held personally or on behalf of a village.
///
/// The village id is carried by the variant, so a village claim without a
/// village cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "village_id", rename_all = "snake_case")]
pub enum ClaimKind {
    /// Owned by a single player.
    Personal,
    /// Owned by the given village.
    Village(VillageId),
}

impl ClaimKind {
    /// The owning village, if any.
    pub fn village(&self) -> Option<VillageId> {
        match self {
            Self::Personal => None,
            Self::Village(id) => Some(*id),
        }
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personal => write!(f, "personal"),
            Self::Village(id) => write!(f, "{id}"),
        }
    }
}

/// Resource a player paid to claim a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Paid from the player's free claim allowance.
    Free,
    /// Paid in iron ingots.
    IronIngot,
    /// Paid in diamonds.
    Diamond,
    /// Paid in netherite ingots.
    NetheriteIngot,
}

/// What a claim cost. Carried alongside the record; the cache never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimCost {
    /// Resource spent.
    pub resource: ResourceType,
    /// Amount of the resource spent.
    pub amount: u32,
    /// Free claim slots consumed.
    pub used_free_slots: u32,
}

/// Current ownership of one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// The claimed chunk.
    pub coord: ChunkCoord,
    /// The owning player (for village claims, the player who placed it).
    pub owner: OwnerId,
    /// Display name of the owning player.
    pub owner_name: String,
    /// Personal or village ownership.
    pub kind: ClaimKind,
    /// When the claim was first made.
    pub created_at: DateTime<Utc>,
    /// When ownership last changed.
    pub updated_at: DateTime<Utc>,
    /// Optional cost metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<ClaimCost>,
}

impl ClaimRecord {
    /// A personal claim created now.
    pub fn personal(coord: ChunkCoord, owner: OwnerId, owner_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            coord,
            owner,
            owner_name: owner_name.into(),
            kind: ClaimKind::Personal,
            created_at: now,
            updated_at: now,
            cost: None,
        }
    }

    /// A village claim created now, placed by `owner` on behalf of `village`.
    pub fn village(
        coord: ChunkCoord,
        village: VillageId,
        owner: OwnerId,
        owner_name: impl Into<String>,
    ) -> Self {
        Self {
            kind: ClaimKind::Village(village),
            ..Self::personal(coord, owner, owner_name)
        }
    }

    /// Attach cost metadata.
    pub fn with_cost(mut self, cost: ClaimCost) -> Self {
        self.cost = Some(cost);
        self
    }

    /// The owning village, if this is a village claim.
    pub fn village_id(&self) -> Option<VillageId> {
        self.kind.village()
    }

    /// Rewrite this claim as a personal claim of `owner`, stamped `at`.
    /// Creation time and cost are kept.
    pub fn make_personal(&mut self, owner: OwnerId, owner_name: &str, at: DateTime<Utc>) {
        self.kind = ClaimKind::Personal;
        self.owner = owner;
        self.owner_name = owner_name.to_string();
        self.updated_at = at;
    }
}
