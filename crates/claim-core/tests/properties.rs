//! Model-based checks: random operation sequences against a plain map.

use std::collections::{HashMap, HashSet};

use claim_core::{ChunkCoord, ClaimCache, ClaimKind, ClaimRecord, OwnerId, VillageId};
use proptest::prelude::*;
use uuid::Uuid;

const WORLDS: [&str; 2] = ["overworld", "nether"];

#[derive(Debug, Clone)]
enum Op {
    Add { x: i32, z: i32, world: usize, owner: u8, village: Option<u32> },
    TryClaim { x: i32, z: i32, world: usize, owner: u8 },
    Remove { x: i32, z: i32, world: usize },
    Convert { village: u32, owner: u8 },
    Cleanup,
}

fn owner(n: u8) -> OwnerId {
    OwnerId(Uuid::from_u128(u128::from(n) + 1))
}

fn coord(x: i32, z: i32, world: usize) -> ChunkCoord {
    ChunkCoord::new(x, z, WORLDS[world])
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..4i32, 0..4i32, 0..2usize, 0..3u8, proptest::option::of(0..3u32))
            .prop_map(|(x, z, world, owner, village)| Op::Add { x, z, world, owner, village }),
        2 => (0..4i32, 0..4i32, 0..2usize, 0..3u8)
            .prop_map(|(x, z, world, owner)| Op::TryClaim { x, z, world, owner }),
        3 => (0..4i32, 0..4i32, 0..2usize).prop_map(|(x, z, world)| Op::Remove { x, z, world }),
        1 => (0..3u32, 0..3u8).prop_map(|(village, owner)| Op::Convert { village, owner }),
        1 => Just(Op::Cleanup),
    ]
}

/// Expected (owner, kind) per chunk.
type Model = HashMap<ChunkCoord, (OwnerId, ClaimKind)>;

fn apply(cache: &ClaimCache, model: &mut Model, op: &Op) {
    match *op {
        Op::Add { x, z, world, owner: o, village } => {
            let c = coord(x, z, world);
            let record = match village {
                Some(v) => ClaimRecord::village(c.clone(), VillageId(v), owner(o), "p"),
                None => ClaimRecord::personal(c.clone(), owner(o), "p"),
            };
            let kind = record.kind;
            let displaced = cache.add_claim(record);
            assert_eq!(displaced.map(|r| (r.owner, r.kind)), model.insert(c, (owner(o), kind)));
        }
        Op::TryClaim { x, z, world, owner: o } => {
            let c = coord(x, z, world);
            let result = cache.try_claim(ClaimRecord::personal(c.clone(), owner(o), "p"));
            if model.contains_key(&c) {
                assert!(result.is_err());
            } else {
                assert!(result.is_ok());
                model.insert(c, (owner(o), ClaimKind::Personal));
            }
        }
        Op::Remove { x, z, world } => {
            let c = coord(x, z, world);
            let removed = cache.remove_claim(&c);
            assert_eq!(removed.map(|r| (r.owner, r.kind)), model.remove(&c));
        }
        Op::Convert { village, owner: o } => {
            let converted = cache.convert_village_to_personal(VillageId(village), owner(o), "heir");
            let expected: HashSet<ChunkCoord> = model
                .iter()
                .filter(|(_, (_, kind))| *kind == ClaimKind::Village(VillageId(village)))
                .map(|(c, _)| c.clone())
                .collect();
            let got: HashSet<ChunkCoord> = converted.into_iter().map(|r| r.coord).collect();
            assert_eq!(got, expected);
            for c in expected {
                model.insert(c, (owner(o), ClaimKind::Personal));
            }
        }
        Op::Cleanup => {
            cache.cleanup();
        }
    }
}

fn check(cache: &ClaimCache, model: &Model) {
    for world in 0..2 {
        for x in 0..4 {
            for z in 0..4 {
                let c = coord(x, z, world);
                let record = cache.owner_of(&c);
                assert_eq!(cache.is_claimed(&c), record.is_some());
                assert_eq!(record.map(|r| (r.owner, r.kind)), model.get(&c).copied());
                let village = model.get(&c).and_then(|(_, kind)| kind.village());
                assert_eq!(cache.village_of(&c), village);
            }
        }
    }

    for o in 0..3 {
        let expected: HashSet<ChunkCoord> = model
            .iter()
            .filter(|(_, (who, _))| *who == owner(o))
            .map(|(c, _)| c.clone())
            .collect();
        assert_eq!(cache.owner_claim_count(owner(o)), expected.len());
        assert_eq!(cache.owner_claims(owner(o)), expected);
    }

    for v in 0..3 {
        let expected: HashSet<ChunkCoord> = model
            .iter()
            .filter(|(_, (_, kind))| *kind == ClaimKind::Village(VillageId(v)))
            .map(|(c, _)| c.clone())
            .collect();
        assert_eq!(cache.village_chunks(VillageId(v)), expected);
        for c in &expected {
            assert!(cache.is_chunk_in_village(c, VillageId(v)));
        }
    }

    let stats = cache.stats();
    assert_eq!(stats.total_chunks, model.len());
    assert_eq!(
        stats.village_chunks,
        model.values().filter(|(_, kind)| kind.village().is_some()).count()
    );
}

proptest! {
    #[test]
    fn indices_track_the_claim_table(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let cache = ClaimCache::new();
        let mut model = Model::new();
        for op in &ops {
            apply(&cache, &mut model, op);
            check(&cache, &model);
        }
    }

    #[test]
    fn export_load_preserves_queries(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let cache = ClaimCache::new();
        let mut model = Model::new();
        for op in &ops {
            apply(&cache, &mut model, op);
        }

        let reloaded = ClaimCache::new();
        reloaded.load_all(cache.export()).unwrap();
        check(&reloaded, &model);
        prop_assert_eq!(reloaded.stats(), cache.stats());
    }
}
