use std::path::Path;

use claim_core::ChunkCoord;
use colored::Colorize;

pub fn run(snapshot: &Path, world: &str, x: i32, z: i32) -> Result<(), String> {
    let cache = super::load_cache(snapshot)?;
    let coord = ChunkCoord::new(x, z, world);

    let Some(claim) = cache.owner_of(&coord) else {
        println!("  {coord} is unclaimed");
        return Ok(());
    };

    println!("  {} [{}]", coord.to_string().bold(), claim.kind.to_string().dimmed());
    println!("  owner:   {} ({})", claim.owner_name, claim.owner.0);
    println!("  claimed: {}", claim.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  updated: {}", claim.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(cost) = claim.cost {
        println!(
            "  cost:    {} x{:?} ({} free slots)",
            cost.amount, cost.resource, cost.used_free_slots
        );
    }
    Ok(())
}
