use std::path::Path;

use claim_core::VillageId;

pub fn run(snapshot: &Path, id: u32) -> Result<(), String> {
    let cache = super::load_cache(snapshot)?;
    let village = VillageId(id);

    let chunks = cache.village_chunks(village);
    if chunks.is_empty() {
        println!("  {village} holds no chunks.");
        return Ok(());
    }

    println!("  {village}: {} chunks", chunks.len());
    println!("  {}", super::format_coords(chunks));
    Ok(())
}
