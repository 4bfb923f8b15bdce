use std::path::Path;

use colored::Colorize;

pub fn run(snapshot: &Path, uuid: &str) -> Result<(), String> {
    let owner = super::parse_owner(uuid)?;
    let cache = super::load_cache(snapshot)?;

    let claims = cache.owner_claims(owner);
    if claims.is_empty() {
        println!("  No claims for {uuid}.");
        return Ok(());
    }

    println!("  {} chunks held by {}", claims.len(), uuid.bold());
    println!("  {}", super::format_coords(claims));

    let groups = cache.connected_groups(owner);
    if !groups.is_empty() {
        println!();
        println!("  Personal areas:");
        for (i, group) in groups.iter().enumerate() {
            println!(
                "  {:>3}. {} chunk{}: {}",
                i + 1,
                group.len(),
                if group.len() == 1 { "" } else { "s" },
                super::format_coords(group.chunks.iter().cloned())
            );
        }
    }
    Ok(())
}
