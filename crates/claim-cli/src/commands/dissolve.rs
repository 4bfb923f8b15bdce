use std::path::Path;

use claim_core::VillageId;

pub fn run(
    snapshot: &Path,
    id: u32,
    owner: &str,
    name: &str,
    output: Option<&Path>,
) -> Result<(), String> {
    let heir = super::parse_owner(owner)?;
    let cache = super::load_cache(snapshot)?;
    let village = VillageId(id);

    let converted = cache.convert_village_to_personal(village, heir, name);
    if converted.is_empty() {
        return Err(format!("{village} holds no chunks"));
    }

    let content = serde_json::to_string_pretty(&cache.export())
        .map_err(|e| format!("JSON serialization error: {e}"))?;

    if let Some(path) = output {
        std::fs::write(path, &content)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!(
            "  Converted {} chunks of {village} to {name}; wrote {}",
            converted.len(),
            path.display()
        );
    } else {
        println!("{content}");
    }
    Ok(())
}
