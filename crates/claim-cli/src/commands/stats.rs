use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(snapshot: &Path) -> Result<(), String> {
    let cache = super::load_cache(snapshot)?;
    let stats = cache.stats();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Count"]);
    table.add_row(vec!["chunks".to_string(), stats.total_chunks.to_string()]);
    table.add_row(vec!["personal chunks".to_string(), stats.personal_chunks().to_string()]);
    table.add_row(vec!["village chunks".to_string(), stats.village_chunks.to_string()]);
    table.add_row(vec!["owners".to_string(), stats.total_owners.to_string()]);
    table.add_row(vec!["villages".to_string(), stats.total_villages.to_string()]);
    table.add_row(vec!["worlds".to_string(), stats.world_count.to_string()]);

    println!("{table}");
    Ok(())
}
