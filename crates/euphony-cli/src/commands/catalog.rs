use anyhow::Result;
use euphony_core::model::FEATURE_NAMES;
use euphony_recommend::Config;

use super::load_recommender;

pub fn show_catalog(config: &Config) -> Result<()> {
    let recommender = load_recommender(config)?;
    let catalog = recommender.catalog();
    let report = catalog.report();

    println!("\n📊 Euphony Catalog\n");
    println!("  Source: {}", catalog.source_name());
    println!("  Rows read: {}", report.rows_read);
    println!("  Tracks kept: {}", report.rows_kept);
    println!("  Rows dropped: {}", report.rows_dropped);

    let norm = recommender.norm_params();
    println!("\n  Feature normalization:");
    println!("    {:<18} {:>14} {:>14}", "feature", "mean", "std dev");
    for (d, name) in FEATURE_NAMES.iter().enumerate() {
        println!(
            "    {:<18} {:>14.4} {:>14.4}",
            name,
            norm.mean()[d],
            norm.std_dev()[d]
        );
    }

    let index = recommender.index()?;
    let params = index.params();
    println!("\n  Index:");
    println!("    Metric: {:?}", params.metric);
    println!("    Trees: {}", params.tree_count);
    println!("    Leaf size: {}", params.leaf_size);
    println!("    Seed: {}", params.seed);
    println!("    Nodes: {}", index.node_count());
    println!("    Built: {}", index.built_at().format("%Y-%m-%d %H:%M:%S UTC"));

    Ok(())
}
