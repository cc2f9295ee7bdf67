use anyhow::Result;
use euphony_core::display::format_duration;
use euphony_core::model::SeedRef;
use euphony_recommend::Config;

use super::load_recommender;

pub fn show_similar(config: &Config, title: &str, k: usize) -> Result<()> {
    let recommender = load_recommender(config)?;
    let seed = SeedRef::from(title);

    let Some(similar) = recommender.similar(&seed, k)? else {
        println!("No matching songs found in the database.");
        return Ok(());
    };

    if let Some(track) = recommender.catalog().get(similar.seed.ordinal) {
        println!(
            "\nSongs like {} by {} ({})\n",
            track.name,
            track.artists.display(),
            format_duration(track.duration_ms)
        );
    }

    if similar.neighbors.is_empty() {
        println!("No recommendations found.");
        return Ok(());
    }

    for (i, (record, distance)) in similar.neighbors.iter().enumerate() {
        println!(
            "  {:>2}. {} - {} ({})  [{:.3}]",
            i + 1,
            record.name,
            record.artists.display(),
            format_duration(record.duration_ms),
            distance
        );
    }

    Ok(())
}
