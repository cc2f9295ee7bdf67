use anyhow::Result;
use euphony_core::display::format_duration;
use euphony_core::model::{SeedRef, FEATURE_NAMES};
use euphony_recommend::{Config, MatchKind};

use super::load_recommender;

pub fn show_resolution(config: &Config, reference: &str) -> Result<()> {
    let recommender = load_recommender(config)?;
    let seed = SeedRef::from(reference);

    let Some(resolution) = recommender.resolve(&seed) else {
        println!("'{}' does not match any catalog track.", reference);
        return Ok(());
    };
    let Some(track) = recommender.catalog().get(resolution.ordinal) else {
        anyhow::bail!("resolved ordinal {} is outside the catalog", resolution.ordinal);
    };

    let kind = match resolution.kind {
        MatchKind::Exact => "exact match",
        MatchKind::Partial => "partial match",
    };

    println!("\n'{}' → track #{} ({})\n", reference, resolution.ordinal, kind);
    println!("  Title:    {}", track.name);
    println!("  Artists:  {}", track.artists.display());
    println!("  Duration: {}", format_duration(track.duration_ms));
    println!("\n  Features:");
    for (name, value) in FEATURE_NAMES.iter().zip(track.features.as_slice()) {
        println!("    {:<18} {}", name, value);
    }

    Ok(())
}
