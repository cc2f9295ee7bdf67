use std::path::PathBuf;

use anyhow::{Context, Result};
use euphony_core::display::format_duration;
use euphony_core::model::{RecommendationRecord, SeedRef, SeedSong};
use euphony_recommend::{
    fetch_playlist, read_seed_file, search_link, Config, MatchKind, SpotifyClient,
};

use super::load_recommender;
use crate::tui::{self, SeedRow};

/// Arguments of the `recommend` command.
#[derive(Debug)]
pub struct RecommendRequest {
    pub seeds: Vec<String>,
    pub seeds_file: Option<PathBuf>,
    pub playlist: Option<String>,
    pub per_seed: Option<usize>,
    pub tui: bool,
    pub json: bool,
}

pub async fn run_recommend(config: &Config, request: RecommendRequest) -> Result<()> {
    let seeds = collect_seeds(config, &request).await?;
    let recommender = load_recommender(config)?;
    let per_seed_k = request.per_seed.unwrap_or(config.per_seed_k);

    let report = recommender.recommend(&seeds, per_seed_k)?;

    if request.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let seed_rows: Vec<SeedRow> = seeds
        .iter()
        .map(|seed| SeedRow {
            reference: seed_label(seed),
            matched: recommender.resolve(seed).and_then(|r| {
                recommender
                    .catalog()
                    .get(r.ordinal)
                    .map(|t| (t.name.clone(), r.kind))
            }),
        })
        .collect();

    if request.tui {
        return tui::run_tui(seed_rows, report);
    }

    println!("\nSeeds ({}/{} matched)\n", report.matched, report.total);
    for row in &seed_rows {
        match &row.matched {
            Some((_, MatchKind::Exact)) => println!("  ✓ {}", row.reference),
            Some((name, MatchKind::Partial)) => println!("  ~ {} → {}", row.reference, name),
            None => println!("  ✗ {}", row.reference),
        }
    }
    println!();

    match report.outcome.message() {
        Some(message) => println!("{}", message),
        None => {
            println!("Recommendations\n");
            print!("{}", format_table(report.outcome.records()));
        }
    }

    Ok(())
}

/// Gather seeds from arguments, a seed file, and a playlist, in that order.
async fn collect_seeds(config: &Config, request: &RecommendRequest) -> Result<Vec<SeedRef>> {
    let mut seeds: Vec<SeedRef> = request
        .seeds
        .iter()
        .map(|s| SeedRef::from(s.as_str()))
        .collect();

    if let Some(path) = &request.seeds_file {
        let from_file = read_seed_file(path)
            .with_context(|| format!("Failed to read seeds from {}", path.display()))?;
        seeds.extend(from_file);
    }

    if let Some(playlist) = &request.playlist {
        let client = SpotifyClient::from_config(config).context(
            "Spotify credentials are required for --playlist\n\n\
             Set them with 'euphony config set spotify_client_id <ID>' and \
             'euphony config set spotify_client_secret <SECRET>'",
        )?;
        let songs = fetch_playlist(&client, playlist, config.fetch_timeout())
            .await
            .with_context(|| format!("Failed to fetch playlist {}", playlist))?;
        if songs.is_empty() {
            log::warn!("Playlist {} has no tracks", playlist);
        }
        seeds.extend(songs.into_iter().map(SeedRef::from));
    }

    Ok(seeds)
}

/// A seed as listed to the user. Playlist songs show their artist and,
/// when the playlist reported one, their duration.
fn seed_label(seed: &SeedRef) -> String {
    match seed {
        SeedRef::Song(SeedSong {
            duration_ms: Some(ms),
            ..
        }) => format!("{} ({})", seed, format_duration(*ms)),
        _ => seed.to_string(),
    }
}

/// Render recommendations as an aligned text table.
pub fn format_table(records: &[RecommendationRecord]) -> String {
    let rows: Vec<[String; 5]> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                format!("{}", i + 1),
                r.name.clone(),
                r.artists.display(),
                format_duration(r.duration_ms),
                search_link(&r.name),
            ]
        })
        .collect();

    let header = ["#", "Title", "Artist", "Duration", "Link"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        format!("  {}\n", line.trim_end())
    };

    let mut out = render(&header.map(String::from));
    for row in &rows {
        out.push_str(&render(row));
    }
    out
}
