//! End-to-end tests: catalog file → recommender → merged recommendations.
//!
//! Catalogs are written to temporary CSV files. Playlist sources are
//! in-process mocks, so no test touches the network.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use euphony_core::model::{SeedRef, SeedSong};
use euphony_core::Catalog;
use euphony_recommend::{
    fetch_playlist, read_seed_file, FetchError, FetchResult, Outcome, PlaylistSource, Recommender,
    MAX_RECOMMENDATIONS,
};
use euphony_search::IndexParams;
use tempfile::{NamedTempFile, TempDir};

const HEADER: &str = "id,name,album,artists,danceability,energy,key,loudness,mode,speechiness,\
acousticness,instrumentalness,liveness,valence,tempo,duration_ms,time_signature,year";

/// One CSV row where only `energy` varies between tracks.
fn row(name: &str, artists: &str, energy: f64) -> String {
    format!(
        "id-{name},\"{name}\",Album,\"{artists}\",0.5,{energy},5,-7.0,1,0.04,0.2,0.0,0.1,0.5,120.0,200000,4,2001"
    )
}

/// Three seeds whose neighbor sets overlap, plus outliers.
///
/// Energies on one axis: Low .01, Seed One .10, Bridge A .16, Seed Two .22,
/// Bridge B .27, Seed Three .33, Mid .60, Far .90.
fn overlapping_catalog() -> NamedTempFile {
    let rows = [
        row("Seed One", "['Artist A']", 0.10),
        row("Bridge A", "['Artist B']", 0.16),
        row("Seed Two", "['Artist C']", 0.22),
        row("Bridge B", "['Artist D', 'Artist E']", 0.27),
        row("Seed Three", "['Artist F']", 0.33),
        row("Low", "['Artist G']", 0.01),
        row("Far", "['Artist H']", 0.90),
        row("Mid", "['Artist I']", 0.60),
    ];
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for r in rows {
        writeln!(file, "{r}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn recommender() -> Recommender {
    let file = overlapping_catalog();
    let catalog = Catalog::load(file.path()).unwrap();
    Recommender::new(catalog, &IndexParams::default()).unwrap()
}

fn names(outcome: &Outcome) -> Vec<&str> {
    outcome.records().iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn test_shared_neighbors_outrank_unique_ones() {
    let rec = recommender();
    let seeds: Vec<SeedRef> = ["Seed One", "Seed Two", "Seed Three"]
        .into_iter()
        .map(SeedRef::from)
        .collect();

    let report = rec.recommend(&seeds, 2).unwrap();

    assert_eq!((report.matched, report.total), (3, 3));
    // Seed One → [Bridge A, Low]; Seed Two → [Bridge B, Bridge A];
    // Seed Three → [Bridge B, Seed Two].
    assert_eq!(
        names(&report.outcome),
        vec!["Bridge A", "Bridge B", "Low", "Seed Two"]
    );
}

#[test]
fn test_records_carry_artists_and_duration() {
    let rec = recommender();
    let report = rec.recommend(&["Seed Two".into()], 1).unwrap();

    let records = report.outcome.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Bridge B");
    assert_eq!(records[0].artists.display(), "Artist D, Artist E");
    assert_eq!(records[0].duration_ms, 200_000);
}

#[test]
fn test_mixed_seed_forms() {
    let rec = recommender();
    let seeds = vec![
        SeedRef::from("seed one - Artist A"),
        SeedRef::Song(SeedSong::new("SEED TWO").with_artist("Artist C")),
        SeedRef::from("Not In Catalog"),
    ];
    let report = rec.recommend(&seeds, 2).unwrap();
    assert_eq!((report.matched, report.total), (2, 3));
    assert_eq!(names(&report.outcome)[0], "Bridge A");
}

#[test]
fn test_sentinel_outcomes() {
    let rec = recommender();

    let report = rec.recommend(&[], 20).unwrap();
    assert_eq!(report.outcome, Outcome::NoSongs);

    let report = rec.recommend(&["Bohemian Rhapsody".into()], 20).unwrap();
    assert_eq!(report.outcome, Outcome::NoMatches);
    assert_eq!(report.matched, 0);
}

#[test]
fn test_output_never_exceeds_limit() {
    let rec = recommender();
    let seeds: Vec<SeedRef> = ["Seed One", "Mid", "Far"]
        .into_iter()
        .map(SeedRef::from)
        .collect();
    let report = rec.recommend(&seeds, 20).unwrap();
    let records = report.outcome.records();
    assert!(!records.is_empty());
    assert!(records.len() <= MAX_RECOMMENDATIONS);
    // The catalog has eight tracks; every one is somebody's neighbor.
    assert_eq!(records.len(), 8);
}

#[test]
fn test_malformed_rows_are_dropped() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    writeln!(file, "{}", row("Good", "['A']", 0.5)).unwrap();
    writeln!(file, "{}", row("", "['B']", 0.5)).unwrap();
    writeln!(
        file,
        "id-x,Broken,Album,\"['C']\",0.5,,5,-7.0,1,0.04,0.2,0.0,0.1,0.5,120.0,200000,4,2001"
    )
    .unwrap();
    writeln!(file, "{}", row("Also Good", "['D']", 0.6)).unwrap();
    file.flush().unwrap();

    let catalog = Catalog::load(file.path()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.report().rows_dropped, 2);

    let rec = Recommender::new(catalog, &IndexParams::default()).unwrap();
    let report = rec.recommend(&["Good".into()], 5).unwrap();
    assert_eq!(names(&report.outcome), vec!["Also Good"]);
}

#[test]
fn test_seed_file_drives_recommendations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seeds.txt");
    std::fs::write(&path, "Seed One\n\nSeed Two\nSeed Three\n").unwrap();

    let seeds = read_seed_file(&path).unwrap();
    let report = recommender().recommend(&seeds, 2).unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(names(&report.outcome)[..2], ["Bridge A", "Bridge B"]);
}

// ---------------------------------------------------------------------------
// Playlist fetch
// ---------------------------------------------------------------------------

/// Returns a fixed playlist after an optional delay.
struct MockSource {
    songs: Vec<SeedSong>,
    delay: Duration,
}

#[async_trait]
impl PlaylistSource for MockSource {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn fetch(&self, _playlist_id: &str) -> FetchResult<Vec<SeedSong>> {
        tokio::time::sleep(self.delay).await;
        Ok(self.songs.clone())
    }
}

#[tokio::test]
async fn test_playlist_seeds_feed_recommender() {
    let source = MockSource {
        songs: vec![
            SeedSong::new("Seed One").with_artist("Artist A"),
            SeedSong::new("Seed Two").with_artist("Artist C"),
            SeedSong::new("Seed Three").with_artist("Artist F"),
        ],
        delay: Duration::ZERO,
    };

    let songs = fetch_playlist(
        &source,
        "https://open.spotify.com/playlist/abc123?si=xyz",
        Duration::from_secs(5),
    )
    .await
    .unwrap();
    let seeds: Vec<SeedRef> = songs.into_iter().map(SeedRef::from).collect();

    let report = recommender().recommend(&seeds, 2).unwrap();
    assert_eq!(
        names(&report.outcome),
        vec!["Bridge A", "Bridge B", "Low", "Seed Two"]
    );
}

#[tokio::test]
async fn test_empty_playlist_is_not_an_error() {
    let source = MockSource {
        songs: Vec::new(),
        delay: Duration::ZERO,
    };
    let songs = fetch_playlist(&source, "spotify:playlist:abc123", Duration::from_secs(5))
        .await
        .unwrap();
    assert!(songs.is_empty());

    let seeds: Vec<SeedRef> = songs.into_iter().map(SeedRef::from).collect();
    let report = recommender().recommend(&seeds, 20).unwrap();
    assert_eq!(report.outcome, Outcome::NoSongs);
}

#[tokio::test(start_paused = true)]
async fn test_slow_playlist_times_out() {
    let source = MockSource {
        songs: vec![SeedSong::new("Seed One")],
        delay: Duration::from_secs(60),
    };
    let result = fetch_playlist(&source, "spotify:playlist:abc123", Duration::from_secs(2)).await;
    assert!(matches!(result, Err(FetchError::Timeout { seconds: 2 })));
}
