//! The static track catalog.
//!
//! The catalog is read once from a CSV export with a header row. Rows
//! with a blank name or any missing or non-numeric audio feature are
//! dropped, and the order of the surviving rows fixes each track's
//! ordinal for the lifetime of the process.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use euphony_core::catalog::Catalog;
//!
//! let catalog = Catalog::load(Path::new("tracks_features.csv")).unwrap();
//! println!("{} tracks", catalog.len());
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{
    ArtistCredit, FeatureVector, RecommendationRecord, Track, FEATURE_COUNT, FEATURE_NAMES,
};

const NAME_COLUMN: &str = "name";
const ARTISTS_COLUMN: &str = "artists";

/// Row counts from a catalog load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
}

/// Column positions of the fields a track is built from.
#[derive(Debug)]
struct ColumnMap {
    name: usize,
    artists: usize,
    features: [usize; FEATURE_COUNT],
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or(Error::MissingColumn(column))
        };

        let mut features = [0; FEATURE_COUNT];
        for (slot, column) in features.iter_mut().zip(FEATURE_NAMES) {
            *slot = position(column)?;
        }

        Ok(Self {
            name: position(NAME_COLUMN)?,
            artists: position(ARTISTS_COLUMN)?,
            features,
        })
    }

    /// Build a track from a record, or `None` when the row is incomplete.
    fn track(&self, record: &StringRecord) -> Option<Track> {
        let name = record.get(self.name)?;
        if name.trim().is_empty() {
            return None;
        }

        let mut values = [0.0; FEATURE_COUNT];
        for (value, &column) in values.iter_mut().zip(&self.features) {
            *value = parse_feature(record.get(column)?)?;
        }

        let artists = ArtistCredit::parse(record.get(self.artists).unwrap_or_default());
        Some(Track::new(name, artists, FeatureVector::new(values)))
    }
}

fn parse_feature(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// The loaded, filtered track catalog.
///
/// A track's ordinal is its index in [`Catalog::tracks`].
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
    source_name: String,
    report: LoadReport,
}

impl Catalog {
    /// Load a catalog from a CSV file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, lacks a required
    /// column, or contains no usable rows.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, path.display().to_string())
    }

    /// Load a catalog from any CSV source.
    ///
    /// # Errors
    /// Returns an error if the header is unreadable, lacks a required
    /// column, or no row survives filtering.
    pub fn from_reader<R: Read>(reader: R, source_name: impl Into<String>) -> Result<Self> {
        let source_name = source_name.into();
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let columns = ColumnMap::from_headers(reader.headers()?)?;

        let mut tracks = Vec::new();
        let mut report = LoadReport::default();

        for (row, record) in reader.records().enumerate() {
            report.rows_read += 1;
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("Skipping unreadable row {} in {}: {}", row + 1, source_name, e);
                    report.rows_dropped += 1;
                    continue;
                }
            };

            if let Some(track) = columns.track(&record) {
                tracks.push(track);
            } else {
                report.rows_dropped += 1;
            }
        }
        report.rows_kept = tracks.len();

        if tracks.is_empty() {
            return Err(Error::EmptyCatalog { source_name });
        }

        log::info!(
            "Loaded catalog {}: {} tracks kept, {} rows dropped",
            source_name,
            report.rows_kept,
            report.rows_dropped
        );

        Ok(Self {
            tracks,
            source_name,
            report,
        })
    }

    /// Build a catalog from tracks already in memory (fixtures, tests).
    ///
    /// # Errors
    /// Returns an error if `tracks` is empty, or any track has a blank name
    /// or a non-finite feature.
    pub fn from_tracks(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(Error::EmptyCatalog {
                source_name: "<memory>".to_string(),
            });
        }
        if let Some(pos) = tracks.iter().position(|t| t.name.trim().is_empty()) {
            return Err(Error::InvalidData(format!("track {pos} has a blank name")));
        }
        if let Some(pos) = tracks
            .iter()
            .position(|t| !t.features.as_slice().iter().all(|v| v.is_finite()))
        {
            return Err(Error::InvalidData(format!(
                "track {pos} has a non-finite feature"
            )));
        }

        let report = LoadReport {
            rows_read: tracks.len(),
            rows_kept: tracks.len(),
            rows_dropped: 0,
        };
        Ok(Self {
            tracks,
            source_name: "<memory>".to_string(),
            report,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[must_use]
    pub fn get(&self, ordinal: usize) -> Option<&Track> {
        self.tracks.get(ordinal)
    }

    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// The recommendation record for the track at `ordinal`.
    #[must_use]
    pub fn record(&self, ordinal: usize) -> Option<RecommendationRecord> {
        self.get(ordinal).map(Track::to_record)
    }

    /// Raw feature vectors in ordinal order.
    #[must_use]
    pub fn feature_vectors(&self) -> Vec<FeatureVector> {
        self.tracks.iter().map(|t| t.features).collect()
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    #[must_use]
    pub const fn report(&self) -> LoadReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "id,name,album,artists,danceability,energy,key,loudness,speechiness,acousticness,instrumentalness,liveness,valence,tempo,duration_ms,year";

    fn csv_with_rows(rows: &[&str]) -> String {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv
    }

    #[test]
    fn test_load_keeps_complete_rows_in_order() {
        let csv = csv_with_rows(&[
            "a1,Yesterday,Help!,['The Beatles'],0.3,0.2,5,-10.0,0.03,0.8,0.0,0.1,0.3,96.0,125000,1965",
            "a2,Hey Jude,Single,['The Beatles'],0.4,0.5,5,-8.0,0.03,0.3,0.0,0.2,0.5,74.0,431000,1968",
        ]);
        let catalog = Catalog::from_reader(csv.as_bytes(), "test").unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().name, "Yesterday");
        assert_eq!(catalog.get(1).unwrap().name, "Hey Jude");
        assert_eq!(catalog.get(0).unwrap().duration_ms, 125_000);
        assert_eq!(catalog.get(0).unwrap().artists.display(), "The Beatles");
        assert_eq!(catalog.get(1).unwrap().features.get("year"), Some(1968.0));
    }

    #[test]
    fn test_load_drops_incomplete_rows() {
        let csv = csv_with_rows(&[
            "a1,Complete,X,Band,0.3,0.2,5,-10.0,0.03,0.8,0.0,0.1,0.3,96.0,125000,1965",
            "a2,,X,Band,0.3,0.2,5,-10.0,0.03,0.8,0.0,0.1,0.3,96.0,125000,1965",
            "a3,   ,X,Band,0.3,0.2,5,-10.0,0.03,0.8,0.0,0.1,0.3,96.0,125000,1965",
            "a4,No Energy,X,Band,0.3,,5,-10.0,0.03,0.8,0.0,0.1,0.3,96.0,125000,1965",
            "a5,Bad Tempo,X,Band,0.3,0.2,5,-10.0,0.03,0.8,0.0,0.1,0.3,fast,125000,1965",
            "a6,NaN Year,X,Band,0.3,0.2,5,-10.0,0.03,0.8,0.0,0.1,0.3,96.0,125000,nan",
            "a7,Short Row,X,Band,0.3,0.2",
        ]);
        let catalog = Catalog::from_reader(csv.as_bytes(), "test").unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().name, "Complete");
        assert_eq!(
            catalog.report(),
            LoadReport {
                rows_read: 7,
                rows_kept: 1,
                rows_dropped: 6,
            }
        );
    }

    #[test]
    fn test_retained_tracks_are_complete() {
        let csv = csv_with_rows(&[
            "a1,One,X,Band,0.3,0.2,5,-10.0,0.03,0.8,0.0,0.1,0.3,96.0,125000,1965",
            "a2,Two,X,Band,0.3,0.2,5,-10.0,,0.8,0.0,0.1,0.3,96.0,125000,1965",
            "a3,Three,X,,0.1,0.9,5,-3.0,0.2,0.1,0.5,0.4,0.9,128.0,200000,2004",
        ]);
        let catalog = Catalog::from_reader(csv.as_bytes(), "test").unwrap();

        for track in catalog.iter() {
            assert!(!track.name.trim().is_empty());
            assert!(track.features.as_slice().iter().all(|v| v.is_finite()));
        }
        // A missing artist does not disqualify a row.
        assert_eq!(catalog.get(1).unwrap().artists.display(), "Unknown Artist");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "name,artists,energy\nSong,Band,0.5";
        let err = Catalog::from_reader(csv.as_bytes(), "test").unwrap_err();
        assert!(matches!(err, Error::MissingColumn("danceability")));
    }

    #[test]
    fn test_no_usable_rows_is_an_error() {
        let csv = csv_with_rows(&["a1,,X,Band,0.3,0.2,5,-10.0,0.03,0.8,0.0,0.1,0.3,96.0,125000,1965"]);
        let err = Catalog::from_reader(csv.as_bytes(), "test").unwrap_err();
        assert!(matches!(err, Error::EmptyCatalog { .. }));
    }

    #[test]
    fn test_load_unreadable_path() {
        let result = Catalog::load(Path::new("/nonexistent/tracks.csv"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            csv_with_rows(&[
                "a1,\"Song, With Comma\",X,\"['A', 'B']\",0.3,0.2,5,-10.0,0.03,0.8,0.0,0.1,0.3,96.0,125000,1965"
            ])
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().name, "Song, With Comma");
        assert_eq!(catalog.get(0).unwrap().artists.display(), "AB");
    }

    #[test]
    fn test_from_tracks_rejects_empty() {
        assert!(matches!(
            Catalog::from_tracks(Vec::new()),
            Err(Error::EmptyCatalog { .. })
        ));
    }

    #[test]
    fn test_from_tracks_rejects_non_finite_features() {
        let good = Track::new("Good", ArtistCredit::parse("Band"), FeatureVector::zeros());
        let mut values = [0.0; FEATURE_COUNT];
        values[0] = f64::NAN;
        let bad = Track::new("Bad", ArtistCredit::parse("Band"), FeatureVector::new(values));

        let err = Catalog::from_tracks(vec![good.clone(), bad]).unwrap_err();
        assert!(matches!(err, Error::InvalidData(msg) if msg.contains("track 1")));

        values[0] = f64::INFINITY;
        let infinite = Track::new("Inf", ArtistCredit::parse("Band"), FeatureVector::new(values));
        assert!(Catalog::from_tracks(vec![infinite, good]).is_err());
    }

    #[test]
    fn test_record_projection() {
        let track = Track::new("Song", ArtistCredit::parse("Band"), FeatureVector::zeros());
        let catalog = Catalog::from_tracks(vec![track]).unwrap();
        let record = catalog.record(0).unwrap();
        assert_eq!(record.name, "Song");
        assert!(catalog.record(1).is_none());
    }
}
