//! The recommendation service.
//!
//! A [`Recommender`] is built once from a loaded catalog. It fits the
//! normalization parameters, builds the index, and then answers any number
//! of `recommend` calls through `&self`.

use std::fmt;
use std::sync::Arc;

use euphony_core::model::{RecommendationRecord, SeedRef};
use euphony_core::Catalog;
use euphony_search::{AnnIndex, IndexParams, IndexSlot, Neighbor, NormParams};
use serde::Serialize;

use crate::error::RecommendResult;
use crate::merge::merge;
use crate::resolve::{Resolution, SongResolver};

/// Default number of neighbors fetched per seed before merging.
pub const DEFAULT_PER_SEED_K: usize = 20;

/// What a recommendation request produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "tracks", rename_all = "snake_case")]
pub enum Outcome {
    /// A non-empty ranked list of at most ten tracks.
    Recommendations(Vec<RecommendationRecord>),
    /// The request carried no seeds at all.
    NoSongs,
    /// None of the seeds matched a catalog track.
    NoMatches,
    /// Seeds matched, but no neighbors survived merging.
    NoRecommendations,
}

impl Outcome {
    /// The user-facing message for the empty outcomes.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Recommendations(_) => None,
            Self::NoSongs => Some("No songs to recommend."),
            Self::NoMatches => Some("No matching songs found in the database."),
            Self::NoRecommendations => Some("No recommendations found."),
        }
    }

    /// The recommended tracks, empty for every sentinel outcome.
    #[must_use]
    pub fn records(&self) -> &[RecommendationRecord] {
        match self {
            Self::Recommendations(records) => records,
            _ => &[],
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !matches!(self, Self::Recommendations(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => f.write_str(message),
            None => write!(f, "{} recommendations", self.records().len()),
        }
    }
}

/// The result of [`Recommender::recommend`], with match statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendReport {
    pub outcome: Outcome,
    /// Seeds that resolved to a catalog track.
    pub matched: usize,
    /// Seeds supplied.
    pub total: usize,
}

/// A catalog track found for a seed, with its neighbors.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarTracks {
    pub seed: Resolution,
    pub neighbors: Vec<(RecommendationRecord, f64)>,
}

/// Content-based recommender over one catalog.
#[derive(Debug)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    resolver: SongResolver,
    norm: NormParams,
    slot: IndexSlot,
}

impl Recommender {
    /// Fit normalization over `catalog` and build the initial index.
    ///
    /// # Errors
    /// Returns an error when the index parameters are invalid.
    pub fn new(catalog: Catalog, params: &IndexParams) -> RecommendResult<Self> {
        let catalog = Arc::new(catalog);
        let norm = NormParams::fit(&catalog.feature_vectors())?;
        let resolver = SongResolver::new(&catalog);
        let recommender = Self {
            catalog,
            resolver,
            norm,
            slot: IndexSlot::new(),
        };
        recommender.rebuild_index(params)?;
        Ok(recommender)
    }

    /// Build a fresh index from the full catalog and swap it in.
    ///
    /// Queries already holding the previous index finish against it.
    ///
    /// # Errors
    /// Returns an error when the parameters are invalid; the live index is
    /// left untouched in that case.
    pub fn rebuild_index(&self, params: &IndexParams) -> RecommendResult<()> {
        let vectors = self.norm.transform_all(&self.catalog.feature_vectors());
        let index = AnnIndex::build(vectors, params)?;
        if self.slot.install(index).is_some() {
            log::info!("Replaced live index");
        }
        Ok(())
    }

    /// Recommend up to ten tracks for a list of seeds.
    ///
    /// Unmatched seeds are skipped. Each matched seed contributes its
    /// `per_seed_k` nearest neighbors, and the lists are merged by how
    /// often each track appears.
    ///
    /// # Errors
    /// Only fails if the index is missing, which cannot happen for a
    /// recommender built through [`Recommender::new`].
    pub fn recommend(
        &self,
        seeds: &[SeedRef],
        per_seed_k: usize,
    ) -> RecommendResult<RecommendReport> {
        let total = seeds.len();
        if seeds.is_empty() {
            return Ok(RecommendReport {
                outcome: Outcome::NoSongs,
                matched: 0,
                total,
            });
        }

        let index = self.slot.current()?;
        let mut lists = Vec::new();
        for seed in seeds {
            let Some(resolution) = self.resolver.resolve(seed) else {
                log::debug!("Seed '{}' did not match any catalog track", seed);
                continue;
            };
            log::debug!(
                "Seed '{}' matched ordinal {} ({:?})",
                seed,
                resolution.ordinal,
                resolution.kind
            );
            let neighbors = index.query(resolution.ordinal, per_seed_k)?;
            lists.push(self.project(&neighbors));
        }

        let matched = lists.len();
        log::info!("Successfully matched {}/{} songs", matched, total);

        let outcome = if matched == 0 {
            Outcome::NoMatches
        } else {
            let merged = merge(&lists);
            if merged.is_empty() {
                Outcome::NoRecommendations
            } else {
                Outcome::Recommendations(merged)
            }
        };

        Ok(RecommendReport {
            outcome,
            matched,
            total,
        })
    }

    /// The `k` nearest tracks to a single seed, with distances in
    /// normalized space. `None` when the seed does not resolve.
    ///
    /// # Errors
    /// Fails only if the index is missing.
    pub fn similar(&self, seed: &SeedRef, k: usize) -> RecommendResult<Option<SimilarTracks>> {
        let Some(resolution) = self.resolver.resolve(seed) else {
            return Ok(None);
        };
        let neighbors = self.slot.query(resolution.ordinal, k)?;
        let neighbors = neighbors
            .iter()
            .filter_map(|n| self.catalog.record(n.ordinal).map(|r| (r, n.distance)))
            .collect();
        Ok(Some(SimilarTracks {
            seed: resolution,
            neighbors,
        }))
    }

    /// Resolve a seed without querying the index.
    #[must_use]
    pub fn resolve(&self, seed: &SeedRef) -> Option<Resolution> {
        self.resolver.resolve(seed)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn norm_params(&self) -> &NormParams {
        &self.norm
    }

    /// The live index.
    ///
    /// # Errors
    /// Fails only if no index has been installed.
    pub fn index(&self) -> RecommendResult<Arc<AnnIndex>> {
        Ok(self.slot.current()?)
    }

    fn project(&self, neighbors: &[Neighbor]) -> Vec<RecommendationRecord> {
        neighbors
            .iter()
            .filter_map(|n| self.catalog.record(n.ordinal))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euphony_core::model::{ArtistCredit, FeatureVector, SeedSong, Track, FEATURE_COUNT};
    use euphony_search::SearchError;

    use crate::error::RecommendError;

    fn track(name: &str, level: f64) -> Track {
        let mut features = [0.5; FEATURE_COUNT];
        features[0] = level;
        features[9] = 180_000.0;
        Track::new(name, ArtistCredit::parse("['Band']"), FeatureVector::new(features))
    }

    fn recommender(names: &[&str]) -> Recommender {
        let tracks = names
            .iter()
            .enumerate()
            .map(|(i, name)| track(name, f64::from(u32::try_from(i).unwrap()) / 10.0))
            .collect();
        Recommender::new(Catalog::from_tracks(tracks).unwrap(), &IndexParams::default()).unwrap()
    }

    #[test]
    fn test_recommender_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Recommender>();
    }

    #[test]
    fn test_no_songs() {
        let rec = recommender(&["A", "B", "C"]);
        let report = rec.recommend(&[], DEFAULT_PER_SEED_K).unwrap();
        assert_eq!(report.outcome, Outcome::NoSongs);
        assert_eq!(report.outcome.message(), Some("No songs to recommend."));
        assert_eq!((report.matched, report.total), (0, 0));
    }

    #[test]
    fn test_no_matches() {
        let rec = recommender(&["A", "B", "C"]);
        let report = rec
            .recommend(&["Zebra".into(), "Yak".into()], DEFAULT_PER_SEED_K)
            .unwrap();
        assert_eq!(report.outcome, Outcome::NoMatches);
        assert_eq!(
            report.outcome.to_string(),
            "No matching songs found in the database."
        );
        assert_eq!((report.matched, report.total), (0, 2));
    }

    #[test]
    fn test_single_track_catalog_has_no_recommendations() {
        let rec = recommender(&["Only"]);
        let report = rec.recommend(&["Only".into()], DEFAULT_PER_SEED_K).unwrap();
        assert_eq!(report.outcome, Outcome::NoRecommendations);
        assert_eq!(report.outcome.message(), Some("No recommendations found."));
        assert_eq!(report.matched, 1);
    }

    #[test]
    fn test_zero_per_seed_k_has_no_recommendations() {
        let rec = recommender(&["A", "B", "C"]);
        let report = rec.recommend(&["A".into()], 0).unwrap();
        assert_eq!(report.outcome, Outcome::NoRecommendations);
    }

    #[test]
    fn test_partial_resolution_counts() {
        let rec = recommender(&["A", "B", "C", "D"]);
        let seeds = vec![
            SeedRef::from("A"),
            SeedRef::from("missing"),
            SeedRef::Song(SeedSong::new("C")),
        ];
        let report = rec.recommend(&seeds, 2).unwrap();
        assert_eq!((report.matched, report.total), (2, 3));
        assert!(!report.outcome.is_empty());
    }

    #[test]
    fn test_output_is_capped_at_ten() {
        let names: Vec<String> = (0..40).map(|i| format!("Song {i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let rec = recommender(&refs);
        let seeds: Vec<SeedRef> = ["Song 05", "Song 20", "Song 35"]
            .into_iter()
            .map(SeedRef::from)
            .collect();
        let report = rec.recommend(&seeds, 20).unwrap();
        let records = report.outcome.records();
        assert_eq!(records.len(), 10);
    }

    #[test]
    fn test_recommend_is_repeatable() {
        let rec = recommender(&["A", "B", "C", "D", "E", "F"]);
        let seeds = vec![SeedRef::from("B"), SeedRef::from("E")];
        let first = rec.recommend(&seeds, 3).unwrap();
        let second = rec.recommend(&seeds, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rebuild_with_same_params_keeps_answers() {
        let rec = recommender(&["A", "B", "C", "D", "E", "F"]);
        let seeds = vec![SeedRef::from("C")];
        let before = rec.recommend(&seeds, 3).unwrap();
        let held = rec.index().unwrap();

        rec.rebuild_index(&IndexParams::default()).unwrap();
        let after = rec.recommend(&seeds, 3).unwrap();

        assert_eq!(before, after);
        assert!(!Arc::ptr_eq(&held, &rec.index().unwrap()));
        assert_eq!(held.query(2, 3).unwrap(), rec.index().unwrap().query(2, 3).unwrap());
    }

    #[test]
    fn test_invalid_rebuild_keeps_live_index() {
        let rec = recommender(&["A", "B", "C"]);
        let held = rec.index().unwrap();
        let params = IndexParams {
            tree_count: 0,
            ..IndexParams::default()
        };
        assert!(matches!(
            rec.rebuild_index(&params),
            Err(RecommendError::Search(SearchError::InvalidParams(_)))
        ));
        assert!(Arc::ptr_eq(&held, &rec.index().unwrap()));
    }

    #[test]
    fn test_similar() {
        let rec = recommender(&["A", "B", "C", "D"]);
        let similar = rec.similar(&"B".into(), 2).unwrap().unwrap();
        assert_eq!(similar.seed.ordinal, 1);
        assert_eq!(similar.neighbors.len(), 2);
        assert!(similar.neighbors.iter().all(|(r, _)| r.name != "B"));
        assert!(similar.neighbors[0].1 <= similar.neighbors[1].1);

        assert!(rec.similar(&"nothing".into(), 2).unwrap().is_none());
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_value(Outcome::NoMatches).unwrap();
        assert_eq!(json["outcome"], "no_matches");
    }
}
