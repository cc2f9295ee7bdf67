use serde::{Deserialize, Serialize};

use crate::model::artist::ArtistCredit;
use crate::model::features::FeatureVector;

/// A catalog track.
///
/// Tracks are created when the catalog loads and never change afterwards.
/// A track always has a non-blank name and a complete feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artists: ArtistCredit,
    pub duration_ms: u64,
    pub features: FeatureVector,
}

impl Track {
    #[must_use]
    pub fn new(name: impl Into<String>, artists: ArtistCredit, features: FeatureVector) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let duration_ms = features
            .get("duration_ms")
            .map(|ms| ms.max(0.0).round() as u64)
            .unwrap_or_default();
        Self {
            name: name.into(),
            artists,
            duration_ms,
            features,
        }
    }

    /// Project this track to the record handed to callers and compared
    /// during merging.
    #[must_use]
    pub fn to_record(&self) -> RecommendationRecord {
        RecommendationRecord {
            name: self.name.clone(),
            artists: self.artists.clone(),
            duration_ms: self.duration_ms,
        }
    }
}

/// A recommended song: the `{name, artists, duration_ms}` projection of a
/// track.
///
/// Two records are the same recommendation iff all three fields are equal.
/// Artists compare by their raw catalog text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub name: String,
    pub artists: ArtistCredit,
    pub duration_ms: u64,
}
