use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Number of audio features describing a track.
pub const FEATURE_COUNT: usize = 11;

/// Catalog column names of the audio features, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "danceability",
    "energy",
    "loudness",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
    "duration_ms",
    "year",
];

/// A fixed-order audio feature vector.
///
/// The same type carries both raw catalog values and their normalized
/// counterparts; which one a given vector holds is up to the owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn zeros() -> Self {
        Self([0.0; FEATURE_COUNT])
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Look up a feature by its catalog column name.
    #[must_use]
    pub fn get(&self, feature: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|name| *name == feature)
            .map(|i| self.0[i])
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_name() {
        let mut values = [0.0; FEATURE_COUNT];
        values[1] = 0.8;
        values[10] = 1999.0;
        let v = FeatureVector::new(values);

        assert_eq!(v.get("energy"), Some(0.8));
        assert_eq!(v.get("year"), Some(1999.0));
        assert_eq!(v.get("key"), None);
    }

    #[test]
    fn test_feature_names_are_unique() {
        for (i, a) in FEATURE_NAMES.iter().enumerate() {
            for b in &FEATURE_NAMES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
