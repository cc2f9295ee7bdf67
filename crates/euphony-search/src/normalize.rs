//! Per-feature standardization.
//!
//! Parameters are fitted once over the whole catalog and then applied to
//! every vector, so the index and its queries share one space.

use euphony_core::model::{FeatureVector, FEATURE_COUNT};
use serde::Serialize;

use crate::error::{SearchError, SearchResult};

/// Per-dimension mean and population standard deviation.
///
/// A dimension whose values are all identical has a standard deviation of
/// zero and transforms to exactly `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormParams {
    mean: [f64; FEATURE_COUNT],
    std_dev: [f64; FEATURE_COUNT],
}

impl NormParams {
    /// Fit parameters over a set of raw vectors.
    ///
    /// # Errors
    /// Returns [`SearchError::EmptyInput`] when `vectors` is empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(vectors: &[FeatureVector]) -> SearchResult<Self> {
        if vectors.is_empty() {
            return Err(SearchError::EmptyInput {
                operation: "fit normalization",
            });
        }
        let n = vectors.len() as f64;

        let mut mean = [0.0; FEATURE_COUNT];
        let mut min = [f64::INFINITY; FEATURE_COUNT];
        let mut max = [f64::NEG_INFINITY; FEATURE_COUNT];
        for v in vectors {
            for d in 0..FEATURE_COUNT {
                mean[d] += v[d];
                min[d] = min[d].min(v[d]);
                max[d] = max[d].max(v[d]);
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut std_dev = [0.0; FEATURE_COUNT];
        for v in vectors {
            for d in 0..FEATURE_COUNT {
                let delta = v[d] - mean[d];
                std_dev[d] += delta * delta;
            }
        }
        for d in 0..FEATURE_COUNT {
            // Constant columns are pinned to zero rather than trusting a
            // rounding-noise variance.
            std_dev[d] = if max[d] > min[d] {
                (std_dev[d] / n).sqrt()
            } else {
                0.0
            };
        }

        Ok(Self { mean, std_dev })
    }

    /// Standardize one vector.
    #[must_use]
    pub fn transform(&self, vector: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (d, value) in out.iter_mut().enumerate() {
            if self.std_dev[d] > 0.0 {
                *value = (vector[d] - self.mean[d]) / self.std_dev[d];
            }
        }
        FeatureVector::new(out)
    }

    /// Standardize a batch of vectors, preserving order.
    #[must_use]
    pub fn transform_all(&self, vectors: &[FeatureVector]) -> Vec<FeatureVector> {
        vectors.iter().map(|v| self.transform(v)).collect()
    }

    #[must_use]
    pub const fn mean(&self) -> &[f64; FEATURE_COUNT] {
        &self.mean
    }

    #[must_use]
    pub const fn std_dev(&self) -> &[f64; FEATURE_COUNT] {
        &self.std_dev
    }
}
