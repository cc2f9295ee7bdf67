//! Distance metrics for nearest-neighbor search.

use serde::{Deserialize, Serialize};

/// Distance metric used by the index. Lower is closer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Straight-line (L2) distance.
    #[default]
    Euclidean,
    /// Sum of absolute differences (L1).
    Manhattan,
}

impl Metric {
    #[must_use]
    pub fn distance(self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Self::Euclidean => euclidean(a, b),
            Self::Manhattan => manhattan(a, b),
        }
    }
}

#[inline]
fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[inline]
fn manhattan(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

#[inline]
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean() {
        assert_eq!(Metric::Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(Metric::Euclidean.distance(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Metric::Manhattan.distance(&[0.0, 0.0], &[3.0, -4.0]), 7.0);
    }

    #[test]
    fn test_default_is_euclidean() {
        assert_eq!(Metric::default(), Metric::Euclidean);
    }
}
