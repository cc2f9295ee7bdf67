//! Random-projection forest for approximate nearest-neighbor search.
//!
//! Each tree recursively splits the catalog with hyperplanes placed
//! between two centroids found by a short two-means pass over a random
//! sample. A query walks every tree best-first by hyperplane margin,
//! collects `search_k` distinct candidates from the leaves it reaches, and
//! ranks them by exact distance.
//!
//! The forest is immutable once built. All randomness comes from a
//! `StdRng` seeded from [`IndexParams::seed`], so the same vectors in the
//! same order with the same parameters always produce the same forest and
//! the same answers.
//!
//! # Example
//!
//! ```
//! use euphony_core::model::{FeatureVector, FEATURE_COUNT};
//! use euphony_search::{AnnIndex, IndexParams};
//!
//! let vectors: Vec<FeatureVector> = (0..50)
//!     .map(|i| FeatureVector::new([f64::from(i); FEATURE_COUNT]))
//!     .collect();
//! let index = AnnIndex::build(vectors, &IndexParams::default()).unwrap();
//!
//! let neighbors = index.query(10, 2).unwrap();
//! assert_eq!(neighbors.len(), 2);
//! assert!(neighbors.iter().all(|n| n.ordinal != 10));
//! ```

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use chrono::{DateTime, Utc};
use euphony_core::model::{FeatureVector, FEATURE_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::distance::{dot, Metric};
use crate::error::{SearchError, SearchResult};

/// Random samples drawn when refining the two split centroids.
const TWO_MEANS_STEPS: usize = 200;

/// Attempts at a balanced hyperplane before falling back to an
/// alternating split.
const SPLIT_ATTEMPTS: usize = 3;

/// Build and search parameters for [`AnnIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexParams {
    pub metric: Metric,

    /// Number of trees in the forest. More trees raise recall and cost.
    pub tree_count: usize,

    /// Largest number of items kept in a single leaf.
    pub leaf_size: usize,

    /// Seed for every random choice made while building.
    pub seed: u64,

    /// Distinct candidates inspected per query. `None` means
    /// `(k + 1) * tree_count`.
    pub search_k: Option<usize>,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            metric: Metric::Euclidean,
            tree_count: 10,
            leaf_size: 16,
            seed: 42,
            search_k: None,
        }
    }
}

impl IndexParams {
    fn validate(&self) -> SearchResult<()> {
        if self.tree_count == 0 {
            return Err(SearchError::InvalidParams(
                "tree_count must be at least 1".to_string(),
            ));
        }
        if self.leaf_size == 0 {
            return Err(SearchError::InvalidParams(
                "leaf_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// One search result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub ordinal: usize,
    pub distance: f64,
}

#[derive(Debug)]
enum Node {
    Leaf(Vec<usize>),
    Split {
        normal: FeatureVector,
        offset: f64,
        left: usize,
        right: usize,
    },
}

/// A node waiting to be visited, ordered by margin (largest first).
#[derive(Debug)]
struct Pending {
    priority: f64,
    node: usize,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// An immutable approximate nearest-neighbor index over catalog vectors.
///
/// Item identity is the position of a vector in the slice passed to
/// [`AnnIndex::build`], which callers align with catalog ordinals.
#[derive(Debug)]
pub struct AnnIndex {
    vectors: Vec<FeatureVector>,
    nodes: Vec<Node>,
    roots: Vec<usize>,
    params: IndexParams,
    built_at: DateTime<Utc>,
}

impl AnnIndex {
    /// Build a forest over `vectors`.
    ///
    /// # Errors
    /// Returns an error when `vectors` is empty or the parameters are
    /// invalid.
    pub fn build(vectors: Vec<FeatureVector>, params: &IndexParams) -> SearchResult<Self> {
        params.validate()?;
        if vectors.is_empty() {
            return Err(SearchError::EmptyInput {
                operation: "build an index",
            });
        }

        let mut builder = ForestBuilder {
            vectors: &vectors,
            nodes: Vec::new(),
            leaf_size: params.leaf_size,
            rng: StdRng::seed_from_u64(params.seed),
        };
        let all: Vec<usize> = (0..vectors.len()).collect();
        let roots = (0..params.tree_count)
            .map(|_| builder.build_tree(all.clone()))
            .collect();
        let nodes = builder.nodes;

        log::info!(
            "Built index over {} vectors: {} trees, {} nodes",
            vectors.len(),
            params.tree_count,
            nodes.len()
        );

        Ok(Self {
            vectors,
            nodes,
            roots,
            params: params.clone(),
            built_at: Utc::now(),
        })
    }

    /// The `k` nearest items to item `ordinal`, nearest first, never
    /// including `ordinal` itself.
    ///
    /// # Errors
    /// Returns [`SearchError::UnknownOrdinal`] when `ordinal` is not in the
    /// index.
    pub fn query(&self, ordinal: usize, k: usize) -> SearchResult<Vec<Neighbor>> {
        let target = self
            .vectors
            .get(ordinal)
            .ok_or(SearchError::UnknownOrdinal {
                ordinal,
                len: self.vectors.len(),
            })?;
        let k = k.min(self.vectors.len());
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut neighbors = self.query_vector(target, k + 1);
        neighbors.retain(|n| n.ordinal != ordinal);
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// The `k` nearest items to an arbitrary vector in index space.
    #[must_use]
    pub fn query_vector(&self, target: &FeatureVector, k: usize) -> Vec<Neighbor> {
        // No more than every item can come back.
        let k = k.min(self.vectors.len());
        if k == 0 {
            return Vec::new();
        }
        let search_k = self
            .params
            .search_k
            .unwrap_or(k.saturating_mul(self.params.tree_count))
            .max(k);

        let candidates = self.collect_candidates(target, search_k);
        let mut neighbors: Vec<Neighbor> = candidates
            .into_iter()
            .map(|ordinal| Neighbor {
                ordinal,
                distance: self
                    .params
                    .metric
                    .distance(target.as_slice(), self.vectors[ordinal].as_slice()),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.ordinal.cmp(&b.ordinal))
        });
        neighbors.truncate(k);
        neighbors
    }

    fn collect_candidates(&self, target: &FeatureVector, search_k: usize) -> Vec<usize> {
        let mut queue: BinaryHeap<Pending> = self
            .roots
            .iter()
            .map(|&node| Pending {
                priority: f64::INFINITY,
                node,
            })
            .collect();
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        while candidates.len() < search_k {
            let Some(Pending { priority, node }) = queue.pop() else {
                break;
            };
            match &self.nodes[node] {
                Node::Leaf(items) => {
                    for &item in items {
                        if seen.insert(item) {
                            candidates.push(item);
                        }
                    }
                }
                Node::Split {
                    normal,
                    offset,
                    left,
                    right,
                } => {
                    let margin = dot(normal.as_slice(), target.as_slice()) + offset;
                    queue.push(Pending {
                        priority: priority.min(margin),
                        node: *right,
                    });
                    queue.push(Pending {
                        priority: priority.min(-margin),
                        node: *left,
                    });
                }
            }
        }

        candidates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[must_use]
    pub const fn params(&self) -> &IndexParams {
        &self.params
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub const fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

/// Mutable state used only while a forest is being built.
struct ForestBuilder<'a> {
    vectors: &'a [FeatureVector],
    nodes: Vec<Node>,
    leaf_size: usize,
    rng: StdRng,
}

impl ForestBuilder<'_> {
    /// Build one tree and return its root. Uses an explicit stack so a run
    /// of lopsided splits cannot exhaust the call stack.
    fn build_tree(&mut self, items: Vec<usize>) -> usize {
        let root = self.placeholder();
        let mut pending = vec![(root, items)];

        while let Some((slot, items)) = pending.pop() {
            if items.len() <= self.leaf_size {
                self.nodes[slot] = Node::Leaf(items);
                continue;
            }

            let (normal, offset, left_items, right_items) = self.split(&items);
            let left = self.placeholder();
            let right = self.placeholder();
            self.nodes[slot] = Node::Split {
                normal,
                offset,
                left,
                right,
            };
            pending.push((right, right_items));
            pending.push((left, left_items));
        }

        root
    }

    fn placeholder(&mut self) -> usize {
        self.nodes.push(Node::Leaf(Vec::new()));
        self.nodes.len() - 1
    }

    fn split(&mut self, items: &[usize]) -> (FeatureVector, f64, Vec<usize>, Vec<usize>) {
        for _ in 0..SPLIT_ATTEMPTS {
            let (normal, offset) = self.hyperplane(items);
            let (left, right): (Vec<usize>, Vec<usize>) = items
                .iter()
                .partition(|&&i| dot(normal.as_slice(), self.vectors[i].as_slice()) + offset <= 0.0);
            if !left.is_empty() && !right.is_empty() {
                return (normal, offset, left, right);
            }
        }

        // Duplicate or collinear points: a zero hyperplane sends queries
        // down both sides with equal priority.
        let (left, right): (Vec<(usize, usize)>, Vec<(usize, usize)>) = items
            .iter()
            .copied()
            .enumerate()
            .partition(|(pos, _)| pos % 2 == 0);
        (
            FeatureVector::zeros(),
            0.0,
            left.into_iter().map(|(_, i)| i).collect(),
            right.into_iter().map(|(_, i)| i).collect(),
        )
    }

    /// A hyperplane equidistant between two centroids refined by a short
    /// two-means pass seeded from two distinct random items.
    #[allow(clippy::cast_precision_loss)]
    fn hyperplane(&mut self, items: &[usize]) -> (FeatureVector, f64) {
        let first = self.rng.gen_range(0..items.len());
        let mut second = self.rng.gen_range(0..items.len() - 1);
        if second >= first {
            second += 1;
        }

        let mut p = self.vectors[items[first]].0;
        let mut q = self.vectors[items[second]].0;
        let (mut p_count, mut q_count) = (1.0_f64, 1.0_f64);

        for _ in 0..TWO_MEANS_STEPS {
            let v = &self.vectors[items[self.rng.gen_range(0..items.len())]].0;
            let to_p = squared_distance(&p, v);
            let to_q = squared_distance(&q, v);
            if to_p < to_q {
                for d in 0..FEATURE_COUNT {
                    p[d] = (p[d] * p_count + v[d]) / (p_count + 1.0);
                }
                p_count += 1.0;
            } else if to_q < to_p {
                for d in 0..FEATURE_COUNT {
                    q[d] = (q[d] * q_count + v[d]) / (q_count + 1.0);
                }
                q_count += 1.0;
            }
        }

        let mut normal = [0.0; FEATURE_COUNT];
        let mut midpoint = [0.0; FEATURE_COUNT];
        for d in 0..FEATURE_COUNT {
            normal[d] = p[d] - q[d];
            midpoint[d] = (p[d] + q[d]) / 2.0;
        }
        let offset = -dot(&normal, &midpoint);
        (FeatureVector::new(normal), offset)
    }
}

fn squared_distance(a: &[f64; FEATURE_COUNT], b: &[f64; FEATURE_COUNT]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
