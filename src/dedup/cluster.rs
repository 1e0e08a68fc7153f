use serde::{Deserialize, Serialize};
use tracing::debug;

use super::similarity::cosine_similarity;
use crate::error::{FlowAiError, Result};
use crate::utils::validation::ConfigValidator;

pub const DEFAULT_THRESHOLD: f64 = 0.9;

/// Tolerance applied to `similarity >= threshold`, so a threshold of `1.0`
/// still matches vectors that differ only by rounding.
pub const SIMILARITY_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupStrategy {
    /// Greedy pass: each member is compared with its group's canonical vector only.
    #[default]
    Canonical,
    /// Connected components of the thresholded similarity graph.
    Connected,
}

impl std::str::FromStr for DedupStrategy {
    type Err = FlowAiError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "canonical" => Ok(DedupStrategy::Canonical),
            "connected" => Ok(DedupStrategy::Connected),
            other => Err(FlowAiError::Config(format!(
                "unknown dedup strategy `{}` (expected `canonical` or `connected`)",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub canonical: String,
    pub group: Vec<String>,
}

#[derive(Clone, Copy, Debug)]
pub struct Deduplicator {
    threshold: f64,
    strategy: DedupStrategy,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            strategy: DedupStrategy::Canonical,
        }
    }
}

impl Deduplicator {
    pub fn new(threshold: f64) -> Result<Self> {
        ConfigValidator::validate_threshold(threshold)?;
        Ok(Self {
            threshold,
            strategy: DedupStrategy::Canonical,
        })
    }

    pub fn with_strategy(mut self, strategy: DedupStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn strategy(&self) -> DedupStrategy {
        self.strategy
    }

    /// Groups records by the similarity of their index-aligned vectors.
    pub fn deduplicate<S, V>(&self, records: &[S], vectors: &[V]) -> Result<Vec<DuplicateGroup>>
    where
        S: AsRef<str>,
        V: AsRef<[f32]>,
    {
        if records.len() != vectors.len() {
            return Err(FlowAiError::InvalidInput(format!(
                "record count {} does not match vector count {}",
                records.len(),
                vectors.len()
            )));
        }

        let groups = self
            .group_indices(vectors)?
            .into_iter()
            .map(|members| DuplicateGroup {
                canonical: records[members[0]].as_ref().to_string(),
                group: members
                    .iter()
                    .map(|&idx| records[idx].as_ref().to_string())
                    .collect(),
            })
            .collect();
        Ok(groups)
    }

    /// Index form of [`Deduplicator::deduplicate`]. Every group is non-empty,
    /// starts with its canonical index and lists members in ascending order.
    pub fn group_indices<V>(&self, vectors: &[V]) -> Result<Vec<Vec<usize>>>
    where
        V: AsRef<[f32]>,
    {
        validate_vectors(vectors)?;

        let groups = match self.strategy {
            DedupStrategy::Canonical => self.canonical_groups(vectors)?,
            DedupStrategy::Connected => self.connected_groups(vectors)?,
        };

        debug!(
            records = vectors.len(),
            groups = groups.len(),
            threshold = self.threshold,
            strategy = ?self.strategy,
            "deduplication finished"
        );
        Ok(groups)
    }

    fn is_similar(&self, a: &[f32], b: &[f32]) -> Result<bool> {
        Ok(cosine_similarity(a, b)? >= self.threshold - SIMILARITY_EPSILON)
    }

    fn canonical_groups<V: AsRef<[f32]>>(&self, vectors: &[V]) -> Result<Vec<Vec<usize>>> {
        let mut assigned = vec![false; vectors.len()];
        let mut groups = Vec::new();

        for i in 0..vectors.len() {
            if assigned[i] {
                continue;
            }
            assigned[i] = true;
            let mut members = vec![i];
            for j in (i + 1)..vectors.len() {
                if assigned[j] {
                    continue;
                }
                if self.is_similar(vectors[i].as_ref(), vectors[j].as_ref())? {
                    assigned[j] = true;
                    members.push(j);
                }
            }
            groups.push(members);
        }
        Ok(groups)
    }

    fn connected_groups<V: AsRef<[f32]>>(&self, vectors: &[V]) -> Result<Vec<Vec<usize>>> {
        let mut components = DisjointSet::new(vectors.len());
        for i in 0..vectors.len() {
            for j in (i + 1)..vectors.len() {
                if self.is_similar(vectors[i].as_ref(), vectors[j].as_ref())? {
                    components.union(i, j);
                }
            }
        }

        // Roots are the smallest index of their component, so a root is always
        // visited before any other member.
        let mut slot = vec![usize::MAX; vectors.len()];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in 0..vectors.len() {
            let root = components.find(i);
            if root == i {
                slot[i] = groups.len();
                groups.push(vec![i]);
            } else {
                groups[slot[root]].push(i);
            }
        }
        Ok(groups)
    }
}

/// Groups `records` with the canonical-anchored strategy.
pub fn deduplicate<S, V>(records: &[S], vectors: &[V], threshold: f64) -> Result<Vec<DuplicateGroup>>
where
    S: AsRef<str>,
    V: AsRef<[f32]>,
{
    Deduplicator::new(threshold)?.deduplicate(records, vectors)
}

fn validate_vectors<V: AsRef<[f32]>>(vectors: &[V]) -> Result<()> {
    let Some(first) = vectors.first() else {
        return Ok(());
    };
    let dimension = first.as_ref().len();

    for (idx, vector) in vectors.iter().enumerate() {
        let vector = vector.as_ref();
        if vector.len() != dimension {
            return Err(FlowAiError::InvalidInput(format!(
                "vector {} has dimension {}, expected {}",
                idx,
                vector.len(),
                dimension
            )));
        }
        if vector.iter().any(|value| !value.is_finite()) {
            return Err(FlowAiError::InvalidInput(format!(
                "vector {} contains a non-finite component",
                idx
            )));
        }
    }
    Ok(())
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(result: &[DuplicateGroup]) -> Vec<(&str, Vec<&str>)> {
        result
            .iter()
            .map(|g| {
                (
                    g.canonical.as_str(),
                    g.group.iter().map(String::as_str).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn groups_identical_directions() {
        let vectors = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        let result = deduplicate(&["a", "b", "c"], &vectors, 0.9).unwrap();
        assert_eq!(
            groups(&result),
            vec![("a", vec!["a", "b"]), ("c", vec!["c"])]
        );
    }

    #[test]
    fn canonical_strategy_does_not_chain() {
        // b is close to both a and c, a and c are far apart.
        let vectors = vec![vec![1.0, 0.0], vec![0.8, 0.6], vec![0.28, 0.96]];
        let result = deduplicate(&["a", "b", "c"], &vectors, 0.75).unwrap();
        assert_eq!(
            groups(&result),
            vec![("a", vec!["a", "b"]), ("c", vec!["c"])]
        );
    }

    #[test]
    fn connected_strategy_chains_through_members() {
        let vectors = vec![vec![1.0, 0.0], vec![0.8, 0.6], vec![0.28, 0.96]];
        let result = Deduplicator::new(0.75)
            .unwrap()
            .with_strategy(DedupStrategy::Connected)
            .deduplicate(&["a", "b", "c"], &vectors)
            .unwrap();
        assert_eq!(groups(&result), vec![("a", vec!["a", "b", "c"])]);
    }

    #[test]
    fn connected_groups_keep_index_order() {
        let vectors = vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 2.0],
            vec![3.0, 0.0],
        ];
        let indices = Deduplicator::new(0.9)
            .unwrap()
            .with_strategy(DedupStrategy::Connected)
            .group_indices(&vectors)
            .unwrap();
        assert_eq!(indices, vec![vec![0, 3], vec![1, 2]]);
    }

    #[test]
    fn threshold_one_uses_epsilon() {
        let vectors = vec![vec![0.1, 0.2, 0.3], vec![0.1, 0.2, 0.3], vec![0.1, 0.2, 0.31]];
        let indices = Deduplicator::new(1.0).unwrap().group_indices(&vectors).unwrap();
        assert_eq!(indices, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn negative_threshold_groups_everything() {
        let vectors = vec![vec![1.0, 0.0], vec![-1.0, 0.0], vec![0.0, 0.0]];
        let result = deduplicate(&["a", "b", "c"], &vectors, -1.0).unwrap();
        assert_eq!(groups(&result), vec![("a", vec!["a", "b", "c"])]);
    }

    #[test]
    fn nan_threshold_is_rejected() {
        let err = Deduplicator::new(f64::NAN).unwrap_err();
        assert!(matches!(err, FlowAiError::InvalidThreshold(_)));
    }

    #[test]
    fn mismatched_dimensions_fail_fast() {
        let vectors = vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
        let err = deduplicate(&["a", "b"], &vectors, 0.9).unwrap_err();
        assert!(matches!(err, FlowAiError::InvalidInput(_)));
    }

    #[test]
    fn non_finite_components_are_rejected() {
        let vectors = vec![vec![1.0, f32::NAN]];
        let err = deduplicate(&["a"], &vectors, 0.9).unwrap_err();
        assert!(matches!(err, FlowAiError::InvalidInput(_)));
    }

    #[test]
    fn strategy_parses_from_str() {
        assert_eq!(
            "Connected".parse::<DedupStrategy>().unwrap(),
            DedupStrategy::Connected
        );
        assert!("clique".parse::<DedupStrategy>().is_err());
    }
}
