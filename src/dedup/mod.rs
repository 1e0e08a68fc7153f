//! Semantic near-duplicate grouping over embedding vectors.
//!
//! Records and vectors are index-aligned. The output is a partition of the
//! records: every record lands in exactly one [`DuplicateGroup`], groups are
//! ordered by their canonical record's index, and members keep input order.

pub mod cluster;
pub mod similarity;

pub use cluster::{
    deduplicate, DedupStrategy, Deduplicator, DuplicateGroup, DEFAULT_THRESHOLD,
    SIMILARITY_EPSILON,
};
pub use similarity::cosine_similarity;
