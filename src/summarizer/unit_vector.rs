//! Term vectors and sentence similarity
//!
//! Builds sparse term-frequency vectors from normalized sentence tokens and
//! scores pairs of sentences for the similarity graph.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// How two sentences are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    /// Cosine similarity of term-frequency vectors
    #[default]
    Cosine,
    /// Shared distinct terms divided by the smaller vocabulary
    Overlap,
}

impl SimilarityMetric {
    /// Score two term vectors; always in [0, 1] and symmetric
    pub fn score(&self, a: &TermVector, b: &TermVector) -> f64 {
        let score = match self {
            SimilarityMetric::Cosine => a.cosine_similarity(b),
            SimilarityMetric::Overlap => a.overlap(b),
        };
        score.clamp(0.0, 1.0)
    }
}

/// A sparse term-frequency vector for one sentence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    /// Non-zero dimensions: term -> frequency
    pub dimensions: FxHashMap<String, f64>,
    /// L2 norm of the vector
    pub norm: f64,
}

impl TermVector {
    /// Create a new empty vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Count term frequencies of a token sequence
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut dimensions: FxHashMap<String, f64> = FxHashMap::default();
        for token in tokens {
            *dimensions.entry(token.as_ref().to_string()).or_insert(0.0) += 1.0;
        }
        let norm = Self::compute_norm(&dimensions);
        Self { dimensions, norm }
    }

    fn compute_norm(dimensions: &FxHashMap<String, f64>) -> f64 {
        dimensions.values().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Frequency of a term (0 when absent)
    pub fn frequency(&self, term: &str) -> f64 {
        self.dimensions.get(term).copied().unwrap_or(0.0)
    }

    /// Compute cosine similarity with another vector
    ///
    /// Zero when either vector has no terms.
    pub fn cosine_similarity(&self, other: &TermVector) -> f64 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        // Iterate the smaller map; the sum is the same either way
        let (small, large) = if self.dimensions.len() <= other.dimensions.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut terms: Vec<_> = small.dimensions.iter().collect();
        terms.sort_by(|a, b| a.0.cmp(b.0));
        let dot: f64 = terms
            .into_iter()
            .map(|(term, value)| value * large.frequency(term))
            .sum();
        dot / (self.norm * other.norm)
    }

    /// Overlap coefficient over distinct terms
    pub fn overlap(&self, other: &TermVector) -> f64 {
        let smaller = self.dimensions.len().min(other.dimensions.len());
        if smaller == 0 {
            return 0.0;
        }
        let mine: FxHashSet<&String> = self.dimensions.keys().collect();
        let shared = other
            .dimensions
            .keys()
            .filter(|term| mine.contains(term))
            .count();
        shared as f64 / smaller as f64
    }

    /// Check if the vector is empty
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(tokens: &[&str]) -> TermVector {
        TermVector::from_tokens(tokens)
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let v1 = vector(&["a", "b", "b"]);
        let v2 = vector(&["a", "b", "b"]);

        let sim = v1.cosine_similarity(&v2);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let sim = vector(&["a"]).cosine_similarity(&vector(&["b"]));
        assert!(sim.abs() < 1e-12);
    }

    #[test]
    fn test_cosine_partial_overlap() {
        // [cat, sat] vs [cat, dog, played]: 1 / (sqrt(2) * sqrt(3))
        let sim = vector(&["cat", "sat"]).cosine_similarity(&vector(&["cat", "dog", "played"]));
        assert!((sim - 1.0 / 6f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_empty_vector_never_divides_by_zero() {
        let empty = TermVector::new();
        assert!(empty.is_empty());
        assert_eq!(empty.cosine_similarity(&vector(&["a"])), 0.0);
        assert_eq!(empty.cosine_similarity(&empty), 0.0);
        assert_eq!(empty.overlap(&vector(&["a"])), 0.0);
    }

    #[test]
    fn test_term_frequencies() {
        let v = vector(&["x", "y", "x"]);
        assert_eq!(v.frequency("x"), 2.0);
        assert_eq!(v.frequency("z"), 0.0);
        assert!((v.norm - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_coefficient() {
        let a = vector(&["a", "b"]);
        let b = vector(&["a", "c", "d", "e"]);
        assert!((a.overlap(&b) - 0.5).abs() < 1e-12);
        assert!((b.overlap(&a) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_metrics_symmetric_and_bounded() {
        let a = vector(&["alpha", "beta", "beta", "gamma"]);
        let b = vector(&["beta", "gamma", "gamma", "delta"]);
        for metric in [SimilarityMetric::Cosine, SimilarityMetric::Overlap] {
            let ab = metric.score(&a, &b);
            let ba = metric.score(&b, &a);
            assert_eq!(ab, ba);
            assert!((0.0..=1.0).contains(&ab));
        }
    }
}
