//! LexRank variant
//!
//! Sentences are linked when their cosine similarity reaches the threshold;
//! the score of a sentence is its eigenvector centrality in that graph.

use super::SentenceRanker;
use crate::graph::builder::GraphBuilder;
use crate::graph::csr::CsrGraph;
use crate::pagerank::centrality::EigenvectorCentrality;
use crate::summarizer::unit_vector::SimilarityMetric;
use crate::types::{Sentence, SummarizerConfig};
use tracing::debug;

/// LexRank implementation
#[derive(Debug, Clone)]
pub struct LexRank {
    /// Minimum similarity for an edge to be kept
    pub threshold: f64,
    /// Maximum power iterations
    pub max_iterations: usize,
    /// Convergence threshold (L1)
    pub convergence_threshold: f64,
}

impl Default for LexRank {
    fn default() -> Self {
        Self::with_config(&SummarizerConfig::default())
    }
}

impl LexRank {
    /// Create a new LexRank ranker with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: &SummarizerConfig) -> Self {
        Self {
            threshold: config.lexrank.threshold,
            max_iterations: config.max_iterations,
            convergence_threshold: config.convergence_threshold,
        }
    }

    /// Set the similarity threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Build the thresholded sentence graph
    pub fn build_graph(&self, sentences: &[Sentence]) -> CsrGraph {
        let builder =
            GraphBuilder::from_sentences(sentences, SimilarityMetric::Cosine, Some(self.threshold));
        CsrGraph::from_builder(&builder)
    }
}

impl SentenceRanker for LexRank {
    fn rank(&self, sentences: &[Sentence]) -> Vec<f64> {
        let graph = self.build_graph(sentences);
        let result = EigenvectorCentrality::new()
            .with_max_iterations(self.max_iterations)
            .with_threshold(self.convergence_threshold)
            .run(&graph);

        debug!(
            sentences = sentences.len(),
            edges = graph.num_edges() / 2,
            iterations = result.iterations,
            converged = result.converged,
            "lexrank centrality"
        );

        result.scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(index: usize, tokens: &[&str]) -> Sentence {
        Sentence::new(tokens.join(" "), 0, 0, index).with_tokens(tokens.iter().copied())
    }

    fn chapter() -> Vec<Sentence> {
        vec![
            sentence(0, &["cat", "sat"]),
            sentence(1, &["dog", "ran"]),
            sentence(2, &["cat", "dog", "played"]),
            sentence(3, &["sunny", "day"]),
            sentence(4, &["everyone", "happy"]),
        ]
    }

    #[test]
    fn test_bridge_sentence_ranks_highest() {
        let scores = LexRank::new().rank(&chapter());

        assert_eq!(scores.len(), 5);
        let best = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(best, 2);
        // Symmetric neighbours tie exactly
        assert_eq!(scores[0], scores[1]);
        assert!(scores[0] > scores[3]);
    }

    #[test]
    fn test_threshold_removes_edges() {
        let sentences = chapter();
        // cos(0, 2) = 1/sqrt(6) ~ 0.41
        assert_eq!(LexRank::new().with_threshold(0.1).build_graph(&sentences).num_edges(), 4);
        assert_eq!(LexRank::new().with_threshold(0.5).build_graph(&sentences).num_edges(), 0);
    }

    #[test]
    fn test_disconnected_chapter_is_uniform() {
        let scores = LexRank::new().with_threshold(0.5).rank(&chapter());
        for score in scores {
            assert!((score - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_sentence() {
        let scores = LexRank::new().rank(&[sentence(0, &["alone"])]);
        assert_eq!(scores, vec![1.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(LexRank::new().rank(&[]).is_empty());
    }
}
