//! TextRank variant
//!
//! Sentences form a fully weighted graph (no threshold) and are scored with
//! damped PageRank.

use super::SentenceRanker;
use crate::graph::builder::GraphBuilder;
use crate::graph::csr::CsrGraph;
use crate::pagerank::standard::StandardPageRank;
use crate::summarizer::unit_vector::SimilarityMetric;
use crate::types::{Sentence, SummarizerConfig};
use tracing::debug;

/// TextRank implementation
#[derive(Debug, Clone)]
pub struct TextRank {
    pub damping: f64,
    pub similarity: SimilarityMetric,
    pub max_iterations: usize,
    pub convergence_threshold: f64,
}

impl Default for TextRank {
    fn default() -> Self {
        Self::with_config(&SummarizerConfig::default())
    }
}

impl TextRank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &SummarizerConfig) -> Self {
        Self {
            damping: config.textrank.damping,
            similarity: config.textrank.similarity,
            max_iterations: config.max_iterations,
            convergence_threshold: config.convergence_threshold,
        }
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_similarity(mut self, similarity: SimilarityMetric) -> Self {
        self.similarity = similarity;
        self
    }
}

impl SentenceRanker for TextRank {
    fn rank(&self, sentences: &[Sentence]) -> Vec<f64> {
        let builder = GraphBuilder::from_sentences(sentences, self.similarity, None);
        let graph = CsrGraph::from_builder(&builder);

        let result = StandardPageRank::new()
            .with_damping(self.damping)
            .with_max_iterations(self.max_iterations)
            .with_threshold(self.convergence_threshold)
            .run(&graph);

        debug!(
            sentences = sentences.len(),
            edges = builder.edge_count(),
            iterations = result.iterations,
            converged = result.converged,
            "textrank pagerank"
        );

        result.scores
    }
}
