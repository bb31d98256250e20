//! Sentence similarity graph construction
//!
//! Nodes are sentence indices (stable, matching input order); undirected
//! edges carry the pairwise similarity of the two sentences.

use crate::summarizer::unit_vector::{SimilarityMetric, TermVector};
use crate::types::Sentence;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Chapters with at least this many sentences score pairs in parallel
const PARALLEL_MIN_SENTENCES: usize = 64;

/// A node in the graph builder
#[derive(Debug, Clone, Default)]
pub struct BuilderNode {
    /// Adjacency list: target node ID -> edge weight
    pub edges: FxHashMap<u32, f64>,
}

/// A mutable graph builder over a fixed number of sentence nodes
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<BuilderNode>,
}

impl GraphBuilder {
    /// Create a builder with `num_nodes` isolated nodes
    pub fn new(num_nodes: usize) -> Self {
        Self {
            nodes: vec![BuilderNode::default(); num_nodes],
        }
    }

    /// Set the weight of the undirected edge between two nodes
    ///
    /// Self-loops and non-positive weights are ignored.
    pub fn set_edge(&mut self, from: u32, to: u32, weight: f64) {
        if from == to || weight <= 0.0 {
            return;
        }

        if let Some(node) = self.nodes.get_mut(from as usize) {
            node.edges.insert(to, weight);
        }
        if let Some(node) = self.nodes.get_mut(to as usize) {
            node.edges.insert(from, weight);
        }
    }

    /// Build a graph from a pairwise similarity matrix
    ///
    /// With a threshold, edges whose similarity falls below it are dropped.
    pub fn from_matrix(matrix: &[Vec<f64>], threshold: Option<f64>) -> Self {
        let mut builder = Self::new(matrix.len());
        let min_weight = threshold.unwrap_or(0.0);

        for (i, row) in matrix.iter().enumerate() {
            for (j, &weight) in row.iter().enumerate().skip(i + 1) {
                if weight >= min_weight {
                    builder.set_edge(i as u32, j as u32, weight);
                }
            }
        }

        builder
    }

    /// Build a sentence graph directly from tokenized sentences
    pub fn from_sentences(
        sentences: &[Sentence],
        metric: SimilarityMetric,
        threshold: Option<f64>,
    ) -> Self {
        Self::from_matrix(&similarity_matrix(sentences, metric), threshold)
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges (counting each undirected edge once)
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum::<usize>() / 2
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &BuilderNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }
}

/// Symmetric N×N matrix of pairwise sentence similarities
///
/// The diagonal is zero. Large chapters are scored row by row in parallel;
/// the result does not depend on thread scheduling.
pub fn similarity_matrix(sentences: &[Sentence], metric: SimilarityMetric) -> Vec<Vec<f64>> {
    let n = sentences.len();
    let vectors: Vec<TermVector> = sentences
        .iter()
        .map(|s| TermVector::from_tokens(&s.tokens))
        .collect();

    let upper_row = |i: usize| -> Vec<f64> {
        (0..n)
            .map(|j| {
                if j > i {
                    metric.score(&vectors[i], &vectors[j])
                } else {
                    0.0
                }
            })
            .collect()
    };

    let mut matrix: Vec<Vec<f64>> = if n >= PARALLEL_MIN_SENTENCES {
        (0..n).into_par_iter().map(upper_row).collect()
    } else {
        (0..n).map(upper_row).collect()
    };

    for i in 0..n {
        for j in 0..i {
            matrix[i][j] = matrix[j][i];
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(index: usize, tokens: &[&str]) -> Sentence {
        Sentence::new(tokens.join(" "), 0, 0, index).with_tokens(tokens.iter().copied())
    }

    fn edges(builder: &GraphBuilder, id: usize) -> &FxHashMap<u32, f64> {
        &builder.nodes().nth(id).unwrap().1.edges
    }

    fn sample() -> Vec<Sentence> {
        vec![
            sentence(0, &["cat", "sat"]),
            sentence(1, &["dog", "ran"]),
            sentence(2, &["cat", "dog", "played"]),
            sentence(3, &["sunny", "day"]),
        ]
    }

    #[test]
    fn test_matrix_symmetric_zero_diagonal() {
        let matrix = similarity_matrix(&sample(), SimilarityMetric::Cosine);

        assert_eq!(matrix.len(), 4);
        for i in 0..4 {
            assert_eq!(matrix[i][i], 0.0);
            for j in 0..4 {
                assert_eq!(matrix[i][j], matrix[j][i]);
                assert!((0.0..=1.0).contains(&matrix[i][j]));
            }
        }
        assert!(matrix[0][2] > 0.0);
        assert_eq!(matrix[0][1], 0.0);
    }

    #[test]
    fn test_parallel_matrix_matches_sequential_entries() {
        let sentences: Vec<_> = (0..PARALLEL_MIN_SENTENCES + 6)
            .map(|i| {
                let word = format!("w{}", i % 7);
                sentence(i, &["shared", word.as_str()])
            })
            .collect();
        let matrix = similarity_matrix(&sentences, SimilarityMetric::Cosine);

        // Same residue class -> identical vectors
        assert!((matrix[0][7] - 1.0).abs() < 1e-9);
        assert!((matrix[0][1] - 0.5).abs() < 1e-9);
        assert_eq!(matrix[5][40], matrix[40][5]);
    }

    #[test]
    fn test_edges_follow_similarity() {
        let builder = GraphBuilder::from_sentences(&sample(), SimilarityMetric::Cosine, None);

        assert_eq!(builder.node_count(), 4);
        // 0-2 and 1-2 share a term; 3 is isolated
        assert_eq!(builder.edge_count(), 2);
        assert!(edges(&builder, 3).is_empty());
    }

    #[test]
    fn test_threshold_drops_weak_edges() {
        let matrix = vec![
            vec![0.0, 0.05, 0.5],
            vec![0.05, 0.0, 0.1],
            vec![0.5, 0.1, 0.0],
        ];
        let builder = GraphBuilder::from_matrix(&matrix, Some(0.1));

        assert_eq!(builder.edge_count(), 2);
        assert!(!edges(&builder, 0).contains_key(&1));
        assert_eq!(edges(&builder, 1).get(&2), Some(&0.1));
    }

    #[test]
    fn test_self_loops_prevented() {
        let mut builder = GraphBuilder::new(1);
        builder.set_edge(0, 0, 1.0);

        assert!(edges(&builder, 0).is_empty());
    }

    #[test]
    fn test_empty_graph() {
        let builder = GraphBuilder::from_sentences(&[], SimilarityMetric::Cosine, None);
        assert_eq!(builder.node_count(), 0);
        assert_eq!(builder.edge_count(), 0);
    }
}
