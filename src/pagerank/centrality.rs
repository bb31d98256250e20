//! Eigenvector centrality for LexRank
//!
//! Each row of the (thresholded) similarity graph is normalized into a
//! transition distribution; isolated sentences jump uniformly to every
//! sentence. The principal eigenvector of that stochastic matrix is found by
//! power iteration on the lazy chain `(I + P) / 2`, which shares its
//! stationary distribution with `P` and cannot oscillate on bipartite graphs.

use super::{l1_delta, normalize_scores, PageRankResult};
use crate::graph::csr::CsrGraph;

/// LexRank centrality computation
#[derive(Debug, Clone)]
pub struct EigenvectorCentrality {
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Convergence threshold (L1 change between iterations)
    pub threshold: f64,
}

impl Default for EigenvectorCentrality {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            threshold: 1e-6,
        }
    }
}

impl EigenvectorCentrality {
    /// Create with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Compute the stationary distribution of the row-normalized graph
    pub fn run(&self, graph: &CsrGraph) -> PageRankResult {
        let n = graph.num_nodes;
        if n == 0 {
            return PageRankResult::new(vec![], 0, 0.0, true);
        }

        let mut scores = vec![1.0 / n as f64; n];
        let mut new_scores = vec![0.0; n];
        let dangling_nodes = graph.dangling_nodes();

        let mut iterations = 0;
        let mut delta = f64::MAX;

        while iterations < self.max_iterations && delta > self.threshold {
            iterations += 1;

            let dangling_mass: f64 = dangling_nodes.iter().map(|&d| scores[d as usize]).sum();
            new_scores.fill(dangling_mass / n as f64);

            for (node, &node_score) in scores.iter().enumerate() {
                let total_weight = graph.node_total_weight(node as u32);
                if total_weight > 0.0 {
                    for (neighbor, weight) in graph.neighbors(node as u32) {
                        new_scores[neighbor as usize] += node_score * weight / total_weight;
                    }
                }
            }

            // Lazy step
            for (new, old) in new_scores.iter_mut().zip(&scores) {
                *new = 0.5 * (*new + old);
            }

            delta = l1_delta(&scores, &new_scores);
            std::mem::swap(&mut scores, &mut new_scores);
        }

        normalize_scores(&mut scores);

        PageRankResult::new(scores, iterations, delta, delta <= self.threshold)
    }
}
