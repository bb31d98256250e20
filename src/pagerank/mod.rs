//! Power-iteration rankers over the sentence graph
//!
//! This module provides standard PageRank (TextRank) and eigenvector
//! centrality (LexRank). Both stop after a fixed iteration cap whether or not
//! they converged, returning the best estimate reached.

pub mod centrality;
pub mod standard;

/// Result of a power-iteration computation
#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// Scores for each node (indexed by node ID), summing to 1
    pub scores: Vec<f64>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Final convergence delta (L1)
    pub delta: f64,
    /// Whether the algorithm converged
    pub converged: bool,
}

impl PageRankResult {
    /// Create a new PageRank result
    pub fn new(scores: Vec<f64>, iterations: usize, delta: f64, converged: bool) -> Self {
        Self {
            scores,
            iterations,
            delta,
            converged,
        }
    }
}

/// Rescale scores in place so they sum to 1
///
/// A vector with no positive mass becomes uniform.
pub(crate) fn normalize_scores(scores: &mut [f64]) {
    if scores.is_empty() {
        return;
    }
    let sum: f64 = scores.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        for score in scores.iter_mut() {
            *score /= sum;
        }
    } else {
        let uniform = 1.0 / scores.len() as f64;
        scores.fill(uniform);
    }
}

/// L1 distance between two score vectors
pub(crate) fn l1_delta(old: &[f64], new: &[f64]) -> f64 {
    old.iter().zip(new).map(|(o, n)| (o - n).abs()).sum()
}
