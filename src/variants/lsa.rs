//! Latent Semantic Analysis variant
//!
//! Builds a term × sentence matrix `A`, extracts the strongest latent topics
//! from the Gram matrix `AᵀA` (whose eigenpairs are the squared singular
//! values and right singular vectors of `A`), and scores sentence `j` as
//! `sqrt(Σ_k σ_k² · v_k[j]²)`.

use super::SentenceRanker;
use crate::pagerank::normalize_scores;
use crate::types::{Sentence, SummarizerConfig, TermWeighting};
use ndarray::{Array1, Array2, Axis};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Eigenvalues below this are treated as exhausted topics
const EIGEN_EPSILON: f64 = 1e-12;

/// Minimum norm a unit start vector must keep after orthogonalization
const START_EPSILON: f64 = 1e-6;

/// LSA implementation
#[derive(Debug, Clone)]
pub struct Lsa {
    /// Number of latent topics to keep (clamped to the matrix rank bound)
    pub topics: usize,
    pub weighting: TermWeighting,
    pub smoothing: f64,
    pub max_iterations: usize,
    pub convergence_threshold: f64,
}

impl Default for Lsa {
    fn default() -> Self {
        let config = SummarizerConfig::default();
        Self::with_config(&config, config.sentence_count)
    }
}

impl Lsa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from config; `sentence_count` is the topic count unless the
    /// config pins one
    pub fn with_config(config: &SummarizerConfig, sentence_count: usize) -> Self {
        Self {
            topics: config.lsa.topics.unwrap_or(sentence_count).max(1),
            weighting: config.lsa.weighting,
            smoothing: config.lsa.smoothing,
            max_iterations: config.max_iterations,
            convergence_threshold: config.convergence_threshold,
        }
    }

    pub fn with_topics(mut self, topics: usize) -> Self {
        self.topics = topics.max(1);
        self
    }

    pub fn with_weighting(mut self, weighting: TermWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Weighted term × sentence matrix over the sorted chapter vocabulary
    pub fn term_matrix(&self, sentences: &[Sentence]) -> Array2<f64> {
        let mut vocabulary: Vec<&str> = sentences
            .iter()
            .flat_map(|s| s.tokens.iter().map(String::as_str))
            .collect();
        vocabulary.sort_unstable();
        vocabulary.dedup();

        let rows: FxHashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(row, term)| (*term, row))
            .collect();

        let mut matrix = Array2::<f64>::zeros((vocabulary.len(), sentences.len()));
        for (col, sentence) in sentences.iter().enumerate() {
            for token in &sentence.tokens {
                if let Some(&row) = rows.get(token.as_str()) {
                    matrix[[row, col]] += 1.0;
                }
            }
        }

        if self.weighting == TermWeighting::Smoothed {
            for mut column in matrix.axis_iter_mut(Axis(1)) {
                let max_tf = column.iter().copied().fold(0.0, f64::max);
                if max_tf > 0.0 {
                    column.mapv_inplace(|tf| {
                        if tf > 0.0 {
                            self.smoothing + (1.0 - self.smoothing) * tf / max_tf
                        } else {
                            0.0
                        }
                    });
                }
            }
        }

        matrix
    }

    /// Leading eigenpairs of a symmetric positive semi-definite matrix
    ///
    /// Power iteration with deflation; each vector is kept orthogonal to the
    /// ones already found. When a start vector falls inside the span already
    /// found (tied eigenvalues) or only reaches an exhausted direction, the
    /// round retries from the unit vectors `e_0, e_1, ...` in turn.
    fn top_eigenpairs(&self, gram: &Array2<f64>, count: usize) -> Vec<(f64, Array1<f64>)> {
        let n = gram.nrows();
        let mut residual = gram.clone();
        let mut pairs: Vec<(f64, Array1<f64>)> = Vec::with_capacity(count);

        for _ in 0..count {
            let found = start_vectors(n).find_map(|start| {
                let vector = start_in_complement(start, &pairs)?;
                let (eigenvalue, vector) = self.power_iterate(&residual, vector, &pairs);
                let positive = eigenvalue.is_finite() && eigenvalue > EIGEN_EPSILON;
                positive.then_some((eigenvalue, vector))
            });
            let Some((eigenvalue, vector)) = found else {
                break;
            };

            let column = vector.view().insert_axis(Axis(1));
            let row = vector.view().insert_axis(Axis(0));
            residual.scaled_add(-eigenvalue, &column.dot(&row));
            pairs.push((eigenvalue, vector));
        }

        pairs
    }

    /// Rayleigh quotient and vector after power iteration on `matrix`
    fn power_iterate(
        &self,
        matrix: &Array2<f64>,
        mut vector: Array1<f64>,
        basis: &[(f64, Array1<f64>)],
    ) -> (f64, Array1<f64>) {
        for _ in 0..self.max_iterations {
            let mut next = matrix.dot(&vector);
            orthogonalize(&mut next, basis);
            if !normalize(&mut next) {
                break;
            }
            let change = (&next - &vector).mapv(f64::abs).sum();
            vector = next;
            if change < self.convergence_threshold {
                break;
            }
        }

        (vector.dot(&matrix.dot(&vector)), vector)
    }
}

/// Deterministic start vectors: a non-uniform one first, then `e_0 .. e_{n-1}`
fn start_vectors(n: usize) -> impl Iterator<Item = Array1<f64>> {
    let skewed = Array1::from_shape_fn(n, |i| 1.0 + ((i + 1) as f64).ln());
    std::iter::once(skewed).chain((0..n).map(move |k| {
        let mut unit = Array1::<f64>::zeros(n);
        unit[k] = 1.0;
        unit
    }))
}

/// Unit-length part of `start` orthogonal to `basis`, if enough of it survives
fn start_in_complement(
    mut start: Array1<f64>,
    basis: &[(f64, Array1<f64>)],
) -> Option<Array1<f64>> {
    if !normalize(&mut start) {
        return None;
    }
    orthogonalize(&mut start, basis);
    if start.dot(&start).sqrt() < START_EPSILON {
        return None;
    }
    normalize(&mut start).then_some(start)
}

fn orthogonalize(vector: &mut Array1<f64>, basis: &[(f64, Array1<f64>)]) {
    for (_, u) in basis {
        let projection = vector.dot(u);
        vector.scaled_add(-projection, u);
    }
}

fn normalize(vector: &mut Array1<f64>) -> bool {
    let norm = vector.dot(vector).sqrt();
    if norm <= EIGEN_EPSILON || !norm.is_finite() {
        return false;
    }
    vector.mapv_inplace(|x| x / norm);
    true
}

impl SentenceRanker for Lsa {
    fn rank(&self, sentences: &[Sentence]) -> Vec<f64> {
        let n = sentences.len();
        if n == 0 {
            return Vec::new();
        }

        let matrix = self.term_matrix(sentences);
        let topics = self.topics.min(matrix.nrows()).min(n);
        let mut scores = vec![0.0; n];

        if topics > 0 {
            let gram = matrix.t().dot(&matrix);
            let pairs = self.top_eigenpairs(&gram, topics);

            // λ = σ², so σ²·v² sums directly
            for (j, score) in scores.iter_mut().enumerate() {
                let mass: f64 = pairs.iter().map(|(lambda, v)| lambda * v[j] * v[j]).sum();
                *score = mass.max(0.0).sqrt();
            }

            debug!(
                sentences = n,
                terms = matrix.nrows(),
                topics = pairs.len(),
                "lsa decomposition"
            );
        }

        normalize_scores(&mut scores);
        scores
    }
}
