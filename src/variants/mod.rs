//! Sentence ranking algorithms
//!
//! Three interchangeable rankers score every sentence of a chapter:
//! - LexRank: eigenvector centrality over the thresholded similarity graph
//! - TextRank: PageRank stationary distribution over the similarity graph
//! - LSA: projection onto the strongest latent topics of the term-sentence matrix
//!
//! The set is closed: [`Algorithm`] names a variant and [`Ranker`] carries the
//! configured implementation selected by that name.

pub mod lexrank;
pub mod lsa;
pub mod textrank;

use crate::errors::DistillError;
use crate::types::{Sentence, SummarizerConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use lexrank::LexRank;
pub use lsa::Lsa;
pub use textrank::TextRank;

/// Capability shared by all rankers
///
/// Implementations return exactly one finite, non-negative score per input
/// sentence, summing to 1 for non-empty input.
pub trait SentenceRanker {
    /// Score each sentence; higher means more representative
    fn rank(&self, sentences: &[Sentence]) -> Vec<f64>;
}

/// Names of the supported ranking algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    LexRank,
    TextRank,
    Lsa,
}

impl Algorithm {
    /// All supported algorithms
    pub const ALL: [Algorithm; 3] = [Algorithm::LexRank, Algorithm::Lsa, Algorithm::TextRank];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::LexRank => "lexrank",
            Algorithm::TextRank => "textrank",
            Algorithm::Lsa => "lsa",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = DistillError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "lexrank" => Ok(Algorithm::LexRank),
            "textrank" => Ok(Algorithm::TextRank),
            "lsa" => Ok(Algorithm::Lsa),
            _ => Err(DistillError::UnsupportedAlgorithm(value.to_string())),
        }
    }
}

/// A configured ranker, one variant per [`Algorithm`]
#[derive(Debug, Clone)]
pub enum Ranker {
    LexRank(LexRank),
    TextRank(TextRank),
    Lsa(Lsa),
}

impl Ranker {
    /// Build the ranker for `algorithm` from the shared configuration
    ///
    /// `sentence_count` is the requested summary length; LSA uses it as its
    /// topic count unless the configuration fixes one.
    pub fn from_config(
        algorithm: Algorithm,
        config: &SummarizerConfig,
        sentence_count: usize,
    ) -> Self {
        match algorithm {
            Algorithm::LexRank => Ranker::LexRank(LexRank::with_config(config)),
            Algorithm::TextRank => Ranker::TextRank(TextRank::with_config(config)),
            Algorithm::Lsa => Ranker::Lsa(Lsa::with_config(config, sentence_count)),
        }
    }

    /// The algorithm this ranker implements
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Ranker::LexRank(_) => Algorithm::LexRank,
            Ranker::TextRank(_) => Algorithm::TextRank,
            Ranker::Lsa(_) => Algorithm::Lsa,
        }
    }
}

impl SentenceRanker for Ranker {
    fn rank(&self, sentences: &[Sentence]) -> Vec<f64> {
        match self {
            Ranker::LexRank(ranker) => ranker.rank(sentences),
            Ranker::TextRank(ranker) => ranker.rank(sentences),
            Ranker::Lsa(ranker) => ranker.rank(sentences),
        }
    }
}
