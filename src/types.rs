//! Core types for epub_distill
//!
//! Sentences, summaries and the summarizer configuration shared by the
//! tokenizer, the rankers and the summarizer facade.

use crate::errors::{DistillError, Result};
use crate::summarizer::unit_vector::SimilarityMetric;
use crate::variants::Algorithm;
use serde::{Deserialize, Serialize};

// ============================================================================
// Sentence
// ============================================================================

/// A sentence from the input text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    /// The surface form, exactly as it appears in the input (trimmed)
    pub text: String,
    /// Byte offset (start) in original text
    pub start: usize,
    /// Byte offset (end) in original text
    pub end: usize,
    /// Sentence index within the chapter
    pub index: usize,
    /// Normalized scoring tokens (lowercase, no punctuation, no stopwords)
    pub tokens: Vec<String>,
}

impl Sentence {
    /// Create a new sentence with no scoring tokens
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
            tokens: Vec::new(),
        }
    }

    /// Builder method: attach scoring tokens
    pub fn with_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens = tokens.into_iter().map(Into::into).collect();
        self
    }
}

// ============================================================================
// Summary
// ============================================================================

/// One extracted sentence of a summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySentence {
    /// Index of the sentence in the chapter
    pub index: usize,
    /// Surface text of the sentence
    pub text: String,
    /// Score assigned by the ranker
    pub score: f64,
}

/// Result of summarizing one chapter
///
/// Sentences are ordered by ascending chapter index, never by score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Algorithm that produced the scores
    pub algorithm: Algorithm,
    /// Selected sentences in document order
    pub sentences: Vec<SummarySentence>,
    /// Number of sentences the chapter was split into
    pub total_sentences: usize,
}

impl Summary {
    /// Surface strings of the selected sentences, in document order
    pub fn texts(&self) -> Vec<String> {
        self.sentences.iter().map(|s| s.text.clone()).collect()
    }

    /// Number of selected sentences
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Check if nothing was selected
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// LexRank parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexRankConfig {
    /// Edges with similarity below this value are dropped
    pub threshold: f64,
}

impl Default for LexRankConfig {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

/// TextRank parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRankConfig {
    /// Damping factor for PageRank (typically 0.85)
    pub damping: f64,
    /// Sentence similarity used for edge weights
    pub similarity: SimilarityMetric,
}

impl Default for TextRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            similarity: SimilarityMetric::Cosine,
        }
    }
}

/// Cell weighting of the LSA term-by-sentence matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermWeighting {
    /// Raw term counts
    Raw,
    /// `smoothing + (1 - smoothing) * tf / max_tf` for present terms
    #[default]
    Smoothed,
}

/// LSA parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsaConfig {
    /// Number of latent topics; `None` uses the requested sentence count
    pub topics: Option<usize>,
    /// Term weighting applied to matrix cells
    pub weighting: TermWeighting,
    /// Smoothing constant for [`TermWeighting::Smoothed`]
    pub smoothing: f64,
}

impl Default for LsaConfig {
    fn default() -> Self {
        Self {
            topics: None,
            weighting: TermWeighting::Smoothed,
            smoothing: 0.4,
        }
    }
}

/// Configuration for chapter summarization
///
/// Built once and shared by reference; nothing in the crate mutates it
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Default ranking algorithm
    pub algorithm: Algorithm,
    /// Default number of sentences per summary
    pub sentence_count: usize,
    /// Language code for stopwords (e.g., "en", "de", "fr")
    pub language: String,
    /// Additional stopwords (extends the built-in list)
    pub stopwords: Vec<String>,
    /// Maximum power iterations for LexRank and TextRank
    pub max_iterations: usize,
    /// Convergence threshold (L1 change between iterations)
    pub convergence_threshold: f64,
    pub lexrank: LexRankConfig,
    pub textrank: TextRankConfig,
    pub lsa: LsaConfig,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::LexRank,
            sentence_count: 5,
            language: "en".to_string(),
            stopwords: Vec::new(),
            max_iterations: 100,
            convergence_threshold: 1e-6,
            lexrank: LexRankConfig::default(),
            textrank: TextRankConfig::default(),
            lsa: LsaConfig::default(),
        }
    }
}

impl SummarizerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sentence_count == 0 {
            return Err(DistillError::InvalidSentenceCount(0));
        }

        if !(self.textrank.damping > 0.0 && self.textrank.damping < 1.0) {
            return Err(DistillError::invalid_config(format!(
                "damping must be between 0 and 1 (exclusive), got {}",
                self.textrank.damping
            )));
        }

        if !(0.0..1.0).contains(&self.lexrank.threshold) {
            return Err(DistillError::invalid_config(format!(
                "lexrank threshold must be in [0, 1), got {}",
                self.lexrank.threshold
            )));
        }

        if self.max_iterations == 0 {
            return Err(DistillError::invalid_config("max_iterations must be > 0"));
        }

        if !(self.convergence_threshold > 0.0) {
            return Err(DistillError::invalid_config(
                "convergence_threshold must be > 0",
            ));
        }

        if !(0.0..1.0).contains(&self.lsa.smoothing) {
            return Err(DistillError::invalid_config(format!(
                "lsa smoothing must be in [0, 1), got {}",
                self.lsa.smoothing
            )));
        }

        if self.lsa.topics == Some(0) {
            return Err(DistillError::invalid_config("lsa topics must be > 0"));
        }

        Ok(())
    }

    /// Builder method: set the default algorithm
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Builder method: set the default sentence count
    pub fn with_sentence_count(mut self, count: usize) -> Self {
        self.sentence_count = count;
        self
    }

    /// Builder method: set stopword language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builder method: add extra stopwords
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = words.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: set max iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder method: set convergence threshold
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Builder method: set the LexRank similarity threshold
    pub fn with_lexrank_threshold(mut self, threshold: f64) -> Self {
        self.lexrank.threshold = threshold;
        self
    }

    /// Builder method: set the TextRank damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.textrank.damping = damping;
        self
    }

    /// Builder method: set the number of LSA topics
    pub fn with_lsa_topics(mut self, topics: usize) -> Self {
        self.lsa.topics = Some(topics);
        self
    }
}
