//! Extractive summarization
//!
//! [`Summarizer`] is the entry point: it tokenizes a chapter, scores its
//! sentences with the requested ranker and returns the top sentences in their
//! original order.
//!
//! ```
//! use epub_distill::{Summarizer, SummarizerConfig};
//!
//! let summarizer = Summarizer::new(SummarizerConfig::default()).unwrap();
//! let summary = summarizer
//!     .summarize("The cat sat. The dog ran. The cat and dog played.", "lexrank", 1)
//!     .unwrap();
//! assert_eq!(summary, vec!["The cat and dog played."]);
//! ```

pub mod selector;
pub mod unit_vector;

use crate::errors::{DistillError, Result};
use crate::nlp::tokenizer::Tokenizer;
use crate::types::{Summary, SummarizerConfig};
use crate::variants::{Algorithm, Ranker, SentenceRanker};
use rayon::prelude::*;
use selector::SentenceSelector;

/// Enter a debug span for a summarization stage
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::debug_span!("summarize_stage", stage = $name).entered();
    };
}

/// Chapter summarizer
///
/// Holds read-only configuration and the stop-word set; safe to share across
/// threads.
#[derive(Debug, Clone)]
pub struct Summarizer {
    config: SummarizerConfig,
    tokenizer: Tokenizer,
}

impl Summarizer {
    /// Create a summarizer, validating the configuration
    pub fn new(config: SummarizerConfig) -> Result<Self> {
        config.validate()?;
        let tokenizer = Tokenizer::from_config(&config);
        Ok(Self { config, tokenizer })
    }

    /// The configuration this summarizer was built with
    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Summarize a chapter with the named algorithm
    ///
    /// Returns at most `sentence_count` sentences, in document order.
    pub fn summarize(
        &self,
        text: &str,
        algorithm: &str,
        sentence_count: usize,
    ) -> Result<Vec<String>> {
        let algorithm: Algorithm = algorithm.parse()?;
        Ok(self.summarize_with(text, algorithm, sentence_count)?.texts())
    }

    /// Summarize with the named algorithm, keeping indices and scores
    pub fn summarize_detailed(
        &self,
        text: &str,
        algorithm: &str,
        sentence_count: usize,
    ) -> Result<Summary> {
        self.summarize_with(text, algorithm.parse()?, sentence_count)
    }

    /// Summarize with the configured default algorithm and sentence count
    pub fn summarize_default(&self, text: &str) -> Result<Summary> {
        self.summarize_with(text, self.config.algorithm, self.config.sentence_count)
    }

    /// Summarize with an already-resolved algorithm
    pub fn summarize_with(
        &self,
        text: &str,
        algorithm: Algorithm,
        sentence_count: usize,
    ) -> Result<Summary> {
        if sentence_count == 0 {
            return Err(DistillError::InvalidSentenceCount(sentence_count));
        }

        let sentences = {
            trace_stage!("tokenize");
            self.tokenizer.tokenize(text)
        };
        let total_sentences = sentences.len();

        if sentences.is_empty() {
            return Ok(Summary {
                algorithm,
                sentences: Vec::new(),
                total_sentences,
            });
        }

        let scores = {
            trace_stage!("rank");
            Ranker::from_config(algorithm, &self.config, sentence_count).rank(&sentences)
        };

        let selected = {
            trace_stage!("select");
            SentenceSelector::new(sentence_count).select(&sentences, &scores)
        };

        tracing::debug!(
            algorithm = %algorithm,
            total_sentences,
            selected = selected.len(),
            "chapter summarized"
        );

        Ok(Summary {
            algorithm,
            sentences: selected,
            total_sentences,
        })
    }

    /// Summarize many chapters in parallel, preserving input order
    ///
    /// The algorithm name is resolved once; an unknown name fails the whole
    /// batch.
    pub fn summarize_batch<S>(
        &self,
        texts: &[S],
        algorithm: &str,
        sentence_count: usize,
    ) -> Result<Vec<Vec<String>>>
    where
        S: AsRef<str> + Sync,
    {
        let algorithm: Algorithm = algorithm.parse()?;
        if sentence_count == 0 {
            return Err(DistillError::InvalidSentenceCount(sentence_count));
        }

        texts
            .par_iter()
            .map(|text| {
                self.summarize_with(text.as_ref(), algorithm, sentence_count)
                    .map(|summary| summary.texts())
            })
            .collect()
    }
}
