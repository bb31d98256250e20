//! # epub_distill
//!
//! Extract metadata, a table of contents, chapter text and extractive
//! summaries from EPUB books.
//!
//! ## Features
//!
//! - **Three rankers**: LexRank, TextRank and LSA behind one facade
//! - **Deterministic**: ties resolve by sentence position, no randomness
//! - **Parallel**: chapters of a book are summarized concurrently with rayon
//! - **EPUB aware**: TOC flattening, fragment-level chapter extraction and
//!   HTML to plain text conversion (feature `epub`)

pub mod errors;
pub mod graph;
pub mod nlp;
pub mod pagerank;
pub mod summarizer;
pub mod types;
pub mod variants;

#[cfg(feature = "epub")]
pub mod epub;

// Re-export commonly used types
pub use errors::{DistillError, Result};
pub use types::{
    LexRankConfig, LsaConfig, Sentence, Summary, SummarySentence, SummarizerConfig, TermWeighting,
    TextRankConfig,
};

// Re-export main functionality
pub use graph::{builder::GraphBuilder, csr::CsrGraph};
pub use nlp::{stopwords::StopwordFilter, tokenizer::Tokenizer};
pub use pagerank::{
    centrality::EigenvectorCentrality, standard::StandardPageRank, PageRankResult,
};
pub use summarizer::{selector::SentenceSelector, unit_vector::SimilarityMetric, Summarizer};
pub use variants::{Algorithm, LexRank, Lsa, Ranker, SentenceRanker, TextRank};

#[cfg(feature = "epub")]
pub use crate::epub::{
    html::html_to_plain_text,
    reader::{BookMetadata, EpubDistiller, TocEntry},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
