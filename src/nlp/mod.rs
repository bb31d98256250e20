//! Natural Language Processing components
//!
//! This module provides sentence splitting, token normalization and
//! stopword filtering.

pub mod stopwords;
pub mod tokenizer;
