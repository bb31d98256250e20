//! Graph construction and representation
//!
//! This module builds the sentence similarity graph used by LexRank and
//! TextRank and stores it in CSR form for power iteration.

pub mod builder;
pub mod csr;
