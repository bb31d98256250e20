//! Top-k sentence selection
//!
//! Picks the highest-scoring sentences and returns them in document order.

use crate::types::{Sentence, SummarySentence};

/// Score-based sentence selector
#[derive(Debug, Clone, Copy)]
pub struct SentenceSelector {
    num_sentences: usize,
}

impl SentenceSelector {
    /// Create a selector keeping at most `num_sentences`
    pub fn new(num_sentences: usize) -> Self {
        Self { num_sentences }
    }

    /// Indices of the selected sentences, ascending
    ///
    /// Ranks by score descending with ties going to the earlier sentence, keeps
    /// the first `min(count, len)`, then restores document order.
    pub fn select_indices(&self, scores: &[f64]) -> Vec<usize> {
        let mut ranked: Vec<usize> = (0..scores.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
        ranked.truncate(self.num_sentences);
        ranked.sort_unstable();
        ranked
    }

    /// Select sentences with their scores, in document order
    pub fn select(&self, sentences: &[Sentence], scores: &[f64]) -> Vec<SummarySentence> {
        self.select_indices(scores)
            .into_iter()
            .filter_map(|i| {
                let sentence = sentences.get(i)?;
                Some(SummarySentence {
                    index: sentence.index,
                    text: sentence.text.clone(),
                    score: scores[i],
                })
            })
            .collect()
    }
}
