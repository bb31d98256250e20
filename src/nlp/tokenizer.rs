//! Sentence splitting and token normalization
//!
//! Chapter text may still carry inline HTML. Tags are ordinary characters for
//! sentence splitting, so surface strings come back exactly as written; they
//! are only removed from the normalized scoring tokens.

use crate::nlp::stopwords::StopwordFilter;
use crate::types::{Sentence, SummarizerConfig};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

/// Abbreviations that end in a period without ending the sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "fig", "figs", "vol", "vols", "ch",
    "chap", "cf", "approx", "dept", "inc", "ltd", "co", "corp", "gen", "gov", "rev", "sen", "rep",
    "capt", "lt", "col", "sgt", "mt", "ft", "pp", "al",
];

/// Characters that may trail a terminator and still belong to its sentence
fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '\u{201D}' | '\u{2019}' | '\u{00BB}')
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Splits chapter text into sentences and normalized tokens
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: StopwordFilter,
}

impl Tokenizer {
    /// Create a tokenizer with the given stopword filter
    pub fn new(stopwords: StopwordFilter) -> Self {
        Self { stopwords }
    }

    /// Create a tokenizer from the summarizer configuration
    pub fn from_config(config: &SummarizerConfig) -> Self {
        let stopwords = StopwordFilter::new(&config.language).with_extra(&config.stopwords);
        debug!(
            language = %config.language,
            stopwords = stopwords.word_count(),
            "tokenizer ready"
        );
        Self::new(stopwords)
    }

    /// Split text into sentences, each carrying its scoring tokens
    pub fn tokenize(&self, text: &str) -> Vec<Sentence> {
        self.split_spans(text)
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| {
                let surface = &text[start..end];
                Sentence::new(surface, start, end, index).with_tokens(self.normalize(surface))
            })
            .collect()
    }

    /// Split text into sentence surface strings
    pub fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.split_spans(text)
            .into_iter()
            .map(|(start, end)| &text[start..end])
            .collect()
    }

    /// Normalize one sentence into scoring tokens
    ///
    /// Lowercases, drops markup, strips punctuation and removes stopwords.
    pub fn normalize(&self, sentence: &str) -> Vec<String> {
        let plain = strip_markup(sentence);
        plain
            .unicode_words()
            .filter_map(|word| {
                let lower = word.to_lowercase();
                if self.stopwords.is_stopword(&lower) {
                    return None;
                }
                let stripped: String = lower.chars().filter(|c| c.is_alphanumeric()).collect();
                if stripped.is_empty() || self.stopwords.is_stopword(&stripped) {
                    None
                } else {
                    Some(stripped)
                }
            })
            .collect()
    }

    /// Byte spans of trimmed, non-empty sentences
    ///
    /// Boundaries fall after a run of `.`, `!`, `?` (plus closing quotes or
    /// brackets) that is followed by whitespace or end of text, and at blank
    /// lines. Consecutive spans only leave whitespace between them.
    fn split_spans(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if c == '\n' {
                let rest = &text[i + 1..];
                let blank_line = rest
                    .trim_start_matches([' ', '\t', '\r'])
                    .starts_with('\n');
                if blank_line {
                    push_span(text, start, i, &mut spans);
                    start = i + 1;
                }
                continue;
            }

            if !is_terminator(c) {
                continue;
            }

            let mut end = i + c.len_utf8();
            let mut single_period = c == '.';
            while let Some(&(j, next)) = chars.peek() {
                if is_terminator(next) {
                    single_period = false;
                } else if !is_closing(next) {
                    break;
                }
                end = j + next.len_utf8();
                chars.next();
            }

            let at_boundary = text[end..].chars().next().map_or(true, char::is_whitespace);
            if !at_boundary {
                continue;
            }
            if single_period && ends_with_abbreviation(&text[start..i]) {
                continue;
            }

            push_span(text, start, end, &mut spans);
            start = end;
        }

        push_span(text, start, text.len(), &mut spans);
        spans
    }
}

fn push_span(text: &str, start: usize, end: usize, spans: &mut Vec<(usize, usize)>) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    let span_start = start + lead;
    spans.push((span_start, span_start + trimmed.len()));
}

/// Check whether the word right before a period is an abbreviation
fn ends_with_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    if word.is_empty() || word.ends_with(|c: char| c.is_numeric()) {
        return false;
    }
    // Initials ("J.") and dotted single letters ("e.g.", "U.S.")
    let mut letters = word.chars();
    if let (Some(first), None) = (letters.next(), letters.next()) {
        if first.is_uppercase() {
            return true;
        }
    }
    if word.contains('.') {
        return word.split('.').all(|part| {
            let mut chars = part.chars();
            matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
        });
    }
    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

/// Replace `<tag ...>` runs with a space; a `<` that does not open a tag is kept
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let opens_tag = c == '<'
            && chars
                .peek()
                .is_some_and(|n| n.is_ascii_alphabetic() || *n == '/' || *n == '!');
        if !opens_tag {
            out.push(c);
            continue;
        }
        for inner in chars.by_ref() {
            if inner == '>' {
                break;
            }
        }
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> Tokenizer {
        Tokenizer::default()
    }

    #[test]
    fn test_basic_split() {
        let text = "The cat sat. The dog ran! Did they play? Yes.";
        let sentences = tokenizer().split_sentences(text);
        assert_eq!(
            sentences,
            vec!["The cat sat.", "The dog ran!", "Did they play?", "Yes."]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenizer().tokenize("").is_empty());
        assert!(tokenizer().tokenize("   \n\n  ").is_empty());
    }

    #[test]
    fn test_trailing_text_without_terminator() {
        let sentences = tokenizer().split_sentences("One sentence. And a fragment");
        assert_eq!(sentences, vec!["One sentence.", "And a fragment"]);
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        let text = "Mr. Smith met Dr. Jones at noon. They talked, e.g. about J. Austen.";
        let sentences = tokenizer().split_sentences(text);
        assert_eq!(
            sentences,
            vec![
                "Mr. Smith met Dr. Jones at noon.",
                "They talked, e.g. about J. Austen."
            ]
        );
    }

    #[test]
    fn test_decimal_numbers_do_not_split() {
        let sentences = tokenizer().split_sentences("Pi is 3.14 roughly. Next one.");
        assert_eq!(sentences, vec!["Pi is 3.14 roughly.", "Next one."]);
    }

    #[test]
    fn test_sentence_ending_in_dotted_token_splits() {
        let t = tokenizer();
        assert_eq!(
            t.split_sentences("The value is 3.14. Next sentence here."),
            vec!["The value is 3.14.", "Next sentence here."]
        );
        assert_eq!(
            t.split_sentences("Version 2.0. Released today."),
            vec!["Version 2.0.", "Released today."]
        );
        assert_eq!(
            t.split_sentences("Visit example.org. It is great."),
            vec!["Visit example.org.", "It is great."]
        );
        assert_eq!(
            t.split_sentences("Chapter 12. The storm."),
            vec!["Chapter 12.", "The storm."]
        );
    }

    #[test]
    fn test_dotted_initialisms_do_not_split() {
        let text = "She moved to the U.S. in spring. Then winter came.";
        let sentences = tokenizer().split_sentences(text);
        assert_eq!(
            sentences,
            vec!["She moved to the U.S. in spring.", "Then winter came."]
        );
    }

    #[test]
    fn test_closing_quotes_stay_with_sentence() {
        let sentences = tokenizer().split_sentences("He said \"stop.\" Then he left...");
        assert_eq!(sentences, vec!["He said \"stop.\"", "Then he left..."]);
    }

    #[test]
    fn test_blank_line_is_boundary() {
        let text = "Introduction\n\nThis chapter begins here. It continues.";
        let sentences = tokenizer().split_sentences(text);
        assert_eq!(
            sentences,
            vec!["Introduction", "This chapter begins here.", "It continues."]
        );
    }

    #[test]
    fn test_single_newline_is_not_boundary() {
        let sentences = tokenizer().split_sentences("A line\nwrapped here.");
        assert_eq!(sentences, vec!["A line\nwrapped here."]);
    }

    #[test]
    fn test_html_tags_kept_in_surface() {
        let text = "<p>The <b>cat</b> sat.</p> <p>It slept.</p>";
        let sentences = tokenizer().tokenize(text);
        // No whitespace follows either period, so nothing splits
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].text, text);
    }

    #[test]
    fn test_html_split_on_whitespace_after_terminator() {
        let text = "<p>The <b>cat</b> sat. It slept.</p>";
        let sentences = Tokenizer::new(StopwordFilter::from_list(&["the", "it"])).tokenize(text);
        assert_eq!(sentences[0].text, "<p>The <b>cat</b> sat.");
        assert_eq!(sentences[0].tokens, vec!["cat", "sat"]);
        assert_eq!(sentences[1].text, "It slept.</p>");
    }

    #[test]
    fn test_spans_partition_text() {
        let text = "  First one.   Second one!\n\nThird one?  ";
        let sentences = tokenizer().tokenize(text);
        assert_eq!(sentences.len(), 3);
        for s in &sentences {
            assert_eq!(&text[s.start..s.end], s.text);
        }
        for pair in sentences.windows(2) {
            assert!(pair[0].end <= pair[1].start);
            assert!(text[pair[0].end..pair[1].start].trim().is_empty());
        }
    }

    #[test]
    fn test_indices_are_sequential() {
        let sentences = tokenizer().tokenize("A b. C d. E f.");
        let indices: Vec<_> = sentences.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_normalize_lowercases_and_drops_stopwords() {
        let filter = StopwordFilter::from_list(&["the", "and"]);
        let tokens = Tokenizer::new(filter).normalize("The Cat and the Dog played!");
        assert_eq!(tokens, vec!["cat", "dog", "played"]);
    }

    #[test]
    fn test_normalize_strips_markup_and_punctuation() {
        let tokens =
            Tokenizer::new(StopwordFilter::empty()).normalize("<em>Rust's</em> borrow-checker, 2024!");
        assert_eq!(tokens, vec!["rusts", "borrow", "checker", "2024"]);
    }

    #[test]
    fn test_normalize_keeps_lone_angle_bracket() {
        assert_eq!(strip_markup("a < b"), "a < b");
        assert_eq!(strip_markup("<br/>x"), " x");
    }

    #[test]
    fn test_custom_stopwords_from_config() {
        let config = SummarizerConfig::default().with_stopwords(["cat"]);
        let tokens = Tokenizer::from_config(&config).normalize("The cat sat.");
        assert!(!tokens.contains(&"cat".to_string()));
        assert!(!tokens.contains(&"the".to_string()));
    }

    #[test]
    fn test_unicode_text() {
        let sentences = tokenizer().tokenize("Café au lait. Über alles!");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].tokens.contains(&"café".to_string()));
    }
}
