//! EPUB container access
//!
//! [`EpubDistiller`] reads a book once: metadata, the flattened table of
//! contents and every spine document are loaded up front, so all later
//! lookups take `&self` and chapters can be processed in parallel.

use super::html::{extract_fragment, html_to_plain_text, strip_scripts};
use crate::errors::{DistillError, Result};
use crate::summarizer::Summarizer;
use ::epub::doc::{EpubDoc, NavPoint};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Title and first author of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
}

impl Default for BookMetadata {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
        }
    }
}

/// One entry of the flattened table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Sequential id: `chapter_001`, `chapter_002`, ...
    pub id: String,
    pub title: String,
    /// Document path inside the archive, possibly with a `#fragment`
    pub href: String,
    /// Nesting depth, 0 for top-level entries
    pub level: usize,
}

#[derive(Debug, Clone)]
struct SpineDocument {
    path: String,
    html: String,
}

/// An opened EPUB book
#[derive(Debug, Clone)]
pub struct EpubDistiller {
    path: PathBuf,
    metadata: BookMetadata,
    toc: Vec<TocEntry>,
    documents: Vec<SpineDocument>,
}

impl EpubDistiller {
    /// Open and load an EPUB file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut doc = EpubDoc::new(path).map_err(|e| DistillError::epub(path, e))?;

        let metadata = BookMetadata {
            title: doc
                .mdata("title")
                .map(|m| m.value.clone())
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            author: doc
                .mdata("creator")
                .map(|m| m.value.clone())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        };

        let mut toc = Vec::new();
        flatten_toc(&doc.toc, 0, &mut toc);

        let mut documents = Vec::new();
        doc.set_current_chapter(0);
        loop {
            let Some((html, _mime)) = doc.get_current_str() else {
                break;
            };
            let doc_path = doc
                .get_current_path()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            documents.push(SpineDocument {
                path: doc_path,
                html,
            });
            if !doc.go_next() {
                break;
            }
        }

        info!(
            path = %path.display(),
            title = %metadata.title,
            toc_entries = toc.len(),
            documents = documents.len(),
            "loaded epub"
        );

        Ok(Self::from_parts(path, metadata, toc, documents))
    }

    fn from_parts(
        path: &Path,
        metadata: BookMetadata,
        toc: Vec<TocEntry>,
        documents: Vec<SpineDocument>,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            metadata,
            toc,
            documents,
        }
    }

    /// Path the book was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata(&self) -> &BookMetadata {
        &self.metadata
    }

    /// Table of contents, flattened depth-first
    pub fn table_of_contents(&self) -> &[TocEntry] {
        &self.toc
    }

    /// Archive paths of the spine documents, in reading order
    pub fn document_paths(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.path.as_str())
    }

    /// HTML of the chapter addressed by a TOC href
    ///
    /// `script` and `style` elements are removed. A `#fragment` narrows the
    /// result to that section; an unknown fragment yields the whole document.
    pub fn chapter_html(&self, href: &str) -> Result<String> {
        let (file, fragment) = match href.split_once('#') {
            Some((file, fragment)) => (file, Some(fragment)),
            None => (href, None),
        };

        let document = self
            .find_document(file)
            .ok_or_else(|| DistillError::ChapterNotFound(href.to_string()))?;

        let html = strip_scripts(&document.html);
        if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
            if let Some(section) = extract_fragment(&html, fragment) {
                return Ok(section);
            }
            debug!(href, fragment, "fragment not found, using whole document");
        }

        Ok(html)
    }

    /// Locate a spine document: exact path, then suffix either way, then
    /// file name
    fn find_document(&self, file: &str) -> Option<&SpineDocument> {
        let base = base_name(file);
        self.documents.iter().find(|doc| {
            let name = doc.path.as_str();
            name == file
                || (!file.is_empty() && name.ends_with(file))
                || (!name.is_empty() && file.ends_with(name))
                || (!base.is_empty() && base == base_name(name))
        })
    }

    /// `(chapter_id, html)` for every TOC entry, in TOC order
    ///
    /// Entries whose document cannot be found map to an empty string.
    pub fn chapter_mapping(&self) -> Vec<(String, String)> {
        self.toc
            .iter()
            .map(|entry| {
                let html = self.chapter_html(&entry.href).unwrap_or_else(|err| {
                    debug!(id = %entry.id, error = %err, "chapter not extracted");
                    String::new()
                });
                (entry.id.clone(), html)
            })
            .collect()
    }

    /// Plain text of a chapter
    pub fn plain_text(&self, href: &str) -> Result<String> {
        Ok(html_to_plain_text(&self.chapter_html(href)?))
    }

    /// Summarize one chapter
    pub fn summarize_chapter(
        &self,
        href: &str,
        summarizer: &Summarizer,
        algorithm: &str,
        sentence_count: usize,
    ) -> Result<Vec<String>> {
        summarizer.summarize(&self.plain_text(href)?, algorithm, sentence_count)
    }

    /// Summarize every TOC entry in parallel, in TOC order
    ///
    /// Chapters that cannot be located summarize to an empty list.
    pub fn summarize_all(
        &self,
        summarizer: &Summarizer,
        algorithm: &str,
        sentence_count: usize,
    ) -> Result<Vec<Vec<String>>> {
        let texts: Vec<String> = self
            .toc
            .iter()
            .map(|entry| self.plain_text(&entry.href).unwrap_or_default())
            .collect();
        summarizer.summarize_batch(&texts, algorithm, sentence_count)
    }
}

fn flatten_toc(points: &[NavPoint], level: usize, entries: &mut Vec<TocEntry>) {
    for point in points {
        entries.push(TocEntry {
            id: format!("chapter_{:03}", entries.len() + 1),
            title: point.label.trim().to_string(),
            href: point.content.to_string_lossy().into_owned(),
            level,
        });
        flatten_toc(&point.children, level + 1, entries);
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SummarizerConfig;

    fn entry(n: usize, title: &str, href: &str) -> TocEntry {
        TocEntry {
            id: format!("chapter_{n:03}"),
            title: title.to_string(),
            href: href.to_string(),
            level: 0,
        }
    }

    fn book() -> EpubDistiller {
        let documents = vec![
            SpineDocument {
                path: "OEBPS/Text/intro.xhtml".to_string(),
                html: "<html><body><h1>Intro</h1><p>Welcome to the book.</p></body></html>"
                    .to_string(),
            },
            SpineDocument {
                path: "OEBPS/Text/ch1.xhtml".to_string(),
                html: "<html><body><h1>One</h1>\
                       <h2 id=\"a\">Alpha</h2><p>Alpha text here.</p>\
                       <script>alert('alpha');</script>\
                       <h2 id=\"b\">Beta</h2><p>Beta text here.</p></body></html>"
                    .to_string(),
            },
        ];
        let toc = vec![
            entry(1, "Intro", "OEBPS/Text/intro.xhtml"),
            entry(2, "Alpha", "OEBPS/Text/ch1.xhtml#a"),
            entry(3, "Missing", "OEBPS/Text/ghost.xhtml"),
        ];
        EpubDistiller::from_parts(Path::new("book.epub"), BookMetadata::default(), toc, documents)
    }

    #[test]
    fn test_exact_match() {
        let html = book().chapter_html("OEBPS/Text/intro.xhtml").unwrap();
        assert!(html.contains("Welcome to the book."));
    }

    #[test]
    fn test_suffix_and_basename_match() {
        let book = book();
        assert!(book.chapter_html("Text/intro.xhtml").unwrap().contains("Welcome"));
        assert!(book.chapter_html("../Other/intro.xhtml").unwrap().contains("Welcome"));
        assert!(book
            .chapter_html("/mnt/OEBPS/Text/intro.xhtml")
            .unwrap()
            .contains("Welcome"));
    }

    #[test]
    fn test_fragment_narrows_chapter() {
        let html = book().chapter_html("OEBPS/Text/ch1.xhtml#a").unwrap();
        assert!(html.contains("Alpha text here."));
        assert!(!html.contains("Beta text here."));
    }

    #[test]
    fn test_scripts_removed_from_chapter_html() {
        let book = book();
        for href in ["OEBPS/Text/ch1.xhtml", "OEBPS/Text/ch1.xhtml#a"] {
            let html = book.chapter_html(href).unwrap();
            assert!(html.contains("Alpha text here."), "{href}");
            assert!(!html.contains("alert"), "{href}");
        }
    }

    #[test]
    fn test_unknown_fragment_returns_document() {
        let html = book().chapter_html("OEBPS/Text/ch1.xhtml#zzz").unwrap();
        assert!(html.contains("Alpha text here."));
        assert!(html.contains("Beta text here."));
    }

    #[test]
    fn test_missing_chapter() {
        let err = book().chapter_html("OEBPS/Text/ghost.xhtml").unwrap_err();
        assert!(matches!(err, DistillError::ChapterNotFound(_)));
    }

    #[test]
    fn test_chapter_mapping_keeps_missing_entries() {
        let mapping = book().chapter_mapping();
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping[0].0, "chapter_001");
        assert!(mapping[1].1.contains("Alpha"));
        assert!(mapping[2].1.is_empty());
    }

    #[test]
    fn test_plain_text_skips_title() {
        assert_eq!(book().plain_text("OEBPS/Text/intro.xhtml").unwrap(), "Welcome to the book.");
    }

    #[test]
    fn test_summaries() {
        let summarizer = Summarizer::new(SummarizerConfig::default()).unwrap();
        let book = book();

        let summary = book
            .summarize_chapter("OEBPS/Text/intro.xhtml", &summarizer, "textrank", 2)
            .unwrap();
        assert_eq!(summary, vec!["Welcome to the book."]);

        let all = book.summarize_all(&summarizer, "lsa", 2).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[2].is_empty());
    }
}
