//! `distill`: print an EPUB's metadata, table of contents and chapter summaries

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use epub_distill::{Algorithm, EpubDistiller, Summarizer, SummarizerConfig, TocEntry};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "distill")]
#[command(about = "Extract metadata, table of contents and chapter summaries from EPUB files")]
#[command(version)]
struct Cli {
    /// Path to the EPUB file
    #[arg(value_name = "EPUB_FILE")]
    epub_file: PathBuf,

    /// Enable verbose (debug) logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Include chapter summaries in the output
    #[arg(short, long)]
    summary: bool,

    /// Summarization algorithm: lexrank, lsa or textrank
    #[arg(short, long)]
    algorithm: Option<String>,

    /// Number of sentences per chapter summary
    #[arg(short = 'n', long)]
    sentences: Option<usize>,

    /// Stop-word language (ISO 639-1 code)
    #[arg(long)]
    language: Option<String>,

    /// JSON file with summarizer settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Never prompt before reading files outside the current directory
    #[arg(long = "no-interactive")]
    no_interactive: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ChapterReport<'a> {
    id: &'a str,
    title: &'a str,
    href: &'a str,
    level: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
struct BookReport<'a> {
    title: &'a str,
    author: &'a str,
    chapters: Vec<ChapterReport<'a>>,
    total_chapters: usize,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("epub_distill=debug,distill=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Defaults, then the optional config file, then command-line flags
fn load_config(cli: &Cli) -> Result<SummarizerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            SummarizerConfig::from_json(&json)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => SummarizerConfig::default(),
    };

    if let Some(name) = &cli.algorithm {
        config = config.with_algorithm(name.parse::<Algorithm>()?);
    }
    if let Some(count) = cli.sentences {
        config = config.with_sentence_count(count);
    }
    if let Some(language) = &cli.language {
        config = config.with_language(language.as_str());
    }

    config.validate()?;
    Ok(config)
}

fn is_within(path: &Path, dir: &Path) -> bool {
    path.starts_with(dir)
}

/// Ask before touching a file outside the working directory
fn confirm_outside_access(canonical: &Path, current_dir: &Path) -> Result<bool> {
    println!();
    println!("Security Notice:");
    println!("You are trying to access a file outside the current directory:");
    println!("  Current directory: {}", current_dir.display());
    println!("  Target file: {}", canonical.display());
    println!();
    print!("Do you want to continue? [y/N]: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_text(book: &EpubDistiller, summaries: Option<&[Vec<String>]>) {
    let metadata = book.metadata();
    println!("Title: {}", metadata.title);
    println!("Author: {}", metadata.author);

    println!("\n{}", "=".repeat(60));
    println!("TABLE OF CONTENTS");
    println!("{}", "=".repeat(60));

    for (i, entry) in book.table_of_contents().iter().enumerate() {
        print_entry(i + 1, entry);
        if let Some(summaries) = summaries {
            match summaries.get(i) {
                Some(sentences) if !sentences.is_empty() => {
                    println!("     Summary:");
                    for sentence in sentences {
                        println!("       • {sentence}");
                    }
                }
                _ => println!("     Summary: [Could not extract content]"),
            }
        }
        println!();
    }

    println!("\nTotal chapters extracted: {}", book.chapter_mapping().len());
}

fn print_entry(number: usize, entry: &TocEntry) {
    println!("{number:3}. {}", entry.title);
    println!("     ID: {}", entry.id);
    println!("     File: {}", entry.href);
}

fn print_json(book: &EpubDistiller, summaries: Option<&[Vec<String>]>) -> Result<()> {
    let metadata = book.metadata();
    let chapters: Vec<ChapterReport<'_>> = book
        .table_of_contents()
        .iter()
        .enumerate()
        .map(|(i, entry)| ChapterReport {
            id: &entry.id,
            title: &entry.title,
            href: &entry.href,
            level: entry.level,
            summary: summaries.and_then(|s| s.get(i)).map(Vec::as_slice),
        })
        .collect();

    let report = BookReport {
        title: &metadata.title,
        author: &metadata.author,
        total_chapters: chapters.len(),
        chapters,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;

    let current_dir = std::env::current_dir()
        .and_then(|d| d.canonicalize())
        .context("failed to resolve the current directory")?;
    let canonical = cli
        .epub_file
        .canonicalize()
        .unwrap_or_else(|_| current_dir.join(&cli.epub_file));

    if !canonical.is_file() {
        eprintln!("Error: File '{}' does not exist.", canonical.display());
        return Ok(ExitCode::FAILURE);
    }

    let is_epub = canonical
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("epub"));
    if !is_epub {
        eprintln!("Error: File '{}' is not an EPUB file.", cli.epub_file.display());
        return Ok(ExitCode::FAILURE);
    }

    if !is_within(&canonical, &current_dir) {
        debug!(path = %canonical.display(), "file is outside the working directory");
        if !cli.no_interactive && !confirm_outside_access(&canonical, &current_dir)? {
            eprintln!("Access denied by user.");
            return Ok(ExitCode::FAILURE);
        }
    }

    let book = match EpubDistiller::open(&canonical) {
        Ok(book) => book,
        Err(err) => {
            eprintln!("Error loading EPUB file: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let summaries = if cli.summary {
        let summarizer = Summarizer::new(config.clone())?;
        info!(
            algorithm = %config.algorithm,
            sentences = config.sentence_count,
            chapters = book.table_of_contents().len(),
            "summarizing chapters"
        );
        Some(book.summarize_all(&summarizer, config.algorithm.as_str(), config.sentence_count)?)
    } else {
        None
    };

    match cli.format {
        OutputFormat::Text => print_text(&book, summaries.as_deref()),
        OutputFormat::Json => print_json(&book, summaries.as_deref())?,
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "distill", "book.epub", "-s", "-a", "TextRank", "-n", "3", "--format", "json",
        ])
        .unwrap();

        assert!(cli.summary);
        assert_eq!(cli.sentences, Some(3));
        assert_eq!(cli.format, OutputFormat::Json);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.algorithm, Algorithm::TextRank);
        assert_eq!(config.sentence_count, 3);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let cli = Cli::try_parse_from(["distill", "book.epub", "-a", "bogus"]).unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_zero_sentences_rejected() {
        let cli = Cli::try_parse_from(["distill", "book.epub", "-n", "0"]).unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distill.json");
        std::fs::write(&path, r#"{"algorithm": "lsa", "sentence_count": 4}"#).unwrap();

        let args: Vec<std::ffi::OsString> = vec![
            "distill".into(),
            "book.epub".into(),
            "--config".into(),
            path.into_os_string(),
            "-n".into(),
            "2".into(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let config = load_config(&cli).unwrap();

        assert_eq!(config.algorithm, Algorithm::Lsa);
        assert_eq!(config.sentence_count, 2);
    }

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("no"));
    }

    #[test]
    fn test_is_within() {
        assert!(is_within(Path::new("/home/u/books/a.epub"), Path::new("/home/u")));
        assert!(!is_within(Path::new("/tmp/a.epub"), Path::new("/home/u")));
        assert!(!is_within(Path::new("/home/user2/a.epub"), Path::new("/home/u")));
    }
}
