//! Chapter HTML handling
//!
//! Fragment extraction (`chapter.xhtml#section-2`) and conversion of chapter
//! HTML into the plain text the summarizer consumes.

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::sync::LazyLock;

/// Elements whose content never reaches the plain text
const IGNORED_ELEMENTS: &[&str] = &["script", "style", "meta", "link"];

/// Elements removed from chapter HTML before it is handed out
const SCRIPT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements treated as self-contained sections when targeted by a fragment
const CONTAINER_ELEMENTS: &[&str] = &["div", "section", "article", "main"];

static PARAGRAPH_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("valid paragraph break pattern"));

static SPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +").expect("valid space run pattern"));

/// Heading level of `h1`..`h6`
fn heading_level(name: &str) -> Option<u8> {
    let level: u8 = name.strip_prefix('h')?.parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn is_ignored_element(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|e| IGNORED_ELEMENTS.contains(&e.name()))
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Remove `script` and `style` elements; other markup is left alone
///
/// Documents without them are returned unchanged.
pub fn strip_scripts(html: &str) -> String {
    let mut document = Html::parse_document(html);
    let doomed: Vec<_> = document
        .tree
        .nodes()
        .filter(|node| {
            node.value()
                .as_element()
                .is_some_and(|e| SCRIPT_ELEMENTS.contains(&e.name()))
        })
        .map(|node| node.id())
        .collect();
    if doomed.is_empty() {
        return html.to_string();
    }

    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
    document.html()
}

/// Extract the section of `html` addressed by `fragment`
///
/// Returns `None` when no element carries that id.
pub fn extract_fragment(html: &str, fragment: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let target = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().id() == Some(fragment))?;

    let name = target.value().name();
    if let Some(level) = heading_level(name) {
        return Some(section_from_heading(target, level));
    }
    if CONTAINER_ELEMENTS.contains(&name) {
        return Some(target.html());
    }

    let parent = target.parent().and_then(ElementRef::wrap);
    match parent {
        Some(p) if p.value().name() == "body" || CONTAINER_ELEMENTS.contains(&p.value().name()) => {
            Some(p.html())
        }
        _ => Some(target.html()),
    }
}

/// A heading plus its following siblings, up to the next heading of the same
/// or a higher level
fn section_from_heading(heading: ElementRef<'_>, level: u8) -> String {
    let mut section = heading.html();

    for sibling in heading.next_siblings() {
        match sibling.value() {
            Node::Element(element) => {
                if heading_level(element.name()).is_some_and(|l| l <= level) {
                    break;
                }
                if let Some(element_ref) = ElementRef::wrap(sibling) {
                    section.push_str(&element_ref.html());
                }
            }
            Node::Text(text) if !text.trim().is_empty() => {
                section.push_str(&escape_text(text));
            }
            _ => {}
        }
    }

    section
}

/// Visible text under `element`, whitespace collapsed to single spaces
fn collapsed_text(element: ElementRef<'_>) -> String {
    let raw: String = element
        .descendants()
        .filter(|n| !n.ancestors().any(|a| is_ignored_element(a.value())))
        .filter_map(|n| n.value().as_text().map(|t| &**t))
        .collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text nodes that are direct children of `element`
fn direct_text(element: ElementRef<'_>) -> String {
    let raw: String = element
        .children()
        .filter_map(|n| n.value().as_text().map(|t| &**t))
        .collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convert chapter HTML into paragraph-structured plain text
///
/// The first `h1` is treated as the chapter title and skipped. Other headings
/// become paragraphs of their own.
pub fn html_to_plain_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let body = root
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "body")
        .unwrap_or(root);

    let mut parts: Vec<String> = Vec::new();
    let mut title_skipped = false;

    for node in body.descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if is_ignored_element(node.value())
            || node.ancestors().any(|a| is_ignored_element(a.value()))
        {
            continue;
        }

        let name = element.value().name();
        if heading_level(name).is_some() {
            if name == "h1" && !title_skipped {
                title_skipped = true;
                continue;
            }
            parts.push(format!("\n\n{}\n\n", collapsed_text(element)));
        } else if name == "p" {
            let text = collapsed_text(element);
            if !text.is_empty() {
                parts.push(format!("{text}\n\n"));
            }
        } else if name == "div" || name == "section" {
            let text = direct_text(element);
            if !text.is_empty() {
                parts.push(format!("{text}\n\n"));
            }
        }
    }

    if parts.is_empty() {
        parts.push(collapsed_text(body));
    }

    let joined = parts.concat();
    let text = PARAGRAPH_BREAKS.replace_all(&joined, "\n\n");
    let text = SPACE_RUNS.replace_all(&text, " ");
    text.trim().to_string()
}
