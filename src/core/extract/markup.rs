//! HTML/XHTML metadata scraping.
//!
//! Title and author lookups prefer citation/Dublin Core `<meta>` tags
//! and fall back to `<title>` and the first `<h1>`.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::io::Read;

use super::{MarkupScraper, ScrapedMetadata};
use crate::core::error::{MathdexError, Result};
use crate::core::indexer::source::DocStream;

static ARXIV_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\barxiv:\s*(\d{4}\.\d{4,5}(?:v\d+)?)").expect("valid arXiv regex")
});

/// A title that is nothing but an arXiv identifier
static ARXIV_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*arxiv:\s*(\d{4}\.\d{4,5}(?:v\d+)?)\s*$").expect("valid arXiv title regex")
});

const TITLE_META: &[&str] = &["citation_title", "dc.title"];
const AUTHOR_META: &[&str] = &["citation_author", "dc.creator", "author"];
const ID_META: &[&str] = &["citation_arxiv_id", "dc.identifier"];

/// Elements whose text never counts as body content
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "head", "math"];

/// Default [`MarkupScraper`] built on an HTML5 parser
#[derive(Debug, Default, Clone)]
pub struct HtmlScraper;

impl HtmlScraper {
    pub fn new() -> Self {
        Self
    }

    fn meta_values(document: &Html, names: &[&str]) -> Vec<String> {
        let Ok(selector) = Selector::parse("meta[name][content]") else {
            return Vec::new();
        };

        for name in names {
            let values: Vec<String> = document
                .select(&selector)
                .filter(|elem| {
                    elem.value()
                        .attr("name")
                        .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
                })
                .filter_map(|elem| elem.value().attr("content"))
                .map(str::trim)
                .filter(|content| !content.is_empty())
                .map(str::to_string)
                .collect();
            if !values.is_empty() {
                return values;
            }
        }
        Vec::new()
    }

    fn first_text(document: &Html, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        let elem = document.select(&selector).next()?;
        let text = normalize_whitespace(&elem.text().collect::<String>());
        (!text.is_empty()).then_some(text)
    }

    fn extract_title(document: &Html) -> Option<String> {
        Self::meta_values(document, TITLE_META)
            .into_iter()
            .next()
            .or_else(|| Self::first_text(document, "title"))
            .or_else(|| Self::first_text(document, "h1"))
    }

    fn extract_authors(document: &Html) -> Option<String> {
        let authors = Self::meta_values(document, AUTHOR_META);
        (!authors.is_empty()).then(|| authors.join(", "))
    }

    fn extract_body(document: &Html) -> Option<String> {
        let selector = Selector::parse("body").ok()?;
        let root = document
            .select(&selector)
            .next()
            .unwrap_or_else(|| document.root_element());

        let mut raw = String::new();
        collect_text(root, &mut raw);
        let text = normalize_whitespace(&raw);
        (!text.is_empty()).then_some(text)
    }

    /// The document's own identifier: an id meta tag, or a title that
    /// consists of an arXiv id alone. Ids cited in running text belong
    /// to other papers and are never used.
    fn extract_external_id(document: &Html, title: Option<&str>) -> Option<String> {
        if let Some(id) = Self::meta_values(document, ID_META).into_iter().next() {
            return Some(match ARXIV_ID.captures(&id) {
                Some(caps) => caps[1].to_string(),
                None => id,
            });
        }

        title
            .and_then(|t| ARXIV_TITLE.captures(t))
            .map(|caps| caps[1].to_string())
    }
}

impl MarkupScraper for HtmlScraper {
    fn scrape(&self, mut stream: DocStream) -> Result<ScrapedMetadata> {
        let mut bytes = Vec::new();
        stream
            .read_to_end(&mut bytes)
            .map_err(|e| MathdexError::ExtractionFailed(format!("Failed to read markup: {e}")))?;
        let html = String::from_utf8_lossy(&bytes);
        let document = Html::parse_document(&html);

        let title = Self::extract_title(&document);
        let authors = Self::extract_authors(&document);
        let body = Self::extract_body(&document);
        let external_id = Self::extract_external_id(&document, title.as_deref());

        Ok(ScrapedMetadata {
            external_id,
            title,
            authors,
            body,
        })
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_elem) = ElementRef::wrap(child) {
            let name = child_elem.value().name();
            if !SKIPPED_ELEMENTS.iter().any(|s| name.eq_ignore_ascii_case(s)) {
                collect_text(child_elem, out);
            }
        }
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
