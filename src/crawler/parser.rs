//! HTML parser for extracting links and text
//!
//! This module handles parsing fetched HTML to extract:
//! - Links to follow (from <a> tags and canonical links)
//! - The page title
//! - Plain text for classification and indexing

use crate::url::canonicalize;
use crate::SumiError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text content is never part of the page text
const SKIPPED_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// All followable links, absolute and canonical, in document order
    pub links: Vec<Url>,

    /// Visible text with markup removed and whitespace collapsed
    pub text: String,
}

/// Parses HTML content once and extracts title, links and text
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs and fragment-only links
/// - Anything that does not resolve to http or https
///
/// # Example
///
/// ```no_run
/// use sumi_index::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: collect_links(&document, base_url),
        text: collect_text(&document),
    }
}

/// Extracts every followable link from an HTML page
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    collect_links(&document, base_url)
}

/// Extracts links found inside the element with the given `id`
///
/// Returns an empty list when no such element exists.
pub fn extract_links_in_element(
    html: &str,
    base_url: &Url,
    element_id: &str,
) -> Result<Vec<Url>, SumiError> {
    let escaped = element_id.replace('\\', "\\\\").replace('"', "\\\"");
    let selector = Selector::parse(&format!("[id=\"{}\"] a[href]", escaped)).map_err(|e| {
        SumiError::HtmlParse {
            url: base_url.to_string(),
            message: format!("invalid element id '{}': {:?}", element_id, e),
        }
    })?;

    let document = Html::parse_document(html);
    let mut links: Vec<Url> = Vec::new();
    for element in document.select(&selector) {
        if let Some(url) = link_from_anchor(element, base_url) {
            // nested scopes with the same id would otherwise yield an anchor twice
            if !links.contains(&url) {
                links.push(url);
            }
        }
    }

    Ok(links)
}

/// Converts HTML to plain text
///
/// Script, style and noscript content is dropped; the remaining text nodes
/// are joined with single spaces.
pub fn clean_text(html: &str) -> String {
    let document = Html::parse_document(html);
    collect_text(&document)
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn collect_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        links.extend(
            document
                .select(&a_selector)
                .filter_map(|element| link_from_anchor(element, base_url)),
        );
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                links.push(url);
            }
        }
    }

    links
}

fn link_from_anchor(element: ElementRef<'_>, base_url: &Url) -> Option<Url> {
    if element.value().attr("download").is_some() {
        return None;
    }

    element
        .value()
        .attr("href")
        .and_then(|href| resolve_link(href, base_url))
}

fn collect_text(document: &Html) -> String {
    let mut text = String::new();

    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|e| SKIPPED_TEXT_ELEMENTS.contains(&e.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        for word in fragment.split_whitespace() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(word);
        }
    }

    text
}

/// Resolves a link href to an absolute canonical URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only hrefs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    canonicalize(absolute_url).ok()
}
