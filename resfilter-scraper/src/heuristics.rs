//! Ordered extraction heuristics for detail pages.
//!
//! The fact-check site has no machine-readable schema and its editorial
//! layout drifts over time, so extraction is a fixed-priority chain of
//! independent strategies, from the most specific (an explicit "Source:"
//! label) down to the least (whatever follows the "Analysis" section).
//! The first strategy that yields anything wins the primary host; the
//! "Related Network Sources" block, when present, always contributes its
//! secondary host list on top.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;

const RELATED_MARKER: &str = "Related Network Sources";
const COMMON_TLDS: &[&str] = &[".com", ".net", ".org"];

pub type Heuristic = fn(&Html) -> Vec<String>;

/// Priority order matters: pages can match more than one strategy.
pub const HEURISTICS: &[(&str, Heuristic)] = &[
    ("source-label", source_label),
    ("source-url-row", source_url_row),
    ("related-network-sources", related_primary),
    ("analysis-sibling", analysis_sibling),
];

/// Run the heuristic chain over a parsed detail page, returning every
/// canonical host found (primary first), deduplicated, order preserved.
pub fn extract_hosts(doc: &Html) -> Vec<String> {
    let mut hosts = Vec::new();

    for (name, heuristic) in HEURISTICS {
        let found = heuristic(doc);
        if !found.is_empty() {
            debug!("Heuristic '{}' matched with {} host(s)", name, found.len());
            hosts.extend(found);
            break;
        }
    }

    // Secondaries are recomputed every run; only the primary is cached.
    hosts.extend(related_secondaries(doc));

    let mut seen = HashSet::new();
    hosts.retain(|h| !h.is_empty() && seen.insert(h.clone()));
    hosts
}

/// Normalize a link target or raw domain string into a canonical host:
/// protocol stripped, leading `www.` stripped, anything from the first `/`
/// on dropped. Case is preserved. Idempotent.
pub fn normalize_host(raw: &str) -> String {
    let s = raw.trim();
    let s = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
        .or_else(|| s.strip_prefix("//"))
        .unwrap_or(s);
    let s = s.strip_prefix("www.").unwrap_or(s);
    let s = s.split('/').next().unwrap_or(s);
    s.trim().to_string()
}

/// A paragraph or cell carrying "Source:"/"Sources:"; the anchor owning the
/// label (inside it, or one level up when the label sits in an inline
/// emphasis wrapper) supplies the href. Anchors without a usable target fall
/// back to textual de-obfuscation.
fn source_label(doc: &Html) -> Vec<String> {
    let candidates = Selector::parse("p, td").unwrap();

    for el in doc.select(&candidates) {
        let text = text_of(el);
        if !(text.contains("Source:") || text.contains("Sources:")) {
            continue;
        }
        // "Related Network Sources:" also contains "Sources:".
        if text.contains(RELATED_MARKER) {
            continue;
        }

        let anchor_href = first_href(el).or_else(|| parent_href(el));
        if let Some(href) = anchor_href {
            return vec![normalize_host(href)];
        }
        if let Some(host) = deobfuscate(&text) {
            return vec![host];
        }
    }

    Vec::new()
}

/// The tabular layout variant: the cell after the row labelled
/// "Source URL:" holds the host.
fn source_url_row(doc: &Html) -> Vec<String> {
    let cells = Selector::parse("td, th").unwrap();

    for el in doc.select(&cells) {
        if !text_of(el).contains("Source URL") {
            continue;
        }
        if let Some(next) = next_element(el) {
            let value = match first_href(next) {
                Some(href) => href.to_string(),
                None => text_of(next),
            };
            let host = normalize_host(&value);
            if !host.is_empty() {
                return vec![host];
            }
        }
    }

    Vec::new()
}

/// The "Related Network Sources:" block's own anchor, as a primary
/// candidate when the explicit "Source" labels are absent.
fn related_primary(doc: &Html) -> Vec<String> {
    for el in marker_elements(doc, RELATED_MARKER) {
        if let Some(href) = first_href(el) {
            return vec![normalize_host(href)];
        }
    }
    Vec::new()
}

/// The sibling block after "Related Network Sources:", split into lines,
/// one host per line.
fn related_secondaries(doc: &Html) -> Vec<String> {
    for el in marker_elements(doc, RELATED_MARKER) {
        if let Some(next) = next_element(el) {
            return text_of(next)
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && line.contains('.'))
                .map(normalize_host)
                .collect();
        }
    }
    Vec::new()
}

/// Last resort: the element following a heading/paragraph containing
/// "Analysis". An absent anchor here contributes nothing, never a failure.
fn analysis_sibling(doc: &Html) -> Vec<String> {
    let headings = Selector::parse("h1, h2, h3, h4, p").unwrap();

    for el in doc.select(&headings) {
        if !text_of(el).contains("Analysis") {
            continue;
        }
        if let Some(next) = next_element(el)
            && let Some(href) = first_href(next)
        {
            return vec![normalize_host(href)];
        }
    }

    Vec::new()
}

/// De-obfuscate a host spelled out in prose, e.g. "example (dot) com" or
/// "example dot com"; failing that, grab the token after the first
/// non-breaking space when the text plainly mentions a common TLD.
pub fn deobfuscate(text: &str) -> Option<String> {
    for marker in ["(dot)", " dot "] {
        if text.contains(marker) {
            let tail = text.split_once(':').map(|(_, t)| t).unwrap_or(text);
            let host: String = tail
                .replace("(dot)", ".")
                .replace(" dot ", ".")
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if !host.is_empty() {
                return Some(normalize_host(&host));
            }
        }
    }

    if COMMON_TLDS.iter().any(|tld| text.contains(tld))
        && let Some((_, after)) = text.split_once('\u{a0}')
    {
        let token = after.split_whitespace().next()?;
        return Some(normalize_host(token));
    }

    None
}

fn marker_elements<'a>(doc: &'a Html, marker: &str) -> Vec<ElementRef<'a>> {
    let blocks = Selector::parse("p, td, h3, h4").unwrap();
    doc.select(&blocks)
        .filter(|el| text_of(*el).contains(marker))
        .collect()
}

fn text_of(el: ElementRef) -> String {
    el.text().collect()
}

fn first_href<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    let anchors = Selector::parse("a[href]").unwrap();
    el.select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
}

fn parent_href<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.parent().and_then(ElementRef::wrap).and_then(first_href)
}

fn next_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(html: &str) -> Vec<String> {
        extract_hosts(&Html::parse_document(html))
    }

    #[test]
    fn test_normalize_strips_protocol_www_and_path() {
        assert_eq!(normalize_host("https://www.Example.com/path"), "Example.com");
        assert_eq!(normalize_host("http://news.example.net/"), "news.example.net");
        assert_eq!(normalize_host("//cdn.example.org/x"), "cdn.example.org");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_host("https://www.Example.com/path");
        assert_eq!(normalize_host(&once), once);
        assert_eq!(normalize_host("example.com"), "example.com");
    }

    #[test]
    fn test_source_label_anchor() {
        let html = r#"<html><body>
            <p>Source: <a href="https://RealNews.org/home">RealNews.org</a></p>
        </body></html>"#;
        assert_eq!(hosts(html), vec!["RealNews.org"]);
    }

    #[test]
    fn test_source_label_wrapped_in_emphasis() {
        let html = r#"<html><body>
            <p><strong>Sources:</strong> <a href="http://www.daily-herald.com/about">Daily Herald</a></p>
        </body></html>"#;
        assert_eq!(hosts(html), vec!["daily-herald.com"]);
    }

    #[test]
    fn test_source_label_beats_analysis_fallback() {
        let html = r#"<html><body>
            <p>Source: <a href="https://primary.com/">primary</a></p>
            <h2>Detailed Analysis</h2>
            <p><a href="https://wrong.net/">wrong</a></p>
        </body></html>"#;
        assert_eq!(hosts(html), vec!["primary.com"]);
    }

    #[test]
    fn test_source_url_row_variant() {
        let html = r#"<html><body><table>
            <tr><td>Source URL:</td><td><a href="https://www.tabular.net/x">tabular.net</a></td></tr>
        </table></body></html>"#;
        assert_eq!(hosts(html), vec!["tabular.net"]);
    }

    #[test]
    fn test_source_url_row_bare_text_cell() {
        let html = r#"<html><body><table>
            <tr><td>Source URL:</td><td>plaintext.org</td></tr>
        </table></body></html>"#;
        assert_eq!(hosts(html), vec!["plaintext.org"]);
    }

    #[test]
    fn test_analysis_fallback() {
        let html = r#"<html><body>
            <h2>Analysis / Bias</h2>
            <p>In review, <a href="http://www.AltSite.net/">AltSite</a> reports...</p>
        </body></html>"#;
        assert_eq!(hosts(html), vec!["AltSite.net"]);
    }

    #[test]
    fn test_analysis_sibling_without_anchor_yields_nothing() {
        let html = r#"<html><body>
            <h2>Analysis</h2>
            <p>No outbound link in this paragraph.</p>
        </body></html>"#;
        assert!(hosts(html).is_empty());
    }

    #[test]
    fn test_deobfuscation_dot_markers() {
        let html = r#"<html><body>
            <p>Source: shady (dot) com</p>
        </body></html>"#;
        assert_eq!(hosts(html), vec!["shady.com"]);

        let html = r#"<html><body>
            <p>Source: shady dot net</p>
        </body></html>"#;
        assert_eq!(hosts(html), vec!["shady.net"]);
    }

    #[test]
    fn test_deobfuscation_nbsp_token() {
        // Label with a no-href anchor; host follows a non-breaking space.
        let html = "<html><body>\
            <p>Source: <a name=\"x\">link</a>\u{a0}nbspsite.org and more</p>\
        </body></html>";
        assert_eq!(hosts(html), vec!["nbspsite.org"]);
    }

    #[test]
    fn test_related_network_sources_primary_and_secondaries() {
        let html = "<html><body>\
            <p>Related Network Sources: <a href=\"https://www.network-hub.com/\">hub</a></p>\
            <p>alpha-news.com\nbeta-news.net\ngamma-news.org</p>\
        </body></html>";
        assert_eq!(
            hosts(html),
            vec![
                "network-hub.com",
                "alpha-news.com",
                "beta-news.net",
                "gamma-news.org"
            ]
        );
    }

    #[test]
    fn test_related_secondaries_appended_after_source_label() {
        let html = "<html><body>\
            <p>Source: <a href=\"https://primary.com/\">primary</a></p>\
            <p>Related Network Sources: <a href=\"https://primary.com/\">hub</a></p>\
            <p>sister-site.net\nprimary.com</p>\
        </body></html>";
        // Primary wins the first slot; duplicates collapse.
        assert_eq!(hosts(html), vec!["primary.com", "sister-site.net"]);
    }

    #[test]
    fn test_no_markers_yields_nothing() {
        let html = r#"<html><body><p>Nothing of interest here.</p></body></html>"#;
        assert!(hosts(html).is_empty());
    }
}
