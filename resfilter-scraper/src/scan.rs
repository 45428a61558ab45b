use crate::error::{Result, ScrapeError};
use crate::resolve::HostCache;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// The one structural contract the category pages are relied upon to keep.
pub const TABLE_MARKER: &str = "mbfc-table";

/// TLDs appended to a listing slug to guess hostnames the user has
/// probably already registered.
pub const CANDIDATE_TLDS: &[&str] = &[".com", ".net", ".org"];

/// Extract the listing URLs from one category page that still need
/// resolving: rows whose slug-derived candidate hostnames are not already
/// filtered and whose listing URL is not already in the site map.
///
/// Rows without a parsable link are silently skipped. A missing listing
/// table means the page is not what we assumed and the whole category
/// scan fails.
pub fn scan_category(
    html: &str,
    category_url: &str,
    already_filtered: &HashSet<String>,
    cache: &dyn HostCache,
) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);

    let table_selector = Selector::parse(&format!("table#{}", TABLE_MARKER)).unwrap();
    let Some(table) = doc.select(&table_selector).next() else {
        return Err(ScrapeError::Structure(format!(
            "no #{} table on {}",
            TABLE_MARKER, category_url
        )));
    };

    let row_selector = Selector::parse("tr").unwrap();
    let link_selector = Selector::parse("a[href]").unwrap();
    let mut listings = Vec::new();

    for row in table.select(&row_selector) {
        let Some(href) = row
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        let Some(listing_url) = absolutize(category_url, href) else {
            continue;
        };
        let Some(slug) = listing_slug(&listing_url) else {
            continue;
        };

        let registered = CANDIDATE_TLDS
            .iter()
            .any(|tld| already_filtered.contains(&format!("{}{}", slug, tld)));
        if registered {
            debug!("Skipping {}: a candidate host is already filtered", slug);
            continue;
        }
        if cache.lookup(&listing_url).is_some() {
            debug!("Skipping {}: already resolved in a previous run", listing_url);
            continue;
        }

        listings.push(listing_url);
    }

    Ok(listings)
}

/// The site slug is the last non-empty path segment of a listing URL
/// (second-to-last raw segment, given the site's trailing slashes).
pub fn listing_slug(listing_url: &str) -> Option<String> {
    let url = Url::parse(listing_url).ok()?;
    let segments: Vec<&str> = url.path_segments()?.collect();
    segments
        .iter()
        .rev()
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn absolutize(base: &str, href: &str) -> Option<String> {
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
    {
        return None;
    }

    let base_url = Url::parse(base).ok()?;
    let mut resolved = base_url.join(href).ok()?;
    resolved.set_fragment(None);
    Some(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CATEGORY_URL: &str = "https://mediabiasfactcheck.com/left/";

    fn category_page(rows: &str) -> String {
        format!(
            r#"<html><body><table id="{}"><tbody>{}</tbody></table></body></html>"#,
            TABLE_MARKER, rows
        )
    }

    #[test]
    fn test_already_filtered_candidate_host_is_skipped() {
        let html = category_page(
            r#"<tr><td><a href="https://mediabiasfactcheck.com/alpha/">Alpha</a></td></tr>
               <tr><td><a href="https://mediabiasfactcheck.com/beta/">Beta</a></td></tr>"#,
        );
        let filtered: HashSet<String> = ["alpha.com".to_string()].into();
        let cache = HashMap::new();

        let listings = scan_category(&html, CATEGORY_URL, &filtered, &cache).unwrap();
        assert_eq!(listings, vec!["https://mediabiasfactcheck.com/beta/"]);
    }

    #[test]
    fn test_cached_listing_is_skipped() {
        let html = category_page(
            r#"<tr><td><a href="https://mediabiasfactcheck.com/alpha/">Alpha</a></td></tr>
               <tr><td><a href="https://mediabiasfactcheck.com/beta/">Beta</a></td></tr>"#,
        );
        let mut cache = HashMap::new();
        cache.insert(
            "https://mediabiasfactcheck.com/alpha/".to_string(),
            "alpha-news.com".to_string(),
        );

        let listings = scan_category(&html, CATEGORY_URL, &HashSet::new(), &cache).unwrap();
        assert_eq!(listings, vec!["https://mediabiasfactcheck.com/beta/"]);
    }

    #[test]
    fn test_rows_without_links_are_silently_skipped() {
        let html = category_page(
            r#"<tr><th>Name</th></tr>
               <tr><td>no link at all</td></tr>
               <tr><td><a href="/gamma/">Gamma</a></td></tr>"#,
        );
        let cache = HashMap::new();

        let listings = scan_category(&html, CATEGORY_URL, &HashSet::new(), &cache).unwrap();
        // Relative hrefs resolve against the category page.
        assert_eq!(listings, vec!["https://mediabiasfactcheck.com/gamma/"]);
    }

    #[test]
    fn test_missing_table_is_a_structure_error() {
        let html = "<html><body><p>Nothing tabular here.</p></body></html>";
        let cache = HashMap::new();

        let err = scan_category(html, CATEGORY_URL, &HashSet::new(), &cache).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }

    #[test]
    fn test_listing_slug_handles_trailing_slash() {
        assert_eq!(
            listing_slug("https://mediabiasfactcheck.com/some-outlet/"),
            Some("some-outlet".to_string())
        );
        assert_eq!(
            listing_slug("https://mediabiasfactcheck.com/some-outlet"),
            Some("some-outlet".to_string())
        );
        assert_eq!(listing_slug("https://mediabiasfactcheck.com/"), None);
    }
}
