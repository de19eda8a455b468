//! Listing page traversal
//!
//! A listing page is requested by appending an integer offset to the
//! pagination base URL. The site answers 404 once the offset runs past the
//! end of the catalog, which is the only end-of-listing signal.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::retry::RetryPolicy;
use crate::output::CrawlObserver;
use crate::{ConfigError, HarvestError};
use scraper::{Html, Selector};
use url::Url;

/// Outcome of requesting one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingPage {
    /// Item links in document order; may be empty
    Links(Vec<String>),
    /// The page does not exist
    EndOfListing,
}

/// Paginated listing of item links
#[derive(Debug, Clone)]
pub struct Listing {
    base_url: String,
    page_size: usize,
    link_selector: Selector,
}

impl Listing {
    /// Creates a listing from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        let link_selector = Selector::parse(&config.link_selector).map_err(|e| {
            ConfigError::Validation(format!(
                "invalid link selector '{}': {:?}",
                config.link_selector, e
            ))
        })?;

        Ok(Self {
            base_url: config.listing_url.clone(),
            page_size: config.page_size,
            link_selector,
        })
    }

    /// Items per listing page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// URL of the listing page at `offset`
    pub fn page_url(&self, offset: usize) -> String {
        format!("{}{}", self.base_url, offset)
    }

    /// Fetches the listing page at `offset` and collects its item links
    ///
    /// # Returns
    ///
    /// * `Ok(ListingPage::Links)` - The page exists (possibly without items)
    /// * `Ok(ListingPage::EndOfListing)` - The page answered 404
    /// * `Err(HarvestError)` - Any other failure, after retries
    pub async fn collect_links<F: Fetcher>(
        &self,
        fetcher: &F,
        retry: &RetryPolicy,
        observer: &dyn CrawlObserver,
        offset: usize,
    ) -> Result<ListingPage, HarvestError> {
        let url = self.page_url(offset);
        let page_url = url.as_str();

        match retry
            .run(page_url, observer, move || fetcher.fetch(page_url))
            .await
        {
            Ok(page) => {
                let base = Url::parse(page_url)?;
                let links = self.parse_links(&page.body, &base);
                tracing::debug!("Listing offset {} has {} links", offset, links.len());
                Ok(ListingPage::Links(links))
            }
            Err(FetchError::NotFound { .. }) => {
                tracing::info!("Listing offset {} not found, end of listing", offset);
                Ok(ListingPage::EndOfListing)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Extracts every item link from a listing page, in document order
    pub fn parse_links(&self, html: &str, base_url: &Url) -> Vec<String> {
        let document = Html::parse_document(html);

        document
            .select(&self.link_selector)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| resolve_link(href, base_url))
            .collect()
    }
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None for empty hrefs, fragment-only links, and anything that does
/// not resolve to http or https.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        Listing::new(&CrawlerConfig::default()).unwrap()
    }

    fn base_url() -> Url {
        Url::parse("https://myanimelist.net/topanime.php?limit=0").unwrap()
    }

    #[test]
    fn test_page_url_appends_offset() {
        assert_eq!(
            listing().page_url(150),
            "https://myanimelist.net/topanime.php?limit=150"
        );
    }

    #[test]
    fn test_parse_links_in_document_order() {
        let html = r#"
            <html><body><table>
            <tr><td><a class="hoverinfo_trigger fl-l ml12 mr8" href="https://myanimelist.net/anime/5114/Fullmetal_Alchemist__Brotherhood">x</a></td></tr>
            <tr><td><a class="hoverinfo_trigger" href="https://myanimelist.net/anime/0/ignored">x</a></td></tr>
            <tr><td><a class="hoverinfo_trigger fl-l ml12 mr8" href="/anime/9253/Steins_Gate">x</a></td></tr>
            <tr><td><a class="hoverinfo_trigger fl-l ml12 mr8" href="https://myanimelist.net/anime/28977/Gintama°">x</a></td></tr>
            </table></body></html>
        "#;

        let links = listing().parse_links(html, &base_url());
        assert_eq!(links.len(), 3);
        assert_eq!(
            links[0],
            "https://myanimelist.net/anime/5114/Fullmetal_Alchemist__Brotherhood"
        );
        assert_eq!(links[1], "https://myanimelist.net/anime/9253/Steins_Gate");
        assert!(links[2].starts_with("https://myanimelist.net/anime/28977/"));
    }

    #[test]
    fn test_parse_links_empty_page() {
        let html = "<html><body><p>No results</p></body></html>";
        assert!(listing().parse_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_resolve_link_filters() {
        let base = base_url();
        assert_eq!(resolve_link("", &base), None);
        assert_eq!(resolve_link("#top", &base), None);
        assert_eq!(resolve_link("javascript:void(0)", &base), None);
        assert_eq!(resolve_link("mailto:a@example.com", &base), None);
        assert_eq!(
            resolve_link(" /anime/1 ", &base),
            Some("https://myanimelist.net/anime/1".to_string())
        );
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let config = CrawlerConfig {
            link_selector: "a[[".to_string(),
            ..CrawlerConfig::default()
        };
        assert!(Listing::new(&config).is_err());
    }
}
