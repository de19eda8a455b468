//! Detail page extraction

use crate::crawler::fetcher::Fetcher;
use crate::crawler::retry::RetryPolicy;
use crate::extract::parse_record;
use crate::output::CrawlObserver;
use crate::record::AnimeRecord;
use crate::HarvestError;

/// Fetches one detail page and assembles its record
///
/// Any fetch failure that survives the retry policy, and a page without a
/// title heading, are fatal for the item. Every other field degrades to the
/// sentinel on its own.
pub async fn extract_item<F: Fetcher>(
    fetcher: &F,
    retry: &RetryPolicy,
    observer: &dyn CrawlObserver,
    link: &str,
) -> Result<AnimeRecord, HarvestError> {
    let page = retry.run(link, observer, move || fetcher.fetch(link)).await?;

    parse_record(&page.body).ok_or_else(|| HarvestError::MissingTitle {
        url: link.to_string(),
    })
}
