//! Harvest coordinator - main run orchestration logic
//!
//! This module contains the run loop that coordinates:
//! - Deriving the starting offset from the rows already stored
//! - Walking listing pages at increasing offsets
//! - Extracting and appending every item in listing order
//! - Stopping when the listing reports its end

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::item::extract_item;
use crate::crawler::listing::{Listing, ListingPage};
use crate::crawler::retry::RetryPolicy;
use crate::output::{CrawlObserver, RunSummary};
use crate::state::{resume_offset, CrawlState};
use crate::storage::{open_store, RecordStore};
use crate::HarvestError;
use std::path::Path;
use std::time::Instant;

/// Main harvest coordinator structure
pub struct Coordinator<F, S> {
    fetcher: F,
    store: S,
    listing: Listing,
    retry: RetryPolicy,
}

impl<F: Fetcher, S: RecordStore> Coordinator<F, S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    /// * `fetcher` - Transport for listing and detail pages
    /// * `store` - Table the records are appended to
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The listing configuration is unusable
    pub fn new(config: &Config, fetcher: F, store: S) -> Result<Self, HarvestError> {
        Ok(Self {
            fetcher,
            store,
            listing: Listing::new(&config.crawler)?,
            retry: RetryPolicy::from_config(&config.retry),
        })
    }

    /// Replaces the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The record store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Listing offset the next run would start from
    pub fn resume_offset(&self) -> Result<usize, HarvestError> {
        let rows = self.store.count_rows()?;
        Ok(resume_offset(rows, self.listing.page_size()))
    }

    /// Runs the harvest until the listing reports its end
    ///
    /// A failure on any listing page or item ends the run; every record
    /// appended before the failure stays in the store.
    pub async fn run(&mut self, observer: &dyn CrawlObserver) -> Result<RunSummary, HarvestError> {
        let started = Instant::now();
        let mut summary = RunSummary::default();
        let mut state = CrawlState::Starting;

        while !state.is_terminal() {
            let next = match &state {
                CrawlState::Starting => {
                    let rows = self.store.count_rows()?;
                    let offset = resume_offset(rows, self.listing.page_size());
                    summary.existing_rows = rows;
                    summary.start_offset = offset;
                    observer.on_run_started(rows, offset);
                    CrawlState::Paging { offset }
                }

                CrawlState::Paging { offset } => {
                    let offset = *offset;
                    match self
                        .listing
                        .collect_links(&self.fetcher, &self.retry, observer, offset)
                        .await?
                    {
                        ListingPage::Links(links) => {
                            summary.pages_processed += 1;
                            observer.on_page(offset, links.len());
                            CrawlState::Extracting { offset, links }
                        }
                        ListingPage::EndOfListing => {
                            summary.end_offset = offset;
                            CrawlState::Finished
                        }
                    }
                }

                CrawlState::Extracting { offset, links } => {
                    let total = links.len();
                    for (index, link) in links.iter().enumerate() {
                        let record = extract_item(&self.fetcher, &self.retry, observer, link)
                            .await
                            .inspect_err(|e| tracing::error!("Item {} failed: {}", link, e))?;
                        self.store.append(&record)?;
                        summary.items_stored += 1;
                        observer.on_item_stored(index + 1, total, link);
                    }
                    observer.on_page_finished(*offset);
                    CrawlState::Paging {
                        offset: offset + self.listing.page_size(),
                    }
                }

                CrawlState::Finished => CrawlState::Finished,
            };

            debug_assert!(state.can_transition_to(&next), "{} -> {}", state, next);
            tracing::debug!("{} -> {}", state, next);
            state = next;
        }

        summary.elapsed = started.elapsed();
        observer.on_finished(&summary);

        Ok(summary)
    }
}

/// Runs a complete harvest against the live site
///
/// This function:
///
/// 1. Initializes the CSV table (resetting it when `reset` is set)
/// 2. Builds the HTTP fetcher
/// 3. Runs the coordinator to completion
///
/// # Example
///
/// ```no_run
/// use anime_harvest::config::Config;
/// use anime_harvest::crawler::run_harvest;
/// use anime_harvest::output::LogObserver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_harvest(&Config::default(), false, &LogObserver).await?;
/// println!("Stored {} records", summary.items_stored);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(
    config: &Config,
    reset: bool,
    observer: &dyn CrawlObserver,
) -> Result<RunSummary, HarvestError> {
    let store = open_store(Path::new(&config.output.data_path), reset)?;
    let fetcher = HttpFetcher::new(&config.http)?;

    let mut coordinator = Coordinator::new(config, fetcher, store)?;
    coordinator.run(observer).await
}
