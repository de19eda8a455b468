//! Observer that reports progress through `tracing`

use crate::output::traits::{CrawlObserver, RunSummary};
use std::time::Duration;

/// Logs one line per page and per stored item
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl CrawlObserver for LogObserver {
    fn on_run_started(&self, existing_rows: usize, start_offset: usize) {
        tracing::info!(
            "Table holds {} rows, starting at listing offset {}",
            existing_rows,
            start_offset
        );
    }

    fn on_page(&self, offset: usize, links: usize) {
        tracing::info!("Page {} processing ({} links)...", offset, links);
    }

    fn on_item_stored(&self, position: usize, total: usize, link: &str) {
        tracing::info!("    Link {}/{} processed", position, total);
        tracing::debug!("Stored {}", link);
    }

    fn on_retry(&self, url: &str, attempt: u32, delay: Duration) {
        tracing::debug!("Retry {} for {} in {:?}", attempt, url, delay);
    }

    fn on_finished(&self, summary: &RunSummary) {
        tracing::info!(
            "All pages have been processed: {} pages, {} records stored in {:?}",
            summary.pages_processed,
            summary.items_stored,
            summary.elapsed
        );
    }
}
