//! Run reporting traits and types
//!
//! A run reports progress through a [`CrawlObserver`] handed to it by the
//! caller. The observer lives exactly as long as that run.

use std::time::Duration;

/// Totals for one harvesting run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Data rows present before the run started
    pub existing_rows: usize,

    /// First listing offset requested
    pub start_offset: usize,

    /// Offset that reported the end of the listing
    pub end_offset: usize,

    /// Listing pages that returned item links (possibly zero links)
    pub pages_processed: usize,

    /// Records appended by this run
    pub items_stored: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Receives progress events from a harvesting run
///
/// Every method has an empty default so implementations only pick the
/// events they render.
pub trait CrawlObserver {
    /// Called once before the first listing request
    fn on_run_started(&self, _existing_rows: usize, _start_offset: usize) {}

    /// Called when a listing page yielded `links` item links
    fn on_page(&self, _offset: usize, _links: usize) {}

    /// Called after item `position` (1-based) of `total` was appended
    fn on_item_stored(&self, _position: usize, _total: usize, _link: &str) {}

    /// Called after every link of the page at `offset` was processed
    fn on_page_finished(&self, _offset: usize) {}

    /// Called before sleeping ahead of retry number `attempt` for `url`
    fn on_retry(&self, _url: &str, _attempt: u32, _delay: Duration) {}

    /// Called once when the listing reported its end
    fn on_finished(&self, _summary: &RunSummary) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl CrawlObserver for NullObserver {}
