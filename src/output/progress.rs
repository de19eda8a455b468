//! Observer that draws a progress bar per listing page

use crate::output::traits::{CrawlObserver, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;

const BAR_TEMPLATE: &str = "offset {prefix:>6} [{bar:40}] {pos}/{len} {msg}";

/// Renders one indicatif bar for the items of each page
///
/// Run start and completion are still logged through `tracing`.
#[derive(Default)]
pub struct ProgressObserver {
    bar: RefCell<Option<ProgressBar>>,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CrawlObserver for ProgressObserver {
    fn on_run_started(&self, existing_rows: usize, start_offset: usize) {
        tracing::info!(
            "Table holds {} rows, starting at listing offset {}",
            existing_rows,
            start_offset
        );
    }

    fn on_page(&self, offset: usize, links: usize) {
        let bar = ProgressBar::new(links as u64);
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(offset.to_string());
        *self.bar.borrow_mut() = Some(bar);
    }

    fn on_item_stored(&self, _position: usize, _total: usize, _link: &str) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            bar.set_message("");
            bar.inc(1);
        }
    }

    fn on_page_finished(&self, _offset: usize) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish();
        }
    }

    fn on_retry(&self, _url: &str, attempt: u32, delay: Duration) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            bar.set_message(format!("retry {} in {:?}", attempt, delay));
        }
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
