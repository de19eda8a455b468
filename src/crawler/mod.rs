//! Crawler module for listing traversal and item harvesting
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with failure classification
//! - Retry with exponential backoff for transient failures
//! - Listing pagination and item-link discovery
//! - Detail page extraction
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod item;
mod listing;
mod retry;

pub use coordinator::{run_harvest, Coordinator};
pub use fetcher::{build_http_client, classify_status, FetchError, Fetcher, HttpFetcher, Page};
pub use item::extract_item;
pub use listing::{Listing, ListingPage};
pub use retry::RetryPolicy;
