//! State module for tracking crawl progress
//!
//! Crawl progress is never persisted on its own: the starting point of every
//! run is derived from the number of rows already in the record table.
//!
//! # Components
//!
//! - `CrawlState`: The phases of one harvesting run
//! - `resume_offset`: The listing offset a run starts from

mod crawl_state;

// Re-export main types
pub use crawl_state::{resume_offset, CrawlState};
