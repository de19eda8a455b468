//! Output module for reporting run progress
//!
//! This module handles:
//! - The observer interface a run reports through
//! - Log-based and progress-bar renderings of that interface
//! - The per-run summary

mod log_observer;
mod progress;
mod traits;

pub use log_observer::LogObserver;
pub use progress::ProgressObserver;
pub use traits::{CrawlObserver, NullObserver, RunSummary};
