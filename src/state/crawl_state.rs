/// Crawl state definitions for one harvesting run
///
/// A run moves `Starting -> Paging -> Extracting -> Paging -> ... -> Finished`.
use std::fmt;

/// Represents the current phase of a harvesting run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlState {
    /// Row count not yet read from the store
    Starting,

    /// About to request the listing page at `offset`
    Paging { offset: usize },

    /// Working through the item links of the listing page at `offset`
    Extracting { offset: usize, links: Vec<String> },

    /// The listing reported its end; nothing left to do
    Finished,
}

impl CrawlState {
    /// Returns true if the run is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: &CrawlState) -> bool {
        match (self, next) {
            (Self::Starting, Self::Paging { .. }) => true,
            (Self::Paging { offset: a }, Self::Extracting { offset: b, .. }) => a == b,
            (Self::Paging { .. }, Self::Finished) => true,
            (Self::Extracting { offset: a, .. }, Self::Paging { offset: b }) => b > a,
            _ => false,
        }
    }

    /// Short lowercase name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Paging { .. } => "paging",
            Self::Extracting { .. } => "extracting",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paging { offset } => write!(f, "paging(offset={})", offset),
            Self::Extracting { offset, links } => {
                write!(f, "extracting(offset={}, links={})", offset, links.len())
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Listing offset a run starts from, given the rows already stored
///
/// Resumption is page-granular: the page covering `existing_rows` is fetched
/// again in full.
pub fn resume_offset(existing_rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    (existing_rows / page_size) * page_size
}
