use serde::Deserialize;

/// Main configuration structure for Anime-Harvest
///
/// Every section and key is optional; missing values fall back to the
/// behavior of the public MyAnimeList top-anime listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Listing traversal configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pagination base URL; the integer offset is appended verbatim
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Number of items per listing page
    #[serde(rename = "page-size")]
    pub page_size: usize,

    /// CSS selector matching item-link anchors on a listing page
    #[serde(rename = "link-selector")]
    pub link_selector: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://myanimelist.net/topanime.php?limit=".to_string(),
            page_size: 50,
            link_selector: "a.hoverinfo_trigger.fl-l.ml12.mr8".to_string(),
        }
    }
}

/// Retry policy for network operations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries allowed after the first attempt
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(rename = "initial-delay-ms")]
    pub initial_delay_ms: u64,

    /// Multiplier applied to the delay after every retry
    #[serde(rename = "backoff-factor")]
    pub backoff_factor: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 5_000,
            backoff_factor: 2,
        }
    }
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Browser identity strings; one is picked at random for every request
    #[serde(rename = "user-agents")]
    pub user_agents: Vec<String>,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agents: [
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36 Edg/122.0.0.0",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV table
    #[serde(rename = "data-path")]
    pub data_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_path: "data/raw/anime_data.csv".to_string(),
        }
    }
}
