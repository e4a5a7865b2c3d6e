use serde::Deserialize;

/// Number of child sitemaps fetched at the same time when none is configured
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 5;

/// Main configuration structure for Sitemap Inspector
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub aggregator: AggregatorConfig,
    pub robots: RobotsConfig,
    pub cost: CostConfig,
    pub output: OutputConfig,
}

/// Document fetching limits and identification
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Total request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Ceiling on bytes read from the network or disk, before decompression
    pub max_download_bytes: u64,

    /// Ceiling on bytes produced by gzip decompression
    pub max_decompressed_bytes: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            max_download_bytes: 50 * 1024 * 1024,
            max_decompressed_bytes: 100 * 1024 * 1024,
            user_agent: concat!("sitemap-inspector/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Sitemap-index fan-out settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AggregatorConfig {
    /// Maximum number of child sitemap fetches in flight
    pub max_concurrent_fetches: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}

/// robots.txt cross-check settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RobotsConfig {
    /// Whether robots.txt is fetched and analyzed
    pub enabled: bool,

    /// User agent the allow/disallow rules are evaluated for
    pub user_agent: String,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            user_agent: "*".to_string(),
        }
    }
}

/// Pricing used by the cost calculator
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CostConfig {
    /// Price charged per thousand URLs
    pub price_per_thousand_urls: f64,

    /// Currency code shown next to amounts
    pub currency: String,

    /// Lower bound on any estimate
    pub minimum_charge: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            price_per_thousand_urls: 0.0,
            currency: "USD".to_string(),
            minimum_charge: 0.0,
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Include the URL listing in the report
    pub list_urls: bool,

    /// Maximum number of URLs printed by the listing
    pub max_listed_urls: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            list_urls: false,
            max_listed_urls: 100,
        }
    }
}
