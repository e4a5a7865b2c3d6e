//! Configuration module for Sitemap Inspector
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_inspector::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("inspector.toml")).unwrap();
//! println!("Fan-out limit: {}", config.aggregator.max_concurrent_fetches);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AggregatorConfig, Config, CostConfig, FetcherConfig, OutputConfig, RobotsConfig,
    DEFAULT_MAX_CONCURRENT_FETCHES,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
