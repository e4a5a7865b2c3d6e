//! Robots.txt handling module
//!
//! This module fetches the robots.txt that governs a sitemap's origin,
//! parses its directives and surfaces heuristic warnings. It consumes
//! nothing from the sitemap analysis and only produces display data.

mod checks;
mod parser;

pub use checks::{analyze, RobotsReport, RobotsStatus};
pub use parser::{PathRule, RobotsFile, RobotsGroup, RuleKind};

use crate::url::{extract_domain, robots_url};
use crate::InspectorError;
use reqwest::{Client, StatusCode};
use url::Url;

/// Fetches robots.txt for the origin serving a sitemap and checks it
///
/// # Arguments
///
/// * `client` - HTTP client to use
/// * `sitemap_url` - The sitemap being inspected
/// * `user_agent` - Agent the allow checks are made for
///
/// # Returns
///
/// * `Ok(RobotsReport)` - Parsed robots.txt with findings, or a
///   "not found" report when the server answers 404
/// * `Err(InspectorError::Robots)` - The file could not be retrieved
pub async fn fetch_robots(
    client: &Client,
    sitemap_url: &Url,
    user_agent: &str,
) -> Result<RobotsReport, InspectorError> {
    let location = robots_url(sitemap_url).ok_or_else(|| InspectorError::Robots {
        url: sitemap_url.to_string(),
        message: "URL has no host".to_string(),
    })?;

    tracing::info!(
        "Checking robots.txt for {}",
        extract_domain(sitemap_url).unwrap_or_default()
    );
    tracing::debug!("Fetching {}", location);

    let robots_error = |message: String| InspectorError::Robots {
        url: location.to_string(),
        message,
    };

    let response = client
        .get(location.clone())
        .send()
        .await
        .map_err(|e| robots_error(e.to_string()))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        tracing::info!("No robots.txt at {}", location);
        return Ok(RobotsReport::not_found(location.as_str()));
    }
    if !status.is_success() {
        return Err(robots_error(format!("HTTP status {}", status.as_u16())));
    }

    let content = response
        .text()
        .await
        .map_err(|e| robots_error(e.to_string()))?;

    let report = analyze(location.as_str(), &content, sitemap_url, user_agent);
    tracing::info!(
        "robots.txt: {} group(s), {} finding(s)",
        report.file.as_ref().map(|f| f.groups.len()).unwrap_or(0),
        report.findings.len()
    );

    Ok(report)
}
