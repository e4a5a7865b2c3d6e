//! Heuristic robots.txt checks against an inspected sitemap

use crate::fetcher::{Diagnostic, Severity};
use crate::robots::RobotsFile;
use url::Url;

/// Lowercase fragments that betray an HTML page or a bot challenge
/// served in place of a plain-text robots.txt
const BLOCK_PAGE_SIGNATURES: &[&str] = &[
    "<html",
    "<!doctype html",
    "cloudflare",
    "attention required",
    "access denied",
    "captcha",
    "just a moment",
];

/// What was found at the robots.txt location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotsStatus {
    /// A robots.txt was served and parsed
    Found,
    /// The server answered 404
    NotFound,
    /// The file could not be retrieved
    Unavailable,
}

/// Findings from cross-checking robots.txt with a sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct RobotsReport {
    pub robots_url: String,
    pub status: RobotsStatus,
    pub file: Option<RobotsFile>,

    /// Whether the configured agent may fetch the sitemap itself
    pub sitemap_allowed: Option<bool>,

    pub crawl_delay: Option<f64>,
    pub findings: Vec<Diagnostic>,
}

impl RobotsReport {
    /// Report for a site without robots.txt
    pub fn not_found(robots_url: impl Into<String>) -> Self {
        Self {
            robots_url: robots_url.into(),
            status: RobotsStatus::NotFound,
            file: None,
            sitemap_allowed: None,
            crawl_delay: None,
            findings: vec![Diagnostic::info("no robots.txt found (404); everything is allowed")],
        }
    }

    /// Report for a robots.txt that could not be fetched
    pub fn unavailable(robots_url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            robots_url: robots_url.into(),
            status: RobotsStatus::Unavailable,
            file: None,
            sitemap_allowed: None,
            crawl_delay: None,
            findings: vec![Diagnostic::warning(format!(
                "robots.txt check skipped: {}",
                message.into()
            ))],
        }
    }

    /// Number of findings at warning level or above
    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|d| d.severity >= Severity::Warning)
            .count()
    }
}

/// Parses robots.txt content and checks it against the inspected sitemap
///
/// # Arguments
///
/// * `robots_url` - Where the content was fetched from
/// * `content` - Raw robots.txt body
/// * `sitemap_url` - The sitemap being inspected
/// * `user_agent` - Agent the allow checks are made for
///
/// # Returns
///
/// A report with heuristic findings, most serious first
pub fn analyze(robots_url: &str, content: &str, sitemap_url: &Url, user_agent: &str) -> RobotsReport {
    let file = RobotsFile::parse(content);
    let mut findings = Vec::new();

    let lowered = content.to_lowercase();
    if let Some(signature) = BLOCK_PAGE_SIGNATURES.iter().find(|s| lowered.contains(*s)) {
        findings.push(Diagnostic::warning(format!(
            "robots.txt looks like an HTML or bot-challenge page (matched '{}'); a firewall may be blocking crawlers",
            signature
        )));
    }

    if file.wildcard_group().map(|g| g.blocks_everything()).unwrap_or(false) {
        findings.push(Diagnostic::error(
            "robots.txt blocks the entire site for all user agents (User-agent: * / Disallow: /)",
        ));
    }

    let sitemap_allowed = file.is_allowed(sitemap_url.as_str(), user_agent);
    if !sitemap_allowed {
        findings.push(Diagnostic::warning(format!(
            "sitemap path {} is disallowed for user agent '{}'",
            sitemap_url.path(),
            user_agent
        )));
    }

    if file.sitemaps.is_empty() {
        findings.push(Diagnostic::warning("robots.txt declares no Sitemap: directive"));
    } else if !file.declares_sitemap(sitemap_url.as_str()) {
        findings.push(Diagnostic::warning(format!(
            "sitemap is not declared in robots.txt ({} other Sitemap: line(s) found)",
            file.sitemaps.len()
        )));
    }

    if file.groups.is_empty() && !content.trim().is_empty() {
        findings.push(Diagnostic::warning("robots.txt contains no User-agent group"));
    }

    let crawl_delay = file.crawl_delay(user_agent);
    if let Some(delay) = crawl_delay {
        findings.push(Diagnostic::info(format!("crawl delay of {}s requested", delay)));
    }

    findings.sort_by(|a, b| b.severity.cmp(&a.severity));

    RobotsReport {
        robots_url: robots_url.to_string(),
        status: RobotsStatus::Found,
        file: Some(file),
        sitemap_allowed: Some(sitemap_allowed),
        crawl_delay,
        findings,
    }
}
