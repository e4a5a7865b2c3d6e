//! Markdown report generation
//!
//! This module renders the same report as the terminal output, as a
//! markdown document with tables for the statistics.

use crate::inspector::{FetchOutcome, Inspection};
use crate::output::traits::{OutputResult, Report, ReportRenderer};
use crate::output::{child_title, status_label, weekday_name};
use crate::sitemap::ExtensionTags;
use crate::stats::{DateSummary, WEEKDAYS};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Renders a report as markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> String {
        format_markdown_report(report)
    }
}

/// Writes a markdown report to a file
///
/// # Arguments
///
/// * `report` - The report to render
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn write_markdown_report(report: &Report, output_path: &Path) -> OutputResult<()> {
    let markdown = MarkdownRenderer.render(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Markdown report written to {}", output_path.display());
    Ok(())
}

/// Formats a report as markdown
pub fn format_markdown_report(report: &Report) -> String {
    let mut md = String::new();
    let inspection = &report.inspection;

    // Title
    md.push_str("# Sitemap Report\n\n");

    md.push_str(&format!("- **Target**: {}\n", inspection.url()));
    match inspection {
        Inspection::Leaf { .. } => md.push_str("- **Type**: Sitemap\n"),
        Inspection::Index { entries, .. } => md.push_str(&format!(
            "- **Type**: Sitemap index ({} child sitemaps)\n",
            entries.len()
        )),
    }
    md.push_str(&format!(
        "- **Generated**: {}\n\n",
        report.generated_at.to_rfc3339()
    ));

    // Overall statistics
    md.push_str("## Overview\n\n");
    md.push_str(&format!("- **Total URLs**: {}\n", inspection.url_count()));
    push_overview(&mut md, &report.summary);
    if let Inspection::Index { aggregate, .. } = inspection {
        md.push_str(&format!(
            "- **Child sitemaps**: {} succeeded, {} failed\n",
            aggregate.succeeded, aggregate.failed
        ));
    }
    md.push('\n');

    push_recency(&mut md, &report.summary, "##");
    push_distribution(&mut md, &report.summary);

    if let Inspection::Leaf { result, .. } = inspection {
        md.push_str("## Extension Tags\n\n");
        push_tags(&mut md, &result.extension_tags);
        md.push('\n');
    }

    if !inspection.diagnostics().is_empty() {
        md.push_str("## Diagnostics\n\n");
        for diagnostic in inspection.diagnostics() {
            md.push_str(&format!("- **{}**: {}\n", diagnostic.severity, diagnostic.message));
        }
        md.push('\n');
    }

    // Per-child sections, in completion order
    if let Inspection::Index { outcomes, .. } = inspection {
        md.push_str("## Per-Sitemap Results\n\n");
        for outcome in outcomes {
            push_child(&mut md, report, outcome);
        }
    }

    if let Some(robots) = &report.robots {
        md.push_str("## Robots.txt\n\n");
        md.push_str(&format!("- **Location**: {}\n", robots.robots_url));
        md.push_str(&format!("- **Status**: {}\n", status_label(robots.status)));
        if let Some(allowed) = robots.sitemap_allowed {
            md.push_str(&format!(
                "- **Sitemap allowed**: {}\n",
                if allowed { "yes" } else { "no" }
            ));
        }
        if let Some(delay) = robots.crawl_delay {
            md.push_str(&format!("- **Crawl delay**: {}s\n", delay));
        }
        if !robots.findings.is_empty() {
            md.push_str("\n| Severity | Finding |\n");
            md.push_str("|----------|---------|\n");
            for finding in &robots.findings {
                md.push_str(&format!("| {} | {} |\n", finding.severity, finding.message));
            }
        }
        md.push('\n');
    }

    let cost = &report.cost;
    if cost.is_priced() {
        md.push_str("## Cost Estimate\n\n");
        md.push_str("| URLs | Price per 1000 | Subtotal | Total |\n");
        md.push_str("|------|----------------|----------|-------|\n");
        md.push_str(&format!(
            "| {} | {} | {} | {}{} |\n\n",
            cost.url_count,
            cost.format_amount(cost.price_per_thousand),
            cost.format_amount(cost.subtotal),
            cost.format_amount(cost.total),
            if cost.minimum_applied { " (minimum)" } else { "" }
        ));
    }

    if report.list_urls {
        let urls = inspection.sorted_urls();
        md.push_str("## URLs\n\n");
        for url in urls.iter().take(report.max_listed_urls) {
            md.push_str(&format!("- {}\n", url));
        }
        if urls.len() > report.max_listed_urls {
            md.push_str(&format!(
                "\n... and {} more\n",
                urls.len() - report.max_listed_urls
            ));
        }
        md.push('\n');
    }

    md
}

fn push_overview(md: &mut String, summary: &DateSummary) {
    md.push_str(&format!(
        "- **URLs with a modification date**: {}\n",
        summary.date_count()
    ));
    if let (Some(earliest), Some(latest)) = (summary.earliest, summary.latest) {
        md.push_str(&format!("- **Earliest modification**: {}\n", earliest.to_rfc3339()));
        md.push_str(&format!("- **Latest modification**: {}\n", latest.to_rfc3339()));
    }
}

fn push_recency(md: &mut String, summary: &DateSummary, level: &str) {
    if summary.date_count() == 0 {
        return;
    }
    md.push_str(&format!("{} Recency\n\n", level));
    md.push_str("| Window | URLs |\n");
    md.push_str("|--------|------|\n");
    for (window, count) in summary.buckets.iter() {
        md.push_str(&format!("| {} | {} |\n", window.label(), count));
    }
    md.push('\n');
}

fn push_distribution(md: &mut String, summary: &DateSummary) {
    if !summary.show_distribution() {
        return;
    }

    md.push_str("## Modification Distribution (UTC, % of dated URLs)\n\n");
    md.push_str("| Day |");
    for hour in 0..24 {
        md.push_str(&format!(" {:02}h |", hour));
    }
    md.push('\n');
    md.push_str("|-----|");
    for _ in 0..24 {
        md.push_str("-----|");
    }
    md.push('\n');

    let distribution = &summary.distribution;
    for weekday in WEEKDAYS {
        md.push_str(&format!("| {} |", weekday_name(weekday)));
        for hour in 0..24 {
            let value = distribution.cell(weekday, hour);
            if value == 0.0 {
                md.push_str(" |");
            } else {
                md.push_str(&format!(" {:.1} |", value));
            }
        }
        md.push('\n');
    }

    if let Some((weekday, hour, share)) = distribution.peak() {
        md.push_str(&format!(
            "\nPeak: **{} {:02}:00 UTC** ({:.1}%)\n",
            weekday_name(weekday),
            hour,
            share
        ));
    }
    md.push('\n');
}

fn push_tags(md: &mut String, tags: &ExtensionTags) {
    if tags.is_empty() {
        md.push_str("No extension tags detected.\n");
        return;
    }
    for (category, names) in tags.iter() {
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        md.push_str(&format!("- **{}**: {}\n", category, names.join(", ")));
    }
}

fn push_child(md: &mut String, report: &Report, outcome: &FetchOutcome) {
    md.push_str(&format!("### {}\n\n", child_title(outcome)));
    match outcome {
        FetchOutcome::Success { leaf_result, .. } => {
            if let Some(summary) = report.child_summary(outcome) {
                push_overview(md, &summary);
                md.push('\n');
                push_recency(md, &summary, "####");
            }
            push_tags(md, &leaf_result.extension_tags);
        }
        FetchOutcome::Failure { error_message, .. } => {
            md.push_str(&format!("**Error**: {}\n", error_message));
        }
    }
    for diagnostic in outcome.diagnostics() {
        md.push_str(&format!("- _{}_: {}\n", diagnostic.severity, diagnostic.message));
    }
    md.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::inspector::AggregateResult;
    use crate::robots::analyze;
    use crate::sitemap::LeafSitemapResult;
    use chrono::{TimeZone, Utc};
    use url::Url;

    fn create_test_report() -> Report {
        let mut leaf = LeafSitemapResult::default();
        leaf.urls.insert("https://example.com/a".to_string());
        leaf.urls.insert("https://example.com/b".to_string());
        leaf.modification_dates.push(
            chrono::DateTime::parse_from_rfc3339("2024-01-17T14:00:00+00:00").unwrap(),
        );
        leaf.has_time_of_day = true;

        let outcomes = vec![
            FetchOutcome::Success {
                url: "https://example.com/s1.xml".to_string(),
                leaf_result: leaf,
                diagnostics: vec![],
            },
            FetchOutcome::Failure {
                url: "https://example.com/s2.xml".to_string(),
                error_message: "Request timeout for https://example.com/s2.xml".to_string(),
                diagnostics: vec![],
            },
        ];

        let inspection = Inspection::Index {
            url: "https://example.com/index.xml".to_string(),
            entries: vec![],
            aggregate: AggregateResult::merge(&outcomes),
            outcomes,
            diagnostics: vec![],
        };

        let sitemap = Url::parse("https://example.com/index.xml").unwrap();
        let robots = analyze(
            "https://example.com/robots.txt",
            "User-agent: *\nDisallow: /",
            &sitemap,
            "*",
        );

        let now = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
        Report::at(inspection, Some(robots), &Config::default(), now)
    }

    #[test]
    fn test_format_markdown_report() {
        let markdown = format_markdown_report(&create_test_report());

        assert!(markdown.contains("# Sitemap Report"));
        assert!(markdown.contains("- **Total URLs**: 2"));
        assert!(markdown.contains("| Last 7 days | 1 |"));
        assert!(markdown.contains("| Wednesday |"));
        assert!(markdown.contains("Peak: **Wednesday 14:00 UTC** (100.0%)"));
    }

    #[test]
    fn test_markdown_child_sections() {
        let markdown = format_markdown_report(&create_test_report());

        assert!(markdown.contains("### Sitemap: https://example.com/s1.xml (2 URLs)"));
        assert!(markdown.contains("### Sitemap: https://example.com/s2.xml (Failed)"));
        assert!(markdown.contains("**Error**: Request timeout"));
        assert!(markdown.contains("#### Recency"));
    }

    #[test]
    fn test_markdown_robots_findings() {
        let markdown = format_markdown_report(&create_test_report());

        assert!(markdown.contains("## Robots.txt"));
        assert!(markdown.contains("- **Sitemap allowed**: no"));
        assert!(markdown.contains("| error | robots.txt blocks the entire site"));
    }

    #[test]
    fn test_write_markdown_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");

        write_markdown_report(&create_test_report(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Sitemap Report"));
    }
}
