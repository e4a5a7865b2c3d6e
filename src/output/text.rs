//! Plain-text terminal report

use crate::fetcher::Diagnostic;
use crate::inspector::{FetchOutcome, Inspection};
use crate::output::traits::{Report, ReportRenderer};
use crate::output::{child_title, shade, status_label, weekday_name};
use crate::robots::RobotsReport;
use crate::sitemap::ExtensionTags;
use crate::stats::{DateSummary, WEEKDAYS};

/// Renders a report for the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &Report) -> String {
        let mut out = String::new();
        let inspection = &report.inspection;

        out.push_str("=== Sitemap Report ===\n\n");
        out.push_str(&format!("Target: {}\n", inspection.url()));
        match inspection {
            Inspection::Leaf { .. } => out.push_str("Type: Sitemap\n"),
            Inspection::Index { entries, .. } => {
                out.push_str(&format!("Type: Sitemap index ({} child sitemaps)\n", entries.len()));
            }
        }
        out.push_str(&format!("Generated: {}\n\n", report.generated_at.to_rfc3339()));

        out.push_str("Overview:\n");
        out.push_str(&format!("  Total URLs: {}\n", inspection.url_count()));
        write_overview(&mut out, &report.summary, "  ");
        if let Inspection::Index { aggregate, .. } = inspection {
            out.push_str(&format!(
                "  Child sitemaps: {} succeeded, {} failed\n",
                aggregate.succeeded, aggregate.failed
            ));
        }
        out.push('\n');

        write_recency(&mut out, &report.summary);
        write_distribution(&mut out, &report.summary);

        if let Inspection::Leaf { result, .. } = inspection {
            out.push_str("Extension Tags:\n");
            write_tags(&mut out, &result.extension_tags, "  ");
            out.push('\n');
        }

        write_diagnostics(&mut out, "Diagnostics:", inspection.diagnostics(), "  ");

        if let Inspection::Index { outcomes, .. } = inspection {
            out.push_str("Per-Sitemap Results (completion order):\n");
            for outcome in outcomes {
                write_child(&mut out, report, outcome);
            }
            out.push('\n');
        }

        if let Some(robots) = &report.robots {
            write_robots(&mut out, robots);
        }

        let cost = &report.cost;
        if cost.is_priced() {
            out.push_str("Cost Estimate:\n");
            out.push_str(&format!(
                "  {} URLs x {} per 1000 = {}\n",
                cost.url_count,
                cost.format_amount(cost.price_per_thousand),
                cost.format_amount(cost.subtotal)
            ));
            out.push_str(&format!("  Total: {}", cost.format_amount(cost.total)));
            if cost.minimum_applied {
                out.push_str(" (minimum charge applied)");
            }
            out.push_str("\n\n");
        }

        if report.list_urls {
            let urls = inspection.sorted_urls();
            let shown = urls.len().min(report.max_listed_urls);
            out.push_str(&format!("URLs (showing {} of {}):\n", shown, urls.len()));
            for url in urls.iter().take(shown) {
                out.push_str(&format!("  - {}\n", url));
            }
            if urls.len() > shown {
                out.push_str(&format!("  ... and {} more\n", urls.len() - shown));
            }
        }

        out
    }
}

fn write_overview(out: &mut String, summary: &DateSummary, indent: &str) {
    out.push_str(&format!("{}URLs with a modification date: {}\n", indent, summary.date_count()));
    if let (Some(earliest), Some(latest)) = (summary.earliest, summary.latest) {
        out.push_str(&format!("{}Earliest modification: {}\n", indent, earliest.to_rfc3339()));
        out.push_str(&format!("{}Latest modification: {}\n", indent, latest.to_rfc3339()));
    }
}

fn write_recency(out: &mut String, summary: &DateSummary) {
    if summary.date_count() == 0 {
        return;
    }
    out.push_str("Recency:\n");
    for (window, count) in summary.buckets.iter() {
        out.push_str(&format!("  {}: {}\n", window.label(), count));
    }
    out.push('\n');
}

fn write_distribution(out: &mut String, summary: &DateSummary) {
    if summary.date_count() == 0 {
        return;
    }
    out.push_str("Modification Distribution (UTC):\n");
    if !summary.show_distribution() {
        out.push_str("  Dates carry no time of day; hourly distribution omitted\n\n");
        return;
    }

    let distribution = &summary.distribution;
    let max = distribution
        .rows()
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, v| acc.max(*v));

    out.push_str("             ");
    for hour in 0..24 {
        out.push_str(&format!("{:02} ", hour));
    }
    out.push('\n');

    let totals = distribution.weekday_totals();
    for (row, weekday) in WEEKDAYS.iter().enumerate() {
        out.push_str(&format!("  {:<10} ", weekday_name(*weekday)));
        for hour in 0..24 {
            out.push_str(&format!(" {} ", shade(distribution.cell(*weekday, hour), max)));
        }
        out.push_str(&format!(" {:5.1}%\n", totals[row]));
    }

    if let Some((weekday, hour, share)) = distribution.peak() {
        out.push_str(&format!(
            "  Peak: {} {:02}:00 UTC ({:.1}% of dated URLs)\n",
            weekday_name(weekday),
            hour,
            share
        ));
    }
    out.push('\n');
}

fn write_tags(out: &mut String, tags: &ExtensionTags, indent: &str) {
    if tags.is_empty() {
        out.push_str(&format!("{}No extension tags detected\n", indent));
        return;
    }
    for (category, names) in tags.iter() {
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        out.push_str(&format!("{}{}: {}\n", indent, category, names.join(", ")));
    }
}

fn write_diagnostics(out: &mut String, heading: &str, diagnostics: &[Diagnostic], indent: &str) {
    if diagnostics.is_empty() {
        return;
    }
    if !heading.is_empty() {
        out.push_str(&format!("{}\n", heading));
    }
    for diagnostic in diagnostics {
        out.push_str(&format!("{}{}\n", indent, diagnostic));
    }
    if !heading.is_empty() {
        out.push('\n');
    }
}

fn write_child(out: &mut String, report: &Report, outcome: &FetchOutcome) {
    out.push_str(&format!("  {}\n", child_title(outcome)));
    match outcome {
        FetchOutcome::Success { leaf_result, .. } => {
            if let Some(summary) = report.child_summary(outcome) {
                write_overview(out, &summary, "    ");
                if summary.date_count() > 0 {
                    let buckets = summary.buckets;
                    out.push_str(&format!(
                        "    24h / 7d / 30d / 365d: {} / {} / {} / {}\n",
                        buckets.last_24h, buckets.last_week, buckets.last_month, buckets.last_year
                    ));
                }
            }
            out.push_str("    Tags:\n");
            write_tags(out, &leaf_result.extension_tags, "      ");
        }
        FetchOutcome::Failure { error_message, .. } => {
            out.push_str(&format!("    Error: {}\n", error_message));
        }
    }
    write_diagnostics(out, "", outcome.diagnostics(), "    ");
}

fn write_robots(out: &mut String, robots: &RobotsReport) {
    out.push_str("Robots.txt:\n");
    out.push_str(&format!("  Location: {}\n", robots.robots_url));
    out.push_str(&format!("  Status: {}\n", status_label(robots.status)));
    if let Some(allowed) = robots.sitemap_allowed {
        out.push_str(&format!("  Sitemap allowed: {}\n", if allowed { "yes" } else { "no" }));
    }
    if let Some(file) = &robots.file {
        out.push_str(&format!(
            "  Groups: {}, declared sitemaps: {}\n",
            file.groups.len(),
            file.sitemaps.len()
        ));
    }
    if let Some(delay) = robots.crawl_delay {
        out.push_str(&format!("  Crawl delay: {}s\n", delay));
    }
    write_diagnostics(out, "", &robots.findings, "  ");
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::inspector::AggregateResult;
    use crate::sitemap::{parse_document, SitemapDocument, TagCategory};
    use chrono::{TimeZone, Utc};

    fn leaf_inspection(xml: &str) -> Inspection {
        match parse_document(xml).unwrap() {
            SitemapDocument::Leaf(result) => Inspection::Leaf {
                url: "https://example.com/sitemap.xml".to_string(),
                result,
                diagnostics: vec![],
            },
            SitemapDocument::Index(_) => panic!("expected a leaf"),
        }
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_leaf_report() {
        let inspection = leaf_inspection(
            r#"<urlset xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
                <url><loc>https://example.com/a</loc><lastmod>2024-01-19T14:00:00Z</lastmod>
                  <image:image><image:loc>https://example.com/a.png</image:loc></image:image></url>
                <url><loc>https://example.com/b</loc><lastmod>2023-06-01T09:00:00Z</lastmod></url>
               </urlset>"#,
        );
        let report = Report::at(inspection, None, &Config::default(), now());
        let text = TextRenderer.render(&report);

        assert!(text.contains("=== Sitemap Report ==="));
        assert!(text.contains("Type: Sitemap\n"));
        assert!(text.contains("Total URLs: 2"));
        assert!(text.contains("Last 24 hours: 1"));
        assert!(text.contains("Last 365 days: 2"));
        assert!(text.contains("Modification Distribution (UTC):"));
        assert!(text.contains("Peak:"));
        assert!(text.contains("image: image, loc"));
        assert!(!text.contains("Cost Estimate"));
        assert!(!text.contains("URLs (showing"));
    }

    #[test]
    fn test_date_only_hides_heatmap() {
        let inspection = leaf_inspection(
            "<urlset><url><loc>https://example.com/a</loc><lastmod>2024-01-19</lastmod></url></urlset>",
        );
        let report = Report::at(inspection, None, &Config::default(), now());
        let text = TextRenderer.render(&report);
        assert!(text.contains("hourly distribution omitted"));
        assert!(text.contains("No extension tags detected"));
    }

    #[test]
    fn test_index_report_lists_children_in_order() {
        let mut leaf = crate::sitemap::LeafSitemapResult::default();
        leaf.urls.insert("https://example.com/1".to_string());
        leaf.extension_tags.insert(TagCategory::Standard, "priority");

        let outcomes = vec![
            FetchOutcome::Failure {
                url: "https://example.com/b.xml".to_string(),
                error_message: "HTTP status 500 for https://example.com/b.xml".to_string(),
                diagnostics: vec![],
            },
            FetchOutcome::Success {
                url: "https://example.com/a.xml".to_string(),
                leaf_result: leaf,
                diagnostics: vec![Diagnostic::warning("served with Content-Type text/html")],
            },
        ];
        let inspection = Inspection::Index {
            url: "https://example.com/index.xml".to_string(),
            entries: vec![],
            aggregate: AggregateResult::merge(&outcomes),
            outcomes,
            diagnostics: vec![],
        };

        let mut config = Config::default();
        config.cost.price_per_thousand_urls = 2.0;
        config.cost.minimum_charge = 1.0;
        config.output.list_urls = true;

        let report = Report::at(inspection, None, &config, now());
        let text = TextRenderer.render(&report);

        let failed = text.find("Sitemap: https://example.com/b.xml (Failed)").unwrap();
        let ok = text.find("Sitemap: https://example.com/a.xml (1 URLs)").unwrap();
        assert!(failed < ok);
        assert!(text.contains("Error: HTTP status 500"));
        assert!(text.contains("standard: priority"));
        assert!(text.contains("[warning] served with Content-Type text/html"));
        assert!(text.contains("1 succeeded, 1 failed"));
        assert!(text.contains("Total: 1.00 USD (minimum charge applied)"));
        assert!(text.contains("URLs (showing 1 of 1):"));
        assert!(text.contains("  - https://example.com/1"));
    }
}
