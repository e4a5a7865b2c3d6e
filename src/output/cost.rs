//! Cost calculator over inspected URL counts

use crate::config::CostConfig;

/// Price of processing every URL of an inspection
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate {
    pub url_count: usize,
    pub price_per_thousand: f64,
    pub currency: String,

    /// Price before the minimum charge is applied
    pub subtotal: f64,

    /// Amount due: the subtotal or the minimum charge, whichever is higher
    pub total: f64,

    pub minimum_applied: bool,
}

impl CostEstimate {
    /// Computes `max(url_count / 1000 * price, minimum_charge)`
    ///
    /// # Example
    ///
    /// ```
    /// use sitemap_inspector::config::CostConfig;
    /// use sitemap_inspector::output::CostEstimate;
    ///
    /// let config = CostConfig {
    ///     price_per_thousand_urls: 2.0,
    ///     currency: "EUR".to_string(),
    ///     minimum_charge: 5.0,
    /// };
    ///
    /// assert_eq!(CostEstimate::compute(12_500, &config).total, 25.0);
    /// assert_eq!(CostEstimate::compute(1_000, &config).total, 5.0);
    /// ```
    pub fn compute(url_count: usize, config: &CostConfig) -> Self {
        let subtotal = url_count as f64 / 1000.0 * config.price_per_thousand_urls;
        let minimum_applied = config.minimum_charge > subtotal;

        Self {
            url_count,
            price_per_thousand: config.price_per_thousand_urls,
            currency: config.currency.clone(),
            subtotal,
            total: subtotal.max(config.minimum_charge),
            minimum_applied,
        }
    }

    /// Whether pricing is configured at all
    pub fn is_priced(&self) -> bool {
        self.price_per_thousand > 0.0 || self.total > 0.0
    }

    /// Formats an amount in the estimate's currency
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{:.2} {}", amount, self.currency)
    }
}
