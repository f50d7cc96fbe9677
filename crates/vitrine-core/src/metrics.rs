//! Aggregate promotion metrics.
//!
//! A pure projection over current cache state, recomputed on demand. It owns
//! no mutable state: calling it twice against the same pages yields the same
//! numbers.

use serde::Serialize;

use crate::models::{Page, Promotion};

/// Aggregate counters for a set of promotions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionMetrics {
    /// Authoritative total under the source page's filter
    pub total: u64,
    /// Promotions currently enabled
    pub active: u64,
    /// Sum of redemption counts
    pub total_usage: u64,
    /// Promotions whose validity window has ended
    pub expired: u64,
}

impl PromotionMetrics {
    /// Reduce the preferred source page into counters.
    ///
    /// Prefers the unfiltered summary page when it is non-empty, so the
    /// numbers do not shrink just because the user narrowed their filter;
    /// falls back to the filtered page before the summary has loaded.
    #[must_use]
    pub fn derive(
        summary: Option<&Page<Promotion>>,
        filtered: Option<&Page<Promotion>>,
        now_ms: i64,
    ) -> Self {
        let source = match summary {
            Some(page) if !page.is_empty() => Some(page),
            _ => filtered,
        };

        let Some(page) = source else {
            return Self::default();
        };

        let mut metrics = Self {
            total: page.total_count,
            ..Self::default()
        };
        for promotion in &page.items {
            if promotion.is_active {
                metrics.active += 1;
            }
            metrics.total_usage += promotion.usage_count;
            if promotion.is_expired_at(now_ms) {
                metrics.expired += 1;
            }
        }
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn promo(name: &str, is_active: bool, usage_count: u64, ends_at: Option<i64>) -> Promotion {
        Promotion {
            is_active,
            usage_count,
            ends_at,
            ..Promotion::new(name)
        }
    }

    #[test]
    fn prefers_non_empty_summary_total_count() {
        let summary = Page::new(
            vec![promo("a", true, 3, None), promo("b", false, 1, None)],
            42,
            1,
            25,
        )
        .unwrap();
        let filtered = Page::new(vec![promo("a", true, 3, None)], 1, 1, 25).unwrap();

        let metrics = PromotionMetrics::derive(Some(&summary), Some(&filtered), 0);
        assert_eq!(metrics.total, 42);
        assert_eq!(metrics.active, 1);
        assert_eq!(metrics.total_usage, 4);
    }

    #[test]
    fn falls_back_to_filtered_when_summary_empty() {
        let summary = Page::empty(1, 25);
        let filtered = Page::new(vec![promo("a", true, 2, None)], 7, 1, 25).unwrap();

        let metrics = PromotionMetrics::derive(Some(&summary), Some(&filtered), 0);
        assert_eq!(metrics.total, 7);
        assert_eq!(metrics.active, 1);
    }

    #[test]
    fn counts_expired_against_given_clock() {
        let page = Page::new(
            vec![
                promo("ended", true, 0, Some(100)),
                promo("running", true, 0, Some(10_000)),
                promo("open", true, 0, None),
            ],
            3,
            1,
            25,
        )
        .unwrap();

        let metrics = PromotionMetrics::derive(Some(&page), None, 5_000);
        assert_eq!(metrics.expired, 1);
    }

    #[test]
    fn no_source_yields_zeroes() {
        let metrics = PromotionMetrics::derive(None, None, 0);
        assert_eq!(metrics, PromotionMetrics::default());
    }
}
