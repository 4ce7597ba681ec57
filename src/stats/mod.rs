//! Summary statistics and text charts over collected records.

pub mod chart;

use crate::amazon::ProductRecord;
use std::collections::{BTreeMap, HashMap};

pub use chart::bar_chart;

const PRICE_BINS: usize = 5;
const TOP_AUTHORS: usize = 10;
const CHART_WIDTH: usize = 40;

/// Price bucket `[low, high)`; the last bucket includes `high`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBin {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

/// Least-squares line `rating = intercept + slope * price`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub slope: f64,
    pub intercept: f64,
}

/// Aggregate view of one harvest.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub with_price: usize,
    pub with_rating: usize,
    pub average_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub price_histogram: Vec<PriceBin>,
    /// Count per distinct rating, ascending.
    pub rating_distribution: Vec<(f32, usize)>,
    /// Records carrying both a price and a rating.
    pub priced_and_rated: usize,
    pub trend: Option<Trend>,
    /// Most frequent authors/sellers; empty when no record has one.
    pub top_authors: Vec<(String, usize)>,
}

impl Summary {
    pub fn from_records(records: &[ProductRecord]) -> Self {
        let prices: Vec<f64> = records.iter().filter_map(|r| r.price).collect();
        let ratings: Vec<f32> = records.iter().filter_map(|r| r.rating).collect();
        let pairs: Vec<(f64, f64)> = records
            .iter()
            .filter_map(|r| Some((r.price?, f64::from(r.rating?))))
            .collect();

        let average_price =
            (!prices.is_empty()).then(|| prices.iter().sum::<f64>() / prices.len() as f64);
        let min_price = prices.iter().copied().reduce(f64::min);
        let max_price = prices.iter().copied().reduce(f64::max);

        Self {
            total: records.len(),
            with_price: prices.len(),
            with_rating: ratings.len(),
            average_price,
            min_price,
            max_price,
            price_histogram: price_histogram(&prices),
            rating_distribution: rating_distribution(&ratings),
            priced_and_rated: pairs.len(),
            trend: trend(&pairs),
            top_authors: top_authors(records),
        }
    }

    /// Renders the summary as a plain-text report with bar charts.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        lines.push("Statistics".to_string());
        lines.push(format!("  Total items:        {}", self.total));
        lines.push(format!(
            "  Items with price:   {} ({:.1}%)",
            self.with_price,
            percent(self.with_price, self.total)
        ));
        lines.push(format!(
            "  Items with rating:  {} ({:.1}%)",
            self.with_rating,
            percent(self.with_rating, self.total)
        ));
        lines.push(format!(
            "  Average price:      {}",
            self.average_price.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "N/A".into())
        ));
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            lines.push(format!("  Price range:        {:.2} - {:.2}", min, max));
        }

        lines.push(String::new());
        lines.push("Price distribution".to_string());
        if self.price_histogram.is_empty() {
            lines.push("  No parsed prices.".to_string());
        } else {
            let rows: Vec<(String, usize)> = self
                .price_histogram
                .iter()
                .map(|bin| (format!("{:.2} - {:.2}", bin.low, bin.high), bin.count))
                .collect();
            lines.push(bar_chart(&rows, CHART_WIDTH));
        }

        lines.push(String::new());
        lines.push("Rating distribution".to_string());
        if self.rating_distribution.is_empty() {
            lines.push("  No parsed ratings.".to_string());
        } else {
            let rows: Vec<(String, usize)> = self
                .rating_distribution
                .iter()
                .map(|(stars, count)| (format!("{:.1}", stars), *count))
                .collect();
            lines.push(bar_chart(&rows, CHART_WIDTH));
        }

        lines.push(String::new());
        lines.push("Price vs rating".to_string());
        match (self.priced_and_rated, self.trend) {
            (0, _) => lines.push("  Needs at least one item with price and rating.".to_string()),
            (n, Some(trend)) => lines.push(format!(
                "  {} items; trend: rating = {:.3} {} {:.4} x price",
                n,
                trend.intercept,
                if trend.slope < 0.0 { "-" } else { "+" },
                trend.slope.abs()
            )),
            (n, None) => lines.push(format!("  {} items; not enough price spread for a trend.", n)),
        }

        if !self.top_authors.is_empty() {
            lines.push(String::new());
            lines.push("Top authors / sellers".to_string());
            lines.push(bar_chart(&self.top_authors, CHART_WIDTH));
        }

        lines.join("\n")
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn price_histogram(prices: &[f64]) -> Vec<PriceBin> {
    let (Some(min), Some(max)) =
        (prices.iter().copied().reduce(f64::min), prices.iter().copied().reduce(f64::max))
    else {
        return Vec::new();
    };

    if max <= min {
        return vec![PriceBin { low: min, high: max, count: prices.len() }];
    }

    let width = (max - min) / PRICE_BINS as f64;
    let mut bins: Vec<PriceBin> = (0..PRICE_BINS)
        .map(|i| PriceBin {
            low: min + width * i as f64,
            high: if i + 1 == PRICE_BINS { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for price in prices {
        let idx = (((price - min) / width) as usize).min(PRICE_BINS - 1);
        bins[idx].count += 1;
    }

    bins
}

fn rating_distribution(ratings: &[f32]) -> Vec<(f32, usize)> {
    // keyed by tenths of a star
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for rating in ratings {
        *counts.entry((rating * 10.0).round() as u32).or_default() += 1;
    }

    counts.into_iter().map(|(tenths, count)| (tenths as f32 / 10.0, count)).collect()
}

fn trend(pairs: &[(f64, f64)]) -> Option<Trend> {
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let sxx: f64 = pairs.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if sxx <= f64::EPSILON {
        return None;
    }
    let sxy: f64 = pairs.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();

    let slope = sxy / sxx;
    Some(Trend { slope, intercept: mean_y - slope * mean_x })
}

fn top_authors(records: &[ProductRecord]) -> Vec<(String, usize)> {
    if records.iter().all(|r| r.seller_or_author.is_none()) {
        return Vec::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.seller_or_author.as_deref().unwrap_or("Unknown")).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> =
        counts.into_iter().map(|(name, count)| (name.to_string(), count)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_AUTHORS);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: Option<f64>, rating: Option<f32>, author: Option<&str>) -> ProductRecord {
        ProductRecord {
            title: Some("Item".to_string()),
            seller_or_author: author.map(String::from),
            price,
            rating,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.average_price.is_none());
        assert!(summary.price_histogram.is_empty());
        assert!(summary.rating_distribution.is_empty());
        assert!(summary.trend.is_none());
        assert!(summary.top_authors.is_empty());

        let report = summary.render();
        assert!(report.contains("Total items:        0"));
        assert!(report.contains("Items with price:   0 (0.0%)"));
        assert!(report.contains("Average price:      N/A"));
        assert!(report.contains("No parsed prices."));
        assert!(!report.contains("Top authors"));
    }

    #[test]
    fn test_counts_and_price_stats() {
        let records = vec![
            record(Some(10.0), Some(4.0), Some("Acme")),
            record(Some(30.0), None, None),
            record(None, Some(5.0), Some("Acme")),
            record(None, None, Some("Globex")),
        ];
        let summary = Summary::from_records(&records);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.with_price, 2);
        assert_eq!(summary.with_rating, 2);
        assert_eq!(summary.average_price, Some(20.0));
        assert_eq!(summary.min_price, Some(10.0));
        assert_eq!(summary.max_price, Some(30.0));
        assert_eq!(summary.priced_and_rated, 1);
        assert!(summary.trend.is_none());

        let report = summary.render();
        assert!(report.contains("Items with price:   2 (50.0%)"));
        assert!(report.contains("Average price:      20.00"));
        assert!(report.contains("Price range:        10.00 - 30.00"));
    }

    #[test]
    fn test_price_histogram_bins() {
        let bins = price_histogram(&[0.0, 10.0, 20.0, 49.0, 50.0]);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].low, 0.0);
        assert_eq!(bins[4].high, 50.0);

        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 0, 2]);
    }

    #[test]
    fn test_price_histogram_single_value() {
        let bins = price_histogram(&[9.99, 9.99]);
        assert_eq!(bins, vec![PriceBin { low: 9.99, high: 9.99, count: 2 }]);
    }

    #[test]
    fn test_rating_distribution_sorted() {
        let dist = rating_distribution(&[4.5, 3.0, 4.5, 5.0]);
        assert_eq!(dist, vec![(3.0, 1), (4.5, 2), (5.0, 1)]);
    }

    #[test]
    fn test_trend_line() {
        let trend = trend(&[(10.0, 3.0), (20.0, 4.0), (30.0, 5.0)]).unwrap();
        assert!((trend.slope - 0.1).abs() < 1e-9);
        assert!((trend.intercept - 2.0).abs() < 1e-9);

        assert!(super::trend(&[(10.0, 3.0), (10.0, 5.0)]).is_none());
        assert!(super::trend(&[(10.0, 3.0)]).is_none());
    }

    #[test]
    fn test_trend_rendering() {
        let records = vec![
            record(Some(10.0), Some(3.0), None),
            record(Some(20.0), Some(4.0), None),
            record(Some(30.0), Some(5.0), None),
        ];
        let report = Summary::from_records(&records).render();
        assert!(report.contains("3 items; trend: rating = 2.000 + 0.1000 x price"));
    }

    #[test]
    fn test_top_authors_ranking() {
        let records = vec![
            record(None, None, Some("Zed")),
            record(None, None, Some("Acme")),
            record(None, None, Some("Acme")),
            record(None, None, None),
            record(None, None, Some("Bolt")),
        ];
        let top = top_authors(&records);
        assert_eq!(
            top,
            vec![
                ("Acme".to_string(), 2),
                ("Bolt".to_string(), 1),
                ("Unknown".to_string(), 1),
                ("Zed".to_string(), 1),
            ]
        );

        let report = Summary::from_records(&records).render();
        assert!(report.contains("Top authors / sellers"));
        assert!(report.contains("Acme"));
    }

    #[test]
    fn test_top_authors_limited_to_ten() {
        let records: Vec<ProductRecord> =
            (0..15).map(|i| record(None, None, Some(format!("Seller {:02}", i).as_str()))).collect();
        assert_eq!(top_authors(&records).len(), 10);
    }
}
