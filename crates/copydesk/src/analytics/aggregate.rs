//! Pure aggregations over ledger entries.
//!
//! Every function takes a snapshot of entries and the current day, filters
//! to the [`Timeframe`] window and derives one dashboard figure. Nothing
//! here touches storage.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::timeframe::Timeframe;

use super::{Action, AnalyticsEntry};

/// Number of products listed in each half of [`ProductAttention`].
pub const ATTENTION_SLOTS: usize = 3;

/// Day-of-month marks used by the month activity chart.
const MONTH_MARKS: [u32; 7] = [1, 5, 10, 15, 20, 25, 30];

/// Trailing days covered by the all-time activity chart.
const ALL_TIME_DAYS: u64 = 30;
/// Stride of the down-sampled all-time chart.
const ALL_TIME_STRIDE: usize = 5;

/// Copies attributed to one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformShare {
    pub name: String,
    pub count: usize,
    /// Whole-number share of all platform copies in the window.
    pub percentage: u32,
}

/// Distinct assets produced for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCount {
    pub name: String,
    pub count: usize,
}

/// Which products get attention and which are being neglected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttention {
    pub top_products: Vec<ProductCount>,
    pub neglected_products: Vec<ProductCount>,
}

/// One point on the activity chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityBucket {
    pub label: String,
    /// First day the bucket covers.
    pub date: NaiveDate,
    pub count: usize,
}

fn in_window<'e>(
    entries: &'e [AnalyticsEntry],
    timeframe: Timeframe,
    today: NaiveDate,
) -> impl Iterator<Item = &'e AnalyticsEntry> {
    entries
        .iter()
        .filter(move |e| timeframe.contains(e.date, today))
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// Copies per platform, largest first.
///
/// Only `copied` entries with a platform count. Ties are ordered by name.
/// No entries means no rows.
pub fn platform_distribution(
    entries: &[AnalyticsEntry],
    timeframe: Timeframe,
    today: NaiveDate,
) -> Vec<PlatformShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in in_window(entries, timeframe, today) {
        if entry.action != Action::Copied {
            continue;
        }
        if let Some(platform) = entry.platform.as_deref() {
            *counts.entry(platform).or_default() += 1;
        }
    }

    let total: usize = counts.values().sum();
    let mut shares: Vec<PlatformShare> = counts
        .into_iter()
        .map(|(name, count)| PlatformShare {
            name: name.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();
    // Stable sort keeps the alphabetical order from the map for ties
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// Top and neglected products.
///
/// A product's count is the number of distinct content hashes recorded
/// against it, so copying and starring the same asset counts once.
/// `top_products` holds the three highest counts. `neglected_products`
/// holds three products: catalog products with nothing recorded come first
/// (in catalog order), then the lowest-count tracked products fill any
/// remaining slots. When no entry in the window names a product, both
/// lists are empty.
pub fn product_attention(
    entries: &[AnalyticsEntry],
    timeframe: Timeframe,
    today: NaiveDate,
    inventory: &[String],
) -> ProductAttention {
    let mut hashes: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for entry in in_window(entries, timeframe, today) {
        if let Some(product) = entry.product.as_deref() {
            hashes
                .entry(product)
                .or_default()
                .insert(entry.content_hash.as_str());
        }
    }

    if hashes.is_empty() {
        return ProductAttention::default();
    }

    let mut tracked: Vec<ProductCount> = hashes
        .into_iter()
        .map(|(name, set)| ProductCount {
            name: name.to_string(),
            count: set.len(),
        })
        .collect();

    tracked.sort_by(|a, b| b.count.cmp(&a.count));
    let top_products: Vec<ProductCount> = tracked.iter().take(ATTENTION_SLOTS).cloned().collect();

    let tracked_names: HashSet<&str> = tracked.iter().map(|p| p.name.as_str()).collect();
    let mut neglected_products: Vec<ProductCount> = inventory
        .iter()
        .filter(|name| !tracked_names.contains(name.as_str()))
        .take(ATTENTION_SLOTS)
        .map(|name| ProductCount {
            name: name.clone(),
            count: 0,
        })
        .collect();

    if neglected_products.len() < ATTENTION_SLOTS {
        let missing = ATTENTION_SLOTS - neglected_products.len();
        // Ascending by count, ties by name
        let mut lowest = tracked;
        lowest.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.name.cmp(&b.name)));
        neglected_products.extend(lowest.into_iter().take(missing));
    }

    ProductAttention {
        top_products,
        neglected_products,
    }
}

/// Distinct content hashes touched in the window, whatever the action.
pub fn creative_output(entries: &[AnalyticsEntry], timeframe: Timeframe, today: NaiveDate) -> usize {
    in_window(entries, timeframe, today)
        .map(|e| e.content_hash.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Activity chart buckets for `timeframe`. Every bucket is present even
/// when its count is zero.
///
/// - week: the 7 days ending today, labelled `Mon`..`Sun`
/// - month: the marks 1, 5, 10, 15, 20, 25, 30 of the current month that
///   exist in it; each counts this month's entries from its mark up to the
///   next mark, the last one running to month end. Labelled `Oct 5`.
/// - all: the 30 days ending today sampled every 5th day plus today,
///   labelled `10/16`.
pub fn activity(entries: &[AnalyticsEntry], timeframe: Timeframe, today: NaiveDate) -> Vec<ActivityBucket> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for entry in entries {
        if matches!(entry.action, Action::Copied | Action::Starred) {
            *per_day.entry(entry.date).or_default() += 1;
        }
    }
    let on = |day: NaiveDate| per_day.get(&day).copied().unwrap_or(0);

    match timeframe {
        Timeframe::Week => trailing_days(today, 7)
            .into_iter()
            .map(|day| ActivityBucket {
                label: day.format("%a").to_string(),
                date: day,
                count: on(day),
            })
            .collect(),
        Timeframe::Month => month_buckets(&per_day, today),
        Timeframe::All => {
            let days = trailing_days(today, ALL_TIME_DAYS);
            let last = days.len().saturating_sub(1);
            days.into_iter()
                .enumerate()
                .filter(|(i, _)| i % ALL_TIME_STRIDE == 0 || *i == last)
                .map(|(_, day)| ActivityBucket {
                    label: day.format("%m/%d").to_string(),
                    date: day,
                    count: on(day),
                })
                .collect()
        }
    }
}

/// The `n` days ending with `today`, oldest first.
fn trailing_days(today: NaiveDate, n: u64) -> Vec<NaiveDate> {
    (0..n)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

fn month_buckets(per_day: &BTreeMap<NaiveDate, usize>, today: NaiveDate) -> Vec<ActivityBucket> {
    let (year, month) = (today.year(), today.month());
    let starts: Vec<NaiveDate> = MONTH_MARKS
        .iter()
        .filter_map(|&day| NaiveDate::from_ymd_opt(year, month, day))
        .collect();
    let next_month = starts
        .first()
        .and_then(|first| first.checked_add_months(chrono::Months::new(1)));

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().or(next_month);
            let count = per_day
                .range(start..)
                .take_while(|(day, _)| end.is_none_or(|end| **day < end))
                .map(|(_, count)| count)
                .sum();
            ActivityBucket {
                label: start.format("%b %-d").to_string(),
                date: start,
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::hash::content_hash;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(
        date: NaiveDate,
        action: Action,
        content: &str,
        platform: Option<&str>,
        product: Option<&str>,
    ) -> AnalyticsEntry {
        AnalyticsEntry {
            id: format!("{date}-{content}-{action}"),
            date,
            action,
            content_hash: content_hash(content),
            platform: platform.map(str::to_string),
            product: product.map(str::to_string),
            kind: "Daily Idea".to_string(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn names(items: &[ProductCount]) -> Vec<&str> {
        items.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_platform_distribution_single_entry() {
        let today = day(2024, 6, 10);
        let entries = vec![entry(today, Action::Copied, "Buy our butter!", Some("TikTok"), Some("Vanilla Cream Butter"))];
        assert_eq!(
            platform_distribution(&entries, Timeframe::Month, today),
            vec![PlatformShare { name: "TikTok".to_string(), count: 1, percentage: 100 }]
        );
    }

    #[test]
    fn test_platform_distribution_ignores_stars_and_missing_platform() {
        let today = day(2024, 6, 10);
        let entries = vec![
            entry(today, Action::Copied, "a", Some("TikTok"), None),
            entry(today, Action::Copied, "b", Some("LinkedIn"), None),
            entry(today, Action::Copied, "c", Some("LinkedIn"), None),
            entry(today, Action::Starred, "d", Some("Email"), None),
            entry(today, Action::Copied, "e", None, None),
            entry(day(2024, 5, 1), Action::Copied, "f", Some("Email"), None),
        ];
        let shares = platform_distribution(&entries, Timeframe::Month, today);
        assert_eq!(
            shares,
            vec![
                PlatformShare { name: "LinkedIn".to_string(), count: 2, percentage: 67 },
                PlatformShare { name: "TikTok".to_string(), count: 1, percentage: 33 },
            ]
        );

        let all = platform_distribution(&entries, Timeframe::All, today);
        assert_eq!(all.len(), 3);
        assert!(platform_distribution(&[], Timeframe::Week, today).is_empty());
    }

    #[test]
    fn test_product_attention_empty_ledger() {
        let inventory = vec!["A".to_string(), "B".to_string()];
        let attention = product_attention(&[], Timeframe::Month, day(2024, 6, 10), &inventory);
        assert!(attention.top_products.is_empty());
        assert!(attention.neglected_products.is_empty());
    }

    #[test]
    fn test_product_attention_counts_distinct_hashes() {
        let today = day(2024, 6, 10);
        let inventory: Vec<String> = ["A", "B", "C", "D", "E"].iter().map(|s| s.to_string()).collect();
        let entries = vec![
            entry(today, Action::Copied, "one", None, Some("A")),
            entry(today, Action::Starred, "one", None, Some("A")),
            entry(today, Action::Copied, "two", None, Some("A")),
            entry(today, Action::Copied, "three", None, Some("B")),
            entry(today, Action::Copied, "four", None, Some("Z")),
            entry(today, Action::Copied, "five", None, Some("Z")),
            entry(today, Action::Copied, "six", None, Some("Z")),
        ];
        let attention = product_attention(&entries, Timeframe::Week, today, &inventory);

        assert_eq!(names(&attention.top_products), vec!["Z", "A", "B"]);
        assert_eq!(attention.top_products[1].count, 2);
        // Zero-count catalog products first, in catalog order
        assert_eq!(names(&attention.neglected_products), vec!["C", "D", "E"]);
        assert!(attention.neglected_products.iter().all(|p| p.count == 0));
    }

    #[test]
    fn test_product_attention_backfills_with_lowest_tracked() {
        let today = day(2024, 6, 10);
        let inventory: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        let entries = vec![
            entry(today, Action::Copied, "one", None, Some("A")),
            entry(today, Action::Copied, "two", None, Some("A")),
            entry(today, Action::Copied, "three", None, Some("B")),
        ];
        let attention = product_attention(&entries, Timeframe::Month, today, &inventory);
        assert_eq!(
            attention.neglected_products,
            vec![
                ProductCount { name: "C".to_string(), count: 0 },
                ProductCount { name: "B".to_string(), count: 1 },
                ProductCount { name: "A".to_string(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_product_attention_respects_window() {
        let today = day(2024, 6, 10);
        let inventory = vec!["A".to_string()];
        let entries = vec![entry(day(2024, 1, 1), Action::Copied, "old", None, Some("A"))];
        assert_eq!(
            product_attention(&entries, Timeframe::Month, today, &inventory),
            ProductAttention::default()
        );
        let all = product_attention(&entries, Timeframe::All, today, &inventory);
        assert_eq!(names(&all.top_products), vec!["A"]);
    }

    #[test]
    fn test_creative_output_counts_unique_assets() {
        let today = day(2024, 6, 10);
        let entries = vec![
            entry(today, Action::Copied, "one", None, None),
            entry(today, Action::Starred, "ONE ", None, None),
            entry(today, Action::Copied, "two", None, None),
            entry(day(2024, 6, 1), Action::Copied, "three", None, None),
        ];
        assert_eq!(creative_output(&entries, Timeframe::Week, today), 2);
        assert_eq!(creative_output(&entries, Timeframe::Month, today), 3);
        assert_eq!(creative_output(&[], Timeframe::All, today), 0);
    }

    #[test]
    fn test_week_activity_always_seven_weekdays() {
        // 2024-06-10 is a Monday
        let today = day(2024, 6, 10);
        let buckets = activity(&[], Timeframe::Week, today);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Tue", "Wed", "Thu", "Fri", "Sat", "Sun", "Mon"]);
        assert!(buckets.iter().all(|b| b.count == 0));
        assert_eq!(buckets.last().unwrap().date, today);
    }

    #[test]
    fn test_week_activity_counts_per_day() {
        let today = day(2024, 6, 10);
        let entries = vec![
            entry(today, Action::Copied, "a", None, None),
            entry(today, Action::Starred, "a", None, None),
            entry(day(2024, 6, 8), Action::Copied, "b", None, None),
            entry(day(2024, 6, 1), Action::Copied, "c", None, None),
        ];
        let counts: Vec<usize> = activity(&entries, Timeframe::Week, today).iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![0, 0, 0, 0, 1, 0, 2]);
    }

    #[test]
    fn test_month_activity_ranges_between_marks() {
        let today = day(2024, 6, 20);
        let entries = vec![
            entry(day(2024, 6, 1), Action::Copied, "a", None, None),
            entry(day(2024, 6, 4), Action::Copied, "b", None, None),
            entry(day(2024, 6, 5), Action::Copied, "c", None, None),
            entry(day(2024, 6, 30), Action::Copied, "d", None, None),
            entry(day(2024, 5, 31), Action::Copied, "e", None, None),
            entry(day(2024, 7, 1), Action::Copied, "f", None, None),
        ];
        let buckets = activity(&entries, Timeframe::Month, today);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Jun 1", "Jun 5", "Jun 10", "Jun 15", "Jun 20", "Jun 25", "Jun 30"]);
        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_month_activity_clips_marks_to_short_month() {
        let buckets = activity(&[], Timeframe::Month, day(2023, 2, 14));
        assert_eq!(buckets.len(), 6);
        assert_eq!(buckets.last().unwrap().label, "Feb 25");
    }

    #[test]
    fn test_all_activity_downsamples_thirty_days() {
        let today = day(2024, 6, 10);
        let entries = vec![
            entry(today, Action::Copied, "a", None, None),
            entry(day(2024, 5, 12), Action::Copied, "b", None, None),
            // Not on a sampled day
            entry(day(2024, 5, 13), Action::Copied, "c", None, None),
        ];
        let buckets = activity(&entries, Timeframe::All, today);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["05/12", "05/17", "05/22", "05/27", "06/01", "06/06", "06/10"]);
        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 0, 0, 0, 0, 1]);
    }
}
