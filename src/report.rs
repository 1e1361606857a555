//! Rollups, extrema, and derived insight statistics.
//!
//! Everything here is a deterministic fold over the transaction log or over
//! the two analysis tables; no analytic decisions are made. Groups with no
//! members report zero counts and undefined averages instead of failing.

use chrono::Datelike;
use serde::Serialize;

use crate::abc::{ProductRevenue, Tier};
use crate::chart::{self, ChartSet};
use crate::data::Transaction;
use crate::frm::{CustomerValue, Segment};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Revenue carried by one tier.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TierBreakdown {
    pub tier: Tier,
    pub products: usize,
    pub revenue: f64,
    pub revenue_share: f64,
}

/// Customer counts and averages for one segment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegmentBreakdown {
    pub segment: Segment,
    pub customers: usize,
    pub avg_recency_days: Option<f64>,
    pub avg_frequency: Option<f64>,
    /// Mean of each member's spend per visit.
    pub avg_spend_per_visit: Option<f64>,
}

/// Which entity achieved an extreme, and the value it achieved.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Extreme {
    pub label: String,
    pub value: f64,
}

/// Activity aggregated over one calendar month.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlyActivity {
    pub month: String,
    pub revenue: f64,
    pub transactions: u64,
}

/// Transaction count for one weekday.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeekdayActivity {
    pub day: String,
    pub transactions: u64,
}

/// Transaction count for one product.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductPopularity {
    pub item: String,
    pub transactions: u64,
}

/// Population-level retention averages.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RetentionMetrics {
    pub avg_recency_days: f64,
    pub avg_frequency: f64,
    /// Total spend divided by total visits.
    pub avg_spend_per_transaction: f64,
}

/// Sum revenue into the three tiers. All tiers are always present; a tier
/// with no products reports zero revenue and zero share.
pub fn tier_rollup(products: &[ProductRevenue]) -> Vec<TierBreakdown> {
    let total: f64 = products.iter().map(|p| p.total_revenue).sum();
    Tier::ALL
        .iter()
        .map(|&tier| {
            let mut count = 0;
            let mut revenue = 0.0;
            for p in products.iter().filter(|p| p.tier == tier) {
                count += 1;
                revenue += p.total_revenue;
            }
            TierBreakdown {
                tier,
                products: count,
                revenue,
                revenue_share: if total > 0.0 { revenue / total } else { 0.0 },
            }
        })
        .collect()
}

/// Count customers per segment with per-segment averages. All four segments
/// are always present; empty segments report `None` averages.
pub fn segment_rollup(customers: &[CustomerValue]) -> Vec<SegmentBreakdown> {
    Segment::ALL
        .iter()
        .map(|&segment| {
            let members: Vec<&CustomerValue> =
                customers.iter().filter(|c| c.segment == segment).collect();
            if members.is_empty() {
                return SegmentBreakdown {
                    segment,
                    customers: 0,
                    avg_recency_days: None,
                    avg_frequency: None,
                    avg_spend_per_visit: None,
                };
            }
            let n = members.len() as f64;
            SegmentBreakdown {
                segment,
                customers: members.len(),
                avg_recency_days: Some(
                    members.iter().map(|c| c.recency_days as f64).sum::<f64>() / n,
                ),
                avg_frequency: Some(
                    members.iter().map(|c| c.frequency as f64).sum::<f64>() / n,
                ),
                avg_spend_per_visit: Some(
                    members
                        .iter()
                        .map(|c| c.monetary / c.frequency as f64)
                        .sum::<f64>()
                        / n,
                ),
            }
        })
        .collect()
}

/// Revenue and transaction counts per calendar month, January through
/// December. Months with no activity are present at zero.
pub fn monthly_activity(transactions: &[Transaction]) -> Vec<MonthlyActivity> {
    let mut revenue = [0.0f64; 12];
    let mut counts = [0u64; 12];
    for tx in transactions {
        let m = tx.date.month0() as usize;
        revenue[m] += tx.price;
        counts[m] += 1;
    }
    MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(i, &month)| MonthlyActivity {
            month: month.to_string(),
            revenue: revenue[i],
            transactions: counts[i],
        })
        .collect()
}

/// Transaction counts per weekday, Monday through Sunday.
pub fn weekday_activity(transactions: &[Transaction]) -> Vec<WeekdayActivity> {
    let mut counts = [0u64; 7];
    for tx in transactions {
        counts[tx.date.weekday().num_days_from_monday() as usize] += 1;
    }
    DAY_NAMES
        .iter()
        .enumerate()
        .map(|(i, &day)| WeekdayActivity {
            day: day.to_string(),
            transactions: counts[i],
        })
        .collect()
}

/// Transaction counts per product, ascending, ties in encounter order.
pub fn product_popularity(transactions: &[Transaction]) -> Vec<ProductPopularity> {
    let mut counts: indexmap::IndexMap<String, u64> = indexmap::IndexMap::new();
    for tx in transactions {
        *counts.entry(tx.item.clone()).or_insert(0) += 1;
    }
    let mut popularity: Vec<ProductPopularity> = counts
        .into_iter()
        .map(|(item, transactions)| ProductPopularity { item, transactions })
        .collect();
    popularity.sort_by_key(|p| p.transactions);
    popularity
}

/// The first `n` products of the ranked revenue table.
pub fn top_products(products: &[ProductRevenue], n: usize) -> Vec<ProductRevenue> {
    products.iter().take(n).cloned().collect()
}

/// Share of total revenue carried by the top 20% of ranked products.
pub fn top_quintile_share(products: &[ProductRevenue]) -> f64 {
    let total: f64 = products.iter().map(|p| p.total_revenue).sum();
    if products.is_empty() || total <= 0.0 {
        return 0.0;
    }
    let cut = ((products.len() as f64 * 0.2) as usize + 1).min(products.len());
    products[..cut].iter().map(|p| p.total_revenue).sum::<f64>() / total
}

/// Population averages for recency, frequency, and spend per visit.
pub fn retention_metrics(customers: &[CustomerValue]) -> Option<RetentionMetrics> {
    if customers.is_empty() {
        return None;
    }
    let n = customers.len() as f64;
    let total_visits: u64 = customers.iter().map(|c| c.frequency).sum();
    let total_spend: f64 = customers.iter().map(|c| c.monetary).sum();
    Some(RetentionMetrics {
        avg_recency_days: customers.iter().map(|c| c.recency_days as f64).sum::<f64>() / n,
        avg_frequency: total_visits as f64 / n,
        avg_spend_per_transaction: total_spend / total_visits as f64,
    })
}

/// Month with the highest revenue, among months with any activity.
pub fn peak_month(monthly: &[MonthlyActivity]) -> Option<Extreme> {
    extreme_by(active_months(monthly), true)
}

/// Month with the lowest revenue, among months with any activity.
pub fn slowest_month(monthly: &[MonthlyActivity]) -> Option<Extreme> {
    extreme_by(active_months(monthly), false)
}

/// Weekday with the most transactions, among days with any activity.
pub fn busiest_weekday(weekdays: &[WeekdayActivity]) -> Option<Extreme> {
    extreme_by(active_weekdays(weekdays), true)
}

/// Weekday with the fewest transactions, among days with any activity.
pub fn quietest_weekday(weekdays: &[WeekdayActivity]) -> Option<Extreme> {
    extreme_by(active_weekdays(weekdays), false)
}

/// Highest-revenue product; the head of the ranked table.
pub fn top_product(products: &[ProductRevenue]) -> Option<Extreme> {
    products.first().map(|p| Extreme {
        label: p.item.clone(),
        value: p.total_revenue,
    })
}

/// Product with the most transactions.
pub fn most_popular_product(popularity: &[ProductPopularity]) -> Option<Extreme> {
    extreme_by(
        popularity
            .iter()
            .map(|p| (p.item.clone(), p.transactions as f64)),
        true,
    )
}

/// Product with the fewest transactions.
pub fn least_popular_product(popularity: &[ProductPopularity]) -> Option<Extreme> {
    extreme_by(
        popularity
            .iter()
            .map(|p| (p.item.clone(), p.transactions as f64)),
        false,
    )
}

fn active_months(monthly: &[MonthlyActivity]) -> impl Iterator<Item = (String, f64)> + '_ {
    monthly
        .iter()
        .filter(|m| m.transactions > 0)
        .map(|m| (m.month.clone(), m.revenue))
}

fn active_weekdays(weekdays: &[WeekdayActivity]) -> impl Iterator<Item = (String, f64)> + '_ {
    weekdays
        .iter()
        .filter(|d| d.transactions > 0)
        .map(|d| (d.day.clone(), d.transactions as f64))
}

/// First entry wins on ties, mirroring an index-of-max scan.
fn extreme_by<I>(entries: I, prefer_greater: bool) -> Option<Extreme>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut best: Option<Extreme> = None;
    for (label, value) in entries {
        let better = match &best {
            None => true,
            Some(b) => {
                if prefer_greater {
                    value > b.value
                } else {
                    value < b.value
                }
            }
        };
        if better {
            best = Some(Extreme { label, value });
        }
    }
    best
}

/// Everything the presentation layer consumes, bundled for export.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub products: Vec<ProductRevenue>,
    pub customers: Vec<CustomerValue>,
    pub tiers: Vec<TierBreakdown>,
    pub segments: Vec<SegmentBreakdown>,
    pub monthly: Vec<MonthlyActivity>,
    pub weekdays: Vec<WeekdayActivity>,
    pub popularity: Vec<ProductPopularity>,
    pub top_products: Vec<ProductRevenue>,
    pub top_quintile_revenue_share: f64,
    pub retention: Option<RetentionMetrics>,
    pub charts: ChartSet,
}

impl AnalysisReport {
    /// Assemble the full report from the raw log and both analysis tables.
    pub fn assemble(
        transactions: &[Transaction],
        products: &[ProductRevenue],
        customers: &[CustomerValue],
        top_n: usize,
    ) -> Self {
        let tiers = tier_rollup(products);
        let segments = segment_rollup(customers);
        let monthly = monthly_activity(transactions);
        let charts = chart::chart_set(products, customers, &tiers, &segments, &monthly);
        AnalysisReport {
            products: products.to_vec(),
            customers: customers.to_vec(),
            weekdays: weekday_activity(transactions),
            popularity: product_popularity(transactions),
            top_products: top_products(products, top_n),
            top_quintile_revenue_share: top_quintile_share(products),
            retention: retention_metrics(customers),
            tiers,
            segments,
            monthly,
            charts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn product(item: &str, revenue: f64, share: f64, tier: Tier) -> ProductRevenue {
        ProductRevenue {
            item: item.to_string(),
            total_revenue: revenue,
            cumulative_share: share,
            tier,
        }
    }

    fn customer(name: &str, recency: i64, frequency: u64, monetary: f64, segment: Segment) -> CustomerValue {
        CustomerValue {
            customer: name.to_string(),
            recency_days: recency,
            frequency,
            monetary,
            segment,
        }
    }

    fn tx(item: &str, date: (i32, u32, u32), price: f64) -> Transaction {
        Transaction {
            key: "1".to_string(),
            item: item.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            price,
            customer: "alice".to_string(),
        }
    }

    #[test]
    fn test_tier_rollup_covers_empty_tiers() {
        let products = vec![
            product("a", 80.0, 0.8, Tier::A),
            product("b", 20.0, 1.0, Tier::C),
        ];
        let rollup = tier_rollup(&products);

        assert_eq!(rollup.len(), 3);
        assert_eq!(rollup[0].tier, Tier::A);
        assert!((rollup[0].revenue - 80.0).abs() < 1e-12);
        assert_eq!(rollup[1].products, 0);
        assert_eq!(rollup[1].revenue, 0.0);
        assert!((rollup[2].revenue_share - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_segment_rollup_reports_empty_segments_as_undefined() {
        let customers = vec![
            customer("a", 5, 4, 200.0, Segment::HighValue),
            customer("b", 30, 1, 20.0, Segment::AtRisk),
        ];
        let rollup = segment_rollup(&customers);

        assert_eq!(rollup.len(), 4);
        let loyal = rollup.iter().find(|s| s.segment == Segment::Loyal).unwrap();
        assert_eq!(loyal.customers, 0);
        assert_eq!(loyal.avg_recency_days, None);

        let high = rollup
            .iter()
            .find(|s| s.segment == Segment::HighValue)
            .unwrap();
        assert_eq!(high.customers, 1);
        assert_eq!(high.avg_spend_per_visit, Some(50.0));
    }

    #[test]
    fn test_monthly_activity_is_calendar_ordered() {
        let transactions = vec![
            tx("espresso", (2024, 11, 3), 5.0),
            tx("latte", (2024, 2, 14), 4.0),
            tx("latte", (2024, 2, 20), 6.0),
        ];
        let monthly = monthly_activity(&transactions);

        assert_eq!(monthly.len(), 12);
        assert_eq!(monthly[0].month, "January");
        assert_eq!(monthly[0].transactions, 0);
        assert_eq!(monthly[1].transactions, 2);
        assert!((monthly[1].revenue - 10.0).abs() < 1e-12);
        assert_eq!(monthly[10].transactions, 1);
    }

    #[test]
    fn test_month_extrema_skip_inactive_months() {
        let transactions = vec![
            tx("espresso", (2024, 2, 14), 4.0),
            tx("latte", (2024, 11, 3), 5.0),
        ];
        let monthly = monthly_activity(&transactions);

        assert_eq!(peak_month(&monthly).unwrap().label, "November");
        assert_eq!(slowest_month(&monthly).unwrap().label, "February");
    }

    #[test]
    fn test_weekday_activity() {
        // 2024-03-04 is a Monday, 2024-03-09 a Saturday.
        let transactions = vec![
            tx("espresso", (2024, 3, 4), 3.0),
            tx("espresso", (2024, 3, 4), 3.0),
            tx("latte", (2024, 3, 9), 4.0),
        ];
        let weekdays = weekday_activity(&transactions);

        assert_eq!(weekdays[0].day, "Monday");
        assert_eq!(weekdays[0].transactions, 2);
        assert_eq!(weekdays[5].transactions, 1);
        assert_eq!(busiest_weekday(&weekdays).unwrap().label, "Monday");
        assert_eq!(quietest_weekday(&weekdays).unwrap().label, "Saturday");
    }

    #[test]
    fn test_product_popularity_sorted_ascending() {
        let transactions = vec![
            tx("espresso", (2024, 3, 4), 3.0),
            tx("espresso", (2024, 3, 5), 3.0),
            tx("latte", (2024, 3, 6), 4.0),
        ];
        let popularity = product_popularity(&transactions);

        assert_eq!(popularity[0].item, "latte");
        assert_eq!(popularity[1].item, "espresso");
        assert_eq!(most_popular_product(&popularity).unwrap().label, "espresso");
        assert_eq!(least_popular_product(&popularity).unwrap().label, "latte");
    }

    #[test]
    fn test_retention_metrics() {
        let customers = vec![
            customer("a", 2, 4, 100.0, Segment::HighValue),
            customer("b", 10, 1, 30.0, Segment::LowValue),
        ];
        let metrics = retention_metrics(&customers).unwrap();

        assert!((metrics.avg_recency_days - 6.0).abs() < 1e-12);
        assert!((metrics.avg_frequency - 2.5).abs() < 1e-12);
        assert!((metrics.avg_spend_per_transaction - 26.0).abs() < 1e-12);
    }

    #[test]
    fn test_retention_metrics_empty() {
        assert_eq!(retention_metrics(&[]), None);
    }
}
