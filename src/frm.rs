//! FRM (frequency, recency, monetary) customer segmentation.
//!
//! Each customer gets three behavioral metrics and a segment label assigned
//! by comparing the metrics against population medians. Recency is measured
//! from the day after the last observed activity in the whole table.

use std::fmt;

use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

use crate::data::Transaction;
use crate::error::{AnalysisError, AnalysisResult};

/// Behavioral segment label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Segment {
    #[serde(rename = "High Value")]
    HighValue,
    #[serde(rename = "Loyal")]
    Loyal,
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "Low Value")]
    LowValue,
}

impl Segment {
    /// All segments, in reporting order.
    pub const ALL: [Segment; 4] = [
        Segment::HighValue,
        Segment::Loyal,
        Segment::AtRisk,
        Segment::LowValue,
    ];
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::HighValue => write!(f, "High Value"),
            Segment::Loyal => write!(f, "Loyal"),
            Segment::AtRisk => write!(f, "At Risk"),
            Segment::LowValue => write!(f, "Low Value"),
        }
    }
}

/// One customer's value metrics and segment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerValue {
    pub customer: String,
    /// Whole days between the customer's last purchase and the reference
    /// date (day after the last activity in the table). At least 1.
    pub recency_days: i64,
    /// Number of transactions, at least 1.
    pub frequency: u64,
    /// Total spend across all transactions.
    pub monetary: f64,
    pub segment: Segment,
}

/// Population medians the segment rule compares against.
struct Thresholds {
    recency: f64,
    frequency: f64,
    monetary: f64,
}

/// Segment customers by frequency, recency, and monetary value.
///
/// The rule chain is evaluated in order with first match winning:
/// High Value (above both the frequency and monetary medians), then Loyal
/// (above the frequency median), then At Risk (above the recency median),
/// then Low Value. A frequent buyer with stale recency is therefore Loyal,
/// never At Risk.
///
/// Customers are emitted in first-encounter order.
pub fn frm_analysis(transactions: &[Transaction]) -> AnalysisResult<Vec<CustomerValue>> {
    if transactions.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    // Recency is measured as of the day after the last observed activity.
    let mut last_activity = transactions[0].date;
    for tx in &transactions[1..] {
        if tx.date > last_activity {
            last_activity = tx.date;
        }
    }
    let reference_date = last_activity + Duration::days(1);

    // Per-customer: transaction count, total spend, most recent purchase.
    let mut by_customer: IndexMap<String, (u64, f64, NaiveDate)> = IndexMap::new();
    for tx in transactions {
        let entry = by_customer
            .entry(tx.customer.clone())
            .or_insert((0, 0.0, tx.date));
        entry.0 += 1;
        entry.1 += tx.price;
        if tx.date > entry.2 {
            entry.2 = tx.date;
        }
    }

    let metrics: Vec<(String, i64, u64, f64)> = by_customer
        .into_iter()
        .map(|(customer, (frequency, monetary, last))| {
            let recency_days = (reference_date - last).num_days();
            (customer, recency_days, frequency, monetary)
        })
        .collect();

    let thresholds = Thresholds {
        recency: median(metrics.iter().map(|m| m.1 as f64).collect()),
        frequency: median(metrics.iter().map(|m| m.2 as f64).collect()),
        monetary: median(metrics.iter().map(|m| m.3).collect()),
    };

    Ok(metrics
        .into_iter()
        .map(|(customer, recency_days, frequency, monetary)| {
            let segment = classify(
                frequency as f64,
                monetary,
                recency_days as f64,
                &thresholds,
            );
            CustomerValue {
                customer,
                recency_days,
                frequency,
                monetary,
                segment,
            }
        })
        .collect())
}

/// First match wins; the comparisons are strict, so a customer sitting
/// exactly on every median is Low Value.
fn classify(frequency: f64, monetary: f64, recency: f64, t: &Thresholds) -> Segment {
    if frequency > t.frequency && monetary > t.monetary {
        Segment::HighValue
    } else if frequency > t.frequency {
        Segment::Loyal
    } else if recency > t.recency {
        Segment::AtRisk
    } else {
        Segment::LowValue
    }
}

/// Median with the standard mean-of-two convention for even counts.
/// Callers guarantee a non-empty input.
fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(key: &str, customer: &str, date: (i32, u32, u32), price: f64) -> Transaction {
        Transaction {
            key: key.to_string(),
            item: "espresso".to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            price,
            customer: customer.to_string(),
        }
    }

    #[test]
    fn test_classify_rule_order() {
        let t = Thresholds {
            recency: 21.0,
            frequency: 3.0,
            monetary: 275.0,
        };
        assert_eq!(classify(5.0, 500.0, 2.0, &t), Segment::HighValue);
        assert_eq!(classify(1.0, 50.0, 40.0, &t), Segment::AtRisk);
        // Above the frequency median with stale recency: Loyal wins.
        assert_eq!(classify(5.0, 100.0, 40.0, &t), Segment::Loyal);
        assert_eq!(classify(1.0, 50.0, 10.0, &t), Segment::LowValue);
    }

    #[test]
    fn test_median_conventions() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), 2.5);
        assert_eq!(median(vec![7.0]), 7.0);
    }

    #[test]
    fn test_two_customer_segmentation() {
        // Frequent high spender with recent activity vs. a one-off buyer
        // who went quiet 40 days before the reference date.
        let mut transactions = vec![
            tx("1", "c1", (2024, 2, 10), 100.0),
            tx("2", "c1", (2024, 3, 14), 100.0),
            tx("3", "c1", (2024, 4, 2), 100.0),
            tx("4", "c1", (2024, 5, 20), 100.0),
            tx("5", "c1", (2024, 6, 9), 100.0),
        ];
        transactions.push(tx("6", "c2", (2024, 4, 30), 50.0));

        let customers = frm_analysis(&transactions).unwrap();
        assert_eq!(customers.len(), 2);

        let c1 = &customers[0];
        assert_eq!(c1.customer, "c1");
        assert_eq!(c1.frequency, 5);
        assert!((c1.monetary - 500.0).abs() < 1e-12);
        // Reference date is 2024-06-10, the day after the last purchase.
        assert_eq!(c1.recency_days, 1);
        assert_eq!(c1.segment, Segment::HighValue);

        let c2 = &customers[1];
        assert_eq!(c2.frequency, 1);
        assert_eq!(c2.recency_days, 41);
        assert_eq!(c2.segment, Segment::AtRisk);
    }

    #[test]
    fn test_single_customer_is_low_value() {
        // All medians equal the customer's own metrics, so every strict
        // comparison fails.
        let transactions = vec![
            tx("1", "solo", (2024, 3, 1), 10.0),
            tx("2", "solo", (2024, 3, 8), 12.0),
        ];
        let customers = frm_analysis(&transactions).unwrap();

        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].segment, Segment::LowValue);
    }

    #[test]
    fn test_frequency_matches_transaction_count() {
        let transactions = vec![
            tx("1", "a", (2024, 1, 5), 3.0),
            tx("2", "b", (2024, 1, 6), 4.0),
            tx("3", "a", (2024, 1, 7), 5.0),
            tx("4", "a", (2024, 1, 8), 6.0),
        ];
        let customers = frm_analysis(&transactions).unwrap();

        let a = customers.iter().find(|c| c.customer == "a").unwrap();
        let b = customers.iter().find(|c| c.customer == "b").unwrap();
        assert_eq!(a.frequency, 3);
        assert_eq!(b.frequency, 1);
    }

    #[test]
    fn test_every_customer_gets_a_segment() {
        let transactions: Vec<Transaction> = (0..17)
            .map(|i| {
                tx(
                    &format!("{i}"),
                    &format!("customer-{}", i % 7),
                    (2024, 1 + (i % 6) as u32, 1 + i as u32),
                    (i as f64) * 1.75,
                )
            })
            .collect();
        let customers = frm_analysis(&transactions).unwrap();

        assert_eq!(customers.len(), 7);
        for c in &customers {
            assert!(Segment::ALL.contains(&c.segment));
            assert!(c.recency_days >= 1);
            assert!(c.frequency >= 1);
        }
    }

    #[test]
    fn test_empty_input() {
        let err = frm_analysis(&[]).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));
    }
}
