//! ABC revenue-concentration analysis.
//!
//! Products are ranked by total revenue and assigned to tier A, B, or C by
//! their cumulative share of revenue, with boundaries at 0.80 and 0.95.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::data::Transaction;
use crate::error::{AnalysisError, AnalysisResult};

/// Cumulative-share boundaries, inclusive on the right: a product whose
/// running share lands exactly on a boundary belongs to the lower tier.
const TIER_A_BOUND: f64 = 0.80;
const TIER_B_BOUND: f64 = 0.95;

/// Revenue-contribution tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    A,
    B,
    C,
}

impl Tier {
    /// All tiers, in reporting order.
    pub const ALL: [Tier; 3] = [Tier::A, Tier::B, Tier::C];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::A => write!(f, "A"),
            Tier::B => write!(f, "B"),
            Tier::C => write!(f, "C"),
        }
    }
}

/// One product's revenue contribution, ranked among all products.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub item: String,
    pub total_revenue: f64,
    /// Running share of total revenue up to and including this product.
    pub cumulative_share: f64,
    pub tier: Tier,
}

/// Rank products by revenue and assign ABC tiers.
///
/// Output is ordered by descending revenue. Summed revenues that tie keep
/// the order in which their products first appear in the input; the sort is
/// stable, so reruns over the same table give identical rankings.
///
/// # Errors
/// * `EmptyInput` if there are no transactions
/// * `DegenerateRevenue` if every price is zero (cumulative share is 0/0)
pub fn abc_analysis(transactions: &[Transaction]) -> AnalysisResult<Vec<ProductRevenue>> {
    if transactions.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    // Group revenue by product, keeping first-encounter order.
    let mut revenue_by_item: IndexMap<String, f64> = IndexMap::new();
    for tx in transactions {
        *revenue_by_item.entry(tx.item.clone()).or_insert(0.0) += tx.price;
    }

    let total: f64 = revenue_by_item.values().sum();
    if total <= 0.0 {
        return Err(AnalysisError::DegenerateRevenue);
    }

    let mut ranked: Vec<(String, f64)> = revenue_by_item.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut records = Vec::with_capacity(ranked.len());
    let mut running = 0.0;
    for (item, revenue) in ranked {
        running += revenue;
        let share = running / total;
        let tier = if share <= TIER_A_BOUND {
            Tier::A
        } else if share <= TIER_B_BOUND {
            Tier::B
        } else {
            Tier::C
        };
        records.push(ProductRevenue {
            item,
            total_revenue: revenue,
            cumulative_share: share,
            tier,
        });
    }

    Ok(records)
}
