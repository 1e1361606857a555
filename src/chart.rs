//! Declarative chart descriptions handed to the presentation layer.
//!
//! Data plus encoding only; rendering to pixels happens in `viz` (or in
//! whatever front end consumes the serialized form).

use serde::Serialize;

use crate::abc::{ProductRevenue, Tier};
use crate::frm::{CustomerValue, Segment};
use crate::report::{MonthlyActivity, SegmentBreakdown, TierBreakdown};

/// Fill color for a tier: green, amber, red down the revenue ranking.
pub fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::A => "#008000",
        Tier::B => "#ffa500",
        Tier::C => "#ff0000",
    }
}

/// Fill color for a segment.
pub fn segment_color(segment: Segment) -> &'static str {
    match segment {
        Segment::HighValue => "#2ecc71",
        Segment::Loyal => "#3498db",
        Segment::AtRisk => "#e74c3c",
        Segment::LowValue => "#f1c40f",
    }
}

/// A single bar in a categorical bar chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    /// Hex fill color, e.g. "#2ecc71".
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<BarDatum>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

/// A point on a line chart; `rank` is the 1-based x position.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinePoint {
    pub rank: usize,
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<LinePoint>,
}

/// One customer in the 3-axis value scatter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScatterPoint {
    /// Per-point label.
    pub customer: String,
    pub recency_days: f64,
    pub frequency: f64,
    pub monetary: f64,
    pub segment: Segment,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scatter3d {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub z_label: String,
    pub points: Vec<ScatterPoint>,
}

/// The full chart inventory for one analysis run.
#[derive(Clone, Debug, Serialize)]
pub struct ChartSet {
    pub tier_revenue: BarChart,
    pub segment_counts: BarChart,
    pub tier_products_pie: PieChart,
    pub cumulative_revenue: LineChart,
    pub monthly_revenue: LineChart,
    pub value_scatter: Scatter3d,
}

/// Build every chart description from the analysis tables.
pub fn chart_set(
    products: &[ProductRevenue],
    customers: &[CustomerValue],
    tiers: &[TierBreakdown],
    segments: &[SegmentBreakdown],
    monthly: &[MonthlyActivity],
) -> ChartSet {
    ChartSet {
        tier_revenue: tier_revenue_bar(tiers),
        segment_counts: segment_count_bar(segments),
        tier_products_pie: tier_products_pie(tiers),
        cumulative_revenue: cumulative_revenue_line(products),
        monthly_revenue: monthly_revenue_line(monthly),
        value_scatter: value_scatter(customers),
    }
}

/// Total revenue per tier.
pub fn tier_revenue_bar(tiers: &[TierBreakdown]) -> BarChart {
    BarChart {
        title: "ABC Analysis".to_string(),
        x_label: "Category".to_string(),
        y_label: "Total Sales ($)".to_string(),
        bars: tiers
            .iter()
            .map(|t| BarDatum {
                label: t.tier.to_string(),
                value: t.revenue,
                color: tier_color(t.tier).to_string(),
            })
            .collect(),
    }
}

/// Customer count per segment.
pub fn segment_count_bar(segments: &[SegmentBreakdown]) -> BarChart {
    BarChart {
        title: "Customer Segmentation (FRM)".to_string(),
        x_label: "Segment".to_string(),
        y_label: "Number of Customers".to_string(),
        bars: segments
            .iter()
            .map(|s| BarDatum {
                label: s.segment.to_string(),
                value: s.customers as f64,
                color: segment_color(s.segment).to_string(),
            })
            .collect(),
    }
}

/// Product count per tier. Counts, not revenue: the revenue view is the bar
/// chart above.
pub fn tier_products_pie(tiers: &[TierBreakdown]) -> PieChart {
    PieChart {
        title: "Products by ABC Category".to_string(),
        slices: tiers
            .iter()
            .map(|t| PieSlice {
                label: t.tier.to_string(),
                value: t.products as f64,
                color: tier_color(t.tier).to_string(),
            })
            .collect(),
    }
}

/// Running revenue over the ranked product list.
pub fn cumulative_revenue_line(products: &[ProductRevenue]) -> LineChart {
    let mut running = 0.0;
    LineChart {
        title: "Cumulative Revenue Contribution".to_string(),
        x_label: "Products".to_string(),
        y_label: "Cumulative Revenue ($)".to_string(),
        points: products
            .iter()
            .enumerate()
            .map(|(i, p)| {
                running += p.total_revenue;
                LinePoint {
                    rank: i + 1,
                    label: p.item.clone(),
                    value: running,
                }
            })
            .collect(),
    }
}

/// Revenue per calendar month.
pub fn monthly_revenue_line(monthly: &[MonthlyActivity]) -> LineChart {
    LineChart {
        title: "Monthly Sales Trend".to_string(),
        x_label: "Month".to_string(),
        y_label: "Total Sales ($)".to_string(),
        points: monthly
            .iter()
            .enumerate()
            .map(|(i, m)| LinePoint {
                rank: i + 1,
                label: m.month.clone(),
                value: m.revenue,
            })
            .collect(),
    }
}

/// Recency/frequency/monetary scatter, one point per customer, colored and
/// symboled by segment.
pub fn value_scatter(customers: &[CustomerValue]) -> Scatter3d {
    Scatter3d {
        title: "Customer Value Segments".to_string(),
        x_label: "Recency (Days)".to_string(),
        y_label: "Frequency".to_string(),
        z_label: "Monetary ($)".to_string(),
        points: customers
            .iter()
            .map(|c| ScatterPoint {
                customer: c.customer.clone(),
                recency_days: c.recency_days as f64,
                frequency: c.frequency as f64,
                monetary: c.monetary,
                segment: c.segment,
                color: segment_color(c.segment).to_string(),
            })
            .collect(),
    }
}
