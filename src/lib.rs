//! Brewforge: retail transaction analytics
//!
//! This library computes ABC revenue-concentration tiers and FRM (frequency,
//! recency, monetary) customer segments from a transaction log, plus the
//! rollups, extrema, and chart descriptions a presentation layer renders.

pub mod abc;
pub mod chart;
pub mod cli;
pub mod data;
pub mod error;
pub mod frm;
pub mod report;
pub mod viz;

// Re-export public items for easier access
pub use abc::{abc_analysis, ProductRevenue, Tier};
pub use cli::Args;
pub use data::{load_transactions, Transaction};
pub use error::{AnalysisError, AnalysisResult};
pub use frm::{frm_analysis, CustomerValue, Segment};
pub use report::AnalysisReport;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
