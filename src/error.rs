//! Analysis error types.
//!
//! Every failure mode has a named variant. No stringly-typed errors. Each of
//! these is terminal for the analysis call that raised it: the caller gets no
//! partial tables, and retrying without new input cannot succeed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("required column missing from input: {0}")]
    MissingColumn(String),

    #[error("no transaction records to analyze")]
    EmptyInput,

    #[error("total revenue is zero; revenue tiers are undefined")]
    DegenerateRevenue,

    #[error("row {row}: unparseable date {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("failed to read input table: {0}")]
    Csv(#[from] polars::prelude::PolarsError),
}

/// Result type alias for the analysis core.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
