//! Transaction ingestion and validation.
//!
//! The input is a delimited table with the columns `key, item, date, price,
//! customer`. Every cell is read as text and validated field by field, so a
//! malformed row is rejected with its row number instead of leaking NaNs or
//! negative revenue into the aggregates downstream.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["key", "item", "date", "price", "customer"];

/// One sale: an order line tying a product, a customer, and a price to a day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transaction {
    /// Opaque order identifier.
    pub key: String,
    /// Product name.
    pub item: String,
    /// Calendar day of the sale.
    pub date: NaiveDate,
    /// Sale amount, non-negative.
    pub price: f64,
    /// Opaque customer identifier.
    pub customer: String,
}

/// Load and validate a transaction table from a CSV file.
///
/// # Arguments
/// * `path` - Path to the CSV file
///
/// # Returns
/// * Validated transactions in file order
pub fn load_transactions(path: &str) -> AnalysisResult<Vec<Transaction>> {
    // Read every column as text; parsing happens per field below so that
    // errors carry the offending row.
    let df = CsvReader::from_path(path)?
        .has_header(true)
        .infer_schema(Some(0))
        .finish()?;

    transactions_from_frame(&df)
}

/// Validate an already-loaded table.
pub fn transactions_from_frame(df: &DataFrame) -> AnalysisResult<Vec<Transaction>> {
    let names = df.get_column_names();
    for required in REQUIRED_COLUMNS {
        if !names.contains(&required) {
            return Err(AnalysisError::MissingColumn(required.to_string()));
        }
    }

    if df.height() == 0 {
        return Err(AnalysisError::EmptyInput);
    }

    let keys = df.column("key")?.utf8()?;
    let items = df.column("item")?.utf8()?;
    let dates = df.column("date")?.utf8()?;
    let prices = df.column("price")?.utf8()?;
    let customers = df.column("customer")?.utf8()?;

    let mut transactions = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let key = required_field(keys.get(row), row, "key")?;
        let item = required_field(items.get(row), row, "item")?;
        let customer = required_field(customers.get(row), row, "customer")?;
        let date_text = required_field(dates.get(row), row, "date")?;
        let price_text = required_field(prices.get(row), row, "price")?;

        let date =
            NaiveDate::parse_from_str(date_text, "%Y-%m-%d").map_err(|_| {
                AnalysisError::InvalidDate {
                    row: row + 1,
                    value: date_text.to_string(),
                }
            })?;

        let price: f64 = price_text.parse().map_err(|_| AnalysisError::InvalidRow {
            row: row + 1,
            reason: format!("unparseable price {price_text:?}"),
        })?;
        if !price.is_finite() || price < 0.0 {
            return Err(AnalysisError::InvalidRow {
                row: row + 1,
                reason: format!("negative or non-finite price {price}"),
            });
        }

        transactions.push(Transaction {
            key: key.to_string(),
            item: item.to_string(),
            date,
            price,
            customer: customer.to_string(),
        });
    }

    Ok(transactions)
}

fn required_field<'a>(
    value: Option<&'a str>,
    row: usize,
    column: &str,
) -> AnalysisResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AnalysisError::InvalidRow {
            row: row + 1,
            reason: format!("missing {column} value"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "key,item,date,price,customer").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn test_load_valid_rows() {
        let file = create_test_csv(&[
            "1001,espresso,2024-03-04,3.50,alice",
            "1002,latte,2024-03-05,4.25,bob",
        ]);
        let transactions = load_transactions(file.path().to_str().unwrap()).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].item, "espresso");
        assert_eq!(transactions[0].price, 3.5);
        assert_eq!(
            transactions[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
        assert_eq!(transactions[1].customer, "bob");
    }

    #[test]
    fn test_missing_column_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "key,item,date,price").unwrap();
        writeln!(file, "1001,espresso,2024-03-04,3.50").unwrap();

        let err = load_transactions(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn(c) if c == "customer"));
    }

    #[test]
    fn test_empty_table_rejected() {
        let file = create_test_csv(&[]);
        let err = load_transactions(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));
    }

    #[test]
    fn test_bad_date_rejected() {
        let file = create_test_csv(&["1001,espresso,03/04/2024,3.50,alice"]);
        let err = load_transactions(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidDate { row: 1, .. }));
    }

    #[test]
    fn test_negative_price_rejected() {
        let file = create_test_csv(&[
            "1001,espresso,2024-03-04,3.50,alice",
            "1002,latte,2024-03-05,-4.25,bob",
        ]);
        let err = load_transactions(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRow { row: 2, .. }));
    }

    #[test]
    fn test_missing_customer_rejected() {
        let file = create_test_csv(&["1001,espresso,2024-03-04,3.50,"]);
        let err = load_transactions(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRow { row: 1, .. }));
    }
}
