//! Columnar daily price table and column accessor.
//!
//! A table is a lowercase header plus one row per trading day. Column 0 is a
//! text identifier (usually the date), the last column is an integer volume and
//! everything in between is a decimal price. Days are 1-based: day 1 is the
//! first data row after the header.

use chrono::NaiveDate;

use super::error::StocksimError;

/// A single parsed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(String),
    Float(f64),
    Int(i64),
}

impl Field {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Field::Float(v) => Some(*v),
            Field::Int(v) => Some(*v as f64),
            Field::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    header: Vec<String>,
    rows: Vec<Vec<Field>>,
}

impl PriceTable {
    /// Builds a table from an already-lowercased header and typed rows.
    ///
    /// Every row must have the header's field count.
    pub fn new(header: Vec<String>, rows: Vec<Vec<Field>>) -> Result<Self, StocksimError> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != header.len())
        {
            return Err(StocksimError::MalformedRow {
                line: i + 2,
                reason: format!("expected {} fields, found {}", header.len(), row.len()),
            });
        }
        Ok(Self { header, rows })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Number of trading days (data rows, header excluded).
    pub fn day_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Result<usize, StocksimError> {
        self.header
            .iter()
            .position(|label| label == column)
            .ok_or_else(|| StocksimError::ColumnNotFound {
                column: column.to_string(),
            })
    }

    /// Value of `column` on `day`. The lookup is case-sensitive against the
    /// stored lowercase labels.
    pub fn access(&self, column: &str, day: usize) -> Result<&Field, StocksimError> {
        let index = self.column_index(column)?;
        let row = self.row(day)?;
        Ok(&row[index])
    }

    /// Numeric value of `column` on `day`. The integer column is widened.
    pub fn price(&self, column: &str, day: usize) -> Result<f64, StocksimError> {
        self.access(column, day)?
            .as_f64()
            .ok_or_else(|| StocksimError::ColumnType {
                column: column.to_string(),
                expected: "numeric".into(),
            })
    }

    pub fn text(&self, column: &str, day: usize) -> Result<&str, StocksimError> {
        self.access(column, day)?
            .as_str()
            .ok_or_else(|| StocksimError::ColumnType {
                column: column.to_string(),
                expected: "text".into(),
            })
    }

    /// The identifier of `day` parsed as an ISO date, if it is one.
    pub fn date(&self, day: usize) -> Option<NaiveDate> {
        let row = self.row(day).ok()?;
        let raw = row.first()?.as_str()?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    /// Raw identifier (column 0) of `day`.
    pub fn label(&self, day: usize) -> Option<&str> {
        self.row(day).ok()?.first()?.as_str()
    }

    fn row(&self, day: usize) -> Result<&[Field], StocksimError> {
        if day == 0 || day > self.rows.len() {
            return Err(StocksimError::IndexOutOfRange {
                day,
                days: self.rows.len(),
            });
        }
        Ok(&self.rows[day - 1])
    }
}
