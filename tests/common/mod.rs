#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use stocksim::adapters::csv_adapter::parse_price_table;
use stocksim::domain::error::StocksimError;
pub use stocksim::domain::price_table::PriceTable;
use stocksim::ports::data_port::DataPort;

pub struct MockDataPort {
    pub tables: HashMap<String, PriceTable>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_table(mut self, name: &str, table: PriceTable) -> Self {
        self.tables.insert(name.to_string(), table);
        self
    }

    pub fn with_error(mut self, name: &str, reason: &str) -> Self {
        self.errors.insert(name.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_table(&self, name: &str) -> Result<PriceTable, StocksimError> {
        if let Some(reason) = self.errors.get(name) {
            return Err(StocksimError::DataUnavailable {
                path: name.to_string(),
                reason: reason.clone(),
            });
        }
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| StocksimError::DataUnavailable {
                path: name.to_string(),
                reason: "not found".into(),
            })
    }
}

/// CSV text in the Yahoo-style layout with the given opens; the other
/// prices are derived from the open.
pub fn csv_from_opens(opens: &[f64]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Adj_Close,Volume\n");
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for (i, open) in opens.iter().enumerate() {
        let date = start + chrono::Duration::days(i as i64);
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            date.format("%Y-%m-%d"),
            open,
            open + 1.0,
            open - 1.0,
            open + 0.5,
            open + 0.25,
            1000 + i
        ));
    }
    out
}

pub fn table_from_opens(opens: &[f64]) -> PriceTable {
    parse_price_table(csv_from_opens(opens).as_bytes()).unwrap()
}

pub fn write_csv(dir: &Path, name: &str, opens: &[f64]) {
    fs::write(dir.join(name), csv_from_opens(opens)).unwrap();
}

/// Average of `column` over the `window` days ending at `day`, or over all
/// days so far while `day < window`, summed from scratch.
pub fn trailing_average(table: &PriceTable, column: &str, day: usize, window: usize) -> f64 {
    let start = day.saturating_sub(window) + 1;
    let sum: f64 = (start..=day).map(|d| table.price(column, d).unwrap()).sum();
    sum / (day + 1 - start) as f64
}

/// 20 flat days at `base`, then `tail`.
pub fn flat_then(base: f64, tail: &[f64]) -> Vec<f64> {
    let mut opens = vec![base; 20];
    opens.extend_from_slice(tail);
    opens
}

/// Deterministic wavy series for longer runs.
pub fn wave(count: usize, base: f64, amplitude: f64, phase: f64) -> Vec<f64> {
    (0..count)
        .map(|i| base + amplitude * ((i as f64) * 0.3 + phase).sin())
        .collect()
}
