//! CSV file data adapter.
//!
//! The first line is the header; labels are lowercased and a trailing empty
//! label left by a trailing comma is dropped. Column 0 stays text, the last
//! column is an integer and every column in between is a float.

use crate::domain::error::StocksimError;
use crate::domain::price_table::{Field, PriceTable};
use crate::ports::data_port::DataPort;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_table(&self, name: &str) -> Result<PriceTable, StocksimError> {
        load_price_table(self.csv_path(name))
    }
}

pub fn load_price_table<P: AsRef<Path>>(path: P) -> Result<PriceTable, StocksimError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| StocksimError::DataUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_price_table(content.as_bytes())
}

/// Parses a whole CSV source. The first bad row aborts the load.
pub fn parse_price_table<R: Read>(reader: R) -> Result<PriceTable, StocksimError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = rdr.records();

    let header_record = loop {
        match records.next() {
            None => {
                return Err(StocksimError::MalformedHeader {
                    reason: "empty input".into(),
                });
            }
            Some(result) => {
                let record = result.map_err(|e| StocksimError::MalformedHeader {
                    reason: e.to_string(),
                })?;
                if !is_blank(&record) {
                    break record;
                }
            }
        }
    };

    let mut header: Vec<String> = header_record.iter().map(str::to_lowercase).collect();
    let trailing_comma = header.len() > 1 && header.last().is_some_and(|l| l.is_empty());
    if trailing_comma {
        header.pop();
    }
    if header.len() < 2 {
        return Err(StocksimError::MalformedHeader {
            reason: format!("expected at least 2 columns, found {}", header.len()),
        });
    }

    let mut rows = Vec::new();
    for result in records {
        let record = result.map_err(|e| StocksimError::MalformedRow {
            line: e.position().map(|p| p.line() as usize).unwrap_or(0),
            reason: e.to_string(),
        })?;
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let mut fields: Vec<&str> = record.iter().collect();
        if trailing_comma && fields.len() == header.len() + 1 && fields.last() == Some(&"") {
            fields.pop();
        }
        rows.push(parse_row(&fields, &header, line)?);
    }

    PriceTable::new(header, rows)
}

fn parse_row(fields: &[&str], header: &[String], line: usize) -> Result<Vec<Field>, StocksimError> {
    if fields.len() != header.len() {
        return Err(StocksimError::MalformedRow {
            line,
            reason: format!("expected {} fields, found {}", header.len(), fields.len()),
        });
    }

    let last = fields.len() - 1;
    let mut row = Vec::with_capacity(fields.len());
    row.push(Field::Text(fields[0].to_string()));

    for (i, raw) in fields.iter().enumerate().take(last).skip(1) {
        let value: f64 = raw.parse().map_err(|e| StocksimError::MalformedRow {
            line,
            reason: format!("invalid {} value {:?}: {}", header[i], raw, e),
        })?;
        row.push(Field::Float(value));
    }

    let volume: i64 = fields[last].parse().map_err(|e| StocksimError::MalformedRow {
        line,
        reason: format!("invalid {} value {:?}: {}", header[last], fields[last], e),
    })?;
    row.push(Field::Int(volume));

    Ok(row)
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(str::is_empty)
}
