//! Plain-text summary report.

use std::io::Write;

use crate::domain::error::StocksimError;
use crate::domain::simulation::SimulationResult;
use crate::ports::report_port::ReportPort;

/// Writes one `Cash balance: …, Stocks owned: …` line per strategy run.
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn format_summary(result: &SimulationResult) -> String {
    let (shares, cash) = result.final_position();
    format!("Cash balance: {:.2}, Stocks owned: {}", cash, shares)
}

impl<W: Write> ReportPort for ConsoleReport<W> {
    fn write_summary(&mut self, result: &SimulationResult) -> Result<(), StocksimError> {
        writeln!(self.out, "{}", format_summary(result))?;
        Ok(())
    }
}
