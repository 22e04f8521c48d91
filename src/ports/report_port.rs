//! Result reporting port trait.

use crate::domain::error::StocksimError;
use crate::domain::simulation::SimulationResult;

/// Port for presenting the outcome of a strategy run.
pub trait ReportPort {
    fn write_summary(&mut self, result: &SimulationResult) -> Result<(), StocksimError>;

    /// Default implementation: one summary per result, in order.
    fn write_all(&mut self, results: &[SimulationResult]) -> Result<(), StocksimError> {
        for result in results {
            self.write_summary(result)?;
        }
        Ok(())
    }
}
