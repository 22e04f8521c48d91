//! Paired-asset regression strategy.
//!
//! Fits `y = a*x + b` between a companion price `x` and the primary price `y`
//! from running sums. During warm-up the fit covers every day seen so far;
//! afterwards it covers a fixed trailing window. Each steady-state day the
//! primary is bought when it trades under the forecast and sold when it
//! trades over it, sized by the percent forecast error.

use log::info;

use super::error::StocksimError;
use super::ledger::{Account, OrderRequest};
use super::price_table::PriceTable;
use super::simulation::{Run, SimulationResult};
use super::strategy::RegressionParams;

pub const STRATEGY_NAME: &str = "regression";

/// Running sums of a simple linear regression of `y` on `x`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegressionState {
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_xx: f64,
    pub sum_yy: f64,
    pub sum_xy: f64,
    pub slope: f64,
    pub intercept: f64,
}

impl RegressionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sums over every pair in `points`, with no sliding.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let mut state = Self::new();
        for &(x, y) in points {
            state.add(x, y);
        }
        state
    }

    pub fn add(&mut self, x: f64, y: f64) {
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xx += x * x;
        self.sum_yy += y * y;
        self.sum_xy += x * y;
    }

    /// Replaces the oldest pair of the window with the newest.
    pub fn slide(&mut self, (x_old, y_old): (f64, f64), (x_new, y_new): (f64, f64)) {
        self.sum_x += x_new - x_old;
        self.sum_y += y_new - y_old;
        self.sum_xx += x_new * x_new - x_old * x_old;
        self.sum_yy += y_new * y_new - y_old * y_old;
        self.sum_xy += x_new * y_new - x_old * y_old;
    }

    /// Recomputes slope and intercept for `n` samples. `epsilon` keeps the
    /// denominator away from zero when `x` is constant.
    pub fn refit(&mut self, n: usize, epsilon: f64) {
        let n = n as f64;
        let denominator = n * self.sum_xx - self.sum_x * self.sum_x + epsilon;
        self.slope = (n * self.sum_xy - self.sum_y * self.sum_x) / denominator;
        self.intercept = (self.sum_y * self.sum_xx - self.sum_x * self.sum_xy) / denominator;
    }

    pub fn forecast(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Absolute forecast error as a percentage of `actual`.
pub fn percent_difference(forecast: f64, actual: f64) -> f64 {
    (forecast - actual).abs() / actual * 100.0
}

pub fn run_regression(
    primary: &PriceTable,
    companion: &PriceTable,
    params: &RegressionParams,
    initial: Account,
) -> Result<SimulationResult, StocksimError> {
    let (run, _) = run_regression_with_state(primary, companion, params, initial)?;
    Ok(run)
}

/// Same as [`run_regression`], also returning the final regression state.
pub fn run_regression_with_state(
    primary: &PriceTable,
    companion: &PriceTable,
    params: &RegressionParams,
    initial: Account,
) -> Result<(SimulationResult, RegressionState), StocksimError> {
    let last_day = primary.day_count();
    if companion.day_count() < last_day {
        return Err(StocksimError::MisalignedTables {
            primary: last_day,
            companion: companion.day_count(),
        });
    }

    let column = params.column.as_str();
    let window = params.window;
    let pair = |day: usize| -> Result<(f64, f64), StocksimError> {
        Ok((companion.price(column, day)?, primary.price(column, day)?))
    };

    let mut run = Run::new(STRATEGY_NAME, initial);
    let mut state = RegressionState::new();

    for day in 1..=last_day {
        let (x, y) = pair(day)?;

        if day <= window {
            state.add(x, y);
            state.refit(day, params.epsilon);
            continue;
        }

        if day == last_day {
            let held = run.account().shares;
            run.place(day, primary.label(day), OrderRequest::sell(held, y));
            break;
        }

        let predicted = state.forecast(x);
        let quantity = params.trade_size(percent_difference(predicted, y));
        if y < predicted {
            run.place(day, primary.label(day), OrderRequest::buy(quantity, y));
        } else if y > predicted {
            run.place(day, primary.label(day), OrderRequest::sell(quantity, y));
        }

        state.slide(pair(day - window)?, (x, y));
        state.refit(window, params.epsilon);
    }

    let result = run.finish();
    info!(
        "{}: {} days, slope {:.4}, intercept {:.4}, {} fills, {} rejections, cash {:.2}, shares {}",
        STRATEGY_NAME,
        last_day,
        state.slope,
        state.intercept,
        result.fills().count(),
        result.rejections().count(),
        result.account.cash,
        result.account.shares
    );
    Ok((result, state))
}
