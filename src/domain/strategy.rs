//! Strategy parameters and simulation configuration.

use std::path::Path;

pub const DEFAULT_INITIAL_CASH: f64 = 1000.0;
pub const DEFAULT_PRICE_COLUMN: &str = "open";

#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageParams {
    pub column: String,
    pub window: usize,
    pub trade_size: i64,
    pub buy_ratio: f64,
    pub sell_ratio: f64,
}

impl Default for MovingAverageParams {
    fn default() -> Self {
        MovingAverageParams {
            column: DEFAULT_PRICE_COLUMN.to_string(),
            window: 20,
            trade_size: 10,
            buy_ratio: 0.95,
            sell_ratio: 1.05,
        }
    }
}

/// Parameters of the paired-asset regression strategy.
///
/// Trade size is `min(max_trade, floor(size_slope * diff_pct + size_offset))`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionParams {
    pub column: String,
    pub window: usize,
    pub epsilon: f64,
    pub max_trade: i64,
    pub size_slope: f64,
    pub size_offset: f64,
}

impl Default for RegressionParams {
    fn default() -> Self {
        RegressionParams {
            column: DEFAULT_PRICE_COLUMN.to_string(),
            window: 20,
            epsilon: 0.0001,
            max_trade: 10,
            size_slope: 1.25,
            size_offset: 3.75,
        }
    }
}

impl RegressionParams {
    pub fn trade_size(&self, diff_pct: f64) -> i64 {
        let scaled = (self.size_slope * diff_pct + self.size_offset).floor() as i64;
        scaled.min(self.max_trade)
    }
}

/// Symmetric primary/companion file pairs for the regression strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanionMap {
    pairs: Vec<(String, String)>,
}

impl Default for CompanionMap {
    fn default() -> Self {
        CompanionMap {
            pairs: vec![("AAPL.csv".to_string(), "MSFT.csv".to_string())],
        }
    }
}

impl CompanionMap {
    pub fn empty() -> Self {
        CompanionMap { pairs: Vec::new() }
    }

    pub fn with_pair(mut self, a: &str, b: &str) -> Self {
        self.insert(a, b);
        self
    }

    /// Adds a pair, replacing any earlier pair that mentions either file.
    pub fn insert(&mut self, a: &str, b: &str) {
        self.pairs
            .retain(|(x, y)| x != a && y != a && x != b && y != b);
        self.pairs.push((a.to_string(), b.to_string()));
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Companion of `primary`. Matches the full name first, then the file
    /// name component so `data/AAPL.csv` resolves through `AAPL.csv`.
    pub fn resolve(&self, primary: &str) -> Option<String> {
        if let Some(found) = self.lookup(primary) {
            return Some(found.to_string());
        }
        let path = Path::new(primary);
        let name = path.file_name()?.to_str()?;
        let companion = self.lookup(name)?;
        Some(match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                dir.join(companion).to_string_lossy().into_owned()
            }
            _ => companion.to_string(),
        })
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find_map(|(a, b)| {
            if a == name {
                Some(b.as_str())
            } else if b == name {
                Some(a.as_str())
            } else {
                None
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_cash: f64,
    pub moving_average: MovingAverageParams,
    pub regression: RegressionParams,
    pub companions: CompanionMap,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_cash: DEFAULT_INITIAL_CASH,
            moving_average: MovingAverageParams::default(),
            regression: RegressionParams::default(),
            companions: CompanionMap::default(),
        }
    }
}
