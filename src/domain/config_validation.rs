//! Configuration validation.
//!
//! Every key is optional; present keys must parse and fall in range.

use crate::domain::error::StocksimError;
use crate::ports::config_port::ConfigPort;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    validate_initial_cash(config)?;
    validate_moving_average(config)?;
    validate_regression(config)?;
    validate_companions(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> StocksimError {
    StocksimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Present values must parse as a finite `f64`; `nan` and `inf` are rejected.
fn ensure_numeric(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), StocksimError> {
    match config.get_string(section, key) {
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(()),
            Ok(_) => Err(invalid(section, key, &format!("{:?} is not finite", raw))),
            Err(_) => Err(invalid(section, key, &format!("{:?} is not a number", raw))),
        },
        None => Ok(()),
    }
}

fn ensure_integer(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), StocksimError> {
    match config.get_string(section, key) {
        Some(raw) if raw.trim().parse::<i64>().is_err() => {
            Err(invalid(section, key, &format!("{:?} is not an integer", raw)))
        }
        _ => Ok(()),
    }
}

fn ensure_column(config: &dyn ConfigPort, section: &str) -> Result<(), StocksimError> {
    match config.get_string(section, "column") {
        Some(c) if c.trim().is_empty() => Err(invalid(section, "column", "column must not be empty")),
        Some(c) if c != c.to_lowercase() => Err(invalid(
            section,
            "column",
            "column labels are stored lowercase",
        )),
        _ => Ok(()),
    }
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    ensure_numeric(config, "simulation", "initial_cash")?;
    let value = config.get_double("simulation", "initial_cash", 1.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "simulation",
            "initial_cash",
            "initial_cash must be positive",
        ));
    }
    Ok(())
}

fn validate_moving_average(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    let section = "moving_average";
    ensure_column(config, section)?;
    for key in ["window", "trade_size"] {
        ensure_integer(config, section, key)?;
        if config.get_int(section, key, 1) < 1 {
            return Err(invalid(section, key, &format!("{key} must be at least 1")));
        }
    }

    ensure_numeric(config, section, "buy_ratio")?;
    ensure_numeric(config, section, "sell_ratio")?;
    let buy = config.get_double(section, "buy_ratio", 0.95);
    let sell = config.get_double(section, "sell_ratio", 1.05);
    if !buy.is_finite() || buy <= 0.0 || buy > 1.0 {
        return Err(invalid(section, "buy_ratio", "buy_ratio must be in (0, 1]"));
    }
    if !sell.is_finite() || sell < 1.0 {
        return Err(invalid(section, "sell_ratio", "sell_ratio must be at least 1"));
    }
    Ok(())
}

fn validate_regression(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    let section = "regression";
    ensure_column(config, section)?;
    for key in ["window", "max_trade"] {
        ensure_integer(config, section, key)?;
        if config.get_int(section, key, 1) < 1 {
            return Err(invalid(section, key, &format!("{key} must be at least 1")));
        }
    }

    for key in ["epsilon", "size_slope", "size_offset"] {
        ensure_numeric(config, section, key)?;
    }
    let epsilon = config.get_double(section, "epsilon", 0.0001);
    if !epsilon.is_finite() || epsilon <= 0.0 {
        return Err(invalid(section, "epsilon", "epsilon must be positive"));
    }
    let size_slope = config.get_double(section, "size_slope", 1.25);
    if !size_slope.is_finite() || size_slope < 0.0 {
        return Err(invalid(section, "size_slope", "size_slope must be non-negative"));
    }
    if !config.get_double(section, "size_offset", 3.75).is_finite() {
        return Err(invalid(section, "size_offset", "size_offset must be finite"));
    }
    Ok(())
}

fn validate_companions(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    for (primary, companion) in config.section_entries("companions") {
        if companion.trim().is_empty() {
            return Err(StocksimError::ConfigMissing {
                section: "companions".to_string(),
                key: primary,
            });
        }
        if primary == companion {
            return Err(invalid(
                "companions",
                &primary,
                "a file cannot be its own companion",
            ));
        }
    }
    Ok(())
}
