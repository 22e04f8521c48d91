//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console_report::ConsoleReport;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_simulation_config;
use crate::domain::error::StocksimError;
use crate::domain::ledger::Account;
use crate::domain::moving_average::run_moving_average;
use crate::domain::regression::run_regression;
use crate::domain::simulation::SimulationResult;
use crate::domain::strategy::{
    CompanionMap, MovingAverageParams, RegressionParams, SimulationConfig, DEFAULT_INITIAL_CASH,
    DEFAULT_PRICE_COLUMN,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const FILENAME_PROMPT: &str = "Enter a filename for stock data (CSV format): ";

#[derive(Parser, Debug)]
#[command(name = "stocksim", about = "Rule-based stock trading simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the moving-average and regression strategies on a price file
    Run {
        /// Price file; prompted for on stdin when omitted
        file: Option<String>,
        #[arg(long)]
        companion: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,
    },
    /// Show the columns and day range of a price file
    Info {
        file: String,
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,
    },
    /// Validate a simulation configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            file,
            companion,
            config,
            data_dir,
        } => run_simulate(file, companion.as_deref(), config.as_ref(), data_dir),
        Command::Info { file, data_dir } => run_info(&file, data_dir),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = StocksimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_simulation_config(adapter: &dyn ConfigPort) -> Result<SimulationConfig, StocksimError> {
    validate_simulation_config(adapter)?;

    let moving_average = MovingAverageParams {
        column: adapter
            .get_string("moving_average", "column")
            .unwrap_or_else(|| DEFAULT_PRICE_COLUMN.to_string()),
        window: adapter.get_int("moving_average", "window", 20) as usize,
        trade_size: adapter.get_int("moving_average", "trade_size", 10),
        buy_ratio: adapter.get_double("moving_average", "buy_ratio", 0.95),
        sell_ratio: adapter.get_double("moving_average", "sell_ratio", 1.05),
    };

    let regression = RegressionParams {
        column: adapter
            .get_string("regression", "column")
            .unwrap_or_else(|| DEFAULT_PRICE_COLUMN.to_string()),
        window: adapter.get_int("regression", "window", 20) as usize,
        epsilon: adapter.get_double("regression", "epsilon", 0.0001),
        max_trade: adapter.get_int("regression", "max_trade", 10),
        size_slope: adapter.get_double("regression", "size_slope", 1.25),
        size_offset: adapter.get_double("regression", "size_offset", 3.75),
    };

    let mut companions = CompanionMap::default();
    let mut entries = adapter.section_entries("companions");
    entries.sort();
    for (primary, companion) in entries {
        companions.insert(primary.trim(), companion.trim());
    }

    Ok(SimulationConfig {
        initial_cash: adapter.get_double("simulation", "initial_cash", DEFAULT_INITIAL_CASH),
        moving_average,
        regression,
        companions,
    })
}

/// An explicit companion wins over the configured pairs.
pub fn resolve_companion(
    primary: &str,
    companion_override: Option<&str>,
    companions: &CompanionMap,
) -> Result<String, StocksimError> {
    if let Some(c) = companion_override.map(str::trim).filter(|c| !c.is_empty()) {
        return Ok(c.to_string());
    }
    companions
        .resolve(primary)
        .ok_or_else(|| StocksimError::NoCompanion {
            primary: primary.to_string(),
        })
}

/// Writes the filename prompt to `output` and reads one trimmed line.
pub fn prompt_filename<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "{}", FILENAME_PROMPT)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Loads the primary table, runs the moving-average strategy, then loads the
/// companion and runs the regression strategy. Both results go to `report`.
pub fn run_simulation_pipeline(
    data_port: &dyn DataPort,
    config: &SimulationConfig,
    primary: &str,
    companion: &str,
    report: &mut dyn ReportPort,
) -> Result<Vec<SimulationResult>, StocksimError> {
    let initial = Account::new(config.initial_cash);

    let primary_table = data_port.fetch_table(primary)?;
    log::info!("loaded {}: {} days", primary, primary_table.day_count());
    let moving_average = run_moving_average(&primary_table, &config.moving_average, initial)?;

    let companion_table = data_port.fetch_table(companion)?;
    log::info!("loaded {}: {} days", companion, companion_table.day_count());
    let regression = run_regression(&primary_table, &companion_table, &config.regression, initial)?;

    let results = vec![moving_average, regression];
    report.write_all(&results)?;
    Ok(results)
}

fn run_simulate(
    file: Option<String>,
    companion_override: Option<&str>,
    config_path: Option<&PathBuf>,
    data_dir: PathBuf,
) -> ExitCode {
    let config = match config_path {
        Some(path) => {
            let adapter = match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            };
            match build_simulation_config(&adapter) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            }
        }
        None => SimulationConfig::default(),
    };

    let primary = match file {
        Some(f) => f,
        None => {
            let stdin = io::stdin();
            match prompt_filename(&mut stdin.lock(), &mut io::stdout()) {
                Ok(f) => f,
                Err(e) => {
                    let err = StocksimError::from(e);
                    eprintln!("error: {err}");
                    return (&err).into();
                }
            }
        }
    };

    let companion = match resolve_companion(&primary, companion_override, &config.companions) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e} (use --companion or a [companions] config entry)");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(data_dir);
    let mut report = ConsoleReport::new(io::stdout());

    match run_simulation_pipeline(&data_port, &config, &primary, &companion, &mut report) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(file: &str, data_dir: PathBuf) -> ExitCode {
    let data_port = CsvAdapter::new(data_dir);
    let table = match data_port.fetch_table(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("{}: {} days", file, table.day_count());
    println!("columns: {}", table.header().join(", "));
    if !table.is_empty() {
        let last = table.day_count();
        let describe = |day: usize| match table.date(day) {
            Some(date) => date.to_string(),
            None => table.label(day).unwrap_or_default().to_string(),
        };
        println!("range: {} to {}", describe(1), describe(last));
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match build_simulation_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("  initial cash:   {:.2}", config.initial_cash);
    eprintln!(
        "  moving average: {} over {} days, {} shares, buy <= {} x avg, sell >= {} x avg",
        config.moving_average.column,
        config.moving_average.window,
        config.moving_average.trade_size,
        config.moving_average.buy_ratio,
        config.moving_average.sell_ratio,
    );
    eprintln!(
        "  regression:     {} over {} days, up to {} shares",
        config.regression.column, config.regression.window, config.regression.max_trade,
    );
    for (a, b) in config.companions.pairs() {
        eprintln!("  companions:     {} <-> {}", a, b);
    }
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
