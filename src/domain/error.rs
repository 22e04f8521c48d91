//! Domain error types.

/// Top-level error type for stocksim.
#[derive(Debug, thiserror::Error)]
pub enum StocksimError {
    #[error("malformed header: {reason}")]
    MalformedHeader { reason: String },

    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("column not found: {column}")]
    ColumnNotFound { column: String },

    #[error("column {column} is not {expected}")]
    ColumnType { column: String, expected: String },

    #[error("day {day} out of range (table has {days} days)")]
    IndexOutOfRange { day: usize, days: usize },

    #[error("companion table has {companion} days, primary needs {primary}")]
    MisalignedTables { primary: usize, companion: usize },

    #[error("failed to read {path}: {reason}")]
    DataUnavailable { path: String, reason: String },

    #[error("no companion configured for {primary}")]
    NoCompanion { primary: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StocksimError> for std::process::ExitCode {
    fn from(err: &StocksimError) -> Self {
        let code: u8 = match err {
            StocksimError::Io(_) => 1,
            StocksimError::ConfigParse { .. }
            | StocksimError::ConfigMissing { .. }
            | StocksimError::ConfigInvalid { .. }
            | StocksimError::NoCompanion { .. } => 2,
            StocksimError::MalformedHeader { .. }
            | StocksimError::MalformedRow { .. }
            | StocksimError::DataUnavailable { .. } => 3,
            StocksimError::ColumnNotFound { .. }
            | StocksimError::ColumnType { .. }
            | StocksimError::IndexOutOfRange { .. }
            | StocksimError::MisalignedTables { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
