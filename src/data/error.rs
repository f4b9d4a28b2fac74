use std::path::PathBuf;

use thiserror::Error;

use super::model::NumericColumn;

/// Fatal failure while loading a table. No partial table is ever returned
/// alongside one of these.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}: required column '{column}' appears more than once", path.display())]
    DuplicateColumn { path: PathBuf, column: &'static str },

    #[error("{}, row {row}: '{value}' in column '{column}' is not a number", path.display())]
    InvalidNumber {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("{}, row {row}: '{value}' in column '{column}' is not finite", path.display())]
    NonFinite {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("{}, row {row}: '{value}' in column '{column}' is negative", path.display())]
    Negative {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Aggregates that cannot be computed for the given input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("no values in column '{0}'")]
    EmptyColumn(NumericColumn),

    #[error("{metric} is undefined: '{column}' denominator is zero")]
    ZeroDenominator {
        metric: &'static str,
        column: NumericColumn,
    },
}
