use thiserror::Error;

/// Errors raised while loading data, fitting models or rendering results.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{column}' not found, available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("value '{value}' in column '{column}' (row {row}) is not a number")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("value '{value}' in index column (row {row}) is not a timestamp")]
    InvalidTimestamp { row: usize, value: String },

    #[error("feature matrix has {x_rows} rows but target has {y_len} values")]
    LengthMismatch { x_rows: usize, y_len: usize },

    #[error("row {row} has {got} features, expected {expected}")]
    RaggedRows {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("{stage} needs at least {required} samples, got {got}")]
    InsufficientData {
        stage: &'static str,
        required: usize,
        got: usize,
    },

    #[error("{model} does not support parameter '{param}'")]
    UnsupportedParam { model: String, param: String },

    #[error("invalid value '{value}' for parameter '{param}' of {model}")]
    InvalidParam {
        model: String,
        param: String,
        value: String,
    },

    #[error("{model} failed during {stage}: {message}")]
    ModelFailure {
        model: String,
        stage: &'static str,
        message: String,
    },

    #[error("{0} has not been fitted")]
    NotFitted(String),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("plot error: {0}")]
    Plot(String),
}

impl From<figment::Error> for AnalysisError {
    fn from(err: figment::Error) -> Self {
        AnalysisError::Config(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
