use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum WorksheetError {
    #[error("worksheet missing required column(s): {0}")]
    Schema(String),
    #[error("worksheet read error: {0}")]
    Read(String),
    #[error("row {row} has {got} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("query error: {0}")]
    Query(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export error: {0}")]
    Csv(String),
    #[error("xlsx export error: {0}")]
    Xlsx(String),
    #[error(
        "harvest requires a clean run (score=100, duplicates=0, review=0); got score={score}, duplicates={duplicates}, review={review}"
    )]
    NotClean {
        score: u8,
        duplicates: usize,
        review: usize,
    },
}
