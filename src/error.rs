use arrow_schema::ArrowError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid record #{index} (date {date:?}): {reason}")]
    InvalidRecord {
        index: usize,
        date: String,
        reason: String,
    },
    #[error("Empty dataset: no records to compute monthly baselines from")]
    EmptyDataset,
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parquet Error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow Error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("Data Error: {0}")]
    Data(String),
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub(crate) fn invalid_record(
        index: usize,
        date: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PipelineError::InvalidRecord {
            index,
            date: date.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
