pub mod baseline;
pub mod classify;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod load;
pub mod normalize;
pub mod streak;
pub mod structs;
pub mod summary;

// Re-export public API
pub use baseline::MonthlyBaselines;
pub use engine::{EngineOutput, compute};
pub use error::{PipelineError, Result};
pub use ingest::read_observations;
pub use load::{write_baselines_csv, write_csv, write_json, write_parquet, write_summary_json};
pub use structs::{
    Classification, DailyRecord, EngineConfig, FilterCriteria, MonthlyBaseline, RawObservation,
    SimpleLogger, ZScore,
};
pub use summary::{Summary, summarize};
