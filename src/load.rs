use crate::baseline::MonthlyBaselines;
use crate::error::Result;
use crate::structs::DailyRecord;
use crate::summary::Summary;
use arrow_array::{
    BooleanArray, Date32Array, Float64Array, Int32Array, RecordBatch, StringArray, UInt32Array,
};
use arrow_schema::{DataType, Field, Schema};
use chrono::Datelike;
use csv::Writer;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::{fs::File, path::Path, sync::Arc};

/// Days from 0001-01-01 (CE) to 1970-01-01, the Arrow `Date32` origin.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

/// Writes classified daily records to a CSV file with formatted numeric values.
///
/// The first five columns match the display table (`DATE`, `MEAN_TEMP`,
/// `anomaly`, `HOT_STREAK`, `COLD_STREAK`); the rest carry the other derived
/// fields. Missing values are written as empty cells.
///
/// # Arguments
/// * `records` - Slice of DailyRecord structs, usually a filtered view
/// * `output_path` - Path where the CSV file will be created
///
/// # Returns
/// Returns `Ok(())` on success.
///
/// # Errors
/// Returns error if file cannot be created or written to.
pub fn write_csv(records: &[DailyRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "DATE",
        "MEAN_TEMP",
        "anomaly",
        "HOT_STREAK",
        "COLD_STREAK",
        "MIN_TEMP_CELSIUS",
        "MAX_TEMP_CELSIUS",
        "year",
        "month",
        "mean",
        "std",
        "z_score",
        "HOT_DAY",
        "COLD_DAY",
    ])?;

    for r in records {
        writer.write_record(&[
            r.date.to_string(),
            fmt_opt(r.mean_temp),
            r.classification.to_string(),
            r.hot_streak.to_string(),
            r.cold_streak.to_string(),
            fmt_opt(r.min_temp),
            fmt_opt(r.max_temp),
            r.year.to_string(),
            r.month.to_string(),
            fmt_opt(r.baseline_mean),
            fmt_opt(r.baseline_std),
            r.z_score
                .value()
                .map(|z| format!("{:.3}", z))
                .unwrap_or_default(),
            r.is_hot.to_string(),
            r.is_cold.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the monthly baselines (one row per calendar month) to CSV.
///
/// # Arguments
/// * `baselines` - Monthly baselines computed over the full dataset
/// * `output_path` - Path where the CSV file will be created
///
/// # Returns
/// Returns `Ok(())` on success.
///
/// # Errors
/// Returns error if file cannot be created or written to.
pub fn write_baselines_csv(baselines: &MonthlyBaselines, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(["month", "mean", "std", "count"])?;
    for b in baselines.iter() {
        writer.write_record(&[
            b.month.to_string(),
            fmt_opt(b.sample_mean),
            fmt_opt(b.sample_std),
            b.sample_count.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes classified daily records to a pretty-formatted JSON file.
///
/// # Arguments
/// * `records` - Slice of DailyRecord structs, usually a filtered view
/// * `output_path` - Path where the JSON file will be created
///
/// # Returns
/// Returns `Ok(())` on success.
///
/// # Errors
/// Returns error if file cannot be created or serialization fails.
pub fn write_json(records: &[DailyRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, records)?;
    Ok(())
}

/// Writes the run summary to a pretty-formatted JSON file.
///
/// # Arguments
/// * `summary` - Summary built by `summarize`
/// * `output_path` - Path where the JSON file will be created
///
/// # Returns
/// Returns `Ok(())` on success.
///
/// # Errors
/// Returns error if file cannot be created or serialization fails.
pub fn write_summary_json(summary: &Summary, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}

/// Writes classified daily records to a columnar Parquet file using Arrow format.
///
/// Missing temperatures, baselines and z-scores are stored as nulls.
///
/// # Arguments
/// * `records` - Slice of DailyRecord structs, usually a filtered view
/// * `output_path` - Path where the Parquet file will be created
///
/// # Returns
/// Returns `Ok(())` on success.
///
/// # Errors
/// Returns error if file cannot be created, schema is invalid, or Arrow operations fail.
pub fn write_parquet(records: &[DailyRecord], output_path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("min_temp", DataType::Float64, true),
        Field::new("max_temp", DataType::Float64, true),
        Field::new("mean_temp", DataType::Float64, true),
        Field::new("year", DataType::Int32, false),
        Field::new("month", DataType::UInt32, false),
        Field::new("baseline_mean", DataType::Float64, true),
        Field::new("baseline_std", DataType::Float64, true),
        Field::new("z_score", DataType::Float64, true),
        Field::new("anomaly", DataType::Utf8, false),
        Field::new("is_hot", DataType::Boolean, false),
        Field::new("is_cold", DataType::Boolean, false),
        Field::new("hot_streak", DataType::UInt32, false),
        Field::new("cold_streak", DataType::UInt32, false),
    ]));

    let dates: Date32Array = records
        .iter()
        .map(|r| Some(r.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE))
        .collect();
    let min_temps: Float64Array = records.iter().map(|r| r.min_temp).collect();
    let max_temps: Float64Array = records.iter().map(|r| r.max_temp).collect();
    let mean_temps: Float64Array = records.iter().map(|r| r.mean_temp).collect();
    let years: Int32Array = records.iter().map(|r| r.year).collect();
    let months: UInt32Array = records.iter().map(|r| r.month).collect();
    let baseline_means: Float64Array = records.iter().map(|r| r.baseline_mean).collect();
    let baseline_stds: Float64Array = records.iter().map(|r| r.baseline_std).collect();
    let z_scores: Float64Array = records.iter().map(|r| r.z_score.value()).collect();
    let anomalies: StringArray =
        StringArray::from_iter_values(records.iter().map(|r| r.classification.label()));
    let hot: BooleanArray = records.iter().map(|r| Some(r.is_hot)).collect();
    let cold: BooleanArray = records.iter().map(|r| Some(r.is_cold)).collect();
    let hot_streaks: UInt32Array = records.iter().map(|r| r.hot_streak).collect();
    let cold_streaks: UInt32Array = records.iter().map(|r| r.cold_streak).collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(dates),
            Arc::new(min_temps),
            Arc::new(max_temps),
            Arc::new(mean_temps),
            Arc::new(years),
            Arc::new(months),
            Arc::new(baseline_means),
            Arc::new(baseline_stds),
            Arc::new(z_scores),
            Arc::new(anomalies),
            Arc::new(hot),
            Arc::new(cold),
            Arc::new(hot_streaks),
            Arc::new(cold_streaks),
        ],
    )?;

    let file = File::create(output_path)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}
