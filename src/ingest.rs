use crate::error::{PipelineError, Result};
use crate::structs::RawObservation;
use arrow_array::{Array, Float64Array, RecordBatch, StringArray};
use csv::ByteRecord;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::{fs::File, io::Read, path::Path};

pub const DATE_COLUMN: &str = "DATE";
pub const MIN_TEMP_COLUMN: &str = "MIN_TEMP_CELSIUS";
pub const MAX_TEMP_COLUMN: &str = "MAX_TEMP_CELSIUS";

/// Cell values read as a missing reading, matching the default NA markers of
/// common dataframe CSV readers.
pub const NA_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Loads observations from a `.csv` or `.parquet` file, keeping file order.
///
/// # Errors
///
/// Returns `PipelineError::Data` for an unsupported extension or missing
/// columns, `PipelineError::InvalidRecord` for a non-numeric temperature, and
/// the underlying I/O, CSV or Parquet error otherwise.
pub fn read_observations(path: &Path) -> Result<Vec<RawObservation>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") => read_csv(File::open(path)?),
        Some("parquet") => read_parquet(path),
        _ => Err(PipelineError::Data(format!(
            "Unsupported input file (expected .csv or .parquet): {}",
            path.display()
        ))),
    }
}

/// Reads observations from CSV with `DATE`, `MIN_TEMP_CELSIUS` and
/// `MAX_TEMP_CELSIUS` columns.
///
/// Fields are decoded lossily so Latin-1 exports load without failing. Empty
/// temperature cells and `NA_MARKERS` become missing readings.
pub fn read_csv<R: Read>(input: R) -> Result<Vec<RawObservation>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.byte_headers()?.clone();
    let date_idx = header_index(&headers, DATE_COLUMN)?;
    let min_idx = header_index(&headers, MIN_TEMP_COLUMN)?;
    let max_idx = header_index(&headers, MAX_TEMP_COLUMN)?;

    let mut observations = Vec::new();
    for (index, result) in reader.byte_records().enumerate() {
        let row = result?;
        let date = field(&row, date_idx);
        let min_temp = parse_temp(index, &date, MIN_TEMP_COLUMN, &field(&row, min_idx))?;
        let max_temp = parse_temp(index, &date, MAX_TEMP_COLUMN, &field(&row, max_idx))?;
        observations.push(RawObservation {
            date,
            min_temp,
            max_temp,
        });
    }

    debug!("Read {} rows from CSV", observations.len());
    Ok(observations)
}

/// Reads observations from a Parquet file with the same column names as the CSV layout.
pub fn read_parquet(path: &Path) -> Result<Vec<RawObservation>> {
    debug!("Reading Parquet file: {}", path.display());
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut observations = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(PipelineError::Arrow)?;
        let date_col = get_column_str(&batch, DATE_COLUMN)?;
        let min_col = get_column_f64(&batch, MIN_TEMP_COLUMN)?;
        let max_col = get_column_f64(&batch, MAX_TEMP_COLUMN)?;

        for i in 0..batch.num_rows() {
            let date = if date_col.is_null(i) {
                String::new()
            } else {
                date_col.value(i).to_string()
            };
            observations.push(RawObservation {
                date,
                min_temp: nullable(min_col, i),
                max_temp: nullable(max_col, i),
            });
        }
    }

    debug!("Read {} rows from Parquet", observations.len());
    Ok(observations)
}

fn header_index(headers: &ByteRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| normalize_header(h) == name)
        .ok_or_else(|| PipelineError::Data(format!("Column not found: {}", name)))
}

fn normalize_header(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim()
        .trim_start_matches('\u{feff}')
        .to_string()
}

fn field(row: &ByteRecord, idx: usize) -> String {
    row.get(idx)
        .map(|b| String::from_utf8_lossy(b).trim().to_string())
        .unwrap_or_default()
}

fn parse_temp(index: usize, date: &str, column: &str, raw: &str) -> Result<Option<f64>> {
    if raw.is_empty() || NA_MARKERS.contains(&raw) {
        return Ok(None);
    }
    raw.parse::<f64>().map(Some).map_err(|_| {
        PipelineError::invalid_record(
            index,
            date,
            format!("{} is not numeric: {:?}", column, raw),
        )
    })
}

fn nullable(col: &Float64Array, i: usize) -> Option<f64> {
    // NaN is a missing reading in columnar exports
    if col.is_null(i) || col.value(i).is_nan() {
        None
    } else {
        Some(col.value(i))
    }
}

fn get_column_f64<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array> {
    batch
        .column_by_name(name)
        .ok_or_else(|| PipelineError::Data(format!("Column not found: {}", name)))?
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| PipelineError::Data(format!("Column {} is not Float64", name)))
}

fn get_column_str<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| PipelineError::Data(format!("Column not found: {}", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| PipelineError::Data(format!("Column {} is not Utf8/String", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_columns_by_name_in_any_order() {
        let data = "STATION,MAX_TEMP_CELSIUS,DATE,MIN_TEMP_CELSIUS\n\
                    X,20,01/01/2024,10\n\
                    X,,02/01/2024,11\n";
        let obs = read_csv(data.as_bytes()).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0], RawObservation::new("01/01/2024", 10.0, 20.0));
        assert_eq!(obs[1].max_temp, None);
        assert_eq!(obs[1].min_temp, Some(11.0));
    }

    #[test]
    fn bom_prefixed_header_is_found() {
        let data = "\u{feff}DATE,MIN_TEMP_CELSIUS,MAX_TEMP_CELSIUS\n2024-01-01,1,2\n";
        assert_eq!(read_csv(data.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn latin1_bytes_do_not_fail() {
        let mut data = b"DATE,MIN_TEMP_CELSIUS,MAX_TEMP_CELSIUS,NOTE\n2024-01-01,1,2,".to_vec();
        data.extend_from_slice(&[0xB0, b'C', b'\n']);
        assert_eq!(read_csv(data.as_slice()).unwrap().len(), 1);
    }

    #[test]
    fn non_numeric_temperature_reports_row() {
        let data = "DATE,MIN_TEMP_CELSIUS,MAX_TEMP_CELSIUS\n\
                    2024-01-01,1,2\n\
                    2024-01-02,warm,2\n";
        match read_csv(data.as_bytes()) {
            Err(PipelineError::InvalidRecord { index, date, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(date, "2024-01-02");
            }
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn na_markers_are_missing_readings() {
        let mut data = String::from("DATE,MIN_TEMP_CELSIUS,MAX_TEMP_CELSIUS\n");
        for marker in ["NA", "N/A", "nan", "NaN", "null"] {
            data.push_str(&format!("02/07/2023,{},33\n", marker));
        }
        let obs = read_csv(data.as_bytes()).unwrap();
        assert_eq!(obs.len(), 5);
        for o in &obs {
            assert_eq!(o.min_temp, None);
            assert_eq!(o.max_temp, Some(33.0));
        }
    }

    #[test]
    fn missing_column_is_a_data_error() {
        let data = "DATE,MIN_TEMP_CELSIUS\n2024-01-01,1\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(PipelineError::Data(_))));
    }
}
