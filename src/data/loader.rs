use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    Answer, Gender, MetadataValue, QUESTION_COLUMNS, QUESTION_COUNT, SurveyDataset, SurveyRecord,
};
use crate::error::SourceError;

/// One source row before interpretation: column_name → value.
type Cells = BTreeMap<String, MetadataValue>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// A resolved, existing survey file.
#[derive(Debug, Clone)]
pub struct SurveySource {
    path: PathBuf,
}

impl SurveySource {
    /// Resolve `path` to an absolute path and check that the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let raw = path.as_os_str();
        if raw.is_empty() || raw.as_encoded_bytes().contains(&0) {
            return Err(SourceError::InvalidPath(raw.to_string_lossy().into_owned()));
        }

        let resolved = path
            .canonicalize()
            .map_err(|_| SourceError::NotFound(path.to_path_buf()))?;
        if !resolved.is_file() {
            return Err(SourceError::NotFound(resolved));
        }
        Ok(SurveySource { path: resolved })
    }

    /// The resolved absolute path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file into a dataset. Dispatch by extension.
    ///
    /// Supported formats:
    /// * `.json`    – `[{ "age": 31, "gender": "Male", "email": "...", "q1": 3, ... }, ...]`
    ///                or pandas' column layout `{ "age": { "0": 31, ... }, ... }`
    /// * `.csv`     – header row; an empty cell is a missing value
    /// * `.parquet` – nullable numeric grade/age columns, UTF-8 gender/email
    pub fn read_data(&self) -> Result<SurveyDataset> {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let dataset = match ext.as_str() {
            "parquet" | "pq" => load_parquet(&self.path),
            "json" => load_json(&self.path),
            "csv" => load_csv(&self.path),
            other => return Err(SourceError::UnsupportedFormat(other.to_string()).into()),
        }
        .with_context(|| format!("loading {}", self.path.display()))?;

        log::info!(
            "Loaded {} survey records from {}",
            dataset.len(),
            self.path.display()
        );
        Ok(dataset)
    }
}

/// Open and read a survey file in one step.
pub fn load_file(path: &Path) -> Result<SurveyDataset> {
    SurveySource::open(path)?.read_data()
}

// ---------------------------------------------------------------------------
// Row interpretation (shared by all formats)
// ---------------------------------------------------------------------------

/// Turn one row of cells into a record. `age`, `gender`, `email` and
/// `q1`..`q5` must all be present as columns; everything else goes to `extra`.
fn record_from_cells(row: usize, mut cells: Cells) -> Result<SurveyRecord> {
    let mut take = |col: &str| {
        cells
            .remove(col)
            .with_context(|| format!("Row {row}: missing '{col}' column"))
    };

    let age = match take("age")? {
        MetadataValue::Null => None,
        value => {
            let age = number(&value).with_context(|| format!("Row {row}: 'age' is not a number"))?;
            if age.is_nan() {
                None
            } else if age < 0.0 {
                bail!("Row {row}: negative age {age}");
            } else {
                Some(age)
            }
        }
    };

    let gender = match take("gender")? {
        MetadataValue::Null => None,
        MetadataValue::String(s) if s.trim().is_empty() => None,
        MetadataValue::String(s) => Some(Gender::from(s.as_str())),
        other => bail!("Row {row}: 'gender' must be text, got {other:?}"),
    };

    let email = match take("email")? {
        MetadataValue::String(s) => s,
        MetadataValue::Null => String::new(),
        MetadataValue::Integer(i) => i.to_string(),
        MetadataValue::Float(f) => f.to_string(),
        MetadataValue::Bool(b) => b.to_string(),
    };

    let mut answers = [Answer::Missing; QUESTION_COUNT];
    for (answer, col) in answers.iter_mut().zip(QUESTION_COLUMNS) {
        *answer = match take(col)? {
            MetadataValue::Null => Answer::Missing,
            value => Answer::from_source(Some(
                number(&value).with_context(|| format!("Row {row}: '{col}' is not a number"))?,
            )),
        };
    }

    Ok(SurveyRecord {
        age,
        gender,
        email,
        answers,
        extra: cells,
    })
}

fn number(value: &MetadataValue) -> Option<f64> {
    match value {
        MetadataValue::Float(v) => Some(*v),
        MetadataValue::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepts both records-oriented JSON (`df.to_json(orient='records')`):
///
/// ```json
/// [ { "age": 31, "gender": "Female", "email": "a@b.com", "q1": 4, "q2": null, ... } ]
/// ```
///
/// and pandas' default column-oriented layout (`df.to_json()`):
///
/// ```json
/// { "age": { "0": 31, "1": null }, "gender": { "0": "Female", "1": "Male" }, ... }
/// ```
fn load_json(path: &Path) -> Result<SurveyDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = match &root {
        JsonValue::Array(records) => records
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                rec.as_object()
                    .cloned()
                    .with_context(|| format!("Row {i} is not a JSON object"))
            })
            .collect::<Result<Vec<_>>>()?,
        JsonValue::Object(columns) => columns_to_rows(columns)?,
        _ => bail!("Expected a JSON array of records or an object of columns"),
    };

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, obj)| {
            let cells = obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_metadata(val)))
                .collect();
            record_from_cells(i, cells)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SurveyDataset::from_records(records))
}

/// Transpose `{ column: { row_label: value } }` into row objects, ordered by
/// numeric row label. A row label absent from a column reads as null.
fn columns_to_rows(columns: &Map<String, JsonValue>) -> Result<Vec<Map<String, JsonValue>>> {
    let mut rows: BTreeMap<u64, Map<String, JsonValue>> = BTreeMap::new();
    for (col, values) in columns {
        let values = values
            .as_object()
            .with_context(|| format!("Column '{col}' is not an object of row values"))?;
        for (label, value) in values {
            let row: u64 = label
                .parse()
                .with_context(|| format!("Column '{col}': row label '{label}' is not an integer"))?;
            rows.entry(row)
                .or_default()
                .insert(col.clone(), value.clone());
        }
    }
    Ok(rows
        .into_values()
        .map(|mut row| {
            for col in columns.keys() {
                row.entry(col.clone()).or_insert(JsonValue::Null);
            }
            row
        })
        .collect())
}

fn json_to_metadata(val: &JsonValue) -> MetadataValue {
    match val {
        JsonValue::String(s) => MetadataValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                MetadataValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                MetadataValue::Float(f)
            } else {
                MetadataValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => MetadataValue::Bool(*b),
        JsonValue::Null => MetadataValue::Null,
        other => MetadataValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one response per line.
/// Empty cells (and `NA` / `NaN`) are missing values.
fn load_csv(path: &Path) -> Result<SurveyDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let cells = headers
            .iter()
            .zip(row.iter())
            .map(|(col, value)| (col.clone(), guess_metadata_type(value)))
            .collect();
        records.push(record_from_cells(row_no, cells)?);
    }

    Ok(SurveyDataset::from_records(records))
}

fn guess_metadata_type(s: &str) -> MetadataValue {
    let s = s.trim();
    if s.is_empty() || s == "NA" || s == "NaN" {
        return MetadataValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return MetadataValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return MetadataValue::Float(f);
    }
    if s == "true" || s == "false" {
        return MetadataValue::Bool(s == "true");
    }
    MetadataValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of survey responses.
///
/// Expected schema:
/// - `age`, `q1`..`q5`: nullable Float64/Float32/Int64/Int32
/// - `gender`, `email`: Utf8 or LargeUtf8
/// - Any other columns are carried as metadata (strings, ints, floats, bools)
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<SurveyDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let columns: Vec<(String, &Arc<dyn Array>)> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(f, col)| (f.name().clone(), col))
            .collect();

        for row in 0..batch.num_rows() {
            let cells = columns
                .iter()
                .map(|(name, col)| (name.clone(), extract_metadata_value(col, row)))
                .collect();
            records.push(record_from_cells(records.len(), cells)?);
        }
    }

    Ok(SurveyDataset::from_records(records))
}

/// Extract a single value from an Arrow column at a given row.
fn extract_metadata_value(col: &Arc<dyn Array>, row: usize) -> MetadataValue {
    if col.is_null(row) {
        return MetadataValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => MetadataValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => MetadataValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => {
            MetadataValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64)
        }
        DataType::Int64 => MetadataValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            MetadataValue::Float(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => MetadataValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => MetadataValue::Bool(col.as_boolean().value(row)),
        _ => MetadataValue::String(format!("{:?}", col.data_type())),
    }
}
