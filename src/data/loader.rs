use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{Dataset, Restaurant};

/// Columns every input must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["name", "address", "city", "province"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The dataset file was not found. Please ensure '{}' is in the correct location.", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Column '{column}' has unsupported type {data_type}")]
    ColumnType { column: String, data_type: DataType },
    #[error("reading dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("reading arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a restaurant dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; unknown columns are ignored
/// * `.json`    – `[{ "name": ..., "province": ..., ... }, ...]`
/// * `.parquet` – one column per field
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "Loaded {} restaurants in {} states from {}",
        dataset.len(),
        dataset.states().len(),
        path.display()
    );
    Ok(dataset)
}

fn check_columns(mut present: impl FnMut(&str) -> bool) -> Result<(), LoadError> {
    match REQUIRED_COLUMNS.iter().find(|c| !present(c)) {
        Some(missing) => Err(LoadError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    check_columns(|c| headers.iter().any(|h| h == c))?;

    let restaurants = reader
        .deserialize::<Restaurant>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::from_restaurants(restaurants))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented layout, as written by `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&text)?;

    if let Some(first) = rows.first() {
        check_columns(|c| first.contains_key(c))?;
    }

    let restaurants = rows
        .into_iter()
        .map(|mut row| {
            postal_code_as_text(&mut row);
            serde_json::from_value(serde_json::Value::Object(row))
        })
        .collect::<Result<Vec<Restaurant>, _>>()?;

    Ok(Dataset::from_restaurants(restaurants))
}

/// Exporters write numeric postal codes as JSON numbers; store them as text.
/// A null postal code is treated as absent.
fn postal_code_as_text(row: &mut serde_json::Map<String, serde_json::Value>) {
    use serde_json::Value;

    let text = match row.get("postalCode") {
        Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Some(Value::Null) => {
            row.remove("postalCode");
            return;
        }
        _ => return,
    };
    row.insert("postalCode".to_string(), Value::String(text));
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut restaurants = Vec::new();
    for batch in reader {
        let batch = batch?;
        read_batch(&batch, &mut restaurants)?;
    }

    Ok(Dataset::from_restaurants(restaurants))
}

fn read_batch(batch: &RecordBatch, out: &mut Vec<Restaurant>) -> Result<(), LoadError> {
    let schema = batch.schema();
    check_columns(|c| schema.index_of(c).is_ok())?;

    let column = |name: &'static str| schema.index_of(name).ok().map(|i| (name, batch.column(i)));

    let name = text_column(column("name"))?;
    let address = text_column(column("address"))?;
    let city = text_column(column("city"))?;
    let province = text_column(column("province"))?;
    let postal_code = text_column(column("postalCode"))?;
    let categories = text_column(column("categories"))?;
    let latitude = number_column(column("latitude"))?;
    let longitude = number_column(column("longitude"))?;

    let text = |col: &Option<ArrayRef>, row: usize| col.as_ref().and_then(|c| string_cell(c, row));
    let number = |col: &Option<ArrayRef>, row: usize| col.as_ref().and_then(|c| float_cell(c, row));

    for row in 0..batch.num_rows() {
        out.push(Restaurant {
            name: text(&name, row).unwrap_or_default(),
            address: text(&address, row).unwrap_or_default(),
            city: text(&city, row).unwrap_or_default(),
            province: text(&province, row).unwrap_or_default(),
            postal_code: text(&postal_code, row).unwrap_or_default(),
            categories: text(&categories, row).filter(|c| !c.trim().is_empty()),
            latitude: number(&latitude, row),
            longitude: number(&longitude, row),
        });
    }
    Ok(())
}

// -- Arrow column helpers --

fn unsupported(column: &str, data_type: &DataType) -> LoadError {
    LoadError::ColumnType {
        column: column.to_string(),
        data_type: data_type.clone(),
    }
}

/// Cast a text column to `Utf8`. Integer columns (numeric postal codes) are
/// rendered in decimal; dictionary-encoded strings are unpacked.
fn text_column(col: Option<(&str, &ArrayRef)>) -> Result<Option<ArrayRef>, LoadError> {
    let Some((name, col)) = col else {
        return Ok(None);
    };
    match col.data_type() {
        DataType::Utf8 => Ok(Some(col.clone())),
        DataType::LargeUtf8 | DataType::Utf8View | DataType::Int32 | DataType::Int64 => {
            Ok(Some(cast(col, &DataType::Utf8)?))
        }
        DataType::Dictionary(_, value)
            if matches!(value.as_ref(), DataType::Utf8 | DataType::LargeUtf8) =>
        {
            Ok(Some(cast(col, &DataType::Utf8)?))
        }
        DataType::Null => Ok(None),
        other => Err(unsupported(name, other)),
    }
}

/// Cast a coordinate column to `Float64`.
fn number_column(col: Option<(&str, &ArrayRef)>) -> Result<Option<ArrayRef>, LoadError> {
    let Some((name, col)) = col else {
        return Ok(None);
    };
    match col.data_type() {
        DataType::Float64 => Ok(Some(col.clone())),
        DataType::Float32 | DataType::Int32 | DataType::Int64 => {
            Ok(Some(cast(col, &DataType::Float64)?))
        }
        DataType::Null => Ok(None),
        other => Err(unsupported(name, other)),
    }
}

fn string_cell(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    col.as_any()
        .downcast_ref::<StringArray>()
        .map(|a| a.value(row).to_string())
}

fn float_cell(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    col.as_any()
        .downcast_ref::<Float64Array>()
        .map(|a| a.value(row))
}
