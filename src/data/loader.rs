use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, MethodCatalog, MethodRecord};

/// Raw column holding `Yes (link)` / `No` implementation notes.
pub const PUBLIC_IMPLEMENTATION: &str = "Public Implementation";
/// Derived `Yes` / `No` column.
pub const IMPLEMENTATION_AVAILABLE: &str = "Public Implementation Available";
/// Derived link column.
pub const IMPLEMENTATION_LINK: &str = "Implementation Link";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the methods catalogue from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – one header row, one method per line
/// * `.json`    – `[{ "Method Name": "...", "Method Family": "...", ... }, ...]`
/// * `.parquet` – flat scalar columns (strings, ints, floats, bools)
pub fn load_file(path: &Path) -> Result<MethodCatalog> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let catalog = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    Ok(split_public_implementation(catalog))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every other row is a method.
/// Empty cells are `Null`.
fn load_csv(path: &Path) -> Result<MethodCatalog> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

pub(crate) fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<MethodCatalog> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut fields = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            let Some(col_name) = headers.get(col_idx) else {
                bail!("CSV row {row_no}: more cells than header columns");
            };
            fields.insert(col_name.clone(), CellValue::parse(value));
        }

        records.push(MethodRecord { fields });
    }

    Ok(MethodCatalog::from_records(headers, records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Method Name": "HMM clustering", "Method Family": "Model-based", "Year": 2004 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<MethodCatalog> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub(crate) fn parse_json(text: &str) -> Result<MethodCatalog> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let fields = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_cell(val)))
            .collect();

        records.push(MethodRecord { fields });
    }

    // JSON objects carry no column order; from_records sorts them.
    Ok(MethodCatalog::from_records(Vec::new(), records))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.is_empty() => CellValue::Null,
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the catalogue.
///
/// Every column is read as a scalar; nested columns are shown by their type
/// name. Works with files written by **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<MethodCatalog> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut fields = BTreeMap::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_cell(batch.column(col_idx), row);
                fields.insert(field.name().clone(), value);
            }
            records.push(MethodRecord { fields });
        }
    }

    Ok(MethodCatalog::from_records(headers, records))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|s| CellValue::parse(s.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::LargeUtf8 => CellValue::parse(col.as_string::<i64>().value(row)),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(a.value(row) as i64))
            .unwrap_or(CellValue::Null),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Float(a.value(row) as f64))
            .unwrap_or(CellValue::Null),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Float(a.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row)))
            .unwrap_or(CellValue::Null),
        other => CellValue::String(format!("{other:?}")),
    }
}

// ---------------------------------------------------------------------------
// Post-processing
// ---------------------------------------------------------------------------

/// Split a `Public Implementation` note into (availability, link).
///
/// `"Yes (https://x)"` → (`Yes`, `https://x`); `"No"` → (`No`, Null). The
/// link runs up to the last `)`, so trailing notes after it are ignored.
/// Links that are empty or the literal `None` read as Null; text without a
/// leading `Yes`/`No` yields two Nulls.
pub fn parse_public_implementation(raw: &str) -> (CellValue, CellValue) {
    let raw = raw.trim();
    let Some((flag, rest)) = ["Yes", "No"]
        .into_iter()
        .find_map(|flag| raw.strip_prefix(flag).map(|rest| (flag, rest)))
    else {
        return (CellValue::Null, CellValue::Null);
    };

    let link = rest
        .strip_prefix(" (")
        .and_then(|r| r.rfind(')').map(|end| &r[..end]))
        .filter(|l| !l.is_empty() && *l != "None")
        .map(CellValue::from)
        .unwrap_or(CellValue::Null);

    (CellValue::from(flag), link)
}

/// Add the derived implementation columns when the raw column is present.
fn split_public_implementation(catalog: MethodCatalog) -> MethodCatalog {
    if !catalog.has_column(PUBLIC_IMPLEMENTATION) {
        return catalog;
    }

    let MethodCatalog {
        mut records,
        mut column_names,
        ..
    } = catalog;

    for rec in &mut records {
        let (available, link) = match rec.get(PUBLIC_IMPLEMENTATION).as_text() {
            Some(raw) => parse_public_implementation(&raw),
            None => (CellValue::Null, CellValue::Null),
        };
        rec.fields.insert(IMPLEMENTATION_AVAILABLE.to_string(), available);
        rec.fields.insert(IMPLEMENTATION_LINK.to_string(), link);
    }
    for col in [IMPLEMENTATION_AVAILABLE, IMPLEMENTATION_LINK] {
        if !column_names.iter().any(|c| c == col) {
            column_names.push(col.to_string());
        }
    }

    MethodCatalog::from_records(column_names, records)
}
