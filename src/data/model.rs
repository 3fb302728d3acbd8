use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the catalogue spreadsheet
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell.
/// Used as a `BTreeSet` key by the filter panel, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl CellValue {
    /// Guess the type of a raw text cell the way a spreadsheet reader would.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        // `f64` also accepts "NaN" and "inf"; those stay text.
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Textual form of a non-null cell; `None` for `Null`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Borrow the string payload, if this is a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// MethodRecord – one row of the spreadsheet
// ---------------------------------------------------------------------------

/// A single clustering method (one row of the source spreadsheet).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodRecord {
    /// column_name → value. Columns absent from the map read as `Null`.
    pub fields: BTreeMap<String, CellValue>,
}

impl MethodRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and the sample generator.
    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.fields.insert(column.to_string(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> &CellValue {
        self.fields.get(column).unwrap_or(&CellValue::Null)
    }

    /// Non-empty text of a column, `None` when null or blank.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).as_text().filter(|s| !s.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// MethodCatalog – the complete loaded spreadsheet
// ---------------------------------------------------------------------------

/// The full parsed catalogue with pre-computed column indices.
#[derive(Debug, Clone, Default)]
pub struct MethodCatalog {
    /// All methods (rows).
    pub records: Vec<MethodRecord>,
    /// Column names in header order.
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl MethodCatalog {
    /// Build column indices from the header and the loaded records.
    ///
    /// Columns that appear in a record but not in `columns` are appended in
    /// sorted order, so a header-less source (JSON) still gets every column.
    pub fn from_records(columns: Vec<String>, records: Vec<MethodRecord>) -> Self {
        let mut column_names = columns;
        let mut extra: BTreeSet<String> = BTreeSet::new();
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();

        for col in &column_names {
            unique_values.entry(col.clone()).or_default();
        }

        for rec in &records {
            for (col, val) in &rec.fields {
                if !column_names.contains(col) {
                    extra.insert(col.clone());
                }
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        column_names.extend(extra);

        // A column missing from some rows reads as Null there.
        for col in &column_names {
            if records.iter().any(|r| !r.fields.contains_key(col)) {
                unique_values.entry(col.clone()).or_default().insert(CellValue::Null);
            }
        }

        MethodCatalog {
            records,
            column_names,
            unique_values,
        }
    }

    /// Whether the catalogue has a column with this header.
    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// Records at the given indices, skipping any out of range.
    pub fn select<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a MethodRecord> + 'a {
        indices.iter().filter_map(move |&i| self.records.get(i))
    }

    /// Number of methods.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
