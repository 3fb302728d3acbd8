use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::family::MethodFamily;
use super::SankeyError;
use crate::data::model::{MethodCatalog, MethodRecord};

/// Data-cleaning patches applied after spaces are stripped from the data-type
/// field. Space removal glues this two-word category into one token.
const DATA_TYPE_CORRECTIONS: &[(&str, &str)] = &[("Caretrajectories", "Care trajectories")];

// ---------------------------------------------------------------------------
// Column references
// ---------------------------------------------------------------------------

/// Headers of the four columns the taxonomy is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub community: String,
    pub data_type: String,
    pub family: String,
    pub subfamily: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            community: "Community (standardized)".to_string(),
            data_type: "Data type (standardized)".to_string(),
            family: "Method Family".to_string(),
            subfamily: "Subfamily (standardized)".to_string(),
        }
    }
}

impl ColumnNames {
    fn required(&self) -> [&str; 4] {
        [
            self.community.as_str(),
            self.data_type.as_str(),
            self.family.as_str(),
            self.subfamily.as_str(),
        ]
    }

    /// Fail on the first required column the catalogue lacks.
    pub fn check(&self, catalog: &MethodCatalog) -> Result<(), SankeyError> {
        match self.required().into_iter().find(|c| !catalog.has_column(c)) {
            Some(missing) => Err(SankeyError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Edge tables
// ---------------------------------------------------------------------------

/// A weighted, label-addressed edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub value: u32,
}

impl Edge {
    pub fn new(source: &str, target: &str, value: u32) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            value,
        }
    }
}

/// Counts (source, target) pairs, keeping the order pairs were first seen.
#[derive(Default)]
struct EdgeCounter {
    edges: Vec<Edge>,
    position: HashMap<(String, String), usize>,
}

impl EdgeCounter {
    fn bump(&mut self, source: &str, target: &str) {
        let key = (source.to_string(), target.to_string());
        match self.position.get(&key) {
            Some(&i) => self.edges[i].value += 1,
            None => {
                self.position.insert(key, self.edges.len());
                self.edges.push(Edge::new(source, target, 1));
            }
        }
    }

    fn finish(self) -> Vec<Edge> {
        self.edges
    }
}

/// Output of the extractor: both edge tables and the three tiers' values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxonomyTables {
    /// Table A: data type → family.
    pub type_to_family: Vec<Edge>,
    /// Table B: family → subfamily.
    pub family_to_subfamily: Vec<Edge>,
    /// Distinct data types of the kept rows, first-seen order.
    pub data_types: Vec<String>,
    /// Families present in the kept rows, first-seen order.
    pub families: Vec<MethodFamily>,
    /// Distinct trimmed subfamilies of the kept rows, first-seen order.
    pub subfamilies: Vec<String>,
    /// Exploded rows dropped because their family is not recognised.
    pub discarded_rows: usize,
}

impl TaxonomyTables {
    pub fn is_empty(&self) -> bool {
        self.type_to_family.is_empty() && self.family_to_subfamily.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Split a raw data-type cell into its atomic values.
///
/// Spaces are removed, known corrections applied, then the text is split on
/// commas. Every comma-separated slot yields one entry; blank slots are `None`.
pub fn normalize_data_types(raw: &str) -> Vec<Option<String>> {
    let mut text: String = raw.chars().filter(|c| *c != ' ').collect();
    for (wrong, right) in DATA_TYPE_CORRECTIONS {
        text = text.replace(wrong, right);
    }
    text.split(',')
        .map(|tok| {
            let tok = tok.trim();
            (!tok.is_empty()).then(|| tok.to_string())
        })
        .collect()
}

fn push_unique<T: PartialEq + Clone>(list: &mut Vec<T>, value: &T) {
    if !list.contains(value) {
        list.push(value.clone());
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Build both edge tables from already-filtered records.
///
/// Column presence is the caller's contract; see [`extract_from_catalog`] for
/// the checked entry point.
pub fn extract<'a, I>(records: I, columns: &ColumnNames) -> TaxonomyTables
where
    I: IntoIterator<Item = &'a MethodRecord>,
{
    let mut table_a = EdgeCounter::default();
    let mut table_b = EdgeCounter::default();
    let mut out = TaxonomyTables::default();

    for record in records {
        let slots = match record.get(&columns.data_type).as_text() {
            Some(raw) => normalize_data_types(&raw),
            None => vec![None],
        };

        let family = record
            .get(&columns.family)
            .as_str()
            .and_then(MethodFamily::from_label);
        let Some(family) = family else {
            out.discarded_rows += slots.len();
            continue;
        };

        let subfamily = record
            .get(&columns.subfamily)
            .as_text()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // One exploded row per slot for the data-type tier.
        for dt in slots.iter().flatten() {
            push_unique(&mut out.data_types, dt);
            table_a.bump(dt, family.label());
        }

        // The subfamily tier counts methods, not exploded rows.
        push_unique(&mut out.families, &family);
        if let Some(sub) = &subfamily {
            push_unique(&mut out.subfamilies, sub);
            table_b.bump(family.label(), sub);
        }
    }

    out.type_to_family = table_a
        .finish()
        .into_iter()
        .filter(|e| !MethodFamily::is_family_label(&e.source))
        .collect();
    out.family_to_subfamily = table_b
        .finish()
        .into_iter()
        .filter(|e| !MethodFamily::is_family_label(&e.target))
        .collect();

    if out.discarded_rows > 0 {
        log::warn!(
            "dropped {} row(s) with an unrecognised method family",
            out.discarded_rows
        );
    }
    log::debug!(
        "taxonomy: {} data type(s), {} famil(ies), {} subfamil(ies), {}+{} edge(s)",
        out.data_types.len(),
        out.families.len(),
        out.subfamilies.len(),
        out.type_to_family.len(),
        out.family_to_subfamily.len()
    );
    out
}

/// Checked entry point: verify the required columns, then extract the rows
/// at `indices`.
pub fn extract_from_catalog(
    catalog: &MethodCatalog,
    indices: &[usize],
    columns: &ColumnNames,
) -> Result<TaxonomyTables, SankeyError> {
    columns.check(catalog)?;
    Ok(extract(catalog.select(indices), columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn record(dt: &str, family: &str, sub: &str) -> MethodRecord {
        let cols = ColumnNames::default();
        MethodRecord::new()
            .with(&cols.community, "Statistics")
            .with(&cols.data_type, dt)
            .with(&cols.family, family)
            .with(&cols.subfamily, sub)
    }

    #[test]
    fn normalize_strips_spaces_and_restores_care_trajectories() {
        assert_eq!(
            normalize_data_types("Care trajectories, Life course"),
            vec![Some("Care trajectories".to_string()), Some("Lifecourse".to_string())]
        );
        assert_eq!(
            normalize_data_types("A,,B"),
            vec![Some("A".to_string()), None, Some("B".to_string())]
        );
    }

    #[test]
    fn explode_counts_each_data_type() {
        let records = vec![record("A, B", "Model-based", " X ")];
        let tables = extract(&records, &ColumnNames::default());

        assert_eq!(
            tables.type_to_family,
            vec![Edge::new("A", "Model-based", 1), Edge::new("B", "Model-based", 1)]
        );
        // The method itself is counted once toward its subfamily.
        assert_eq!(tables.family_to_subfamily, vec![Edge::new("Model-based", "X", 1)]);
        assert_eq!(tables.subfamilies, vec!["X"]);
    }

    #[test]
    fn unknown_family_rows_are_discarded() {
        let records = vec![
            record("A", "Model-based", "X"),
            record("C,D", "Unknown", "Z"),
        ];
        let tables = extract(&records, &ColumnNames::default());

        assert_eq!(tables.discarded_rows, 2);
        assert_eq!(tables.data_types, vec!["A"]);
        assert_eq!(tables.families, vec![MethodFamily::ModelBased]);
        assert!(!tables.subfamilies.contains(&"Z".to_string()));
    }

    #[test]
    fn family_named_values_are_filtered_from_tables() {
        let records = vec![
            record("Feature-based", "Model-based", "Distance-based"),
            record("A", "Model-based", "X"),
        ];
        let tables = extract(&records, &ColumnNames::default());

        assert_eq!(tables.type_to_family, vec![Edge::new("A", "Model-based", 1)]);
        assert_eq!(tables.family_to_subfamily, vec![Edge::new("Model-based", "X", 1)]);
        // The value sets still list them.
        assert_eq!(tables.data_types, vec!["Feature-based", "A"]);
    }

    #[test]
    fn null_cells_contribute_no_edges() {
        let cols = ColumnNames::default();
        let rec = MethodRecord::new()
            .with(&cols.data_type, CellValue::Null)
            .with(&cols.family, "Distance-based")
            .with(&cols.subfamily, CellValue::Null);
        let tables = extract([&rec], &cols);

        assert!(tables.is_empty());
        assert_eq!(tables.families, vec![MethodFamily::DistanceBased]);
        assert!(tables.data_types.is_empty());
    }

    #[test]
    fn missing_column_is_reported() {
        let catalog = MethodCatalog::from_records(
            vec!["Data type (standardized)".into(), "Method Family".into()],
            Vec::new(),
        );
        let err = extract_from_catalog(&catalog, &[], &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, SankeyError::MissingColumn(c) if c == "Community (standardized)"));
    }
}
