use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, MethodCatalog, MethodRecord};

/// Yes/No columns offered as "must have" checkboxes.
pub const PROPERTY_COLUMNS: [&str; 5] = [
    "Continuous time",
    "Covariates",
    "Various lengths",
    "Missing data",
    "Multivariate",
];

/// Columns matched by the free-text search box.
pub const SEARCH_COLUMNS: [&str; 2] = ["Method Name", "Original Article"];

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// If a column is absent, it means "no filter" (show all).
pub type ColumnSelection = BTreeMap<String, BTreeSet<CellValue>>;

/// Everything the filter panel can constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub columns: ColumnSelection,
    /// Property columns that must read `Yes`.
    pub required_properties: BTreeSet<String>,
    /// Case-insensitive substring over [`SEARCH_COLUMNS`]; blank = no filter.
    pub search: String,
}

/// Initialise a [`FilterState`] with all values selected (i.e., show everything).
pub fn init_filter_state(catalog: &MethodCatalog) -> FilterState {
    FilterState {
        columns: catalog
            .unique_values
            .iter()
            .map(|(col, vals)| (col.clone(), vals.clone()))
            .collect(),
        ..FilterState::default()
    }
}

/// Whether a record has `Yes` in a property column.
pub fn has_property(record: &MethodRecord, property: &str) -> bool {
    matches!(record.get(property), CellValue::String(s) if s.trim() == "Yes")
}

fn matches_search(record: &MethodRecord, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    SEARCH_COLUMNS.iter().any(|col| {
        record
            .text(col)
            .is_some_and(|t| t.to_lowercase().contains(&needle))
    })
}

/// Return indices of methods that pass all active filters.
///
/// A method passes a column filter when:
/// * The column is not present in `filters` → passes (no constraint)
/// * The filter set for that column is empty → nothing selected → fails
/// * The method's value for that column is in the selected set → passes
///
/// On top of that every required property must be `Yes` and the search text,
/// if any, must occur in the name or the article.
pub fn filtered_indices(catalog: &MethodCatalog, filters: &FilterState) -> Vec<usize> {
    catalog
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            for (col, selected) in &filters.columns {
                if selected.is_empty() {
                    // Nothing selected for this column → hide everything
                    return false;
                }
                // Check all unique values are selected → no effective filter
                if let Some(all_vals) = catalog.unique_values.get(col) {
                    if selected.len() == all_vals.len() {
                        continue; // everything selected, no filtering needed
                    }
                }
                // A missing cell reads as Null.
                if !selected.contains(rec.get(col)) {
                    return false;
                }
            }
            filters
                .required_properties
                .iter()
                .all(|p| has_property(rec, p))
                && matches_search(rec, &filters.search)
        })
        .map(|(i, _)| i)
        .collect()
}
