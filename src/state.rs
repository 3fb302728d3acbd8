use std::collections::BTreeSet;
use std::rc::Rc;

use crate::color::ColorMap;
use crate::config::ExplorerConfig;
use crate::data::filter::{filtered_indices, init_filter_state, FilterState};
use crate::data::model::{CellValue, MethodCatalog};
use crate::sankey::{plot_sankey, ColumnNames, RenderParams, SankeyError, SankeyOutput};

// ---------------------------------------------------------------------------
// Sankey memoisation
// ---------------------------------------------------------------------------

struct CacheEntry {
    indices: Vec<usize>,
    columns: ColumnNames,
    params: RenderParams,
    output: Rc<SankeyOutput>,
}

/// One-entry memo of the last diagram, keyed on the visible rows and the
/// rendering parameters. Must be cleared when the catalogue is replaced.
#[derive(Default)]
pub struct SankeyCache {
    entry: Option<CacheEntry>,
    builds: usize,
}

impl SankeyCache {
    pub fn get_or_build(
        &mut self,
        catalog: &MethodCatalog,
        indices: &[usize],
        columns: &ColumnNames,
        params: &RenderParams,
    ) -> Result<Rc<SankeyOutput>, SankeyError> {
        if let Some(e) = &self.entry {
            if e.indices == indices && &e.columns == columns && &e.params == params {
                return Ok(Rc::clone(&e.output));
            }
        }
        let output = Rc::new(plot_sankey(catalog, indices, columns, params)?);
        self.builds += 1;
        self.entry = Some(CacheEntry {
            indices: indices.to_vec(),
            columns: columns.clone(),
            params: params.clone(),
            output: Rc::clone(&output),
        });
        Ok(output)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// How many times the diagram was actually computed.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which central view is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Methods,
    Sankey,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    pub config: ExplorerConfig,

    /// Loaded catalogue (None until user loads a file).
    pub catalog: Option<MethodCatalog>,

    /// Column, property and search filters.
    pub filters: FilterState,

    /// Indices of methods passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Which column is used for colouring card titles.
    pub color_column: Option<String>,

    /// Active colour map.
    pub color_map: Option<ColorMap>,

    pub view: View,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    pub sankey_cache: SankeyCache,
}

impl AppState {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded catalogue, initialise filters and colour.
    pub fn set_catalog(&mut self, catalog: MethodCatalog) {
        self.filters = init_filter_state(&catalog);
        self.visible_indices = (0..catalog.len()).collect();

        // Colour cards by community when the column exists.
        let community = &self.config.columns.community;
        self.color_column = if catalog.has_column(community) {
            Some(community.clone())
        } else {
            catalog.column_names.first().cloned()
        };
        self.color_map = build_color_map(&catalog, self.color_column.as_deref());

        self.sankey_cache.invalidate();
        self.catalog = Some(catalog);
        self.status_message = None;
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        if let Some(cat) = &self.catalog {
            self.visible_indices = filtered_indices(cat, &self.filters);
        }
    }

    /// Set colour column and rebuild the map.
    pub fn set_color_column(&mut self, col: String) {
        self.color_column = Some(col);
        if let Some(cat) = &self.catalog {
            self.color_map = build_color_map(cat, self.color_column.as_deref());
        }
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        let selected = self.filters.columns.entry(column.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Require (or stop requiring) a `Yes` in a property column.
    pub fn toggle_property(&mut self, property: &str) {
        if !self.filters.required_properties.remove(property) {
            self.filters.required_properties.insert(property.to_string());
        }
        self.refilter();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: &str) {
        let Some(all_vals) = self
            .catalog
            .as_ref()
            .and_then(|cat| cat.unique_values.get(column))
        else {
            return;
        };
        self.filters.columns.insert(column.to_string(), all_vals.clone());
        self.refilter();
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: &str) {
        self.filters.columns.insert(column.to_string(), BTreeSet::new());
        self.refilter();
    }

    /// The Sankey diagram of the visible methods, memoised.
    /// `None` until a catalogue is loaded.
    pub fn sankey(&mut self) -> Option<Result<Rc<SankeyOutput>, SankeyError>> {
        let catalog = self.catalog.as_ref()?;
        Some(self.sankey_cache.get_or_build(
            catalog,
            &self.visible_indices,
            &self.config.columns,
            &self.config.sankey,
        ))
    }
}

fn build_color_map(catalog: &MethodCatalog, column: Option<&str>) -> Option<ColorMap> {
    let col = column?;
    catalog
        .unique_values
        .get(col)
        .map(|vals| ColorMap::new(col, vals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MethodRecord;

    fn state() -> AppState {
        let cols = ColumnNames::default();
        let rec = |dt: &str, fam: &str, sub: &str| {
            MethodRecord::new()
                .with(&cols.community, "Statistics")
                .with(&cols.data_type, dt)
                .with(&cols.family, fam)
                .with(&cols.subfamily, sub)
        };
        let catalog = MethodCatalog::from_records(
            Vec::new(),
            vec![
                rec("DNA", "Model-based", "HMM"),
                rec("Life course", "Distance-based", "OM"),
            ],
        );
        let mut state = AppState::new(ExplorerConfig::default());
        state.set_catalog(catalog);
        state
    }

    #[test]
    fn sankey_is_memoised_until_filters_change() {
        let mut state = state();
        let first = state.sankey().unwrap().unwrap();
        let again = state.sankey().unwrap().unwrap();
        assert!(Rc::ptr_eq(&first, &again));
        assert_eq!(state.sankey_cache.builds(), 1);

        state.toggle_filter_value("Method Family", &CellValue::from("Model-based"));
        let filtered = state.sankey().unwrap().unwrap();
        assert_eq!(state.sankey_cache.builds(), 2);
        assert!(filtered.diagram.node_index("DNA").is_none());
        assert!(filtered.diagram.node_index("Lifecourse").is_some());
    }

    #[test]
    fn render_params_are_part_of_the_key() {
        let mut state = state();
        state.sankey().unwrap().unwrap();
        state.config.sankey.width = 800;
        let out = state.sankey().unwrap().unwrap();
        assert_eq!(state.sankey_cache.builds(), 2);
        assert!(out.html.contains("width:800px"));
    }

    #[test]
    fn no_catalog_no_diagram() {
        let mut state = AppState::default();
        assert!(state.sankey().is_none());
    }

    #[test]
    fn select_none_hides_everything_and_all_restores() {
        let mut state = state();
        state.select_none("Method Family");
        assert!(state.visible_indices.is_empty());
        state.select_all("Method Family");
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn colour_column_defaults_to_community() {
        let state = state();
        assert_eq!(
            state.color_column.as_deref(),
            Some(ColumnNames::default().community.as_str())
        );
        assert!(state.color_map.is_some());
    }
}
