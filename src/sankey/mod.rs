/// Taxonomy flow: filtered records → edge tables → coloured Sankey diagram.
///
/// Architecture:
/// ```text
///  filtered MethodRecords
///        │
///        ▼
///   ┌──────────┐
///   │ taxonomy  │  normalise + explode data types → edge tables A and B
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ builder   │  repair, index, colour, sanity check → SankeyDiagram
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ render    │  Plotly trace → HTML fragment
///   └──────────┘
/// ```
pub mod builder;
pub mod family;
pub mod render;
pub mod taxonomy;

use crate::data::model::MethodCatalog;

pub use builder::{Diagnostics, NodeTier, SankeyDiagram, SankeyLink, SankeyNode, NEUTRAL_GRAY};
pub use family::{FamilyTally, MethodFamily};
pub use render::{render_html, RenderParams};
pub use taxonomy::{ColumnNames, Edge, TaxonomyTables};

/// Failures that stop a diagram from being produced. Dirty data is never one
/// of them; it ends up in [`Diagnostics`].
#[derive(Debug, thiserror::Error)]
pub enum SankeyError {
    #[error("required column '{0}' is missing from the catalogue")]
    MissingColumn(String),

    #[error("invalid diagram size {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("charting runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("could not serialise the diagram: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A built diagram together with its HTML serialisation.
#[derive(Debug, Clone, PartialEq)]
pub struct SankeyOutput {
    pub diagram: SankeyDiagram,
    pub html: String,
}

/// Run the whole pipeline over the records at `indices`.
///
/// The catalogue is only read; an empty selection yields an empty diagram.
pub fn plot_sankey(
    catalog: &MethodCatalog,
    indices: &[usize],
    columns: &ColumnNames,
    params: &RenderParams,
) -> Result<SankeyOutput, SankeyError> {
    let tables = taxonomy::extract_from_catalog(catalog, indices, columns)?;
    let diagram = builder::build(&tables);
    let html = render_html(&diagram, params)?;
    log::debug!(
        "sankey: {} node(s), {} link(s) from {} record(s)",
        diagram.nodes.len(),
        diagram.links.len(),
        indices.len()
    );
    Ok(SankeyOutput { diagram, html })
}
