use seqclust_explorer::data::model::{CellValue, MethodCatalog, MethodRecord};
use seqclust_explorer::sankey::{
    builder, plot_sankey, taxonomy, ColumnNames, MethodFamily, RenderParams, SankeyError,
    NEUTRAL_GRAY,
};

fn record(dt: &str, family: &str, sub: &str) -> MethodRecord {
    let cols = ColumnNames::default();
    MethodRecord::new()
        .with(&cols.community, "Statistics")
        .with(&cols.data_type, dt)
        .with(&cols.family, family)
        .with(&cols.subfamily, sub)
}

fn catalog(records: Vec<MethodRecord>) -> MethodCatalog {
    let cols = ColumnNames::default();
    MethodCatalog::from_records(
        vec![cols.community, cols.data_type, cols.family, cols.subfamily],
        records,
    )
}

fn all(cat: &MethodCatalog) -> Vec<usize> {
    (0..cat.len()).collect()
}

fn labels(out: &seqclust_explorer::sankey::SankeyOutput) -> Vec<&str> {
    out.diagram.nodes.iter().map(|n| n.label.as_str()).collect()
}

fn link_triples(out: &seqclust_explorer::sankey::SankeyOutput) -> Vec<(&str, &str, u32)> {
    let nodes = &out.diagram.nodes;
    out.diagram
        .links
        .iter()
        .map(|l| (nodes[l.source].label.as_str(), nodes[l.target].label.as_str(), l.value))
        .collect()
}

#[test]
fn three_record_scenario() {
    let cat = catalog(vec![
        record("A,B", "Model-based", "X"),
        record("B", "Feature-based", "Y"),
        record("C", "Unknown", "Z"),
    ]);
    let out = plot_sankey(&cat, &all(&cat), &ColumnNames::default(), &RenderParams::default())
        .unwrap();

    assert_eq!(labels(&out), ["A", "B", "Model-based", "Feature-based", "X", "Y"]);
    assert_eq!(
        link_triples(&out),
        [
            ("A", "Model-based", 1),
            ("B", "Model-based", 1),
            ("B", "Feature-based", 1),
            ("Model-based", "X", 1),
            ("Feature-based", "Y", 1),
        ]
    );
    assert_eq!(out.diagram.diagnostics.discarded_rows, 1);
}

#[test]
fn subfamily_weights_count_methods() {
    let cat = catalog(vec![
        record("A,B,C", "Model-based", "X"),
        record("B", "Model-based", "X"),
        record("B", "Feature-based", "Y"),
    ]);
    let out = plot_sankey(&cat, &all(&cat), &ColumnNames::default(), &RenderParams::default())
        .unwrap();
    assert!(link_triples(&out).contains(&("Model-based", "X", 2)));
    assert!(link_triples(&out).contains(&("Feature-based", "Y", 1)));
}

#[test]
fn empty_selection_is_an_empty_diagram() {
    let cat = catalog(vec![record("A", "Model-based", "X")]);
    let out = plot_sankey(&cat, &[], &ColumnNames::default(), &RenderParams::default()).unwrap();

    assert!(out.diagram.nodes.is_empty());
    assert!(out.diagram.links.is_empty());
    assert!(out.html.contains("Plotly.newPlot"));
}

#[test]
fn missing_column_fails_fast() {
    let cat = MethodCatalog::from_records(
        vec!["Data type (standardized)".into()],
        vec![MethodRecord::new().with("Data type (standardized)", "A")],
    );
    let err = plot_sankey(&cat, &[0], &ColumnNames::default(), &RenderParams::default())
        .unwrap_err();
    assert!(matches!(err, SankeyError::MissingColumn(_)));
}

#[test]
fn building_twice_is_identical() {
    let cat = catalog(vec![
        record("Care trajectories, DNA", "Distance-based", "OM"),
        record("DNA", "Model-based", "HMM"),
        record("Web logs", "Feature-based", " Embeddings"),
    ]);
    let params = RenderParams::default();
    let first = plot_sankey(&cat, &all(&cat), &ColumnNames::default(), &params).unwrap();
    let second = plot_sankey(&cat, &all(&cat), &ColumnNames::default(), &params).unwrap();

    assert_eq!(first, second);
    assert_eq!(labels(&first)[0], "Care trajectories");
    assert!(labels(&first).contains(&"Embeddings"));
}

#[test]
fn equal_weights_resolve_to_model_based() {
    let mut records = Vec::new();
    for _ in 0..5 {
        records.push(record("A", "Model-based", "X"));
        records.push(record("A", "Feature-based", "Y"));
    }
    let cat = catalog(records);
    let out = plot_sankey(&cat, &all(&cat), &ColumnNames::default(), &RenderParams::default())
        .unwrap();

    let a = out.diagram.node_index("A").unwrap();
    assert_eq!(out.diagram.nodes[a].dominant, Some(MethodFamily::ModelBased));
    assert_eq!(out.diagram.nodes[a].color, MethodFamily::ModelBased.color());
}

#[test]
fn subfamily_named_like_a_data_type_is_repaired() {
    // "DNA" is both a data type and a subfamily: the Model-based → DNA link
    // would flow backwards.
    let cat = catalog(vec![
        record("DNA", "Feature-based", "Embeddings"),
        record("Web logs", "Model-based", "DNA"),
    ]);
    let tables = taxonomy::extract(cat.records.iter(), &ColumnNames::default());
    let diagram = builder::build(&tables);

    assert_eq!(diagram.diagnostics.inverted_edges.len(), 1);
    assert_eq!(diagram.diagnostics.inverted_edges[0].target, "DNA");
    assert!(diagram.links.iter().all(|l| l.source < l.target));
    // DNA keeps its data-type colour from the Feature-based link.
    let dna = diagram.node_index("DNA").unwrap();
    assert_eq!(diagram.nodes[dna].color, MethodFamily::FeatureBased.color());
    assert_ne!(diagram.nodes[dna].color, NEUTRAL_GRAY);
}

#[test]
fn caller_catalog_is_left_untouched() {
    let cat = catalog(vec![record(" A , B ", "Model-based", "  X  ")]);
    let before = cat.records.clone();
    plot_sankey(&cat, &all(&cat), &ColumnNames::default(), &RenderParams::default()).unwrap();
    assert_eq!(cat.records, before);
    assert_eq!(
        cat.records[0].get(&ColumnNames::default().subfamily),
        &CellValue::from("  X  ")
    );
}

#[test]
fn data_type_spelled_like_a_family_keeps_real_links() {
    let cat = catalog(vec![
        record("Model-based", "Feature-based", "Y"),
        record("DNA", "Model-based", "X"),
        record("Web logs", "Model-based", "X"),
    ]);
    let out = plot_sankey(&cat, &all(&cat), &ColumnNames::default(), &RenderParams::default())
        .unwrap();

    assert_eq!(
        labels(&out),
        ["DNA", "Weblogs", "Feature-based", "Model-based", "Y", "X"]
    );
    let links = link_triples(&out);
    assert!(links.contains(&("DNA", "Model-based", 1)));
    assert!(links.contains(&("Weblogs", "Model-based", 1)));
    assert!(links.contains(&("Model-based", "X", 2)));
    assert!(links.contains(&("Feature-based", "Y", 1)));
    assert!(out.diagram.diagnostics.backward_links.is_empty());
}
