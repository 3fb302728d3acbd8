use std::collections::{HashMap, HashSet};

use palette::Srgb;

use super::family::{FamilyTally, MethodFamily};
use super::taxonomy::{Edge, TaxonomyTables};

/// Colour of nodes with no weight toward any family.
pub const NEUTRAL_GRAY: Srgb<u8> = Srgb::new(169, 169, 169);

// ---------------------------------------------------------------------------
// Diagram description
// ---------------------------------------------------------------------------

/// Which tier a node label was first seen in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTier {
    DataType,
    Family,
    Subfamily,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SankeyNode {
    pub label: String,
    pub tier: NodeTier,
    /// Family the colour was inherited from; `None` for gray nodes.
    pub dominant: Option<MethodFamily>,
    pub color: Srgb<u8>,
}

/// Index-coded link. `source < target` for every link in a [`SankeyDiagram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: u32,
}

/// Data-quality findings collected while building. None of these are errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Exploded rows dropped for an unrecognised family.
    pub discarded_rows: usize,
    /// Family → data type edges removed by the repair pass.
    pub inverted_edges: Vec<Edge>,
    /// Edges whose source index was not below their target index.
    pub backward_links: Vec<Edge>,
    /// Labels of nodes that fell back to the neutral colour.
    pub uncolored_nodes: Vec<String>,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.discarded_rows == 0
            && self.inverted_edges.is_empty()
            && self.backward_links.is_empty()
            && self.uncolored_nodes.is_empty()
    }
}

/// Everything needed to draw the flow: nodes by index, links, findings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SankeyDiagram {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
    pub diagnostics: Diagnostics,
}

impl SankeyDiagram {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn node_index(&self, label: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.label == label)
    }

    /// Total link weight leaving each family node, canonical order.
    pub fn family_totals(&self) -> Vec<(MethodFamily, u32)> {
        MethodFamily::CANONICAL
            .into_iter()
            .filter_map(|family| {
                let idx = self.node_index(family.label())?;
                let out: u32 = self
                    .links
                    .iter()
                    .filter(|l| l.source == idx)
                    .map(|l| l.value)
                    .sum();
                let inflow: u32 = self
                    .links
                    .iter()
                    .filter(|l| l.target == idx)
                    .map(|l| l.value)
                    .sum();
                Some((family, out.max(inflow)))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq)]
enum Origin {
    TypeToFamily,
    FamilyToSubfamily,
}

/// Merge both edge tables into an indexed, coloured flow graph.
pub fn build(tables: &TaxonomyTables) -> SankeyDiagram {
    let mut diagnostics = Diagnostics {
        discarded_rows: tables.discarded_rows,
        ..Diagnostics::default()
    };

    // -- Edge repair --
    let data_types: HashSet<&str> = tables.data_types.iter().map(String::as_str).collect();
    let mut edges: Vec<(Origin, &Edge)> = Vec::new();
    let combined = tables
        .type_to_family
        .iter()
        .map(|e| (Origin::TypeToFamily, e))
        .chain(
            tables
                .family_to_subfamily
                .iter()
                .map(|e| (Origin::FamilyToSubfamily, e)),
        );
    for (origin, edge) in combined {
        if MethodFamily::is_family_label(&edge.source) && data_types.contains(edge.target.as_str()) {
            diagnostics.inverted_edges.push(edge.clone());
        } else {
            edges.push((origin, edge));
        }
    }
    if !diagnostics.inverted_edges.is_empty() {
        log::warn!(
            "removed {} invalid link(s) (family pointing back to a data type)",
            diagnostics.inverted_edges.len()
        );
        for e in &diagnostics.inverted_edges {
            log::warn!("  {} -> {} ({})", e.source, e.target, e.value);
        }
    }

    // -- Label ordering --
    let mut nodes: Vec<SankeyNode> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    // A data type spelled like a family carries no tier-1 flow (its Table A
    // edges are filtered) and would otherwise claim the family's slot.
    let tiers = tables
        .data_types
        .iter()
        .filter(|l| !MethodFamily::is_family_label(l))
        .map(|l| (l.as_str(), NodeTier::DataType))
        .chain(tables.families.iter().map(|f| (f.label(), NodeTier::Family)))
        .chain(
            tables
                .subfamilies
                .iter()
                .map(|l| (l.as_str(), NodeTier::Subfamily)),
        );
    for (label, tier) in tiers {
        if index.contains_key(label) {
            continue;
        }
        index.insert(label.to_string(), nodes.len());
        nodes.push(SankeyNode {
            label: label.to_string(),
            tier,
            dominant: None,
            color: NEUTRAL_GRAY,
        });
    }

    // -- Dominant-family colouring --
    let mut outgoing: HashMap<&str, FamilyTally> = HashMap::new();
    let mut incoming: HashMap<&str, FamilyTally> = HashMap::new();
    for (origin, e) in &edges {
        match origin {
            Origin::TypeToFamily => {
                if let Some(family) = MethodFamily::from_label(&e.target) {
                    outgoing.entry(e.source.as_str()).or_default().add(family, e.value);
                }
            }
            Origin::FamilyToSubfamily => {
                if let Some(family) = MethodFamily::from_label(&e.source) {
                    incoming.entry(e.target.as_str()).or_default().add(family, e.value);
                }
            }
        }
    }
    for node in &mut nodes {
        node.dominant = match MethodFamily::from_label(&node.label) {
            Some(family) => Some(family),
            None => {
                let tally = match node.tier {
                    NodeTier::DataType => outgoing.get(node.label.as_str()),
                    _ => incoming.get(node.label.as_str()),
                };
                tally.and_then(FamilyTally::dominant)
            }
        };
        match node.dominant {
            Some(family) => node.color = family.color(),
            None => {
                node.color = NEUTRAL_GRAY;
                diagnostics.uncolored_nodes.push(node.label.clone());
            }
        }
    }
    if !diagnostics.uncolored_nodes.is_empty() {
        log::debug!(
            "{} node(s) without a dominant family: {:?}",
            diagnostics.uncolored_nodes.len(),
            diagnostics.uncolored_nodes
        );
    }

    // -- Index remap + sanity check --
    let mut links = Vec::with_capacity(edges.len());
    for (_, e) in &edges {
        let (Some(&source), Some(&target)) = (index.get(&e.source), index.get(&e.target)) else {
            log::warn!("link {} -> {} references an unknown label", e.source, e.target);
            continue;
        };
        if source >= target {
            diagnostics.backward_links.push((*e).clone());
            continue;
        }
        links.push(SankeyLink {
            source,
            target,
            value: e.value,
        });
    }
    if diagnostics.backward_links.is_empty() {
        log::debug!("no link flows right to left");
    } else {
        log::warn!(
            "{} link(s) flow right to left and were left out:",
            diagnostics.backward_links.len()
        );
        for e in &diagnostics.backward_links {
            log::warn!(
                "  {} (#{}) -> {} (#{}) ({})",
                e.source,
                index[&e.source],
                e.target,
                index[&e.target],
                e.value
            );
        }
    }

    SankeyDiagram {
        nodes,
        links,
        diagnostics,
    }
}
