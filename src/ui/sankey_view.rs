use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};

use seqclust_explorer::color::to_color32;
use seqclust_explorer::sankey::{Diagnostics, SankeyDiagram};
use seqclust_explorer::state::AppState;

// ---------------------------------------------------------------------------
// Sankey summary (central panel)
// ---------------------------------------------------------------------------

/// Summarise the taxonomy flow of the visible methods. The diagram itself is
/// drawn by Plotly from the exported HTML.
pub fn sankey_panel(ui: &mut Ui, state: &mut AppState) {
    let output = match state.sankey() {
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a catalogue to see the taxonomy flow  (File → Open…)");
            });
            return;
        }
        Some(Err(e)) => {
            ui.label(RichText::new(format!("Sankey diagram unavailable: {e}")).color(Color32::RED));
            return;
        }
        Some(Ok(output)) => output,
    };
    let diagram = &output.diagram;

    ui.label(format!(
        "{} nodes, {} links  ·  File → Export Sankey (HTML)… to open the interactive diagram",
        diagram.nodes.len(),
        diagram.links.len()
    ));
    diagnostics_summary(ui, &diagram.diagnostics);
    ui.separator();

    family_chart(ui, diagram);
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Nodes");
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for node in &diagram.nodes {
                    ui.label(RichText::new("■").color(to_color32(node.color)));
                    ui.label(&node.label);
                    ui.add_space(8.0);
                }
            });
            ui.separator();
            link_table(ui, diagram);
        });
}

fn diagnostics_summary(ui: &mut Ui, diag: &Diagnostics) {
    if diag.is_clean() {
        ui.label("No data-quality issues.");
        return;
    }
    let warn = |ui: &mut Ui, text: String| {
        ui.label(RichText::new(text).color(Color32::from_rgb(210, 153, 34)));
    };
    if diag.discarded_rows > 0 {
        warn(ui, format!("{} row(s) with an unrecognised family left out", diag.discarded_rows));
    }
    for e in &diag.inverted_edges {
        warn(ui, format!("Removed inverted link {} → {} ({})", e.source, e.target, e.value));
    }
    for e in &diag.backward_links {
        warn(ui, format!("Left out backward link {} → {} ({})", e.source, e.target, e.value));
    }
    if !diag.uncolored_nodes.is_empty() {
        warn(
            ui,
            format!("No dominant family: {}", diag.uncolored_nodes.join(", ")),
        );
    }
}

fn family_chart(ui: &mut Ui, diagram: &SankeyDiagram) {
    let bars: Vec<Bar> = diagram
        .family_totals()
        .into_iter()
        .enumerate()
        .map(|(i, (family, total))| {
            Bar::new(i as f64, total as f64)
                .name(family.label())
                .fill(to_color32(family.color()))
        })
        .collect();

    Plot::new("family_totals")
        .height(160.0)
        .y_axis_label("Methods × data types")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn link_table(ui: &mut Ui, diagram: &SankeyDiagram) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(160.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Source");
            });
            header.col(|ui| {
                ui.strong("Target");
            });
            header.col(|ui| {
                ui.strong("Methods");
            });
        })
        .body(|mut body| {
            for link in &diagram.links {
                let source = &diagram.nodes[link.source];
                let target = &diagram.nodes[link.target];
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(RichText::new(&source.label).color(to_color32(source.color)));
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&target.label).color(to_color32(target.color)));
                    });
                    row.col(|ui| {
                        ui.label(link.value.to_string());
                    });
                });
            }
        });
}
