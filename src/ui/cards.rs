use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use seqclust_explorer::card::{
    group_by_family, FamilyGroup, Implementation, MethodCard, RenderContext,
};
use seqclust_explorer::color::to_color32;
use seqclust_explorer::data::model::MethodRecord;
use seqclust_explorer::sankey::MethodFamily;
use seqclust_explorer::state::AppState;

// ---------------------------------------------------------------------------
// Method cards (central panel)
// ---------------------------------------------------------------------------

/// Render the visible methods as cards grouped by family.
pub fn method_cards(ui: &mut Ui, state: &AppState) {
    let catalog = match &state.catalog {
        Some(cat) => cat,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a catalogue to browse methods  (File → Open…)");
            });
            return;
        }
    };

    if state.visible_indices.is_empty() {
        ui.label("No method matches the current filters.");
        return;
    }

    let columns = &state.config.columns;
    let ctx = RenderContext {
        in_family_group: true,
    };

    if let Some(cm) = &state.color_map {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.strong(format!("{}:", cm.column));
            for (label, color) in cm.legend_entries() {
                ui.label(RichText::new(label).color(color));
            }
        });
        ui.separator();
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (group, members) in group_by_family(catalog, &state.visible_indices, columns) {
                let heading = RichText::new(format!("{}  ({})", group.label(), members.len()))
                    .heading()
                    .color(group_color(group));

                egui::CollapsingHeader::new(heading)
                    .id_salt(group.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        for idx in members {
                            let rec = &catalog.records[idx];
                            let card = MethodCard::from_record(rec, idx, columns, ctx);
                            method_card(ui, state, rec, &card);
                            ui.separator();
                        }
                    });
            }
        });
}

fn group_color(group: FamilyGroup) -> Color32 {
    match group {
        FamilyGroup::Family(family) => to_color32(family.color()),
        FamilyGroup::Other => Color32::GRAY,
    }
}

fn field(ui: &mut Ui, name: &str, value: &str) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.strong(format!("{name}:"));
        ui.label(value);
    });
}

fn method_card(ui: &mut Ui, state: &AppState, rec: &MethodRecord, card: &MethodCard) {
    // Title tinted by the colour-by column.
    let mut title = RichText::new(format!("{} {}", card.icon, card.title)).size(20.0);
    if let (Some(col), Some(cm)) = (&state.color_column, &state.color_map) {
        title = title.color(cm.color_for(rec.get(col)));
    }
    ui.label(title);

    ui.columns(2, |cols| {
        let left = &mut cols[0];
        field(left, "Year", &card.year);
        field(left, "Community", &card.community);
        field(left, "Subfamily", &card.subfamily);
        field(left, "Main Algorithm", &card.main_algorithm);
        field(left, "Dependency order", &card.dependency_order);
        field(left, "Key properties", &card.key_properties);
        if let Some(dt) = &card.data_type {
            field(left, "Data Type", dt);
        }

        let right = &mut cols[1];
        field(right, "Original Article", &card.original_article);
        field(right, "Published in", &card.published_in);
        if let Some(family) = &card.family {
            let color = MethodFamily::from_label(family)
                .map(|f| to_color32(f.color()))
                .unwrap_or(Color32::GRAY);
            right.horizontal(|ui: &mut Ui| {
                ui.strong("Family Method:");
                ui.label(RichText::new(family).color(color));
            });
        }
        field(right, "Applied in", &card.applied_in);
        if let Some(link) = &card.article_link {
            right.horizontal_wrapped(|ui: &mut Ui| {
                ui.strong("Article link:");
                ui.hyperlink(link);
            });
        }
        match &card.implementation {
            Implementation::Link(link) => {
                right.horizontal_wrapped(|ui: &mut Ui| {
                    ui.strong("Implementation link:");
                    ui.hyperlink(link);
                });
            }
            Implementation::NotPublic => {
                right.label(RichText::new("No public implementation available").italics());
            }
            Implementation::Unknown => {}
        }
    });
}
