use eframe::egui;

use seqclust_explorer::state::{AppState, View};

use crate::ui::{cards, panels, sankey_view};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    pub state: AppState,
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: cards or Sankey ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Methods => cards::method_cards(ui, &self.state),
            View::Sankey => sankey_view::sankey_panel(ui, &mut self.state),
        });
    }
}
