mod app;
mod ui;

use app::ExplorerApp;
use eframe::egui;
use seqclust_explorer::config::ExplorerConfig;
use seqclust_explorer::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match ExplorerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Falling back to default config: {e:#}");
            ExplorerConfig::default()
        }
    };
    let mut state = AppState::new(config);
    if let Some(path) = state.config.catalog_path.clone() {
        ui::panels::load_catalog(&mut state, &path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Categorical Sequence Clustering Methods",
        options,
        Box::new(|_cc| Ok(Box::new(ExplorerApp { state }))),
    )
}
