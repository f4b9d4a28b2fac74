use anyhow::Result;
use cap_rankings::app::RankingsApp;
use cap_rankings::config::DashboardConfig;
use cap_rankings::data::DataSource;
use cap_rankings::state::AppState;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::discover()?;
    let source = DataSource::new(config.data_paths.iter().cloned());
    let state = AppState::from_load(source.load(), config.default_companies, config.default_sort);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Global Companies Rankings",
        options,
        Box::new(|cc| {
            // Install image loaders so the logo column can render png/jpg.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(RankingsApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
