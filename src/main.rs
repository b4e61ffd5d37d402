mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::RideDashboardApp;
use eframe::egui;
use ride_dashboard::config::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let data_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|dir| DashboardConfig::discover(&dir))
    {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config: {e:#}");
            DashboardConfig::default()
        }
    }
    .with_data_path(data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let title = config.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(RideDashboardApp::new(&config)))),
    )
}
