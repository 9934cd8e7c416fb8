mod app;
mod color;
mod state;
mod ui;

use std::path::Path;

use app::SurveyPandaApp;
use eframe::egui;
use state::AppState;
use survey_panda::config::PipelineConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let mut state = AppState::new(PipelineConfig::from_env());

    // Optional file to open at start-up.
    if let Some(path) = std::env::args_os().nth(1) {
        state.load_path(Path::new(&path));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Survey Panda – Response Summary",
        options,
        Box::new(|_cc| Ok(Box::new(SurveyPandaApp::new(state)))),
    )
}
