use std::path::{Path, PathBuf};

use survey_panda::config::PipelineConfig;
use survey_panda::data::loader::SurveySource;
use survey_panda::data::model::QUESTION_COLUMNS;
use survey_panda::pipeline::{self, PipelineReport};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Pipeline parameters used for every load.
    pub config: PipelineConfig,

    /// Results for the current file (None until user loads a file).
    pub report: Option<PipelineReport>,

    /// Resolved path of the current file.
    pub source_path: Option<PathBuf>,

    /// One colour per question for the grouped-means chart.
    pub question_colors: ColorMap<&'static str>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            report: None,
            source_path: None,
            question_colors: ColorMap::new(QUESTION_COLUMNS),
            status_message: None,
        }
    }

    /// Load a survey file and run the pipeline over it. Failures end up in
    /// `status_message`; the previous report is kept.
    pub fn load_path(&mut self, path: &Path) {
        let result = SurveySource::open(path)
            .map_err(anyhow::Error::from)
            .and_then(|source| Ok((source.read_data()?, source)));

        match result {
            Ok((dataset, source)) => {
                let report = pipeline::run(dataset, &self.config);
                self.set_report(report, source.path().to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a freshly computed report.
    pub fn set_report(&mut self, report: PipelineReport, path: PathBuf) {
        self.report = Some(report);
        self.source_path = Some(path);
        self.status_message = None;
    }

    /// Human-readable label for a group row, e.g. `Female, age > 40`.
    pub fn group_label(&self, gender: impl std::fmt::Display, over_threshold: bool) -> String {
        let op = if over_threshold { ">" } else { "≤" };
        format!("{gender}, age {op} {}", self.config.age_threshold)
    }
}
