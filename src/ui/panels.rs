use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use survey_panda::data::model::QUESTION_COLUMNS;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – pipeline summary and group table
// ---------------------------------------------------------------------------

/// Render the left summary panel.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Summary");
    ui.separator();

    let Some(report) = &state.report else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("summary_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    let rows = [
                        ("Loaded", report.loaded_len),
                        ("Valid email", report.cleaned_len),
                        ("Imputed", report.imputed_rows.len()),
                        ("Scored", report.scored.len() - report.scored.absent_scores()),
                        ("No score", report.scored.absent_scores()),
                        ("In histogram", report.histogram.total()),
                    ];
                    for (label, value) in rows {
                        ui.label(label);
                        ui.label(value.to_string());
                        ui.end_row();
                    }
                });

            ui.add_space(8.0);
            ui.label(format!(
                "Scores need at most {} missing grade(s).",
                state.config.max_allowed_missing
            ));

            ui.separator();
            ui.strong("Mean grade per group");
            group_means_table(ui, state);
        });
}

/// Table of per-question means, one row per observed group.
pub fn group_means_table(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .column(Column::auto())
        .columns(Column::auto(), QUESTION_COLUMNS.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Group");
            });
            header.col(|ui| {
                ui.strong("n");
            });
            for q in QUESTION_COLUMNS {
                header.col(|ui| {
                    let color = state.question_colors.color_for(&q);
                    ui.label(RichText::new(q).strong().color(color));
                });
            }
        })
        .body(|mut body| {
            for (key, group) in &report.group_means {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(state.group_label(&key.gender, key.over_threshold));
                    });
                    row.col(|ui| {
                        ui.label(group.members.to_string());
                    });
                    for mean in group.means {
                        row.col(|ui| {
                            let text = mean.map(|m| format!("{m:.2}"));
                            ui.label(text.unwrap_or_else(|| "–".into()));
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(report), Some(path)) = (&state.report, &state.source_path) {
            ui.label(format!(
                "{}: {} subjects, {} with a valid email",
                path.display(),
                report.loaded_len,
                report.cleaned_len
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open survey responses")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
