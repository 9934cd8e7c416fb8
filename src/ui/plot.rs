use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use survey_panda::data::aggregate::AgeHistogram;
use survey_panda::data::model::QUESTION_COLUMNS;

use crate::state::AppState;

/// Horizontal space one group takes in the grouped-means chart.
const GROUP_BAR_WIDTH: f64 = 0.15;

// ---------------------------------------------------------------------------
// Central panel: both charts stacked
// ---------------------------------------------------------------------------

/// Render the summary charts in the central panel.
pub fn summary_plots(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a survey file to view results  (File → Open…)");
        });
        return;
    };

    let half = ui.available_height() / 2.0 - 8.0;

    ui.strong("Age distribution across all subjects");
    age_histogram_plot(ui, &report.histogram, half);

    ui.separator();

    ui.strong("Average grades by gender and age group");
    group_means_plot(ui, state, half);
}

// ---------------------------------------------------------------------------
// Age histogram
// ---------------------------------------------------------------------------

pub fn age_histogram_plot(ui: &mut Ui, hist: &AgeHistogram, height: f32) {
    let bars: Vec<Bar> = hist
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            Bar::new(hist.bin_center(i), count as f64)
                .width(hist.edges[i + 1] - hist.edges[i])
                .name(format!("{}–{}", hist.edges[i], hist.edges[i + 1]))
        })
        .collect();

    let chart = BarChart::new(bars)
        .name("Counts")
        .color(Color32::LIGHT_BLUE);

    Plot::new("age_histogram")
        .height(height)
        .x_axis_label("Age")
        .y_axis_label("Counts")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// One bar series per question, one cluster of bars per group.
pub fn group_means_plot(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(report) = &state.report else {
        return;
    };

    let labels: Vec<String> = report
        .group_means
        .keys()
        .map(|k| state.group_label(&k.gender, k.over_threshold))
        .collect();

    let charts: Vec<BarChart> = QUESTION_COLUMNS
        .iter()
        .enumerate()
        .map(|(q, name)| {
            let offset = (q as f64 - (QUESTION_COLUMNS.len() as f64 - 1.0) / 2.0) * GROUP_BAR_WIDTH;
            let bars = report
                .group_means
                .values()
                .enumerate()
                .filter_map(|(g, group)| {
                    let mean = group.means[q]?;
                    Some(Bar::new(g as f64 + offset, mean).width(GROUP_BAR_WIDTH))
                })
                .collect();
            BarChart::new(bars)
                .name(*name)
                .color(state.question_colors.color_for(name))
        })
        .collect();

    Plot::new("group_means")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Gender and age group")
        .y_axis_label("Average score")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
