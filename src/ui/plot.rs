use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Questions per category (bottom panel)
// ---------------------------------------------------------------------------

/// Bar chart of record counts per category over the whole dataset.
pub fn category_chart(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) if !ds.is_empty() => ds,
        _ => {
            ui.label("No questions to chart.");
            return;
        }
    };

    Plot::new("category_chart")
        .legend(Legend::default())
        .y_axis_label("Questions")
        .show_axes([false, true])
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            // One chart per category so each gets a legend entry.
            for (i, (category, &count)) in dataset.category_counts().iter().enumerate() {
                let color = state.color_map.color_for(category);
                let bar = Bar::new(i as f64, count as f64)
                    .name(category)
                    .fill(color)
                    .width(0.7);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(category).color(color));
            }
        });
}
