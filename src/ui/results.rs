use eframe::egui::{self, RichText, ScrollArea, TextStyle, Ui};
use egui_extras::{Column, TableBuilder};

use crate::config::ResultLayout;
use crate::data::filter::ResultView;
use crate::state::AppState;
use crate::ui::panels::{status_color, status_label};

// ---------------------------------------------------------------------------
// Matching records (central panel)
// ---------------------------------------------------------------------------

/// Render the records that pass the current query.
pub fn results(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.view() else {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add_space(40.0);
            match &state.status_message {
                Some(msg) => {
                    ui.heading(RichText::new(&msg.text).color(status_color(msg.level)));
                    if let Some(hint) = &msg.hint {
                        ui.label(hint);
                    }
                }
                None => {
                    ui.heading("Open a question file to begin  (File → Open…)");
                }
            }
        });
        return;
    };

    ui.heading("Explore the Questions");
    if let Some(summary) = state.summary() {
        ui.label(summary);
    }
    ui.separator();

    if view.is_empty() {
        if let Some(msg) = state.empty_result_message() {
            status_label(ui, &msg);
        }
        return;
    }

    match state.layout {
        ResultLayout::Cards => cards(ui, state, &view),
        ResultLayout::Table => table(ui, state, &view),
    }
}

fn cards(ui: &mut Ui, state: &AppState, view: &ResultView<'_>) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for rec in view.iter() {
                ui.label(RichText::new(&rec.question).heading().strong());
                ui.label(
                    RichText::new(&rec.category)
                        .small()
                        .color(state.color_map.color_for(&rec.category)),
                );
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.label(RichText::new("Answer:").strong());
                    if rec.has_answer() {
                        ui.label(&rec.answer);
                    } else {
                        ui.label(RichText::new(&rec.answer).italics().weak());
                    }
                });
                ui.separator();
            }
        });
}

fn table(ui: &mut Ui, state: &AppState, view: &ResultView<'_>) {
    let row_height = ui.text_style_height(&TextStyle::Body) + 6.0;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(36.0))
        .column(Column::initial(140.0).at_least(80.0).clip(true))
        .column(Column::initial(360.0).at_least(120.0).clip(true))
        .column(Column::remainder().clip(true))
        .header(22.0, |mut header| {
            for title in ["#", "Category", "Question", "Answer"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(row_height, view.len(), |mut row| {
                let Some(rec) = view.get(row.index()) else {
                    return;
                };
                row.col(|ui: &mut Ui| {
                    if let Some(n) = rec.ordinal {
                        ui.label(n.to_string());
                    }
                });
                row.col(|ui: &mut Ui| {
                    ui.colored_label(state.color_map.color_for(&rec.category), &rec.category);
                });
                row.col(|ui: &mut Ui| {
                    ui.add(egui::Label::new(&rec.question).truncate())
                        .on_hover_text(&rec.question);
                });
                row.col(|ui: &mut Ui| {
                    ui.add(egui::Label::new(&rec.answer).truncate())
                        .on_hover_text(&rec.answer);
                });
            });
        });
}
