use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::{CategoryWidget, ResultLayout};
use crate::data::filter::SortOrder;
use crate::data::model::QaDataset;
use crate::state::{AppState, StatusLevel, StatusMessage};

/// Text colour for a status level.
pub fn status_color(level: StatusLevel) -> Color32 {
    match level {
        StatusLevel::Info => Color32::GRAY,
        StatusLevel::Warning => Color32::from_rgb(230, 160, 40),
        StatusLevel::Error => Color32::RED,
    }
}

/// One status line; the hint, if any, shows on hover.
pub fn status_label(ui: &mut Ui, msg: &StatusMessage) {
    let response = ui.label(RichText::new(&msg.text).color(status_color(msg.level)));
    if let Some(hint) = &msg.hint {
        response.on_hover_text(hint);
    }
}

// ---------------------------------------------------------------------------
// Left side panel – search and filter widgets
// ---------------------------------------------------------------------------

/// Render the left search / filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Search");
    ui.separator();

    let mut search = state.query.search.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut search)
            .hint_text("e.g., 'event loop' or 'What is npm?'")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        state.set_search(&search);
    }
    ui.add_space(8.0);

    ui.heading("Filters");
    ui.separator();

    // Cheap Arc clone so the state can be mutated while iterating categories.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut by_number = state.query.sort == SortOrder::Ordinal;
    if ui.checkbox(&mut by_number, "Sort by question number").changed() {
        state.set_sort_by_ordinal(by_number);
    }
    ui.checkbox(&mut state.show_chart, "Questions per category chart");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Layout");
        ui.selectable_value(&mut state.layout, ResultLayout::Cards, "Cards");
        ui.selectable_value(&mut state.layout, ResultLayout::Table, "Table");
    });
    ui.separator();

    match state.config.category_widget {
        CategoryWidget::Multi => category_checkboxes(ui, state, &dataset),
        CategoryWidget::Single => category_combo(ui, state, &dataset),
    }
}

fn category_checkboxes(ui: &mut Ui, state: &mut AppState, dataset: &QaDataset) {
    // Show count of selected / total in the header
    let n_total = dataset.category_count();
    let n_selected = dataset
        .categories()
        .filter(|c| state.is_category_selected(c))
        .count();
    let header_text = format!("Category  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("category_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all();
                }
                if ui.small_button("None").clicked() {
                    state.select_none();
                }
            });

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    for (category, count) in dataset.category_counts() {
                        let text = RichText::new(format!("{category}  ({count})"))
                            .color(state.color_map.color_for(category));
                        let mut checked = state.is_category_selected(category);
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_category(category);
                        }
                    }
                });
        });
}

fn category_combo(ui: &mut Ui, state: &mut AppState, dataset: &QaDataset) {
    const ALL: &str = "All categories";

    ui.strong("Category");
    let current = state.single_category().map(str::to_string);
    let mut choice: Option<Option<String>> = None;

    egui::ComboBox::from_id_salt("category_select")
        .selected_text(current.as_deref().unwrap_or(ALL))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), ALL).clicked() {
                choice = Some(None);
            }
            for category in dataset.categories() {
                let selected = current.as_deref() == Some(category);
                if ui.selectable_label(selected, category).clicked() {
                    choice = Some(Some(category.to_string()));
                }
            }
        });

    if let Some(choice) = choice {
        state.select_category(choice.as_deref());
    }
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
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(summary) = state.summary() {
            ui.label(summary);
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            status_label(ui, msg);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open question file")
        .add_filter("Supported files", &["csv", "tsv", "tab", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv", "tab"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
