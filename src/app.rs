use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, results};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct QaExplorerApp {
    pub state: AppState,
}

impl QaExplorerApp {
    /// Build the app and load the configured source once.
    pub fn new(config: AppConfig) -> Self {
        let mut state = AppState::new(config);
        state.reload();
        Self { state }
    }
}

impl eframe::App for QaExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: search and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: category chart ----
        if self.state.show_chart {
            egui::TopBottomPanel::bottom("chart_panel")
                .default_height(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    plot::category_chart(ui, &self.state);
                });
        }

        // ---- Central panel: matching questions ----
        egui::CentralPanel::default().show(ctx, |ui| {
            results::results(ui, &self.state);
        });
    }
}
