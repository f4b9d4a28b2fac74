use eframe::egui;

use crate::state::AppState;
use crate::ui::panels::{self, Tab};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RankingsApp {
    pub state: AppState,
    pub tab: Tab,
}

impl RankingsApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            tab: Tab::default(),
        }
    }
}

impl eframe::App for RankingsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // A failed startup load shows only the error, no partial dashboard.
        if let Some(message) = &self.state.fatal_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::fatal_error(ui, message);
            });
            return;
        }

        // ---- Top panel: menu bar + sample warning ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
            panels::sample_banner(ui, &self.state);
        });

        // ---- Bottom panel: footer ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(
                    egui::RichText::new("Global Companies Rankings Dashboard")
                        .color(crate::color::NAVY)
                        .size(26.0)
                        .strong(),
                );
                ui.label("Comprehensive Analysis of World's Leading Companies");
            });
            ui.separator();

            match &self.state.view {
                Some(view) => panels::dashboard(ui, view, self.state.data_dir(), &mut self.tab),
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.heading("Open a file to view companies  (File → Open…)");
                    });
                }
            }
        });
    }
}
