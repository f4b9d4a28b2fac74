use std::path::Path;

use chrono::Local;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::NAVY;
use crate::config::companies_slider_bounds;
use crate::data::export::export_file_name;
use crate::data::summary::CONCENTRATION_TOP_N;
use crate::data::{DataOrigin, NumericColumn, SortBy};
use crate::state::{AppState, DashboardView};
use crate::ui::format::{billions, billions_precise, thousands, usd};
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let source = match &state.source {
        Some(table) => table.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    let mut changed = false;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Number of companies ----
            let (min, max, _) =
                companies_slider_bounds(source.len(), state.controls.number_of_companies);
            changed |= ui
                .add(
                    egui::Slider::new(&mut state.controls.number_of_companies, min..=max)
                        .text("Number of Companies to Display"),
                )
                .changed();
            ui.separator();

            // ---- Numeric ranges ----
            ui.strong("Market Cap Filter (Billion USD)");
            changed |= range_sliders(
                ui,
                &mut state.controls.market_cap_range,
                source.bounds(NumericColumn::MarketCap),
            );
            ui.separator();

            ui.strong("Stock Price Filter (USD)");
            changed |= range_sliders(
                ui,
                &mut state.controls.price_range,
                source.bounds(NumericColumn::Price),
            );
            ui.separator();

            // ---- Search ----
            ui.strong("Search Company");
            changed |= ui.text_edit_singleline(&mut state.controls.search_term).changed();
            ui.separator();

            // ---- Sort ----
            ui.strong("Sort By");
            let current = state.controls.sort_by;
            egui::ComboBox::from_id_salt("sort_by")
                .selected_text(current.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for choice in SortBy::ALL {
                        ui.selectable_value(&mut state.controls.sort_by, choice, choice.label());
                    }
                });
            changed |= state.controls.sort_by != current;
        });

    if changed {
        state.refilter();
    }
}

/// Lower/upper sliders over `bounds`; keeps `lo <= hi`.
fn range_sliders(ui: &mut Ui, range: &mut (f64, f64), bounds: Option<(f64, f64)>) -> bool {
    let Some((min, max)) = bounds else {
        ui.label("No values.");
        return false;
    };
    let lo_changed = ui
        .add(egui::Slider::new(&mut range.0, min..=max).text("min"))
        .changed();
    let hi_changed = ui
        .add(egui::Slider::new(&mut range.1, min..=max).text("max"))
        .changed();
    if range.0 > range.1 {
        if lo_changed {
            range.1 = range.0;
        } else {
            range.0 = range.1;
        }
    }
    lo_changed || hi_changed
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
            let can_export = state.view.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(source), Some(view)) = (&state.source, &state.view) {
            ui.label(format!(
                "{} companies loaded, {} shown",
                source.len(),
                view.table.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Warning banner shown while the built-in sample is in use.
pub fn sample_banner(ui: &mut Ui, state: &AppState) {
    let Some(DataOrigin::Sample { tried }) = &state.origin else {
        return;
    };
    let paths: Vec<String> = tried.iter().map(|p| p.display().to_string()).collect();
    ui.colored_label(
        Color32::from_rgb(0xB7, 0x79, 0x1F),
        format!(
            "⚠ Using sample data because no data file was found (looked for: {}).",
            paths.join(", ")
        ),
    );
}

/// Full-window error shown when the startup load failed.
pub fn fatal_error(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(
            RichText::new(format!("Failed to process data:\n\n{message}"))
                .color(Color32::RED)
                .size(18.0),
        );
    });
}

/// Attribution and today's date.
pub fn footer(ui: &mut Ui) {
    ui.horizontal_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(format!(
                "Source: companiesmarketcap.com | Last Updated: {}",
                Local::now().format("%d.%m.%Y")
            ))
            .color(NAVY)
            .small(),
        );
    });
}

// ---------------------------------------------------------------------------
// Dashboard tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Rankings,
    MarketAnalysis,
    PriceAnalysis,
    Insights,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::Rankings,
        Tab::MarketAnalysis,
        Tab::PriceAnalysis,
        Tab::Insights,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Rankings => "Rankings",
            Tab::MarketAnalysis => "Market Analysis",
            Tab::PriceAnalysis => "Price Analysis",
            Tab::Insights => "Insights",
        }
    }
}

/// Headline cards plus the selected tab.
pub fn dashboard(ui: &mut Ui, view: &DashboardView, logo_base: Option<&Path>, tab: &mut Tab) {
    let metrics = view.metrics.as_ref().ok();
    ui.columns(4, |cols| {
        tables::metric_card(
            &mut cols[0],
            "Total Companies",
            Some(view.table.len().to_string()),
        );
        tables::metric_card(
            &mut cols[1],
            "Total Market Cap",
            metrics.map(|m| billions(m.total_market_cap)),
        );
        tables::metric_card(
            &mut cols[2],
            "Average Market Cap",
            metrics.map(|m| billions(m.average_market_cap)),
        );
        tables::metric_card(
            &mut cols[3],
            "Average Stock Price",
            metrics.map(|m| usd(m.average_price)),
        );
    });
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        for t in Tab::ALL {
            ui.selectable_value(tab, t, RichText::new(t.label()).strong());
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match tab {
            Tab::Rankings => {
                ui.heading("Company Rankings");
                tables::rankings_table(ui, &view.table, logo_base);
            }
            Tab::MarketAnalysis => market_analysis(ui, view),
            Tab::PriceAnalysis => {
                ui.columns(2, |cols| {
                    cols[0].label(RichText::new("Stock Price vs Market Cap").color(NAVY).strong());
                    plot::price_vs_market_cap(&mut cols[0], &view.table);
                    cols[1].label(RichText::new("Stock Price Distribution").color(NAVY).strong());
                    plot::price_box(&mut cols[1], &view.price);
                });
            }
            Tab::Insights => {
                ui.heading("Statistical Analysis");
                ui.columns(2, |cols| {
                    tables::stats_card(
                        &mut cols[0],
                        "Market Cap Statistics (Billion USD)",
                        &view.market_cap,
                        "$",
                    );
                    tables::stats_card(
                        &mut cols[1],
                        "Stock Price Statistics (USD)",
                        &view.price,
                        "$",
                    );
                });
            }
        });
}

fn market_analysis(ui: &mut Ui, view: &DashboardView) {
    let metrics = view.metrics.as_ref().ok();
    ui.columns(3, |cols| {
        tables::metric_card(
            &mut cols[0],
            "Largest Company",
            metrics.map(|m| {
                format!(
                    "{}\n{}",
                    m.largest.name,
                    billions_precise(m.largest.market_cap)
                )
            }),
        );
        tables::metric_card(
            &mut cols[1],
            &format!("Top {CONCENTRATION_TOP_N} Concentration"),
            metrics
                .and_then(|m| m.top_concentration.ok())
                .map(|pct| format!("{}%", thousands(pct, 1))),
        );
        tables::metric_card(
            &mut cols[2],
            "Mean/Median Ratio",
            metrics
                .and_then(|m| m.mean_median_ratio.ok())
                .map(|r| thousands(r, 2)),
        );
    });
    ui.add_space(12.0);

    ui.columns(2, |cols| {
        cols[0].label(RichText::new("Market Capitalization Distribution").color(NAVY).strong());
        plot::market_cap_bars(&mut cols[0], &view.table);
        cols[1].label(
            RichText::new(format!("Top {} Companies Market Share", plot::SHARE_CHART_ROWS))
                .color(NAVY)
                .strong(),
        );
        plot::market_share_chart(&mut cols[1], &view.table);
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open company data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(export_file_name(Local::now().date_naive()))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path) {
            Ok(rows) => {
                state.status_message = None;
                log::debug!("export of {rows} rows finished");
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
