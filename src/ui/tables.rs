use std::path::Path;

use eframe::egui::{self, Align, Color32, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::NAVY;
use crate::data::model::{CompanyRecord, NumericColumn, Table, NAME_COLUMN};
use crate::data::{SummaryError, SummaryStats};
use crate::ui::format::{apply_hint, thousands};

// ---------------------------------------------------------------------------
// Column config: display hints per column name
// ---------------------------------------------------------------------------

/// How a column's cells are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Text,
    /// Cell holds an image URI (path, `file://`, `bytes://`, ...).
    Image,
    /// Numeric cell rendered with a `%.Nf` style format hint.
    Number { format: &'static str },
}

/// Display hints for one column. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnConfig {
    pub label: &'static str,
    pub help: Option<&'static str>,
    pub kind: CellKind,
    pub width: f32,
}

pub const LOGO_COLUMN: &str = "Logo";

const COLUMN_CONFIG: &[(&str, ColumnConfig)] = &[
    (
        LOGO_COLUMN,
        ColumnConfig {
            label: "",
            help: None,
            kind: CellKind::Image,
            width: 48.0,
        },
    ),
    (
        NAME_COLUMN,
        ColumnConfig {
            label: "Company Name",
            help: None,
            kind: CellKind::Text,
            width: 220.0,
        },
    ),
    (
        "Market Cap",
        ColumnConfig {
            label: "Market Cap",
            help: Some("In Billion USD"),
            kind: CellKind::Number { format: "$%.2f B" },
            width: 140.0,
        },
    ),
    (
        "Price",
        ColumnConfig {
            label: "Stock Price",
            help: Some("Previous day closing price (USD)"),
            kind: CellKind::Number { format: "$%.2f" },
            width: 120.0,
        },
    ),
];

/// Look up the display hints for `column`; unknown columns render as text.
pub fn column_config(column: &str) -> ColumnConfig {
    COLUMN_CONFIG
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, cfg)| *cfg)
        .unwrap_or(ColumnConfig {
            label: "",
            help: None,
            kind: CellKind::Text,
            width: 120.0,
        })
}

/// One displayed column of the rankings table.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayColumn {
    Name,
    Numeric(NumericColumn),
    /// Pass-through column: header name and its index in `CompanyRecord::extra`.
    Extra { header: String, index: usize },
}

impl DisplayColumn {
    pub fn header(&self) -> &str {
        match self {
            DisplayColumn::Name => NAME_COLUMN,
            DisplayColumn::Numeric(col) => col.header(),
            DisplayColumn::Extra { header, .. } => header,
        }
    }

    /// Column label, falling back to the header for unconfigured columns.
    pub fn label(&self) -> &str {
        let cfg = column_config(self.header());
        match self {
            DisplayColumn::Extra { header, .. } if cfg.label.is_empty() && header != LOGO_COLUMN => {
                header.as_str()
            }
            _ => cfg.label,
        }
    }

    /// Text content of the cell (image URI for logo cells).
    pub fn cell_text(&self, record: &CompanyRecord) -> String {
        match self {
            DisplayColumn::Name => record.name.clone(),
            DisplayColumn::Numeric(col) => {
                let value = record.value(*col);
                match column_config(col.header()).kind {
                    CellKind::Number { format } => apply_hint(format, value),
                    _ => value.to_string(),
                }
            }
            DisplayColumn::Extra { index, .. } => {
                record.extra.get(*index).cloned().unwrap_or_default()
            }
        }
    }
}

/// Column order for the rankings table: logo (when present), name, market
/// cap, price, then the remaining pass-through columns in input order.
pub fn display_columns(table: &Table) -> Vec<DisplayColumn> {
    let logo = table.extra_index(LOGO_COLUMN);
    let extra = |index: usize, header: &str| DisplayColumn::Extra {
        header: header.to_string(),
        index,
    };

    let rest = table
        .extra_columns()
        .enumerate()
        .filter(|(index, _)| Some(*index) != logo)
        .map(|(index, header)| extra(index, header));

    logo.map(|index| extra(index, LOGO_COLUMN))
        .into_iter()
        .chain([
            DisplayColumn::Name,
            DisplayColumn::Numeric(NumericColumn::MarketCap),
            DisplayColumn::Numeric(NumericColumn::Price),
        ])
        .chain(rest)
        .collect()
}

/// Turn a logo cell into a URI the egui image loaders accept.
///
/// Cells that already carry a scheme (`https://`, `file://`, `bytes://`)
/// pass through. Bare paths resolve against `base` (the CSV's directory)
/// and get a `file://` prefix. Empty cells have no logo.
pub fn logo_uri(cell: &str, base: Option<&Path>) -> Option<String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if has_scheme(cell) {
        return Some(cell.to_string());
    }
    let path = Path::new(cell);
    let path = match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    };
    Some(format!("file://{}", path.display()))
}

/// `scheme:` prefix per RFC 3986. Single letters are drive names, not schemes.
fn has_scheme(cell: &str) -> bool {
    let Some((scheme, _)) = cell.split_once(':') else {
        return false;
    };
    scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

// ---------------------------------------------------------------------------
// Rankings table
// ---------------------------------------------------------------------------

/// Render the filtered companies as a scrollable, striped table. Relative
/// logo paths resolve against `logo_base`.
pub fn rankings_table(ui: &mut Ui, table: &Table, logo_base: Option<&Path>) {
    if table.is_empty() {
        no_data(ui);
        return;
    }

    let columns = display_columns(table);
    let row_height = 28.0;

    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .max_scroll_height(400.0);
    for col in &columns {
        let width = column_config(col.header()).width;
        builder = builder.column(Column::initial(width).at_least(32.0).clip(true));
    }

    builder
        .header(row_height, |mut header| {
            for col in &columns {
                header.col(|ui| {
                    let response = ui.strong(col.label());
                    if let Some(help) = column_config(col.header()).help {
                        response.on_hover_text(help);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(row_height, table.len(), |mut row| {
                let record = &table.records()[row.index()];
                for col in &columns {
                    row.col(|ui| {
                        let text = col.cell_text(record);
                        match column_config(col.header()).kind {
                            CellKind::Image => {
                                if let Some(uri) = logo_uri(&text, logo_base) {
                                    ui.add(egui::Image::from_uri(uri).max_height(row_height - 4.0));
                                }
                            }
                            CellKind::Number { .. } => {
                                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                    ui.label(text);
                                });
                            }
                            _ => {
                                ui.label(text);
                            }
                        }
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// The "no data" placeholder used wherever an aggregate cannot be shown.
pub fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("No data").italics().color(Color32::GRAY));
}

/// A headline metric; `None` renders the "no data" state.
pub fn metric_card(ui: &mut Ui, title: &str, value: Option<String>) {
    egui::Frame::group(ui.style())
        .fill(NAVY)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(title).color(Color32::from_rgb(0xB8, 0xD9, 0xF5)));
                match value {
                    Some(v) => ui.heading(RichText::new(v).color(Color32::WHITE).strong()),
                    None => ui.heading(RichText::new("No data").color(Color32::LIGHT_GRAY)),
                };
            });
        });
}

/// describe() output as a two-column grid, `prefix`ed with a currency sign.
pub fn stats_card(ui: &mut Ui, title: &str, stats: &Result<SummaryStats, SummaryError>, prefix: &str) {
    egui::Frame::group(ui.style()).inner_margin(12.0).show(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(title).color(NAVY).strong().size(16.0));
        });
        ui.add_space(8.0);

        let stats = match stats {
            Ok(s) => s,
            Err(_) => {
                no_data(ui);
                return;
            }
        };

        egui::Grid::new(title)
            .striped(true)
            .num_columns(2)
            .min_col_width(120.0)
            .show(ui, |ui| {
                for (label, value) in stats_rows(stats, prefix) {
                    ui.strong(label);
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(value);
                    });
                    ui.end_row();
                }
            });
    });
}

/// Label/value pairs shown in a statistics card.
pub fn stats_rows(stats: &SummaryStats, prefix: &str) -> Vec<(&'static str, String)> {
    let money = |v: f64| format!("{prefix}{}", thousands(v, 2));
    vec![
        ("Count", stats.count.to_string()),
        ("Mean", money(stats.mean)),
        (
            "Std Dev",
            stats.std_dev().map(money).unwrap_or_else(|| "n/a".to_string()),
        ),
        ("Min", money(stats.min)),
        ("25%", money(stats.p25)),
        ("Median", money(stats.median)),
        ("75%", money(stats.p75)),
        ("Max", money(stats.max)),
    ]
}
