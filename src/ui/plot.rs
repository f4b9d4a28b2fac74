use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

use crate::color::{blues, ranked_blues, value_colors};
use crate::data::model::{NumericColumn, Table};
use crate::data::{SummaryError, SummaryStats};
use crate::ui::tables::no_data;

/// How many rows the market share chart covers.
pub const SHARE_CHART_ROWS: usize = 10;

const CHART_HEIGHT: f32 = 420.0;

// ---------------------------------------------------------------------------
// Market cap bar chart
// ---------------------------------------------------------------------------

/// One bar per company in table order, shaded by market cap.
pub fn market_cap_bars(ui: &mut Ui, table: &Table) {
    if table.is_empty() {
        no_data(ui);
        return;
    }

    let caps = table.column(NumericColumn::MarketCap);
    let colors = value_colors(&caps);
    let bars: Vec<Bar> = table
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (record, color))| {
            Bar::new(i as f64, record.market_cap)
                .name(&record.name)
                .fill(color)
                .width(0.7)
        })
        .collect();

    let names: Vec<String> = table.iter().map(|r| r.name.clone()).collect();
    Plot::new("market_cap_bars")
        .height(CHART_HEIGHT)
        .x_axis_label("Companies")
        .y_axis_label("Market Cap (Billion USD)")
        .x_axis_formatter(move |mark, _range| axis_name(&names, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let chart = BarChart::new(bars).element_formatter(Box::new(
                |bar: &Bar, _: &BarChart| format!("{}\nMarket Cap: ${:.2}B", bar.name, bar.value),
            ));
            plot_ui.bar_chart(chart);
        });
}

/// Tick label for integer positions; blank between bars.
fn axis_name(names: &[String], value: f64) -> String {
    if value < 0.0 || value.fract().abs() > f64::EPSILON {
        return String::new();
    }
    names.get(value as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Market share of the first rows
// ---------------------------------------------------------------------------

/// Each company's percentage of the combined market cap of `rows`.
pub fn market_share(table: &Table, rows: usize) -> Result<Vec<(String, f64)>, SummaryError> {
    let head: Vec<_> = table.iter().take(rows).collect();
    let total: f64 = head.iter().map(|r| r.market_cap).sum();
    if head.is_empty() {
        return Err(SummaryError::EmptyColumn(NumericColumn::MarketCap));
    }
    if total == 0.0 {
        return Err(SummaryError::ZeroDenominator {
            metric: "market share",
            column: NumericColumn::MarketCap,
        });
    }
    Ok(head
        .iter()
        .map(|r| (r.name.clone(), r.market_cap / total * 100.0))
        .collect())
}

/// Horizontal share bars for the first [`SHARE_CHART_ROWS`] companies.
pub fn market_share_chart(ui: &mut Ui, table: &Table) {
    let shares = match market_share(table, SHARE_CHART_ROWS) {
        Ok(s) => s,
        Err(_) => {
            no_data(ui);
            return;
        }
    };

    let colors = ranked_blues(shares.len());
    // Top entry drawn at the top of the chart.
    let n = shares.len();
    let bars: Vec<Bar> = shares
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, ((name, pct), color))| {
            Bar::new((n - 1 - i) as f64, *pct)
                .name(name)
                .fill(color)
                .width(0.7)
        })
        .collect();

    let names: Vec<String> = shares.iter().rev().map(|(name, _)| name.clone()).collect();
    Plot::new("market_share")
        .height(CHART_HEIGHT)
        .x_axis_label("Share of combined market cap (%)")
        .y_axis_formatter(move |mark, _range| axis_name(&names, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let chart = BarChart::new(bars).horizontal().element_formatter(Box::new(
                |bar: &Bar, _: &BarChart| format!("{}: {:.1}%", bar.name, bar.value),
            ));
            plot_ui.bar_chart(chart);
        });
}

// ---------------------------------------------------------------------------
// Price analysis
// ---------------------------------------------------------------------------

/// Price against market cap, one hoverable point per company.
pub fn price_vs_market_cap(ui: &mut Ui, table: &Table) {
    if table.is_empty() {
        no_data(ui);
        return;
    }

    let colors = value_colors(&table.column(NumericColumn::MarketCap));
    Plot::new("price_vs_market_cap")
        .height(CHART_HEIGHT)
        .x_axis_label("Market Cap (Billion USD)")
        .y_axis_label("Price (USD)")
        .show(ui, |plot_ui| {
            for (record, color) in table.iter().zip(colors) {
                let points = Points::new(PlotPoints::new(vec![[record.market_cap, record.price]]))
                    .name(&record.name)
                    .color(color)
                    .radius(5.0);
                plot_ui.points(points);
            }
        });
}

/// Box plot of the price column built from its summary.
pub fn price_box(ui: &mut Ui, stats: &Result<SummaryStats, SummaryError>) {
    let stats = match stats {
        Ok(s) => s,
        Err(_) => {
            no_data(ui);
            return;
        }
    };

    let elem = BoxElem::new(
        0.0,
        BoxSpread::new(stats.min, stats.p25, stats.median, stats.p75, stats.max),
    )
    .name("Price")
    .fill(blues(0.3))
    .box_width(0.4);

    Plot::new("price_box")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Price (USD)")
        .show_x(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).name("Stock Price Distribution"));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CompanyRecord;

    #[test]
    fn share_is_relative_to_the_first_rows() {
        let table = Table::from_records(vec![
            CompanyRecord::new("A", 30.0, 1.0),
            CompanyRecord::new("B", 10.0, 1.0),
            CompanyRecord::new("C", 60.0, 1.0),
        ]);
        let shares = market_share(&table, 2).unwrap();
        assert_eq!(shares, vec![("A".to_string(), 75.0), ("B".to_string(), 25.0)]);
    }

    #[test]
    fn share_of_nothing_is_no_data() {
        let empty = Table::from_records(Vec::new());
        assert!(market_share(&empty, SHARE_CHART_ROWS).is_err());
        let zeros = Table::from_records(vec![CompanyRecord::new("Z", 0.0, 1.0)]);
        assert!(market_share(&zeros, SHARE_CHART_ROWS).is_err());
    }

    #[test]
    fn axis_names_only_on_whole_positions() {
        let names = vec!["Apple".to_string(), "Meta".to_string()];
        assert_eq!(axis_name(&names, 1.0), "Meta");
        assert_eq!(axis_name(&names, 0.5), "");
        assert_eq!(axis_name(&names, 2.0), "");
        assert_eq!(axis_name(&names, -1.0), "");
    }
}
