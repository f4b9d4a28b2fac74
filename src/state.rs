use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::companies_slider_bounds;
use crate::data::loader::load_file;
use crate::data::summary::describe;
use crate::data::{
    export, query, DashboardMetrics, DataLoadError, DataOrigin, FilterSpec, LoadedTable,
    NumericColumn, SortBy, SummaryError, SummaryStats, Table,
};

// ---------------------------------------------------------------------------
// Sidebar controls
// ---------------------------------------------------------------------------

/// Raw values of the sidebar widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControls {
    pub number_of_companies: usize,
    pub market_cap_range: (f64, f64),
    pub price_range: (f64, f64),
    pub search_term: String,
    pub sort_by: SortBy,
}

impl FilterControls {
    /// Controls that show everything in `table`: full ranges, no search.
    pub fn for_table(table: &Table, wanted_companies: usize, sort_by: SortBy) -> Self {
        let (_, _, wanted) = companies_slider_bounds(table.len(), wanted_companies);
        let limit = NonZeroUsize::new(wanted).unwrap_or(NonZeroUsize::MIN);
        let spec = FilterSpec::unfiltered(table, limit);
        Self {
            number_of_companies: spec.limit.get(),
            market_cap_range: (*spec.market_cap_range.start(), *spec.market_cap_range.end()),
            price_range: (*spec.price_range.start(), *spec.price_range.end()),
            search_term: spec.search_term,
            sort_by,
        }
    }

    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            market_cap_range: self.market_cap_range.0..=self.market_cap_range.1,
            price_range: self.price_range.0..=self.price_range.1,
            search_term: self.search_term.clone(),
            sort_key: self.sort_by.key(),
            sort_descending: self.sort_by.descending(),
            limit: NonZeroUsize::new(self.number_of_companies).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardView – everything the panels render
// ---------------------------------------------------------------------------

/// The filtered table plus every aggregate derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub table: Table,
    pub market_cap: Result<SummaryStats, SummaryError>,
    pub price: Result<SummaryStats, SummaryError>,
    pub metrics: Result<DashboardMetrics, SummaryError>,
}

impl DashboardView {
    pub fn compute(source: &Table, spec: &FilterSpec) -> Self {
        let table = query::apply(source, spec);
        let market_cap = describe(&table, NumericColumn::MarketCap);
        let price = describe(&table, NumericColumn::Price);
        let metrics = match (&market_cap, &price) {
            (Ok(cap), Ok(price)) => DashboardMetrics::compute(&table, cap, price),
            (Err(e), _) | (_, Err(e)) => Err(*e),
        };
        Self {
            table,
            market_cap,
            price,
            metrics,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded source table (None when startup loading failed).
    pub source: Option<Arc<Table>>,

    /// Where `source` came from; drives the sample-data banner.
    pub origin: Option<DataOrigin>,

    /// Sidebar selections.
    pub controls: FilterControls,

    /// Result of applying `controls` to `source` (cached).
    pub view: Option<DashboardView>,

    /// Requested initial company count, re-applied on every new table.
    pub default_companies: usize,

    /// Initial sort choice, re-applied on every new table.
    pub default_sort: SortBy,

    /// Startup load failure; replaces the whole dashboard.
    pub fatal_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state from the startup load.
    pub fn from_load(
        loaded: Result<&LoadedTable, DataLoadError>,
        default_companies: usize,
        default_sort: SortBy,
    ) -> Self {
        let mut state = Self {
            source: None,
            origin: None,
            controls: FilterControls::for_table(
                &Table::from_records(Vec::new()),
                default_companies,
                default_sort,
            ),
            view: None,
            default_companies,
            default_sort,
            fatal_error: None,
            status_message: None,
        };
        match loaded {
            Ok(loaded) => state.set_table(Arc::clone(&loaded.table), loaded.origin.clone()),
            Err(e) => {
                let message = error_chain(&e);
                log::error!("Failed to load data: {message}");
                state.fatal_error = Some(message);
            }
        }
        state
    }

    /// Ingest a table, reset the controls to cover it and recompute.
    pub fn set_table(&mut self, table: Arc<Table>, origin: DataOrigin) {
        self.controls = FilterControls::for_table(&table, self.default_companies, self.default_sort);
        self.source = Some(table);
        self.origin = Some(origin);
        self.fatal_error = None;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `view` after a control change.
    pub fn refilter(&mut self) {
        if let Some(source) = &self.source {
            let view = DashboardView::compute(source, &self.controls.to_spec());
            log::debug!("{} of {} companies match", view.table.len(), source.len());
            self.view = Some(view);
        }
    }

    pub fn fell_back_to_sample(&self) -> bool {
        matches!(self.origin, Some(DataOrigin::Sample { .. }))
    }

    /// Directory of the loaded CSV; relative logo paths resolve against it.
    pub fn data_dir(&self) -> Option<&Path> {
        match &self.origin {
            Some(DataOrigin::File(path)) => path.parent(),
            _ => None,
        }
    }

    /// Replace the data with another CSV. On failure the current data stays
    /// and the error is shown in the status line.
    pub fn open_file(&mut self, path: &Path) {
        match load_file(path) {
            Ok(table) => {
                log::info!("Loaded {} companies from {}", table.len(), path.display());
                self.set_table(Arc::new(table), DataOrigin::File(path.to_path_buf()));
            }
            Err(e) => {
                let message = error_chain(&e);
                log::error!("Failed to load file: {message}");
                self.status_message = Some(format!("Error: {message}"));
            }
        }
    }

    /// Write the current filtered view to `path`; returns the row count.
    pub fn export_to(&self, path: &Path) -> Result<usize> {
        let view = self.view.as_ref().context("no data loaded")?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        export::write_csv(&view.table, file)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported {} companies to {}", view.table.len(), path.display());
        Ok(view.table.len())
    }
}

/// `error: cause: cause` rendering of an error and its sources.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
