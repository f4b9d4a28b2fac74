use super::error::SummaryError;
use super::model::{CompanyRecord, NumericColumn, Table};

/// How many companies the headline concentration metric covers.
pub const CONCENTRATION_TOP_N: usize = 5;

// ---------------------------------------------------------------------------
// SummaryStats – describe() of one numeric column
// ---------------------------------------------------------------------------

/// Count, mean, sample standard deviation and the five-number summary of a
/// numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub column: NumericColumn,
    pub count: usize,
    pub mean: f64,
    /// Sample (n − 1) standard deviation; NaN when `count < 2`.
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl SummaryStats {
    /// Standard deviation, `None` when it is undefined.
    pub fn std_dev(&self) -> Option<f64> {
        (self.count >= 2).then_some(self.std)
    }

    /// Mean divided by median, a quick skew indicator.
    pub fn mean_median_ratio(&self) -> Result<f64, SummaryError> {
        if self.median == 0.0 {
            return Err(SummaryError::ZeroDenominator {
                metric: "mean/median ratio",
                column: self.column,
            });
        }
        Ok(self.mean / self.median)
    }
}

/// Summarise one numeric column of `table`.
///
/// An empty table is reported as [`SummaryError::EmptyColumn`] rather than
/// a zeroed result.
pub fn describe(table: &Table, column: NumericColumn) -> Result<SummaryStats, SummaryError> {
    let mut values = table.column(column);
    if values.is_empty() {
        return Err(SummaryError::EmptyColumn(column));
    }
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    };

    Ok(SummaryStats {
        column,
        count,
        mean,
        std,
        min: values[0],
        p25: percentile(&values, 0.25),
        median: percentile(&values, 0.5),
        p75: percentile(&values, 0.75),
        max: values[count - 1],
    })
}

/// Linear interpolation between order statistics. `sorted` must be
/// non-empty and ascending; `p` is in `[0, 1]`.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

// ---------------------------------------------------------------------------
// Derived metrics
// ---------------------------------------------------------------------------

/// Sum of a numeric column.
pub fn sum(table: &Table, column: NumericColumn) -> Result<f64, SummaryError> {
    if table.is_empty() {
        return Err(SummaryError::EmptyColumn(column));
    }
    Ok(table.iter().map(|r| r.value(column)).sum())
}

/// Share (percent) of total market cap held by the `n` largest companies.
///
/// The ranking is always market cap high to low, whatever order `table` is
/// in; equal values keep table order.
pub fn top_n_concentration(table: &Table, n: usize) -> Result<f64, SummaryError> {
    let total = sum(table, NumericColumn::MarketCap)?;
    if total == 0.0 {
        return Err(SummaryError::ZeroDenominator {
            metric: "top-n concentration",
            column: NumericColumn::MarketCap,
        });
    }
    let mut caps = table.column(NumericColumn::MarketCap);
    caps.sort_by(|a, b| b.total_cmp(a));
    let top: f64 = caps.iter().take(n).sum();
    Ok(top / total * 100.0)
}

/// The company with the largest market cap (first one on ties).
pub fn largest(table: &Table) -> Option<&CompanyRecord> {
    table
        .iter()
        .reduce(|best, r| if r.market_cap > best.market_cap { r } else { best })
}

/// Headline figures for the metric cards.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub companies: usize,
    pub total_market_cap: f64,
    pub average_market_cap: f64,
    pub average_price: f64,
    pub largest: CompanyRecord,
    pub top_concentration: Result<f64, SummaryError>,
    pub mean_median_ratio: Result<f64, SummaryError>,
}

impl DashboardMetrics {
    /// Compute every card from the two column summaries of `table`.
    pub fn compute(
        table: &Table,
        market_cap: &SummaryStats,
        price: &SummaryStats,
    ) -> Result<Self, SummaryError> {
        let largest = largest(table)
            .cloned()
            .ok_or(SummaryError::EmptyColumn(NumericColumn::MarketCap))?;
        Ok(Self {
            companies: table.len(),
            total_market_cap: sum(table, NumericColumn::MarketCap)?,
            average_market_cap: market_cap.mean,
            average_price: price.mean,
            largest,
            top_concentration: top_n_concentration(table, CONCENTRATION_TOP_N),
            mean_median_ratio: market_cap.mean_median_ratio(),
        })
    }
}
