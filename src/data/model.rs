use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroUsize;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Required input column holding the company name.
pub const NAME_COLUMN: &str = "Name";
/// Required input column holding the market capitalisation (billions of USD).
pub const MARKET_CAP_COLUMN: &str = "Market Cap";
/// Required input column holding the stock price (USD).
pub const PRICE_COLUMN: &str = "Price";

/// The three columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = [NAME_COLUMN, MARKET_CAP_COLUMN, PRICE_COLUMN];

// ---------------------------------------------------------------------------
// CompanyRecord – one row of the input table
// ---------------------------------------------------------------------------

/// A single company (one row of the source CSV).
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRecord {
    pub name: String,
    /// Market capitalisation in billions of USD, finite and `>= 0`.
    pub market_cap: f64,
    /// Stock price in USD, finite and `>= 0`.
    pub price: f64,
    /// Pass-through cells for every non-required column, in header order.
    pub extra: Vec<String>,
}

impl CompanyRecord {
    pub fn new(name: impl Into<String>, market_cap: f64, price: f64) -> Self {
        Self {
            name: name.into(),
            market_cap,
            price,
            extra: Vec::new(),
        }
    }

    /// Read one of the numeric columns.
    pub fn value(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::MarketCap => self.market_cap,
            NumericColumn::Price => self.price,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – ordered, immutable sequence of records
// ---------------------------------------------------------------------------

/// An ordered table of companies plus the header layout it was read with.
///
/// Tables are never mutated once built: the query engine always produces a
/// fresh `Table`, and the loaded source is shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    records: Vec<CompanyRecord>,
}

impl Table {
    /// Build a table from its header row and records.
    ///
    /// `headers` must contain the three required columns; every other header
    /// maps positionally onto `CompanyRecord::extra`.
    pub fn new(headers: Vec<String>, records: Vec<CompanyRecord>) -> Self {
        Self { headers, records }
    }

    /// A table with only the required columns.
    pub fn from_records(records: Vec<CompanyRecord>) -> Self {
        Self::new(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            records,
        )
    }

    /// A new table holding `records` with this table's header layout.
    pub(crate) fn with_records(&self, records: Vec<CompanyRecord>) -> Self {
        Self {
            headers: self.headers.clone(),
            records,
        }
    }

    /// Header row in input order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Names of the pass-through columns, aligned with `CompanyRecord::extra`.
    pub fn extra_columns(&self) -> impl Iterator<Item = &str> {
        self.headers
            .iter()
            .map(String::as_str)
            .filter(|h| !REQUIRED_COLUMNS.contains(h))
    }

    /// Position of an extra column inside `CompanyRecord::extra`.
    pub fn extra_index(&self, column: &str) -> Option<usize> {
        self.extra_columns().position(|c| c == column)
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompanyRecord> {
        self.records.iter()
    }

    /// All values of one numeric column, in table order.
    pub fn column(&self, column: NumericColumn) -> Vec<f64> {
        self.records.iter().map(|r| r.value(column)).collect()
    }

    /// Smallest and largest value of a numeric column, `None` when empty.
    pub fn bounds(&self, column: NumericColumn) -> Option<(f64, f64)> {
        self.records.iter().map(|r| r.value(column)).fold(None, |acc, v| {
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            })
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a CompanyRecord;
    type IntoIter = std::slice::Iter<'a, CompanyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Column and sort selectors
// ---------------------------------------------------------------------------

/// The numeric columns that can be filtered, sorted and summarised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    MarketCap,
    Price,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 2] = [NumericColumn::MarketCap, NumericColumn::Price];

    /// Header name of the column in the CSV schema.
    pub fn header(self) -> &'static str {
        match self {
            NumericColumn::MarketCap => MARKET_CAP_COLUMN,
            NumericColumn::Price => PRICE_COLUMN,
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Which field a query sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    MarketCap,
    Price,
    Name,
}

/// The five sort choices offered to the user, each mapping to one
/// `(SortKey, descending)` pair. Serialized as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortBy {
    #[default]
    MarketCapDesc,
    MarketCapAsc,
    PriceDesc,
    PriceAsc,
    NameAsc,
}

impl SortBy {
    pub const ALL: [SortBy; 5] = [
        SortBy::MarketCapDesc,
        SortBy::MarketCapAsc,
        SortBy::PriceDesc,
        SortBy::PriceAsc,
        SortBy::NameAsc,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortBy::MarketCapDesc => "Market Cap (High to Low)",
            SortBy::MarketCapAsc => "Market Cap (Low to High)",
            SortBy::PriceDesc => "Price (High to Low)",
            SortBy::PriceAsc => "Price (Low to High)",
            SortBy::NameAsc => "Company Name (A-Z)",
        }
    }

    /// Parse one of the literal labels back into a choice.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    pub fn key(self) -> SortKey {
        match self {
            SortBy::MarketCapDesc | SortBy::MarketCapAsc => SortKey::MarketCap,
            SortBy::PriceDesc | SortBy::PriceAsc => SortKey::Price,
            SortBy::NameAsc => SortKey::Name,
        }
    }

    pub fn descending(self) -> bool {
        matches!(self, SortBy::MarketCapDesc | SortBy::PriceDesc)
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for SortBy {
    type Error = String;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Self::from_label(&label).ok_or_else(|| format!("unknown sort choice '{label}'"))
    }
}

impl From<SortBy> for String {
    fn from(sort_by: SortBy) -> Self {
        sort_by.label().to_string()
    }
}

/// Collation used for the name sort: case-insensitive codepoint order, then
/// case-sensitive codepoint order so the result never depends on locale.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ---------------------------------------------------------------------------
// FilterSpec – the active query
// ---------------------------------------------------------------------------

/// Immutable description of one query over a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Inclusive market cap bounds (billions of USD).
    pub market_cap_range: RangeInclusive<f64>,
    /// Inclusive price bounds (USD).
    pub price_range: RangeInclusive<f64>,
    /// Case-insensitive substring matched against the name; empty = no filter.
    pub search_term: String,
    pub sort_key: SortKey,
    /// Ignored when `sort_key` is [`SortKey::Name`].
    pub sort_descending: bool,
    pub limit: NonZeroUsize,
}

impl FilterSpec {
    /// A filter that keeps every row of `table`, sorted by market cap (high
    /// to low), limited to `limit` rows.
    pub fn unfiltered(table: &Table, limit: NonZeroUsize) -> Self {
        let (cap_lo, cap_hi) = table
            .bounds(NumericColumn::MarketCap)
            .unwrap_or((0.0, 0.0));
        let (price_lo, price_hi) = table.bounds(NumericColumn::Price).unwrap_or((0.0, 0.0));
        Self {
            market_cap_range: cap_lo..=cap_hi,
            price_range: price_lo..=price_hi,
            search_term: String::new(),
            sort_key: SortKey::MarketCap,
            sort_descending: true,
            limit,
        }
    }

    /// Whether a record passes the range and search predicates.
    pub fn matches(&self, record: &CompanyRecord) -> bool {
        self.market_cap_range.contains(&record.market_cap)
            && self.price_range.contains(&record.price)
            && (self.search_term.is_empty()
                || record
                    .name
                    .to_lowercase()
                    .contains(&self.search_term.to_lowercase()))
    }
}
