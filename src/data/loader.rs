use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use super::error::DataLoadError;
use super::model::{
    CompanyRecord, Table, MARKET_CAP_COLUMN, NAME_COLUMN, PRICE_COLUMN, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// DataSource – ordered candidate paths with a load-once cache
// ---------------------------------------------------------------------------

/// Where a loaded table came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataOrigin {
    /// Read from the first candidate path that existed.
    File(PathBuf),
    /// None of the candidates existed; the built-in sample was substituted.
    Sample { tried: Vec<PathBuf> },
}

/// A table together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Arc<Table>,
    pub origin: DataOrigin,
}

impl LoadedTable {
    /// The `FallbackToSample` condition: callers must surface this to the user.
    pub fn fell_back_to_sample(&self) -> bool {
        matches!(self.origin, DataOrigin::Sample { .. })
    }
}

/// Loads the company table from the first existing candidate path and keeps
/// it for the lifetime of the value.
///
/// Construct one per process and pass it down; repeated [`DataSource::load`]
/// calls hand back the same `Arc<Table>` without touching storage again.
#[derive(Debug)]
pub struct DataSource {
    candidates: Vec<PathBuf>,
    cache: OnceLock<LoadedTable>,
}

impl DataSource {
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            cache: OnceLock::new(),
        }
    }

    /// Load (first call) or return the cached table.
    ///
    /// A candidate that is missing is skipped. A candidate that exists but
    /// cannot be read or parsed fails the whole load; the remaining
    /// candidates are not consulted. Errors are not cached.
    pub fn load(&self) -> Result<&LoadedTable, DataLoadError> {
        if let Some(loaded) = self.cache.get() {
            return Ok(loaded);
        }
        let loaded = self.read_first_candidate()?;
        Ok(self.cache.get_or_init(|| loaded))
    }

    fn read_first_candidate(&self) -> Result<LoadedTable, DataLoadError> {
        for path in &self.candidates {
            let file = match std::fs::File::open(path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::debug!("{} not found, trying next candidate", path.display());
                    continue;
                }
                Err(source) => {
                    return Err(DataLoadError::Io {
                        path: path.clone(),
                        source,
                    })
                }
            };
            let table = read_table(file, path)?;
            log::info!("Loaded {} companies from {}", table.len(), path.display());
            return Ok(LoadedTable {
                table: Arc::new(table),
                origin: DataOrigin::File(path.clone()),
            });
        }

        log::warn!(
            "No data file found (tried {:?}); using built-in sample data",
            self.candidates
        );
        Ok(LoadedTable {
            table: Arc::new(sample_table()),
            origin: DataOrigin::Sample {
                tried: self.candidates.clone(),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a company table from a CSV file. No fallback, no caching.
pub fn load_file(path: &Path) -> Result<Table, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file, path)
}

/// The five-company table used when no data file is present.
pub fn sample_table() -> Table {
    Table::from_records(vec![
        CompanyRecord::new("Apple", 3610.0, 240.36),
        CompanyRecord::new("Microsoft", 2971.0, 399.73),
        CompanyRecord::new("Google", 2116.0, 174.70),
        CompanyRecord::new("Amazon", 2271.0, 214.35),
        CompanyRecord::new("Meta", 1706.0, 673.70),
    ])
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// CSV layout: header row with at least `Name`, `Market Cap` and `Price`
/// (exact, case-sensitive). Other columns are carried through as text.
///
/// `source` only labels errors; it is not opened.
pub fn read_table<R: Read>(reader: R, source: &Path) -> Result<Table, DataLoadError> {
    let csv_err = |e: csv::Error| DataLoadError::Csv {
        path: source.to_path_buf(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let column_index = |column: &'static str| -> Result<usize, DataLoadError> {
        let mut found = headers.iter().enumerate().filter(|(_, h)| *h == column);
        let (idx, _) = found.next().ok_or_else(|| DataLoadError::MissingColumn {
            path: source.to_path_buf(),
            column,
        })?;
        if found.next().is_some() {
            return Err(DataLoadError::DuplicateColumn {
                path: source.to_path_buf(),
                column,
            });
        }
        Ok(idx)
    };
    let name_idx = column_index(NAME_COLUMN)?;
    let cap_idx = column_index(MARKET_CAP_COLUMN)?;
    let price_idx = column_index(PRICE_COLUMN)?;

    let extra_idx: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !REQUIRED_COLUMNS.contains(&h.as_str()))
        .map(|(i, _)| i)
        .collect();

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(csv_err)?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        // Thousands separators show up as embedded spaces in the market cap.
        let cap_text: String = cell(cap_idx).chars().filter(|c| !c.is_whitespace()).collect();
        let market_cap = parse_amount(&cap_text, cell(cap_idx), source, row, MARKET_CAP_COLUMN)?;
        let price = parse_amount(
            cell(price_idx).trim(),
            cell(price_idx),
            source,
            row,
            PRICE_COLUMN,
        )?;

        records.push(CompanyRecord {
            name: cell(name_idx).to_string(),
            market_cap,
            price,
            extra: extra_idx.iter().map(|&idx| cell(idx).to_string()).collect(),
        });
    }

    Ok(Table::new(headers, records))
}

/// Coerce a cleaned cell to a finite, non-negative `f64`. `raw` is the cell
/// as written, used in error messages.
fn parse_amount(
    cleaned: &str,
    raw: &str,
    source: &Path,
    row: usize,
    column: &'static str,
) -> Result<f64, DataLoadError> {
    let value = cleaned
        .parse::<f64>()
        .map_err(|_| DataLoadError::InvalidNumber {
            path: source.to_path_buf(),
            row,
            column,
            value: raw.to_string(),
        })?;
    if !value.is_finite() {
        return Err(DataLoadError::NonFinite {
            path: source.to_path_buf(),
            row,
            column,
            value: raw.to_string(),
        });
    }
    if value < 0.0 {
        return Err(DataLoadError::Negative {
            path: source.to_path_buf(),
            row,
            column,
            value: raw.to_string(),
        });
    }
    // Normalise -0.0 so exports never print a sign.
    Ok(value + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn parse(text: &str) -> Result<Table, DataLoadError> {
        read_table(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn strips_spaces_from_market_cap() {
        let table = parse("Name,Market Cap,Price\nApple,3 610,240.36\nMeta, 1 706 ,673.70\n")
            .expect("valid csv");
        assert_eq!(table.column(crate::data::model::NumericColumn::MarketCap), vec![3610.0, 1706.0]);
        assert_eq!(table.records()[1].price, 673.70);
    }

    #[test]
    fn extra_columns_pass_through() {
        let table = parse("Logo,Name,Market Cap,Price\nlogo.png,Apple,3610,240.36\n,Meta,1706,673.70\n")
            .expect("valid csv");
        assert_eq!(table.headers(), &["Logo", "Name", "Market Cap", "Price"]);
        assert_eq!(table.records()[0].extra, vec!["logo.png".to_string()]);
        assert_eq!(table.records()[1].extra, vec![String::new()]);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = parse("Name,Price\nApple,240.36\n").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MissingColumn { column: "Market Cap", .. }
        ));
    }

    #[test]
    fn repeated_required_column_is_rejected() {
        let err = parse("Name,Market Cap,Price,Name\nApple,3610,240.36,Apple Inc\n").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::DuplicateColumn { column: "Name", .. }
        ));
    }

    #[test]
    fn repeated_extra_column_is_kept() {
        let table = parse("Note,Name,Market Cap,Price,Note\na,Apple,3610,240.36,b\n").expect("valid csv");
        assert_eq!(table.records()[0].extra, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let err = parse("name,Market Cap,Price\nApple,3610,240.36\n").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { column: "Name", .. }));
    }

    #[test]
    fn bad_number_is_a_hard_error_with_row() {
        let err = parse("Name,Market Cap,Price\nApple,3610,240.36\nMeta,1706,n/a\n").unwrap_err();
        match err {
            DataLoadError::InvalidNumber { row, column, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Price");
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_cell_is_not_a_number() {
        let err = parse("Name,Market Cap,Price\nApple,,240.36\n").unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidNumber { row: 1, .. }));
    }

    #[test]
    fn non_finite_and_negative_values_are_rejected() {
        let err = parse("Name,Market Cap,Price\nApple,inf,240.36\n").unwrap_err();
        assert!(matches!(err, DataLoadError::NonFinite { .. }));
        let err = parse("Name,Market Cap,Price\nApple,3610,-1\n").unwrap_err();
        assert!(matches!(err, DataLoadError::Negative { column: "Price", .. }));
    }

    #[test]
    fn header_only_file_is_an_empty_table() {
        let table = parse("Name,Market Cap,Price\n").expect("valid csv");
        assert!(table.is_empty());
    }

    #[test]
    fn falls_back_to_sample_when_nothing_exists() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::new([dir.path().join("final.csv"), dir.path().join("data/final.csv")]);
        let loaded = source.load().unwrap();
        assert!(loaded.fell_back_to_sample());
        assert_eq!(*loaded.table, sample_table());
        match &loaded.origin {
            DataOrigin::Sample { tried } => assert_eq!(tried.len(), 2),
            other => panic!("unexpected origin: {other:?}"),
        }
    }

    #[test]
    fn first_existing_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("second.csv");
        std::fs::write(&second, "Name,Market Cap,Price\nNvidia,3289,134.29\n").unwrap();
        let third = dir.path().join("third.csv");
        std::fs::write(&third, "Name,Market Cap,Price\nApple,3610,240.36\n").unwrap();

        let source = DataSource::new([dir.path().join("missing.csv"), second.clone(), third]);
        let loaded = source.load().unwrap();
        assert_eq!(loaded.origin, DataOrigin::File(second));
        assert_eq!(loaded.table.records()[0].name, "Nvidia");
    }

    #[test]
    fn broken_candidate_fails_instead_of_skipping() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("final.csv");
        std::fs::write(&broken, "Name,Price\nApple,240.36\n").unwrap();
        let good = dir.path().join("good.csv");
        std::fs::write(&good, "Name,Market Cap,Price\nApple,3610,240.36\n").unwrap();

        let source = DataSource::new([broken, good]);
        assert!(matches!(source.load(), Err(DataLoadError::MissingColumn { .. })));
    }

    #[test]
    fn load_is_cached_until_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("final.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Name,Market Cap,Price\nApple,3610,240.36").unwrap();
        drop(file);

        let source = DataSource::new([path.clone()]);
        let first = Arc::clone(&source.load().unwrap().table);
        std::fs::remove_file(&path).unwrap();
        let second = Arc::clone(&source.load().unwrap().table);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!source.load().unwrap().fell_back_to_sample());
    }
}
