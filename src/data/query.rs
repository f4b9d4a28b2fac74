use std::cmp::Ordering;

use super::model::{compare_names, CompanyRecord, FilterSpec, SortKey, Table};

// ---------------------------------------------------------------------------
// Query engine: filter → sort → limit
// ---------------------------------------------------------------------------

/// Run a query over `table`, returning a fresh table.
///
/// Steps, in this order:
/// * keep rows passing [`FilterSpec::matches`]
/// * stable sort by `spec.sort_key` (numeric keys honour
///   `sort_descending`, the name key is always ascending)
/// * keep the first `spec.limit` rows
///
/// The input is never modified and an empty input yields an empty output.
pub fn apply(table: &Table, spec: &FilterSpec) -> Table {
    let mut rows: Vec<CompanyRecord> = table
        .iter()
        .filter(|record| spec.matches(record))
        .cloned()
        .collect();

    // `sort_by` is stable: equal keys keep load order.
    rows.sort_by(|a, b| compare(a, b, spec.sort_key, spec.sort_descending));
    rows.truncate(spec.limit.get());

    table.with_records(rows)
}

fn compare(a: &CompanyRecord, b: &CompanyRecord, key: SortKey, descending: bool) -> Ordering {
    let ordering = match key {
        SortKey::MarketCap => a.market_cap.total_cmp(&b.market_cap),
        SortKey::Price => a.price.total_cmp(&b.price),
        SortKey::Name => return compare_names(&a.name, &b.name),
    };
    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::data::model::SortBy;

    fn names(table: &Table) -> Vec<&str> {
        table.iter().map(|r| r.name.as_str()).collect()
    }

    fn spec(table: &Table, limit: usize, sort_by: SortBy) -> FilterSpec {
        FilterSpec {
            sort_key: sort_by.key(),
            sort_descending: sort_by.descending(),
            ..FilterSpec::unfiltered(table, NonZeroUsize::new(limit).unwrap())
        }
    }

    fn ties() -> Table {
        Table::from_records(vec![
            CompanyRecord::new("b", 10.0, 1.0),
            CompanyRecord::new("A", 20.0, 1.0),
            CompanyRecord::new("c", 10.0, 1.0),
            CompanyRecord::new("a", 5.0, 1.0),
        ])
    }

    #[test]
    fn descending_keeps_load_order_on_ties() {
        let t = ties();
        let out = apply(&t, &spec(&t, 10, SortBy::MarketCapDesc));
        assert_eq!(names(&out), vec!["A", "b", "c", "a"]);
    }

    #[test]
    fn ascending_keeps_load_order_on_ties() {
        let t = ties();
        let out = apply(&t, &spec(&t, 10, SortBy::MarketCapAsc));
        assert_eq!(names(&out), vec!["a", "b", "c", "A"]);
    }

    #[test]
    fn name_sort_ignores_descending_flag() {
        let t = ties();
        let mut s = spec(&t, 10, SortBy::NameAsc);
        s.sort_descending = true;
        let out = apply(&t, &s);
        assert_eq!(names(&out), vec!["A", "a", "b", "c"]);
    }

    #[test]
    fn limit_truncates_after_sort() {
        let t = ties();
        let out = apply(&t, &spec(&t, 1, SortBy::MarketCapAsc));
        assert_eq!(names(&out), vec!["a"]);
    }

    #[test]
    fn input_table_is_untouched() {
        let t = ties();
        let before = t.clone();
        let _ = apply(&t, &spec(&t, 2, SortBy::NameAsc));
        assert_eq!(t, before);
    }

    #[test]
    fn headers_are_preserved() {
        let t = Table::new(
            vec!["Name".into(), "Market Cap".into(), "Price".into(), "Logo".into()],
            vec![CompanyRecord {
                extra: vec!["apple.png".into()],
                ..CompanyRecord::new("Apple", 3610.0, 240.36)
            }],
        );
        let out = apply(&t, &spec(&t, 5, SortBy::PriceAsc));
        assert_eq!(out.headers(), t.headers());
        assert_eq!(out.records()[0].extra, vec!["apple.png".to_string()]);
    }
}
