use std::num::NonZeroUsize;

use cap_rankings::data::export::write_csv;
use cap_rankings::data::loader::{load_file, DataSource};
use cap_rankings::data::model::{CompanyRecord, FilterSpec, NumericColumn, SortBy, SortKey, Table};
use cap_rankings::data::query::apply;
use cap_rankings::data::summary::{describe, sum, top_n_concentration};
use cap_rankings::data::SummaryError;
use pretty_assertions::assert_eq;

fn three_companies() -> Table {
    Table::from_records(vec![
        CompanyRecord::new("Apple", 3610.0, 240.36),
        CompanyRecord::new("Microsoft", 2971.0, 399.73),
        CompanyRecord::new("Google", 2116.0, 174.70),
    ])
}

fn spec(cap: (f64, f64), price: (f64, f64), search: &str, sort_by: SortBy, limit: usize) -> FilterSpec {
    FilterSpec {
        market_cap_range: cap.0..=cap.1,
        price_range: price.0..=price.1,
        search_term: search.to_string(),
        sort_key: sort_by.key(),
        sort_descending: sort_by.descending(),
        limit: NonZeroUsize::new(limit).unwrap(),
    }
}

fn names(table: &Table) -> Vec<&str> {
    table.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn scenario_a_top_two_by_market_cap() {
    let out = apply(
        &three_companies(),
        &spec((0.0, 5000.0), (0.0, 500.0), "", SortBy::MarketCapDesc, 2),
    );
    assert_eq!(names(&out), vec!["Apple", "Microsoft"]);
}

#[test]
fn scenario_b_search_is_case_insensitive() {
    let table = three_companies();
    for sort_by in SortBy::ALL {
        for limit in [1, 2, 10] {
            let out = apply(&table, &spec((0.0, 5000.0), (0.0, 500.0), "goo", sort_by, limit));
            assert_eq!(names(&out), vec!["Google"], "sort {sort_by}, limit {limit}");
        }
    }
}

#[test]
fn scenario_c_market_cap_range_and_total() {
    let out = apply(
        &three_companies(),
        &spec((3000.0, 3700.0), (0.0, 500.0), "", SortBy::MarketCapDesc, 25),
    );
    assert_eq!(names(&out), vec!["Apple"]);
    assert_eq!(sum(&out, NumericColumn::MarketCap), Ok(3610.0));
}

#[test]
fn scenario_d_empty_table() {
    let empty = Table::from_records(Vec::new());
    assert_eq!(
        describe(&empty, NumericColumn::MarketCap),
        Err(SummaryError::EmptyColumn(NumericColumn::MarketCap))
    );
    let out = apply(&empty, &spec((0.0, 1.0), (0.0, 1.0), "", SortBy::NameAsc, 5));
    assert!(out.is_empty());
    assert!(top_n_concentration(&out, 5).is_err());
}

#[test]
fn scenario_e_limit_never_pads() {
    let out = apply(
        &three_companies(),
        &spec((0.0, 5000.0), (0.0, 500.0), "", SortBy::PriceAsc, 10),
    );
    assert_eq!(names(&out), vec!["Google", "Apple", "Microsoft"]);
}

#[test]
fn duplicate_names_are_kept() {
    let table = Table::from_records(vec![
        CompanyRecord::new("Alphabet", 2116.0, 174.70),
        CompanyRecord::new("Alphabet", 2100.0, 176.10),
    ]);
    let out = apply(&table, &FilterSpec::unfiltered(&table, NonZeroUsize::new(5).unwrap()));
    assert_eq!(out.len(), 2);
}

#[test]
fn name_sort_is_ascending_whatever_the_flag() {
    let table = three_companies();
    let mut s = spec((0.0, 5000.0), (0.0, 500.0), "", SortBy::NameAsc, 10);
    s.sort_descending = true;
    assert_eq!(s.sort_key, SortKey::Name);
    assert_eq!(names(&apply(&table, &s)), vec!["Apple", "Google", "Microsoft"]);
}

#[test]
fn concentration_ignores_user_sort() {
    let mut records = Vec::new();
    for (i, cap) in [10.0, 100.0, 20.0, 90.0, 30.0, 80.0, 40.0].into_iter().enumerate() {
        records.push(CompanyRecord::new(format!("c{i}"), cap, 1.0));
    }
    let table = Table::from_records(records);
    let by_cap = apply(&table, &FilterSpec::unfiltered(&table, NonZeroUsize::new(10).unwrap()));
    let by_name = apply(
        &table,
        &FilterSpec {
            sort_key: SortKey::Name,
            sort_descending: false,
            ..FilterSpec::unfiltered(&table, NonZeroUsize::new(10).unwrap())
        },
    );
    let a = top_n_concentration(&by_name, 5).unwrap();
    let b = top_n_concentration(&by_cap, 5).unwrap();
    assert_eq!(a, b);
    assert!((a - 340.0 / 370.0 * 100.0).abs() < 1e-9);
}

#[test]
fn export_then_reload_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("final.csv");
    std::fs::write(
        &input,
        "Logo,Name,Market Cap,Price\n\
         apple.png,Apple,3 610,240.36\n\
         ,\"Berkshire, Inc\",1 002.125,0.1\n\
         msft.png,Microsoft,2971,399.73\n\
         ,Google,2116,174.7\n",
    )
    .unwrap();

    let source = DataSource::new([input]);
    let loaded = source.load().unwrap();
    assert!(!loaded.fell_back_to_sample());

    let filtered = apply(
        &loaded.table,
        &spec((1000.0, 3000.0), (0.0, 1000.0), "", SortBy::MarketCapAsc, 25),
    );
    assert_eq!(names(&filtered), vec!["Berkshire, Inc", "Google", "Microsoft"]);

    let output = dir.path().join("export.csv");
    write_csv(&filtered, std::fs::File::create(&output).unwrap()).unwrap();
    let reloaded = load_file(&output).unwrap();

    assert_eq!(reloaded.headers(), filtered.headers());
    assert_eq!(reloaded.len(), filtered.len());
    for (a, b) in reloaded.iter().zip(filtered.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.extra, b.extra);
        assert!((a.market_cap - b.market_cap).abs() < 1e-9);
        assert!((a.price - b.price).abs() < 1e-9);
    }
}

#[test]
fn sample_fallback_is_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let source = DataSource::new([dir.path().join("final.csv"), dir.path().join("data/final.csv")]);
    let loaded = source.load().unwrap();
    assert!(loaded.fell_back_to_sample());
    assert_eq!(
        names(&loaded.table),
        vec!["Apple", "Microsoft", "Google", "Amazon", "Meta"]
    );
}
