use std::io::Write;

use chrono::NaiveDate;

use super::model::{Table, MARKET_CAP_COLUMN, NAME_COLUMN, PRICE_COLUMN};

/// Write `table` as CSV with the same header row it was loaded with.
///
/// Numbers use the shortest representation that parses back to the same
/// `f64`, so a reload reproduces every record exactly.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(table.headers())?;

    for record in table {
        let mut extra = record.extra.iter();
        let row: Vec<String> = table
            .headers()
            .iter()
            .map(|header| match header.as_str() {
                NAME_COLUMN => record.name.clone(),
                MARKET_CAP_COLUMN => record.market_cap.to_string(),
                PRICE_COLUMN => record.price.to_string(),
                _ => extra.next().cloned().unwrap_or_default(),
            })
            .collect();
        out.write_record(&row)?;
    }
    out.flush()?;
    Ok(())
}

/// Suggested download name, e.g. `global_companies_ranking_2024-12-31.csv`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("global_companies_ranking_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CompanyRecord;

    fn to_csv_string(table: &Table) -> String {
        let mut buf = Vec::new();
        write_csv(table, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_headers_in_input_order() {
        let table = Table::new(
            vec!["Logo".into(), "Name".into(), "Market Cap".into(), "Price".into()],
            vec![CompanyRecord {
                extra: vec!["apple.png".into()],
                ..CompanyRecord::new("Apple", 3610.0, 240.36)
            }],
        );
        let csv = to_csv_string(&table);
        assert_eq!(csv, "Logo,Name,Market Cap,Price\napple.png,Apple,3610,240.36\n");
    }

    #[test]
    fn quotes_fields_that_need_it() {
        let table = Table::from_records(vec![CompanyRecord::new("Berkshire, \"B\"", 1000.5, 0.25)]);
        let csv = to_csv_string(&table);
        assert_eq!(csv, "Name,Market Cap,Price\n\"Berkshire, \"\"B\"\"\",1000.5,0.25\n");
    }

    #[test]
    fn empty_table_still_has_header() {
        let csv = to_csv_string(&Table::from_records(Vec::new()));
        assert_eq!(csv, "Name,Market Cap,Price\n");
    }

    #[test]
    fn file_name_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(export_file_name(date), "global_companies_ranking_2024-12-31.csv");
    }
}
