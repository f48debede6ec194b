use crate::types::{OrderRecord, RawTable};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

/// Fixed name of the downloadable filtered-dataset export.
pub const FILTERED_EXPORT_FILENAME: &str = "filtered_data.csv";

/// Re-serialize the currently filtered rows as delimited text, with the
/// original headers and column order, extra columns included. Returns the
/// path written.
pub fn export_filtered(
    table: &RawTable,
    filtered: &[OrderRecord],
    dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(FILTERED_EXPORT_FILENAME);
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(&table.headers)?;
    for record in filtered {
        wtr.write_record(&table.rows[record.row])?;
    }
    wtr.flush()?;
    Ok(path)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}", title);
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clean, filter};

    #[test]
    fn export_writes_only_surviving_rows_with_all_columns() {
        let mut table = RawTable {
            headers: vec!["Region".into(), "Sales".into(), "Extra".into()],
            rows: vec![
                vec!["East".into(), "100".into(), "keep-me".into()],
                vec!["West".into(), "200".into(), "also".into()],
            ],
        };
        clean::clean(&mut table);
        let records = clean::to_records(&table);
        let mut sel = filter::FilterSelection::for_dataset(&records);
        sel.regions = Some(["West".to_string()].into());
        let filtered = filter::apply(&records, &sel);

        let dir = tempfile::tempdir().unwrap();
        let path = export_filtered(&table, &filtered, dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            FILTERED_EXPORT_FILENAME
        );
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Region,Sales,Extra\nWest,200,also\n");
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let kpis = crate::types::Kpis {
            total_sales: 350.0,
            total_profit: 45.0,
            total_orders: 3,
            profit_margin: 12.857142857142858,
        };
        write_json(&path, &kpis).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"total_sales\": 350.0"));
        assert!(text.contains("\"total_orders\": 3"));
    }
}
