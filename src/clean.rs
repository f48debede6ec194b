// Dataset cleaning: postal-code fill, day-first date normalization, and
// exact-duplicate removal. Each step silently skips when its target column is
// absent; a dataset is never rejected here.
use crate::types::{col, OrderRecord, RawTable};
use crate::util::{parse_date_dayfirst, parse_f64_safe, parse_i64_safe};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub duplicates_removed: usize,
    pub postal_filled: usize,
    pub dates_nulled: usize,
}

/// Clean the raw table in place.
///
/// Order matters: the postal fill and date normalization rewrite cells first,
/// so the duplicate comparison sees the same representation for rows that
/// only differed in formatting. Duplicates are compared across every column,
/// including ones the core never reads, keeping the first occurrence.
pub fn clean(table: &mut RawTable) -> CleanReport {
    let mut report = CleanReport {
        rows_in: table.rows.len(),
        ..Default::default()
    };

    if let Some(idx) = table.column_index(col::POSTAL_CODE) {
        for row in &mut table.rows {
            if row[idx].trim().is_empty() {
                row[idx] = "0".to_string();
                report.postal_filled += 1;
            }
        }
    }

    for name in [col::ORDER_DATE, col::SHIP_DATE] {
        let Some(idx) = table.column_index(name) else {
            continue;
        };
        for row in &mut table.rows {
            let cell = row[idx].trim();
            if cell.is_empty() {
                continue;
            }
            match parse_date_dayfirst(cell) {
                Some(d) => row[idx] = d.format("%Y-%m-%d").to_string(),
                None => {
                    // Unparseable date becomes an explicit null; the row stays.
                    row[idx] = String::new();
                    report.dates_nulled += 1;
                }
            }
        }
    }

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    table.rows.retain(|row| seen.insert(row.clone()));

    report.rows_out = table.rows.len();
    report.duplicates_removed = report.rows_in - report.rows_out;
    report
}

/// Convert a cleaned table into typed records. Absent columns and empty
/// cells become `None`; the record keeps its backing row index so the
/// filtered dataset can be re-serialized with all original columns.
pub fn to_records(table: &RawTable) -> Vec<OrderRecord> {
    let idx_of = |name: &str| table.column_index(name);
    let region = idx_of(col::REGION);
    let category = idx_of(col::CATEGORY);
    let sub_category = idx_of(col::SUB_CATEGORY);
    let state = idx_of(col::STATE);
    let customer = idx_of(col::CUSTOMER_NAME);
    let product = idx_of(col::PRODUCT_NAME);
    let order_id = idx_of(col::ORDER_ID);
    let order_date = idx_of(col::ORDER_DATE);
    let ship_date = idx_of(col::SHIP_DATE);
    let sales = idx_of(col::SALES);
    let profit = idx_of(col::PROFIT);
    let discount = idx_of(col::DISCOUNT);
    let postal = idx_of(col::POSTAL_CODE);

    let text = |row: &[String], idx: Option<usize>| -> Option<String> {
        let cell = row[idx?].trim();
        if cell.is_empty() {
            None
        } else {
            Some(cell.to_string())
        }
    };
    let number = |row: &[String], idx: Option<usize>| parse_f64_safe(&row[idx?]);
    let date = |row: &[String], idx: Option<usize>| parse_date_dayfirst(&row[idx?]);

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| OrderRecord {
            row: i,
            region: text(row, region),
            category: text(row, category),
            sub_category: text(row, sub_category),
            state: text(row, state),
            customer_name: text(row, customer),
            product_name: text(row, product),
            order_id: text(row, order_id),
            order_date: date(row, order_date),
            ship_date: date(row, ship_date),
            sales: number(row, sales),
            profit: number(row, profit),
            discount: number(row, discount),
            postal_code: postal.and_then(|p| parse_i64_safe(&row[p])).unwrap_or(0),
        })
        .collect()
}
