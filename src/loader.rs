use crate::types::RawTable;
use calamine::{open_workbook, Data, Reader, Xlsx};
use encoding_rs::WINDOWS_1252;
use std::path::Path;
use thiserror::Error;

/// Fatal load failures. Anything here halts the session before cleaning or
/// aggregation runs; recoverable conditions (missing columns, bad cells)
/// never surface through this type.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("no data source available (no uploaded file and no default dataset)")]
    SourceUnavailable,

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("XLSX read error in {path}: {source}")]
    Xlsx {
        path: String,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("{path} contains no data")]
    EmptyTable { path: String },
}

/// Which source the loader ended up using, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Default,
    Uploaded,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub table: RawTable,
    pub source: SourceKind,
}

/// Load the dataset, preferring an explicitly supplied file over the bundled
/// default. With neither present the session cannot proceed.
pub fn load(uploaded: Option<&Path>, default_path: &Path) -> Result<LoadOutcome, LoadError> {
    let (path, source) = match uploaded {
        Some(p) => (p, SourceKind::Uploaded),
        None if default_path.exists() => (default_path, SourceKind::Default),
        None => return Err(LoadError::SourceUnavailable),
    };

    let is_xlsx = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    let table = if is_xlsx {
        read_xlsx(path)?
    } else {
        read_csv_latin1(path)?
    };

    if table.headers.is_empty() {
        return Err(LoadError::EmptyTable {
            path: path.display().to_string(),
        });
    }
    Ok(LoadOutcome { table, source })
}

/// Read a delimited text file. The dataset ships as WINDOWS-1252 ("latin1"),
/// so the raw bytes are decoded before the CSV reader sees them; decoding is
/// lossless for every byte value, non-ASCII characters come through intact.
fn read_csv_latin1(path: &Path) -> Result<RawTable, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let (text, _, _) = WINDOWS_1252.decode(&bytes);

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| LoadError::Csv {
            path: path.display().to_string(),
            source: e,
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let width = headers.len();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| LoadError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        row.resize(width, String::new());
        rows.push(row);
    }
    Ok(RawTable { headers, rows })
}

/// Read the first worksheet of an XLSX workbook into the same raw-table shape
/// as the CSV path, rendering every cell to its string form.
fn read_xlsx(path: &Path) -> Result<RawTable, LoadError> {
    let as_xlsx_err = |e: calamine::XlsxError| LoadError::Xlsx {
        path: path.display().to_string(),
        source: e,
    };
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(as_xlsx_err)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names.first().ok_or_else(|| LoadError::EmptyTable {
        path: path.display().to_string(),
    })?;

    let range = workbook.worksheet_range(first).map_err(as_xlsx_err)?;
    let mut iter = range.rows();
    let headers: Vec<String> = match iter.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => {
            return Err(LoadError::EmptyTable {
                path: path.display().to_string(),
            })
        }
    };

    let width = headers.len();
    let mut rows = Vec::new();
    for row in iter {
        let mut cells: Vec<String> = row.iter().map(cell_to_string).collect();
        cells.resize(width, String::new());
        rows.push(cells);
    }
    Ok(RawTable { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            // Spreadsheets store integers as floats; keep "1040" over "1040.0"
            // so identifier-like columns survive the round trip.
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("{:?}", e),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
