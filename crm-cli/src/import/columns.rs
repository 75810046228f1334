//! Read column headers and sample values from spreadsheet files

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};

/// Sample values kept per column for display
const SAMPLE_ROWS: usize = 3;

/// One column of the imported spreadsheet
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedColumn {
    pub index: usize,
    pub header: String,
    pub samples: Vec<String>,
}

/// Read columns from a CSV or workbook file, chosen by extension
pub fn read_columns(path: &Path) -> Result<Vec<ImportedColumn>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
            read_csv_columns(file)
                .with_context(|| format!("Failed to read CSV file: {}", path.display()))
        }
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook_columns(path),
        other => bail!("Unsupported spreadsheet format: '{}'", other),
    }
}

/// Read columns from CSV data
pub fn read_csv_columns<R: Read>(reader: R) -> Result<Vec<ImportedColumn>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().context("Missing header row")?.clone();

    let mut columns: Vec<ImportedColumn> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| ImportedColumn {
            index,
            header: header.trim().to_string(),
            samples: Vec::new(),
        })
        .collect();

    for record in csv_reader.records().take(SAMPLE_ROWS) {
        let record = record.context("Failed to read CSV row")?;
        for column in columns.iter_mut() {
            if let Some(value) = record.get(column.index) {
                let value = value.trim();
                if !value.is_empty() {
                    column.samples.push(value.to_string());
                }
            }
        }
    }

    Ok(columns)
}

/// Read columns from the first sheet of a workbook
fn read_workbook_columns(path: &Path) -> Result<Vec<ImportedColumn>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Workbook has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let mut rows = range.rows();
    let header_row = rows.next().context("Sheet has no header row")?;

    let mut columns: Vec<ImportedColumn> = header_row
        .iter()
        .enumerate()
        .map(|(index, cell)| ImportedColumn {
            index,
            header: cell_to_string(cell),
            samples: Vec::new(),
        })
        .collect();

    for row in rows.take(SAMPLE_ROWS) {
        for column in columns.iter_mut() {
            if let Some(cell) = row.get(column.index) {
                let value = cell_to_string(cell);
                if !value.is_empty() {
                    column.samples.push(value);
                }
            }
        }
    }

    log::info!(
        "Read {} columns from sheet '{}' of {}",
        columns.len(),
        sheet_name,
        path.display()
    );

    Ok(columns)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_columns() {
        let data = "Email, Full Name ,City\n\
                    a@example.com,Ada Lovelace,London\n\
                    b@example.com,,Paris\n";

        let columns = read_csv_columns(data.as_bytes()).unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[1].header, "Full Name");
        assert_eq!(columns[0].samples, vec!["a@example.com", "b@example.com"]);
        assert_eq!(columns[1].samples, vec!["Ada Lovelace"]);
        assert_eq!(columns[2].index, 2);
    }

    #[test]
    fn test_read_csv_keeps_only_sample_rows() {
        let data = "Id\n1\n2\n3\n4\n5\n";
        let columns = read_csv_columns(data.as_bytes()).unwrap();
        assert_eq!(columns[0].samples, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_read_csv_short_rows() {
        let data = "A,B\n1\n";
        let columns = read_csv_columns(data.as_bytes()).unwrap();
        assert_eq!(columns[0].samples, vec!["1"]);
        assert!(columns[1].samples.is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(read_columns(Path::new("data.pdf")).is_err());
    }
}
