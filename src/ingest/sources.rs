use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Reader};

use crate::error::AgentError;

/// A supported tabular file. Dispatch happens once, on the file extension;
/// everything downstream works through the closed set of variants.
#[derive(Debug, Clone)]
pub enum TabularSource {
    Csv(PathBuf),
    Excel(PathBuf),
}

impl TabularSource {
    /// Recognizes a file by extension (case-insensitive). Returns `None` for
    /// anything the pipeline cannot ingest.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv(path.to_path_buf())),
            "xlsx" | "xls" => Some(Self::Excel(path.to_path_buf())),
            _ => None,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Csv(path) | Self::Excel(path) => path,
        }
    }

    /// Renders the file as flat text, one line per row with cells joined by
    /// `", "`. Row order is preserved; every sheet of a workbook is rendered.
    pub fn to_flat_text(&self) -> Result<String, AgentError> {
        match self {
            Self::Csv(path) => read_csv(path),
            Self::Excel(path) => read_excel(path),
        }
    }
}

fn read_error(path: &Path, e: impl std::fmt::Display) -> AgentError {
    AgentError::FileRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn read_csv(path: &Path) -> Result<String, AgentError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| read_error(path, e))?;

    let mut out = String::new();
    for record in reader.records() {
        let record = record.map_err(|e| read_error(path, e))?;
        out.push_str(&record.iter().collect::<Vec<_>>().join(", "));
        out.push('\n');
    }

    Ok(out)
}

fn read_excel(path: &Path) -> Result<String, AgentError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| read_error(path, e))?;

    let mut out = String::new();
    for sheet in workbook.sheet_names().to_owned() {
        match workbook.worksheet_range(&sheet) {
            Some(Ok(range)) => {
                for row in range.rows() {
                    let line = row
                        .iter()
                        .map(|cell| cell.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    out.push_str(&line);
                    out.push('\n');
                }
            }
            Some(Err(e)) => return Err(read_error(path, e)),
            None => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_path_dispatch() {
        assert!(matches!(
            TabularSource::from_path(Path::new("data.csv")),
            Some(TabularSource::Csv(_))
        ));
        assert!(matches!(
            TabularSource::from_path(Path::new("Data.XLSX")),
            Some(TabularSource::Excel(_))
        ));
        assert!(matches!(
            TabularSource::from_path(Path::new("old.xls")),
            Some(TabularSource::Excel(_))
        ));
        assert!(TabularSource::from_path(Path::new("notes.txt")).is_none());
        assert!(TabularSource::from_path(Path::new("no_extension")).is_none());
    }

    #[test]
    fn test_csv_rendering_preserves_row_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("people.csv");
        fs::write(&path, "Name,Age\nAlice,30\nBob,25\n").unwrap();

        let source = TabularSource::from_path(&path).unwrap();
        let text = source.to_flat_text().unwrap();

        assert_eq!(text, "Name, Age\nAlice, 30\nBob, 25\n");
    }

    #[test]
    fn test_csv_quoted_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cities.csv");
        fs::write(&path, "City,Country\n\"Paris, Texas\",USA\n").unwrap();

        let source = TabularSource::from_path(&path).unwrap();
        let text = source.to_flat_text().unwrap();

        assert!(text.contains("Paris, Texas, USA"));
    }

    #[test]
    fn test_missing_file_reports_read_error() {
        let source = TabularSource::from_path(Path::new("nowhere/missing.csv")).unwrap();
        let err = source.to_flat_text().unwrap_err();

        assert!(matches!(err, AgentError::FileRead { .. }));
        assert!(err.to_string().contains("missing.csv"));
    }
}
