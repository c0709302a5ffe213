// Table loading by file extension

use std::path::Path;

use lexigrid_recon::model::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// xlsx, xlsm, xlsb, xls, ods
    Spreadsheet,
    /// csv, txt (delimiter sniffed)
    Csv,
    Tsv,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Spreadsheet),
            "csv" | "txt" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "" => Err(format!("{}: file has no extension", path.display())),
            other => Err(format!(
                "{}: unsupported table format '.{other}'",
                path.display()
            )),
        }
    }
}

/// Load a table from `path`. `sheet` selects a worksheet in spreadsheet files
/// and must be `None` for delimited text.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    if !path.exists() {
        return Err(format!("{}: file not found", path.display()));
    }
    let format = TableFormat::from_path(path)?;
    let table = match format {
        TableFormat::Spreadsheet => crate::xlsx::import(path, sheet)?,
        TableFormat::Csv | TableFormat::Tsv if sheet.is_some() => {
            return Err(format!(
                "{}: sheet selection only applies to spreadsheet files",
                path.display()
            ));
        }
        TableFormat::Csv => crate::csv::import(path)?,
        TableFormat::Tsv => crate::csv::import_tsv(path)?,
    };
    log::info!(
        "loaded {} ({} rows, {} columns)",
        table.name,
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn format_by_extension() {
        assert_eq!(TableFormat::from_path(Path::new("a.XLSX")).unwrap(), TableFormat::Spreadsheet);
        assert_eq!(TableFormat::from_path(Path::new("a.ods")).unwrap(), TableFormat::Spreadsheet);
        assert_eq!(TableFormat::from_path(Path::new("a.csv")).unwrap(), TableFormat::Csv);
        assert_eq!(TableFormat::from_path(Path::new("a.tsv")).unwrap(), TableFormat::Tsv);
        assert!(TableFormat::from_path(Path::new("a.docx")).unwrap_err().contains(".docx"));
        assert!(TableFormat::from_path(Path::new("Makefile")).is_err());
    }

    #[test]
    fn loads_csv_and_rejects_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "Key,English\nk1,Hi\n").unwrap();

        let table = load_table(&path, None).unwrap();
        assert_eq!(table.text(2, 2), "Hi");
        assert!(load_table(&path, Some("Sheet1")).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_table(Path::new("/nonexistent/t.csv"), None).unwrap_err();
        assert!(err.contains("not found"));
    }
}
