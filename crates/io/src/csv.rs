// CSV/TSV import/export

use std::io::Read;
use std::path::Path;

use lexigrid_recon::model::{Cell, ReconResult, Table};

use crate::report::{self, REPORT_HEADERS};

pub fn import(path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&table_name(path), &content, delimiter)
}

pub fn import_tsv(path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&table_name(path), &content, b'\t')
}

fn table_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub(crate) fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Lines agreeing with line 1, weighted by its field count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file =
        std::fs::File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            log::debug!("{}: not UTF-8, decoding as Windows-1252", path.display());
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    // Excel writes a BOM on "CSV UTF-8" exports
    Ok(content.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(content))
}

pub(crate) fn import_from_string(name: &str, content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| format!("{name}: {e}"))?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(Table::new(name, rows))
}

/// Write a table as plain CSV. Absent cells are written empty.
pub fn export_table(table: &Table, path: &Path) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    for row in table.rows() {
        writer
            .write_record(row.iter().map(Cell::text))
            .map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

/// One row per verdict, in stream order.
pub fn export_report(result: &ReconResult, path: &Path) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| e.to_string())?;

    let mut header: Vec<&str> = REPORT_HEADERS.to_vec();
    header.push("Match tier");
    writer.write_record(&header).map_err(|e| e.to_string())?;

    for v in &result.verdicts {
        let comparison = report::comparison_text(v);
        let score = report::score_text(v.score);
        let tier = v.tier.map(|t| t.to_string()).unwrap_or_default();
        writer
            .write_record([
                v.source_key.as_str(),
                v.language.label(),
                v.source_text.as_str(),
                comparison.as_str(),
                report::result_label(v.verdict),
                score.as_str(),
                v.target_key.as_deref().unwrap_or(""),
                tier.as_str(),
            ])
            .map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "Key;中文;English\nk1;你好;Hello\nk2;再见;Bye\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "Key,中文,English\nk1,你好,Hello\nk2,再见,Bye\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "Key\t中文\tEnglish\nk1\t你好\tHello\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "Key;English;Deutsch\nk1;\"Yes, please\";\"Ja, bitte\"\nk2;No;Nein\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_import_keeps_ragged_rows_and_blanks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("strings.csv");
        fs::write(&path, "Key,中文,English\nk1,你好,Hello\nk2,  \nk3\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.name, "strings.csv");
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.text(2, 2), "你好");
        assert!(table.rows()[2][1].is_absent());
        assert_eq!(table.text(4, 3), "");
    }

    #[test]
    fn test_import_windows_1252_and_bom() {
        let dir = tempdir().unwrap();
        let latin = dir.path().join("latin.csv");
        // "Français" with ç as 0xE7
        fs::write(&latin, b"Key,French\nk1,Fran\xe7ais\n").unwrap();
        assert_eq!(import(&latin).unwrap().text(2, 2), "Français");

        let bom = dir.path().join("bom.csv");
        fs::write(&bom, "\u{feff}Key,English\nk1,Hi\n").unwrap();
        assert_eq!(import(&bom).unwrap().text(1, 1), "Key");
    }

    #[test]
    fn test_table_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::from_text_rows(
            "t",
            vec![vec!["Key", "English"], vec!["k1", "Hello, world"], vec!["k2", ""]],
        );
        export_table(&table, &path).unwrap();

        let back = import(&path).unwrap();
        assert_eq!(back.text(2, 2), "Hello, world");
        assert_eq!(back.text(3, 1), "k2");
        assert!(back.rows()[2][1].is_absent());
    }
}
